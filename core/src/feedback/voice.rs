use crate::telemetry::LogManager;
use std::collections::VecDeque;

#[derive(thiserror::Error, Debug)]
pub enum VoiceError {
    #[error("no voice API key provided")]
    MissingKey,
    #[error("voice backend unavailable: {0}")]
    Unavailable(String),
    #[error("speech generation failed: {0}")]
    Generation(String),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// A speech backend. Calls are best-effort and may fail.
pub trait SpeechEngine: Send {
    fn name(&self) -> &str;
    fn speak(&mut self, text: &str) -> VoiceResult<()>;
}

pub const FALLBACK_RATE: f32 = 0.8;
pub const FALLBACK_PITCH: f32 = 0.9;
const FALLBACK_HISTORY: usize = 20;

/// Built-in speech used whenever no primary engine is usable.
///
/// Utterances are logged and kept in a short queue for display.
pub struct LocalSpeech {
    pub rate: f32,
    pub pitch: f32,
    spoken: VecDeque<String>,
    logger: LogManager,
}

impl LocalSpeech {
    pub fn new() -> Self {
        Self {
            rate: FALLBACK_RATE,
            pitch: FALLBACK_PITCH,
            spoken: VecDeque::with_capacity(FALLBACK_HISTORY),
            logger: LogManager::new("speech"),
        }
    }

    pub fn say(&mut self, text: &str) {
        self.logger.record(&format!(
            "(rate {:.1}, pitch {:.1}) {}",
            self.rate, self.pitch, text
        ));
        if self.spoken.len() == FALLBACK_HISTORY {
            self.spoken.pop_front();
        }
        self.spoken.push_back(text.to_string());
    }

    pub fn spoken(&self) -> impl Iterator<Item = &str> {
        self.spoken.iter().map(String::as_str)
    }
}

impl Default for LocalSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for LocalSpeech {
    fn name(&self) -> &str {
        "local"
    }

    fn speak(&mut self, text: &str) -> VoiceResult<()> {
        self.say(text);
        Ok(())
    }
}

/// Which engine ended up voicing a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechRoute {
    Primary,
    Fallback,
}

/// Voice collaborator handed to the announcer: an optional primary engine
/// plus the local fallback.
pub struct VoiceContext {
    primary: Option<Box<dyn SpeechEngine>>,
    fallback: LocalSpeech,
    logger: LogManager,
}

impl VoiceContext {
    pub fn new() -> Self {
        Self {
            primary: None,
            fallback: LocalSpeech::new(),
            logger: LogManager::new("voice"),
        }
    }

    pub fn with_engine(engine: Box<dyn SpeechEngine>) -> Self {
        let mut context = Self::new();
        context.primary = Some(engine);
        context
    }

    /// Connects a primary engine with `api_key`.
    ///
    /// On any failure the previous primary is dropped and the fallback stays in charge.
    pub fn initialize<F>(&mut self, api_key: &str, connect: F) -> VoiceResult<()>
    where
        F: FnOnce(&str) -> VoiceResult<Box<dyn SpeechEngine>>,
    {
        self.primary = None;
        let key = api_key.trim();
        if key.is_empty() {
            self.logger.warn("voice key is blank; using local speech");
            return Err(VoiceError::MissingKey);
        }
        match connect(key) {
            Ok(engine) => {
                self.logger
                    .record(&format!("primary voice engine '{}' ready", engine.name()));
                self.primary = Some(engine);
                Ok(())
            }
            Err(err) => {
                self.logger
                    .warn(&format!("voice engine init failed: {err}; using local speech"));
                Err(err)
            }
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn speak(&mut self, text: &str) -> SpeechRoute {
        if let Some(engine) = self.primary.as_mut() {
            match engine.speak(text) {
                Ok(()) => return SpeechRoute::Primary,
                Err(err) => self
                    .logger
                    .warn(&format!("{} failed: {err}; falling back", engine.name())),
            }
        } else {
            self.logger.detail("no primary voice engine; using local speech");
        }
        self.fallback.say(text);
        SpeechRoute::Fallback
    }

    pub fn fallback(&self) -> &LocalSpeech {
        &self.fallback
    }
}

impl Default for VoiceContext {
    fn default() -> Self {
        Self::new()
    }
}
