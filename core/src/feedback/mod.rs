pub mod announcer;
pub mod beeper;
pub mod classify;
pub mod tone;
pub mod voice;

pub use announcer::{Announcer, BoundedKeySet};
pub use beeper::AudioFeedback;
pub use classify::{Compass, RangeBand, Severity};
pub use tone::{BeepKind, ToneBurst};
pub use voice::{LocalSpeech, SpeechEngine, SpeechRoute, VoiceContext, VoiceError, VoiceResult};
