//! Deterministic simulation session.
//!
//! A [`Session`] owns every piece of sweep state and is driven purely by the
//! clock values handed to [`Session::command`] and [`Session::advance`]; the
//! [`Scheduler`] decides which ticks are due. Nothing here reads wall time.

use crate::capture::{CaptureLog, CaptureSummary};
use crate::feedback::{Announcer, AudioFeedback, BeepKind, VoiceContext};
use crate::math::StatsHelper;
use crate::prelude::{RadarConfig, RadarResult};
use crate::render::RadarView;
use crate::scan::{
    CleanupReport, DetectedObject, Reading, SampleGenerator, SamplerConfig, ScanMode, ScanState,
    Scheduler, Tick,
};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Stop,
    ToggleScan,
    ToggleBeep,
    ToggleAlerts,
    ToggleTracking,
}

/// Side effects produced while advancing the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ModeChanged(ScanMode),
    Beep(BeepKind),
    Announced(String),
    Captured(CaptureSummary),
    Cleaned(CleanupReport),
}

/// Serializable view of a session, as served to the visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub now_ms: u64,
    pub mode: ScanMode,
    pub angle_deg: f32,
    pub max_range: f32,
    pub trail_fade_ms: u64,
    pub readings: Vec<Reading>,
    pub objects: Vec<DetectedObject>,
    pub beep_enabled: bool,
    pub alerts_enabled: bool,
    pub tracking_enabled: bool,
    pub voice_primary: bool,
    pub spoken: Vec<String>,
    pub captures: Vec<CaptureSummary>,
    pub closest_cm: Option<f32>,
    pub mean_cm: Option<f32>,
    pub metrics: MetricsSnapshot,
}

impl SessionSnapshot {
    pub fn is_scanning(&self) -> bool {
        self.mode == ScanMode::Scanning
    }

    pub fn radar_view(&self) -> RadarView<'_> {
        RadarView {
            angle_deg: self.angle_deg,
            readings: &self.readings,
            objects: &self.objects,
            scanning: self.is_scanning(),
            max_range: self.max_range,
            now_ms: self.now_ms,
            trail_fade_ms: self.trail_fade_ms,
        }
    }
}

pub struct Session<R: Rng = StdRng> {
    config: RadarConfig,
    state: ScanState,
    sampler: SampleGenerator,
    rng: R,
    scheduler: Scheduler,
    beeper: AudioFeedback,
    announcer: Announcer,
    voice: VoiceContext,
    captures: CaptureLog,
    metrics: MetricsRecorder,
    epoch: DateTime<Utc>,
    now_ms: u64,
    logger: LogManager,
}

impl Session<StdRng> {
    pub fn seeded(
        config: RadarConfig,
        sampler: SamplerConfig,
        seed: u64,
        epoch: DateTime<Utc>,
    ) -> RadarResult<Self> {
        Self::with_rng(config, sampler, StdRng::seed_from_u64(seed), epoch)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(
        config: RadarConfig,
        sampler: SamplerConfig,
        rng: R,
        epoch: DateTime<Utc>,
    ) -> RadarResult<Self> {
        config.validate()?;
        Ok(Self {
            state: ScanState::new(&config),
            sampler: SampleGenerator::new(sampler, config.max_range),
            rng,
            scheduler: Scheduler::new(config.scan_period_ms, config.cleanup_period_ms, 0),
            beeper: AudioFeedback::from_config(&config),
            announcer: Announcer::new(),
            voice: VoiceContext::new(),
            captures: CaptureLog::new(),
            metrics: MetricsRecorder::new(),
            epoch,
            now_ms: 0,
            logger: LogManager::new("session"),
            config,
        })
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScanState {
        &mut self.state
    }

    pub fn voice_mut(&mut self) -> &mut VoiceContext {
        &mut self.voice
    }

    pub fn captures(&self) -> &CaptureLog {
        &self.captures
    }

    pub fn captures_mut(&mut self) -> &mut CaptureLog {
        &mut self.captures
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn wall_time(&self, at_ms: u64) -> DateTime<Utc> {
        self.epoch + Duration::milliseconds(at_ms as i64)
    }

    /// Runs every tick due up to `now_ms`; earlier clock values are ignored.
    pub fn advance(&mut self, now_ms: u64) -> Vec<SessionEvent> {
        let now_ms = now_ms.max(self.now_ms);
        let mut events = Vec::new();
        for tick in self.scheduler.due(now_ms) {
            self.now_ms = tick.at_ms();
            match tick {
                Tick::Scan(at) => {
                    let outcome = self.state.tick(&self.sampler, &mut self.rng, at);
                    let detected = outcome.map_or(false, |outcome| outcome.detection.is_some());
                    self.metrics.record_scan_tick(detected);
                }
                Tick::Cleanup(at) => {
                    let report = self.state.cleanup(at);
                    self.metrics.record_cleanup();
                    if report != CleanupReport::default() {
                        self.logger.detail(&format!(
                            "cleanup dropped {} readings, {} objects",
                            report.expired_readings, report.dropped_objects
                        ));
                    }
                    events.push(SessionEvent::Cleaned(report));
                }
            }
            self.run_feedback(&mut events);
        }
        self.now_ms = now_ms;
        events
    }

    /// Applies an operator command at `now_ms`, catching up on due ticks first.
    pub fn command(&mut self, command: Command, now_ms: u64) -> Vec<SessionEvent> {
        let mut events = self.advance(now_ms);
        let now_ms = self.now_ms;
        let was_scanning = self.state.is_scanning();

        match command {
            Command::Start => {
                self.state.start();
            }
            Command::Stop => {
                self.state.stop();
            }
            Command::ToggleScan => {
                self.state.toggle();
            }
            Command::ToggleBeep => self.beeper.beep_enabled = !self.beeper.beep_enabled,
            Command::ToggleAlerts => self.beeper.alerts_enabled = !self.beeper.alerts_enabled,
            Command::ToggleTracking => {
                let enabled = !self.state.tracking_enabled();
                self.state.set_tracking(enabled);
            }
        }

        let scanning = self.state.is_scanning();
        if scanning != was_scanning {
            if scanning {
                self.scheduler.arm_scan(now_ms);
            } else {
                self.scheduler.disarm_scan();
            }
            self.logger
                .record(&format!("mode -> {:?} at {} ms", self.state.mode(), now_ms));
            events.push(SessionEvent::ModeChanged(self.state.mode()));
        }

        self.run_feedback(&mut events);
        events
    }

    fn run_feedback(&mut self, events: &mut Vec<SessionEvent>) {
        let now_ms = self.now_ms;
        let scanning = self.state.is_scanning();
        let objects = self.state.objects();

        let spoken = self.announcer.process(objects, &mut self.voice);
        if !spoken.is_empty() {
            self.metrics.record_announcements(spoken.len());
        }
        events.extend(spoken.into_iter().map(SessionEvent::Announced));

        if let Some(kind) = self.beeper.evaluate(objects, scanning, now_ms) {
            self.metrics.record_beep(kind);
            events.push(SessionEvent::Beep(kind));
        }

        let at = self.wall_time(now_ms);
        if let Some(summary) = self
            .captures
            .auto_capture(objects, scanning, now_ms, at, &mut self.rng)
        {
            self.metrics.record_capture();
            self.logger.record(&format!("auto-captured {}", summary.name));
            events.push(SessionEvent::Captured(summary));
        }
    }

    /// Captures the newest valid object, or does nothing if there is none.
    pub fn manual_capture(&mut self, now_ms: u64) -> Option<CaptureSummary> {
        self.advance(now_ms);
        let at = self.wall_time(self.now_ms);
        let summary =
            self.captures
                .manual_capture(self.state.objects(), self.now_ms, at, &mut self.rng);
        match &summary {
            Some(summary) => {
                self.metrics.record_capture();
                self.logger.record(&format!("manual capture {}", summary.name));
            }
            None => self.logger.detail("manual capture skipped: no valid targets"),
        }
        summary
    }

    pub fn radar_view(&self) -> RadarView<'_> {
        RadarView {
            angle_deg: self.state.angle(),
            readings: self.state.readings(),
            objects: self.state.objects(),
            scanning: self.state.is_scanning(),
            max_range: self.config.max_range,
            now_ms: self.now_ms,
            trail_fade_ms: self.config.trail_fade_ms,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let objects = self.state.objects();
        SessionSnapshot {
            now_ms: self.now_ms,
            mode: self.state.mode(),
            angle_deg: self.state.angle(),
            max_range: self.config.max_range,
            trail_fade_ms: self.config.trail_fade_ms,
            readings: self.state.readings().to_vec(),
            objects: objects.to_vec(),
            beep_enabled: self.beeper.beep_enabled,
            alerts_enabled: self.beeper.alerts_enabled,
            tracking_enabled: self.state.tracking_enabled(),
            voice_primary: self.voice.has_primary(),
            spoken: self.voice.fallback().spoken().map(str::to_string).collect(),
            captures: self.captures.summaries(),
            closest_cm: StatsHelper::closest_object(objects),
            mean_cm: StatsHelper::mean_object_distance(objects),
            metrics: self.metrics.snapshot(),
        }
    }
}
