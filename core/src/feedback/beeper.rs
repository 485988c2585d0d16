use crate::feedback::tone::BeepKind;
use crate::prelude::RadarConfig;
use crate::scan::DetectedObject;

pub const ALERT_DISTANCE_CM: f32 = 80.0;
pub const DETECTION_DISTANCE_CM: f32 = 150.0;
pub const ALERT_COOLDOWN_MS: u64 = 1_000;
pub const DETECTION_COOLDOWN_MS: u64 = 2_000;
pub const SCAN_COOLDOWN_MS: u64 = 3_000;

/// Picks at most one beep per evaluation: alert, then detection, then scan.
///
/// All three patterns share one cooldown clock.
#[derive(Debug, Clone)]
pub struct AudioFeedback {
    pub beep_enabled: bool,
    pub alerts_enabled: bool,
    last_beep_ms: Option<u64>,
}

impl AudioFeedback {
    pub fn new(beep_enabled: bool, alerts_enabled: bool) -> Self {
        Self {
            beep_enabled,
            alerts_enabled,
            last_beep_ms: None,
        }
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        Self::new(config.beep_enabled, config.alerts_enabled)
    }

    pub fn last_beep_ms(&self) -> Option<u64> {
        self.last_beep_ms
    }

    fn cooled_down(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_beep_ms {
            Some(last) => now_ms.saturating_sub(last) > cooldown_ms,
            None => true,
        }
    }

    pub fn evaluate(
        &mut self,
        objects: &[DetectedObject],
        scanning: bool,
        now_ms: u64,
    ) -> Option<BeepKind> {
        if !self.beep_enabled {
            return None;
        }

        let critical = objects
            .iter()
            .any(|object| object.distance_cm < ALERT_DISTANCE_CM);
        let close = objects
            .iter()
            .any(|object| object.distance_cm < DETECTION_DISTANCE_CM);

        let kind = if critical && self.alerts_enabled && self.cooled_down(now_ms, ALERT_COOLDOWN_MS)
        {
            BeepKind::Alert
        } else if close && self.cooled_down(now_ms, DETECTION_COOLDOWN_MS) {
            BeepKind::Detection
        } else if scanning && self.cooled_down(now_ms, SCAN_COOLDOWN_MS) {
            BeepKind::Scan
        } else {
            return None;
        };

        self.last_beep_ms = Some(now_ms);
        Some(kind)
    }
}
