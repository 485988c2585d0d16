use serde::{Deserialize, Serialize};

/// A single angle/distance sample taken at one step of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub angle_deg: f32,
    pub distance_cm: f32,
    pub timestamp_ms: u64,
}

impl Reading {
    pub fn new(angle_deg: f32, distance_cm: f32, timestamp_ms: u64) -> Self {
        Self {
            angle_deg,
            distance_cm,
            timestamp_ms,
        }
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}

/// A reading classified as a likely obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub id: String,
    pub angle_deg: f32,
    pub distance_cm: f32,
    pub tracked: bool,
    pub detected_at_ms: u64,
}

impl DetectedObject {
    pub fn new(id: impl Into<String>, angle_deg: f32, distance_cm: f32, detected_at_ms: u64) -> Self {
        Self {
            id: id.into(),
            angle_deg,
            distance_cm,
            tracked: false,
            detected_at_ms,
        }
    }

    pub fn with_tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Angle and distance rounded to whole units, used for de-duplication keys.
    pub fn rounded(&self) -> (i64, i64) {
        (
            self.angle_deg.round() as i64,
            self.distance_cm.round() as i64,
        )
    }
}
