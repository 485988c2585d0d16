use crate::scan::reading::{DetectedObject, Reading};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub expired_readings: usize,
    pub dropped_objects: usize,
}

/// Drops readings whose age has reached the time-to-live.
pub fn prune_readings(readings: &mut Vec<Reading>, now_ms: u64, ttl_ms: u64) -> usize {
    let before = readings.len();
    readings.retain(|reading| reading.age_ms(now_ms) < ttl_ms);
    before - readings.len()
}

/// Keeps only the newest `cap` entries.
pub fn keep_newest<T>(items: &mut Vec<T>, cap: usize) -> usize {
    let excess = items.len().saturating_sub(cap);
    items.drain(..excess);
    excess
}

pub fn cap_objects(objects: &mut Vec<DetectedObject>, cap: usize) -> usize {
    keep_newest(objects, cap)
}
