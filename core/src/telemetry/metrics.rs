use crate::feedback::BeepKind;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub scan_ticks: usize,
    pub cleanup_passes: usize,
    pub detections: usize,
    pub scan_beeps: usize,
    pub detection_beeps: usize,
    pub alert_beeps: usize,
    pub announcements: usize,
    pub captures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_scan_tick(&self, detected: bool) {
        self.update(|metrics| {
            metrics.scan_ticks += 1;
            if detected {
                metrics.detections += 1;
            }
        });
    }

    pub fn record_cleanup(&self) {
        self.update(|metrics| metrics.cleanup_passes += 1);
    }

    pub fn record_beep(&self, kind: BeepKind) {
        self.update(|metrics| match kind {
            BeepKind::Scan => metrics.scan_beeps += 1,
            BeepKind::Detection => metrics.detection_beeps += 1,
            BeepKind::Alert => metrics.alert_beeps += 1,
        });
    }

    pub fn record_announcements(&self, count: usize) {
        self.update(|metrics| metrics.announcements += count);
    }

    pub fn record_capture(&self) {
        self.update(|metrics| metrics.captures += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
