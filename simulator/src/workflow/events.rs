use log::{debug, info};
use radarcore::feedback::tone::synthesize;
use radarcore::math::dominant_frequency;
use radarcore::SessionEvent;

/// Turns session events into log lines and rendered beep audio.
#[derive(Clone, Copy, Debug)]
pub struct EventSink {
    sample_rate: u32,
}

impl EventSink {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn handle(&self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::ModeChanged(mode) => info!("sweep mode {:?}", mode),
                SessionEvent::Beep(kind) => {
                    let pcm = synthesize(*kind, self.sample_rate);
                    let peak = dominant_frequency(&pcm, self.sample_rate).unwrap_or_default();
                    info!(
                        "beep {:?}: {} samples @ {} Hz, peak {:.0} Hz",
                        kind,
                        pcm.len(),
                        self.sample_rate,
                        peak
                    );
                }
                SessionEvent::Announced(text) => debug!("announced: {}", text),
                SessionEvent::Captured(summary) => {
                    info!("captured {} ({})", summary.name, summary.id)
                }
                SessionEvent::Cleaned(report) => debug!(
                    "cleanup: {} readings expired, {} objects dropped",
                    report.expired_readings, report.dropped_objects
                ),
            }
        }
    }
}
