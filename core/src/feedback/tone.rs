use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Linear attack before the exponential decay starts.
pub const ATTACK_MS: f32 = 10.0;
/// Gain the exponential decay reaches at the end of a burst.
pub const DECAY_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeepKind {
    Scan,
    Detection,
    Alert,
}

/// One sine burst inside a beep pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneBurst {
    pub offset_ms: u32,
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

impl ToneBurst {
    const fn new(offset_ms: u32, frequency_hz: f32, duration_ms: u32, gain: f32) -> Self {
        Self {
            offset_ms,
            frequency_hz,
            duration_ms,
            gain,
        }
    }

    /// Envelope value `t_ms` after the burst starts.
    pub fn envelope(&self, t_ms: f32) -> f32 {
        let duration = self.duration_ms as f32;
        if t_ms < 0.0 || t_ms >= duration || self.gain <= 0.0 {
            return 0.0;
        }
        if t_ms < ATTACK_MS.min(duration) {
            return self.gain * t_ms / ATTACK_MS;
        }
        let decay_span = (duration - ATTACK_MS).max(f32::EPSILON);
        let progress = (t_ms - ATTACK_MS) / decay_span;
        self.gain * (DECAY_FLOOR / self.gain).powf(progress)
    }

    pub fn end_ms(&self) -> u32 {
        self.offset_ms + self.duration_ms
    }
}

const SCAN: [ToneBurst; 1] = [ToneBurst::new(0, 400.0, 50, 0.2)];
const DETECTION: [ToneBurst; 2] = [
    ToneBurst::new(0, 1000.0, 150, 0.4),
    ToneBurst::new(200, 1200.0, 150, 0.4),
];
const ALERT: [ToneBurst; 3] = [
    ToneBurst::new(0, 1500.0, 100, 0.5),
    ToneBurst::new(150, 1500.0, 100, 0.5),
    ToneBurst::new(300, 1500.0, 100, 0.5),
];

impl BeepKind {
    pub fn bursts(self) -> &'static [ToneBurst] {
        match self {
            BeepKind::Scan => &SCAN,
            BeepKind::Detection => &DETECTION,
            BeepKind::Alert => &ALERT,
        }
    }

    pub fn duration_ms(self) -> u32 {
        self.bursts().iter().map(ToneBurst::end_ms).max().unwrap_or(0)
    }
}

/// Renders a beep pattern to mono PCM in `[-1, 1]`.
pub fn synthesize(kind: BeepKind, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f32;
    let total = (kind.duration_ms() as f32 / 1000.0 * rate).round() as usize;
    let mut samples = vec![0.0f32; total];

    for burst in kind.bursts() {
        let start = (burst.offset_ms as f32 / 1000.0 * rate).round() as usize;
        let length = (burst.duration_ms as f32 / 1000.0 * rate).round() as usize;
        for (n, slot) in samples.iter_mut().skip(start).take(length).enumerate() {
            let t = n as f32 / rate;
            *slot += (2.0 * PI * burst.frequency_hz * t).sin() * burst.envelope(t * 1000.0);
        }
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::fft::dominant_frequency;

    #[test]
    fn pattern_shapes() {
        assert_eq!(BeepKind::Scan.bursts().len(), 1);
        assert_eq!(BeepKind::Detection.bursts().len(), 2);
        assert_eq!(BeepKind::Alert.bursts().len(), 3);
        assert_eq!(BeepKind::Alert.duration_ms(), 400);
        assert_eq!(BeepKind::Detection.duration_ms(), 350);
    }

    #[test]
    fn envelope_ramps_then_decays() {
        let burst = BeepKind::Scan.bursts()[0];
        assert_eq!(burst.envelope(0.0), 0.0);
        assert!((burst.envelope(ATTACK_MS) - 0.2).abs() < 1e-6);
        assert!((burst.envelope(5.0) - 0.1).abs() < 1e-6);
        let tail = burst.envelope(49.999);
        assert!(tail > 0.0 && tail < 0.0011);
        assert_eq!(burst.envelope(50.0), 0.0);
    }

    #[test]
    fn synthesized_length_matches_pattern() {
        let pcm = synthesize(BeepKind::Detection, 8_000);
        assert_eq!(pcm.len(), 2_800);
        assert!(pcm.iter().all(|sample| sample.abs() <= 1.0));
    }

    #[test]
    fn synthesized_tones_have_expected_pitch() {
        let scan = synthesize(BeepKind::Scan, 8_000);
        assert_eq!(dominant_frequency(&scan, 8_000), Some(400.0));

        let alert = synthesize(BeepKind::Alert, 8_000);
        assert_eq!(dominant_frequency(&alert, 8_000), Some(1500.0));
    }
}
