use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    fft: std::sync::Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Zero-pads or truncates `input` to the planned size before transforming.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex32::zero());
        self.fft.process(&mut buffer);
        buffer
    }
}

/// Frequency of the strongest non-DC bin of a real signal.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> Option<f32> {
    if samples.len() < 2 || sample_rate == 0 {
        return None;
    }
    let spectrum = FftHelper::new(samples.len()).forward(samples);
    let half = samples.len() / 2;
    let (bin, magnitude) = spectrum[1..=half]
        .iter()
        .enumerate()
        .map(|(idx, value)| (idx + 1, value.norm()))
        .fold((0, 0.0f32), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });
    (magnitude > 0.0).then(|| bin as f32 * sample_rate as f32 / samples.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn fft_helper_returns_planned_length() {
        let helper = FftHelper::new(4);
        let output = helper.forward(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn pure_sine_peaks_at_its_frequency() {
        let rate = 8_000;
        let samples: Vec<f32> = (0..800)
            .map(|n| (2.0 * PI * 500.0 * n as f32 / rate as f32).sin())
            .collect();
        assert_eq!(dominant_frequency(&samples, rate), Some(500.0));
    }

    #[test]
    fn silence_has_no_dominant_frequency() {
        assert_eq!(dominant_frequency(&[0.0; 64], 8_000), None);
        assert_eq!(dominant_frequency(&[1.0], 8_000), None);
    }
}
