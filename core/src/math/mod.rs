pub mod fft;
pub mod polar;
pub mod stats;

pub use fft::{dominant_frequency, FftHelper};
pub use stats::StatsHelper;
