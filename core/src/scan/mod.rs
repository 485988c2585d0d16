pub mod cleanup;
pub mod reading;
pub mod sampler;
pub mod scheduler;
pub mod state;
pub mod tracker;

pub use cleanup::CleanupReport;
pub use reading::{DetectedObject, Reading};
pub use sampler::{EchoZone, RawSample, SampleGenerator, SamplerConfig};
pub use scheduler::{Scheduler, Tick};
pub use state::{ScanMode, ScanState, TickOutcome};
pub use tracker::Tracker;

/// Closest distance the simulated transducer reports.
pub const MIN_DISTANCE_CM: f32 = 10.0;
/// Upper bound of the sweep; angles live in `[0, MAX_ANGLE_DEG]`.
pub const MAX_ANGLE_DEG: f32 = 180.0;
