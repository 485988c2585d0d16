//! Core sweep engine for the simulated ultrasonic radar.
//!
//! The modules cover the whole loop: synthetic sampling and detection,
//! heuristic tracking, decay, audio/voice feedback, polar rendering to a
//! backend-neutral display list, and snapshot capture.

pub mod capture;
pub mod feedback;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scan;
pub mod session;
pub mod telemetry;

pub use prelude::{RadarConfig, RadarError, RadarResult};
pub use session::{Command, Session, SessionEvent, SessionSnapshot};
