pub mod naming;
pub mod store;

pub use naming::capture_name;
pub use store::{CaptureLog, CaptureOrigin, CaptureSummary, CapturedImage};
