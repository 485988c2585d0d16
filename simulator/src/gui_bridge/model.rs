use radarcore::capture::CaptureSummary;
use radarcore::scan::ScanMode;
use radarcore::Command;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: Command,
}

/// Toggle state after a command, so the client can redraw its controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReply {
    pub status: String,
    pub mode: ScanMode,
    pub beep_enabled: bool,
    pub alerts_enabled: bool,
    pub tracking_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReply {
    pub status: String,
    pub capture: Option<CaptureSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StatusReply {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            detail: Some(detail.into()),
        }
    }
}
