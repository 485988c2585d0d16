use serde::{Deserialize, Serialize};

/// Shared configuration for the sweep, tracking and feedback stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub max_range: f32,
    pub angle_step: f32,
    pub scan_period_ms: u64,
    pub cleanup_period_ms: u64,
    pub history_cap: usize,
    pub reading_ttl_ms: u64,
    pub object_cap: usize,
    /// Fraction of `max_range` below which a raw sample counts as an object.
    pub detection_ratio: f32,
    /// Existing objects closer than this (degrees) to a new detection are replaced.
    pub merge_window_deg: f32,
    pub tracking_angle_deg: f32,
    pub tracking_distance_cm: f32,
    pub trail_fade_ms: u64,
    pub beep_enabled: bool,
    pub alerts_enabled: bool,
    pub tracking_enabled: bool,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            max_range: 500.0,
            angle_step: 2.0,
            scan_period_ms: 50,
            cleanup_period_ms: 2_000,
            history_cap: 500,
            reading_ttl_ms: 15_000,
            object_cap: 30,
            detection_ratio: 0.9,
            merge_window_deg: 10.0,
            tracking_angle_deg: 15.0,
            tracking_distance_cm: 30.0,
            trail_fade_ms: 5_000,
            beep_enabled: true,
            alerts_enabled: true,
            tracking_enabled: true,
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> RadarResult<()> {
        if !self.max_range.is_finite() || self.max_range < crate::scan::MIN_DISTANCE_CM {
            return Err(RadarError::InvalidConfig(format!(
                "max_range must be at least {} cm",
                crate::scan::MIN_DISTANCE_CM
            )));
        }
        if !self.angle_step.is_finite()
            || self.angle_step <= 0.0
            || self.angle_step > crate::scan::MAX_ANGLE_DEG
        {
            return Err(RadarError::InvalidConfig(
                "angle_step must lie in (0, 180]".into(),
            ));
        }
        if self.scan_period_ms == 0 || self.cleanup_period_ms == 0 {
            return Err(RadarError::InvalidConfig(
                "tick periods must be non-zero".into(),
            ));
        }
        if self.history_cap == 0 || self.object_cap == 0 {
            return Err(RadarError::InvalidConfig("caps must be non-zero".into()));
        }
        if !self.detection_ratio.is_finite()
            || self.detection_ratio <= 0.0
            || self.detection_ratio > 1.0
        {
            return Err(RadarError::InvalidConfig(
                "detection_ratio must lie in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Raw distance below which a sample is classified as a detected object.
    pub fn detection_threshold(&self) -> f32 {
        self.max_range * self.detection_ratio
    }
}

/// Common error type for the radar core.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("metadata serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RadarResult<T> = Result<T, RadarError>;
