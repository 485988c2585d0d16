use crate::prelude::RadarConfig;
use crate::scan::reading::DetectedObject;

/// Nearest-neighbour heuristic that carries the `tracked` flag forward.
///
/// A new detection is tracked only when an already tracked object lies within
/// both tolerances, boundaries included. There is no identity or motion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracker {
    pub enabled: bool,
    pub angle_tolerance_deg: f32,
    pub distance_tolerance_cm: f32,
}

impl Tracker {
    pub fn from_config(config: &RadarConfig) -> Self {
        Self {
            enabled: config.tracking_enabled,
            angle_tolerance_deg: config.tracking_angle_deg,
            distance_tolerance_cm: config.tracking_distance_cm,
        }
    }

    pub fn is_tracked(&self, angle_deg: f32, distance_cm: f32, existing: &[DetectedObject]) -> bool {
        self.enabled
            && existing.iter().any(|object| {
                object.tracked
                    && (object.angle_deg - angle_deg).abs() <= self.angle_tolerance_deg
                    && (object.distance_cm - distance_cm).abs() <= self.distance_tolerance_cm
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> Tracker {
        Tracker::from_config(&RadarConfig::default())
    }

    fn tracked_at(angle: f32, distance: f32) -> DetectedObject {
        DetectedObject::new("seed", angle, distance, 0).with_tracked(true)
    }

    #[test]
    fn match_on_tolerance_boundary_is_tracked() {
        let existing = vec![tracked_at(60.0, 100.0)];
        assert!(tracker().is_tracked(75.0, 130.0, &existing));
        assert!(tracker().is_tracked(45.0, 70.0, &existing));
    }

    #[test]
    fn one_unit_outside_tolerance_is_not_tracked() {
        let existing = vec![tracked_at(60.0, 100.0)];
        assert!(!tracker().is_tracked(76.0, 100.0, &existing));
        assert!(!tracker().is_tracked(60.0, 131.0, &existing));
    }

    #[test]
    fn untracked_neighbours_do_not_count() {
        let existing = vec![DetectedObject::new("plain", 60.0, 100.0, 0)];
        assert!(!tracker().is_tracked(60.0, 100.0, &existing));
    }

    #[test]
    fn disabled_tracker_never_marks() {
        let mut disabled = tracker();
        disabled.enabled = false;
        let existing = vec![tracked_at(60.0, 100.0)];
        assert!(!disabled.is_tracked(60.0, 100.0, &existing));
    }
}
