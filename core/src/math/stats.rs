use crate::scan::{DetectedObject, Reading};

pub struct StatsHelper;

impl StatsHelper {
    pub fn min(values: impl IntoIterator<Item = f32>) -> Option<f32> {
        values.into_iter().fold(None, |acc, value| match acc {
            Some(current) if current <= value => Some(current),
            _ => Some(value),
        })
    }

    pub fn mean(values: impl IntoIterator<Item = f32>) -> Option<f32> {
        let (sum, count) = values
            .into_iter()
            .fold((0.0f32, 0usize), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum / count as f32)
    }

    pub fn closest_object(objects: &[DetectedObject]) -> Option<f32> {
        Self::min(objects.iter().map(|object| object.distance_cm))
    }

    pub fn mean_object_distance(objects: &[DetectedObject]) -> Option<f32> {
        Self::mean(objects.iter().map(|object| object.distance_cm))
    }

    /// Newest readings first.
    pub fn recent_readings(readings: &[Reading], count: usize) -> Vec<Reading> {
        readings.iter().rev().take(count).copied().collect()
    }

    /// Newest `count` objects, oldest first.
    pub fn recent_objects(objects: &[DetectedObject], count: usize) -> &[DetectedObject] {
        &objects[objects.len().saturating_sub(count)..]
    }
}
