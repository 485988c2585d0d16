use crate::prelude::RadarConfig;
use crate::scan::cleanup::{self, CleanupReport};
use crate::scan::reading::{DetectedObject, Reading};
use crate::scan::sampler::{RawSample, SampleGenerator};
use crate::scan::tracker::Tracker;
use crate::scan::MAX_ANGLE_DEG;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Idle,
    Scanning,
}

/// What one scan tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub reading: Reading,
    pub detection: Option<DetectedObject>,
}

/// Sweep state: current angle plus bounded reading and object histories.
pub struct ScanState {
    mode: ScanMode,
    angle_deg: f32,
    readings: Vec<Reading>,
    objects: Vec<DetectedObject>,
    tracker: Tracker,
    next_object_seq: u64,
    angle_step: f32,
    history_cap: usize,
    reading_ttl_ms: u64,
    object_cap: usize,
    detection_threshold: f32,
    merge_window_deg: f32,
}

impl ScanState {
    pub fn new(config: &RadarConfig) -> Self {
        Self {
            mode: ScanMode::Idle,
            angle_deg: 0.0,
            readings: Vec::with_capacity(config.history_cap),
            objects: Vec::new(),
            tracker: Tracker::from_config(config),
            next_object_seq: 0,
            angle_step: config.angle_step,
            history_cap: config.history_cap,
            reading_ttl_ms: config.reading_ttl_ms,
            object_cap: config.object_cap,
            detection_threshold: config.detection_threshold(),
            merge_window_deg: config.merge_window_deg,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn is_scanning(&self) -> bool {
        self.mode == ScanMode::Scanning
    }

    pub fn angle(&self) -> f32 {
        self.angle_deg
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn objects(&self) -> &[DetectedObject] {
        &self.objects
    }

    pub fn tracking_enabled(&self) -> bool {
        self.tracker.enabled
    }

    pub fn set_tracking(&mut self, enabled: bool) {
        self.tracker.enabled = enabled;
    }

    /// Returns `true` when the mode actually changed.
    pub fn start(&mut self) -> bool {
        let changed = self.mode == ScanMode::Idle;
        self.mode = ScanMode::Scanning;
        changed
    }

    pub fn stop(&mut self) -> bool {
        let changed = self.mode == ScanMode::Scanning;
        self.mode = ScanMode::Idle;
        changed
    }

    pub fn toggle(&mut self) -> ScanMode {
        if self.is_scanning() {
            self.stop();
        } else {
            self.start();
        }
        self.mode
    }

    /// Advances the sweep one step and samples it. Idle state yields nothing.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        sampler: &SampleGenerator,
        rng: &mut R,
        now_ms: u64,
    ) -> Option<TickOutcome> {
        if !self.is_scanning() {
            return None;
        }
        let angle = self.advance_angle();
        let sample = sampler.sample(angle, rng);
        Some(self.record(angle, sample, now_ms))
    }

    fn advance_angle(&mut self) -> f32 {
        self.angle_deg = (self.angle_deg + self.angle_step) % MAX_ANGLE_DEG;
        self.angle_deg
    }

    /// Appends a reading and merges a detection if the raw sample is close enough.
    pub fn record(&mut self, angle_deg: f32, sample: RawSample, now_ms: u64) -> TickOutcome {
        let reading = Reading::new(angle_deg, sample.distance_cm, now_ms);
        self.readings.push(reading);
        cleanup::keep_newest(&mut self.readings, self.history_cap);

        let detection = (sample.raw_cm < self.detection_threshold)
            .then(|| self.merge_detection(angle_deg, sample.distance_cm, now_ms));

        TickOutcome { reading, detection }
    }

    fn merge_detection(&mut self, angle_deg: f32, distance_cm: f32, now_ms: u64) -> DetectedObject {
        let tracked = self.tracker.is_tracked(angle_deg, distance_cm, &self.objects);

        let window = self.merge_window_deg;
        self.objects
            .retain(|object| (object.angle_deg - angle_deg).abs() > window);

        let id = format!(
            "obj_{}_{}_{}",
            angle_deg.round() as i64,
            now_ms,
            self.next_object_seq
        );
        self.next_object_seq += 1;

        let object = DetectedObject::new(id, angle_deg, distance_cm, now_ms).with_tracked(tracked);
        self.objects.push(object.clone());
        object
    }

    /// Inserts an object as-is, bypassing merging and tracking.
    pub fn push_object(&mut self, object: DetectedObject) {
        self.objects.push(object);
    }

    pub fn cleanup(&mut self, now_ms: u64) -> CleanupReport {
        CleanupReport {
            expired_readings: cleanup::prune_readings(
                &mut self.readings,
                now_ms,
                self.reading_ttl_ms,
            ),
            dropped_objects: cleanup::cap_objects(&mut self.objects, self.object_cap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::sampler::SamplerConfig;
    use rand::{rngs::StdRng, SeedableRng};

    fn raw(distance: f32) -> RawSample {
        RawSample {
            raw_cm: distance,
            distance_cm: distance,
        }
    }

    #[test]
    fn idle_state_does_not_sample() {
        let config = RadarConfig::default();
        let mut state = ScanState::new(&config);
        let sampler = SampleGenerator::new(SamplerConfig::default(), config.max_range);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(state.tick(&sampler, &mut rng, 50).is_none());
        assert!(state.readings().is_empty());
    }

    #[test]
    fn angle_wraps_modulo_sweep() {
        let config = RadarConfig::default();
        let mut state = ScanState::new(&config);
        let sampler = SampleGenerator::new(SamplerConfig::default(), config.max_range);
        let mut rng = StdRng::seed_from_u64(2);
        state.start();
        for step in 1..=90u64 {
            let outcome = state.tick(&sampler, &mut rng, step * 50).unwrap();
            assert!((0.0..=MAX_ANGLE_DEG).contains(&outcome.reading.angle_deg));
        }
        assert_eq!(state.angle(), 0.0);
    }

    #[test]
    fn history_never_exceeds_cap() {
        let config = RadarConfig {
            history_cap: 20,
            ..Default::default()
        };
        let mut state = ScanState::new(&config);
        for step in 0..100u64 {
            state.record(step as f32 % 180.0, raw(500.0), step);
            assert!(state.readings().len() <= 20);
        }
        assert_eq!(state.readings()[0].timestamp_ms, 80);
    }

    #[test]
    fn far_sample_is_not_a_detection() {
        let mut state = ScanState::new(&RadarConfig::default());
        let outcome = state.record(40.0, raw(450.0), 0);
        assert!(outcome.detection.is_none());
        let outcome = state.record(40.0, raw(449.0), 0);
        assert!(outcome.detection.is_some());
    }

    #[test]
    fn nearby_objects_are_replaced() {
        let mut state = ScanState::new(&RadarConfig::default());
        state.record(30.0, raw(120.0), 0);
        state.record(50.0, raw(120.0), 50);
        state.record(40.0, raw(100.0), 100);
        let angles: Vec<f32> = state.objects().iter().map(|o| o.angle_deg).collect();
        assert_eq!(angles, vec![40.0]);

        state.record(51.0, raw(100.0), 150);
        assert_eq!(state.objects().len(), 2);
    }

    #[test]
    fn object_ids_are_unique() {
        let mut state = ScanState::new(&RadarConfig::default());
        state.record(30.0, raw(120.0), 0);
        state.record(90.0, raw(120.0), 0);
        let ids: Vec<&str> = state.objects().iter().map(|o| o.id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn detection_near_tracked_object_inherits_flag() {
        let mut state = ScanState::new(&RadarConfig::default());
        state.push_object(DetectedObject::new("seed", 60.0, 100.0, 0).with_tracked(true));
        let outcome = state.record(62.0, raw(110.0), 50);
        assert!(outcome.detection.unwrap().tracked);

        state.set_tracking(false);
        let outcome = state.record(64.0, raw(110.0), 100);
        assert!(!outcome.detection.unwrap().tracked);
    }

    #[test]
    fn cleanup_applies_ttl_and_object_cap() {
        let mut state = ScanState::new(&RadarConfig::default());
        for idx in 0..40u64 {
            state.push_object(DetectedObject::new(format!("o{idx}"), idx as f32 * 4.0, 100.0, idx));
            state.record(0.0, raw(500.0), idx * 1_000);
        }
        let report = state.cleanup(40_000);
        assert_eq!(report.dropped_objects, 10);
        assert!(state.objects().len() <= 30);
        assert!(state
            .readings()
            .iter()
            .all(|reading| reading.age_ms(40_000) < 15_000));
        assert_eq!(report.expired_readings, 26);
    }

    #[test]
    fn toggle_switches_modes() {
        let mut state = ScanState::new(&RadarConfig::default());
        assert_eq!(state.toggle(), ScanMode::Scanning);
        assert!(!state.start());
        assert_eq!(state.toggle(), ScanMode::Idle);
    }
}
