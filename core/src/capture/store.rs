use crate::capture::naming::capture_name;
use crate::feedback::announcer::BoundedKeySet;
use crate::prelude::RadarResult;
use crate::render::{compose_snapshot, encode_png, rasterize};
use crate::scan::{DetectedObject, MAX_ANGLE_DEG, MIN_DISTANCE_CM};
use chrono::{DateTime, Utc};
use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CAPTURE_LIMIT: usize = 10;
pub const CAPTURE_MAX_DISTANCE_CM: f32 = 490.0;
pub const AUTO_CAPTURE_INTERVAL_MS: u64 = 500;
const CAPTURED_KEY_BOUND: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOrigin {
    Auto,
    Manual,
}

/// Rendered snapshot of a detected object.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub id: String,
    pub name: String,
    pub image: RgbaImage,
    pub captured_at: DateTime<Utc>,
    pub angle_deg: f32,
    pub distance_cm: f32,
    pub origin: CaptureOrigin,
}

/// Capture metadata without the bitmap, for listings and sidecar files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub id: String,
    pub name: String,
    pub captured_at: DateTime<Utc>,
    pub angle_deg: f32,
    pub distance_cm: f32,
    pub origin: CaptureOrigin,
}

impl CapturedImage {
    pub fn summary(&self) -> CaptureSummary {
        CaptureSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            captured_at: self.captured_at,
            angle_deg: self.angle_deg,
            distance_cm: self.distance_cm,
            origin: self.origin,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    pub fn to_png(&self) -> RadarResult<Vec<u8>> {
        encode_png(&self.image)
    }

    /// Writes `<name>.png` and a `<name>.json` sidecar into `dir`.
    pub fn export(&self, dir: &Path) -> RadarResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let image_path = dir.join(self.file_name());
        fs::write(&image_path, self.to_png()?)?;
        let sidecar = serde_json::to_vec_pretty(&self.summary())?;
        fs::write(dir.join(format!("{}.json", self.name)), sidecar)?;
        Ok(image_path)
    }
}

/// Objects worth photographing: not at the range ceiling, not noise, on the sweep.
pub fn is_capture_target(object: &DetectedObject) -> bool {
    object.distance_cm < CAPTURE_MAX_DISTANCE_CM
        && object.distance_cm > MIN_DISTANCE_CM
        && (0.0..=MAX_ANGLE_DEG).contains(&object.angle_deg)
}

/// Newest-ten gallery of captured snapshots.
pub struct CaptureLog {
    images: Vec<CapturedImage>,
    seen: BoundedKeySet,
    last_capture_ms: Option<u64>,
    next_seq: u64,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self {
            images: Vec::with_capacity(CAPTURE_LIMIT),
            seen: BoundedKeySet::new(CAPTURED_KEY_BOUND),
            last_capture_ms: None,
            next_seq: 0,
        }
    }

    pub fn valid_targets(objects: &[DetectedObject]) -> Vec<&DetectedObject> {
        objects.iter().filter(|object| is_capture_target(object)).collect()
    }

    fn key(object: &DetectedObject) -> String {
        let (angle, distance) = object.rounded();
        format!("{angle}_{distance}")
    }

    /// Captures the first unseen valid object, at most once per interval.
    pub fn auto_capture<R: Rng + ?Sized>(
        &mut self,
        objects: &[DetectedObject],
        scanning: bool,
        now_ms: u64,
        at: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<CaptureSummary> {
        if !scanning {
            return None;
        }
        let throttled = self
            .last_capture_ms
            .map_or(false, |last| now_ms.saturating_sub(last) <= AUTO_CAPTURE_INTERVAL_MS);

        let captured = if throttled {
            None
        } else {
            Self::valid_targets(objects)
                .into_iter()
                .find(|object| !self.seen.contains(&Self::key(object)))
                .cloned()
                .map(|object| {
                    self.seen.insert(Self::key(&object));
                    self.last_capture_ms = Some(now_ms);
                    let id = format!("auto_{}_{}", object.id, now_ms);
                    self.store(id, &object, CaptureOrigin::Auto, at, rng)
                })
        };

        self.seen.enforce_bound();
        captured
    }

    /// Captures the newest valid object; a no-op when none qualifies.
    pub fn manual_capture<R: Rng + ?Sized>(
        &mut self,
        objects: &[DetectedObject],
        now_ms: u64,
        at: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<CaptureSummary> {
        let latest = Self::valid_targets(objects).last().copied().cloned()?;
        let id = format!("manual_{}_{}", now_ms, self.next_seq);
        Some(self.store(id, &latest, CaptureOrigin::Manual, at, rng))
    }

    fn store<R: Rng + ?Sized>(
        &mut self,
        id: String,
        object: &DetectedObject,
        origin: CaptureOrigin,
        at: DateTime<Utc>,
        rng: &mut R,
    ) -> CaptureSummary {
        self.next_seq += 1;
        let time_label = at.format("%H:%M:%S").to_string();
        let layout = compose_snapshot(object.angle_deg, object.distance_cm, &time_label, rng);
        let image = CapturedImage {
            id,
            name: capture_name(object.angle_deg, object.distance_cm, at),
            image: rasterize(&layout),
            captured_at: at,
            angle_deg: object.angle_deg,
            distance_cm: object.distance_cm,
            origin,
        };
        let summary = image.summary();
        self.images.push(image);
        crate::scan::cleanup::keep_newest(&mut self.images, CAPTURE_LIMIT);
        summary
    }

    pub fn get(&self, id: &str) -> Option<&CapturedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn summaries(&self) -> Vec<CaptureSummary> {
        self.images.iter().map(CapturedImage::summary).collect()
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        before != self.images.len()
    }

    /// Removes every capture and forgets which objects were photographed.
    pub fn clear(&mut self) {
        self.images.clear();
        self.seen.clear();
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn object(angle: f32, distance: f32) -> DetectedObject {
        DetectedObject::new(format!("obj_{angle}"), angle, distance, 0)
    }

    #[test]
    fn target_filter_excludes_range_ceiling_and_noise() {
        assert!(is_capture_target(&object(60.0, 85.0)));
        assert!(!is_capture_target(&object(60.0, 490.0)));
        assert!(!is_capture_target(&object(60.0, 10.0)));
    }

    #[test]
    fn manual_capture_without_targets_is_noop() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(log
            .manual_capture(&[object(60.0, 495.0)], 0, at(), &mut rng)
            .is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn manual_capture_uses_newest_target() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let objects = vec![object(30.0, 120.0), object(90.0, 210.0)];
        let summary = log.manual_capture(&objects, 0, at(), &mut rng).unwrap();
        assert_eq!(summary.angle_deg, 90.0);
        assert_eq!(summary.origin, CaptureOrigin::Manual);
        assert_eq!(summary.name, "Medium_Target_E_210cm_093000");
        assert_eq!(log.get(&summary.id).unwrap().image.dimensions(), (320, 240));
    }

    #[test]
    fn auto_capture_is_throttled_and_deduplicated() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(2);
        let objects = vec![object(30.0, 120.0), object(90.0, 210.0)];

        assert!(log.auto_capture(&objects, false, 0, at(), &mut rng).is_none());
        let first = log.auto_capture(&objects, true, 0, at(), &mut rng).unwrap();
        assert_eq!(first.angle_deg, 30.0);
        assert!(log.auto_capture(&objects, true, 500, at(), &mut rng).is_none());
        let second = log.auto_capture(&objects, true, 501, at(), &mut rng).unwrap();
        assert_eq!(second.angle_deg, 90.0);
        assert!(log.auto_capture(&objects, true, 2_000, at(), &mut rng).is_none());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn auto_capture_takes_one_image_per_evaluation() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(5);
        let objects = vec![
            object(30.0, 120.0),
            object(90.0, 210.0),
            object(150.0, 300.0),
        ];
        let summary = log.auto_capture(&objects, true, 0, at(), &mut rng).unwrap();
        assert_eq!(summary.angle_deg, 30.0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn gallery_keeps_newest_ten() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(3);
        for idx in 0..12 {
            let objects = vec![object(idx as f32 * 10.0, 100.0 + idx as f32)];
            log.manual_capture(&objects, idx, at(), &mut rng).unwrap();
        }
        assert_eq!(log.len(), 10);
        assert_eq!(log.images()[0].angle_deg, 20.0);
    }

    #[test]
    fn delete_and_clear() {
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(4);
        let objects = vec![object(30.0, 120.0)];
        let summary = log.auto_capture(&objects, true, 0, at(), &mut rng).unwrap();
        assert!(log.delete(&summary.id));
        assert!(!log.delete(&summary.id));

        log.auto_capture(&objects, true, 1_000, at(), &mut rng);
        assert!(log.is_empty(), "already-captured key must not re-trigger");
        log.clear();
        assert!(log.auto_capture(&objects, true, 2_000, at(), &mut rng).is_some());
    }

    #[test]
    fn export_writes_png_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = CaptureLog::new();
        let mut rng = StdRng::seed_from_u64(5);
        let summary = log
            .manual_capture(&[object(60.0, 85.0)], 0, at(), &mut rng)
            .unwrap();
        let path = log.get(&summary.id).unwrap().export(dir.path()).unwrap();
        assert!(path.ends_with("Close_Object_NE_85cm_093000.png"));
        let sidecar = std::fs::read_to_string(dir.path().join("Close_Object_NE_85cm_093000.json")).unwrap();
        let parsed: CaptureSummary = serde_json::from_str(&sidecar).unwrap();
        assert_eq!(parsed, summary);
    }
}
