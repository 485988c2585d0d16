use crate::feedback::classify::object_name;
use crate::feedback::voice::VoiceContext;
use crate::scan::DetectedObject;
use std::collections::HashSet;

/// Key set that forgets everything once it grows past its bound.
#[derive(Debug, Clone)]
pub struct BoundedKeySet {
    keys: HashSet<String>,
    bound: usize,
}

impl BoundedKeySet {
    pub fn new(bound: usize) -> Self {
        Self {
            keys: HashSet::new(),
            bound,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `true` if the key was not present.
    pub fn insert(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Clears the set if it exceeds its bound; returns whether it did.
    pub fn enforce_bound(&mut self) -> bool {
        if self.keys.len() > self.bound {
            self.keys.clear();
            true
        } else {
            false
        }
    }
}

pub const ANNOUNCED_KEY_BOUND: usize = 50;

/// Speaks each newly seen object once.
pub struct Announcer {
    announced: BoundedKeySet,
}

impl Announcer {
    pub fn new() -> Self {
        Self {
            announced: BoundedKeySet::new(ANNOUNCED_KEY_BOUND),
        }
    }

    pub fn key(object: &DetectedObject) -> String {
        let (angle, distance) = object.rounded();
        format!("{angle}|{distance}")
    }

    pub fn phrase(object: &DetectedObject) -> String {
        let (angle, distance) = object.rounded();
        format!(
            "{} detected at {} degrees, {} centimeters",
            object_name(object.angle_deg, object.distance_cm),
            angle,
            distance
        )
    }

    /// Announces unseen objects through `voice` and returns the phrases spoken.
    pub fn process(&mut self, objects: &[DetectedObject], voice: &mut VoiceContext) -> Vec<String> {
        let mut spoken = Vec::new();
        for object in objects {
            if self.announced.insert(Self::key(object)) {
                let phrase = Self::phrase(object);
                voice.speak(&phrase);
                spoken.push(phrase);
            }
        }
        self.announced.enforce_bound();
        spoken
    }

    pub fn announced_count(&self) -> usize {
        self.announced.len()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(angle: f32, distance: f32) -> DetectedObject {
        DetectedObject::new(format!("obj_{angle}"), angle, distance, 0)
    }

    #[test]
    fn phrases_use_severity_labels() {
        assert_eq!(
            Announcer::phrase(&object(60.0, 85.0)),
            "Close object detected at 60 degrees, 85 centimeters"
        );
        assert_eq!(
            Announcer::phrase(&object(30.0, 60.0)),
            "Critical obstacle detected at 30 degrees, 60 centimeters"
        );
        assert_eq!(
            Announcer::phrase(&object(150.0, 400.0)),
            "Remote contact detected at 150 degrees, 400 centimeters"
        );
    }

    #[test]
    fn same_rounded_key_is_announced_once() {
        let mut announcer = Announcer::new();
        let mut voice = VoiceContext::new();
        let first = announcer.process(&[object(60.0, 85.2)], &mut voice);
        let second = announcer.process(&[object(60.2, 84.9)], &mut voice);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(voice.fallback().spoken().count(), 1);
    }

    #[test]
    fn set_clears_after_exceeding_bound() {
        let mut announcer = Announcer::new();
        let mut voice = VoiceContext::new();
        let batch: Vec<DetectedObject> = (0..51).map(|idx| object(idx as f32, 100.0)).collect();
        assert_eq!(announcer.process(&batch, &mut voice).len(), 51);
        assert_eq!(announcer.announced_count(), 0);
        // Forgotten keys may be announced again.
        assert_eq!(announcer.process(&batch[..1], &mut voice).len(), 1);
    }

    #[test]
    fn bounded_set_keeps_entries_up_to_bound() {
        let mut set = BoundedKeySet::new(2);
        set.insert("a".into());
        set.insert("b".into());
        assert!(!set.enforce_bound());
        set.insert("c".into());
        assert!(set.enforce_bound());
        assert!(set.is_empty());
    }
}
