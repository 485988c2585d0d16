use serde::{Deserialize, Serialize};

/// Five distance bands used for spoken labels and capture names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Close,
    Medium,
    Distant,
    Remote,
}

impl Severity {
    pub fn from_distance(distance_cm: f32) -> Self {
        if distance_cm < 80.0 {
            Severity::Critical
        } else if distance_cm < 150.0 {
            Severity::Close
        } else if distance_cm < 250.0 {
            Severity::Medium
        } else if distance_cm < 350.0 {
            Severity::Distant
        } else {
            Severity::Remote
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical obstacle",
            Severity::Close => "Close object",
            Severity::Medium => "Medium target",
            Severity::Distant => "Distant object",
            Severity::Remote => "Remote contact",
        }
    }

    pub fn file_tag(self) -> &'static str {
        match self {
            Severity::Critical => "Critical_Target",
            Severity::Close => "Close_Object",
            Severity::Medium => "Medium_Target",
            Severity::Distant => "Distant_Object",
            Severity::Remote => "Remote_Contact",
        }
    }
}

/// Label for an object at the given position. Only distance matters today.
pub fn object_name(_angle_deg: f32, distance_cm: f32) -> &'static str {
    Severity::from_distance(distance_cm).label()
}

/// Eight-point compass direction in 45° buckets offset by 22.5°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    pub fn from_angle(angle_deg: f32) -> Self {
        let bucket = ((angle_deg + 22.5).rem_euclid(360.0) / 45.0).floor() as usize;
        Self::ALL.get(bucket).copied().unwrap_or(Compass::N)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compass::N => "N",
            Compass::NE => "NE",
            Compass::E => "E",
            Compass::SE => "SE",
            Compass::S => "S",
            Compass::SW => "SW",
            Compass::W => "W",
            Compass::NW => "NW",
        }
    }
}

/// Coarse range wording printed on captured snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    Close,
    Mid,
    Far,
}

impl RangeBand {
    pub fn from_distance(distance_cm: f32) -> Self {
        if distance_cm < 100.0 {
            RangeBand::Close
        } else if distance_cm < 250.0 {
            RangeBand::Mid
        } else {
            RangeBand::Far
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeBand::Close => "CLOSE",
            RangeBand::Mid => "MID",
            RangeBand::Far => "FAR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_distance_bands() {
        assert_eq!(object_name(60.0, 85.0), "Close object");
        assert_eq!(object_name(30.0, 60.0), "Critical obstacle");
        assert_eq!(object_name(150.0, 400.0), "Remote contact");
        assert_eq!(object_name(90.0, 200.0), "Medium target");
        assert_eq!(object_name(120.0, 349.9), "Distant object");
    }

    #[test]
    fn band_edges_belong_to_the_farther_band() {
        assert_eq!(Severity::from_distance(80.0), Severity::Close);
        assert_eq!(Severity::from_distance(150.0), Severity::Medium);
        assert_eq!(Severity::from_distance(350.0), Severity::Remote);
    }

    #[test]
    fn compass_buckets_are_offset() {
        assert_eq!(Compass::from_angle(0.0), Compass::N);
        assert_eq!(Compass::from_angle(22.4), Compass::N);
        assert_eq!(Compass::from_angle(22.5), Compass::NE);
        assert_eq!(Compass::from_angle(90.0), Compass::E);
        assert_eq!(Compass::from_angle(180.0), Compass::S);
        assert_eq!(Compass::from_angle(340.0), Compass::N);
    }

    #[test]
    fn range_band_wording() {
        assert_eq!(RangeBand::from_distance(99.0).as_str(), "CLOSE");
        assert_eq!(RangeBand::from_distance(100.0).as_str(), "MID");
        assert_eq!(RangeBand::from_distance(250.0).as_str(), "FAR");
    }
}
