use crate::feedback::classify::{Compass, Severity};
use chrono::{DateTime, Utc};

/// Export name: severity tag, compass direction, distance and UTC time of day.
pub fn capture_name(angle_deg: f32, distance_cm: f32, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}cm_{}",
        Severity::from_distance(distance_cm).file_tag(),
        Compass::from_angle(angle_deg).as_str(),
        distance_cm.round() as i64,
        at.format("%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn name_combines_tag_direction_distance_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 14, 3, 9).unwrap();
        assert_eq!(capture_name(60.0, 85.0, at), "Close_Object_NE_85cm_140309");
        assert_eq!(capture_name(150.0, 400.0, at), "Remote_Contact_SE_400cm_140309");
        assert_eq!(capture_name(10.0, 40.0, at), "Critical_Target_N_40cm_140309");
    }
}
