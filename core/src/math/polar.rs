use crate::render::display::Point;
use std::f32::consts::PI;

/// Screen-space angle (radians, y axis down) of a sweep bearing in degrees.
pub fn screen_angle(angle_deg: f32) -> f32 {
    PI - angle_deg.to_radians()
}

/// Projects a sweep bearing and pixel radius onto the canvas.
pub fn project(center: Point, angle_deg: f32, radius: f32) -> Point {
    let theta = screen_angle(angle_deg);
    Point::new(center.x + theta.cos() * radius, center.y + theta.sin() * radius)
}

/// Scales a distance into pixels, saturating at the outer ring.
pub fn scale_distance(distance_cm: f32, max_range: f32, max_radius: f32) -> f32 {
    if max_range <= 0.0 {
        return 0.0;
    }
    distance_cm.min(max_range) / max_range * max_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn cardinal_bearings_project_as_expected() {
        let center = Point::new(100.0, 100.0);
        assert!(close(project(center, 0.0, 50.0), Point::new(50.0, 100.0)));
        assert!(close(project(center, 90.0, 50.0), Point::new(100.0, 150.0)));
        assert!(close(project(center, 180.0, 50.0), Point::new(150.0, 100.0)));
    }

    #[test]
    fn distance_scaling_saturates() {
        assert_eq!(scale_distance(250.0, 500.0, 200.0), 100.0);
        assert_eq!(scale_distance(900.0, 500.0, 200.0), 200.0);
    }
}
