use crate::feedback::classify::RangeBand;
use crate::render::display::{DisplayList, DrawCommand, Layer, Point, Rgba, TextAlign};
use rand::Rng;

pub const SNAPSHOT_WIDTH: f32 = 320.0;
pub const SNAPSHOT_HEIGHT: f32 = 240.0;
const STATIC_SPECKS: usize = 1_000;
const ACCENT: Rgba = Rgba::hex(0x10b981);

pub fn target_color(distance_cm: f32) -> Rgba {
    if distance_cm > 350.0 {
        Rgba::hex(0x84cc16)
    } else if distance_cm > 200.0 {
        Rgba::hex(0xeab308)
    } else if distance_cm > 100.0 {
        Rgba::hex(0xf97316)
    } else {
        Rgba::hex(0xef4444)
    }
}

/// Where the target sits on the snapshot; this view is not the sweep projection.
pub fn target_position(angle_deg: f32, distance_cm: f32) -> Point {
    let theta = angle_deg.to_radians();
    let reach = (distance_cm / 4.0).min(80.0);
    Point::new(
        SNAPSHOT_WIDTH / 2.0 + theta.cos() * reach,
        SNAPSHOT_HEIGHT / 2.0 + theta.sin() * reach,
    )
}

/// Lays out the simulated camera frame captured for a detected object.
pub fn compose_snapshot<R: Rng + ?Sized>(
    angle_deg: f32,
    distance_cm: f32,
    time_label: &str,
    rng: &mut R,
) -> DisplayList {
    let mut list = DisplayList::new(SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT);
    let middle = Point::new(SNAPSHOT_WIDTH / 2.0, SNAPSHOT_HEIGHT / 2.0);

    list.push(
        Layer::Background,
        DrawCommand::RadialFill {
            origin: Point::new(0.0, 0.0),
            width: SNAPSHOT_WIDTH,
            height: SNAPSHOT_HEIGHT,
            center: middle,
            radius: 120.0,
            inner: Rgba::hex(0x1f2937),
            outer: Rgba::hex(0x111827),
        },
    );

    let speck = Rgba::hex(0x22c55e);
    for _ in 0..STATIC_SPECKS {
        let origin = Point::new(
            rng.gen::<f32>() * SNAPSHOT_WIDTH,
            rng.gen::<f32>() * SNAPSHOT_HEIGHT,
        );
        let alpha = rng.gen::<f32>() * 0.3;
        list.push(
            Layer::Trail,
            DrawCommand::FillRect {
                origin,
                width: 1.0,
                height: 1.0,
                color: speck.with_alpha(alpha),
            },
        );
    }

    let target = target_position(angle_deg, distance_cm);
    let color = target_color(distance_cm);
    list.push(
        Layer::Blips,
        DrawCommand::FillCircle {
            center: target,
            radius: (15.0 - distance_cm / 50.0).max(6.0),
            color,
        },
    );

    for (from, to) in [
        (Point::new(150.0, 120.0), Point::new(170.0, 120.0)),
        (Point::new(160.0, 110.0), Point::new(160.0, 130.0)),
    ] {
        list.push(
            Layer::Blips,
            DrawCommand::Line {
                from,
                to,
                width: 2.0,
                color: ACCENT,
            },
        );
    }

    let lines = [
        time_label.to_string(),
        format!(
            "{}° {}cm",
            angle_deg.round() as i64,
            distance_cm.round() as i64
        ),
        format!("Range: {}", RangeBand::from_distance(distance_cm).as_str()),
    ];
    for (row, content) in lines.into_iter().enumerate() {
        list.push(
            Layer::Blips,
            DrawCommand::Text {
                position: Point::new(10.0, 20.0 + 20.0 * row as f32),
                content,
                size: 14.0,
                align: TextAlign::Left,
                color: ACCENT,
            },
        );
    }

    list.push(
        Layer::Blips,
        DrawCommand::StrokeCircle {
            center: target,
            radius: (18.0 - distance_cm / 50.0).max(8.0),
            width: 3.0,
            color,
        },
    );

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn snapshot_contains_annotations() {
        let mut rng = StdRng::seed_from_u64(9);
        let list = compose_snapshot(60.0, 85.0, "12:00:00", &mut rng);
        assert_eq!(list.width, 320.0);
        let texts: Vec<&str> = list
            .commands()
            .filter_map(|command| match command {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["12:00:00", "60° 85cm", "Range: CLOSE"]);
    }

    #[test]
    fn target_radius_shrinks_with_distance() {
        let mut rng = StdRng::seed_from_u64(1);
        let list = compose_snapshot(0.0, 400.0, "t", &mut rng);
        let radius = list
            .commands()
            .find_map(|command| match command {
                DrawCommand::FillCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .unwrap();
        assert_eq!(radius, 7.0);
        assert_eq!(target_position(0.0, 400.0), Point::new(240.0, 120.0));
        assert_eq!(target_color(400.0), Rgba::hex(0x84cc16));
    }
}
