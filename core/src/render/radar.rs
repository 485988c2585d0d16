use crate::math::polar::{project, scale_distance, screen_angle};
use crate::render::display::{DisplayList, DrawCommand, Layer, Point, Rgba, TextAlign};
use crate::scan::{DetectedObject, Reading, MAX_ANGLE_DEG};

const BACKGROUND: Rgba = Rgba::hex(0x111827);
const GRID: Rgba = Rgba::hex(0x10b981);
const SWEEP: Rgba = Rgba::hex(0x22c55e);

const MARGIN: f32 = 20.0;
const RING_COUNT: usize = 5;
const SPOKE_STEP_DEG: usize = 30;
const SWEEP_WIDTH_DEG: f32 = 30.0;
const WEDGE_BANDS: usize = 12;
const GRID_ALPHA: f32 = 0.3;
const LABEL_ALPHA: f32 = 0.7;
const TRAIL_GLOBAL_ALPHA: f32 = 0.4;
const HALO_ALPHA: f32 = 0.7;

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn size(&self) -> f32 {
        self.width.min(self.height).max(0.0)
    }
}

/// Everything the radar display depends on.
#[derive(Debug, Clone, Copy)]
pub struct RadarView<'a> {
    pub angle_deg: f32,
    pub readings: &'a [Reading],
    pub objects: &'a [DetectedObject],
    pub scanning: bool,
    pub max_range: f32,
    pub now_ms: u64,
    pub trail_fade_ms: u64,
}

pub fn blip_color(distance_cm: f32) -> Rgba {
    if distance_cm < 100.0 {
        Rgba::hex(0xdc2626)
    } else if distance_cm < 200.0 {
        Rgba::hex(0xf97316)
    } else if distance_cm < 350.0 {
        Rgba::hex(0xeab308)
    } else {
        Rgba::hex(0xef4444)
    }
}

/// Opacity of a trail dot, fading linearly to zero over `fade_ms`.
pub fn trail_alpha(age_ms: u64, fade_ms: u64) -> f32 {
    if fade_ms == 0 {
        return 0.0;
    }
    let remaining = (1.0 - age_ms as f32 / fade_ms as f32).max(0.0);
    TRAIL_GLOBAL_ALPHA * remaining * 0.6
}

pub fn pulse_radius(now_ms: u64) -> f32 {
    let seconds = now_ms as f64 / 1000.0;
    4.0 + ((seconds * 3.0).sin() * 2.0) as f32
}

/// Sweep gradient opacity at fraction `t` of the radius (0.8 → 0.3 at 60% → 0).
pub fn wedge_alpha(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.6 {
        0.8 + (0.3 - 0.8) * (t / 0.6)
    } else {
        0.75 * (1.0 - t)
    }
}

/// Lays out the full radar display. Pure: identical inputs give identical output.
pub fn render_radar(view: &RadarView<'_>, viewport: Viewport) -> DisplayList {
    let size = viewport.size();
    let center = Point::new(size / 2.0, size / 2.0);
    let max_radius = (size / 2.0 - MARGIN).max(0.0);
    let mut list = DisplayList::new(size, size);

    list.push(
        Layer::Background,
        DrawCommand::FillRect {
            origin: Point::new(0.0, 0.0),
            width: size,
            height: size,
            color: BACKGROUND,
        },
    );

    let grid = GRID.with_alpha(GRID_ALPHA);
    for ring in 1..=RING_COUNT {
        list.push(
            Layer::Rings,
            DrawCommand::StrokeArc {
                center,
                radius: max_radius / RING_COUNT as f32 * ring as f32,
                start_rad: screen_angle(MAX_ANGLE_DEG),
                end_rad: screen_angle(0.0),
                width: 1.0,
                color: grid,
            },
        );
    }

    for angle in (0..=MAX_ANGLE_DEG as usize).step_by(SPOKE_STEP_DEG) {
        list.push(
            Layer::Spokes,
            DrawCommand::Line {
                from: center,
                to: project(center, angle as f32, max_radius),
                width: 1.0,
                color: grid,
            },
        );
    }

    push_labels(&mut list, view.max_range, center, max_radius);

    if view.scanning {
        push_sweep(&mut list, view.angle_deg, center, max_radius);
    }

    for reading in view.readings {
        let alpha = trail_alpha(reading.age_ms(view.now_ms), view.trail_fade_ms);
        if alpha <= 0.0 {
            continue;
        }
        let radius = scale_distance(reading.distance_cm, view.max_range, max_radius);
        list.push(
            Layer::Trail,
            DrawCommand::FillCircle {
                center: project(center, reading.angle_deg, radius),
                radius: 1.0,
                color: SWEEP.with_alpha(alpha),
            },
        );
    }

    let halo = pulse_radius(view.now_ms);
    for object in view.objects {
        let radius = scale_distance(object.distance_cm, view.max_range, max_radius);
        let position = project(center, object.angle_deg, radius);
        let color = blip_color(object.distance_cm);
        if object.tracked {
            list.push(
                Layer::Blips,
                DrawCommand::StrokeCircle {
                    center: position,
                    radius: 6.0,
                    width: 2.0,
                    color,
                },
            );
        }
        list.push(
            Layer::Blips,
            DrawCommand::FillCircle {
                center: position,
                radius: 4.0,
                color,
            },
        );
        list.push(
            Layer::Blips,
            DrawCommand::StrokeCircle {
                center: position,
                radius: halo,
                width: 1.0,
                color: color.with_alpha(HALO_ALPHA),
            },
        );
    }

    list.push(
        Layer::Center,
        DrawCommand::FillCircle {
            center,
            radius: 3.0,
            color: GRID,
        },
    );

    list
}

fn push_labels(list: &mut DisplayList, max_range: f32, center: Point, max_radius: f32) {
    let color = GRID.with_alpha(LABEL_ALPHA);
    for ring in 1..=RING_COUNT {
        let radius = max_radius / RING_COUNT as f32 * ring as f32;
        let distance = max_range / RING_COUNT as f32 * ring as f32;
        let anchor = project(center, 90.0, radius);
        list.push(
            Layer::Labels,
            DrawCommand::Text {
                position: Point::new(anchor.x, anchor.y - 4.0),
                content: format!("{}cm", distance.round() as i64),
                size: 12.0,
                align: TextAlign::Center,
                color,
            },
        );
    }
    for angle in (0..=MAX_ANGLE_DEG as usize).step_by(SPOKE_STEP_DEG) {
        let anchor = project(center, angle as f32, max_radius + 15.0);
        list.push(
            Layer::Labels,
            DrawCommand::Text {
                position: Point::new(anchor.x, anchor.y + 5.0),
                content: format!("{angle}°"),
                size: 12.0,
                align: TextAlign::Center,
                color,
            },
        );
    }
}

fn push_sweep(list: &mut DisplayList, angle_deg: f32, center: Point, max_radius: f32) {
    let trailing = (angle_deg - SWEEP_WIDTH_DEG).max(0.0);
    let (start_rad, end_rad) = (screen_angle(angle_deg), screen_angle(trailing));
    if end_rad > start_rad && max_radius > 0.0 {
        for band in 0..WEDGE_BANDS {
            let inner = band as f32 / WEDGE_BANDS as f32;
            let outer = (band + 1) as f32 / WEDGE_BANDS as f32;
            let alpha = wedge_alpha((inner + outer) / 2.0);
            list.push(
                Layer::SweepWedge,
                DrawCommand::FillSector {
                    center,
                    inner_radius: inner * max_radius,
                    outer_radius: outer * max_radius,
                    start_rad,
                    end_rad,
                    color: GRID.with_alpha(alpha),
                },
            );
        }
    }

    list.push(
        Layer::SweepLine,
        DrawCommand::Line {
            from: center,
            to: project(center, angle_deg, max_radius),
            width: 2.0,
            color: SWEEP,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(readings: &'a [Reading], objects: &'a [DetectedObject], scanning: bool) -> RadarView<'a> {
        RadarView {
            angle_deg: 60.0,
            readings,
            objects,
            scanning,
            max_range: 500.0,
            now_ms: 10_000,
            trail_fade_ms: 5_000,
        }
    }

    #[test]
    fn layers_are_emitted_bottom_to_top() {
        let readings = vec![Reading::new(58.0, 120.0, 9_500)];
        let objects = vec![DetectedObject::new("o", 58.0, 120.0, 9_500).with_tracked(true)];
        let list = render_radar(&view(&readings, &objects, true), Viewport::new(400.0, 400.0));
        let layers: Vec<Layer> = list.layered().iter().map(|(layer, _)| *layer).collect();
        assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
        for layer in [
            Layer::Background,
            Layer::Rings,
            Layer::Spokes,
            Layer::Labels,
            Layer::SweepWedge,
            Layer::SweepLine,
            Layer::Trail,
            Layer::Blips,
            Layer::Center,
        ] {
            assert!(layers.contains(&layer), "missing {layer:?}");
        }
    }

    #[test]
    fn grid_has_five_rings_and_seven_spokes() {
        let list = render_radar(&view(&[], &[], false), Viewport::new(400.0, 300.0));
        assert_eq!(list.width, 300.0);
        assert_eq!(list.in_layer(Layer::Rings).count(), 5);
        assert_eq!(list.in_layer(Layer::Spokes).count(), 7);
        assert_eq!(list.in_layer(Layer::Labels).count(), 12);
    }

    #[test]
    fn idle_display_has_no_sweep() {
        let list = render_radar(&view(&[], &[], false), Viewport::new(400.0, 400.0));
        assert_eq!(list.in_layer(Layer::SweepWedge).count(), 0);
        assert_eq!(list.in_layer(Layer::SweepLine).count(), 0);
    }

    #[test]
    fn expired_trail_dots_are_skipped() {
        let readings = vec![
            Reading::new(10.0, 100.0, 4_000),
            Reading::new(12.0, 100.0, 5_000),
            Reading::new(14.0, 100.0, 9_000),
        ];
        let list = render_radar(&view(&readings, &[], false), Viewport::new(400.0, 400.0));
        assert_eq!(list.in_layer(Layer::Trail).count(), 1);
    }

    #[test]
    fn tracked_objects_get_an_outline() {
        let objects = vec![
            DetectedObject::new("a", 30.0, 60.0, 0),
            DetectedObject::new("b", 90.0, 300.0, 0).with_tracked(true),
        ];
        let list = render_radar(&view(&[], &objects, false), Viewport::new(400.0, 400.0));
        assert_eq!(list.in_layer(Layer::Blips).count(), 5);
    }

    #[test]
    fn blip_projection_follows_polar_formula() {
        let objects = vec![DetectedObject::new("a", 90.0, 250.0, 0)];
        let list = render_radar(&view(&[], &objects, false), Viewport::new(440.0, 440.0));
        let blip = list
            .in_layer(Layer::Blips)
            .find_map(|command| match command {
                DrawCommand::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .unwrap();
        // centre (220, 220), max radius 200, half range -> 100 px straight down.
        assert!((blip.x - 220.0).abs() < 1e-3);
        assert!((blip.y - 320.0).abs() < 1e-3);
    }

    #[test]
    fn colour_bands_and_fades() {
        assert_eq!(blip_color(50.0), Rgba::hex(0xdc2626));
        assert_eq!(blip_color(150.0), Rgba::hex(0xf97316));
        assert_eq!(blip_color(300.0), Rgba::hex(0xeab308));
        assert_eq!(blip_color(450.0), Rgba::hex(0xef4444));
        assert_eq!(trail_alpha(5_000, 5_000), 0.0);
        assert!((wedge_alpha(0.6) - 0.3).abs() < 1e-6);
        assert_eq!(wedge_alpha(1.0), 0.0);
        let pulse = pulse_radius(1_234);
        assert!((2.0..=6.0).contains(&pulse));
    }
}
