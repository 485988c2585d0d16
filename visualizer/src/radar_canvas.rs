use iced::{
    mouse,
    widget::canvas::{self, path::Arc, Frame, Geometry, Path, Stroke, Text},
    Color, Point, Radians, Rectangle, Renderer, Theme,
};
use radarcore::render::{render_radar, DrawCommand, RadarView, Rgba, TextAlign, Viewport};
use radarcore::SessionSnapshot;

/// Concentric steps used to approximate the radial background gradient.
const RADIAL_STEPS: usize = 24;

/// Paints the shared radar display list onto an iced canvas.
pub struct RadarCanvas<'a> {
    pub snapshot: Option<&'a SessionSnapshot>,
}

fn idle_view<'a>() -> RadarView<'a> {
    RadarView {
        angle_deg: 0.0,
        readings: &[],
        objects: &[],
        scanning: false,
        max_range: 500.0,
        now_ms: 0,
        trail_fade_ms: 5_000,
    }
}

fn color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn point(p: radarcore::render::Point) -> Point {
    Point::new(p.x, p.y)
}

fn arc(center: Point, radius: f32, start: f32, end: f32) -> Arc {
    Arc {
        center,
        radius,
        start_angle: Radians(start),
        end_angle: Radians(end),
    }
}

fn paint(frame: &mut Frame, command: &DrawCommand) {
    match command {
        DrawCommand::FillRect {
            origin,
            width,
            height,
            color: fill,
        } => frame.fill_rectangle(point(*origin), iced::Size::new(*width, *height), color(*fill)),
        DrawCommand::RadialFill {
            origin,
            width,
            height,
            center,
            radius,
            inner,
            outer,
        } => {
            frame.fill_rectangle(point(*origin), iced::Size::new(*width, *height), color(*outer));
            for step in 0..RADIAL_STEPS {
                let t = step as f32 / RADIAL_STEPS as f32;
                let ring = Path::circle(point(*center), radius * (1.0 - t));
                frame.fill(&ring, color(outer.lerp(*inner, t)));
            }
        }
        DrawCommand::StrokeArc {
            center,
            radius,
            start_rad,
            end_rad,
            width,
            color: stroke,
        } => {
            let path = Path::new(|builder| {
                builder.arc(arc(point(*center), *radius, *start_rad, *end_rad));
            });
            frame.stroke(
                &path,
                Stroke::default().with_width(*width).with_color(color(*stroke)),
            );
        }
        DrawCommand::FillSector {
            center,
            inner_radius,
            outer_radius,
            start_rad,
            end_rad,
            color: fill,
        } => {
            let center = point(*center);
            let path = Path::new(|builder| {
                builder.move_to(Point::new(
                    center.x + inner_radius * start_rad.cos(),
                    center.y + inner_radius * start_rad.sin(),
                ));
                builder.line_to(Point::new(
                    center.x + outer_radius * start_rad.cos(),
                    center.y + outer_radius * start_rad.sin(),
                ));
                builder.arc(arc(center, *outer_radius, *start_rad, *end_rad));
                if *inner_radius > 0.0 {
                    builder.line_to(Point::new(
                        center.x + inner_radius * end_rad.cos(),
                        center.y + inner_radius * end_rad.sin(),
                    ));
                    builder.arc(arc(center, *inner_radius, *end_rad, *start_rad));
                }
                builder.close();
            });
            frame.fill(&path, color(*fill));
        }
        DrawCommand::Line {
            from,
            to,
            width,
            color: stroke,
        } => frame.stroke(
            &Path::line(point(*from), point(*to)),
            Stroke::default().with_width(*width).with_color(color(*stroke)),
        ),
        DrawCommand::FillCircle {
            center,
            radius,
            color: fill,
        } => frame.fill(&Path::circle(point(*center), *radius), color(*fill)),
        DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color: stroke,
        } => frame.stroke(
            &Path::circle(point(*center), *radius),
            Stroke::default().with_width(*width).with_color(color(*stroke)),
        ),
        DrawCommand::Text {
            position,
            content,
            size,
            align,
            color: fill,
        } => {
            // Rough glyph advance for the default font; good enough to centre short labels.
            let shift = match align {
                TextAlign::Left => 0.0,
                TextAlign::Center => content.chars().count() as f32 * size * 0.3,
            };
            frame.fill_text(Text {
                content: content.clone(),
                position: Point::new(position.x - shift, position.y - size / 2.0),
                color: color(*fill),
                size: (*size).into(),
                ..Default::default()
            });
        }
    }
}

impl<Message> canvas::Program<Message> for RadarCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let view = self
            .snapshot
            .map(SessionSnapshot::radar_view)
            .unwrap_or_else(idle_view);
        let list = render_radar(&view, Viewport::new(bounds.width, bounds.height));
        for command in list.commands() {
            paint(&mut frame, command);
        }
        vec![frame.into_geometry()]
    }
}
