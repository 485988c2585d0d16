//! Software backend for display lists, used for captures and exports.
//!
//! Pixels are sampled at their centres with no anti-aliasing. Text commands
//! are skipped.

use crate::prelude::RadarResult;
use crate::render::display::{DisplayList, DrawCommand, Point, Rgba};
use image::{DynamicImage, ImageOutputFormat, Rgba as Pixel, RgbaImage};
use std::f32::consts::TAU;
use std::io::Cursor;

pub fn rasterize(list: &DisplayList) -> RgbaImage {
    let width = list.width.max(1.0).round() as u32;
    let height = list.height.max(1.0).round() as u32;
    let mut canvas = RgbaImage::from_pixel(width, height, Pixel([0, 0, 0, 0]));

    for command in list.commands() {
        draw(&mut canvas, command);
    }
    canvas
}

pub fn encode_png(image: &RgbaImage) -> RadarResult<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

fn draw(canvas: &mut RgbaImage, command: &DrawCommand) {
    match command {
        DrawCommand::FillRect {
            origin,
            width,
            height,
            color,
        } => {
            let max = Point::new(origin.x + width, origin.y + height);
            cover(canvas, *origin, max, |_| Some(*color));
        }
        DrawCommand::RadialFill {
            origin,
            width,
            height,
            center,
            radius,
            inner,
            outer,
        } => {
            let max = Point::new(origin.x + width, origin.y + height);
            cover(canvas, *origin, max, |p| {
                let t = if *radius > 0.0 {
                    p.distance_to(*center) / radius
                } else {
                    1.0
                };
                Some(inner.lerp(*outer, t))
            });
        }
        DrawCommand::StrokeArc {
            center,
            radius,
            start_rad,
            end_rad,
            width,
            color,
        } => {
            let reach = radius + width / 2.0;
            cover(canvas, offset(*center, -reach), offset(*center, reach), |p| {
                let on_ring = (p.distance_to(*center) - radius).abs() <= width / 2.0;
                (on_ring && within_sweep(bearing(*center, p), *start_rad, *end_rad))
                    .then_some(*color)
            });
        }
        DrawCommand::FillSector {
            center,
            inner_radius,
            outer_radius,
            start_rad,
            end_rad,
            color,
        } => {
            cover(
                canvas,
                offset(*center, -outer_radius),
                offset(*center, *outer_radius),
                |p| {
                    let distance = p.distance_to(*center);
                    (distance >= *inner_radius
                        && distance <= *outer_radius
                        && within_sweep(bearing(*center, p), *start_rad, *end_rad))
                    .then_some(*color)
                },
            );
        }
        DrawCommand::Line {
            from,
            to,
            width,
            color,
        } => {
            let half = (width / 2.0).max(0.5);
            let min = Point::new(from.x.min(to.x) - half, from.y.min(to.y) - half);
            let max = Point::new(from.x.max(to.x) + half, from.y.max(to.y) + half);
            cover(canvas, min, max, |p| {
                (segment_distance(p, *from, *to) <= half).then_some(*color)
            });
        }
        DrawCommand::FillCircle {
            center,
            radius,
            color,
        } => {
            let reach = radius.max(0.5);
            cover(canvas, offset(*center, -reach), offset(*center, reach), |p| {
                (p.distance_to(*center) <= reach).then_some(*color)
            });
        }
        DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        } => {
            let half = (width / 2.0).max(0.5);
            let reach = radius + half;
            cover(canvas, offset(*center, -reach), offset(*center, reach), |p| {
                ((p.distance_to(*center) - radius).abs() <= half).then_some(*color)
            });
        }
        DrawCommand::Text { .. } => {}
    }
}

fn offset(point: Point, by: f32) -> Point {
    Point::new(point.x + by, point.y + by)
}

/// Blends `shade(pixel_centre)` over every pixel in the clipped box.
fn cover<F>(canvas: &mut RgbaImage, min: Point, max: Point, shade: F)
where
    F: Fn(Point) -> Option<Rgba>,
{
    let (width, height) = canvas.dimensions();
    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = (max.x.ceil().max(0.0) as u32).min(width);
    let y1 = (max.y.ceil().max(0.0) as u32).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if let Some(color) = shade(centre) {
                blend(canvas.get_pixel_mut(x, y), color);
            }
        }
    }
}

/// Source-over compositing with straight alpha.
fn blend(pixel: &mut Pixel<u8>, color: Rgba) {
    let src_a = color.a.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = pixel.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let mix = |src: u8, dst: u8| {
        let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    pixel.0 = [
        mix(color.r, pixel.0[0]),
        mix(color.g, pixel.0[1]),
        mix(color.b, pixel.0[2]),
        (out_a * 255.0).round() as u8,
    ];
}

fn bearing(center: Point, p: Point) -> f32 {
    (p.y - center.y).atan2(p.x - center.x).rem_euclid(TAU)
}

fn within_sweep(angle: f32, start: f32, end: f32) -> bool {
    if end - start >= TAU {
        return true;
    }
    let start = start.rem_euclid(TAU);
    let end = end.rem_euclid(TAU);
    if start <= end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq <= f32::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::display::Layer;
    use std::f32::consts::PI;

    fn list() -> DisplayList {
        let mut list = DisplayList::new(40.0, 40.0);
        list.push(
            Layer::Background,
            DrawCommand::FillRect {
                origin: Point::new(0.0, 0.0),
                width: 40.0,
                height: 40.0,
                color: Rgba::hex(0x111827),
            },
        );
        list
    }

    #[test]
    fn background_fills_every_pixel() {
        let image = rasterize(&list());
        assert_eq!(image.dimensions(), (40, 40));
        assert!(image.pixels().all(|p| p.0 == [0x11, 0x18, 0x27, 255]));
    }

    #[test]
    fn circles_paint_their_centre_only() {
        let mut list = list();
        list.push(
            Layer::Blips,
            DrawCommand::FillCircle {
                center: Point::new(20.0, 20.0),
                radius: 4.0,
                color: Rgba::hex(0xdc2626),
            },
        );
        let image = rasterize(&list);
        assert_eq!(image.get_pixel(20, 20).0, [0xdc, 0x26, 0x26, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [0x11, 0x18, 0x27, 255]);
    }

    #[test]
    fn sector_respects_sweep_bounds() {
        let mut list = list();
        list.push(
            Layer::SweepWedge,
            DrawCommand::FillSector {
                center: Point::new(20.0, 20.0),
                inner_radius: 0.0,
                outer_radius: 15.0,
                start_rad: 0.0,
                end_rad: PI / 2.0,
                color: Rgba::hex(0xffffff),
            },
        );
        let image = rasterize(&list);
        // Lower-right quadrant is inside, upper-left is not.
        assert_eq!(image.get_pixel(25, 25).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(15, 15).0, [0x11, 0x18, 0x27, 255]);
    }

    #[test]
    fn translucent_paint_blends() {
        let mut list = list();
        list.push(
            Layer::Trail,
            DrawCommand::FillRect {
                origin: Point::new(0.0, 0.0),
                width: 40.0,
                height: 40.0,
                color: Rgba::hex(0xffffff).with_alpha(0.5),
            },
        );
        let pixel = rasterize(&list).get_pixel(10, 10).0;
        assert_eq!(pixel[3], 255);
        assert!(pixel[0] > 0x11 && pixel[0] < 0xff);
    }

    #[test]
    fn png_encoding_has_signature() {
        let bytes = encode_png(&rasterize(&list())).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn wrapped_sweep_is_handled() {
        assert!(within_sweep(0.1, 6.0, 7.0));
        assert!(!within_sweep(3.0, 6.0, 7.0));
    }
}
