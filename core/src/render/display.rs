//! Backend-neutral drawing primitives.
//!
//! Angles in arc and sector commands are screen-space radians measured from
//! the +x axis with y pointing down; `start_rad <= end_rad` sweeps clockwise
//! on screen.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// sRGB colour with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Stacking group a command belongs to. Declaration order is bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Rings,
    Spokes,
    Labels,
    SweepWedge,
    SweepLine,
    Trail,
    Blips,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        origin: Point,
        width: f32,
        height: f32,
        color: Rgba,
    },
    /// Rectangle shaded by distance from `center`, `inner` at the centre to `outer` at `radius`.
    RadialFill {
        origin: Point,
        width: f32,
        height: f32,
        center: Point,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    StrokeArc {
        center: Point,
        radius: f32,
        start_rad: f32,
        end_rad: f32,
        width: f32,
        color: Rgba,
    },
    /// Annular sector between two radii.
    FillSector {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_rad: f32,
        end_rad: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Text {
        position: Point,
        content: String,
        size: f32,
        align: TextAlign,
        color: Rgba,
    },
}

/// Ordered drawing commands; later entries paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub width: f32,
    pub height: f32,
    items: Vec<(Layer, DrawCommand)>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: Layer, command: DrawCommand) {
        self.items.push((layer, command));
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.items.iter().map(|(_, command)| command)
    }

    pub fn layered(&self) -> &[(Layer, DrawCommand)] {
        &self.items
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.items
            .iter()
            .filter(move |(tag, _)| *tag == layer)
            .map(|(_, command)| command)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let color = Rgba::hex(0x10b981);
        assert_eq!((color.r, color.g, color.b), (0x10, 0xb9, 0x81));
        assert_eq!(color.with_alpha(1.5).a, 1.0);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let from = Rgba::hex(0x000000);
        let to = Rgba::hex(0xffffff).with_alpha(0.0);
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
    }
}
