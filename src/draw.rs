//! Surface-agnostic drawing commands produced by the field each frame.

use crate::palette::{Rgb, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Colour at a relative offset (0 = start, 1 = end) along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, rgb: Rgb, alpha: f32) -> Self {
        Self {
            offset,
            color: Rgba::new(rgb, alpha),
        }
    }

    pub fn transparent(offset: f32) -> Self {
        Self {
            offset,
            color: Rgba::TRANSPARENT,
        }
    }
}

/// Samples a gradient at `t`, interpolating between the surrounding stops.
/// Stops must be sorted by offset.
pub fn sample_gradient(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = (t - a.offset) / span;
            // Fading into "transparent" keeps the hue of the opaque side
            let rgb = if b.color.alpha == 0.0 {
                a.color.rgb
            } else if a.color.alpha == 0.0 {
                b.color.rgb
            } else {
                crate::palette::blend_colors(a.color.rgb, b.color.rgb, k)
            };
            return Rgba::new(rgb, a.color.alpha + (b.color.alpha - a.color.alpha) * k);
        }
    }
    stops[stops.len() - 1].color
}

/// What a radial glow represents; surfaces may texture layers differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowLayer {
    Nebula,
    Pointer,
    Star,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    /// Radial gradient from `center` (offset 0) to `radius` (offset 1).
    /// Nothing is painted beyond the radius.
    RadialGlow {
        center: Point,
        radius: f32,
        stops: Vec<ColorStop>,
        layer: GlowLayer,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    /// Linear gradient stroke: offset 0 at `head`, offset 1 at `tail`.
    Streak {
        head: Point,
        tail: Point,
        width: f32,
        stops: Vec<ColorStop>,
    },
}

/// Anything that can execute a frame's draw commands.
pub trait Surface {
    /// Logical width and height.
    fn size(&self) -> (f32, f32);
    fn draw(&mut self, command: &DrawCommand);

    fn draw_all(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.draw(command);
        }
    }
}
