//! Software raster of half-block pixels.
//!
//! One terminal cell holds two vertically stacked pixels, and each pixel
//! covers `scale` x `scale` logical units. Everything is composited
//! source-over in float RGB and only quantised when encoded.

use crate::draw::{ColorStop, DrawCommand, GlowLayer, Point, Surface, sample_gradient};
use crate::palette::{Rgb, Rgba};
use noise::{NoiseFn, Perlin};

// Shapes smaller than a pixel still light the pixel they sit in at least this much
const MIN_SPECK_COVERAGE: f32 = 0.35;
const GRAIN_FREQUENCY: f64 = 0.12;

pub struct Canvas {
    width: usize,  // Pixels (terminal columns)
    height: usize, // Pixels (terminal rows * 2)
    scale: f32,
    pixels: Vec<[f32; 3]>,
    background: Rgb,
    grain: Perlin,
    grain_amount: f32,
}

impl Canvas {
    pub fn new(width: usize, height: usize, scale: f32, grain_amount: f32, seed: u32) -> Self {
        Self {
            width,
            height,
            scale,
            pixels: vec![[0.0; 3]; width * height],
            background: (0, 0, 0),
            grain: Perlin::new(seed),
            grain_amount,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 3]; width * height];
    }

    pub fn set_background(&mut self, background: Rgb) {
        self.background = background;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let [r, g, b] = self.pixels[y * self.width + x];
        (
            r.round().clamp(0.0, 255.0) as u8,
            g.round().clamp(0.0, 255.0) as u8,
            b.round().clamp(0.0, 255.0) as u8,
        )
    }

    fn clear(&mut self) {
        let bg = [
            self.background.0 as f32,
            self.background.1 as f32,
            self.background.2 as f32,
        ];
        self.pixels.fill(bg);
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        if color.alpha <= 0.0 || x >= self.width || y >= self.height {
            return;
        }
        let a = color.alpha.min(1.0);
        let dst = &mut self.pixels[y * self.width + x];
        dst[0] = dst[0] * (1.0 - a) + color.rgb.0 as f32 * a;
        dst[1] = dst[1] * (1.0 - a) + color.rgb.1 as f32 * a;
        dst[2] = dst[2] * (1.0 - a) + color.rgb.2 as f32 * a;
    }

    /// Pixel containing a logical point, if it is on the canvas.
    fn pixel_at(&self, p: Point) -> Option<(usize, usize)> {
        let x = (p.x / self.scale).floor();
        let y = (p.y / self.scale).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    fn pixel_center(&self, x: usize, y: usize) -> Point {
        Point::new((x as f32 + 0.5) * self.scale, (y as f32 + 0.5) * self.scale)
    }

    /// Inclusive pixel ranges touched by a circle, clipped to the canvas.
    fn bounds(&self, center: Point, radius: f32) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = ((center.x - radius) / self.scale).floor().max(0.0);
        let y0 = ((center.y - radius) / self.scale).floor().max(0.0);
        let x1 = ((center.x + radius) / self.scale).floor();
        let y1 = ((center.y + radius) / self.scale).floor();
        if x1 < 0.0 || y1 < 0.0 || x0 >= self.width as f32 || y0 >= self.height as f32 {
            return None;
        }
        Some((
            x0 as usize,
            y0 as usize,
            (x1 as usize).min(self.width - 1),
            (y1 as usize).min(self.height - 1),
        ))
    }

    fn speck(&mut self, center: Point, radius: f32, color: Rgba) {
        if let Some((x, y)) = self.pixel_at(center) {
            let area = std::f32::consts::PI * radius * radius / (self.scale * self.scale);
            let coverage = area.clamp(MIN_SPECK_COVERAGE, 1.0);
            self.blend(x, y, Rgba::new(color.rgb, color.alpha * coverage));
        }
    }

    fn radial_glow(&mut self, center: Point, radius: f32, stops: &[ColorStop], layer: GlowLayer) {
        if radius <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.bounds(center, radius) else {
            return;
        };
        let mut painted = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let t = self.pixel_center(x, y).distance(center) / radius;
                if t >= 1.0 {
                    continue;
                }
                let mut color = sample_gradient(stops, t);
                if layer == GlowLayer::Nebula && self.grain_amount > 0.0 {
                    let n = self
                        .grain
                        .get([x as f64 * GRAIN_FREQUENCY, y as f64 * GRAIN_FREQUENCY])
                        as f32;
                    color.alpha = (color.alpha * (1.0 + n * self.grain_amount)).clamp(0.0, 1.0);
                }
                self.blend(x, y, color);
                painted = true;
            }
        }
        if !painted {
            self.speck(center, radius, sample_gradient(stops, 0.0));
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        if radius < self.scale * 0.5 {
            self.speck(center, radius, color);
            return;
        }
        let Some((x0, y0, x1, y1)) = self.bounds(center, radius + self.scale * 0.5) else {
            return;
        };
        let mut painted = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = self.pixel_center(x, y).distance(center);
                // One-pixel soft edge
                let coverage = ((radius + self.scale * 0.5 - d) / self.scale).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, Rgba::new(color.rgb, color.alpha * coverage));
                    painted = true;
                }
            }
        }
        if !painted {
            self.speck(center, radius, color);
        }
    }

    /// Parameter range of the segment `(x, y) + t * (dx, dy)`, `t` in [0, 1],
    /// that lies inside the pixel box.
    fn clip(&self, x: f32, y: f32, dx: f32, dy: f32) -> Option<(f32, f32)> {
        let (w, h) = (self.width as f32, self.height as f32);
        let (mut t0, mut t1) = (0.0f32, 1.0f32);
        for (p, q) in [(-dx, x), (dx, w - x), (-dy, y), (dy, h - y)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
        }
        (t0 <= t1).then_some((t0, t1))
    }

    /// Walks the visible part of a segment one pixel at a time, calling
    /// `shade` with the fraction of the way along the whole segment.
    fn trace(&mut self, from: Point, to: Point, mut shade: impl FnMut(f32) -> Rgba) {
        let (fx, fy) = (from.x / self.scale, from.y / self.scale);
        let (dx, dy) = (to.x / self.scale - fx, to.y / self.scale - fy);
        if ![fx, fy, dx, dy].iter().all(|v| v.is_finite()) {
            return;
        }
        let Some((t0, t1)) = self.clip(fx, fy, dx, dy) else {
            return;
        };
        let span = t1 - t0;
        let steps = (dx.abs().max(dy.abs()) * span).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let t = t0 + span * (i as f32 / steps as f32);
            let px = (fx + dx * t).floor();
            let py = (fy + dy * t).floor();
            if px < 0.0 || py < 0.0 {
                continue;
            }
            let pixel = (px as usize, py as usize);
            if last == Some(pixel) {
                continue;
            }
            last = Some(pixel);
            let color = shade(t);
            self.blend(pixel.0, pixel.1, color);
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear => self.clear(),
            DrawCommand::RadialGlow {
                center,
                radius,
                stops,
                layer,
            } => self.radial_glow(*center, *radius, stops, *layer),
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, *radius, *color),
            // Terminal pixels are far wider than any stroke, so width is ignored
            DrawCommand::Line { from, to, color, .. } => {
                let color = *color;
                self.trace(*from, *to, |_| color);
            }
            DrawCommand::Streak {
                head, tail, stops, ..
            } => self.trace(*head, *tail, |t| sample_gradient(stops, t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(20, 10, 8.0, 0.0, 1);
        canvas.set_background((10, 20, 30));
        canvas.draw(&DrawCommand::Clear);
        canvas
    }

    #[test]
    fn clear_paints_background() {
        let canvas = canvas();
        assert_eq!(canvas.pixel(0, 0), (10, 20, 30));
        assert_eq!(canvas.pixel(19, 9), (10, 20, 30));
        assert_eq!(canvas.size(), (160.0, 80.0));
    }

    #[test]
    fn opaque_circle_replaces_pixels() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::FillCircle {
            center: Point::new(40.0, 40.0),
            radius: 12.0,
            color: Rgba::new((255, 0, 0), 1.0),
        });
        assert_eq!(canvas.pixel(5, 5), (255, 0, 0));
        assert_eq!(canvas.pixel(0, 0), (10, 20, 30));
    }

    #[test]
    fn tiny_star_still_lights_its_pixel() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::FillCircle {
            center: Point::new(1.0, 1.0),
            radius: 0.5,
            color: Rgba::new((255, 255, 255), 1.0),
        });
        assert_ne!(canvas.pixel(0, 0), (10, 20, 30));
    }

    #[test]
    fn glow_fades_outward() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::RadialGlow {
            center: Point::new(84.0, 44.0),
            radius: 60.0,
            stops: vec![
                ColorStop::new(0.0, (255, 255, 255), 1.0),
                ColorStop::transparent(1.0),
            ],
            layer: GlowLayer::Pointer,
        });
        let near = canvas.pixel(10, 5).0;
        let far = canvas.pixel(15, 5).0;
        assert!(near > far);
        assert!(far > 10);
    }

    #[test]
    fn line_connects_endpoints() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::Line {
            from: Point::new(4.0, 4.0),
            to: Point::new(156.0, 4.0),
            width: 0.5,
            color: Rgba::new((0, 255, 0), 1.0),
        });
        for x in 0..20 {
            assert_eq!(canvas.pixel(x, 0), (0, 255, 0));
        }
        assert_eq!(canvas.pixel(0, 1), (10, 20, 30));
    }

    #[test]
    fn off_canvas_shapes_are_clipped() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::FillCircle {
            center: Point::new(-500.0, -500.0),
            radius: 10.0,
            color: Rgba::new((255, 0, 0), 1.0),
        });
        canvas.draw(&DrawCommand::Streak {
            head: Point::new(150.0, 70.0),
            tail: Point::new(400.0, 300.0),
            width: 2.0,
            stops: vec![ColorStop::new(0.0, (255, 255, 255), 1.0)],
        });
        assert_eq!(canvas.pixel(0, 0), (10, 20, 30));
        assert_eq!(canvas.pixel(18, 8), (255, 255, 255));
    }

    #[test]
    fn far_streak_only_walks_visible_pixels() {
        let mut canvas = canvas();
        canvas.draw(&DrawCommand::Streak {
            head: Point::new(150.0, 70.0),
            tail: Point::new(1.0e30, 1.0e30),
            width: 2.0,
            stops: vec![ColorStop::new(0.0, (255, 255, 255), 1.0)],
        });
        assert_eq!(canvas.pixel(18, 8), (255, 255, 255));

        // Nothing sensible to draw, but it must return
        canvas.draw(&DrawCommand::Streak {
            head: Point::new(150.0, 70.0),
            tail: Point::new(f32::INFINITY, f32::NAN),
            width: 2.0,
            stops: vec![ColorStop::new(0.0, (255, 0, 0), 1.0)],
        });
        assert_eq!(canvas.pixel(18, 8), (255, 255, 255));
    }

    #[test]
    fn line_entering_from_off_canvas_keeps_its_gradient_position() {
        let mut canvas = canvas();
        // Half the segment lies left of the canvas
        canvas.draw(&DrawCommand::Streak {
            head: Point::new(-156.0, 4.0),
            tail: Point::new(156.0, 4.0),
            width: 2.0,
            stops: vec![
                ColorStop::new(0.0, (255, 255, 255), 1.0),
                ColorStop::new(1.0, (0, 0, 0), 1.0),
            ],
        });
        let first = canvas.pixel(0, 0).0;
        assert!(first > 100 && first < 150, "got {}", first);
        assert!(canvas.pixel(19, 0).0 < 20);
    }
}
