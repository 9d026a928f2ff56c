use crate::config::FieldConfig;
use crate::draw::Point;
use fastrand::Rng;
use std::f32::consts::{FRAC_PI_4, TAU};

fn range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub base_x: f32,
    pub base_y: f32,
    pub size: f32,
    pub opacity: f32,
    pub twinkle_speed: f32, // Radians per frame
    pub twinkle_phase: f32,
}

impl Star {
    pub fn random(rng: &mut Rng, width: f32, height: f32, config: &FieldConfig) -> Self {
        let x = rng.f32() * width;
        let y = rng.f32() * height;
        Self {
            x,
            y,
            base_x: x,
            base_y: y,
            size: range(rng, config.star_size_min, config.star_size_max),
            opacity: range(rng, config.star_opacity_min, config.star_opacity_max),
            twinkle_speed: range(rng, config.twinkle_speed_min, config.twinkle_speed_max),
            twinkle_phase: rng.f32() * TAU,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn base(&self) -> Point {
        Point::new(self.base_x, self.base_y)
    }

    /// Distance between the current and rest positions.
    pub fn displacement(&self) -> f32 {
        self.position().distance(self.base())
    }

    /// Twinkled alpha, between 40% and 100% of the base opacity.
    pub fn brightness(&self, frame: u64) -> f32 {
        // f64 keeps the phase accurate once the frame count gets large
        let phase = frame as f64 * self.twinkle_speed as f64 + self.twinkle_phase as f64;
        let twinkle = (phase.sin() * 0.3 + 0.7) as f32;
        self.opacity * twinkle.clamp(0.4, 1.0)
    }

    /// Pushes the star away from a nearby pointer, or eases it back home.
    pub fn update(&mut self, pointer: Option<Point>, config: &FieldConfig) {
        if let Some(pointer) = pointer {
            let dx = pointer.x - self.x;
            let dy = pointer.y - self.y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance < config.interaction_radius {
                let force = (config.interaction_radius - distance) / config.interaction_radius;
                let angle = dy.atan2(dx);
                self.x = self.base_x - angle.cos() * force * config.max_offset;
                self.y = self.base_y - angle.sin() * force * config.max_offset;
                return;
            }
        }

        self.x += (self.base_x - self.x) * config.relaxation;
        self.y += (self.base_y - self.y) * config.relaxation;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
    pub angle: f32,
    pub opacity: f32,
}

// Float decrements may leave a sliver of opacity after the final step
const OPACITY_EPSILON: f32 = 1e-4;

impl ShootingStar {
    /// Spawns somewhere in the upper half, heading down-right.
    pub fn random(rng: &mut Rng, width: f32, height: f32, config: &FieldConfig) -> Self {
        Self {
            x: rng.f32() * width,
            y: rng.f32() * (height / 2.0),
            length: range(rng, config.shooting_length_min, config.shooting_length_max),
            speed: range(rng, config.shooting_speed_min, config.shooting_speed_max),
            angle: FRAC_PI_4 + (rng.f32() - 0.5) * config.shooting_angle_jitter,
            opacity: 1.0,
        }
    }

    pub fn head(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn tail(&self) -> Point {
        Point::new(
            self.x - self.angle.cos() * self.length,
            self.y - self.angle.sin() * self.length,
        )
    }

    pub fn advance(&mut self, decay: f32) {
        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed;
        self.opacity -= decay;
    }

    pub fn is_alive(&self, width: f32, height: f32) -> bool {
        self.opacity > OPACITY_EPSILON
            && self.x >= 0.0
            && self.x <= width
            && self.y >= 0.0
            && self.y <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_star(x: f32, y: f32) -> Star {
        Star {
            x,
            y,
            base_x: x,
            base_y: y,
            size: 1.0,
            opacity: 0.8,
            twinkle_speed: 0.02,
            twinkle_phase: 0.0,
        }
    }

    #[test]
    fn sampled_fields_stay_in_range() {
        let config = FieldConfig::default();
        let mut rng = Rng::with_seed(3);
        for _ in 0..500 {
            let star = Star::random(&mut rng, 640.0, 480.0, &config);
            assert!((0.0..640.0).contains(&star.base_x));
            assert!((0.0..480.0).contains(&star.base_y));
            assert!((0.5..=2.5).contains(&star.size));
            assert!((0.2..=1.0).contains(&star.opacity));
            assert!((0.01..=0.03).contains(&star.twinkle_speed));
            assert_eq!(star.position(), star.base());
        }
    }

    #[test]
    fn pointer_pushes_star_directly_away() {
        let config = FieldConfig::default();
        let mut star = still_star(100.0, 100.0);
        star.update(Some(Point::new(50.0, 100.0)), &config);
        // force = (150 - 50) / 150, offset = force * 30 = 20
        assert!((star.x - 120.0).abs() < 1e-3);
        assert!((star.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn pointer_on_top_of_star_still_bounded() {
        let config = FieldConfig::default();
        let mut star = still_star(10.0, 10.0);
        star.update(Some(Point::new(10.0, 10.0)), &config);
        assert!((star.displacement() - config.max_offset).abs() < 1e-3);
    }

    #[test]
    fn distant_pointer_lets_star_relax() {
        let config = FieldConfig::default();
        let mut star = still_star(0.0, 0.0);
        star.x = 20.0;
        star.update(Some(Point::new(1000.0, 1000.0)), &config);
        assert!((star.x - 19.0).abs() < 1e-4);
    }

    #[test]
    fn brightness_spans_forty_to_hundred_percent() {
        let star = still_star(0.0, 0.0);
        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        for frame in 0..2000 {
            let b = star.brightness(frame);
            lo = lo.min(b);
            hi = hi.max(b);
        }
        assert!(lo >= 0.4 * star.opacity - 1e-6);
        assert!(hi <= star.opacity + 1e-6);
        assert!(lo < 0.45 * star.opacity);
        assert!(hi > 0.95 * star.opacity);
    }

    #[test]
    fn shooting_star_heads_down_right_from_upper_half() {
        let config = FieldConfig::default();
        let mut rng = Rng::with_seed(11);
        for _ in 0..200 {
            let s = ShootingStar::random(&mut rng, 1000.0, 800.0, &config);
            assert!(s.y < 400.0);
            assert!((s.angle - FRAC_PI_4).abs() <= 0.15 + 1e-6);
            assert_eq!(s.opacity, 1.0);
            let tail = s.tail();
            assert!(tail.x < s.x && tail.y < s.y);
        }
    }

    #[test]
    fn shooting_star_leaves_bounds() {
        let mut s = ShootingStar {
            x: 95.0,
            y: 10.0,
            length: 50.0,
            speed: 10.0,
            angle: FRAC_PI_4,
            opacity: 1.0,
        };
        assert!(s.is_alive(100.0, 100.0));
        s.advance(0.01);
        assert!(!s.is_alive(100.0, 100.0));
    }
}
