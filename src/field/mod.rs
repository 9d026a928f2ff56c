//! The starfield: twinkling stars that shy away from the pointer, faint
//! constellation lines near it, nebula glows and the odd shooting star.
//!
//! [`step`] is the whole per-frame update. It mutates a [`FieldState`] and
//! appends [`DrawCommand`]s, so it can be exercised without any surface.
//! [`ParticleField`] wraps it with the pointer, theme, RNG and frame-request
//! lifecycle a host needs.

pub mod star;

use crate::config::FieldConfig;
use crate::constants::{
    CONSTELLATION_LINE_WIDTH, NEBULA_PRIMARY_RADIUS, NEBULA_SECONDARY_RADIUS,
    SHOOTING_CORE_RADIUS, SHOOTING_LINE_WIDTH, STAR_GLOW_SCALE,
};
use crate::draw::{ColorStop, DrawCommand, GlowLayer, Point};
use crate::error::{Result, StarfieldError};
use crate::palette::{Palette, Rgba};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::theme::ThemeSource;
use fastrand::Rng;
pub use star::{ShootingStar, Star};

/// Last known pointer position, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    OffSurface,
    At(Point),
}

impl PointerState {
    pub fn position(self) -> Option<Point> {
        match self {
            PointerState::OffSurface => None,
            PointerState::At(point) => Some(point),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub width: f32,
    pub height: f32,
    pub frame: u64,
    pub stars: Vec<Star>,
    pub shooting_stars: Vec<ShootingStar>,
}

impl FieldState {
    pub fn new(width: f32, height: f32, config: &FieldConfig, rng: &mut Rng) -> Self {
        let mut state = Self {
            width,
            height,
            frame: 0,
            stars: Vec::new(),
            shooting_stars: Vec::with_capacity(config.shooting_cap),
        };
        state.populate(config, rng);
        state
    }

    /// New size, new stars. Existing stars are discarded rather than rescaled.
    pub fn resize(&mut self, width: f32, height: f32, config: &FieldConfig, rng: &mut Rng) {
        self.width = width;
        self.height = height;
        self.populate(config, rng);
    }

    fn populate(&mut self, config: &FieldConfig, rng: &mut Rng) {
        let count = config.star_count(self.width);
        self.stars.clear();
        self.stars.reserve(count);
        for _ in 0..count {
            self.stars.push(Star::random(rng, self.width, self.height, config));
        }
    }
}

/// Advances the field by one frame and appends that frame's draw commands.
pub fn step(
    state: &mut FieldState,
    pointer: PointerState,
    dark: bool,
    config: &FieldConfig,
    rng: &mut Rng,
    out: &mut Vec<DrawCommand>,
) {
    state.frame += 1;
    let palette = Palette::for_theme(dark);
    let glow_level = if dark { 1.0 } else { config.light_theme_brightness };
    let pointer = pointer.position();

    out.push(DrawCommand::Clear);
    draw_nebula(state, &palette, glow_level, out);
    if let Some(pointer) = pointer {
        draw_pointer_glow(pointer, &palette, glow_level, config, out);
    }

    for star in &mut state.stars {
        star.update(pointer, config);
    }
    for star in &state.stars {
        draw_star(star, state.frame, &palette, out);
    }

    if let Some(pointer) = pointer {
        draw_constellations(&state.stars, pointer, &palette, config, out);
    }

    update_shooting_stars(state, config, rng);
    for shooting_star in &state.shooting_stars {
        draw_shooting_star(shooting_star, &palette, out);
    }
}

fn draw_nebula(state: &FieldState, palette: &Palette, level: f32, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::RadialGlow {
        center: Point::new(state.width * 0.2, state.height * 0.3),
        radius: NEBULA_PRIMARY_RADIUS,
        stops: vec![
            ColorStop::new(0.0, palette.nebula_primary, 0.08 * level),
            ColorStop::new(0.5, palette.nebula_primary, 0.03 * level),
            ColorStop::transparent(1.0),
        ],
        layer: GlowLayer::Nebula,
    });
    out.push(DrawCommand::RadialGlow {
        center: Point::new(state.width * 0.8, state.height * 0.7),
        radius: NEBULA_SECONDARY_RADIUS,
        stops: vec![
            ColorStop::new(0.0, palette.nebula_secondary, 0.06 * level),
            ColorStop::new(0.5, palette.nebula_secondary, 0.02 * level),
            ColorStop::transparent(1.0),
        ],
        layer: GlowLayer::Nebula,
    });
}

fn draw_pointer_glow(
    pointer: Point,
    palette: &Palette,
    level: f32,
    config: &FieldConfig,
    out: &mut Vec<DrawCommand>,
) {
    out.push(DrawCommand::RadialGlow {
        center: pointer,
        radius: config.pointer_glow_radius,
        stops: vec![
            ColorStop::new(0.0, palette.nebula_primary, 0.08 * level),
            ColorStop::new(0.5, palette.nebula_secondary, 0.04 * level),
            ColorStop::transparent(1.0),
        ],
        layer: GlowLayer::Pointer,
    });
}

fn draw_star(star: &Star, frame: u64, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let brightness = star.brightness(frame);
    out.push(DrawCommand::RadialGlow {
        center: star.position(),
        radius: star.size * STAR_GLOW_SCALE,
        stops: vec![
            ColorStop::new(0.0, palette.star_glow, brightness),
            ColorStop::new(0.3, palette.nebula_primary, brightness * 0.5),
            ColorStop::transparent(1.0),
        ],
        layer: GlowLayer::Star,
    });
    out.push(DrawCommand::FillCircle {
        center: star.position(),
        radius: star.size,
        color: Rgba::new(palette.star_core, brightness),
    });
}

/// Constellation line alpha for two stars `distance` apart.
pub fn constellation_opacity(distance: f32, config: &FieldConfig) -> f32 {
    (config.constellation_base_opacity - distance / config.constellation_falloff).max(0.0)
}

fn draw_constellations(
    stars: &[Star],
    pointer: Point,
    palette: &Palette,
    config: &FieldConfig,
    out: &mut Vec<DrawCommand>,
) {
    // Pairs are only considered among stars near the pointer
    let nearby: Vec<Point> = stars
        .iter()
        .map(Star::position)
        .filter(|p| p.distance(pointer) < config.interaction_radius)
        .collect();

    for (i, a) in nearby.iter().enumerate() {
        for b in &nearby[i + 1..] {
            let distance = a.distance(*b);
            if distance < config.constellation_distance {
                out.push(DrawCommand::Line {
                    from: *a,
                    to: *b,
                    width: CONSTELLATION_LINE_WIDTH,
                    color: Rgba::new(palette.constellation, constellation_opacity(distance, config)),
                });
            }
        }
    }
}

fn update_shooting_stars(state: &mut FieldState, config: &FieldConfig, rng: &mut Rng) {
    if rng.f32() < config.shooting_spawn_chance && state.shooting_stars.len() < config.shooting_cap
    {
        state
            .shooting_stars
            .push(ShootingStar::random(rng, state.width, state.height, config));
    }

    let (width, height) = (state.width, state.height);
    state.shooting_stars.retain_mut(|shooting_star| {
        shooting_star.advance(config.shooting_decay);
        shooting_star.is_alive(width, height)
    });
}

fn draw_shooting_star(shooting_star: &ShootingStar, palette: &Palette, out: &mut Vec<DrawCommand>) {
    let opacity = shooting_star.opacity;
    out.push(DrawCommand::Streak {
        head: shooting_star.head(),
        tail: shooting_star.tail(),
        width: SHOOTING_LINE_WIDTH,
        stops: vec![
            ColorStop::new(0.0, palette.star_core, opacity),
            ColorStop::new(0.3, palette.nebula_primary, opacity * 0.8),
            ColorStop::transparent(1.0),
        ],
    });
    out.push(DrawCommand::FillCircle {
        center: shooting_star.head(),
        radius: SHOOTING_CORE_RADIUS,
        color: Rgba::new(palette.star_core, opacity),
    });
}

/// A [`FieldState`] plus everything needed to drive it from a host: pointer
/// input, the polled theme, its own RNG and the outstanding frame request.
pub struct ParticleField {
    config: FieldConfig,
    state: FieldState,
    pointer: PointerState,
    theme: Box<dyn ThemeSource>,
    rng: Rng,
    pending: Option<FrameRequest>,
    commands: Vec<DrawCommand>,
}

impl ParticleField {
    pub fn new(config: FieldConfig, theme: impl ThemeSource + 'static) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            state: FieldState {
                width: 0.0,
                height: 0.0,
                frame: 0,
                stars: Vec::new(),
                shooting_stars: Vec::new(),
            },
            config,
            pointer: PointerState::OffSurface,
            theme: Box::new(theme),
            rng,
            pending: None,
            commands: Vec::new(),
        }
    }

    /// Populates the stars for a `width` x `height` surface and requests the
    /// first frame. A surface without area leaves the field idle.
    pub fn start(
        &mut self,
        width: f32,
        height: f32,
        scheduler: &mut FrameScheduler,
    ) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(StarfieldError::NoSurface { width, height });
        }
        self.state = FieldState::new(width, height, &self.config, &mut self.rng);
        self.pending = Some(scheduler.request());
        Ok(())
    }

    /// Cancels the outstanding frame; the field stops advancing.
    pub fn stop(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(request) = self.pending.take() {
            scheduler.cancel(request);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height, &self.config, &mut self.rng);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = PointerState::At(Point::new(x, y));
    }

    pub fn pointer_left(&mut self) {
        self.pointer = PointerState::OffSurface;
    }

    /// Frame callback. Runs a step if `request` is ours and asks for the
    /// next frame; returns whether a frame was produced.
    pub fn on_frame(&mut self, request: FrameRequest, scheduler: &mut FrameScheduler) -> bool {
        if self.pending != Some(request) {
            return false;
        }
        self.step();
        self.pending = Some(scheduler.request());
        true
    }

    /// Runs one frame immediately, outside of any scheduler. A field that
    /// was never started or has been stopped does not advance; the previous
    /// frame's commands are returned as they were.
    pub fn step(&mut self) -> &[DrawCommand] {
        if self.pending.is_none() {
            return &self.commands;
        }
        let dark = self.theme.is_dark();
        self.commands.clear();
        step(
            &mut self.state,
            self.pointer,
            dark,
            &self.config,
            &mut self.rng,
            &mut self.commands,
        );
        &self.commands
    }

    /// Draw commands of the most recent frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn stars(&self) -> &[Star] {
        &self.state.stars
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.state.shooting_stars
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn frame(&self) -> u64 {
        self.state.frame
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeFlag;

    fn seeded(seed: u64) -> FieldConfig {
        FieldConfig {
            seed: Some(seed),
            ..FieldConfig::default()
        }
    }

    fn glow_alpha(commands: &[DrawCommand], layer: GlowLayer) -> Option<f32> {
        commands.iter().find_map(|c| match c {
            DrawCommand::RadialGlow { stops, layer: l, .. } if *l == layer => {
                Some(stops[0].color.alpha)
            }
            _ => None,
        })
    }

    #[test]
    fn frame_starts_with_clear_and_nebula() {
        let config = seeded(1);
        let mut rng = Rng::with_seed(1);
        let mut state = FieldState::new(800.0, 600.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        assert_eq!(out[0], DrawCommand::Clear);
        let nebulae = out
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGlow { layer: GlowLayer::Nebula, .. }))
            .count();
        assert_eq!(nebulae, 2);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn light_theme_halves_nebula() {
        let config = seeded(2);
        let mut rng = Rng::with_seed(2);
        let mut state = FieldState::new(800.0, 600.0, &config, &mut rng);
        let mut dark = Vec::new();
        let mut light = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut dark);
        step(&mut state, PointerState::OffSurface, false, &config, &mut rng, &mut light);
        let d = glow_alpha(&dark, GlowLayer::Nebula).unwrap();
        let l = glow_alpha(&light, GlowLayer::Nebula).unwrap();
        assert!((l - d * 0.5).abs() < 1e-6);
    }

    #[test]
    fn pointer_glow_only_when_on_surface() {
        let config = seeded(3);
        let mut rng = Rng::with_seed(3);
        let mut state = FieldState::new(800.0, 600.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        assert!(glow_alpha(&out, GlowLayer::Pointer).is_none());
        out.clear();
        let pointer = PointerState::At(Point::new(400.0, 300.0));
        step(&mut state, pointer, true, &config, &mut rng, &mut out);
        assert!(glow_alpha(&out, GlowLayer::Pointer).is_some());
    }

    #[test]
    fn every_star_is_drawn_as_glow_and_core() {
        let config = seeded(4);
        let mut rng = Rng::with_seed(4);
        let mut state = FieldState::new(500.0, 400.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        let glows = out
            .iter()
            .filter(|c| matches!(c, DrawCommand::RadialGlow { layer: GlowLayer::Star, .. }))
            .count();
        let cores = out
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(glows, 80);
        assert_eq!(cores, 80 + state.shooting_stars.len());
    }

    #[test]
    fn no_constellations_without_pointer() {
        let config = seeded(5);
        let mut rng = Rng::with_seed(5);
        let mut state = FieldState::new(1200.0, 800.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        assert!(!out.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn constellation_opacity_fades_with_distance() {
        let config = FieldConfig::default();
        assert!((constellation_opacity(0.0, &config) - 0.3).abs() < 1e-6);
        assert!((constellation_opacity(40.0, &config) - 0.2).abs() < 1e-6);
        assert!(constellation_opacity(99.0, &config) > 0.0);
        assert_eq!(constellation_opacity(200.0, &config), 0.0);
    }

    #[test]
    fn shooting_star_cap_holds_with_certain_spawns() {
        let config = FieldConfig {
            shooting_spawn_chance: 1.0,
            seed: Some(6),
            ..FieldConfig::default()
        };
        let mut rng = Rng::with_seed(6);
        let mut state = FieldState::new(4000.0, 4000.0, &config, &mut rng);
        let mut out = Vec::new();
        for _ in 0..300 {
            out.clear();
            step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
            assert!(state.shooting_stars.len() <= 3);
        }
    }

    #[test]
    fn start_refuses_empty_surface() {
        let mut field = ParticleField::new(seeded(7), ThemeFlag::default());
        let mut scheduler = FrameScheduler::new(60.0);
        let err = field.start(0.0, 600.0, &mut scheduler).unwrap_err();
        assert!(matches!(err, StarfieldError::NoSurface { .. }));
        assert!(!field.is_running());
        assert!(!scheduler.is_pending());
        assert!(field.stars().is_empty());
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let mut field = ParticleField::new(seeded(8), ThemeFlag::default());
        let mut scheduler = FrameScheduler::new(60.0);
        field.start(800.0, 600.0, &mut scheduler).unwrap();
        assert!(scheduler.is_pending());
        field.stop(&mut scheduler);
        assert!(!field.is_running());
        assert!(!scheduler.is_pending());
        scheduler.advance(std::time::Duration::from_secs(1));
        assert!(scheduler.take_due().is_none());
        assert_eq!(field.frame(), 0);
    }

    #[test]
    fn each_frame_requests_the_next() {
        let mut field = ParticleField::new(seeded(9), ThemeFlag::default());
        let mut scheduler = FrameScheduler::new(60.0);
        field.start(800.0, 600.0, &mut scheduler).unwrap();
        for expected in 1..=5 {
            scheduler.advance(std::time::Duration::from_millis(17));
            let request = scheduler.take_due().expect("frame due");
            assert!(field.on_frame(request, &mut scheduler));
            assert_eq!(field.frame(), expected);
            assert!(scheduler.is_pending());
        }
    }

    #[test]
    fn theme_is_polled_every_frame() {
        let theme = ThemeFlag::new(true);
        let mut field = ParticleField::new(seeded(10), theme.clone());
        let mut scheduler = FrameScheduler::new(60.0);
        field.start(800.0, 600.0, &mut scheduler).unwrap();
        let dark = glow_alpha(field.step(), GlowLayer::Nebula).unwrap();
        theme.toggle();
        let light = glow_alpha(field.step(), GlowLayer::Nebula).unwrap();
        assert!(light < dark);
    }

    #[test]
    fn nebula_glows_sit_at_fixed_fractions_of_the_surface() {
        let config = seeded(11);
        let mut rng = Rng::with_seed(11);
        let mut state = FieldState::new(1000.0, 500.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        let palette = Palette::for_theme(true);

        let nebulae: Vec<_> = out
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RadialGlow {
                    center,
                    radius,
                    stops,
                    layer: GlowLayer::Nebula,
                } => Some((*center, *radius, stops.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            nebulae,
            vec![
                (
                    Point::new(200.0, 150.0),
                    300.0,
                    vec![
                        ColorStop::new(0.0, palette.nebula_primary, 0.08),
                        ColorStop::new(0.5, palette.nebula_primary, 0.03),
                        ColorStop::transparent(1.0),
                    ],
                ),
                (
                    Point::new(800.0, 350.0),
                    400.0,
                    vec![
                        ColorStop::new(0.0, palette.nebula_secondary, 0.06),
                        ColorStop::new(0.5, palette.nebula_secondary, 0.02),
                        ColorStop::transparent(1.0),
                    ],
                ),
            ]
        );
    }

    #[test]
    fn star_glow_is_three_sizes_wide_around_a_solid_core() {
        let config = FieldConfig {
            shooting_spawn_chance: 0.0,
            ..seeded(12)
        };
        let mut rng = Rng::with_seed(12);
        let mut state = FieldState::new(500.0, 400.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        let palette = Palette::for_theme(true);

        let glows = out.iter().filter(|c| {
            matches!(c, DrawCommand::RadialGlow { layer: GlowLayer::Star, .. })
        });
        let cores = out.iter().filter(|c| matches!(c, DrawCommand::FillCircle { .. }));
        for ((star, glow), core) in state.stars.iter().zip(glows).zip(cores) {
            let b = star.brightness(state.frame);
            assert_eq!(
                *glow,
                DrawCommand::RadialGlow {
                    center: star.position(),
                    radius: star.size * 3.0,
                    stops: vec![
                        ColorStop::new(0.0, palette.star_glow, b),
                        ColorStop::new(0.3, palette.nebula_primary, b * 0.5),
                        ColorStop::transparent(1.0),
                    ],
                    layer: GlowLayer::Star,
                }
            );
            assert_eq!(
                *core,
                DrawCommand::FillCircle {
                    center: star.position(),
                    radius: star.size,
                    color: Rgba::new(palette.star_core, b),
                }
            );
        }
    }

    #[test]
    fn shooting_star_is_a_fading_streak_with_a_bright_head() {
        let config = FieldConfig {
            shooting_spawn_chance: 1.0,
            shooting_cap: 1,
            ..seeded(13)
        };
        let mut rng = Rng::with_seed(13);
        let mut state = FieldState::new(100_000.0, 100_000.0, &config, &mut rng);
        let mut out = Vec::new();
        step(&mut state, PointerState::OffSurface, true, &config, &mut rng, &mut out);
        let palette = Palette::for_theme(true);
        let shooting_star = &state.shooting_stars[0];
        let opacity = shooting_star.opacity;

        let n = out.len();
        assert_eq!(
            out[n - 2],
            DrawCommand::Streak {
                head: shooting_star.head(),
                tail: shooting_star.tail(),
                width: 2.0,
                stops: vec![
                    ColorStop::new(0.0, palette.star_core, opacity),
                    ColorStop::new(0.3, palette.nebula_primary, opacity * 0.8),
                    ColorStop::transparent(1.0),
                ],
            }
        );
        assert_eq!(
            out[n - 1],
            DrawCommand::FillCircle {
                center: shooting_star.head(),
                radius: 3.0,
                color: Rgba::new(palette.star_core, opacity),
            }
        );
        let tail = shooting_star.tail();
        assert!((shooting_star.head().distance(tail) - shooting_star.length).abs() < 0.1);
    }

    #[test]
    fn stopped_field_does_not_advance() {
        let mut field = ParticleField::new(seeded(14), ThemeFlag::default());
        let mut scheduler = FrameScheduler::new(60.0);
        assert!(field.step().is_empty());
        assert_eq!(field.frame(), 0);

        field.start(800.0, 600.0, &mut scheduler).unwrap();
        field.step();
        assert_eq!(field.frame(), 1);
        let last = field.commands().to_vec();

        field.stop(&mut scheduler);
        assert_eq!(field.step(), &last[..]);
        assert_eq!(field.frame(), 1);
    }
}
