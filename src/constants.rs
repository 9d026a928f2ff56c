//! Compile-time defaults for every tunable value.
//!
//! [`crate::config::FieldConfig`] and [`crate::config::DisplayConfig`] mirror
//! these; a TOML file only needs to name the values it wants to change.
//! Distances are in logical units (px-equivalent), counts per frame.

// ── Density ───────────────────────────────────────────────────────────────────

/// Surfaces narrower than this get the mobile star count.
pub const MOBILE_BREAKPOINT: f32 = 768.0;
pub const MOBILE_STAR_COUNT: usize = 80;
pub const DESKTOP_STAR_COUNT: usize = 200;

// ── Stars ─────────────────────────────────────────────────────────────────────

pub const STAR_SIZE_MIN: f32 = 0.5;
pub const STAR_SIZE_MAX: f32 = 2.5;
pub const STAR_OPACITY_MIN: f32 = 0.2;
pub const STAR_OPACITY_MAX: f32 = 1.0;
/// Radians per frame.
pub const TWINKLE_SPEED_MIN: f32 = 0.01;
pub const TWINKLE_SPEED_MAX: f32 = 0.03;
/// Glow radius as a multiple of the star size.
pub const STAR_GLOW_SCALE: f32 = 3.0;

// ── Pointer interaction ───────────────────────────────────────────────────────

pub const INTERACTION_RADIUS: f32 = 150.0;
pub const MAX_OFFSET: f32 = 30.0;
/// Fraction of the remaining distance to base closed each frame.
pub const RELAXATION: f32 = 0.05;
pub const POINTER_GLOW_RADIUS: f32 = 200.0;

// ── Constellations ────────────────────────────────────────────────────────────

pub const CONSTELLATION_DISTANCE: f32 = 100.0;
pub const CONSTELLATION_BASE_OPACITY: f32 = 0.3;
pub const CONSTELLATION_FALLOFF: f32 = 400.0;
pub const CONSTELLATION_LINE_WIDTH: f32 = 0.5;

// ── Nebula ────────────────────────────────────────────────────────────────────

pub const NEBULA_PRIMARY_RADIUS: f32 = 300.0;
pub const NEBULA_SECONDARY_RADIUS: f32 = 400.0;
/// Glow alpha multiplier while the light theme is active.
pub const LIGHT_THEME_BRIGHTNESS: f32 = 0.5;

// ── Shooting stars ────────────────────────────────────────────────────────────

pub const SHOOTING_SPAWN_CHANCE: f32 = 0.005;
pub const SHOOTING_CAP: usize = 3;
pub const SHOOTING_DECAY: f32 = 0.01;
pub const SHOOTING_LENGTH_MIN: f32 = 40.0;
pub const SHOOTING_LENGTH_MAX: f32 = 120.0;
pub const SHOOTING_SPEED_MIN: f32 = 10.0;
pub const SHOOTING_SPEED_MAX: f32 = 25.0;
/// Total spread around the 45° heading, in radians.
pub const SHOOTING_ANGLE_JITTER: f32 = 0.3;
pub const SHOOTING_LINE_WIDTH: f32 = 2.0;
pub const SHOOTING_CORE_RADIUS: f32 = 3.0;

// ── Cursor trail ──────────────────────────────────────────────────────────────

pub const TRAIL_LENGTH: usize = 16;
/// Frames between dropping the oldest trail point (~50 ms at 60 Hz).
pub const TRAIL_DROP_FRAMES: u32 = 3;
pub const TRAIL_DOT_RADIUS: f32 = 4.0;

// ── Display ───────────────────────────────────────────────────────────────────

pub const FPS: f32 = 60.0;
/// Logical units covered by one half-block pixel.
pub const PIXEL_SCALE: f32 = 8.0;
pub const NEBULA_GRAIN: f32 = 0.25;
pub const DARK_BACKGROUND: (u8, u8, u8) = (0, 0, 0);
pub const LIGHT_BACKGROUND: (u8, u8, u8) = (245, 243, 255);

// ── Caption ───────────────────────────────────────────────────────────────────

pub const TYPING_MS: u64 = 80;
pub const DELETING_MS: u64 = 40;
pub const PAUSE_MS: u64 = 2500;
pub const CAPTIONS: [&str; 3] = [
    "Exploring AI Galaxies",
    "Building Intelligent Constellations",
    "Navigating Data Nebulas",
];
