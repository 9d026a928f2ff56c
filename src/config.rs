//! Runtime configuration loaded from a TOML file.
//!
//! [`Config`] mirrors every constant in [`crate::constants`]. Missing keys fall
//! back to those defaults, so a file can override only what it cares about:
//!
//! ```toml
//! [field]
//! interaction_radius = 200.0
//! shooting_cap = 5
//!
//! [display]
//! pixel_scale = 6.0
//! start_light = true
//! ```

use crate::constants::*;
use crate::error::{Result, StarfieldError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "starfield.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub display: DisplayConfig,
}

/// Simulation tuning for [`crate::field::ParticleField`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // ── Density ──────────────────────────────────────────────────────────────
    pub mobile_breakpoint: f32,
    pub mobile_star_count: usize,
    pub desktop_star_count: usize,

    // ── Stars ────────────────────────────────────────────────────────────────
    pub star_size_min: f32,
    pub star_size_max: f32,
    pub star_opacity_min: f32,
    pub star_opacity_max: f32,
    pub twinkle_speed_min: f32,
    pub twinkle_speed_max: f32,

    // ── Pointer ──────────────────────────────────────────────────────────────
    pub interaction_radius: f32,
    pub max_offset: f32,
    pub relaxation: f32,
    pub pointer_glow_radius: f32,

    // ── Constellations ───────────────────────────────────────────────────────
    pub constellation_distance: f32,
    pub constellation_base_opacity: f32,
    pub constellation_falloff: f32,

    // ── Nebula ───────────────────────────────────────────────────────────────
    pub light_theme_brightness: f32,

    // ── Shooting stars ───────────────────────────────────────────────────────
    pub shooting_spawn_chance: f32,
    pub shooting_cap: usize,
    pub shooting_decay: f32,
    pub shooting_length_min: f32,
    pub shooting_length_max: f32,
    pub shooting_speed_min: f32,
    pub shooting_speed_max: f32,
    pub shooting_angle_jitter: f32,

    // ── Cursor trail ─────────────────────────────────────────────────────────
    pub trail_length: usize,
    pub trail_drop_frames: u32,

    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            mobile_star_count: MOBILE_STAR_COUNT,
            desktop_star_count: DESKTOP_STAR_COUNT,
            star_size_min: STAR_SIZE_MIN,
            star_size_max: STAR_SIZE_MAX,
            star_opacity_min: STAR_OPACITY_MIN,
            star_opacity_max: STAR_OPACITY_MAX,
            twinkle_speed_min: TWINKLE_SPEED_MIN,
            twinkle_speed_max: TWINKLE_SPEED_MAX,
            interaction_radius: INTERACTION_RADIUS,
            max_offset: MAX_OFFSET,
            relaxation: RELAXATION,
            pointer_glow_radius: POINTER_GLOW_RADIUS,
            constellation_distance: CONSTELLATION_DISTANCE,
            constellation_base_opacity: CONSTELLATION_BASE_OPACITY,
            constellation_falloff: CONSTELLATION_FALLOFF,
            light_theme_brightness: LIGHT_THEME_BRIGHTNESS,
            shooting_spawn_chance: SHOOTING_SPAWN_CHANCE,
            shooting_cap: SHOOTING_CAP,
            shooting_decay: SHOOTING_DECAY,
            shooting_length_min: SHOOTING_LENGTH_MIN,
            shooting_length_max: SHOOTING_LENGTH_MAX,
            shooting_speed_min: SHOOTING_SPEED_MIN,
            shooting_speed_max: SHOOTING_SPEED_MAX,
            shooting_angle_jitter: SHOOTING_ANGLE_JITTER,
            trail_length: TRAIL_LENGTH,
            trail_drop_frames: TRAIL_DROP_FRAMES,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Density policy: star count for a surface of the given width.
    pub fn star_count(&self, width: f32) -> usize {
        if width < self.mobile_breakpoint {
            self.mobile_star_count
        } else {
            self.desktop_star_count
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("interaction_radius", self.interaction_radius)?;
        positive("max_offset", self.max_offset)?;
        positive("constellation_falloff", self.constellation_falloff)?;
        positive("shooting_decay", self.shooting_decay)?;
        positive("constellation_distance", self.constellation_distance)?;
        positive("pointer_glow_radius", self.pointer_glow_radius)?;
        ordered("shooting_angle_jitter", 0.0, self.shooting_angle_jitter)?;
        unit_interval("relaxation", self.relaxation)?;
        unit_interval("shooting_spawn_chance", self.shooting_spawn_chance)?;
        unit_interval("light_theme_brightness", self.light_theme_brightness)?;
        ordered("star_size_max", self.star_size_min, self.star_size_max)?;
        ordered("star_opacity_max", self.star_opacity_min, self.star_opacity_max)?;
        ordered("twinkle_speed_max", self.twinkle_speed_min, self.twinkle_speed_max)?;
        ordered(
            "shooting_length_max",
            self.shooting_length_min,
            self.shooting_length_max,
        )?;
        ordered(
            "shooting_speed_max",
            self.shooting_speed_min,
            self.shooting_speed_max,
        )?;
        if self.relaxation == 0.0 {
            return Err(StarfieldError::InvalidConfig {
                name: "relaxation",
                value: 0.0,
                expected: "(0, 1]",
            });
        }
        Ok(())
    }
}

/// Terminal presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: f32,
    pub pixel_scale: f32,
    pub nebula_grain: f32,
    pub dark_background: (u8, u8, u8),
    pub light_background: (u8, u8, u8),
    pub start_light: bool,
    pub show_caption: bool,
    pub captions: Vec<String>,
    pub typing_ms: u64,
    pub deleting_ms: u64,
    pub pause_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: FPS,
            pixel_scale: PIXEL_SCALE,
            nebula_grain: NEBULA_GRAIN,
            dark_background: DARK_BACKGROUND,
            light_background: LIGHT_BACKGROUND,
            start_light: false,
            show_caption: true,
            captions: CAPTIONS.iter().map(|s| s.to_string()).collect(),
            typing_ms: TYPING_MS,
            deleting_ms: DELETING_MS,
            pause_ms: PAUSE_MS,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<()> {
        positive("fps", self.fps)?;
        positive("pixel_scale", self.pixel_scale)?;
        unit_interval("nebula_grain", self.nebula_grain)?;
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;
        self.display.validate()
    }

    pub fn from_toml(path: &Path, contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| StarfieldError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise the compiled defaults.
    /// Returns the path actually used alongside the config.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok((Config::default(), None));
                }
                fallback
            }
        };

        let contents =
            std::fs::read_to_string(&path).map_err(|source| StarfieldError::ConfigRead {
                path: path.clone(),
                source,
            })?;
        let config = Self::from_toml(&path, &contents)?;
        Ok((config, Some(path)))
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(StarfieldError::InvalidConfig {
            name,
            value,
            expected: "> 0",
        })
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(StarfieldError::InvalidConfig {
            name,
            value,
            expected: "[0, 1]",
        })
    }
}

fn ordered(name: &'static str, min: f32, max: f32) -> Result<()> {
    if min >= 0.0 && max >= min && max.is_finite() {
        Ok(())
    } else {
        Err(StarfieldError::InvalidConfig {
            name,
            value: max,
            expected: ">= its minimum",
        })
    }
}
