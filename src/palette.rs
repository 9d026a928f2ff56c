pub type Rgb = (u8, u8, u8);

/// A colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        rgb: (0, 0, 0),
        alpha: 0.0,
    };

    pub fn new(rgb: Rgb, alpha: f32) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Colours for one frame, picked from the dark/light flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub star_core: Rgb,
    pub star_glow: Rgb,
    pub nebula_primary: Rgb,
    pub nebula_secondary: Rgb,
    pub constellation: Rgb,
}

const DARK: Palette = Palette {
    star_core: (255, 255, 255),
    star_glow: (224, 231, 255),
    nebula_primary: (139, 92, 246),   // Violet
    nebula_secondary: (59, 130, 246), // Blue
    constellation: (139, 92, 246),
};

// Stars turn violet on a pale background so they stay visible
const LIGHT: Palette = Palette {
    star_core: (124, 58, 237),
    star_glow: (139, 92, 246),
    nebula_primary: (124, 58, 237),
    nebula_secondary: (37, 99, 235),
    constellation: (124, 58, 237),
};

impl Palette {
    pub fn for_theme(dark: bool) -> Palette {
        if dark { DARK } else { LIGHT }
    }
}

pub fn blend_colors(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    (
        (c1.0 as f32 * (1.0 - t) + c2.0 as f32 * t) as u8,
        (c1.1 as f32 * (1.0 - t) + c2.1 as f32 * t) as u8,
        (c1.2 as f32 * (1.0 - t) + c2.2 as f32 * t) as u8,
    )
}
