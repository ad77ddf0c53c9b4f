mod color;

pub use color::Rgb;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::common::{
    error::{QRError, QRResult},
    metadata::ECLevel,
};

// Style tokens
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ModuleStyle {
    #[default]
    Square,
    Dot,
    Round,
}

impl ModuleStyle {
    // Dot diameter or corner rounding used when no intensity is given
    pub const DEFAULT_DOT_INTENSITY: f64 = 0.8;
    pub const DEFAULT_ROUND_INTENSITY: f64 = 0.5;
}

impl FromStr for ModuleStyle {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "dot" | "dots" => Ok(Self::Dot),
            "round" | "rounded" => Ok(Self::Round),
            _ => Err(QRError::InvalidStyle(s.to_string())),
        }
    }
}

impl Display for ModuleStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Square => "square",
            Self::Dot => "dot",
            Self::Round => "round",
        })
    }
}

/// Shape of either part of a finder eye: the 7x7 frame or the 3x3 ball.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum EyeShape {
    #[default]
    Square,
    Circle,
}

impl FromStr for EyeShape {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            _ => Err(QRError::InvalidStyle(s.to_string())),
        }
    }
}

impl Display for EyeShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Square => "square",
            Self::Circle => "circle",
        })
    }
}

// Settings
//------------------------------------------------------------------------------

/// Unvalidated style settings as collected by the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub size: u32,
    pub margin: u32,
    pub foreground: Rgb,
    pub background: Rgb,
    pub ec_level: ECLevel,
    pub module_style: ModuleStyle,
    pub module_intensity: Option<f64>,
    pub eye_frame: EyeShape,
    pub eye_ball: EyeShape,
    pub has_logo: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: 200,
            margin: 0,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            ec_level: ECLevel::L,
            module_style: ModuleStyle::Square,
            module_intensity: None,
            eye_frame: EyeShape::Square,
            eye_ball: EyeShape::Square,
            has_logo: false,
        }
    }
}

// Style spec
//------------------------------------------------------------------------------

/// Resolved module shape. Lengths are fractions of one module.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum ModuleShape {
    Square,
    Dot { diameter: f64 },
    Round { radius: f64 },
}

#[derive(Debug, PartialEq, Clone)]
pub struct StyleSpec {
    pub module: ModuleShape,
    pub eye_frame: EyeShape,
    pub eye_ball: EyeShape,
    pub foreground: Rgb,
    pub background: Rgb,
    pub size: u32,
    pub margin: u32,
    pub ec_level: ECLevel,
}

impl StyleSpec {
    /// Pixels per module, margin included on both sides.
    pub fn scale(&self, qr_width: usize) -> f64 {
        self.size as f64 / (qr_width + 2 * self.margin as usize) as f64
    }
}

pub fn resolve(settings: &Settings) -> QRResult<StyleSpec> {
    if settings.size == 0 {
        return Err(QRError::InvalidSize);
    }

    let module = match settings.module_style {
        ModuleStyle::Square => ModuleShape::Square,
        ModuleStyle::Dot => {
            let i = settings.module_intensity.unwrap_or(ModuleStyle::DEFAULT_DOT_INTENSITY);
            if !(i > 0.0 && i <= 1.0) {
                return Err(QRError::InvalidIntensity(i));
            }
            ModuleShape::Dot { diameter: i }
        }
        ModuleStyle::Round => {
            let i = settings.module_intensity.unwrap_or(ModuleStyle::DEFAULT_ROUND_INTENSITY);
            if !(0.0..=1.0).contains(&i) {
                return Err(QRError::InvalidIntensity(i));
            }
            ModuleShape::Round { radius: i * 0.5 }
        }
    };

    let ec_level = if settings.has_logo { ECLevel::H } else { settings.ec_level };

    Ok(StyleSpec {
        module,
        eye_frame: settings.eye_frame,
        eye_ball: settings.eye_ball,
        foreground: settings.foreground,
        background: settings.background,
        size: settings.size,
        margin: settings.margin,
        ec_level,
    })
}
