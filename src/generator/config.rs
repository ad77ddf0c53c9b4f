use std::path::PathBuf;

use serde::Deserialize;

use super::Generator;
use crate::common::{
    error::{QRError, QRResult},
    metadata::ECLevel,
};
use crate::postprocess::{LogoOverlay, OutputFormat};
use crate::style::{EyeShape, ModuleStyle, Rgb};

/// Either `[r, g, b]` channels or a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Channels([i64; 3]),
    Hex(String),
}

impl ColorValue {
    pub fn to_rgb(&self) -> QRResult<Rgb> {
        match self {
            Self::Channels(c) => Rgb::try_from(*c),
            Self::Hex(h) => Rgb::from_hex(h),
        }
    }
}

/// Generator options as they appear in a config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_foreground")]
    pub foreground: ColorValue,
    #[serde(default = "default_background")]
    pub background: ColorValue,
    #[serde(default = "default_error_correction")]
    pub error_correction: String,
    #[serde(default = "default_style")]
    pub module_style: String,
    #[serde(default)]
    pub module_intensity: Option<f64>,
    #[serde(default = "default_style")]
    pub eye_frame_style: String,
    #[serde(default = "default_style")]
    pub eye_ball_style: String,
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    #[serde(default = "default_logo_percentage")]
    pub logo_percentage: u32,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_size() -> u32 {
    200
}

fn default_format() -> String {
    "svg".to_string()
}

fn default_foreground() -> ColorValue {
    ColorValue::Channels([0, 0, 0])
}

fn default_background() -> ColorValue {
    ColorValue::Channels([255, 255, 255])
}

fn default_error_correction() -> String {
    "L".to_string()
}

fn default_style() -> String {
    "square".to_string()
}

fn default_logo_percentage() -> u32 {
    LogoOverlay::DEFAULT_PERCENTAGE
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            margin: 0,
            format: default_format(),
            foreground: default_foreground(),
            background: default_background(),
            error_correction: default_error_correction(),
            module_style: default_style(),
            module_intensity: None,
            eye_frame_style: default_style(),
            eye_ball_style: default_style(),
            logo_path: None,
            logo_percentage: default_logo_percentage(),
            encoding: default_encoding(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml(toml_content: &str) -> QRResult<Self> {
        toml::from_str(toml_content).map_err(|e| QRError::InvalidConfig(e.to_string()))
    }

    /// Reads string options such as query or form parameters. Unknown keys are
    /// skipped. Colors take hex or `r,g,b`.
    pub fn from_map<'a, I>(entries: I) -> QRResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cfg = Self::default();
        for (key, value) in entries {
            let value = value.trim();
            match key {
                "size" => cfg.size = parse_num(key, value)?,
                "margin" => cfg.margin = parse_num(key, value)?,
                "format" => cfg.format = value.to_string(),
                "foreground" => cfg.foreground = parse_color(value)?,
                "background" => cfg.background = parse_color(value)?,
                "error_correction" => cfg.error_correction = value.to_string(),
                "module_style" => cfg.module_style = value.to_string(),
                "module_intensity" => cfg.module_intensity = Some(parse_num(key, value)?),
                "eye_frame_style" => cfg.eye_frame_style = value.to_string(),
                "eye_ball_style" => cfg.eye_ball_style = value.to_string(),
                "logo_path" => cfg.logo_path = Some(PathBuf::from(value)),
                "logo_percentage" => cfg.logo_percentage = parse_num(key, value)?,
                "encoding" => cfg.encoding = value.to_string(),
                _ => {}
            }
        }
        Ok(cfg)
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> QRResult<T> {
    value.parse().map_err(|_| QRError::InvalidConfig(format!("{key}: {value:?} is not a number")))
}

fn parse_color(value: &str) -> QRResult<ColorValue> {
    if !value.contains(',') {
        return Ok(ColorValue::Hex(value.to_string()));
    }
    let parts = value
        .split(',')
        .map(|p| parse_num::<i64>("color", p.trim()))
        .collect::<QRResult<Vec<_>>>()?;
    let channels = <[i64; 3]>::try_from(parts)
        .map_err(|_| QRError::InvalidConfig(format!("color: {value:?} needs 3 channels")))?;
    Ok(ColorValue::Channels(channels))
}

impl Generator {
    /// Builds a generator from parsed options, validating every token.
    pub fn from_config(cfg: &GeneratorConfig) -> QRResult<Self> {
        let mut generator = Generator::new();
        generator
            .size(cfg.size)
            .margin(cfg.margin)
            .format(cfg.format.parse::<OutputFormat>()?)
            .color(cfg.foreground.to_rgb()?)
            .background_color(cfg.background.to_rgb()?)
            .ec_level(cfg.error_correction.parse::<ECLevel>()?)
            .style(cfg.module_style.parse::<ModuleStyle>()?, cfg.module_intensity)
            .eye_frame(cfg.eye_frame_style.parse::<EyeShape>()?)
            .eye_ball(cfg.eye_ball_style.parse::<EyeShape>()?)
            .encoding(&cfg.encoding)?;
        if let Some(path) = &cfg.logo_path {
            generator.logo(path.clone(), cfg.logo_percentage);
        }
        Ok(generator)
    }
}
