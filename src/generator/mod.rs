mod config;

pub use config::{ColorValue, GeneratorConfig};

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::builder::QRBuilder;
use crate::common::{
    error::{QRError, QRResult},
    metadata::{eci_designator, ECLevel},
};
use crate::postprocess::{ensure_supported, post_process, LogoOverlay, LogoSource, OutputFormat};
use crate::render::{render_raster, render_svg, RenderTarget};
use crate::style::{resolve, EyeShape, ModuleStyle, Rgb, Settings};

/// Bytes of a generated symbol paired with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrResponse {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Fluent configuration for styled symbols.
///
/// Setters never fail except where a textual value has to be parsed. Terminal
/// calls (`generate`, `save`, `base64`, `as_response`) leave the generator as
/// it was, so one instance can produce many codes.
///
/// ```rust
/// use qrstyle::{EyeShape, Generator, ModuleStyle, OutputFormat};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let svg = Generator::new()
///     .size(300)
///     .margin(2)
///     .style(ModuleStyle::Dot, None)
///     .eye(EyeShape::Circle)
///     .color_hex("#1a2b3c")?
///     .format(OutputFormat::Svg)
///     .generate("https://example.com")?;
/// assert!(svg.starts_with(b"<?xml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    settings: Settings,
    format: OutputFormat,
    encoding: &'static Encoding,
    logo: Option<LogoOverlay>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        let settings = Settings::default();
        Self { settings, format: OutputFormat::Svg, encoding: UTF_8, logo: None }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    pub fn size(&mut self, size: u32) -> &mut Self {
        self.settings.size = size;
        self
    }

    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.settings.margin = margin;
        self
    }

    pub fn format(&mut self, format: OutputFormat) -> &mut Self {
        self.format = format;
        self
    }

    pub fn color(&mut self, color: impl Into<Rgb>) -> &mut Self {
        self.settings.foreground = color.into();
        self
    }

    pub fn color_hex(&mut self, hex: &str) -> QRResult<&mut Self> {
        self.settings.foreground = Rgb::from_hex(hex)?;
        Ok(self)
    }

    pub fn background_color(&mut self, color: impl Into<Rgb>) -> &mut Self {
        self.settings.background = color.into();
        self
    }

    pub fn background_color_hex(&mut self, hex: &str) -> QRResult<&mut Self> {
        self.settings.background = Rgb::from_hex(hex)?;
        Ok(self)
    }

    /// Ignored while a logo is set, which always uses [`ECLevel::H`].
    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.settings.ec_level = ec_level;
        self
    }

    /// Module shape with an optional intensity in `[0, 1]`. `None` picks the
    /// style's default, see [`ModuleStyle::DEFAULT_DOT_INTENSITY`].
    pub fn style(&mut self, style: ModuleStyle, intensity: Option<f64>) -> &mut Self {
        self.settings.module_style = style;
        self.settings.module_intensity = intensity;
        self
    }

    pub fn eye(&mut self, shape: EyeShape) -> &mut Self {
        self.settings.eye_frame = shape;
        self.settings.eye_ball = shape;
        self
    }

    pub fn eye_frame(&mut self, shape: EyeShape) -> &mut Self {
        self.settings.eye_frame = shape;
        self
    }

    pub fn eye_ball(&mut self, shape: EyeShape) -> &mut Self {
        self.settings.eye_ball = shape;
        self
    }

    /// Character encoding by WHATWG label, e.g. `"utf-8"`, `"shift_jis"`.
    pub fn encoding(&mut self, label: &str) -> QRResult<&mut Self> {
        // UTF-16 labels resolve to encoders that write UTF-8
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .filter(|enc| enc.output_encoding() == *enc)
            .ok_or_else(|| QRError::UnknownEncoding(label.to_string()))?;
        self.encoding = encoding;
        Ok(self)
    }

    pub fn logo(&mut self, path: impl Into<PathBuf>, percentage: u32) -> &mut Self {
        self.set_logo(LogoSource::Path(path.into()), percentage)
    }

    pub fn logo_bytes(&mut self, bytes: impl Into<Vec<u8>>, percentage: u32) -> &mut Self {
        self.set_logo(LogoSource::Bytes(bytes.into()), percentage)
    }

    fn set_logo(&mut self, source: LogoSource, percentage: u32) -> &mut Self {
        if self.settings.ec_level != ECLevel::H {
            warn!(from = %self.settings.ec_level, "Logo set, raising error correction to H");
        }
        self.settings.ec_level = ECLevel::H;
        self.settings.has_logo = true;
        self.logo = Some(LogoOverlay::new(source, percentage));
        self
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

// Terminal operations
//------------------------------------------------------------------------------

impl Generator {
    pub fn generate(&self, text: &str) -> QRResult<Vec<u8>> {
        ensure_supported(self.format)?;
        let style = resolve(&self.settings)?;
        let data = self.encode_text(text)?;
        let eci = eci_designator(self.encoding);

        let qr = QRBuilder::new(&data).ec_level(style.ec_level).eci(eci).build()?;

        match self.format.target() {
            RenderTarget::Vector => {
                if self.logo.is_some() {
                    debug!("Logo is not drawn on svg output");
                }
                Ok(render_svg(&qr, &style).into_bytes())
            }
            RenderTarget::Raster => {
                post_process(render_raster(&qr, &style), self.format, self.logo.as_ref())
            }
        }
    }

    /// Writes the symbol to `path` and returns the path written.
    pub fn save(&self, text: &str, path: impl AsRef<Path>) -> QRResult<PathBuf> {
        let bytes = self.generate(text)?;
        let path = path.as_ref().to_path_buf();
        std::fs::write(&path, bytes)
            .map_err(|source| QRError::Write { path: path.clone(), source })?;
        debug!(path = %path.display(), "Saved symbol");
        Ok(path)
    }

    /// Data URI of the symbol, `data:<mime>;base64,<payload>`.
    pub fn base64(&self, text: &str) -> QRResult<String> {
        let bytes = self.generate(text)?;
        Ok(format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(bytes)))
    }

    pub fn as_response(&self, text: &str) -> QRResult<QrResponse> {
        Ok(QrResponse { bytes: self.generate(text)?, mime_type: self.mime_type() })
    }

    fn encode_text(&self, text: &str) -> QRResult<Vec<u8>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(QRError::InvalidChar(self.encoding.name()));
        }
        Ok(bytes.into_owned())
    }
}
