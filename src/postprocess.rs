use std::fmt::{Display, Formatter};
use std::io::Cursor;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use image::{
    imageops::{self, FilterType},
    DynamicImage, ImageFormat, Rgba, RgbaImage,
};
use tracing::debug;

use crate::common::error::{QRError, QRResult};
use crate::render::RenderTarget;

// Output format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub const RASTER: [OutputFormat; 3] = [Self::Png, Self::Jpeg, Self::WebP];

    pub fn target(self) -> RenderTarget {
        match self {
            Self::Svg => RenderTarget::Vector,
            _ => RenderTarget::Raster,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Codec used by the `image` crate, `None` for svg.
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Svg => None,
            Self::Png => Some(ImageFormat::Png),
            Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::WebP => Some(ImageFormat::WebP),
        }
    }

    fn has_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::WebP),
            _ => Err(QRError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
        })
    }
}

// Raster formats the linked image build can encode, probed once per process
fn writable_formats() -> &'static [OutputFormat] {
    static WRITABLE: OnceLock<Vec<OutputFormat>> = OnceLock::new();
    WRITABLE.get_or_init(|| {
        let formats = OutputFormat::RASTER
            .into_iter()
            .filter(|f| f.image_format().is_some_and(|f| f.writing_enabled()))
            .collect::<Vec<_>>();
        debug!(?formats, "Probed raster encoders");
        formats
    })
}

pub fn ensure_supported(format: OutputFormat) -> QRResult<()> {
    match format {
        OutputFormat::Svg => Ok(()),
        f if writable_formats().contains(&f) => Ok(()),
        f => Err(QRError::UnsupportedFormat(f.to_string())),
    }
}


// Logo
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LogoSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl LogoSource {
    fn name(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Bytes(b) => format!("<{} bytes in memory>", b.len()),
        }
    }

    fn load(&self) -> QRResult<DynamicImage> {
        let res = match self {
            Self::Path(p) => image::open(p),
            Self::Bytes(b) => image::load_from_memory(b),
        };
        res.map_err(|source| QRError::LogoDecode { source_name: self.name(), source })
    }
}

/// Image centred over the symbol, `percentage` of the symbol width wide.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LogoOverlay {
    pub source: LogoSource,
    pub percentage: u32,
}

impl LogoOverlay {
    pub const DEFAULT_PERCENTAGE: u32 = 20;

    pub fn new(source: LogoSource, percentage: u32) -> Self {
        Self { source, percentage }
    }

    fn apply(&self, canvas: &mut RgbaImage) -> QRResult<()> {
        let logo = self.source.load()?.to_rgba8();
        let (lw, lh) = logo.dimensions();
        let (cw, ch) = canvas.dimensions();
        if lw == 0 || lh == 0 {
            return Ok(());
        }

        let (w, h) = logo_size((lw, lh), (cw, ch), self.percentage);
        let logo = imageops::resize(&logo, w, h, FilterType::Lanczos3);

        let (x, y) = ((cw as i64 - w as i64) / 2, (ch as i64 - h as i64) / 2);
        debug!(width = w, height = h, x, y, "Placing logo");
        imageops::overlay(canvas, &logo, x, y);
        Ok(())
    }
}

// Width is `percentage` of the canvas width, shrunk to keep the height within the canvas
fn logo_size((lw, lh): (u32, u32), (cw, ch): (u32, u32), percentage: u32) -> (u32, u32) {
    let (lw, lh, cw, ch) = (lw as u64, lh as u64, cw as u64, ch as u64);
    let w = (cw * percentage as u64 / 100).clamp(1, cw);
    let h = (lh * w / lw).max(1);
    if h <= ch {
        return (w as u32, h as u32);
    }
    ((lw * ch / lh).max(1) as u32, ch as u32)
}

// Post process
//------------------------------------------------------------------------------

/// Encodes a rendered canvas, compositing the logo if any.
pub fn post_process(
    mut canvas: RgbaImage,
    format: OutputFormat,
    logo: Option<&LogoOverlay>,
) -> QRResult<Vec<u8>> {
    ensure_supported(format)?;
    let image_format =
        format.image_format().ok_or_else(|| QRError::UnsupportedFormat(format.to_string()))?;

    if !format.has_alpha() {
        flatten(&mut canvas, Rgba([255, 255, 255, 255]));
    }
    if let Some(logo) = logo {
        logo.apply(&mut canvas)?;
    }

    let img = if format.has_alpha() {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    };
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image_format)?;
    debug!(format = %format, bytes = out.get_ref().len(), "Encoded raster");
    Ok(out.into_inner())
}

// Alpha over an opaque matte
fn flatten(canvas: &mut RgbaImage, matte: Rgba<u8>) {
    for px in canvas.pixels_mut() {
        let a = px[3] as u32;
        for i in 0..3 {
            px[i] = ((px[i] as u32 * a + matte[i] as u32 * (255 - a) + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}
