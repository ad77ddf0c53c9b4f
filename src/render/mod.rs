//! Turns a built [`QR`] symbol and a resolved [`StyleSpec`] into an SVG
//! document or an RGBA canvas. Both backends draw the same [`Layout`].

mod geometry;
mod raster;
mod svg;

pub use geometry::{layout, Layout, Shape};

use image::RgbaImage;
use tracing::debug;

use crate::builder::QR;
use crate::style::StyleSpec;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RenderTarget {
    Vector,
    Raster,
}

/// Returns UTF-8 SVG bytes for [`RenderTarget::Vector`] and raw RGBA pixels,
/// row major with side `style.size`, for [`RenderTarget::Raster`].
pub fn render(qr: &QR, style: &StyleSpec, target: RenderTarget) -> Vec<u8> {
    match target {
        RenderTarget::Vector => render_svg(qr, style).into_bytes(),
        RenderTarget::Raster => render_raster(qr, style).into_raw(),
    }
}

pub fn render_svg(qr: &QR, style: &StyleSpec) -> String {
    let lay = layout(qr, style);
    debug!(shapes = lay.body.len() + 6, size = style.size, "Rendering svg");
    svg::to_svg(&lay, style)
}

pub fn render_raster(qr: &QR, style: &StyleSpec) -> RgbaImage {
    let lay = layout(qr, style);
    debug!(shapes = lay.body.len() + 6, size = style.size, "Rendering raster");
    raster::to_image(&lay, style)
}
