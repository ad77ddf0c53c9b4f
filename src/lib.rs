//! # qrstyle
//!
//! A Rust library for generating styled QR codes with Reed-Solomon error correction.
//! Symbols are rendered to SVG or to PNG, JPEG and WebP with custom module shapes,
//! finder eye styles, colors and an optional centred logo.
//!
//! ## Features
//!
//! - **QR Code Generation**: Versions 1 to 40, levels L/M/Q/H, optimal segmentation
//!   over numeric, alphanumeric and byte modes, ECI for non UTF-8 text encodings
//! - **Module Styles**: Square, dot or round modules with adjustable intensity
//! - **Eye Styles**: Square or circular frames and balls, set independently
//! - **Output**: Standalone SVG documents or encoded raster images, data URIs and
//!   content typed responses
//! - **Logo Overlay**: Centred logo scaled to a share of the symbol width, with error
//!   correction raised to H automatically
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrstyle::Generator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults: 200px svg, black on white, level L, square modules
//! let svg = Generator::new().generate("Hello, World!")?;
//! assert!(String::from_utf8(svg)?.contains("<svg"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrstyle::{ECLevel, EyeShape, Generator, ModuleStyle, OutputFormat};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let uri = Generator::new()
//!     .size(400)                              // Side length in pixels
//!     .margin(2)                              // Quiet zone in modules
//!     .format(OutputFormat::Png)              // svg, png, jpeg or webp
//!     .color_hex("#1a2b3c")?                  // Foreground
//!     .background_color((250, 250, 250))      // Background
//!     .ec_level(ECLevel::Q)                   // Error correction level
//!     .style(ModuleStyle::Round, Some(0.8))   // Module shape and intensity
//!     .eye_frame(EyeShape::Circle)            // 7x7 finder frame
//!     .eye_ball(EyeShape::Square)             // 3x3 finder ball
//!     .base64("https://example.com")?;
//! assert!(uri.starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Low Level Symbol
//!
//! ```rust
//! use qrstyle::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)           // Smallest fitting version if not provided
//!     .ec_level(ECLevel::M)                // Defaults to M
//!     .mask(MaskPattern::new(3)?)          // Lowest penalty mask if not provided
//!     .build()?;
//! assert_eq!(qr.width(), 25);
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Logging
//!
//! Pipeline stages emit `tracing` events. Install any subscriber to see them.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod generator;
pub mod postprocess;
pub mod render;
pub mod style;

pub use builder::{Module, Region, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{eci_designator, Color, ECLevel, Version};
pub use generator::{Generator, GeneratorConfig, QrResponse};
pub use postprocess::{LogoOverlay, LogoSource, OutputFormat};
pub use render::RenderTarget;
pub use style::{EyeShape, ModuleStyle, Rgb, StyleSpec};
