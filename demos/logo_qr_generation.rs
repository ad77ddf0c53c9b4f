use std::error::Error;

use image::{Rgba, RgbaImage};
use qrstyle::{EyeShape, Generator, ModuleStyle, OutputFormat};

fn main() -> Result<(), Box<dyn Error>> {
    // Any image the image crate can decode works as a logo
    let logo_path = std::env::temp_dir().join("qrstyle_demo_logo.png");
    RgbaImage::from_pixel(64, 64, Rgba([220, 40, 60, 255])).save(&logo_path)?;

    let path = Generator::new()
        .size(400)
        .margin(2)
        .format(OutputFormat::Png)
        .style(ModuleStyle::Dot, None)
        .eye(EyeShape::Circle)
        .logo(&logo_path, 20) // 20% of the symbol width, raises error correction to H
        .save("https://example.com", "logo_qr.png")?;

    println!("QR code with logo saved to: {}", path.display());
    Ok(())
}
