use std::error::Error;

use qrstyle::{ECLevel, EyeShape, Generator, ModuleStyle, OutputFormat};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows all available configuration options for QR code generation.";

    let mut generator = Generator::new();
    generator
        .size(600) // Side length in pixels - defaults to 200
        .margin(4) // Quiet zone in modules - defaults to 0
        .format(OutputFormat::Png) // svg, png, jpeg or webp - defaults to svg
        .color_hex("#1a2b3c")? // Foreground - defaults to black
        .background_color((250, 248, 240)) // Background - defaults to white
        .ec_level(ECLevel::Q) // Error correction level - defaults to L
        .style(ModuleStyle::Round, Some(0.8)) // Module shape and intensity in [0, 1]
        .eye_frame(EyeShape::Circle) // 7x7 finder frame
        .eye_ball(EyeShape::Square) // 3x3 finder ball
        .encoding("utf-8")?; // Character encoding label - defaults to UTF-8

    let path = generator.save(data, "configured_qr.png")?;
    println!("Configured QR code saved to: {}", path.display());

    // The same settings as a data URI, e.g. for an <img> tag
    let uri = generator.format(OutputFormat::Svg).base64(data)?;
    println!("Data URI: {}...", &uri[..60]);

    Ok(())
}
