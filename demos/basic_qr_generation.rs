use std::error::Error;

use qrstyle::Generator;

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings use their defaults
    let path = Generator::new().save("Hello, World!", "simple_qr.svg")?;

    println!("Simple QR code saved to: {}", path.display());
    Ok(())
}
