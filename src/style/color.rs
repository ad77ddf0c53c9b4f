use std::fmt::{Display, Formatter};
use std::str::FromStr;

use image::Rgba;

use crate::common::error::{QRError, QRResult};

// Rgb
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`, case-insensitive, `#` optional. Short form
    /// repeats each digit.
    pub fn from_hex(hex: &str) -> QRResult<Self> {
        let invalid = || QRError::InvalidColor(hex.to_string());

        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, ch) in digits.chars().enumerate() {
                    rgb[i] = channel(&ch.to_string().repeat(2))?;
                }
                Ok(Self::new(rgb[0], rgb[1], rgb[2]))
            }
            6 => {
                let (r, g, b) = (&digits[0..2], &digits[2..4], &digits[4..6]);
                Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

// Channels from loosely typed sources such as config files
impl TryFrom<[i64; 3]> for Rgb {
    type Error = QRError;

    fn try_from(value: [i64; 3]) -> Result<Self, Self::Error> {
        let channel =
            |v: i64| u8::try_from(v).map_err(|_| QRError::InvalidColor(format!("{value:?}")));
        Ok(Self::new(channel(value[0])?, channel(value[1])?, channel(value[2])?))
    }
}

#[cfg(test)]
mod rgb_tests {
    use test_case::test_case;

    use super::Rgb;
    use crate::common::error::QRError;

    #[test_case("#fff", Rgb::new(255, 255, 255))]
    #[test_case("#000000", Rgb::new(0, 0, 0))]
    #[test_case("#1a2b3c", Rgb::new(26, 43, 60))]
    #[test_case("#1A2B3C", Rgb::new(26, 43, 60))]
    #[test_case("f80", Rgb::new(255, 136, 0))]
    #[test_case(" #ABC ", Rgb::new(170, 187, 204))]
    fn test_from_hex(hex: &str, exp: Rgb) {
        assert_eq!(Rgb::from_hex(hex).unwrap(), exp);
    }

    #[test_case("#12")]
    #[test_case("")]
    #[test_case("#")]
    #[test_case("#12345")]
    #[test_case("#1234567")]
    #[test_case("#ggg")]
    #[test_case("#+1a2b3")]
    fn test_malformed_hex(hex: &str) {
        assert!(matches!(Rgb::from_hex(hex), Err(QRError::InvalidColor(_))));
    }

    #[test]
    fn test_channels_out_of_range() {
        assert_eq!(Rgb::try_from([12i64, 0, 255]).unwrap(), Rgb::new(12, 0, 255));
        assert!(matches!(Rgb::try_from([256i64, 0, 0]), Err(QRError::InvalidColor(_))));
        assert!(matches!(Rgb::try_from([0i64, -1, 0]), Err(QRError::InvalidColor(_))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgb::new(26, 43, 60).to_hex(), "#1a2b3c");
        assert_eq!(Rgb::from((255, 0, 8)).to_string(), "#ff0008");
    }
}
