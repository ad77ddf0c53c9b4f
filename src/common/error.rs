use std::path::PathBuf;

use thiserror::Error;

use super::metadata::ECLevel;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QRError {
    // Encoder
    #[error("Empty data")]
    EmptyData,
    #[error(
        "Data too long: {bits} bits exceed the capacity of {capacity} bits at error correction \
         level {ec_level:?}; use a lower error correction level or shorten the input"
    )]
    CapacityExceeded { ec_level: ECLevel, bits: usize, capacity: usize },
    #[error("Invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),
    #[error("Invalid masking pattern {0}, expected 0 to 7")]
    InvalidMaskPattern(u8),
    #[error("Character not representable in encoding {0}")]
    InvalidChar(&'static str),
    #[error("Unknown character encoding {0:?}")]
    UnknownEncoding(String),

    // Style
    #[error("Invalid color {0:?}")]
    InvalidColor(String),
    #[error("Invalid style {0:?}")]
    InvalidStyle(String),
    #[error("Invalid style intensity {0}")]
    InvalidIntensity(f64),
    #[error("Invalid size, must be greater than 0")]
    InvalidSize,

    // Output
    #[error("Unsupported output format {0:?}")]
    UnsupportedFormat(String),
    #[error("Failed to decode logo {source_name}")]
    LogoDecode {
        source_name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode image")]
    Image(#[from] image::ImageError),
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Config
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type QRResult<T> = Result<T, QRError>;

#[cfg(test)]
mod error_tests {
    use std::error::Error;
    use std::path::PathBuf;

    use super::QRError;
    use crate::common::metadata::ECLevel;

    #[test]
    fn test_capacity_message_suggests_remedy() {
        let err = QRError::CapacityExceeded { ec_level: ECLevel::H, bits: 23656, capacity: 10208 };
        let msg = err.to_string();
        assert!(msg.contains("23656"));
        assert!(msg.contains("lower error correction level"));
    }

    #[test]
    fn test_write_error_keeps_path_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = QRError::Write { path: PathBuf::from("/tmp/qr.svg"), source: io };
        assert_eq!(err.to_string(), "Failed to write /tmp/qr.svg");
        assert!(err.source().is_some());
    }
}
