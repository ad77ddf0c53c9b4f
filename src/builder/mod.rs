mod qr;

pub use qr::{Module, Region, QR};

use tracing::{debug, info};

use crate::common::{
    bitstream::BitStream,
    codec::{encode, encode_with_version},
    ec::compute_ecc,
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

/// Low level symbol builder. Version and mask are picked automatically unless pinned.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    eci: Option<u32>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None, eci: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    /// ECI assignment number written ahead of the data, see [`crate::eci_designator`].
    pub fn eci(&mut self, eci: Option<u32>) -> &mut Self {
        self.eci = eci;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("None".to_string(), |v| format!("{v:?}"));
        let mask = self.mask.map_or("None".to_string(), |m| format!("{}", *m));
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        let ecl = self.ec_level;
        debug!(bytes = self.data.len(), builder = %self.metadata(), "Encoding data");

        let (encoded, ver) = match self.version {
            Some(v) => (encode_with_version(self.data, v, ecl, self.eci)?, v),
            None => encode(self.data, ecl, self.eci)?,
        };
        debug!(version = *ver, encoded_bits = encoded.len(), "Selected version");

        let codewords = compute_ecc(encoded.data(), ver, ecl);
        debug!(codewords = codewords.len(), "Added error correction & interleaved blocks");

        let mut qr = QR::new(ver, ecl);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(BitStream::from_bytes(&codewords));

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        info!(
            version = *ver,
            ec_level = %ecl,
            mask = *mask,
            width = qr.width(),
            dark_modules = qr.count_dark_modules(),
            "QR symbol built"
        );
        Ok(qr)
    }
}

#[cfg(test)]
pub(crate) mod builder_tests {
    use test_case::test_case;

    use super::{QRBuilder, QR};
    use crate::common::{
        error::QRError,
        mask::{compute_total_penalty, MaskPattern},
        metadata::{ECLevel, Version},
    };

    // Renders with a 4 module quiet zone at 4px per module and decodes with rqrr
    pub(crate) fn decode(qr: &QR) -> (usize, String) {
        let scale = 4;
        let side = (qr.width() + 8) * scale;
        let mut img = rqrr::PreparedImage::prepare_from_greyscale(side, side, |x, y| {
            let c = (x / scale) as i32 - 4;
            let r = (y / scale) as i32 - 4;
            if qr.is_dark_at(r, c) {
                0
            } else {
                255
            }
        });
        let grids = img.detect_grids();
        assert_eq!(grids.len(), 1);
        let (meta, content) = grids[0].decode().unwrap();
        (meta.version.0, content)
    }

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔍b6🌼".repeat(3), 7, ECLevel::L)]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M)]
    #[test_case("aAAAAAA1111111111111AAAAAAa".repeat(3), 7, ECLevel::Q)]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H)]
    #[test_case("A11111111111111".repeat(20), 10, ECLevel::M)]
    #[test_case("1234567890".repeat(28), 10, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔍b6🌼".repeat(22), 27, ECLevel::L)]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(20), 27, ECLevel::Q)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔍b6🌼".repeat(57), 40, ECLevel::L)]
    #[test_case("1234567890".repeat(305), 40, ECLevel::H)]
    fn test_builder(data: String, ver: usize, ecl: ECLevel) {
        let qr = QRBuilder::new(data.as_bytes())
            .version(Version::new(ver).unwrap())
            .ec_level(ecl)
            .build()
            .unwrap();

        assert_eq!(qr.width(), ver * 4 + 17);
        let (decoded_ver, content) = decode(&qr);
        assert_eq!(decoded_ver, ver);
        assert_eq!(content, data);
    }

    #[test]
    fn test_builder_every_mask() {
        for m in 0..8 {
            let mask = MaskPattern::new(m).unwrap();
            let qr = QRBuilder::new(b"MASK CHECK 0123").mask(mask).build().unwrap();
            assert_eq!(qr.mask(), Some(mask));
            assert_eq!(decode(&qr).1, "MASK CHECK 0123");
        }
    }

    // Masks 1 and 2 tie on the numeric input
    #[test_case("HELLO", 6)]
    #[test_case("1234567890", 1)]
    fn test_builder_picks_first_lowest_penalty_mask(data: &str, exp: u8) {
        let penalties = MaskPattern::all()
            .map(|m| {
                let qr = QRBuilder::new(data.as_bytes()).mask(m).build().unwrap();
                compute_total_penalty(&qr)
            })
            .collect::<Vec<_>>();
        let lowest = *penalties.iter().min().unwrap();
        let first = penalties.iter().position(|&p| p == lowest).unwrap() as u8;

        let qr = QRBuilder::new(data.as_bytes()).build().unwrap();
        assert_eq!(qr.mask(), Some(MaskPattern::new(first).unwrap()), "{penalties:?}");
        assert_eq!(first, exp, "{penalties:?}");
    }

    #[test]
    fn test_builder_picks_smallest_version() {
        let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
        assert_eq!(*qr.version(), 1);
        let qr = QRBuilder::new("a".repeat(100).as_bytes()).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*qr.version(), 5);
    }

    #[test]
    fn test_builder_is_deterministic() {
        let a = QRBuilder::new(b"determinism").build().unwrap();
        let b = QRBuilder::new(b"determinism").build().unwrap();
        assert_eq!(a.mask(), b.mask());
        let w = a.width() as i16;
        for r in 0..w {
            for c in 0..w {
                assert_eq!(a.get(r, c), b.get(r, c));
            }
        }
    }

    #[test]
    fn test_builder_data_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build();
        assert!(matches!(res, Err(QRError::CapacityExceeded { .. })));
    }
}
