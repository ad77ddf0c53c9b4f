use std::fmt::{Debug, Display, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(&self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        if !(1..=40).contains(&ver) {
            return Err(QRError::InvalidVersion(ver));
        }
        Ok(Self(ver))
    }

    pub(crate) const fn unchecked(ver: usize) -> Self {
        debug_assert!(1 <= ver && ver <= 40, "Invalid version");
        Self(ver)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> Vec<i16> {
        let ver = self.0 as i16;
        if ver == 1 {
            return Vec::new();
        }
        let count = ver / 7 + 2;
        let step = (ver * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
        let mut res = vec![6];
        let mut pos = self.width() as i16 - 7;
        for _ in 0..count - 1 {
            res.insert(1, pos);
            pos -= step;
        }
        res
    }

    // Modules left for data & ecc after function patterns, format & version info
    pub fn raw_data_modules(self) -> usize {
        let ver = self.0;
        let mut res = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let count = ver / 7 + 2;
            res -= (25 * count - 10) * count - 55;
            if ver >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0] as usize
    }

    pub fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0] as usize
    }

    // (Group 1 block size, Group 1 block count, Group 2 block size, Group 2 block count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let ecc = self.ecc_per_block(ecl);
        let long_count = total % blocks;
        let short_count = blocks - long_count;
        let short_size = total / blocks - ecc;
        let long_size = if long_count > 0 { short_size + 1 } else { 0 };
        (short_size, short_count, long_size, long_count)
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let group = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][group],
            Mode::Alphanumeric => [9, 11, 13][group],
            Mode::Byte => [8, 16, 16][group],
            Mode::Eci => 0,
        }
    }

    // 18 bit version info: 6 bit version + 12 bit BCH remainder
    pub fn info(self) -> u32 {
        let ver = self.0 as u32;
        ver << 12 | bch_remainder(ver, VERSION_INFO_GENERATOR, 12)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // Two bit indicator written to format info
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            _ => Err(QRError::InvalidConfig(format!("unknown error correction level {s:?}"))),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

// Format information
//------------------------------------------------------------------------------

// 15 bit format info: 2 bit ec level + 3 bit mask + 10 bit BCH remainder, xored with mask
pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = ecl.format_bits() << 3 | *mask as u32;
    (data << 10 | bch_remainder(data, FORMAT_INFO_GENERATOR, 10)) ^ FORMAT_INFO_MASK
}

fn bch_remainder(data: u32, generator: u32, rem_len: u32) -> u32 {
    let gen_len = 32 - generator.leading_zeros();
    let mut rem = data << rem_len;
    while 32 - rem.leading_zeros() >= gen_len {
        rem ^= generator << (32 - rem.leading_zeros() - gen_len);
    }
    rem
}


// ECI designators
//------------------------------------------------------------------------------

// Assignment number announced before byte data. None means the scanner default
// (ISO-8859-1, commonly treated as UTF-8) is already correct.
pub fn eci_designator(encoding: &'static encoding_rs::Encoding) -> Option<u32> {
    let name = encoding.name();
    let eci = match name {
        "UTF-8" | "windows-1252" => return None,
        "ISO-8859-2" => 4,
        "ISO-8859-3" => 5,
        "ISO-8859-4" => 6,
        "ISO-8859-5" => 7,
        "ISO-8859-6" => 8,
        "ISO-8859-7" => 9,
        "ISO-8859-8" | "ISO-8859-8-I" => 10,
        "ISO-8859-10" => 12,
        "windows-874" => 13,
        "ISO-8859-13" => 15,
        "ISO-8859-14" => 16,
        "ISO-8859-15" => 17,
        "ISO-8859-16" => 18,
        "Shift_JIS" => 20,
        "windows-1250" => 21,
        "windows-1251" => 22,
        "windows-1256" => 24,
        "Big5" => 28,
        "GBK" | "gb18030" => 29,
        "EUC-KR" => 30,
        _ => return None,
    };
    Some(eci)
}

// Global constants
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_INFO_GENERATOR: u32 = 0x537;

const FORMAT_INFO_MASK: u32 = 0x5412;

const VERSION_INFO_GENERATOR: u32 = 0x1f25;

// Index: [ec_level][version]
static ECC_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

static BLOCK_COUNT: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
