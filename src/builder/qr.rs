use std::ops::Deref;

use crate::common::{
    bitstream::BitStream,
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN},
};

// Module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Finder(Color),
    Timing(Color),
    Alignment(Color),
    Format(Color),
    Version(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Finder(c)
            | Module::Timing(c)
            | Module::Alignment(c)
            | Module::Format(c)
            | Module::Version(c)
            | Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn region(&self) -> Region {
        match self {
            Module::Finder(_) => Region::Finder,
            Module::Timing(_) => Region::Timing,
            Module::Alignment(_) => Region::Alignment,
            Module::Format(_) => Region::Format,
            Module::Version(_) => Region::Version,
            Module::Empty | Module::Data(_) => Region::Data,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Region {
    Quiet,
    Finder,
    Timing,
    Alignment,
    Format,
    Version,
    Data,
}

// QR matrix
//------------------------------------------------------------------------------

/// A finished QR symbol: a square grid of region tagged modules.
///
/// Coordinates are `(row, column)`. Negative indices count from the far edge,
/// so `get(-1, -1)` is the bottom right module.
#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| ***m == Color::Dark).count()
    }

    /// Module at `(r, c)`. Panics when the coordinate lies outside `-w..w`.
    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    /// Region of an absolute coordinate, `Quiet` for anything outside the symbol.
    pub fn region_at(&self, r: i32, c: i32) -> Region {
        match self.checked_get(r, c) {
            Some(m) => m.region(),
            None => Region::Quiet,
        }
    }

    /// Whether the module at an absolute coordinate is dark. The quiet zone is light.
    pub fn is_dark_at(&self, r: i32, c: i32) -> bool {
        self.checked_get(r, c).is_some_and(|m| *m == Color::Dark)
    }

    fn checked_get(&self, r: i32, c: i32) -> Option<Module> {
        let w = self.w as i32;
        if r < 0 || c < 0 || r >= w || c >= w {
            return None;
        }
        Some(self.grid[(r * w + c) as usize])
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize + 1);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Finder(clr) => clr.select('f', 'F'),
                    Module::Timing(clr) => clr.select('t', 'T'),
                    Module::Alignment(clr) => clr.select('a', 'A'),
                    Module::Format(clr) => clr.select('m', 'M'),
                    Module::Version(clr) => clr.select('v', 'V'),
                    Module::Data(clr) => clr.select('d', 'D'),
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of bounds for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of bounds for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    // Draws the 7x7 finders with their light separators
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom): (i16, i16) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right): (i16, i16) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let clr = match i.abs().max(j.abs()) {
                    4 | 2 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Finder(clr));
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        for i in 8..=last {
            let clr = Color::from(i & 1 == 0);
            self.set(6, i, Module::Timing(clr));
            self.set(i, 6, Module::Timing(clr));
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in &poses {
            for &c in &poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Corners occupied by finder patterns
        if (r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6) {
            return;
        }
        for i in -2..=2_i16 {
            for j in -2..=2_i16 {
                let clr = match i.abs().max(j.abs()) {
                    1 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::Alignment(clr));
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, info: u32) {
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_SIDE);
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    // Two 6x3 blocks, above the bottom left finder and left of the top right finder
    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let info = self.ver.info();
        let w = self.w as i16;
        for i in 0..VERSION_INFO_BIT_LEN {
            let module = Module::Version(Color::from((info >> i) & 1 == 1));
            let a = (i / 3) as i16;
            let b = w - 11 + (i % 3) as i16;
            self.set(a, b, module);
            self.set(b, a, module);
        }
    }

    // Writes bits most significant first along coords
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        module: fn(Color) -> Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert!(coords.len() == bit_len, "Coordinate count doesn't match bit length");

        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, module(Color::from(number & mask != 0)));
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use super::{Module, QR};
    use crate::common::{
        mask::MaskPattern,
        metadata::{format_info, Color, ECLevel, Version},
    };

    #[test]
    fn test_no_version_info_below_7() {
        let mut qr = QR::new(Version::unchecked(6), ECLevel::L);
        qr.draw_version_info();
        assert!(qr.grid.iter().all(|m| *m == Module::Empty));
    }

    #[test]
    fn test_version_info_7() {
        let mut qr = QR::new(Version::unchecked(7), ECLevel::L);
        qr.draw_version_info();
        let s = qr.to_debug_str();
        let rows = s.lines().skip(1).collect::<Vec<_>>();
        // 000111 110010 010100, least significant bit at the top left corner of each block
        assert_eq!(&rows[0][34..37], "VVv");
        assert_eq!(&rows[1][34..37], "VvV");
        assert_eq!(&rows[2][34..37], "VvV");
        assert_eq!(&rows[3][34..37], "Vvv");
        assert_eq!(&rows[4][34..37], "vvv");
        assert_eq!(&rows[5][34..37], "VVV");
        assert_eq!(&rows[34][..6], "VVVVvV");
        assert_eq!(&rows[35][..6], "VvvvvV");
        assert_eq!(&rows[36][..6], "vVVvvV");
    }

    #[test]
    fn test_reserve_format_info_qr() {
        let mut qr = QR::new(Version::unchecked(1), ECLevel::L);
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }

    #[test]
    fn test_format_info_copies_agree() {
        let mut qr = QR::new(Version::unchecked(1), ECLevel::M);
        let info = format_info(ECLevel::M, MaskPattern::new(0).unwrap());
        qr.draw_format_info(info);
        let bit = |r: i16, c: i16| (*qr.get(r, c) == Color::Dark) as u32;
        let mut main = 0;
        for c in [0, 1, 2, 3, 4, 5, 7, 8] {
            main = main << 1 | bit(8, c);
        }
        for r in [7, 5, 4, 3, 2, 1, 0] {
            main = main << 1 | bit(r, 8);
        }
        let mut side = 0;
        for r in [-1, -2, -3, -4, -5, -6, -7] {
            side = side << 1 | bit(r, 8);
        }
        for c in -8..=-1 {
            side = side << 1 | bit(8, c);
        }
        assert_eq!(main, 0b101010000010010);
        assert_eq!(side, main);
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found after placement");
    }

    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
        // Remainder bits
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
    }

    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if !mask_fn(r, c) {
                    continue;
                }
                if let Module::Data(clr) = self.get(r, c) {
                    self.set(r, c, Module::Data(!clr));
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}


// Global constants
//------------------------------------------------------------------------------

// Most significant bit first, wrapping around the top left finder
static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

// Most significant bit first, up the bottom left then along the top right
static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];
