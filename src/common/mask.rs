use std::ops::Deref;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (p & 1) + (p % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p & 1) + (p % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((((r + c) & 1) as i32) + (p % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Mask pattern is validated on construction"),
        }
    }
}

#[cfg(test)]
mod mask_function_tests {
    use test_case::test_case;

    use super::MaskPattern;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(MaskPattern::new(8).is_err());
        assert_eq!(*MaskPattern::new(7).unwrap(), 7);
        assert_eq!(MaskPattern::all().count(), 8);
    }

    // First row of each pattern over 6 columns, followed by the second row
    #[test_case(0, "101010", "010101")]
    #[test_case(1, "111111", "000000")]
    #[test_case(2, "100100", "100100")]
    #[test_case(3, "100100", "001001")]
    #[test_case(4, "111000", "111000")]
    #[test_case(5, "111111", "100000")]
    #[test_case(6, "111111", "111000")]
    #[test_case(7, "101010", "000111")]
    fn test_mask_rows(pattern: u8, row0: &str, row1: &str) {
        let f = MaskPattern::new(pattern).unwrap().mask_function();
        let render = |r: i16| (0..6).map(|c| if f(r, c) { '1' } else { '0' }).collect::<String>();
        assert_eq!(render(0), row0);
        assert_eq!(render(1), row1);
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Tries all 8 masks on copies of the symbol and keeps the lowest penalty, lowest index on ties
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let (best_mask, best_qr) = MaskPattern::all()
        .map(|m| {
            let mut candidate = qr.clone();
            candidate.apply_mask(m);
            (m, candidate)
        })
        .min_by_key(|(_, candidate)| compute_total_penalty(candidate))
        .unwrap_or_else(|| unreachable!("There are always 8 mask patterns"));
    *qr = best_qr;
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let grid = (0..w as i16)
        .flat_map(|r| (0..w as i16).map(move |c| (r, c)))
        .map(|(r, c)| *qr.get(r, c))
        .collect::<Vec<_>>();
    penalty(&grid, w)
}

fn penalty(grid: &[Color], w: usize) -> u32 {
    debug_assert!(grid.len() == w * w, "Grid is not square: Len {}, Width {w}", grid.len());

    let row = move |i: usize| move |j: usize| grid[i * w + j];
    let col = move |i: usize| move |j: usize| grid[j * w + i];

    let mut pen = 0;
    for i in 0..w {
        pen += adjacent_penalty(w, row(i)) + adjacent_penalty(w, col(i));
        pen += finder_pattern_penalty(w, row(i)) + finder_pattern_penalty(w, col(i));
    }
    pen + block_penalty(grid, w) + balance_penalty(grid)
}

// N1: 3 for a run of 5 same colored modules plus 1 for each additional module
fn adjacent_penalty(w: usize, line: impl Fn(usize) -> Color) -> u32 {
    let mut pen = 0;
    let mut run = 0;
    let mut last = None;
    for j in 0..w {
        let clr = line(j);
        if last == Some(clr) {
            run += 1;
        } else {
            if run >= 5 {
                pen += run - 2;
            }
            last = Some(clr);
            run = 1;
        }
    }
    if run >= 5 {
        pen += run - 2;
    }
    pen
}

// N2: 3 for every 2x2 block of one color, overlapping blocks counted separately
fn block_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for r in 0..w.saturating_sub(1) {
        for c in 0..w - 1 {
            let clr = grid[r * w + c];
            if clr == grid[r * w + c + 1]
                && clr == grid[(r + 1) * w + c]
                && clr == grid[(r + 1) * w + c + 1]
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 40 for each 1:1:3:1:1 dark-light-dark-dark-dark-light-dark run with 4 light modules on
// either side. Modules beyond the edge count as light.
fn finder_pattern_penalty(w: usize, line: impl Fn(usize) -> Color) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    if w < 7 {
        return 0;
    }

    let is_light = |j: isize| j < 0 || j >= w as isize || line(j as usize) == Color::Light;
    let mut pen = 0;
    for j in 0..=w - 7 {
        if (0..7).any(|k| line(j + k) != PATTERN[k]) {
            continue;
        }
        let j = j as isize;
        let light_before = (j - 4..j).all(&is_light);
        let light_after = (j + 7..j + 11).all(&is_light);
        if light_before || light_after {
            pen += 40;
        }
    }
    pen
}

// N4: 10 for every full 5% step the dark ratio deviates from 50%
fn balance_penalty(grid: &[Color]) -> u32 {
    let dark = grid.iter().filter(|&&c| c == Color::Dark).count();
    let percent = dark * 100 / grid.len();
    (percent.abs_diff(50) / 5 * 10) as u32
}

#[cfg(test)]
mod penalty_tests {
    use super::{
        adjacent_penalty, balance_penalty, block_penalty, finder_pattern_penalty, penalty,
    };
    use crate::common::metadata::Color;

    fn parse(rows: &[&str]) -> (Vec<Color>, usize) {
        let w = rows.len();
        let grid = rows
            .iter()
            .flat_map(|r| r.chars().map(|ch| Color::from(ch == '#')))
            .collect::<Vec<_>>();
        assert_eq!(grid.len(), w * w);
        (grid, w)
    }

    fn line(s: &str) -> impl Fn(usize) -> Color + '_ {
        move |j| Color::from(s.as_bytes()[j] == b'#')
    }

    #[test]
    fn test_adjacent_penalty() {
        assert_eq!(adjacent_penalty(6, line("#.#.#.")), 0);
        assert_eq!(adjacent_penalty(6, line("#####.")), 3);
        assert_eq!(adjacent_penalty(7, line("#######")), 5);
        assert_eq!(adjacent_penalty(12, line("......######")), 8);
    }

    #[test]
    fn test_block_penalty() {
        let (grid, w) = parse(&["##.", "##.", "..."]);
        assert_eq!(block_penalty(&grid, w), 3);
        let (grid, w) = parse(&["...", "...", "..."]);
        assert_eq!(block_penalty(&grid, w), 12);
    }

    #[test]
    fn test_finder_pattern_penalty() {
        // Flanked by the edge on the left
        assert_eq!(finder_pattern_penalty(11, line("#.###.#....")), 40);
        // Light run after the pattern
        assert_eq!(finder_pattern_penalty(13, line("##.###.#....#")), 40);
        // Dark modules close on both sides
        assert_eq!(finder_pattern_penalty(15, line("#####.###.#####")), 0);
        assert_eq!(finder_pattern_penalty(6, line("#.###.")), 0);
    }

    #[test]
    fn test_balance_penalty() {
        let (grid, _) = parse(&["#.", ".#"]);
        assert_eq!(balance_penalty(&grid), 0);
        let (grid, _) = parse(&["##", "##"]);
        assert_eq!(balance_penalty(&grid), 100);
        let (grid, _) = parse(&["###", "###", "..."]);
        // 66% dark
        assert_eq!(balance_penalty(&grid), 30);
    }

    #[test]
    fn test_total_penalty_all_dark() {
        let (grid, w) = parse(&["#####", "#####", "#####", "#####", "#####"]);
        // N1 rows & cols 30, N2 48, N3 0, N4 100
        assert_eq!(penalty(&grid, w), 178);
    }
}
