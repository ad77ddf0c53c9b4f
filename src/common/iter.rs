use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs right to left in a zig-zag, upwards first, stepping over the
// vertical timing column. Yields every coordinate outside that column exactly once.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    const VERT_TIMING_COL: i16 = 6;

    pub fn new(ver: Version) -> Self {
        let w = ver.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let timing = Self::VERT_TIMING_COL;
        let adjusted_col = if self.c <= timing { self.c + 1 } else { self.c };
        let res = (self.r, self.c);
        match (self.width - adjusted_col) % 4 {
            // Left cell of an upward pair
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            // Left cell of a downward pair
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == timing + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_zig_zag_start() {
        let coords = EncRegionIter::new(Version::unchecked(1)).take(6).collect::<Vec<_>>();
        assert_eq!(coords, [(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_turns_down_at_top() {
        let coords = EncRegionIter::new(Version::unchecked(1)).skip(40).take(4).collect::<Vec<_>>();
        assert_eq!(coords, [(0, 20), (0, 19), (0, 18), (0, 17)]);
    }

    #[test]
    fn test_visits_each_module_once() {
        for v in 1..=40 {
            let ver = Version::unchecked(v);
            let w = ver.width();
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            assert_eq!(coords.len(), w * (w - 1), "Version {v}");
            assert!(coords.iter().all(|&(_, c)| c != 6), "Version {v}");
            let unique = coords.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), coords.len(), "Version {v}");
        }
    }
}
