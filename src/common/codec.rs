pub use encode::*;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Eci = 0b0111,
}

pub(crate) static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
            Self::Eci => unreachable!("ECI mode doesn't carry characters"),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                byte.is_ascii_digit()
                    || byte.is_ascii_uppercase()
                    || matches!(byte, b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Eci => false,
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Eci => unreachable!("ECI mode doesn't carry characters"),
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    mode: Mode,
    mode_bits: usize,
    len_bits: usize, // Bit len of char count
    data: &'a [u8],  // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    #[cfg(test)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}

// Bit len of an ECI header: mode indicator + designator
fn eci_bit_len(eci: u32) -> usize {
    debug_assert!(eci < 128, "Only single byte ECI designators are supported: {eci}");
    4 + 8
}

#[cfg(test)]
mod segment_tests {
    use test_case::test_case;

    use super::{Mode, Segment};
    use crate::common::metadata::Version;

    #[test_case(1, Mode::Numeric, "123", 24)]
    #[test_case(1, Mode::Numeric, "45", 21)]
    #[test_case(10, Mode::Numeric, "6", 20)]
    #[test_case(27, Mode::Numeric, "123", 28)]
    #[test_case(1, Mode::Alphanumeric, "AZ", 24)]
    #[test_case(10, Mode::Alphanumeric, "-", 21)]
    #[test_case(27, Mode::Alphanumeric, "AZ", 28)]
    #[test_case(1, Mode::Byte, "a", 20)]
    #[test_case(10, Mode::Byte, "a", 28)]
    fn test_bit_len(ver: usize, mode: Mode, data: &str, exp: usize) {
        let ver = Version::unchecked(ver);
        let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data.as_bytes());
        assert_eq!(seg.bit_len(), exp);
    }
}

// Writer
//------------------------------------------------------------------------------

mod writer {
    use super::{Mode, Segment};
    use crate::common::bitstream::BitStream;

    pub fn push_eci(eci: u32, out: &mut BitStream) {
        out.push_bits(Mode::Eci as u8, 4);
        out.push_bits(eci, 8);
    }

    pub fn push_segment(seg: &Segment, out: &mut BitStream) {
        push_header(seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
            Mode::Eci => unreachable!("ECI is not a data segment"),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            out.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            out.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(out.len() & 7 == 0, "Bit offset should be zero before padding codewords");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    pub(super) static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

}

// Encoder
//------------------------------------------------------------------------------

mod encode {
    use std::mem::swap;

    use super::{
        eci_bit_len,
        writer::{pad_remaining_capacity, push_eci, push_segment, push_terminator},
        Mode, Segment, MODES,
    };
    use crate::common::{
        bitstream::BitStream,
        error::{QRError, QRResult},
        metadata::{ECLevel, Version},
    };

    pub fn encode(data: &[u8], ecl: ECLevel, eci: Option<u32>) -> QRResult<(BitStream, Version)> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }
        let (ver, segs) = find_optimal_version_and_segments(data, ecl, eci)?;
        Ok((write_segments(&segs, ver, ecl, eci), ver))
    }

    pub fn encode_with_version(
        data: &[u8],
        ver: Version,
        ecl: ECLevel,
        eci: Option<u32>,
    ) -> QRResult<BitStream> {
        if data.is_empty() {
            return Err(QRError::EmptyData);
        }
        let bcap = ver.data_bit_capacity(ecl);
        let segs = compute_optimal_segments(data, ver);
        let sz = total_bit_len(&segs, eci);
        if sz > bcap {
            return Err(QRError::CapacityExceeded { ec_level: ecl, bits: sz, capacity: bcap });
        }
        Ok(write_segments(&segs, ver, ecl, eci))
    }

    fn write_segments(segs: &[Segment], ver: Version, ecl: ECLevel, eci: Option<u32>) -> BitStream {
        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        if let Some(eci) = eci {
            push_eci(eci, &mut bs);
        }
        for seg in segs {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        bs
    }

    fn total_bit_len(segs: &[Segment], eci: Option<u32>) -> usize {
        let eci_len = eci.map_or(0, eci_bit_len);
        eci_len + segs.iter().map(|s| s.bit_len()).sum::<usize>()
    }

    // Char count widths only change at versions 10 & 27, so segments are recomputed there
    fn find_optimal_version_and_segments(
        data: &[u8],
        ecl: ECLevel,
        eci: Option<u32>,
    ) -> QRResult<(Version, Vec<Segment<'_>>)> {
        let mut segs = vec![];
        let mut sz = 0;
        for v in 1..=40 {
            let ver = Version::unchecked(v);
            let bcap = ver.data_bit_capacity(ecl);
            if v == 1 || v == 10 || v == 27 {
                segs = compute_optimal_segments(data, ver);
                sz = total_bit_len(&segs, eci);
            }
            if sz <= bcap {
                return Ok((ver, segs));
            }
        }
        Err(QRError::CapacityExceeded {
            ec_level: ecl,
            bits: sz,
            capacity: Version::MAX.data_bit_capacity(ecl),
        })
    }

    // Dynamic programming to compute optimum mode segments. Costs are in sixths of a bit
    fn compute_optimal_segments(data: &[u8], ver: Version) -> Vec<Segment<'_>> {
        debug_assert!(!data.is_empty(), "Empty data");

        let len = data.len();
        let mut prev_cost = [0usize; 3];
        MODES.iter().enumerate().for_each(|(i, &m)| prev_cost[i] = (4 + ver.char_cnt_bits(m)) * 6);
        let mut cur_cost = [usize::MAX; 3];
        let mut min_path = vec![[usize::MAX; 3]; len];
        for (i, b) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(*b) {
                    continue;
                }
                let encoded_char_size = match to_mode {
                    Mode::Numeric => 20,
                    Mode::Alphanumeric => 33,
                    _ => 48,
                };
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = 0;
                    if to_mode != from_mode {
                        cost += prev_cost[k].div_ceil(6) * 6;
                        cost += (4 + ver.char_cnt_bits(*to_mode)) * 6;
                    } else {
                        cost += prev_cost[k];
                    }
                    cost += encoded_char_size;
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Backtrack min_path and identify optimal char mode
    fn trace_optimal_modes(min_path: Vec<[usize; 3]>, prev_cost: [usize; 3]) -> Vec<Mode> {
        let len = min_path.len();
        let mut mode_index = 0;
        for i in 1..3 {
            if prev_cost[i] < prev_cost[mode_index] {
                mode_index = i;
            }
        }
        let mut modes = (0..len)
            .rev()
            .scan(mode_index, |mi, i| {
                let old_mi = *mi;
                *mi = min_path[i][*mi];
                Some(MODES[old_mi])
            })
            .collect::<Vec<_>>();
        modes.reverse();
        modes
    }

    fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[u8]) -> Vec<Segment<'_>> {
        let len = data.len();
        let mode_bits = ver.mode_bits();
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        let mut seg_mode = char_modes[0];
        for (i, &m) in char_modes.iter().enumerate().skip(1) {
            if seg_mode != m {
                let len_bits = ver.char_cnt_bits(seg_mode);
                segs.push(Segment::new(seg_mode, mode_bits, len_bits, &data[seg_start..i]));
                seg_mode = m;
                seg_start = i;
            }
        }
        let len_bits = ver.char_cnt_bits(seg_mode);
        segs.push(Segment::new(seg_mode, mode_bits, len_bits, &data[seg_start..len]));
        segs
    }

}
