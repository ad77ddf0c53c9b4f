use super::metadata::{ECLevel, Version};

// Galois field GF(256), primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11d;

const fn exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn log_table() -> [u8; 256] {
    let exp = exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 256] = exp_table();

static LOG_TABLE: [u8; 256] = log_table();

#[inline]
fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Coefficients of prod(x - a^i) for i in 0..degree, highest power first, leading 1 omitted
fn generator_polynomial(degree: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&degree), "Invalid generator degree: {degree}");

    let mut poly = vec![0u8; degree];
    poly[degree - 1] = 1;
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            poly[j] = gf_mul(poly[j], root);
            if j + 1 < degree {
                poly[j] ^= poly[j + 1];
            }
        }
        root = gf_mul(root, 0x02);
    }
    poly
}


// Reed-Solomon encoding
//------------------------------------------------------------------------------

// Splits data codewords into blocks, appends ec codewords to each block and interleaves
pub fn compute_ecc(data: &[u8], ver: Version, ecl: ECLevel) -> Vec<u8> {
    let data_blocks = blockify(data, ver, ecl);

    let ecc_size = ver.ecc_per_block(ecl);
    let ecc_blocks = data_blocks.iter().map(|b| ecc_per_block(b, ecc_size)).collect::<Vec<_>>();

    let mut res = interleave(&data_blocks);
    res.extend(interleave(&ecc_blocks));

    debug_assert!(
        res.len() == ver.total_codewords(),
        "Codeword count mismatch: Expected {}, Found {}",
        ver.total_codewords(),
        res.len()
    );
    res
}

pub fn blockify(data: &[u8], ver: Version, ecl: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        ver.data_codewords_per_block(ecl);

    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(block1_count + block2_count);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Remainder of data polynomial divided by generator polynomial, computed as a shift register
pub fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let gen_poly = generator_polynomial(ecc_count);
    let mut rem = vec![0u8; ecc_count];
    for &b in block {
        let factor = b ^ rem[0];
        rem.rotate_left(1);
        rem[ecc_count - 1] = 0;
        for (r, &g) in rem.iter_mut().zip(gen_poly.iter()) {
            *r ^= gf_mul(g, factor);
        }
    }
    rem
}

// Column-wise read of blocks; shorter blocks are skipped once exhausted
pub fn interleave<T: AsRef<[u8]>>(blocks: &[T]) -> Vec<u8> {
    let max_len = blocks.iter().map(|b| b.as_ref().len()).max().unwrap_or(0);
    let total = blocks.iter().map(|b| b.as_ref().len()).sum();
    let mut res = Vec::with_capacity(total);
    for i in 0..max_len {
        for b in blocks {
            if let Some(&c) = b.as_ref().get(i) {
                res.push(c);
            }
        }
    }
    res
}
