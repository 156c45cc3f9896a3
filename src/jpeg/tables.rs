//! Baseline JPEG constant tables: quantization bases, zig-zag order, the
//! AAN scale factors and the Annex K Huffman specifications.

/// Natural-order index to zig-zag scan position.
pub(crate) const ZIGZAG: [u8; 64] = [
    0, 1, 5, 6, 14, 15, 27, 28, 2, 4, 7, 13, 16, 26, 29, 42,
    3, 8, 12, 17, 25, 30, 41, 43, 9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54, 20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61, 35, 36, 48, 49, 57, 58, 62, 63,
];

/// Luminance quantization base (natural order), Annex K table K.1.
pub(crate) const Y_QUANT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Chrominance quantization base (natural order), Annex K table K.2.
pub(crate) const UV_QUANT: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Per-row/column output scale of the AAN DCT, folded into the quantizer.
pub(crate) const AAN_SCALE: [f32; 8] = [
    2.828427, 3.9231412, 3.6955183, 3.3258781, 2.828427, 2.222281, 1.5307337, 0.7803613,
];

/// A DHT table: count of codes per length 1..=16, then symbols in code order.
pub(crate) struct HuffmanSpec {
    pub bits: [u8; 16],
    pub values: &'static [u8],
}

pub(crate) const DC_LUMA: HuffmanSpec = HuffmanSpec {
    bits: [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    values: &[
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
    ],
};

pub(crate) const AC_LUMA: HuffmanSpec = HuffmanSpec {
    bits: [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125],
    values: &[
        0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06,
        0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
        0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72,
        0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
        0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45,
        0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59,
        0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
        0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
        0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3,
        0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6,
        0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9,
        0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
        0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4,
        0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
    ],
};

pub(crate) const DC_CHROMA: HuffmanSpec = HuffmanSpec {
    bits: [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0],
    values: &[
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
    ],
};

pub(crate) const AC_CHROMA: HuffmanSpec = HuffmanSpec {
    bits: [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119],
    values: &[
        0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41,
        0x51, 0x07, 0x61, 0x71, 0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91,
        0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0, 0x15, 0x62, 0x72, 0xD1,
        0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
        0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44,
        0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58,
        0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74,
        0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
        0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A,
        0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4,
        0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7,
        0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
        0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4,
        0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
    ],
};

/// Huffman code and bit length per symbol; unused symbols have length 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Code {
    pub code: u16,
    pub len: u8,
}

/// Canonical code assignment: codes count up within a length and gain a
/// zero bit at each step to the next length.
pub(crate) const fn build_codes(spec: &HuffmanSpec) -> [Code; 256] {
    let mut table = [Code { code: 0, len: 0 }; 256];
    let mut code: u32 = 0;
    let mut k = 0;
    let mut len = 0;
    while len < 16 {
        let mut n = 0;
        while n < spec.bits[len] {
            table[spec.values[k] as usize] = Code {
                code: code as u16,
                len: len as u8 + 1,
            };
            code += 1;
            k += 1;
            n += 1;
        }
        code <<= 1;
        len += 1;
    }
    table
}

pub(crate) const DC_LUMA_CODES: [Code; 256] = build_codes(&DC_LUMA);
pub(crate) const AC_LUMA_CODES: [Code; 256] = build_codes(&AC_LUMA);
pub(crate) const DC_CHROMA_CODES: [Code; 256] = build_codes(&DC_CHROMA);
pub(crate) const AC_CHROMA_CODES: [Code; 256] = build_codes(&AC_CHROMA);

/// Map quality 1..=100 to a percentage applied to the base tables.
pub(crate) fn quality_scale(quality: u8) -> u32 {
    let q = u32::from(quality.clamp(1, 100));
    if q < 50 { 5000 / q } else { 200 - q * 2 }
}

/// Scale a base table, clamp to 1..=255 and store in zig-zag order, ready
/// for the DQT segment.
pub(crate) fn scaled_table(base: &[u16; 64], scale: u32) -> [u8; 64] {
    let mut out = [0u8; 64];
    for (i, &b) in base.iter().enumerate() {
        let v = (u32::from(b) * scale + 50) / 100;
        out[usize::from(ZIGZAG[i])] = v.clamp(1, 255) as u8;
    }
    out
}

/// Reciprocal divisors in natural order, with the AAN output scale folded in.
pub(crate) fn divisors(zigzag_table: &[u8; 64]) -> [f32; 64] {
    core::array::from_fn(|k| {
        let q = f32::from(zigzag_table[usize::from(ZIGZAG[k])]);
        1.0 / (q * AAN_SCALE[k / 8] * AAN_SCALE[k % 8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_is_a_permutation() {
        let mut seen = [false; 64];
        for &z in &ZIGZAG {
            assert!(!seen[usize::from(z)]);
            seen[usize::from(z)] = true;
        }
    }

    #[test]
    fn spec_counts_match_values() {
        for spec in [&DC_LUMA, &AC_LUMA, &DC_CHROMA, &AC_CHROMA] {
            let total: usize = spec.bits.iter().map(|&b| usize::from(b)).sum();
            assert_eq!(total, spec.values.len());
        }
        assert_eq!(AC_LUMA.values.len(), 162);
    }

    #[test]
    fn well_known_codes() {
        // DC luminance category 0 is "00".
        assert_eq!(DC_LUMA_CODES[0], Code { code: 0b00, len: 2 });
        // AC luminance EOB is "1010", ZRL is "11111111001".
        assert_eq!(AC_LUMA_CODES[0x00], Code { code: 0b1010, len: 4 });
        assert_eq!(AC_LUMA_CODES[0xF0], Code { code: 0b111_1111_1001, len: 11 });
        assert_eq!(AC_LUMA_CODES[0x01], Code { code: 0b00, len: 2 });
        // AC chrominance EOB is "00".
        assert_eq!(AC_CHROMA_CODES[0x00], Code { code: 0b00, len: 2 });
        assert_eq!(DC_CHROMA_CODES[11], Code { code: 0b111_1111_1110, len: 11 });
    }

    #[test]
    fn quality_mapping() {
        assert_eq!(quality_scale(50), 100);
        assert_eq!(quality_scale(90), 20);
        assert_eq!(quality_scale(100), 0);
        assert_eq!(quality_scale(1), 5000);
        assert_eq!(quality_scale(10), 500);
    }

    #[test]
    fn scaled_tables_clamp() {
        // Quality 100 collapses every entry to 1.
        assert!(scaled_table(&Y_QUANT, quality_scale(100)).iter().all(|&v| v == 1));
        // Quality 1 saturates at 255.
        assert!(scaled_table(&UV_QUANT, quality_scale(1)).iter().all(|&v| v == 255));
        // Quality 50 is the base table, reordered.
        let t = scaled_table(&Y_QUANT, 100);
        assert_eq!(t[0], 16);
        assert_eq!(t[1], 11); // natural 1 -> zig-zag 1
        assert_eq!(t[2], 12); // natural 8 -> zig-zag 2
    }
}
