//! Baseline JPEG encoder: YCbCr 4:4:4, one scan, Annex K Huffman tables.

use super::dct::fdct_8x8;
use super::tables::{
    AC_CHROMA, AC_CHROMA_CODES, AC_LUMA, AC_LUMA_CODES, Code, DC_CHROMA, DC_CHROMA_CODES, DC_LUMA,
    DC_LUMA_CODES, HuffmanSpec, UV_QUANT, Y_QUANT, ZIGZAG, divisors, quality_scale, scaled_table,
};
use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::sink::Writer;
use crate::view::ImageView;
use alloc::vec::Vec;
use enough::Stop;

/// SOI, APP0 (JFIF 1.1, no density, no thumbnail), then the DQT marker,
/// length 132 and the first table's precision/id byte.
const HEAD_SOI_APP0_DQT: [u8; 25] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
    0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x84, 0x00,
];
/// SOS: three components, Y on tables 0/0, Cb and Cr on tables 1/1,
/// spectral selection 0..63, no successive approximation.
const HEAD_SOS: [u8; 14] = [
    0xFF, 0xDA, 0x00, 0x0C, 0x03, 0x01, 0x00, 0x02, 0x11, 0x03, 0x11, 0x00, 0x3F, 0x00,
];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Component tables for one color plane.
struct Component<'a> {
    divisors: &'a [f32; 64],
    dc: &'a [Code; 256],
    ac: &'a [Code; 256],
}

/// Entropy-coded segment writer: MSB-first bits with 0xFF byte stuffing.
struct BitWriter {
    out: Vec<u8>,
    buf: u32,
    count: u32,
}

impl BitWriter {
    fn put(&mut self, code: u16, len: u8) {
        self.count += u32::from(len);
        self.buf |= u32::from(code) << (24 - self.count);
        while self.count >= 8 {
            let c = ((self.buf >> 16) & 0xFF) as u8;
            self.out.push(c);
            if c == 0xFF {
                self.out.push(0);
            }
            self.buf <<= 8;
            self.count -= 8;
        }
    }

    fn put_code(&mut self, code: Code) {
        self.put(code.code, code.len);
    }
}

/// Magnitude category and the value bits that follow the Huffman code.
///
/// Negative values are sent as one's complement in `len` bits.
fn category(v: i32) -> (u16, u8) {
    let len = (32 - v.unsigned_abs().leading_zeros()) as u8;
    let bits = if v < 0 { v - 1 } else { v };
    (bits as u16 & ((1u32 << len) - 1) as u16, len)
}

/// Transform, quantize and entropy-code one 8x8 block. Returns its DC value
/// for the next block's prediction.
fn encode_block(bits: &mut BitWriter, block: &mut [f32; 64], comp: &Component<'_>, dc_prev: i32) -> i32 {
    fdct_8x8(block);

    let mut du = [0i32; 64];
    for (k, (&v, &d)) in block.iter().zip(comp.divisors).enumerate() {
        let v = v * d;
        // Round half away from zero.
        du[usize::from(ZIGZAG[k])] = if v < 0.0 { (v - 0.5) as i32 } else { (v + 0.5) as i32 };
    }

    let diff = du[0] - dc_prev;
    if diff == 0 {
        bits.put_code(comp.dc[0]);
    } else {
        let (value, len) = category(diff);
        bits.put_code(comp.dc[usize::from(len)]);
        bits.put(value, len);
    }

    let eob = comp.ac[0x00];
    let zrl = comp.ac[0xF0];
    let Some(end) = du[1..].iter().rposition(|&v| v != 0).map(|p| p + 1) else {
        bits.put_code(eob);
        return du[0];
    };

    let mut i = 1;
    while i <= end {
        let start = i;
        while du[i] == 0 {
            i += 1;
        }
        let mut zeros = i - start;
        for _ in 0..zeros / 16 {
            bits.put_code(zrl);
        }
        zeros %= 16;
        let (value, len) = category(du[i]);
        bits.put_code(comp.ac[(zeros << 4) + usize::from(len)]);
        bits.put(value, len);
        i += 1;
    }
    if end != 63 {
        bits.put_code(eob);
    }
    du[0]
}

fn push_dht(out: &mut Vec<u8>, class_id: u8, spec: &HuffmanSpec) {
    out.push(class_id);
    out.extend_from_slice(&spec.bits);
    out.extend_from_slice(spec.values);
}

/// Everything from SOI through SOS.
fn headers(width: u16, height: u16, y_table: &[u8; 64], uv_table: &[u8; 64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(640);
    out.extend_from_slice(&HEAD_SOI_APP0_DQT);
    out.extend_from_slice(y_table);
    out.push(0x01);
    out.extend_from_slice(uv_table);

    // SOF0: 8-bit precision, three components each sampled 1x1.
    out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&[0x03, 0x01, 0x11, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);

    // One DHT segment holding all four tables (length 0x01A2).
    out.extend_from_slice(&[0xFF, 0xC4, 0x01, 0xA2]);
    push_dht(&mut out, 0x00, &DC_LUMA);
    push_dht(&mut out, 0x10, &AC_LUMA);
    push_dht(&mut out, 0x01, &DC_CHROMA);
    push_dht(&mut out, 0x11, &AC_CHROMA);

    out.extend_from_slice(&HEAD_SOS);
    out
}

pub(crate) fn encode_jpeg(
    w: &mut Writer<'_>,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let width = view.width();
    let height = view.height();
    let (Ok(w16), Ok(h16)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(WriteError::DimensionsTooLarge { width, height });
    };
    config.check_limits(width, height)?;

    let quality = config.effective_jpeg_quality();
    let scale = quality_scale(quality);
    let y_table = scaled_table(&Y_QUANT, scale);
    let uv_table = scaled_table(&UV_QUANT, scale);
    let y_div = divisors(&y_table);
    let uv_div = divisors(&uv_table);
    let luma = Component {
        divisors: &y_div,
        dc: &DC_LUMA_CODES,
        ac: &AC_LUMA_CODES,
    };
    let chroma = Component {
        divisors: &uv_div,
        dc: &DC_CHROMA_CODES,
        ac: &AC_CHROMA_CODES,
    };

    stop.check()?;
    w.put(&headers(w16, h16, &y_table, &uv_table))?;

    let width = width as usize;
    let height = height as usize;
    let n = view.channels().count();
    let color = view.channels().is_color();
    let flip = config.flip_vertically;

    let mut bits = BitWriter {
        out: Vec::with_capacity(width * 3),
        buf: 0,
        count: 0,
    };
    let (mut dc_y, mut dc_u, mut dc_v) = (0, 0, 0);
    let mut yb = [0f32; 64];
    let mut ub = [0f32; 64];
    let mut vb = [0f32; 64];

    for (mcu_row, y0) in (0..height).step_by(8).enumerate() {
        if mcu_row % 2 == 0 {
            stop.check()?;
        }
        for x0 in (0..width).step_by(8) {
            for dy in 0..8 {
                // Blocks past the bottom or right edge repeat the last row/column.
                let clamped = (y0 + dy).min(height - 1);
                let src = if flip { height - 1 - clamped } else { clamped };
                let row = view.row(src);
                for dx in 0..8 {
                    let p = (x0 + dx).min(width - 1) * n;
                    let (r, g, b) = if color {
                        (row[p], row[p + 1], row[p + 2])
                    } else {
                        (row[p], row[p], row[p])
                    };
                    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
                    let k = dy * 8 + dx;
                    yb[k] = 0.299 * r + 0.587 * g + 0.114 * b - 128.0;
                    ub[k] = -0.16874 * r - 0.33126 * g + 0.5 * b;
                    vb[k] = 0.5 * r - 0.41869 * g - 0.08131 * b;
                }
            }
            dc_y = encode_block(&mut bits, &mut yb, &luma, dc_y);
            dc_u = encode_block(&mut bits, &mut ub, &chroma, dc_u);
            dc_v = encode_block(&mut bits, &mut vb, &chroma, dc_v);
        }
        w.put(&bits.out)?;
        bits.out.clear();
    }

    // Pad the final byte with one bits.
    bits.put(0x7F, 7);
    bits.out.extend_from_slice(&EOI);
    w.put(&bits.out)?;

    log::debug!(
        "jpeg: {}x{} {:?}, quality {} (scale {}%), {} bytes",
        width,
        height,
        view.channels(),
        quality,
        scale,
        w.written()
    );
    Ok(())
}
