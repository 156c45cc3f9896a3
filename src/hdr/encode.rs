//! HDR encoder: ASCII header, then one RGBE scanline per row.
//!
//! Rows between 8 and 32767 pixels wide use the "new" run-length format,
//! with each of the four byte planes coded separately. Other widths are
//! stored as flat RGBE quadruples.

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::pixel::RowOrder;
use crate::sink::Writer;
use crate::view::ImageView;
use alloc::vec::Vec;
use enough::Stop;

const HEADER: &str = "#?RADIANCE\n# Written by zenwrite\nFORMAT=32-bit_rle_rgbe\n";
const MIN_RLE_WIDTH: usize = 8;
const MAX_RLE_WIDTH: usize = 32767;
const MAX_DUMP: usize = 128;
const MAX_RUN: usize = 127;
/// Anything dimmer is stored as all zeros.
const MIN_COMPONENT: f32 = 1e-32;
/// Largest component whose exponent still fits the biased exponent byte.
const MAX_COMPONENT: f32 = 1.7e38;

pub(crate) fn encode_hdr<T: Copy>(
    w: &mut Writer<'_>,
    view: &ImageView<'_, T>,
    to_linear: impl Fn(T) -> f32,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let width = view.width() as usize;
    let height = view.height() as usize;
    config.check_limits(view.width(), view.height())?;
    let n = view.channels().count();
    let color = view.channels().is_color();

    stop.check()?;
    w.put(HEADER.as_bytes())?;
    w.put(
        alloc::format!(
            "EXPOSURE=          1.0000000000000\n\n-Y {} +X {}\n",
            height, width
        )
        .as_bytes(),
    )?;

    let rle = (MIN_RLE_WIDTH..=MAX_RLE_WIDTH).contains(&width);
    let mut rgbe = Vec::new();
    rgbe.try_reserve_exact(width * 4)
        .map_err(|_| WriteError::AllocationFailed(width * 4))?;
    let mut line = Vec::new();
    line.try_reserve(width * 5 + 4)
        .map_err(|_| WriteError::AllocationFailed(width * 5 + 4))?;
    let mut plane: Vec<u8> = Vec::with_capacity(if rle { width } else { 0 });

    for i in 0..height {
        if i % 16 == 0 {
            stop.check()?;
        }
        let row = view.row(RowOrder::TopDown.source_row(i, height, config.flip_vertically));
        rgbe.clear();
        for px in row.chunks_exact(n) {
            let linear = if color {
                [to_linear(px[0]), to_linear(px[1]), to_linear(px[2])]
            } else {
                [to_linear(px[0]); 3]
            };
            rgbe.extend_from_slice(&float_to_rgbe(linear));
        }

        line.clear();
        if rle {
            line.extend_from_slice(&[2, 2, (width >> 8) as u8, width as u8]);
            for c in 0..4 {
                plane.clear();
                plane.extend(rgbe.iter().skip(c).step_by(4));
                rle_plane(&mut line, &plane);
            }
        } else {
            line.extend_from_slice(&rgbe);
        }
        w.put(&line)?;
    }

    log::debug!(
        "hdr: {}x{} {:?}, rle {}, {} bytes",
        width,
        height,
        view.channels(),
        rle,
        w.written()
    );
    Ok(())
}

/// Split a normal, positive `v` into a mantissa in [0.5, 1) and a power of two.
fn frexp(v: f32) -> (f32, i32) {
    let bits = v.to_bits();
    let exp = ((bits >> 23) & 0xFF) as i32 - 126;
    let mantissa = f32::from_bits((bits & 0x807F_FFFF) | (126 << 23));
    (mantissa, exp)
}

/// Shared-exponent encoding of one linear RGB triple.
///
/// Negative and NaN components store as zero.
pub(crate) fn float_to_rgbe(linear: [f32; 3]) -> [u8; 4] {
    let linear = linear.map(|c| if c.is_nan() { 0.0 } else { c.min(MAX_COMPONENT) });
    let max = linear[0].max(linear[1]).max(linear[2]);
    if max < MIN_COMPONENT {
        return [0; 4];
    }
    let (mantissa, exp) = frexp(max);
    let scale = mantissa * 256.0 / max;
    [
        (linear[0] * scale) as u8,
        (linear[1] * scale) as u8,
        (linear[2] * scale) as u8,
        (exp + 128) as u8,
    ]
}

/// Run-length encode one byte plane.
///
/// Runs of three or more equal bytes become `[128 + len, value]` (len up to
/// 127); everything between runs goes out as `[len, bytes..]` dumps of up to
/// 128 bytes.
fn rle_plane(out: &mut Vec<u8>, plane: &[u8]) {
    let width = plane.len();
    let mut x = 0;
    while x < width {
        let mut r = x;
        while r + 2 < width && !(plane[r] == plane[r + 1] && plane[r] == plane[r + 2]) {
            r += 1;
        }
        if r + 2 >= width {
            r = width;
        }
        for dump in plane[x..r].chunks(MAX_DUMP) {
            out.push(dump.len() as u8);
            out.extend_from_slice(dump);
        }
        x = r;
        if x == width {
            break;
        }

        let value = plane[x];
        while r < width && plane[r] == value {
            r += 1;
        }
        while x < r {
            let len = (r - x).min(MAX_RUN);
            out.push(128 + len as u8);
            out.push(value);
            x += len;
        }
    }
}
