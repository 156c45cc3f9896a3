//! PNG encoder: per-row filtering, one IDAT chunk, materialized in memory.

use super::filter::{choose_filter, filter_row};
use super::color_type;
use crate::checksum::Crc32;
use crate::config::EncodeConfig;
use crate::deflate::{compressed_bound, zlib_compress};
use crate::error::WriteError;
use crate::pixel::RowOrder;
use crate::view::ImageView;
use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
/// PNG dimensions and chunk lengths are limited to 2^31 - 1.
const MAX_DIMENSION: u32 = i32::MAX as u32;

pub(crate) fn encode_png(
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<Vec<u8>, WriteError> {
    let width = view.width();
    let height = view.height();
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(WriteError::DimensionsTooLarge { width, height });
    }
    config.check_limits(width, height)?;

    let h = height as usize;
    let bpp = view.channels().count();
    let row_len = view.row_len();
    let filtered_len = (row_len + 1)
        .checked_mul(h)
        .ok_or(WriteError::DimensionsTooLarge { width, height })?;
    config.check_memory(filtered_len)?;

    let mut filtered = Vec::new();
    filtered
        .try_reserve_exact(filtered_len)
        .map_err(|_| WriteError::AllocationFailed(filtered_len))?;

    let zero = vec![0u8; row_len];
    let mut line = vec![0u8; row_len];
    let mut histogram = [0usize; 5];
    let flip = config.flip_vertically;

    for i in 0..h {
        if i % 16 == 0 {
            stop.check()?;
        }
        let cur = view.row(RowOrder::TopDown.source_row(i, h, flip));
        let prev = if i == 0 {
            &zero[..]
        } else {
            view.row(RowOrder::TopDown.source_row(i - 1, h, flip))
        };
        let filter = match config.png_filter {
            Some(forced) => {
                filter_row(forced, cur, prev, bpp, &mut line);
                forced
            }
            None => choose_filter(cur, prev, bpp, &mut line),
        };
        histogram[filter as usize] += 1;
        filtered.push(filter as u8);
        filtered.extend_from_slice(&line);
    }

    stop.check()?;
    config.check_memory(compressed_bound(filtered_len))?;
    let idat = zlib_compress(&filtered, config.png_compression_level)?;
    drop(filtered);
    if idat.len() > MAX_DIMENSION as usize {
        return Err(WriteError::DimensionsTooLarge { width, height });
    }

    let total = SIGNATURE.len() + (12 + 13) + (12 + idat.len()) + 12;
    config.check_memory(total)?;
    let mut out = Vec::new();
    out.try_reserve_exact(total)
        .map_err(|_| WriteError::AllocationFailed(total))?;
    out.extend_from_slice(&SIGNATURE);

    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = color_type(view.channels());
    // compression, filter method, interlace: all 0
    write_chunk(&mut out, b"IHDR", &ihdr);
    write_chunk(&mut out, b"IDAT", &idat);
    write_chunk(&mut out, b"IEND", &[]);

    log::debug!(
        "png: {}x{} {:?}, {} bytes, filters {:?}",
        width,
        height,
        view.channels(),
        out.len(),
        histogram
    );
    Ok(out)
}

/// Length, type, data, then CRC-32 over type and data.
fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut crc = Crc32::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&crc.finish().to_be_bytes());
}
