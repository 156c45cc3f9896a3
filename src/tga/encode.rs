//! TGA encoder: image types 2/3 (raw) and 10/11 (RLE), BGR(A) samples.

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::pixel::{AlphaMode, ChannelOrder, RowFormat, RowOrder, push_pixel, write_pixel_rows};
use crate::sink::Writer;
use crate::view::ImageView;
use alloc::vec::Vec;
use enough::Stop;

const TYPE_TRUE_COLOR: u8 = 2;
const TYPE_GRAY: u8 = 3;
const TYPE_RLE_FLAG: u8 = 8;
/// Both packet kinds carry at most 128 pixels.
const MAX_PACKET: usize = 128;

pub(crate) fn encode_tga(
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

    let channels = view.channels();
    let alpha = if channels.has_alpha() {
        AlphaMode::Trailing
    } else {
        AlphaMode::None
    };
    let mut image_type = if channels.is_color() {
        TYPE_TRUE_COLOR
    } else {
        TYPE_GRAY
    };
    if config.tga_rle {
        image_type += TYPE_RLE_FLAG;
    }

    stop.check()?;
    w.put(&header(image_type, w16, h16, channels.count() as u8 * 8, channels.has_alpha()))?;

    let fmt = RowFormat {
        order: ChannelOrder::Bgr,
        rows: RowOrder::BottomUp,
        alpha,
        expand_mono: false,
        pad: 0,
    };
    if config.tga_rle {
        write_rle_rows(w, view, fmt, config.flip_vertically, stop)?;
    } else {
        write_pixel_rows(w, view, fmt, config.flip_vertically, stop)?;
    }

    log::debug!(
        "tga: {}x{} {:?}, type {}, {} bytes",
        width,
        height,
        channels,
        image_type,
        w.written()
    );
    Ok(())
}

/// The 18-byte header. No image ID, no color map, origin at zero.
fn header(image_type: u8, width: u16, height: u16, bits_per_pixel: u8, has_alpha: bool) -> [u8; 18] {
    let mut out = [0u8; 18];
    out[2] = image_type;
    out[12..14].copy_from_slice(&width.to_le_bytes());
    out[14..16].copy_from_slice(&height.to_le_bytes());
    out[16] = bits_per_pixel;
    // Low nibble of the descriptor: attribute (alpha) bits per pixel.
    out[17] = if has_alpha { 8 } else { 0 };
    out
}

/// One RLE packet starting at pixel `i`: its length and whether it is a
/// run of identical pixels.
///
/// A raw packet stops short of the first adjacent equal pair, so that pair
/// can start the next run.
fn next_packet(row: &[u8], n: usize, i: usize, width: usize) -> (usize, bool) {
    let px = |k: usize| &row[k * n..(k + 1) * n];
    if i + 1 == width {
        return (1, false);
    }
    let mut len = 2;
    if px(i) == px(i + 1) {
        while i + len < width && len < MAX_PACKET && px(i + len) == px(i) {
            len += 1;
        }
        (len, true)
    } else {
        while i + len < width && len < MAX_PACKET {
            if px(i + len) == px(i + len - 1) {
                len -= 1;
                break;
            }
            len += 1;
        }
        (len, false)
    }
}

fn write_rle_rows(
    w: &mut Writer<'_>,
    view: &ImageView<'_, u8>,
    fmt: RowFormat,
    flip: bool,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let width = view.width() as usize;
    let height = view.height() as usize;
    let channels = view.channels();
    let n = channels.count();
    // Worst case: a header byte per pixel plus the pixel itself.
    let mut buf = Vec::with_capacity(width * (n + 1));
    let mut runs = 0usize;
    let mut raws = 0usize;

    for r in 0..height {
        if r % 16 == 0 {
            stop.check()?;
        }
        let row = view.row(fmt.rows.source_row(r, height, flip));
        buf.clear();
        let mut i = 0;
        while i < width {
            let (len, is_run) = next_packet(row, n, i, width);
            if is_run {
                buf.push(0x80 | (len - 1) as u8);
                push_pixel(&mut buf, fmt.order, channels, fmt.alpha, false, &row[i * n..(i + 1) * n]);
                runs += 1;
            } else {
                buf.push((len - 1) as u8);
                for px in row[i * n..(i + len) * n].chunks_exact(n) {
                    push_pixel(&mut buf, fmt.order, channels, fmt.alpha, false, px);
                }
                raws += 1;
            }
            i += len;
        }
        w.put(&buf)?;
    }
    log::trace!("tga rle: {} run packets, {} raw packets", runs, raws);
    Ok(())
}
