//! BMP encoder: uncompressed 24-bit, bottom-up rows padded to 4 bytes.

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::pixel::{AlphaMode, ChannelOrder, RowFormat, RowOrder, write_pixel_rows};
use crate::sink::Writer;
use crate::view::ImageView;
use enough::Stop;

const HEADER_LEN: u32 = 54;

/// Encode `view` as a 24-bit BMP.
///
/// Gray is replicated into all three channels. Alpha is dropped, with RGBA
/// pixels first blended over magenta so transparency stays visible.
pub(crate) fn encode_bmp(
    w: &mut Writer<'_>,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let width = view.width();
    let height = view.height();
    // Width and height are stored as signed 32-bit values.
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(WriteError::DimensionsTooLarge { width, height });
    }
    config.check_limits(width, height)?;

    let row_bytes = u64::from(width) * 3;
    let pad = pad_bytes(row_bytes);
    let pixel_data_size = (row_bytes + pad) * u64::from(height);
    let file_size = u64::from(HEADER_LEN) + pixel_data_size;
    let file_size =
        u32::try_from(file_size).map_err(|_| WriteError::DimensionsTooLarge { width, height })?;

    stop.check()?;
    w.put(&header(width, height, file_size))?;
    write_pixel_rows(
        w,
        view,
        RowFormat {
            order: ChannelOrder::Bgr,
            rows: RowOrder::BottomUp,
            alpha: AlphaMode::None,
            expand_mono: true,
            pad: pad as usize,
        },
        config.flip_vertically,
        stop,
    )?;

    log::debug!(
        "bmp: {}x{} {:?}, {} bytes",
        width,
        height,
        view.channels(),
        w.written()
    );
    Ok(())
}

/// Zero bytes needed to round a row up to a multiple of 4.
fn pad_bytes(row_bytes: u64) -> u64 {
    row_bytes.wrapping_neg() & 3
}

/// BITMAPFILEHEADER followed by BITMAPINFOHEADER.
fn header(width: u32, height: u32, file_size: u32) -> [u8; HEADER_LEN as usize] {
    let mut out = [0u8; HEADER_LEN as usize];
    // File header (14 bytes); bytes 6..10 are reserved.
    out[0..2].copy_from_slice(b"BM");
    out[2..6].copy_from_slice(&file_size.to_le_bytes());
    out[10..14].copy_from_slice(&HEADER_LEN.to_le_bytes());

    // DIB header (40 bytes). Compression, image size, resolution and
    // palette counts stay zero.
    out[14..18].copy_from_slice(&40u32.to_le_bytes());
    out[18..22].copy_from_slice(&width.to_le_bytes());
    out[22..26].copy_from_slice(&height.to_le_bytes()); // positive = bottom-up
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&24u16.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Channels;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    fn bmp(view: &ImageView<'_, u8>, config: &EncodeConfig) -> Vec<u8> {
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out);
        encode_bmp(&mut w, view, config, &Unstoppable).unwrap();
        out
    }

    #[test]
    fn padding() {
        assert_eq!(pad_bytes(3), 1);
        assert_eq!(pad_bytes(6), 2);
        assert_eq!(pad_bytes(9), 3);
        assert_eq!(pad_bytes(12), 0);
    }

    #[test]
    fn two_by_two_rgb_exact_bytes() {
        // Top row red, green; bottom row blue, white.
        let px = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let view = ImageView::new(&px, 2, 2, Channels::Rgb).unwrap();
        let out = bmp(&view, &EncodeConfig::new());
        assert_eq!(out.len(), 70);
        assert_eq!(&out[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(out[2..6].try_into().unwrap()), 70);
        assert_eq!(u32::from_le_bytes(out[10..14].try_into().unwrap()), 54);
        assert_eq!(u16::from_le_bytes(out[28..30].try_into().unwrap()), 24);
        // Bottom row first, BGR, two pad bytes.
        assert_eq!(&out[54..62], &[255, 0, 0, 255, 255, 255, 0, 0]);
        assert_eq!(&out[62..70], &[0, 0, 255, 0, 255, 0, 0, 0]);
    }

    #[test]
    fn flip_stores_first_row_first() {
        let px = [10, 20];
        let view = ImageView::new(&px, 1, 2, Channels::Gray).unwrap();
        let out = bmp(&view, &EncodeConfig::new().with_flip_vertically(true));
        assert_eq!(&out[54..58], &[10, 10, 10, 0]);
        assert_eq!(&out[58..62], &[20, 20, 20, 0]);
    }

    #[test]
    fn transparent_pixel_becomes_magenta() {
        let px = [0, 255, 0, 0];
        let view = ImageView::new(&px, 1, 1, Channels::Rgba).unwrap();
        let out = bmp(&view, &EncodeConfig::new());
        assert_eq!(&out[54..57], &[255, 0, 255]);
    }
}
