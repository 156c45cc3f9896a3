use alloc::vec::Vec;
use enough::Stop;

use crate::error::WriteError;
use crate::sink::Writer;
use crate::view::ImageView;

/// Output container format.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Windows bitmap, 24-bit uncompressed.
    Bmp,
    /// Truevision TGA, raw or run-length encoded.
    Tga,
    /// Radiance RGBE (`.hdr`).
    Hdr,
    /// PNG, 8 bits per sample.
    Png,
    /// Baseline JPEG.
    Jpeg,
}

impl ImageFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Tga => "tga",
            Self::Hdr => "hdr",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Bmp => "image/bmp",
            Self::Tga => "image/x-tga",
            Self::Hdr => "image/vnd.radiance",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Samples per pixel. Meaning is positional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channels {
    /// Y
    Gray = 1,
    /// Y, A
    GrayAlpha = 2,
    /// R, G, B
    Rgb = 3,
    /// R, G, B, A
    Rgba = 4,
}

impl Channels {
    /// Number of samples per pixel (1-4).
    pub fn count(&self) -> usize {
        *self as usize
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }

    /// Whether the pixel carries separate color channels.
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Rgb | Self::Rgba)
    }
}

impl TryFrom<u8> for Channels {
    type Error = WriteError;

    fn try_from(n: u8) -> Result<Self, WriteError> {
        match n {
            1 => Ok(Self::Gray),
            2 => Ok(Self::GrayAlpha),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            _ => Err(WriteError::UnsupportedChannels(n)),
        }
    }
}

/// Byte order of the three color samples on output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Where, if anywhere, the alpha sample goes on output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AlphaMode {
    /// Alpha is dropped. RGBA pixels are first blended over magenta.
    None,
    /// Alpha follows the color samples.
    Trailing,
}

/// Stored row order of the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RowOrder {
    TopDown,
    BottomUp,
}

impl RowOrder {
    /// Source row for the `i`th output row, after applying the flip switch.
    pub(crate) fn source_row(self, i: usize, height: usize, flip: bool) -> usize {
        let bottom_up = (self == RowOrder::BottomUp) != flip;
        if bottom_up { height - 1 - i } else { i }
    }
}

/// Background for alpha compositing when alpha is dropped.
const BACKGROUND: [u8; 3] = [255, 0, 255];

/// Append one pixel to `out` in the requested output shape.
///
/// Gray pixels produce one byte, or three when `expand_mono` is set. Color
/// pixels always produce three.
pub(crate) fn push_pixel(
    out: &mut Vec<u8>,
    order: ChannelOrder,
    channels: Channels,
    alpha: AlphaMode,
    expand_mono: bool,
    px: &[u8],
) {
    let n = channels.count();
    if channels.is_color() {
        let rgb = if channels == Channels::Rgba && alpha == AlphaMode::None {
            composite(px)
        } else {
            [px[0], px[1], px[2]]
        };
        match order {
            ChannelOrder::Rgb => out.extend_from_slice(&rgb),
            ChannelOrder::Bgr => out.extend_from_slice(&[rgb[2], rgb[1], rgb[0]]),
        }
    } else if expand_mono {
        out.extend_from_slice(&[px[0]; 3]);
    } else {
        out.push(px[0]);
    }
    if alpha == AlphaMode::Trailing {
        out.push(px[n - 1]);
    }
}

fn composite(px: &[u8]) -> [u8; 3] {
    let a = i32::from(px[3]);
    core::array::from_fn(|k| {
        let bg = i32::from(BACKGROUND[k]);
        (bg + (i32::from(px[k]) - bg) * a / 255) as u8
    })
}

/// Output shape shared by every row of a raw pixel stream.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RowFormat {
    pub order: ChannelOrder,
    pub rows: RowOrder,
    pub alpha: AlphaMode,
    pub expand_mono: bool,
    /// Zero bytes appended after each row.
    pub pad: usize,
}

/// Stream every row of `view` through the writer, one sink call per row.
pub(crate) fn write_pixel_rows(
    w: &mut Writer<'_>,
    view: &ImageView<'_, u8>,
    fmt: RowFormat,
    flip: bool,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let width = view.width() as usize;
    let height = view.height() as usize;
    let n = view.channels().count();
    let mut buf = Vec::with_capacity(width * 4 + fmt.pad);
    for i in 0..height {
        if i % 16 == 0 {
            stop.check()?;
        }
        let y = fmt.rows.source_row(i, height, flip);
        buf.clear();
        for px in view.row(y).chunks_exact(n) {
            push_pixel(
                &mut buf,
                fmt.order,
                view.channels(),
                fmt.alpha,
                fmt.expand_mono,
                px,
            );
        }
        buf.resize(buf.len() + fmt.pad, 0);
        w.put(&buf)?;
    }
    Ok(())
}
