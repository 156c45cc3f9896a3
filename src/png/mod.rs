//! PNG encoder (internal): 8-bit gray, gray+alpha, RGB and RGBA.
//!
//! Use top-level [`crate::write_png`], [`crate::encode_png`], etc.

mod encode;
mod filter;

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::pixel::Channels;
use crate::sink::{Sink, Writer};
use crate::view::ImageView;
use alloc::vec::Vec;
use enough::Stop;

/// PNG scanline filter type.
///
/// The discriminant is the filter-type byte that prefixes each row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PngFilter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

/// IHDR color type for a channel layout.
pub(crate) fn color_type(channels: Channels) -> u8 {
    match channels {
        Channels::Gray => 0,
        Channels::GrayAlpha => 4,
        Channels::Rgb => 2,
        Channels::Rgba => 6,
    }
}

/// Encode a complete PNG file in memory.
pub(crate) fn encode(
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<Vec<u8>, WriteError> {
    encode::encode_png(view, config, stop)
}

/// Encode to PNG and hand the finished file to `sink` in one call.
pub(crate) fn write(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let png = encode::encode_png(view, config, stop)?;
    Writer::new(sink).put(&png)
}
