//! Radiance RGBE (`.hdr`) encoder (internal).
//!
//! Use top-level [`crate::write_hdr`], [`crate::write_hdr_u8`], etc.

mod encode;

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::sink::{Sink, Writer};
use crate::view::ImageView;
use enough::Stop;

/// Encode linear float samples, streaming into `sink`.
pub(crate) fn write(
    sink: &mut dyn Sink,
    view: &ImageView<'_, f32>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let mut w = Writer::new(sink);
    encode::encode_hdr(&mut w, view, |v| v, config, stop)
}

/// Encode 8-bit samples, each mapped to `v / 255`.
pub(crate) fn write_u8(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let mut w = Writer::new(sink);
    encode::encode_hdr(&mut w, view, |v| f32::from(v) / 255.0, config, stop)
}
