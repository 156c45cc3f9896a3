//! Baseline JPEG encoder (internal).
//!
//! Use top-level [`crate::write_jpeg`], [`crate::encode_jpeg`], etc.

mod dct;
mod encode;
mod tables;

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::sink::{Sink, Writer};
use crate::view::ImageView;
use enough::Stop;

/// Encode to JPEG, streaming into `sink` one MCU row at a time.
pub(crate) fn write(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let mut w = Writer::new(sink);
    encode::encode_jpeg(&mut w, view, config, stop)
}
