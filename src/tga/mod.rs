//! TGA encoder (internal): true-color and gray, raw or run-length encoded.
//!
//! Use top-level [`crate::write_tga`], [`crate::encode_tga`], etc.

mod encode;

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::sink::{Sink, Writer};
use crate::view::ImageView;
use enough::Stop;

/// Encode to TGA, streaming into `sink`.
pub(crate) fn write(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let mut w = Writer::new(sink);
    encode::encode_tga(&mut w, view, config, stop)
}
