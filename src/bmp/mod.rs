//! BMP encoder (internal).
//!
//! Use top-level [`crate::write_bmp`], [`crate::encode_bmp`], etc.

mod encode;

use crate::config::EncodeConfig;
use crate::error::WriteError;
use crate::sink::Sink;
use crate::sink::Writer;
use crate::view::ImageView;
use enough::Stop;

/// Encode to BMP, streaming into `sink`.
pub(crate) fn write(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: &dyn Stop,
) -> Result<(), WriteError> {
    let mut w = Writer::new(sink);
    encode::encode_bmp(&mut w, view, config, stop)
}
