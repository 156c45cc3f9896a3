use alloc::string::String;
use enough::StopReason;

use crate::pixel::ImageFormat;

/// Errors from image encoding and sink output.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WriteError {
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported channel count: {0} (expected 1-4)")]
    UnsupportedChannels(u8),

    #[error("buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("row stride {stride} is shorter than a row of {row_len} samples")]
    InvalidStride { stride: usize, row_len: usize },

    #[error("dimensions too large for this format: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("{0:?} support was not compiled in")]
    UnsupportedFormat(ImageFormat),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("failed to allocate {0} bytes")]
    AllocationFailed(usize),

    #[error("sink accepted {accepted} of {requested} bytes")]
    ShortWrite { requested: usize, accepted: usize },

    #[error("sink error: {0}")]
    Sink(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for WriteError {
    fn from(r: StopReason) -> Self {
        WriteError::Cancelled(r)
    }
}
