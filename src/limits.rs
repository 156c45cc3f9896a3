use crate::error::WriteError;

/// Caps an encode call must respect, checked before any byte reaches the
/// sink.
///
/// Every field is optional; `Limits::default()` imposes nothing.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Largest accepted `width * height`.
    pub max_pixels: Option<u64>,
    /// Largest single scratch buffer an encoder may allocate.
    ///
    /// Only PNG allocates buffers that scale with the image: the filtered
    /// scanlines, the worst-case DEFLATE output and the finished file are
    /// each checked against this cap before they are reserved. The other
    /// formats stream row by row.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), WriteError> {
        let over = |what: &str, value: u64, cap: Option<u64>| match cap {
            Some(cap) if value > cap => Err(WriteError::LimitExceeded(alloc::format!(
                "image {what} {value} is over the encode limit of {cap}"
            ))),
            _ => Ok(()),
        };
        over("width", u64::from(width), self.max_width)?;
        over("height", u64::from(height), self.max_height)?;
        over(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), WriteError> {
        match self.max_memory_bytes {
            Some(cap) if bytes as u64 > cap => Err(WriteError::LimitExceeded(alloc::format!(
                "{bytes}-byte encode buffer is over the memory limit of {cap}"
            ))),
            _ => Ok(()),
        }
    }
}
