use crate::limits::Limits;
#[cfg(feature = "png")]
use crate::png::PngFilter;

/// Default PNG effort; only the DEFLATE match-search depth depends on it.
pub const DEFAULT_PNG_COMPRESSION: u8 = 8;
/// JPEG quality used when 0 is requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoder switches, passed explicitly to every call.
///
/// The defaults produce bottom-up BMP/TGA as their formats expect,
/// run-length encoded TGA, PNG at effort 8 with per-row filter selection,
/// and JPEG at quality 90.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Treat the input's last row as the top of the image.
    pub flip_vertically: bool,
    /// Run-length encode TGA output (image types 10/11 instead of 2/3).
    pub tga_rle: bool,
    /// PNG compression effort. Values below 5 behave like 5.
    pub png_compression_level: u8,
    /// Force one PNG filter for every row instead of choosing per row.
    #[cfg(feature = "png")]
    pub png_filter: Option<PngFilter>,
    /// JPEG quality 1-100; 0 selects [`DEFAULT_JPEG_QUALITY`].
    pub jpeg_quality: u8,
    pub limits: Option<Limits>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeConfig {
    pub fn new() -> Self {
        Self {
            flip_vertically: false,
            tga_rle: true,
            png_compression_level: DEFAULT_PNG_COMPRESSION,
            #[cfg(feature = "png")]
            png_filter: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            limits: None,
        }
    }

    pub fn with_flip_vertically(mut self, flip: bool) -> Self {
        self.flip_vertically = flip;
        self
    }

    pub fn with_tga_rle(mut self, rle: bool) -> Self {
        self.tga_rle = rle;
        self
    }

    pub fn with_png_compression_level(mut self, level: u8) -> Self {
        self.png_compression_level = level;
        self
    }

    /// `None` restores per-row filter selection.
    #[cfg(feature = "png")]
    pub fn with_png_filter(mut self, filter: Option<PngFilter>) -> Self {
        self.png_filter = filter;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Quality actually used by the JPEG encoder, in 1..=100.
    pub(crate) fn effective_jpeg_quality(&self) -> u8 {
        match self.jpeg_quality {
            0 => DEFAULT_JPEG_QUALITY,
            q => q.min(100),
        }
    }

    pub(crate) fn check_limits(&self, width: u32, height: u32) -> Result<(), crate::WriteError> {
        match &self.limits {
            Some(limits) => limits.check_dimensions(width, height),
            None => Ok(()),
        }
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::WriteError> {
        match &self.limits {
            Some(limits) => limits.check_memory(bytes),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_quality_zero_means_default() {
        assert_eq!(EncodeConfig::new().with_jpeg_quality(0).effective_jpeg_quality(), 90);
        assert_eq!(EncodeConfig::new().with_jpeg_quality(1).effective_jpeg_quality(), 1);
        assert_eq!(EncodeConfig::new().with_jpeg_quality(250).effective_jpeg_quality(), 100);
    }

    #[test]
    fn defaults() {
        let c = EncodeConfig::default();
        assert!(!c.flip_vertically);
        assert!(c.tga_rle);
        assert_eq!(c.png_compression_level, 8);
        assert!(c.limits.is_none());
    }
}
