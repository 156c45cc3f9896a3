use alloc::vec::Vec;
use enough::Stop;

use crate::config::EncodeConfig;
use crate::error::WriteError;
#[cfg(feature = "png")]
use crate::png::PngFilter;
use crate::limits::Limits;
use crate::pixel::{Channels, ImageFormat};
use crate::sink::Sink;
use crate::view::ImageView;

/// Builder for encoding 8-bit pixels into any compiled-in format.
///
/// ```
/// use zenwrite::{Channels, EncodeRequest};
/// use enough::Unstoppable;
///
/// let pixels = [255u8, 0, 0, 0, 255, 0];
/// let png = EncodeRequest::png()
///     .encode(&pixels, 2, 1, Channels::Rgb, Unstoppable)?;
/// assert_eq!(&png[1..4], b"PNG");
/// # Ok::<(), zenwrite::WriteError>(())
/// ```
///
/// Radiance HDR requested through this builder maps each 8-bit sample to
/// `v / 255`. Use [`write_hdr`] for linear float input.
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    format: ImageFormat,
    config: EncodeConfig,
}

impl EncodeRequest {
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            config: EncodeConfig::default(),
        }
    }

    pub fn bmp() -> Self {
        Self::new(ImageFormat::Bmp)
    }

    pub fn tga() -> Self {
        Self::new(ImageFormat::Tga)
    }

    pub fn hdr() -> Self {
        Self::new(ImageFormat::Hdr)
    }

    pub fn png() -> Self {
        Self::new(ImageFormat::Png)
    }

    /// JPEG at `quality` (1..=100; 0 selects the default of 90).
    pub fn jpeg(quality: u8) -> Self {
        let mut req = Self::new(ImageFormat::Jpeg);
        req.config.jpeg_quality = quality;
        req
    }

    pub fn with_flip_vertically(mut self, flip: bool) -> Self {
        self.config = self.config.with_flip_vertically(flip);
        self
    }

    pub fn with_tga_rle(mut self, rle: bool) -> Self {
        self.config = self.config.with_tga_rle(rle);
        self
    }

    pub fn with_png_compression_level(mut self, level: u8) -> Self {
        self.config = self.config.with_png_compression_level(level);
        self
    }

    #[cfg(feature = "png")]
    pub fn with_png_filter(mut self, filter: Option<PngFilter>) -> Self {
        self.config = self.config.with_png_filter(filter);
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.config = self.config.with_jpeg_quality(quality);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.config = self.config.with_limits(limits);
        self
    }

    /// Replace every option at once.
    pub fn with_config(mut self, config: EncodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encode tightly packed pixels into a new buffer.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: Channels,
        stop: impl Stop,
    ) -> Result<Vec<u8>, WriteError> {
        let view = ImageView::new(pixels, width, height, channels)?;
        self.encode_view(&view, stop)
    }

    /// Encode a (possibly strided) view into a new buffer.
    pub fn encode_view(&self, view: &ImageView<'_, u8>, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
        #[cfg(feature = "png")]
        if self.format == ImageFormat::Png {
            return crate::png::encode(view, &self.config, &stop);
        }
        let mut out = Vec::new();
        self.dispatch(&mut out, view, &stop)?;
        Ok(out)
    }

    /// Encode tightly packed pixels into `sink`.
    pub fn write_to(
        &self,
        sink: &mut dyn Sink,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: Channels,
        stop: impl Stop,
    ) -> Result<(), WriteError> {
        let view = ImageView::new(pixels, width, height, channels)?;
        self.dispatch(sink, &view, &stop)
    }

    /// Encode a view into `sink`.
    pub fn write_view(
        &self,
        sink: &mut dyn Sink,
        view: &ImageView<'_, u8>,
        stop: impl Stop,
    ) -> Result<(), WriteError> {
        self.dispatch(sink, view, &stop)
    }

    #[allow(unused_variables)]
    fn dispatch(
        &self,
        sink: &mut dyn Sink,
        view: &ImageView<'_, u8>,
        stop: &dyn Stop,
    ) -> Result<(), WriteError> {
        let config = &self.config;
        match self.format {
            #[cfg(feature = "bmp")]
            ImageFormat::Bmp => crate::bmp::write(sink, view, config, stop),
            #[cfg(feature = "tga")]
            ImageFormat::Tga => crate::tga::write(sink, view, config, stop),
            #[cfg(feature = "hdr")]
            ImageFormat::Hdr => crate::hdr::write_u8(sink, view, config, stop),
            #[cfg(feature = "png")]
            ImageFormat::Png => crate::png::write(sink, view, config, stop),
            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::jpeg::write(sink, view, config, stop),
            #[allow(unreachable_patterns)]
            other => Err(WriteError::UnsupportedFormat(other)),
        }
    }
}

// ── Per-format entry points ──────────────────────────────────────────

/// Write a 24-bit BMP. Alpha is composited over magenta.
#[cfg(feature = "bmp")]
pub fn write_bmp(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::bmp::write(sink, view, config, &stop)
}

#[cfg(feature = "bmp")]
pub fn encode_bmp(view: &ImageView<'_, u8>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    crate::bmp::write(&mut out, view, config, &stop)?;
    Ok(out)
}

/// Write a TGA, run-length encoded when `config.tga_rle` is set.
#[cfg(feature = "tga")]
pub fn write_tga(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::tga::write(sink, view, config, &stop)
}

#[cfg(feature = "tga")]
pub fn encode_tga(view: &ImageView<'_, u8>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    crate::tga::write(&mut out, view, config, &stop)?;
    Ok(out)
}

/// Write Radiance RGBE from linear float samples.
///
/// Gray input is replicated to RGB; alpha is ignored.
#[cfg(feature = "hdr")]
pub fn write_hdr(
    sink: &mut dyn Sink,
    view: &ImageView<'_, f32>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::hdr::write(sink, view, config, &stop)
}

#[cfg(feature = "hdr")]
pub fn encode_hdr(view: &ImageView<'_, f32>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    crate::hdr::write(&mut out, view, config, &stop)?;
    Ok(out)
}

/// Write Radiance RGBE from 8-bit samples, each mapped to `v / 255`.
#[cfg(feature = "hdr")]
pub fn write_hdr_u8(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::hdr::write_u8(sink, view, config, &stop)
}

#[cfg(feature = "hdr")]
pub fn encode_hdr_u8(view: &ImageView<'_, u8>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    crate::hdr::write_u8(&mut out, view, config, &stop)?;
    Ok(out)
}

/// Write a PNG. The whole file is built in memory, then handed to `sink`
/// in a single call.
#[cfg(feature = "png")]
pub fn write_png(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::png::write(sink, view, config, &stop)
}

/// Encode a PNG into a new buffer.
#[cfg(feature = "png")]
pub fn encode_png(view: &ImageView<'_, u8>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    crate::png::encode(view, config, &stop)
}

/// Write a baseline JPEG. Alpha is dropped.
#[cfg(feature = "jpeg")]
pub fn write_jpeg(
    sink: &mut dyn Sink,
    view: &ImageView<'_, u8>,
    config: &EncodeConfig,
    stop: impl Stop,
) -> Result<(), WriteError> {
    crate::jpeg::write(sink, view, config, &stop)
}

#[cfg(feature = "jpeg")]
pub fn encode_jpeg(view: &ImageView<'_, u8>, config: &EncodeConfig, stop: impl Stop) -> Result<Vec<u8>, WriteError> {
    let mut out = Vec::new();
    crate::jpeg::write(&mut out, view, config, &stop)?;
    Ok(out)
}
