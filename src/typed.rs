//! Typed pixel input via the `rgb` and `imgref` crates.

use alloc::vec::Vec;
use enough::Stop;
use rgb::ComponentBytes;

use crate::encode::EncodeRequest;
use crate::error::WriteError;
use crate::pixel::Channels;
use crate::view::ImageView;

/// An 8-bit pixel type the encoders accept directly.
pub trait EncodePixel: Copy + 'static {
    /// Channel layout of one pixel.
    fn channels() -> Channels;
}

impl EncodePixel for rgb::Rgb<u8> {
    fn channels() -> Channels {
        Channels::Rgb
    }
}

impl EncodePixel for rgb::Rgba<u8> {
    fn channels() -> Channels {
        Channels::Rgba
    }
}

impl EncodePixel for rgb::Gray<u8> {
    fn channels() -> Channels {
        Channels::Gray
    }
}

fn to_u32(width: usize, height: usize) -> Result<(u32, u32), WriteError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(WriteError::DimensionsTooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        }),
    }
}

impl EncodeRequest {
    /// Encode a tightly packed slice of typed pixels.
    pub fn encode_pixels<P: EncodePixel>(
        &self,
        pixels: &[P],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, WriteError>
    where
        [P]: ComponentBytes<u8>,
    {
        self.encode(pixels.as_bytes(), width, height, P::channels(), stop)
    }

    /// Encode an [`imgref::ImgRef`], honoring its stride.
    #[cfg(feature = "imgref")]
    pub fn encode_imgref<P: EncodePixel>(
        &self,
        img: imgref::ImgRef<'_, P>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, WriteError>
    where
        [P]: ComponentBytes<u8>,
    {
        let (width, height) = to_u32(img.width(), img.height())?;
        let channels = P::channels();
        let stride = img.stride() * channels.count();
        let view = ImageView::with_stride(img.buf().as_bytes(), width, height, channels, stride)?;
        self.encode_view(&view, stop)
    }
}
