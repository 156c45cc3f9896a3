use crate::error::WriteError;
use crate::pixel::Channels;

/// A borrowed, validated pixel buffer.
///
/// Rows are `stride` samples apart; each row holds `width * channels`
/// samples. Construction checks every bound an encoder relies on, so no
/// encoder ever reads past the last sample of the last row.
///
/// `T` is `u8` for the 8-bit formats and `f32` for Radiance HDR.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a, T = u8> {
    data: &'a [T],
    width: u32,
    height: u32,
    channels: Channels,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Tightly packed rows.
    pub fn new(data: &'a [T], width: u32, height: u32, channels: Channels) -> Result<Self, WriteError> {
        let stride = (width as usize)
            .checked_mul(channels.count())
            .ok_or(WriteError::DimensionsTooLarge { width, height })?;
        Self::with_stride(data, width, height, channels, stride)
    }

    /// Rows `stride` samples apart (`stride >= width * channels`).
    pub fn with_stride(
        data: &'a [T],
        width: u32,
        height: u32,
        channels: Channels,
        stride: usize,
    ) -> Result<Self, WriteError> {
        if width == 0 || height == 0 {
            return Err(WriteError::InvalidDimensions { width, height });
        }
        let row_len = (width as usize)
            .checked_mul(channels.count())
            .ok_or(WriteError::DimensionsTooLarge { width, height })?;
        if stride < row_len {
            return Err(WriteError::InvalidStride { stride, row_len });
        }
        let needed = stride
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(row_len))
            .ok_or(WriteError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(WriteError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Distance between row starts, in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Samples in one row, excluding stride padding.
    pub(crate) fn row_len(&self) -> usize {
        self.width as usize * self.channels.count()
    }

    /// Row `y` without stride padding.
    pub(crate) fn row(&self, y: usize) -> &'a [T] {
        let start = y * self.stride;
        &self.data[start..start + self.row_len()]
    }
}
