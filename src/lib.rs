//! # zenwrite
//!
//! Write-only image encoders for BMP, TGA, Radiance HDR, PNG and baseline
//! JPEG, with a built-in zlib/DEFLATE compressor. No decoding, no external
//! codec libraries.
//!
//! ## Supported Formats
//!
//! - **BMP** (`bmp` feature): 24-bit uncompressed, bottom-up. Alpha is
//!   composited over magenta so transparency stays visible.
//! - **TGA** (`tga` feature): gray or true-color, with alpha kept, raw or
//!   run-length encoded.
//! - **HDR** (`hdr` feature): Radiance RGBE with new-style per-plane RLE.
//! - **PNG** (`png` feature): 8-bit gray/gray+alpha/RGB/RGBA with adaptive
//!   per-row filtering.
//! - **JPEG** (`jpeg` feature): baseline, 4:4:4, Annex K tables scaled by
//!   quality.
//!
//! ## Output
//!
//! Every encoder writes through a [`Sink`]. `Vec<u8>` is a sink, closures
//! become sinks via [`FnSink`], and with `std` any [`std::io::Write`] works
//! through [`IoSink`]. BMP, TGA, HDR and JPEG stream row by row; PNG is
//! compressed in memory and handed over in one piece.
//!
//! ## Cancellation
//!
//! Every entry point takes an [`enough::Stop`] token. Pass [`Unstoppable`]
//! when cancellation isn't needed.
//!
//! ## Usage
//!
//! ```
//! use zenwrite::{Channels, EncodeRequest, ImageView, EncodeConfig};
//! use enough::Unstoppable;
//!
//! let rgba = vec![0u8; 4 * 4 * 4];
//!
//! // Builder style, to memory
//! let tga = EncodeRequest::tga()
//!     .with_flip_vertically(true)
//!     .encode(&rgba, 4, 4, Channels::Rgba, Unstoppable)?;
//!
//! // Free functions, to any sink
//! # #[cfg(feature = "jpeg")]
//! # {
//! let view = ImageView::new(&rgba, 4, 4, Channels::Rgba)?;
//! let mut out = Vec::new();
//! zenwrite::write_jpeg(&mut out, &view, &EncodeConfig::new().with_jpeg_quality(85), Unstoppable)?;
//! # }
//! # Ok::<(), zenwrite::WriteError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod config;
mod encode;
mod error;
mod limits;
mod pixel;
mod sink;
mod view;

pub mod checksum;
pub mod deflate;

#[cfg(feature = "bmp")]
mod bmp;

#[cfg(feature = "tga")]
mod tga;

#[cfg(feature = "hdr")]
mod hdr;

#[cfg(feature = "png")]
mod png;

#[cfg(feature = "jpeg")]
mod jpeg;

#[cfg(feature = "rgb")]
mod typed;

// Re-exports
pub use config::{DEFAULT_JPEG_QUALITY, DEFAULT_PNG_COMPRESSION, EncodeConfig};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::WriteError;
pub use limits::Limits;
pub use pixel::{Channels, ImageFormat};
pub use sink::{FnSink, Sink};
#[cfg(feature = "std")]
pub use sink::IoSink;
pub use view::ImageView;

#[cfg(feature = "bmp")]
pub use encode::{encode_bmp, write_bmp};
#[cfg(feature = "tga")]
pub use encode::{encode_tga, write_tga};
#[cfg(feature = "hdr")]
pub use encode::{encode_hdr, encode_hdr_u8, write_hdr, write_hdr_u8};
#[cfg(feature = "png")]
pub use encode::{encode_png, write_png};
#[cfg(feature = "png")]
pub use png::PngFilter;
#[cfg(feature = "jpeg")]
pub use encode::{encode_jpeg, write_jpeg};
#[cfg(feature = "rgb")]
pub use typed::EncodePixel;
