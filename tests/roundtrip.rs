#![cfg(all(feature = "bmp", feature = "tga", feature = "hdr", feature = "png", feature = "jpeg"))]

use enough::{Stop, StopReason, Unstoppable};
use zenwrite::*;

fn decode(bytes: &[u8], format: image::ImageFormat) -> image::DynamicImage {
    image::load_from_memory_with_format(bytes, format).unwrap()
}

fn gradient_rgb(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            pixels.push((x * 255 / w.max(2).saturating_sub(1).max(1)) as u8);
            pixels.push((y * 255 / h.max(2).saturating_sub(1).max(1)) as u8);
            pixels.push(((x + y) * 4) as u8);
        }
    }
    pixels
}

fn psnr(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let mse = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        / a.len() as f64;
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (255.0f64 * 255.0 / mse).log10()
}

// ── BMP ──────────────────────────────────────────────────────────────

#[test]
fn bmp_roundtrip_rgb8() {
    let pixels: Vec<u8> = (0..7 * 5 * 3).map(|i| (i * 31 % 256) as u8).collect();
    let encoded = EncodeRequest::bmp()
        .encode(&pixels, 7, 5, Channels::Rgb, Unstoppable)
        .unwrap();
    // 7 * 3 = 21 bytes per row, padded to 24.
    assert_eq!(encoded.len(), 54 + 24 * 5);
    let decoded = decode(&encoded, image::ImageFormat::Bmp).to_rgb8();
    assert_eq!(decoded.dimensions(), (7, 5));
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn bmp_gray_is_expanded() {
    let pixels = [0u8, 60, 120, 180, 240, 255];
    let encoded = EncodeRequest::bmp()
        .encode(&pixels, 3, 2, Channels::Gray, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Bmp).to_rgb8();
    let expected: Vec<u8> = pixels.iter().flat_map(|&g| [g, g, g]).collect();
    assert_eq!(decoded.as_raw(), &expected);
}

#[test]
fn bmp_rgba_composites_over_magenta() {
    let pixels = [10u8, 20, 30, 255, 10, 20, 30, 0];
    let encoded = EncodeRequest::bmp()
        .encode(&pixels, 2, 1, Channels::Rgba, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Bmp).to_rgb8();
    assert_eq!(decoded.as_raw(), &[10, 20, 30, 255, 0, 255]);
}

#[test]
fn bmp_flip_vertically_reverses_rows() {
    let pixels = gradient_rgb(4, 3);
    let flipped = EncodeRequest::bmp()
        .with_flip_vertically(true)
        .encode(&pixels, 4, 3, Channels::Rgb, Unstoppable)
        .unwrap();
    let decoded = decode(&flipped, image::ImageFormat::Bmp).to_rgb8();
    let expected: Vec<u8> = pixels.chunks(12).rev().flatten().copied().collect();
    assert_eq!(decoded.as_raw(), &expected);
}

// ── TGA ──────────────────────────────────────────────────────────────

#[test]
fn tga_roundtrip_rgba_raw_and_rle() {
    let pixels: Vec<u8> = (0..9 * 4 * 4).map(|i| (i / 7 * 13 % 256) as u8).collect();
    for rle in [false, true] {
        let encoded = EncodeRequest::tga()
            .with_tga_rle(rle)
            .encode(&pixels, 9, 4, Channels::Rgba, Unstoppable)
            .unwrap();
        assert_eq!(encoded[2], if rle { 10 } else { 2 });
        let decoded = decode(&encoded, image::ImageFormat::Tga).to_rgba8();
        assert_eq!(decoded.dimensions(), (9, 4));
        assert_eq!(decoded.as_raw(), &pixels, "rle={rle}");
    }
}

#[test]
fn tga_roundtrip_gray_rle() {
    let mut pixels = vec![17u8; 40 * 3];
    pixels[45] = 200;
    pixels[46] = 201;
    let encoded = EncodeRequest::tga()
        .encode(&pixels, 40, 3, Channels::Gray, Unstoppable)
        .unwrap();
    assert_eq!(encoded[2], 11);
    assert_eq!(encoded[16], 8);
    let decoded = decode(&encoded, image::ImageFormat::Tga).to_luma8();
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn tga_rle_shrinks_flat_images() {
    let pixels = vec![90u8; 64 * 64 * 3];
    let raw = EncodeRequest::tga()
        .with_tga_rle(false)
        .encode(&pixels, 64, 64, Channels::Rgb, Unstoppable)
        .unwrap();
    let rle = EncodeRequest::tga()
        .encode(&pixels, 64, 64, Channels::Rgb, Unstoppable)
        .unwrap();
    assert_eq!(raw.len(), 18 + 64 * 64 * 3);
    // One 128-pixel limit means each 64-pixel row is a single 4-byte packet.
    assert_eq!(rle.len(), 18 + 64 * 4);
}

// ── PNG ──────────────────────────────────────────────────────────────

#[test]
fn png_roundtrip_every_layout() {
    let (w, h) = (13u32, 6u32);
    for channels in [Channels::Gray, Channels::GrayAlpha, Channels::Rgb, Channels::Rgba] {
        let n = channels.count();
        let pixels: Vec<u8> = (0..w as usize * h as usize * n)
            .map(|i| ((i * 7) ^ (i >> 3)) as u8)
            .collect();
        let encoded = EncodeRequest::png()
            .encode(&pixels, w, h, channels, Unstoppable)
            .unwrap();
        let img = decode(&encoded, image::ImageFormat::Png);
        assert_eq!((img.width(), img.height()), (w, h));
        let raw = match channels {
            Channels::Gray => img.to_luma8().into_raw(),
            Channels::GrayAlpha => img.to_luma_alpha8().into_raw(),
            Channels::Rgb => img.to_rgb8().into_raw(),
            Channels::Rgba => img.to_rgba8().into_raw(),
        };
        assert_eq!(raw, pixels, "{channels:?}");
    }
}

#[test]
fn png_forced_filters_and_levels_decode_identically() {
    let pixels = gradient_rgb(31, 9);
    let filters = [
        None,
        Some(PngFilter::None),
        Some(PngFilter::Sub),
        Some(PngFilter::Up),
        Some(PngFilter::Average),
        Some(PngFilter::Paeth),
    ];
    for filter in filters {
        for level in [0u8, 5, 8, 9, 30] {
            let encoded = EncodeRequest::png()
                .with_png_filter(filter)
                .with_png_compression_level(level)
                .encode(&pixels, 31, 9, Channels::Rgb, Unstoppable)
                .unwrap();
            let decoded = decode(&encoded, image::ImageFormat::Png).to_rgb8();
            assert_eq!(decoded.as_raw(), &pixels, "{filter:?} level {level}");
        }
    }
}

#[test]
fn png_flip_vertically_reverses_rows() {
    let pixels: Vec<u8> = (0..5 * 4).map(|i| i as u8 * 10).collect();
    let encoded = EncodeRequest::png()
        .with_flip_vertically(true)
        .encode(&pixels, 5, 4, Channels::Gray, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Png).to_luma8();
    let expected: Vec<u8> = pixels.chunks(5).rev().flatten().copied().collect();
    assert_eq!(decoded.as_raw(), &expected);
}

#[test]
fn png_strided_view() {
    // 3x2 RGB image inside rows of 16 bytes.
    let mut buf = vec![0xEEu8; 16 * 2];
    buf[..9].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    buf[16..25].copy_from_slice(&[9, 8, 7, 6, 5, 4, 3, 2, 1]);
    let view = ImageView::with_stride(&buf, 3, 2, Channels::Rgb, 16).unwrap();
    let encoded = encode_png(&view, &EncodeConfig::new(), Unstoppable).unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Png).to_rgb8();
    assert_eq!(
        decoded.as_raw(),
        &[1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 8, 7, 6, 5, 4, 3, 2, 1]
    );
}

// ── JPEG ─────────────────────────────────────────────────────────────

#[test]
fn jpeg_high_quality_is_close() {
    let (w, h) = (37usize, 21usize);
    let pixels = gradient_rgb(w, h);
    let encoded = EncodeRequest::jpeg(95)
        .encode(&pixels, w as u32, h as u32, Channels::Rgb, Unstoppable)
        .unwrap();
    assert_eq!(&encoded[..2], &[0xFF, 0xD8]);
    assert_eq!(&encoded[encoded.len() - 2..], &[0xFF, 0xD9]);
    let decoded = decode(&encoded, image::ImageFormat::Jpeg).to_rgb8();
    assert_eq!(decoded.dimensions(), (w as u32, h as u32));
    let p = psnr(decoded.as_raw(), &pixels);
    assert!(p > 30.0, "psnr {p:.2} dB");
}

#[test]
fn jpeg_quality_trades_size_for_fidelity() {
    let pixels = gradient_rgb(64, 48);
    let enc = |q: u8| {
        EncodeRequest::jpeg(q)
            .encode(&pixels, 64, 48, Channels::Rgb, Unstoppable)
            .unwrap()
    };
    let (low, high) = (enc(10), enc(100));
    assert!(low.len() < high.len());
    let p_low = psnr(decode(&low, image::ImageFormat::Jpeg).to_rgb8().as_raw(), &pixels);
    let p_high = psnr(decode(&high, image::ImageFormat::Jpeg).to_rgb8().as_raw(), &pixels);
    assert!(p_high > p_low, "{p_high:.2} vs {p_low:.2}");
}

#[test]
fn jpeg_gray_decodes_neutral() {
    let pixels: Vec<u8> = (0..16 * 16).map(|i| (i % 16 * 16) as u8).collect();
    let encoded = EncodeRequest::jpeg(90)
        .encode(&pixels, 16, 16, Channels::Gray, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Jpeg).to_rgb8();
    for px in decoded.pixels() {
        let [r, g, b] = px.0;
        assert!(r.abs_diff(g) <= 3 && g.abs_diff(b) <= 3, "{r} {g} {b}");
    }
}

#[test]
fn jpeg_tiny_image() {
    let encoded = EncodeRequest::jpeg(0)
        .encode(&[200, 10, 10], 1, 1, Channels::Rgb, Unstoppable)
        .unwrap();
    let decoded = decode(&encoded, image::ImageFormat::Jpeg).to_rgb8();
    let [r, g, b] = decoded.get_pixel(0, 0).0;
    assert!(r.abs_diff(200) < 12 && g.abs_diff(10) < 12 && b.abs_diff(10) < 12);
}

#[test]
fn jpeg_quality_extremes_at_odd_sizes() {
    for (w, h) in [(1usize, 1usize), (9, 13), (17, 3)] {
        let pixels = gradient_rgb(w, h);
        let mut sizes = Vec::new();
        for q in [1u8, 100] {
            let encoded = EncodeRequest::jpeg(q)
                .encode(&pixels, w as u32, h as u32, Channels::Rgb, Unstoppable)
                .unwrap();
            let decoded = decode(&encoded, image::ImageFormat::Jpeg).to_rgb8();
            assert_eq!(decoded.dimensions(), (w as u32, h as u32), "q{q} {w}x{h}");
            if q == 100 {
                let p = psnr(decoded.as_raw(), &pixels);
                assert!(p > 30.0, "q100 {w}x{h}: psnr {p:.2} dB");
            }
            sizes.push(encoded.len());
        }
        assert!(sizes[0] <= sizes[1], "{w}x{h}: {sizes:?}");
    }
}

// ── HDR ──────────────────────────────────────────────────────────────

#[test]
fn hdr_header_and_raw_scanlines() {
    let floats = [1.0f32, 0.5, 0.25, 0.0, 0.0, 0.0];
    let view = ImageView::new(&floats, 2, 1, Channels::Rgb).unwrap();
    let encoded = encode_hdr(&view, &EncodeConfig::new(), Unstoppable).unwrap();
    let text = b"#?RADIANCE\n";
    assert!(encoded.starts_with(text));
    let end = encoded.windows(2).position(|w| w == b"\n\n").unwrap() + 2;
    let rest = &encoded[end..];
    assert!(rest.starts_with(b"-Y 1 +X 2\n"));
    // Width 2 is below the RLE threshold: raw RGBE.
    let pixels = &rest[b"-Y 1 +X 2\n".len()..];
    assert_eq!(pixels, &[128, 64, 32, 129, 0, 0, 0, 0]);
}

#[test]
fn hdr_rle_scanline_marker() {
    let floats = vec![0.75f32; 16 * 2 * 3];
    let view = ImageView::new(&floats, 16, 2, Channels::Rgb).unwrap();
    let encoded = encode_hdr(&view, &EncodeConfig::new(), Unstoppable).unwrap();
    let start = encoded.windows(11).position(|w| w == b"-Y 2 +X 16\n").unwrap() + 11;
    assert_eq!(&encoded[start..start + 4], &[2, 2, 0, 16]);
    // Four flat planes, each one run packet.
    assert_eq!(encoded.len() - start, 2 * (4 + 4 * 2));
}

// ── Sinks, limits, cancellation ─────────────────────────────────────

#[test]
fn streaming_sink_sees_every_byte() {
    let pixels = gradient_rgb(10, 20);
    let expected = EncodeRequest::bmp()
        .encode(&pixels, 10, 20, Channels::Rgb, Unstoppable)
        .unwrap();
    let mut collected = Vec::new();
    let mut calls = 0;
    let mut sink = FnSink(|bytes: &[u8]| {
        assert!(!bytes.is_empty());
        calls += 1;
        collected.extend_from_slice(bytes);
        bytes.len()
    });
    EncodeRequest::bmp()
        .write_to(&mut sink, &pixels, 10, 20, Channels::Rgb, Unstoppable)
        .unwrap();
    drop(sink);
    assert_eq!(collected, expected);
    // Header, then one call per row.
    assert_eq!(calls, 1 + 20);
}

#[test]
fn io_sink_writes_to_std_writer() {
    let pixels = gradient_rgb(3, 3);
    let mut sink = IoSink::new(std::io::Cursor::new(Vec::new()));
    EncodeRequest::png()
        .write_to(&mut sink, &pixels, 3, 3, Channels::Rgb, Unstoppable)
        .unwrap();
    let bytes = sink.into_inner().into_inner();
    let decoded = decode(&bytes, image::ImageFormat::Png).to_rgb8();
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn short_write_aborts() {
    let pixels = gradient_rgb(4, 4);
    let mut sink = FnSink(|bytes: &[u8]| bytes.len() - 1);
    let err = EncodeRequest::tga()
        .write_to(&mut sink, &pixels, 4, 4, Channels::Rgb, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, WriteError::ShortWrite { requested: 18, accepted: 17 }));
}

#[test]
fn limits_reject_large() {
    let pixels = vec![0u8; 100 * 100 * 3];
    let limits = Limits {
        max_pixels: Some(5000),
        ..Default::default()
    };
    for req in [
        EncodeRequest::bmp(),
        EncodeRequest::tga(),
        EncodeRequest::hdr(),
        EncodeRequest::png(),
        EncodeRequest::jpeg(90),
    ] {
        let format = req.format();
        let err = req
            .with_limits(limits.clone())
            .encode(&pixels, 100, 100, Channels::Rgb, Unstoppable)
            .unwrap_err();
        assert!(matches!(err, WriteError::LimitExceeded(_)), "{format:?}: {err}");
    }
}

struct AlreadyCancelled;

impl Stop for AlreadyCancelled {
    fn check(&self) -> Result<(), StopReason> {
        Err(StopReason::Cancelled)
    }
}

#[test]
fn cancellation_is_reported() {
    let pixels = gradient_rgb(8, 8);
    for req in [
        EncodeRequest::bmp(),
        EncodeRequest::tga(),
        EncodeRequest::hdr(),
        EncodeRequest::png(),
        EncodeRequest::jpeg(90),
    ] {
        let mut out = Vec::new();
        let err = req
            .write_to(&mut out, &pixels, 8, 8, Channels::Rgb, AlreadyCancelled)
            .unwrap_err();
        assert!(matches!(err, WriteError::Cancelled(_)), "{:?}", req.format());
    }
}

#[test]
fn zero_dimensions_rejected() {
    let err = EncodeRequest::png()
        .encode(&[], 0, 4, Channels::Rgb, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, WriteError::InvalidDimensions { width: 0, height: 4 }));
}

