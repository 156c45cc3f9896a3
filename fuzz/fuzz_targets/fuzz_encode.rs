#![no_main]
use libfuzzer_sys::fuzz_target;
use zenwrite::*;

fuzz_target!(|input: &[u8]| {
    // Header: width, height, channels, format, options.
    let [w, h, c, fmt, opts, pixels @ ..] = input else {
        return;
    };
    let width = u32::from(*w % 64) + 1;
    let height = u32::from(*h % 64) + 1;
    let Ok(channels) = Channels::try_from(c % 4 + 1) else {
        return;
    };
    let format = match fmt % 5 {
        0 => ImageFormat::Bmp,
        1 => ImageFormat::Tga,
        2 => ImageFormat::Hdr,
        3 => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    };
    let req = EncodeRequest::new(format)
        .with_flip_vertically(opts & 1 != 0)
        .with_tga_rle(opts & 2 != 0)
        .with_png_compression_level(opts >> 4)
        .with_jpeg_quality(opts.wrapping_mul(7) % 101);

    let needed = (width * height) as usize * channels.count();
    if pixels.len() < needed {
        // Undersized buffers must be rejected, never read past.
        assert!(req.encode(pixels, width, height, channels, enough::Unstoppable).is_err());
        return;
    }
    let a = req
        .encode(&pixels[..needed], width, height, channels, enough::Unstoppable)
        .expect("valid input must encode");
    let b = req
        .encode(&pixels[..needed], width, height, channels, enough::Unstoppable)
        .expect("valid input must encode");
    assert_eq!(a, b, "encoding must be deterministic");
});
