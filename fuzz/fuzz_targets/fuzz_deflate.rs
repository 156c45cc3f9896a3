#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &[u8]| {
    // First byte picks the effort level, the rest is the payload.
    let Some((&level, data)) = input.split_first() else {
        return;
    };
    let compressed = zenwrite::deflate::zlib_compress(data, level % 12).expect("compress");
    let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&compressed)
        .expect("compressor produced an invalid zlib stream");
    assert_eq!(inflated, data, "deflate roundtrip mismatch");
});
