//! zlib stream compressor using only the fixed DEFLATE Huffman codes.
//!
//! One final block of type 01 (fixed codes). Matches come from hash chains
//! over 3-byte prefixes with a one-byte lazy check. The output is valid
//! zlib, not optimal zlib.

use alloc::vec::Vec;

use crate::checksum::adler32;
use crate::error::WriteError;

/// CMF/FLG pair: deflate, 32K window, "default" level hint. 0x785E % 31 == 0.
const ZLIB_HEADER: [u8; 2] = [0x78, 0x5E];

const HASH_BITS: u32 = 14;
const HASH_SIZE: usize = 1 << HASH_BITS;
const WINDOW: usize = 32768;
const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 258;
const MIN_QUALITY: usize = 5;

/// Base match length for each length code 257..=285, plus a sentinel.
const LENGTH_BASE: [u16; 30] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115,
    131, 163, 195, 227, 258, 259,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
/// Base distance for each distance code 0..=29, plus a sentinel.
const DIST_BASE: [u16; 31] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577, 32768,
];
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// LSB-first bit packer.
struct BitWriter {
    out: Vec<u8>,
    buf: u32,
    count: u32,
}

impl BitWriter {
    fn put(&mut self, bits: u32, n: u32) {
        debug_assert!(self.count + n <= 32);
        self.buf |= bits << self.count;
        self.count += n;
        while self.count >= 8 {
            self.out.push(self.buf as u8);
            self.buf >>= 8;
            self.count -= 8;
        }
    }

    /// Huffman codes are defined MSB-first; reverse them into the stream.
    fn put_code(&mut self, code: u32, n: u32) {
        self.put(reverse_bits(code, n), n);
    }

    fn align(&mut self) {
        if self.count > 0 {
            self.put(0, 8 - self.count);
        }
    }

    /// Fixed literal/length code for symbols 0..=287.
    fn put_symbol(&mut self, sym: u32) {
        match sym {
            0..=143 => self.put_code(0x30 + sym, 8),
            144..=255 => self.put_code(0x190 + sym - 144, 9),
            256..=279 => self.put_code(sym - 256, 7),
            _ => self.put_code(0xC0 + sym - 280, 8),
        }
    }

    fn put_match(&mut self, len: usize, dist: usize) {
        let j = LENGTH_BASE[1..]
            .iter()
            .position(|&next| len < usize::from(next))
            .unwrap_or(LENGTH_EXTRA.len() - 1);
        self.put_symbol(257 + j as u32);
        if LENGTH_EXTRA[j] != 0 {
            self.put((len - usize::from(LENGTH_BASE[j])) as u32, u32::from(LENGTH_EXTRA[j]));
        }

        let d = DIST_BASE[1..]
            .iter()
            .position(|&next| dist < usize::from(next))
            .unwrap_or(DIST_EXTRA.len() - 1);
        self.put_code(d as u32, 5);
        if DIST_EXTRA[d] != 0 {
            self.put((dist - usize::from(DIST_BASE[d])) as u32, u32::from(DIST_EXTRA[d]));
        }
    }
}

fn reverse_bits(code: u32, n: u32) -> u32 {
    code.reverse_bits() >> (32 - n)
}

fn hash3(bytes: &[u8]) -> usize {
    let mut h = u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16);
    h ^= h << 3;
    h = h.wrapping_add(h >> 5);
    h ^= h << 4;
    h = h.wrapping_add(h >> 17);
    h ^= h << 25;
    h = h.wrapping_add(h >> 6);
    (h & (HASH_SIZE as u32 - 1)) as usize
}

/// Length of the common prefix of `data[a..]` and `data[b..]`, capped at
/// `limit` and 258.
fn match_len(data: &[u8], a: usize, b: usize, limit: usize) -> usize {
    let limit = limit.min(MAX_MATCH);
    data[a..]
        .iter()
        .zip(&data[b..])
        .take(limit)
        .take_while(|(x, y)| x == y)
        .count()
}

/// Upper bound on [`zlib_compress`] output for `n` input bytes.
///
/// Fixed codes never spend more than 9 bits on a literal, and a match never
/// costs more than the literals it replaces.
pub fn compressed_bound(n: usize) -> usize {
    n + n / 8 + 64
}

/// Record `pos` in a hash bucket of at most `2 * quality` entries, dropping
/// the older half when it is full. The bucket is sized once, up front.
fn insert(bucket: &mut Vec<u32>, pos: u32, quality: usize) -> Result<(), WriteError> {
    let cap = 2 * quality;
    if bucket.capacity() < cap {
        bucket
            .try_reserve_exact(cap - bucket.len())
            .map_err(|_| WriteError::AllocationFailed(cap * 4))?;
    }
    if bucket.len() == cap {
        bucket.copy_within(quality.., 0);
        bucket.truncate(quality);
    }
    bucket.push(pos);
    Ok(())
}

/// Compress `data` into a zlib stream.
///
/// `quality` sets both the hash-chain search depth and the bucket cap
/// (`2 * quality` positions); values below 5 are raised to 5.
pub fn zlib_compress(data: &[u8], quality: u8) -> Result<Vec<u8>, WriteError> {
    let quality = usize::from(quality).max(MIN_QUALITY);
    let n = data.len();

    let estimate = compressed_bound(n);
    let mut out = Vec::new();
    out.try_reserve(estimate)
        .map_err(|_| WriteError::AllocationFailed(estimate))?;
    out.extend_from_slice(&ZLIB_HEADER);
    let mut bits = BitWriter { out, buf: 0, count: 0 };

    bits.put(1, 1); // BFINAL
    bits.put(1, 2); // BTYPE = 01, fixed Huffman

    let mut table: Vec<Vec<u32>> = Vec::new();
    table
        .try_reserve_exact(HASH_SIZE)
        .map_err(|_| WriteError::AllocationFailed(HASH_SIZE * core::mem::size_of::<Vec<u32>>()))?;
    table.resize_with(HASH_SIZE, Vec::new);
    let mut matches = 0usize;
    let mut i = 0;
    while i + MIN_MATCH < n {
        let h = hash3(&data[i..]);
        let mut best = MIN_MATCH;
        let mut best_pos = None;
        for &cand in &table[h] {
            let cand = cand as usize;
            if cand + WINDOW > i {
                let d = match_len(data, cand, i, n - i);
                if d >= best {
                    best = d;
                    best_pos = Some(cand);
                }
            }
        }

        insert(&mut table[h], i as u32, quality)?;

        // Lazy check: drop the match if one starting a byte later is longer.
        if best_pos.is_some() {
            let h1 = hash3(&data[i + 1..]);
            let better = table[h1].iter().any(|&cand| {
                let cand = cand as usize;
                cand + WINDOW - 1 > i && match_len(data, cand, i + 1, n - i - 1) > best
            });
            if better {
                best_pos = None;
            }
        }

        match best_pos {
            Some(pos) => {
                bits.put_match(best, i - pos);
                matches += 1;
                i += best;
            }
            None => {
                bits.put_symbol(u32::from(data[i]));
                i += 1;
            }
        }
    }
    for &b in &data[i..] {
        bits.put_symbol(u32::from(b));
    }
    bits.put_symbol(256);
    bits.align();

    let mut out = bits.out;
    out.extend_from_slice(&adler32(data).to_be_bytes());
    log::trace!(
        "deflate: {} -> {} bytes, {} matches, quality {}",
        n,
        out.len(),
        matches,
        quality
    );
    Ok(out)
}
