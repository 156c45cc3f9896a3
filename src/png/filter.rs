//! PNG scanline filters and the minimum-absolute-sum selection heuristic.

use super::PngFilter;

/// All five filters in type-byte order.
pub(crate) const ALL_FILTERS: [PngFilter; 5] = [
    PngFilter::None,
    PngFilter::Sub,
    PngFilter::Up,
    PngFilter::Average,
    PngFilter::Paeth,
];

/// Paeth predictor; ties prefer `a`, then `b`.
pub(crate) fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let (ia, ib, ic) = (i32::from(a), i32::from(b), i32::from(c));
    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Filter one row into `out`.
///
/// `prev` is the previously emitted row, or an all-zero row for the first,
/// which is what the PNG decoder assumes. `bpp` is bytes per pixel.
pub(crate) fn filter_row(filter: PngFilter, cur: &[u8], prev: &[u8], bpp: usize, out: &mut [u8]) {
    debug_assert_eq!(cur.len(), prev.len());
    debug_assert_eq!(cur.len(), out.len());
    let head = bpp.min(cur.len());
    match filter {
        PngFilter::None => out.copy_from_slice(cur),
        PngFilter::Sub => {
            out[..head].copy_from_slice(&cur[..head]);
            for i in head..cur.len() {
                out[i] = cur[i].wrapping_sub(cur[i - bpp]);
            }
        }
        PngFilter::Up => {
            for i in 0..cur.len() {
                out[i] = cur[i].wrapping_sub(prev[i]);
            }
        }
        PngFilter::Average => {
            for i in 0..head {
                out[i] = cur[i].wrapping_sub(prev[i] >> 1);
            }
            for i in head..cur.len() {
                let avg = (u16::from(cur[i - bpp]) + u16::from(prev[i])) >> 1;
                out[i] = cur[i].wrapping_sub(avg as u8);
            }
        }
        PngFilter::Paeth => {
            for i in 0..head {
                out[i] = cur[i].wrapping_sub(paeth(0, prev[i], 0));
            }
            for i in head..cur.len() {
                out[i] = cur[i].wrapping_sub(paeth(cur[i - bpp], prev[i], prev[i - bpp]));
            }
        }
    }
}

/// Sum of filtered bytes read as signed values: a cheap entropy proxy.
pub(crate) fn cost(filtered: &[u8]) -> u32 {
    filtered
        .iter()
        .map(|&b| u32::from((b as i8).unsigned_abs()))
        .sum()
}

/// Pick the filter with the lowest [`cost`], leaving its output in `out`.
///
/// Ties go to the lower filter type. `out` is only re-filtered when the
/// winner is not the last candidate tried.
pub(crate) fn choose_filter(cur: &[u8], prev: &[u8], bpp: usize, out: &mut [u8]) -> PngFilter {
    let mut best = PngFilter::None;
    let mut best_cost = u32::MAX;
    for filter in ALL_FILTERS {
        filter_row(filter, cur, prev, bpp, out);
        let c = cost(out);
        if c < best_cost {
            best_cost = c;
            best = filter;
        }
    }
    if best != ALL_FILTERS[ALL_FILTERS.len() - 1] {
        filter_row(best, cur, prev, bpp, out);
    }
    best
}
