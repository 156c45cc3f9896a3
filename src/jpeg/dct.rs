//! Arai-Agui-Nakajima forward DCT on an 8x8 block.
//!
//! Outputs are scaled by the per-row/column [`AAN_SCALE`] factors, which the
//! quantizer divides back out.
//!
//! [`AAN_SCALE`]: super::tables::AAN_SCALE

/// One 8-point pass over `block[start], block[start + step], ...`.
fn fdct_1d(block: &mut [f32; 64], start: usize, step: usize) {
    let i = |k: usize| start + k * step;
    let [d0, d1, d2, d3, d4, d5, d6, d7] = core::array::from_fn::<f32, 8, _>(|k| block[i(k)]);

    let tmp0 = d0 + d7;
    let tmp7 = d0 - d7;
    let tmp1 = d1 + d6;
    let tmp6 = d1 - d6;
    let tmp2 = d2 + d5;
    let tmp5 = d2 - d5;
    let tmp3 = d3 + d4;
    let tmp4 = d3 - d4;

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    block[i(0)] = tmp10 + tmp11;
    block[i(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * 0.707_106_77;
    block[i(2)] = tmp13 + z1;
    block[i(6)] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * 0.382_683_43;
    let z2 = tmp10 * 0.541_196_1 + z5;
    let z4 = tmp12 * 1.306_563 + z5;
    let z3 = tmp11 * 0.707_106_77;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    block[i(5)] = z13 + z2;
    block[i(3)] = z13 - z2;
    block[i(1)] = z11 + z4;
    block[i(7)] = z11 - z4;
}

/// Transform rows, then columns, in place.
pub(crate) fn fdct_8x8(block: &mut [f32; 64]) {
    for row in 0..8 {
        fdct_1d(block, row * 8, 1);
    }
    for col in 0..8 {
        fdct_1d(block, col, 8);
    }
}
