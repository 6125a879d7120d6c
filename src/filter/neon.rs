use archmage::{NeonToken, arcane, rite};
use core::arch::aarch64::{
    float32x4_t, uint32x4_t, vaddq_f32, vandq_u32, vcvtq_f32_u32, vcvtq_u32_f32, vdupq_n_f32,
    vdupq_n_u32, vmaxnmq_f32, vminq_f32, vmulq_f32, vorrq_u32, vshlq_n_u32, vshrq_n_u32,
};
use safe_unaligned_simd::aarch64::{vld1q_u32, vst1q_u32};

use super::{ColorMatrix, scalar};

type Coeffs = [[float32x4_t; 4]; 3];

// ===========================================================================
// ARM NEON: rite lane helpers
// ===========================================================================

#[rite]
fn splat_neon(_token: NeonToken, m: &ColorMatrix) -> Coeffs {
    let mut out = [[vdupq_n_f32(0.0); 4]; 3];
    for ((dst, row), k) in out.iter_mut().zip(&m.rows).zip(m.offset) {
        *dst = [
            vdupq_n_f32(row[0]),
            vdupq_n_f32(row[1]),
            vdupq_n_f32(row[2]),
            vdupq_n_f32(k),
        ];
    }
    out
}

#[rite]
fn channel_neon(
    _token: NeonToken,
    r: float32x4_t,
    g: float32x4_t,
    b: float32x4_t,
    c: &[float32x4_t; 4],
) -> uint32x4_t {
    let rg = vaddq_f32(vmulq_f32(r, c[0]), vmulq_f32(g, c[1]));
    let sum = vaddq_f32(vaddq_f32(rg, vmulq_f32(b, c[2])), c[3]);
    // maxNM drops a NaN operand, matching f32::max.
    let clamped = vminq_f32(vmaxnmq_f32(sum, vdupq_n_f32(0.0)), vdupq_n_f32(255.0));
    vcvtq_u32_f32(clamped)
}

#[rite]
fn color_matrix_px4_neon(token: NeonToken, px: uint32x4_t, coeffs: &Coeffs) -> uint32x4_t {
    let lo = vdupq_n_u32(0xFF);
    let r = vcvtq_f32_u32(vandq_u32(px, lo));
    let g = vcvtq_f32_u32(vandq_u32(vshrq_n_u32::<8>(px), lo));
    let b = vcvtq_f32_u32(vandq_u32(vshrq_n_u32::<16>(px), lo));

    let nr = channel_neon(token, r, g, b, &coeffs[0]);
    let ng = channel_neon(token, r, g, b, &coeffs[1]);
    let nb = channel_neon(token, r, g, b, &coeffs[2]);
    let alpha = vandq_u32(px, vdupq_n_u32(0xFF00_0000));

    vorrq_u32(
        vorrq_u32(nr, vshlq_n_u32::<8>(ng)),
        vorrq_u32(vshlq_n_u32::<16>(nb), alpha),
    )
}

// ===========================================================================
// ARM NEON: arcane entry point
// ===========================================================================

#[arcane]
pub(super) fn color_matrix_neon(token: NeonToken, words: &mut [u32], m: &ColorMatrix) {
    let coeffs = splat_neon(token, m);
    let (chunks, tail) = words.as_chunks_mut::<4>();
    for chunk in chunks {
        let px = vld1q_u32(chunk);
        vst1q_u32(chunk, color_matrix_px4_neon(token, px, &coeffs));
    }
    scalar::color_matrix_le(tail, m);
}
