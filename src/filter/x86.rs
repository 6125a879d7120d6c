use archmage::{X64V2Token, arcane, rite};
use core::arch::x86_64::{
    __m128, __m128i, _mm_add_ps, _mm_and_si128, _mm_cvtepi32_ps, _mm_cvttps_epi32, _mm_max_ps,
    _mm_min_ps, _mm_mul_ps, _mm_or_si128, _mm_set1_epi32, _mm_set1_ps, _mm_setzero_ps,
    _mm_slli_epi32, _mm_srli_epi32,
};
use safe_unaligned_simd::x86_64::{_mm_loadu_si128, _mm_storeu_si128};

use super::{ColorMatrix, scalar};

/// Per output channel: the three splatted weights, then the splatted offset.
type Coeffs = [[__m128; 4]; 3];

// ===========================================================================
// x86-64-v2: rite lane helpers
// ===========================================================================

#[rite]
fn splat_v2(_token: X64V2Token, m: &ColorMatrix) -> Coeffs {
    let mut out = [[_mm_setzero_ps(); 4]; 3];
    for ((dst, row), k) in out.iter_mut().zip(&m.rows).zip(m.offset) {
        *dst = [
            _mm_set1_ps(row[0]),
            _mm_set1_ps(row[1]),
            _mm_set1_ps(row[2]),
            _mm_set1_ps(k),
        ];
    }
    out
}

/// One output channel for four pixels, clamped to [0, 255] and truncated.
#[rite]
fn channel_v2(_token: X64V2Token, r: __m128, g: __m128, b: __m128, c: &[__m128; 4]) -> __m128i {
    let rg = _mm_add_ps(_mm_mul_ps(r, c[0]), _mm_mul_ps(g, c[1]));
    let sum = _mm_add_ps(_mm_add_ps(rg, _mm_mul_ps(b, c[2])), c[3]);
    // maxps returns the second operand for NaN, matching f32::max.
    let clamped = _mm_min_ps(_mm_max_ps(sum, _mm_setzero_ps()), _mm_set1_ps(255.0));
    _mm_cvttps_epi32(clamped)
}

#[rite]
fn color_matrix_px4_v2(token: X64V2Token, px: __m128i, coeffs: &Coeffs) -> __m128i {
    let lo = _mm_set1_epi32(0xFF);
    let r = _mm_cvtepi32_ps(_mm_and_si128(px, lo));
    let g = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32::<8>(px), lo));
    let b = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32::<16>(px), lo));

    let nr = channel_v2(token, r, g, b, &coeffs[0]);
    let ng = channel_v2(token, r, g, b, &coeffs[1]);
    let nb = channel_v2(token, r, g, b, &coeffs[2]);
    let alpha = _mm_and_si128(px, _mm_set1_epi32(0xFF00_0000_u32 as i32));

    _mm_or_si128(
        _mm_or_si128(nr, _mm_slli_epi32::<8>(ng)),
        _mm_or_si128(_mm_slli_epi32::<16>(nb), alpha),
    )
}

// ===========================================================================
// x86-64-v2: arcane entry point
// ===========================================================================

/// Four little-endian pixel words per step; the remainder runs scalar.
#[arcane]
pub(super) fn color_matrix_v2(token: X64V2Token, words: &mut [u32], m: &ColorMatrix) {
    let coeffs = splat_v2(token, m);
    let (chunks, tail) = words.as_chunks_mut::<4>();
    for chunk in chunks {
        let bytes: &mut [u8; 16] = bytemuck::cast_mut(chunk);
        let px = _mm_loadu_si128(&*bytes);
        _mm_storeu_si128(bytes, color_matrix_px4_v2(token, px, &coeffs));
    }
    scalar::color_matrix_le(tail, m);
}
