use archmage::{Wasm128Token, arcane, rite};
use core::arch::wasm32::{
    f32x4_add, f32x4_convert_u32x4, f32x4_mul, f32x4_pmax, f32x4_pmin, f32x4_splat, u32x4_shl,
    u32x4_shr, u32x4_splat, u32x4_trunc_sat_f32x4, v128, v128_and, v128_or,
};
use safe_unaligned_simd::wasm32::{v128_load, v128_store};

use super::{ColorMatrix, scalar};

type Coeffs = [[v128; 4]; 3];

// ===========================================================================
// WASM SIMD128: rite lane helpers
// ===========================================================================

#[rite]
fn splat_wasm128(_token: Wasm128Token, m: &ColorMatrix) -> Coeffs {
    let mut out = [[f32x4_splat(0.0); 4]; 3];
    for ((dst, row), k) in out.iter_mut().zip(&m.rows).zip(m.offset) {
        *dst = [
            f32x4_splat(row[0]),
            f32x4_splat(row[1]),
            f32x4_splat(row[2]),
            f32x4_splat(k),
        ];
    }
    out
}

#[rite]
fn channel_wasm128(_token: Wasm128Token, r: v128, g: v128, b: v128, c: &[v128; 4]) -> v128 {
    let rg = f32x4_add(f32x4_mul(r, c[0]), f32x4_mul(g, c[1]));
    let sum = f32x4_add(f32x4_add(rg, f32x4_mul(b, c[2])), c[3]);
    // pmax(0, NaN) is 0, matching f32::max.
    let clamped = f32x4_pmin(f32x4_pmax(f32x4_splat(0.0), sum), f32x4_splat(255.0));
    u32x4_trunc_sat_f32x4(clamped)
}

#[rite]
fn color_matrix_px4_wasm128(token: Wasm128Token, px: v128, coeffs: &Coeffs) -> v128 {
    let lo = u32x4_splat(0xFF);
    let r = f32x4_convert_u32x4(v128_and(px, lo));
    let g = f32x4_convert_u32x4(v128_and(u32x4_shr(px, 8), lo));
    let b = f32x4_convert_u32x4(v128_and(u32x4_shr(px, 16), lo));

    let nr = channel_wasm128(token, r, g, b, &coeffs[0]);
    let ng = channel_wasm128(token, r, g, b, &coeffs[1]);
    let nb = channel_wasm128(token, r, g, b, &coeffs[2]);
    let alpha = v128_and(px, u32x4_splat(0xFF00_0000));

    v128_or(
        v128_or(nr, u32x4_shl(ng, 8)),
        v128_or(u32x4_shl(nb, 16), alpha),
    )
}

// ===========================================================================
// WASM SIMD128: arcane entry point
// ===========================================================================

#[arcane]
pub(super) fn color_matrix_wasm128(token: Wasm128Token, words: &mut [u32], m: &ColorMatrix) {
    let coeffs = splat_wasm128(token, m);
    let (chunks, tail) = words.as_chunks_mut::<4>();
    for chunk in chunks {
        let bytes: &mut [u8; 16] = bytemuck::cast_mut(chunk);
        let px = v128_load(&*bytes);
        v128_store(bytes, color_matrix_px4_wasm128(token, px, &coeffs));
    }
    scalar::color_matrix_le(tail, m);
}
