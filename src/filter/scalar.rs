use super::ColorMatrix;

// ===========================================================================
// Scalar word kernels
// ===========================================================================

/// R in bits 0..8, G 8..16, B 16..24, A 24..32.
#[inline(always)]
pub(super) fn color_matrix_word_le(c: u32, m: &ColorMatrix) -> u32 {
    let [r, g, b] = m.transform(c & 0xFF, (c >> 8) & 0xFF, (c >> 16) & 0xFF);
    r | (g << 8) | (b << 16) | (c & 0xFF00_0000)
}

/// R in bits 24..32, G 16..24, B 8..16, A 0..8.
#[inline(always)]
pub(super) fn color_matrix_word_be(c: u32, m: &ColorMatrix) -> u32 {
    let [r, g, b] = m.transform(c >> 24, (c >> 16) & 0xFF, (c >> 8) & 0xFF);
    (c & 0xFF) | (b << 8) | (g << 16) | (r << 24)
}

#[cfg_attr(not(test), allow(dead_code))]
pub(super) fn color_matrix_le(words: &mut [u32], m: &ColorMatrix) {
    for w in words {
        *w = color_matrix_word_le(*w, m);
    }
}

#[cfg_attr(not(test), allow(dead_code))]
pub(super) fn color_matrix_be(words: &mut [u32], m: &ColorMatrix) {
    for w in words {
        *w = color_matrix_word_be(*w, m);
    }
}

// ===========================================================================
// Scalar byte wrappers (dispatch targets for Filter::apply_on)
// ===========================================================================

pub(super) fn color_matrix_le_bytes(pixels: &mut [u8], m: &ColorMatrix) {
    let (texels, _) = pixels.as_chunks_mut::<4>();
    for px in texels {
        *px = color_matrix_word_le(u32::from_le_bytes(*px), m).to_le_bytes();
    }
}

pub(super) fn color_matrix_be_bytes(pixels: &mut [u8], m: &ColorMatrix) {
    let (texels, _) = pixels.as_chunks_mut::<4>();
    for px in texels {
        *px = color_matrix_word_be(u32::from_be_bytes(*px), m).to_be_bytes();
    }
}
