// ---------------------------------------------------------------------------
// Geometric transforms: nearest-neighbour resize, affine warp and rotation.
//
// All of them move whole pixels. No output pixel is ever a blend of source
// pixels, and destination pixels that map outside the source stay
// transparent black.
// ---------------------------------------------------------------------------

use tracing::trace;

use crate::{AffineMatrix, MatrixError, PixelBuffer};

/// Resize to `new_width x new_height` by nearest-neighbour sampling.
///
/// Destination `(x, y)` copies source `(x * w / new_width, y * h / new_height)`
/// with integer division, so resizing to the current size is the identity.
pub fn resize_nearest(buffer: &PixelBuffer, new_width: usize, new_height: usize) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    trace!(width = w, height = h, new_width, new_height, "resize nearest");

    if w == 0 || h == 0 {
        return PixelBuffer::new(new_width, new_height);
    }

    let src = buffer.texels();
    let mut out = Vec::with_capacity(new_width * new_height);
    for y in 0..new_height {
        let row = &src[(y * h / new_height) * w..][..w];
        out.extend((0..new_width).map(|x| row[x * w / new_width]));
    }
    PixelBuffer::from_texels(new_width, new_height, out)
}

/// Apply `matrix` around the centre of the image.
///
/// With `resize_to_fit` the canvas grows or shrinks to the bounding box of
/// the transformed corners; otherwise it keeps the source dimensions. Fails
/// with [`MatrixError::Singular`] when the matrix has no inverse.
pub fn warp_affine(
    buffer: &PixelBuffer,
    matrix: AffineMatrix,
    resize_to_fit: bool,
) -> Result<PixelBuffer, MatrixError> {
    let (new_width, new_height) = canvas_size(buffer, &matrix, resize_to_fit);
    let inverse = recentre(buffer, matrix, new_width, new_height).invert()?;
    trace!(
        width = buffer.width(),
        height = buffer.height(),
        new_width,
        new_height,
        "warp affine"
    );
    Ok(resample(buffer, &inverse, new_width, new_height))
}

/// Rotate clockwise by `degrees`.
///
/// Angles are normalized into `[0, 360)`. A half turn always reverses the
/// pixel order; quarter turns with `resize_to_fit` are exact permutations.
/// Every other angle goes through the affine warp.
pub fn rotate(buffer: &PixelBuffer, degrees: f64, resize_to_fit: bool) -> PixelBuffer {
    let degrees = degrees.rem_euclid(360.0);
    trace!(
        width = buffer.width(),
        height = buffer.height(),
        degrees,
        resize_to_fit,
        "rotate"
    );

    if degrees == 180.0 {
        return rotate180(buffer);
    }
    if resize_to_fit && degrees == 90.0 {
        return rotate90(buffer);
    }
    if resize_to_fit && degrees == 270.0 {
        return rotate270(buffer);
    }

    let matrix = AffineMatrix::rotate(degrees);
    let (new_width, new_height) = canvas_size(buffer, &matrix, resize_to_fit);
    // A finite rotation always has determinant 1.
    let inverse = recentre(buffer, matrix, new_width, new_height).invert_unchecked();
    resample(buffer, &inverse, new_width, new_height)
}

/// Quarter turn clockwise. The output is `height x width`.
pub fn rotate90(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let src = buffer.texels();
    let mut out = vec![[0u8; 4]; src.len()];
    for (y, row) in src.chunks_exact(w.max(1)).enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out[(h - 1 - y) + x * h] = px;
        }
    }
    PixelBuffer::from_texels(h, w, out)
}

/// Half turn: the pixel sequence reversed.
pub fn rotate180(buffer: &PixelBuffer) -> PixelBuffer {
    let mut out = buffer.texels().to_vec();
    out.reverse();
    PixelBuffer::from_texels(buffer.width(), buffer.height(), out)
}

/// Three-quarter turn clockwise. The output is `height x width`.
pub fn rotate270(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width(), buffer.height());
    let src = buffer.texels();
    let mut out = vec![[0u8; 4]; src.len()];
    for (y, row) in src.chunks_exact(w.max(1)).enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out[y + h * (w - 1 - x)] = px;
        }
    }
    PixelBuffer::from_texels(h, w, out)
}

// ===========================================================================
// Warp internals
// ===========================================================================

fn centre(buffer: &PixelBuffer) -> (f64, f64) {
    (buffer.width() as f64 / 2.0, buffer.height() as f64 / 2.0)
}

/// Canvas dimensions: the source size, or the extent of the four mapped
/// corners `(0,0) (w,0) (0,h) (w,h)`.
fn canvas_size(buffer: &PixelBuffer, matrix: &AffineMatrix, resize_to_fit: bool) -> (usize, usize) {
    let (w, h) = (buffer.width(), buffer.height());
    if !resize_to_fit {
        return (w, h);
    }
    let (xc, yc) = centre(buffer);
    let (wf, hf) = (w as f64, h as f64);
    let corners = [(0.0, 0.0), (wf, 0.0), (0.0, hf), (wf, hf)]
        .map(|(x, y)| matrix.map_centred(x, y, xc, yc));

    let extent = |coord: fn(&(i64, i64)) -> i64| {
        let max = corners.iter().map(coord).max().unwrap_or(0);
        let min = corners.iter().map(coord).min().unwrap_or(0);
        usize::try_from(max - min).unwrap_or(0)
    };
    (extent(|p| p.0), extent(|p| p.1))
}

/// Shift the translation so the source centre lands on the canvas centre.
fn recentre(
    buffer: &PixelBuffer,
    matrix: AffineMatrix,
    new_width: usize,
    new_height: usize,
) -> AffineMatrix {
    AffineMatrix {
        tx: matrix.tx + (new_width as f64 - buffer.width() as f64) / 2.0,
        ty: matrix.ty + (new_height as f64 - buffer.height() as f64) / 2.0,
        ..matrix
    }
}

/// Fill a `new_width x new_height` canvas by pulling each pixel through
/// `inverse` around the source centre.
fn resample(
    buffer: &PixelBuffer,
    inverse: &AffineMatrix,
    new_width: usize,
    new_height: usize,
) -> PixelBuffer {
    let (w, h) = (buffer.width() as i64, buffer.height() as i64);
    let (xc, yc) = centre(buffer);
    let src = buffer.texels();

    let mut out = vec![[0u8; 4]; new_width * new_height];
    for (y, row) in out.chunks_exact_mut(new_width.max(1)).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            let (xx, yy) = inverse.map_centred(x as f64, y as f64, xc, yc);
            if (0..w).contains(&xx) && (0..h).contains(&yy) {
                *px = src[(xx + w * yy) as usize];
            }
        }
    }
    PixelBuffer::from_texels(new_width, new_height, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> PixelBuffer {
        let texels = (0..width * height)
            .map(|i| [i as u8, (i >> 8) as u8, 7, 255])
            .collect();
        PixelBuffer::from_texels(width, height, texels)
    }

    fn two_by_two() -> PixelBuffer {
        PixelBuffer::from_vec(
            2,
            2,
            vec![
                10, 20, 30, 255, 40, 50, 60, 255, 70, 80, 90, 255, 100, 110, 120, 255,
            ],
        )
        .unwrap()
    }

    #[test]
    fn resize_to_same_size_is_identity() {
        let fb = numbered(7, 5);
        assert_eq!(resize_nearest(&fb, 7, 5), fb);
    }

    #[test]
    fn resize_doubles_and_halves() {
        let fb = two_by_two();
        let up = resize_nearest(&fb, 4, 4);
        assert_eq!((up.width(), up.height()), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(up.pixel(x, y), fb.pixel(x / 2, y / 2));
            }
        }
        assert_eq!(resize_nearest(&up, 2, 2), fb);
    }

    #[test]
    fn resize_to_zero_or_from_empty() {
        let fb = numbered(3, 3);
        assert!(resize_nearest(&fb, 0, 5).pixels().is_empty());
        assert!(resize_nearest(&fb, 5, 0).pixels().is_empty());

        let empty = PixelBuffer::new(0, 0);
        let grown = resize_nearest(&empty, 2, 2);
        assert_eq!(grown, PixelBuffer::new(2, 2));
    }

    #[test]
    fn rotate90_moves_bottom_left_to_top_left() {
        let fb = two_by_two();
        let r = rotate(&fb, 90.0, true);
        assert_eq!(r.pixel(0, 0), fb.pixel(0, 1));
        assert_eq!(r.pixel(1, 0), fb.pixel(0, 0));
        assert_eq!(r.pixel(1, 1), fb.pixel(1, 0));
        assert_eq!(r.pixel(0, 1), fb.pixel(1, 1));
    }

    #[test]
    fn quarter_turns_swap_dimensions_and_round_trip() {
        let fb = numbered(5, 3);
        let r90 = rotate(&fb, 90.0, true);
        assert_eq!((r90.width(), r90.height()), (3, 5));
        assert_eq!(rotate(&r90, 270.0, true), fb);

        let r270 = rotate270(&fb);
        assert_eq!((r270.width(), r270.height()), (3, 5));
        assert_eq!(rotate90(&r270), fb);
        assert_eq!(rotate90(&rotate90(&fb)), rotate180(&fb));
    }

    #[test]
    fn half_turn_reverses_pixels() {
        let fb = numbered(4, 3);
        for resize in [false, true] {
            let r = rotate(&fb, 180.0, resize);
            let mut expected = fb.texels().to_vec();
            expected.reverse();
            assert_eq!(r.texels(), &expected[..]);
        }
    }

    #[test]
    fn rotate_normalizes_angles() {
        let fb = numbered(4, 3);
        assert_eq!(rotate(&fb, -90.0, true), rotate270(&fb));
        assert_eq!(rotate(&fb, 450.0, true), rotate90(&fb));
        assert_eq!(rotate(&fb, -180.0, false), rotate180(&fb));
        assert_eq!(rotate(&fb, 360.0, false), fb);
    }

    #[test]
    fn quarter_turn_without_resize_keeps_canvas() {
        let fb = numbered(6, 4);
        let r = rotate(&fb, 90.0, false);
        assert_eq!((r.width(), r.height()), (6, 4));
    }

    #[test]
    fn identity_warp_is_identity() {
        let fb = numbered(9, 4);
        assert_eq!(warp_affine(&fb, AffineMatrix::IDENTITY, false).unwrap(), fb);
        assert_eq!(warp_affine(&fb, AffineMatrix::IDENTITY, true).unwrap(), fb);
    }

    #[test]
    fn translation_shifts_and_exposes_transparent_black() {
        let fb = numbered(4, 4);
        let out = warp_affine(&fb, AffineMatrix::translate(1.0, 0.0), false).unwrap();
        for y in 0..4 {
            assert_eq!(out.pixel(0, y), Some([0, 0, 0, 0]));
            for x in 1..4 {
                assert_eq!(out.pixel(x, y), fb.pixel(x - 1, y));
            }
        }
    }

    #[test]
    fn resize_to_fit_uses_corner_bounding_box() {
        let fb = numbered(4, 2);
        let out = warp_affine(&fb, AffineMatrix::uniform_scale(2.0), true).unwrap();
        assert_eq!((out.width(), out.height()), (8, 4));
        assert_eq!(out.pixel(0, 0), fb.pixel(0, 0));
        assert_eq!(out.pixel(7, 3), fb.pixel(3, 1));
    }

    #[test]
    fn singular_warp_fails_fast() {
        let fb = numbered(3, 3);
        let err = warp_affine(&fb, AffineMatrix::scale(0.0, 0.0), false).unwrap_err();
        assert_eq!(err, MatrixError::Singular { determinant: 0.0 });
    }

    #[test]
    fn arbitrary_angle_only_copies_source_pixels() {
        let fb = numbered(8, 6);
        let out = rotate(&fb, 30.0, true);
        assert_eq!((out.width(), out.height()), (8, 8));
        let src = fb.texels();
        assert!(
            out.texels()
                .iter()
                .all(|px| *px == [0, 0, 0, 0] || src.contains(px))
        );
    }
}
