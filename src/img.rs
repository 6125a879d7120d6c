//! Whole-image conversions between [`PixelBuffer`] and [`imgref`] types.
//!
//! Strided images are packed row by row on the way in.
//!
//! ```rust
//! use rgb::Rgba;
//! use imgref::ImgVec;
//! use pixops::{PixelBuffer, rotate90};
//!
//! let img = ImgVec::new(vec![Rgba::new(255u8, 0, 128, 255); 6], 3, 2);
//! let fb = PixelBuffer::from_img(img.as_ref());
//! let turned: ImgVec<Rgba<u8>> = rotate90(&fb).into_img();
//! assert_eq!((turned.width(), turned.height()), (2, 3));
//! ```

use imgref::{ImgRef, ImgVec};
use rgb::Rgba;

use crate::PixelBuffer;

impl PixelBuffer {
    /// Borrow as a contiguous `ImgRef`.
    pub fn as_img(&self) -> ImgRef<'_, Rgba<u8>> {
        ImgRef::new(self.as_rgba(), self.width(), self.height())
    }

    /// Copy an image, dropping any row padding.
    pub fn from_img(img: ImgRef<'_, Rgba<u8>>) -> Self {
        let (w, h) = (img.width(), img.height());
        let mut texels: Vec<[u8; 4]> = Vec::with_capacity(w * h);
        for row in img.rows() {
            texels.extend_from_slice(bytemuck::cast_slice(row));
        }
        Self::from_texels(w, h, texels)
    }

    pub fn into_img(self) -> ImgVec<Rgba<u8>> {
        let (w, h) = (self.width(), self.height());
        let texels: Vec<[u8; 4]> = bytemuck::cast_slice(self.pixels()).to_vec();
        ImgVec::new(bytemuck::allocation::cast_vec(texels), w, h)
    }
}

impl From<ImgRef<'_, Rgba<u8>>> for PixelBuffer {
    fn from(img: ImgRef<'_, Rgba<u8>>) -> Self {
        Self::from_img(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_rows_are_packed() {
        let px = |v: u8| Rgba::new(v, v, v, 255);
        // Width 2, stride 3: the third column is padding.
        let buf = vec![px(1), px(2), px(0), px(3), px(4), px(0)];
        let img = ImgVec::new_stride(buf, 2, 2, 3);
        let fb = PixelBuffer::from(img.as_ref());
        assert_eq!((fb.width(), fb.height()), (2, 2));
        assert_eq!(fb.as_rgba(), &[px(1), px(2), px(3), px(4)]);
    }

    #[test]
    fn as_img_and_into_img_agree() {
        let fb = PixelBuffer::from_vec(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let borrowed: Vec<_> = fb.as_img().pixels().collect();
        let owned = fb.clone().into_img();
        assert_eq!(owned.buf(), &borrowed);
        assert_eq!((owned.width(), owned.height()), (1, 2));
        assert_eq!(PixelBuffer::from_img(owned.as_ref()), fb);
    }
}
