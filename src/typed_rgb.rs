//! Typed pixel access using [`rgb`] crate types via bytemuck.
//!
//! A [`PixelBuffer`] is already laid out as `Rgba<u8>`, so views are
//! zero-copy reinterpretations of the same memory.
//!
//! ```rust
//! use rgb::Rgba;
//! use pixops::PixelBuffer;
//!
//! let mut fb = PixelBuffer::from_rgba(2, 1, vec![Rgba::new(255, 0, 128, 255); 2]).unwrap();
//! fb.as_rgba_mut()[1].g = 64;
//! assert_eq!(fb.pixels()[4..8], [255, 64, 128, 255]);
//! ```

use rgb::Rgba;

use crate::{BufferError, PixelBuffer, PixelSource};

impl PixelBuffer {
    /// Adopt a vector of typed pixels without copying.
    pub fn from_rgba(
        width: usize,
        height: usize,
        pixels: Vec<Rgba<u8>>,
    ) -> Result<Self, BufferError> {
        let texels: Vec<[u8; 4]> = bytemuck::allocation::cast_vec(pixels);
        Self::from_vec(width, height, texels.into_flattened())
    }

    /// The pixels as `Rgba<u8>`.
    #[inline]
    pub fn as_rgba(&self) -> &[Rgba<u8>] {
        bytemuck::cast_slice(self.pixels())
    }

    #[inline]
    pub fn as_rgba_mut(&mut self) -> &mut [Rgba<u8>] {
        bytemuck::cast_slice_mut(self.pixels_mut())
    }

    /// Copy the pixels out as `Rgba<u8>`.
    pub fn to_rgba_vec(&self) -> Vec<Rgba<u8>> {
        self.as_rgba().to_vec()
    }
}

impl<'a> From<&'a [Rgba<u8>]> for PixelSource<'a> {
    fn from(pixels: &'a [Rgba<u8>]) -> Self {
        PixelSource::view(pixels)
    }
}
