//! The RGBA8 pixel buffer every filter and transform operates on.

use std::any::Any;
use std::sync::Arc;

use bytemuck::Pod;

use crate::BufferError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A rectangular RGBA8 image stored row-major as a flat byte sequence.
///
/// `pixels.len() == 4 * width * height` always holds. Pixel `(x, y)` lives at
/// byte offset `4 * (y * width + x)` with channels in R, G, B, A order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

/// Byte sources accepted by [`PixelBuffer::create`].
#[derive(Clone)]
pub enum PixelSource<'a> {
    /// Owned bytes, adopted without copying.
    Bytes(Vec<u8>),
    /// A borrowed contiguous byte buffer. Typed slices enter through [`PixelSource::view`].
    Slice(&'a [u8]),
    /// A buffer shared with other owners.
    Shared(Arc<[u8]>),
    /// A dynamically typed value, accepted when it downcasts to a known buffer kind.
    Dynamic(&'a dyn Any),
}

impl<'a> PixelSource<'a> {
    /// View any plain-old-data slice as bytes in native memory order.
    pub fn view<T: Pod>(data: &'a [T]) -> Self {
        PixelSource::Slice(bytemuck::cast_slice(data))
    }

    fn into_bytes(self) -> Result<Vec<u8>, BufferError> {
        match self {
            PixelSource::Bytes(v) => Ok(v),
            PixelSource::Slice(s) => Ok(s.to_vec()),
            PixelSource::Shared(s) => Ok(s.to_vec()),
            PixelSource::Dynamic(any) => downcast_bytes(any),
        }
    }
}

impl From<Vec<u8>> for PixelSource<'_> {
    fn from(v: Vec<u8>) -> Self {
        PixelSource::Bytes(v)
    }
}

impl<'a> From<&'a [u8]> for PixelSource<'a> {
    fn from(s: &'a [u8]) -> Self {
        PixelSource::Slice(s)
    }
}

impl From<Arc<[u8]>> for PixelSource<'_> {
    fn from(s: Arc<[u8]>) -> Self {
        PixelSource::Shared(s)
    }
}

fn downcast_bytes(any: &dyn Any) -> Result<Vec<u8>, BufferError> {
    if let Some(v) = any.downcast_ref::<Vec<u8>>() {
        Ok(v.clone())
    } else if let Some(b) = any.downcast_ref::<Box<[u8]>>() {
        Ok(b.to_vec())
    } else if let Some(s) = any.downcast_ref::<Arc<[u8]>>() {
        Ok(s.to_vec())
    } else if let Some(w) = any.downcast_ref::<Vec<u32>>() {
        Ok(bytemuck::cast_slice(w).to_vec())
    } else if let Some(px) = any.downcast_ref::<Vec<[u8; 4]>>() {
        Ok(px.as_flattened().to_vec())
    } else {
        Err(BufferError::UnsupportedSourceType)
    }
}

#[inline]
fn byte_len(width: usize, height: usize) -> Result<usize, BufferError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(BufferError::TooLarge { width, height })
}

impl PixelBuffer {
    /// A zero-filled (transparent black) buffer.
    ///
    /// # Panics
    ///
    /// Panics if `4 * width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self {
        let len = byte_len(width, height).expect("pixel buffer dimensions overflow usize");
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// Build a buffer from an optional source.
    ///
    /// Without a source the buffer is zero-filled. With one, the source is
    /// coerced to bytes and must be exactly `4 * width * height` long.
    pub fn create(
        width: usize,
        height: usize,
        source: Option<PixelSource<'_>>,
    ) -> Result<Self, BufferError> {
        let expected = byte_len(width, height)?;
        let pixels = match source {
            None => vec![0; expected],
            Some(source) => source.into_bytes()?,
        };
        if pixels.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Adopt an owned byte vector.
    pub fn from_vec(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, BufferError> {
        Self::create(width, height, Some(PixelSource::Bytes(pixels)))
    }

    /// Copy a borrowed byte slice.
    pub fn from_slice(width: usize, height: usize, pixels: &[u8]) -> Result<Self, BufferError> {
        Self::create(width, height, Some(PixelSource::Slice(pixels)))
    }

    /// Assemble from whole pixels. The caller guarantees `texels.len() == width * height`.
    pub(crate) fn from_texels(width: usize, height: usize, texels: Vec<[u8; 4]>) -> Self {
        debug_assert_eq!(texels.len(), width * height);
        Self {
            width,
            height,
            pixels: texels.into_flattened(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixels as 4-byte groups.
    #[inline]
    pub(crate) fn texels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texels()[y * self.width + x])
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let at = (y * self.width + x) * BYTES_PER_PIXEL;
        self.pixels[at..at + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        true
    }
}
