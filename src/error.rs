//! Error types for buffer construction and matrix math.

use thiserror::Error;

/// Errors raised while building a [`PixelBuffer`](crate::PixelBuffer).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The dynamic source value is not a byte-addressable buffer kind.
    #[error("unsupported pixel source type: expected bytes, a typed view, or a shared buffer")]
    UnsupportedSourceType,

    /// The source length does not equal `4 * width * height`.
    #[error("buffer length {actual} does not match dimensions (expected {expected} bytes)")]
    SizeMismatch { expected: usize, actual: usize },

    /// `4 * width * height` does not fit in `usize`.
    #[error("dimensions {width}x{height} overflow the addressable size")]
    TooLarge { width: usize, height: usize },
}

/// Errors raised by affine matrix math.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MatrixError {
    /// The determinant `a*d - b*c` is zero or not finite.
    #[error("matrix is not invertible (determinant {determinant})")]
    Singular { determinant: f64 },
}
