//! # pixops
//!
//! Deterministic RGBA8 pixel operations: colour filters with SIMD dispatch,
//! nearest-neighbour resize, affine warps and rotation.
//!
//! Everything works on a [`PixelBuffer`], a row-major RGBA8 image.
//!
//! ## Filters
//!
//! [`brightness`], [`contrast`], [`grayscale`], [`saturate`] and [`sepia`]
//! modify the buffer in place. Each one runs on one of three interchangeable
//! [`ExecutionPath`]s: a 128-bit SIMD kernel (x86-64-v2, ARM NEON or WASM
//! SIMD128) for large buffers, or a scalar kernel matching the host's byte
//! order. All paths produce identical pixels, and alpha is never touched.
//!
//! ```rust
//! use pixops::{PixelBuffer, grayscale};
//!
//! let mut fb = PixelBuffer::from_vec(1, 1, vec![200, 100, 50, 255]).unwrap();
//! grayscale(&mut fb, 1.0);
//! let [r, g, b, a] = fb.pixel(0, 0).unwrap();
//! assert!(r == g && g == b && a == 255);
//! ```
//!
//! ## Geometry
//!
//! [`resize_nearest`], [`warp_affine`] and [`rotate`] return a new buffer and
//! never blend pixels. Quarter and half turns are exact permutations.
//!
//! ## Feature flags
//!
//! - **`rgb`**: typed `Rgba<u8>` views of a buffer via the [`rgb`] crate.
//! - **`imgref`**: conversions to and from [`imgref`] images. Implies `rgb`.

#![forbid(unsafe_code)]

mod affine;
mod buffer;
mod caps;
mod error;
mod filter;
mod geometry;

pub use affine::AffineMatrix;
pub use buffer::{BYTES_PER_PIXEL, PixelBuffer, PixelSource};
pub use caps::{Capabilities, capabilities};
pub use error::{BufferError, MatrixError};
pub use filter::{
    ColorMatrix, ExecutionPath, Filter, brightness, contrast, grayscale, saturate, select_path,
    sepia,
};
pub use geometry::{resize_nearest, rotate, rotate90, rotate180, rotate270, warp_affine};

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod img;
