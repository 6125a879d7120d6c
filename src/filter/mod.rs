// ---------------------------------------------------------------------------
// Colour filters with SIMD dispatch.
//
// Every filter is a 3x3 colour matrix plus a per-channel offset. Three
// interchangeable execution paths evaluate it: an accelerated 128-bit kernel
// (x86-64-v2, NEON, or WASM SIMD128) and two scalar kernels that differ only
// in which byte of the 32-bit pixel word holds which channel. All three
// compute `(r*m0 + g*m1) + b*m2 + k` in f32, clamp to [0, 255] and truncate,
// so they agree bit for bit.
// ---------------------------------------------------------------------------

use std::sync::OnceLock;

use bytemuck::{Pod, Zeroable};
use tracing::{debug, trace, warn};

use crate::caps::{Capabilities, SimdTier, capabilities};
use crate::PixelBuffer;

mod scalar;

#[cfg(target_arch = "x86_64")]
mod x86;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "wasm32")]
mod wasm;


// ===========================================================================
// Filters and their colour matrices
// ===========================================================================

/// The five colour filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filter {
    Brightness,
    Contrast,
    Grayscale,
    Saturate,
    Sepia,
}

/// A 3x3 channel-mixing matrix plus an additive offset per output channel.
///
/// Output channel `i` is `rows[i][0]*r + rows[i][1]*g + rows[i][2]*b + offset[i]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    pub rows: [[f32; 3]; 3],
    pub offset: [f32; 3],
}

const GRAYSCALE_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];
const GRAYSCALE_COMPLEMENT: [f32; 3] = [0.7874, 0.2848, 0.9278];

const SATURATE_LUMA: [f32; 3] = [0.213, 0.715, 0.072];
const SATURATE_COMPLEMENT: [f32; 3] = [0.787, 0.285, 0.928];

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];
const SEPIA_COMPLEMENT: [f32; 3] = [0.607, 0.314, 0.869];

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix::diagonal(1.0, 0.0);

    /// Scale every channel by `scale` and add `offset`.
    pub const fn diagonal(scale: f32, offset: f32) -> Self {
        Self {
            rows: [[scale, 0.0, 0.0], [0.0, scale, 0.0], [0.0, 0.0, scale]],
            offset: [offset; 3],
        }
    }

    /// Blend `base` toward the identity by `t`.
    ///
    /// Diagonal entries are `base + complement * t`, where `complement` is the
    /// published `1 - base` value; off-diagonal entries are `base - base * t`.
    fn toward_identity(base: [[f32; 3]; 3], complement: [f32; 3], t: f32) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                let c = base[i][j];
                *v = if i == j { c + complement[i] * t } else { c - c * t };
            }
        }
        Self {
            rows,
            offset: [0.0; 3],
        }
    }

    /// Apply to one pixel's channels.
    #[inline(always)]
    pub fn transform(&self, r: u32, g: u32, b: u32) -> [u32; 3] {
        let (rr, gg, bb) = (r as f32, g as f32, b as f32);
        let mut out = [0u32; 3];
        for ((o, row), k) in out.iter_mut().zip(&self.rows).zip(self.offset) {
            let v = rr * row[0] + gg * row[1] + bb * row[2] + k;
            *o = v.max(0.0).min(255.0) as u32;
        }
        out
    }
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::Brightness,
        Filter::Contrast,
        Filter::Grayscale,
        Filter::Saturate,
        Filter::Sepia,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Filter::Brightness => "brightness",
            Filter::Contrast => "contrast",
            Filter::Grayscale => "grayscale",
            Filter::Saturate => "saturate",
            Filter::Sepia => "sepia",
        }
    }

    /// Buffers larger than this many bytes take the accelerated path when it is
    /// available. Below it the per-call scratch copy costs more than it saves.
    pub fn accelerated_threshold(self) -> usize {
        match self {
            Filter::Brightness => 128 * 1024,
            _ => 64 * 1024,
        }
    }

    /// The colour matrix this filter applies for `amount`.
    ///
    /// Grayscale and sepia reach their full effect at `amount = 1` and clamp
    /// the blend factor to `[0, 1]`. Saturate is the identity at `amount = 1`
    /// and keeps amplifying above it; only negative amounts are clamped.
    pub fn matrix(self, amount: f32) -> ColorMatrix {
        match self {
            Filter::Brightness => ColorMatrix::diagonal(amount, 0.0),
            Filter::Contrast => ColorMatrix::diagonal(amount, 255.0 * (0.5 - 0.5 * amount)),
            Filter::Grayscale => {
                let t = (1.0 - amount).clamp(0.0, 1.0);
                ColorMatrix::toward_identity([GRAYSCALE_LUMA; 3], GRAYSCALE_COMPLEMENT, t)
            }
            Filter::Saturate => {
                let t = amount.max(0.0);
                ColorMatrix::toward_identity([SATURATE_LUMA; 3], SATURATE_COMPLEMENT, t)
            }
            Filter::Sepia => {
                let t = (1.0 - amount).clamp(0.0, 1.0);
                ColorMatrix::toward_identity(SEPIA, SEPIA_COMPLEMENT, t)
            }
        }
    }

    /// Apply in place on the path [`select_path`] picks for this host.
    pub fn apply(self, buffer: &mut PixelBuffer, amount: f32) {
        let path = select_path(capabilities(), self, buffer.pixels().len());
        self.apply_on(path, buffer, amount);
    }

    /// Apply in place on an explicit execution path.
    ///
    /// Every path produces the same pixels on every host. Requesting
    /// [`ExecutionPath::Accelerated`] where no SIMD tier exists runs the host's
    /// scalar path instead.
    pub fn apply_on(self, path: ExecutionPath, buffer: &mut PixelBuffer, amount: f32) {
        trace!(
            filter = self.name(),
            ?path,
            width = buffer.width(),
            height = buffer.height(),
            amount,
            "apply filter"
        );
        let matrix = self.matrix(amount);
        match path {
            ExecutionPath::Accelerated => match accelerated_kernel(self) {
                Some(kernel) => kernel.run_on(buffer, &matrix),
                None => {
                    warn!(
                        filter = self.name(),
                        "no SIMD tier available, running the scalar path"
                    );
                    let fallback = host_scalar_path(capabilities());
                    self.apply_on(fallback, buffer, amount);
                }
            },
            ExecutionPath::ScalarLe => scalar::color_matrix_le_bytes(buffer.pixels_mut(), &matrix),
            ExecutionPath::ScalarBe => scalar::color_matrix_be_bytes(buffer.pixels_mut(), &matrix),
        }
    }
}

// ===========================================================================
// Path selection
// ===========================================================================

/// The three interchangeable filter implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionPath {
    /// 128-bit SIMD kernel over a scratch copy of the pixels.
    Accelerated,
    /// Scalar kernel reading pixels as little-endian words (R in the low byte).
    ScalarLe,
    /// Scalar kernel reading pixels as big-endian words (R in the high byte).
    ScalarBe,
}

/// Choose the execution path for `filter` over a buffer of `byte_len` bytes.
///
/// Pure function of its inputs, so the policy can be tested with synthetic
/// capabilities.
pub fn select_path(caps: Capabilities, filter: Filter, byte_len: usize) -> ExecutionPath {
    if caps.acceleration128 && byte_len > filter.accelerated_threshold() {
        ExecutionPath::Accelerated
    } else {
        host_scalar_path(caps)
    }
}

#[inline]
fn host_scalar_path(caps: Capabilities) -> ExecutionPath {
    if caps.host_little_endian {
        ExecutionPath::ScalarLe
    } else {
        ExecutionPath::ScalarBe
    }
}

// ===========================================================================
// Accelerated kernels
// ===========================================================================

/// Header at the front of the kernel scratch memory.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct ScratchHeader {
    width: u32,
    height: u32,
    pixels: u32,
    reserved: u32,
}

const HEADER_WORDS: usize = size_of::<ScratchHeader>() / size_of::<u32>();

/// A filter's resolved accelerated kernel: the filter plus a proof token for
/// the SIMD tier it runs on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AcceleratedKernel {
    filter: Filter,
    tier: SimdTier,
}

static KERNELS: [OnceLock<Option<AcceleratedKernel>>; Filter::ALL.len()] =
    [const { OnceLock::new() }; Filter::ALL.len()];

/// The cached accelerated kernel for `filter`, resolved on first use.
pub(crate) fn accelerated_kernel(filter: Filter) -> Option<AcceleratedKernel> {
    *KERNELS[filter as usize].get_or_init(|| {
        let kernel = AcceleratedKernel::resolve(filter);
        match kernel {
            Some(k) => debug!(
                filter = filter.name(),
                tier = k.tier.name(),
                "resolved accelerated kernel"
            ),
            None => debug!(filter = filter.name(), "no accelerated kernel for this host"),
        }
        kernel
    })
}

impl AcceleratedKernel {
    /// Summon a tier for `filter` without touching the cache.
    pub(crate) fn resolve(filter: Filter) -> Option<Self> {
        SimdTier::detect().map(|tier| Self { filter, tier })
    }

    /// Run over a buffer: copy into fresh scratch memory as little-endian
    /// words, run the kernel, copy back. The scratch is not retained.
    pub(crate) fn run_on(self, buffer: &mut PixelBuffer, matrix: &ColorMatrix) {
        let header = ScratchHeader {
            width: u32::try_from(buffer.width()).unwrap_or(u32::MAX),
            height: u32::try_from(buffer.height()).unwrap_or(u32::MAX),
            pixels: u32::try_from(buffer.texels().len()).unwrap_or(u32::MAX),
            reserved: 0,
        };
        let (texels, _) = buffer.pixels_mut().as_chunks_mut::<4>();

        let mut scratch = Vec::with_capacity(HEADER_WORDS + texels.len());
        scratch.extend_from_slice(&bytemuck::cast::<ScratchHeader, [u32; HEADER_WORDS]>(header));
        scratch.extend(texels.iter().map(|px| u32::from_le_bytes(*px)));

        let (head, words) = scratch.split_at_mut(HEADER_WORDS);
        let head: &ScratchHeader = bytemuck::from_bytes(bytemuck::cast_slice(head));
        trace!(
            filter = self.filter.name(),
            tier = self.tier.name(),
            width = head.width,
            height = head.height,
            pixels = head.pixels,
            "run accelerated kernel"
        );
        self.run(words, matrix);

        for (px, w) in texels.iter_mut().zip(words.iter()) {
            *px = w.to_le_bytes();
        }
    }

    /// Run over little-endian pixel words in place.
    pub(crate) fn run(self, words: &mut [u32], matrix: &ColorMatrix) {
        match self.tier {
            #[cfg(target_arch = "x86_64")]
            SimdTier::X64V2(token) => x86::color_matrix_v2(token, words, matrix),
            #[cfg(target_arch = "aarch64")]
            SimdTier::Neon(token) => neon::color_matrix_neon(token, words, matrix),
            #[cfg(target_arch = "wasm32")]
            SimdTier::Wasm128(token) => wasm::color_matrix_wasm128(token, words, matrix),
        }
    }
}

// ===========================================================================
// Public API
// ===========================================================================

/// Scale R, G and B by `amount`. `1.0` is the identity.
pub fn brightness(buffer: &mut PixelBuffer, amount: f32) {
    Filter::Brightness.apply(buffer, amount);
}

/// Scale R, G and B by `amount` around mid-gray. `1.0` is the identity.
pub fn contrast(buffer: &mut PixelBuffer, amount: f32) {
    Filter::Contrast.apply(buffer, amount);
}

/// Blend toward Rec. 709 luma (0.2126/0.7152/0.0722). `1.0` is fully gray.
pub fn grayscale(buffer: &mut PixelBuffer, amount: f32) {
    Filter::Grayscale.apply(buffer, amount);
}

/// Scale saturation. `0.0` is fully gray, `1.0` the identity, above `1.0` oversaturates.
pub fn saturate(buffer: &mut PixelBuffer, amount: f32) {
    Filter::Saturate.apply(buffer, amount);
}

/// Blend toward the classic sepia tone matrix. `1.0` is full sepia.
pub fn sepia(buffer: &mut PixelBuffer, amount: f32) {
    Filter::Sepia.apply(buffer, amount);
}
