// ---------------------------------------------------------------------------
// Host capability probe.
//
// Two facts gate filter dispatch: the byte order of the running machine and
// whether a 128-bit SIMD tier can be summoned. Both are probed once.
// ---------------------------------------------------------------------------

use std::fmt;
use std::sync::LazyLock;

#[allow(unused_imports)]
use archmage::SimdToken;
use tracing::debug;

/// Process-wide capability flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// The least significant byte of a multi-byte word is stored first.
    pub host_little_endian: bool,
    /// A 128-bit SIMD tier is usable for the accelerated filter kernels.
    pub acceleration128: bool,
}

static CAPABILITIES: LazyLock<Capabilities> = LazyLock::new(|| {
    let caps = Capabilities::detect();
    debug!(
        host_little_endian = caps.host_little_endian,
        acceleration128 = caps.acceleration128,
        "probed host capabilities"
    );
    caps
});

/// The cached capabilities of this process.
#[inline]
pub fn capabilities() -> Capabilities {
    *CAPABILITIES
}

impl Capabilities {
    /// Probe the host without consulting the process cache.
    pub fn detect() -> Self {
        Self {
            host_little_endian: probe_little_endian(),
            acceleration128: SimdTier::detect().is_some(),
        }
    }
}

fn probe_little_endian() -> bool {
    0x1122u16.to_ne_bytes()[0] == 0x22
}

// ===========================================================================
// SIMD tiers
// ===========================================================================

/// A summoned 128-bit SIMD token. Holding one proves the features are present.
#[derive(Clone, Copy)]
pub(crate) enum SimdTier {
    #[cfg(target_arch = "x86_64")]
    X64V2(archmage::X64V2Token),
    #[cfg(target_arch = "aarch64")]
    Neon(archmage::NeonToken),
    #[cfg(target_arch = "wasm32")]
    Wasm128(archmage::Wasm128Token),
}

impl SimdTier {
    /// Summon the best 128-bit tier for this target, if any.
    pub(crate) fn detect() -> Option<Self> {
        #[cfg(target_arch = "x86_64")]
        if let Some(token) = archmage::X64V2Token::summon() {
            return Some(SimdTier::X64V2(token));
        }
        #[cfg(target_arch = "aarch64")]
        if let Some(token) = archmage::NeonToken::summon() {
            return Some(SimdTier::Neon(token));
        }
        #[cfg(target_arch = "wasm32")]
        if let Some(token) = archmage::Wasm128Token::summon() {
            return Some(SimdTier::Wasm128(token));
        }
        None
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            #[cfg(target_arch = "x86_64")]
            SimdTier::X64V2(_) => "x86-64-v2",
            #[cfg(target_arch = "aarch64")]
            SimdTier::Neon(_) => "neon",
            #[cfg(target_arch = "wasm32")]
            SimdTier::Wasm128(_) => "wasm-simd128",
        }
    }
}

impl fmt::Debug for SimdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_matches_target() {
        assert_eq!(
            capabilities().host_little_endian,
            cfg!(target_endian = "little")
        );
    }

    #[test]
    fn fresh_probe_agrees_on_byte_order() {
        assert_eq!(
            Capabilities::detect().host_little_endian,
            capabilities().host_little_endian
        );
    }

    #[test]
    fn tier_names_are_stable() {
        if let Some(tier) = SimdTier::detect() {
            assert_eq!(format!("{tier:?}"), tier.name());
        }
    }
}
