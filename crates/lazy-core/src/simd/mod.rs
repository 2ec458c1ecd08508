//! Build-time SIMD dispatch
//!
//! The widest instruction-set tier enabled for the build is resolved once, into
//! [`SimdTier::ACTIVE`] and into the [`SimdElement::Vector`] register type of every
//! element type. Nothing here queries the CPU on a hot path.
//!
//! | tier    | f64 lanes | f32 lanes | enabled by                                   |
//! |---------|-----------|-----------|----------------------------------------------|
//! | AVX-512 | 8         | 16        | `simd` + `avx512` features, `avx512f` target |
//! | AVX     | 4         | 8         | `simd` feature, `avx` target                 |
//! | SSE4.1  | 2         | 4         | `simd` feature, `sse4.1` target              |
//! | scalar  | 1         | 1         | always                                       |
//!
//! Integer element types always use the scalar register.

pub mod backends;
pub mod kernels;
pub mod traits;

pub use backends::ScalarVector;
pub use traits::{SimdFloat, SimdVector};

use num_traits::NumAssign;
use serde::{Deserialize, Serialize};

/// Instruction-set tiers, narrowest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SimdTier {
    Scalar,
    Sse41,
    Avx,
    Avx512,
}

#[cfg(all(
    feature = "simd",
    feature = "avx512",
    target_arch = "x86_64",
    target_feature = "avx512f"
))]
const ACTIVE_TIER: SimdTier = SimdTier::Avx512;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx",
    not(all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f"))
))]
const ACTIVE_TIER: SimdTier = SimdTier::Avx;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse4.1",
    not(target_feature = "avx"),
    not(all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f"))
))]
const ACTIVE_TIER: SimdTier = SimdTier::Sse41;

#[cfg(not(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    any(
        target_feature = "sse4.1",
        target_feature = "avx",
        all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f")
    )
)))]
const ACTIVE_TIER: SimdTier = SimdTier::Scalar;

impl SimdTier {
    /// The tier this build was compiled for
    pub const ACTIVE: SimdTier = ACTIVE_TIER;

    pub const fn name(self) -> &'static str {
        match self {
            SimdTier::Scalar => "scalar",
            SimdTier::Sse41 => "sse4.1",
            SimdTier::Avx => "avx",
            SimdTier::Avx512 => "avx512",
        }
    }

    /// Register width in bytes (8 for the scalar tier, the width of one f64)
    pub const fn register_bytes(self) -> usize {
        match self {
            SimdTier::Scalar => 8,
            SimdTier::Sse41 => 16,
            SimdTier::Avx => 32,
            SimdTier::Avx512 => 64,
        }
    }

    /// Check if the running CPU can execute this tier
    pub fn is_available(self) -> bool {
        match self {
            SimdTier::Scalar => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdTier::Sse41 => is_x86_feature_detected!("sse4.1"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdTier::Avx => is_x86_feature_detected!("avx"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            SimdTier::Avx512 => is_x86_feature_detected!("avx512f"),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            _ => false,
        }
    }
}

/// Snapshot of the build-time SIMD configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimdConfig {
    pub tier: SimdTier,
    pub f64_lanes: usize,
    pub f32_lanes: usize,
}

impl SimdConfig {
    pub fn current() -> Self {
        let config = Self {
            tier: SimdTier::ACTIVE,
            f64_lanes: lanes::<f64>(),
            f32_lanes: lanes::<f32>(),
        };
        log::debug!(
            "SIMD tier {} ({} f64 lanes, {} f32 lanes)",
            config.tier.name(),
            config.f64_lanes,
            config.f32_lanes
        );
        config
    }
}

/// Get the name of the tier selected for this build
pub fn best_tier_name() -> &'static str {
    SimdTier::ACTIVE.name()
}

/// Element types with a register type for the active tier
pub trait SimdElement: Copy + NumAssign + PartialOrd + Send + Sync + 'static {
    type Vector: SimdVector<Scalar = Self>;
}

/// Number of lanes the active tier gives `T`
pub const fn lanes<T: SimdElement>() -> usize {
    <T::Vector as SimdVector>::LANES
}

macro_rules! select_register {
    ($elem:ty => $avx512:ident, $avx:ident, $sse:ident) => {
        #[cfg(all(
            feature = "simd",
            feature = "avx512",
            target_arch = "x86_64",
            target_feature = "avx512f"
        ))]
        impl SimdElement for $elem {
            type Vector = backends::$avx512;
        }

        #[cfg(all(
            feature = "simd",
            any(target_arch = "x86", target_arch = "x86_64"),
            target_feature = "avx",
            not(all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f"))
        ))]
        impl SimdElement for $elem {
            type Vector = backends::$avx;
        }

        #[cfg(all(
            feature = "simd",
            any(target_arch = "x86", target_arch = "x86_64"),
            target_feature = "sse4.1",
            not(target_feature = "avx"),
            not(all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f"))
        ))]
        impl SimdElement for $elem {
            type Vector = backends::$sse;
        }

        #[cfg(not(all(
            feature = "simd",
            any(target_arch = "x86", target_arch = "x86_64"),
            any(
                target_feature = "sse4.1",
                target_feature = "avx",
                all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f")
            )
        )))]
        impl SimdElement for $elem {
            type Vector = ScalarVector<$elem>;
        }
    };
}

select_register!(f64 => Avx512F64, AvxF64, SseF64);
select_register!(f32 => Avx512F32, AvxF32, SseF32);

macro_rules! scalar_register {
    ($($t:ty),*) => {$(
        impl SimdElement for $t {
            type Vector = ScalarVector<$t>;
        }
    )*};
}

scalar_register!(i32, i64, u32, u64);

/// Aligned wrapper for buffers handed to [`SimdVector::load_aligned`]
#[derive(Clone, Copy, Debug, Default)]
#[repr(C, align(64))]
pub struct Aligned64<T>(pub T);

/// Whether `ptr` satisfies the alignment of `T`'s active register
pub fn is_register_aligned<T: SimdElement>(ptr: *const T) -> bool {
    (ptr as usize) % <T::Vector as SimdVector>::ALIGNMENT == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_tier_is_consistent_with_lanes() {
        let config = SimdConfig::current();
        assert_eq!(config.tier, SimdTier::ACTIVE);
        assert_eq!(
            config.f64_lanes * 8,
            SimdTier::ACTIVE.register_bytes(),
            "f64 lanes must fill the register"
        );
        assert_eq!(config.f32_lanes, if config.tier == SimdTier::Scalar { 1 } else { config.f64_lanes * 2 });
        assert_eq!(best_tier_name(), SimdTier::ACTIVE.name());
    }

    #[test]
    fn test_active_tier_matches_build_flags() {
        let x86 = cfg!(any(target_arch = "x86", target_arch = "x86_64"));
        let simd = cfg!(feature = "simd") && x86;
        let expected = if simd && cfg!(all(feature = "avx512", target_arch = "x86_64", target_feature = "avx512f")) {
            SimdTier::Avx512
        } else if simd && cfg!(target_feature = "avx") {
            SimdTier::Avx
        } else if simd && cfg!(target_feature = "sse4.1") {
            SimdTier::Sse41
        } else {
            SimdTier::Scalar
        };
        assert_eq!(SimdTier::ACTIVE, expected);
    }

    #[test]
    fn test_integers_stay_scalar() {
        assert_eq!(lanes::<i32>(), 1);
        assert_eq!(lanes::<u64>(), 1);
    }

    #[test]
    fn test_active_tier_runs_on_host() {
        // A binary built for a tier the CPU lacks would not get this far.
        assert!(SimdTier::ACTIVE.is_available());
        assert!(SimdTier::Scalar.is_available());
    }

    #[test]
    fn test_aligned_load() {
        let buffer = Aligned64([1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert!(is_register_aligned(buffer.0.as_ptr()));
        let register = unsafe { <<f64 as SimdElement>::Vector as SimdVector>::load_aligned(buffer.0.as_ptr()) };
        let mut out = [0.0f64; 8];
        register.store(&mut out);
        assert_eq!(&out[..lanes::<f64>()], &buffer.0[..lanes::<f64>()]);
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_string(&SimdConfig::current()).unwrap();
        let back: SimdConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SimdConfig::current());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SimdTier::Avx512 > SimdTier::Avx);
        assert!(SimdTier::Sse41 > SimdTier::Scalar);
    }
}
