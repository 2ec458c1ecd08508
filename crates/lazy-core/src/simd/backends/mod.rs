//! Register implementations, one module per instruction-set tier
//!
//! Each module is compiled only when the build enables its instruction set, so
//! no code path ever issues an instruction the target was not compiled for.

pub mod scalar;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse4.1"
))]
pub mod sse;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx"
))]
pub mod avx;

#[cfg(all(
    feature = "simd",
    feature = "avx512",
    target_arch = "x86_64",
    target_feature = "avx512f"
))]
pub mod avx512;

pub use scalar::ScalarVector;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse4.1"
))]
pub use sse::{SseF32, SseF64};

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "avx"
))]
pub use avx::{AvxF32, AvxF64};

#[cfg(all(
    feature = "simd",
    feature = "avx512",
    target_arch = "x86_64",
    target_feature = "avx512f"
))]
pub use avx512::{Avx512F32, Avx512F64};
