//! AVX-512 registers (512-bit)
//!
//! Opt-in through the `avx512` cargo feature. Rounding goes through `roundscale`
//! with a zero scale, which is the AVX-512 form of `_mm256_ceil_*`.

use std::arch::x86_64::*;

use crate::simd::traits::{SimdFloat, SimdVector};

const CEIL: i32 = _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC;
const FLOOR: i32 = _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC;

/// Eight f64 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Avx512F64(__m512d);

/// Sixteen f32 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Avx512F32(__m512);

impl SimdVector for Avx512F64 {
    type Scalar = f64;
    const LANES: usize = 8;
    const ALIGNMENT: usize = 64;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        unsafe { Avx512F64(_mm512_set1_pd(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f64]) -> Self {
        assert!(slice.len() >= Self::LANES, "AVX-512 load needs {} values", Self::LANES);
        unsafe { Avx512F64(_mm512_loadu_pd(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        Avx512F64(_mm512_load_pd(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f64]) {
        assert!(slice.len() >= Self::LANES, "AVX-512 store needs {} slots", Self::LANES);
        unsafe { _mm512_storeu_pd(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx512F64(_mm512_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Avx512F64(_mm512_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Avx512F64(_mm512_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f64 {
        unsafe { _mm512_reduce_add_pd(self.0) }
    }
}

impl SimdFloat for Avx512F64 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { Avx512F64(_mm512_roundscale_pd::<CEIL>(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Avx512F64(_mm512_roundscale_pd::<FLOOR>(self.0)) }
    }
}

impl SimdVector for Avx512F32 {
    type Scalar = f32;
    const LANES: usize = 16;
    const ALIGNMENT: usize = 64;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { Avx512F32(_mm512_set1_ps(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "AVX-512 load needs {} values", Self::LANES);
        unsafe { Avx512F32(_mm512_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        Avx512F32(_mm512_load_ps(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "AVX-512 store needs {} slots", Self::LANES);
        unsafe { _mm512_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Avx512F32(_mm512_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Avx512F32(_mm512_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Avx512F32(_mm512_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe { _mm512_reduce_add_ps(self.0) }
    }
}

impl SimdFloat for Avx512F32 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { Avx512F32(_mm512_roundscale_ps::<CEIL>(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { Avx512F32(_mm512_roundscale_ps::<FLOOR>(self.0)) }
    }
}
