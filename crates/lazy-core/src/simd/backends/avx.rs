//! AVX registers (256-bit)

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::{SimdFloat, SimdVector};

/// Four f64 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct AvxF64(__m256d);

/// Eight f32 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct AvxF32(__m256);

/// Horizontal sum of a __m256d (4 f64s)
#[inline]
unsafe fn horizontal_sum_pd(v: __m256d) -> f64 {
    // Extract high and low 128-bit lanes
    let high = _mm256_extractf128_pd(v, 1);
    let low = _mm256_castpd256_pd128(v);

    let sum128 = _mm_add_pd(high, low);
    let sum = _mm_hadd_pd(sum128, sum128);
    _mm_cvtsd_f64(sum)
}

/// Horizontal sum of a __m256 (8 f32s)
#[inline]
unsafe fn horizontal_sum_ps(v: __m256) -> f32 {
    let high = _mm256_extractf128_ps(v, 1);
    let low = _mm256_castps256_ps128(v);

    let sum128 = _mm_add_ps(high, low);
    let sums = _mm_hadd_ps(sum128, sum128);
    let sums = _mm_hadd_ps(sums, sums);
    _mm_cvtss_f32(sums)
}

impl SimdVector for AvxF64 {
    type Scalar = f64;
    const LANES: usize = 4;
    const ALIGNMENT: usize = 32;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        unsafe { AvxF64(_mm256_set1_pd(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f64]) -> Self {
        assert!(slice.len() >= Self::LANES, "AVX load needs {} values", Self::LANES);
        unsafe { AvxF64(_mm256_loadu_pd(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        AvxF64(_mm256_load_pd(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f64]) {
        assert!(slice.len() >= Self::LANES, "AVX store needs {} slots", Self::LANES);
        unsafe { _mm256_storeu_pd(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { AvxF64(_mm256_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { AvxF64(_mm256_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { AvxF64(_mm256_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f64 {
        unsafe { horizontal_sum_pd(self.0) }
    }
}

impl SimdFloat for AvxF64 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { AvxF64(_mm256_ceil_pd(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { AvxF64(_mm256_floor_pd(self.0)) }
    }
}

impl SimdVector for AvxF32 {
    type Scalar = f32;
    const LANES: usize = 8;
    const ALIGNMENT: usize = 32;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { AvxF32(_mm256_set1_ps(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "AVX load needs {} values", Self::LANES);
        unsafe { AvxF32(_mm256_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        AvxF32(_mm256_load_ps(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "AVX store needs {} slots", Self::LANES);
        unsafe { _mm256_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { AvxF32(_mm256_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { AvxF32(_mm256_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { AvxF32(_mm256_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe { horizontal_sum_ps(self.0) }
    }
}

impl SimdFloat for AvxF32 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { AvxF32(_mm256_ceil_ps(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { AvxF32(_mm256_floor_ps(self.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avx_horizontal_sums() {
        assert_eq!(AvxF64::load(&[1.0, 2.0, 3.0, 4.0]).horizontal_sum(), 10.0);
        let data: Vec<f32> = (1..=8).map(|i| i as f32).collect();
        assert_eq!(AvxF32::load(&data).horizontal_sum(), 36.0);
    }

    #[test]
    fn test_avx_floor_negative_half() {
        let mut out = [0.0f64; 4];
        AvxF64::load(&[-0.5, 0.5, -0.0, 1e300]).floor().store(&mut out);
        assert_eq!(out, [-1.0, 0.0, -0.0, 1e300]);
        assert!(out[2].is_sign_negative());
    }
}
