//! SSE4.1 registers (128-bit)
//!
//! Compiled only when the build enables `sse4.1`; rounding uses the SSE4.1
//! `roundpd`/`roundps` forms exposed as `_mm_ceil_*` and `_mm_floor_*`.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::{SimdFloat, SimdVector};

/// Two f64 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct SseF64(__m128d);

/// Four f32 lanes
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct SseF32(__m128);

impl SimdVector for SseF64 {
    type Scalar = f64;
    const LANES: usize = 2;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        unsafe { SseF64(_mm_set1_pd(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f64]) -> Self {
        assert!(slice.len() >= Self::LANES, "SSE load needs {} values", Self::LANES);
        unsafe { SseF64(_mm_loadu_pd(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        SseF64(_mm_load_pd(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f64]) {
        assert!(slice.len() >= Self::LANES, "SSE store needs {} slots", Self::LANES);
        unsafe { _mm_storeu_pd(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { SseF64(_mm_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { SseF64(_mm_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { SseF64(_mm_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f64 {
        let mut lanes = [0.0f64; 2];
        self.store(&mut lanes);
        lanes[0] + lanes[1]
    }
}

impl SimdFloat for SseF64 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { SseF64(_mm_ceil_pd(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { SseF64(_mm_floor_pd(self.0)) }
    }
}

impl SimdVector for SseF32 {
    type Scalar = f32;
    const LANES: usize = 4;
    const ALIGNMENT: usize = 16;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { SseF32(_mm_set1_ps(value)) }
    }

    #[inline(always)]
    fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "SSE load needs {} values", Self::LANES);
        unsafe { SseF32(_mm_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        SseF32(_mm_load_ps(ptr))
    }

    #[inline(always)]
    fn store(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "SSE store needs {} slots", Self::LANES);
        unsafe { _mm_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { SseF32(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { SseF32(_mm_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { SseF32(_mm_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        let mut lanes = [0.0f32; 4];
        self.store(&mut lanes);
        (lanes[0] + lanes[1]) + (lanes[2] + lanes[3])
    }
}

impl SimdFloat for SseF32 {
    #[inline(always)]
    fn ceil(self) -> Self {
        unsafe { SseF32(_mm_ceil_ps(self.0)) }
    }

    #[inline(always)]
    fn floor(self) -> Self {
        unsafe { SseF32(_mm_floor_ps(self.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_ceil_matches_scalar() {
        let input = [-1.5f64, 2.0000001];
        let mut out = [0.0f64; 2];
        SseF64::load(&input).ceil().store(&mut out);
        assert_eq!(out, [input[0].ceil(), input[1].ceil()]);
    }

    #[test]
    fn test_sse_f32_horizontal_sum() {
        assert_eq!(SseF32::load(&[1.0, 2.0, 3.0, 4.0]).horizontal_sum(), 10.0);
    }
}
