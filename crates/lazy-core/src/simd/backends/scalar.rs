//! Scalar fallback register
//!
//! A one-lane "register" used for integer element types and for builds without
//! any enabled vector tier.

use crate::simd::traits::{SimdFloat, SimdVector};
use num_traits::{Float, Num};

/// Single-lane register wrapping one scalar
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct ScalarVector<T>(pub T);

impl<T: Copy + Num> SimdVector for ScalarVector<T> {
    type Scalar = T;
    const LANES: usize = 1;
    const ALIGNMENT: usize = std::mem::align_of::<T>();

    #[inline(always)]
    fn splat(value: T) -> Self {
        ScalarVector(value)
    }

    #[inline(always)]
    fn load(slice: &[T]) -> Self {
        ScalarVector(slice[0])
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        ScalarVector(*ptr)
    }

    #[inline(always)]
    fn store(self, slice: &mut [T]) {
        slice[0] = self.0;
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        ScalarVector(self.0 + rhs.0)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        ScalarVector(self.0 - rhs.0)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        ScalarVector(self.0 * rhs.0)
    }

    #[inline(always)]
    fn horizontal_sum(self) -> T {
        self.0
    }
}

impl<T: Copy + Float> SimdFloat for ScalarVector<T> {
    #[inline(always)]
    fn ceil(self) -> Self {
        ScalarVector(self.0.ceil())
    }

    #[inline(always)]
    fn floor(self) -> Self {
        ScalarVector(self.0.floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_register_arithmetic() {
        let a = ScalarVector::splat(3i64);
        let b = ScalarVector::load(&[4i64, 99]);
        assert_eq!(a.add(b).horizontal_sum(), 7);
        assert_eq!(a.sub(b).0, -1);
        assert_eq!(a.mul(b).0, 12);
    }

    #[test]
    fn test_scalar_register_store() {
        let mut out = [0.0f32; 2];
        ScalarVector(1.5f32).store(&mut out[1..]);
        assert_eq!(out, [0.0, 1.5]);
    }

    #[test]
    fn test_scalar_rounding() {
        assert_eq!(ScalarVector(-0.5f64).ceil().0.to_bits(), (-0.0f64).to_bits());
        assert_eq!(ScalarVector(2.5f64).floor().0, 2.0);
    }

    #[test]
    #[should_panic]
    fn test_load_from_empty_slice_panics() {
        let empty: [f64; 0] = [];
        let _ = ScalarVector::load(&empty);
    }
}
