//! Element types accepted by containers and expressions
//!
//! [`Numeric`] ties together what the engine needs from an element: ring
//! arithmetic and a register type selected for the active SIMD tier via
//! [`SimdElement`].

use crate::simd::SimdElement;
use std::fmt::Debug;

/// Base trait for element types of vectors and matrices
pub trait Numeric: SimdElement + Default + Debug {
    /// Absolute value. Identity for unsigned types.
    fn abs_val(self) -> Self;
}

macro_rules! impl_numeric_signed {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn abs_val(self) -> Self {
                self.abs()
            }
        }
    )*};
}

macro_rules! impl_numeric_unsigned {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn abs_val(self) -> Self {
                self
            }
        }
    )*};
}

impl_numeric_signed!(f32, f64, i32, i64);
impl_numeric_unsigned!(u32, u64);

/// Maps an integer element type to the unsigned type of the same width.
///
/// Unsigned types map to themselves.
pub trait MakeUnsigned: Copy {
    type Unsigned: Copy;

    /// Magnitude of `self` as the unsigned type; never overflows.
    fn unsigned_abs(self) -> Self::Unsigned;
}

macro_rules! impl_make_unsigned {
    ($($s:ty => $u:ty),*) => {$(
        impl MakeUnsigned for $s {
            type Unsigned = $u;

            fn unsigned_abs(self) -> $u {
                <$s>::unsigned_abs(self)
            }
        }

        impl MakeUnsigned for $u {
            type Unsigned = $u;

            fn unsigned_abs(self) -> $u {
                self
            }
        }
    )*};
}

impl_make_unsigned!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

/// The unsigned counterpart of `T`
pub type Unsigned<T> = <T as MakeUnsigned>::Unsigned;
