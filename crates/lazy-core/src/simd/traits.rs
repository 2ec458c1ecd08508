//! Register-level traits implemented by every SIMD tier

/// A fixed-width register of `LANES` scalars of one primitive type.
///
/// Element-wise operations must produce, lane by lane, exactly what the scalar
/// operation produces.
pub trait SimdVector: Copy {
    /// The scalar type held in each lane
    type Scalar: Copy;

    /// Number of scalars in one register
    const LANES: usize;

    /// Alignment in bytes required by [`SimdVector::load_aligned`]
    const ALIGNMENT: usize;

    /// Broadcast one value into every lane
    fn splat(value: Self::Scalar) -> Self;

    /// Load the first `LANES` values of `slice` (no alignment requirement).
    ///
    /// # Panics
    /// Panics if `slice` is shorter than `LANES`.
    fn load(slice: &[Self::Scalar]) -> Self;

    /// Load `LANES` values from an aligned address.
    ///
    /// # Safety
    /// `ptr` must be valid for reading `LANES` values and aligned to
    /// [`SimdVector::ALIGNMENT`] bytes.
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self;

    /// Store all lanes into the first `LANES` slots of `slice`.
    ///
    /// # Panics
    /// Panics if `slice` is shorter than `LANES`.
    fn store(self, slice: &mut [Self::Scalar]);

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;

    /// Sum of all lanes
    fn horizontal_sum(self) -> Self::Scalar;
}

/// Rounding operations available on floating-point registers.
///
/// Implementations use the instruction set's native rounding instruction.
pub trait SimdFloat: SimdVector {
    /// Round every lane toward positive infinity
    fn ceil(self) -> Self;

    /// Round every lane toward negative infinity
    fn floor(self) -> Self;
}
