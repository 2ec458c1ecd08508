//! Compile-time contract checks
//!
//! Each constraint is a zero-sized type with an associated `CHECK` constant whose
//! initializer asserts the contract. Naming the constant in a function body
//! (which is what the `constraint_*!` macros do) forces its evaluation when the
//! function is monomorphized, so an ill-typed expression fails to build:
//!
//! ```compile_fail
//! use lazy_core::StaticMatrix;
//!
//! let a = StaticMatrix::<f64, 2, 3>::zero();
//! let b = StaticMatrix::<f64, 3, 3>::zero();
//! // rows 2 vs 3: rejected by MustFormValidMatMatAdd
//! let _sum = &a + &b;
//! ```
//!
//! A dynamic operand makes the same check a run-time precondition instead:
//!
//! ```
//! use lazy_core::{DynamicMatrix, StaticMatrix};
//!
//! let a = StaticMatrix::<f64, 2, 3>::zero();
//! let b = DynamicMatrix::<f64>::new(2, 3);
//! let sum = DynamicMatrix::<f64>::from_expr(&a + &b);
//! assert_eq!((sum.rows(), sum.columns()), (2, 3));
//! ```
//!
//! Products check the inner dimension the same way:
//!
//! ```compile_fail
//! use lazy_core::StaticMatrix;
//!
//! let a = StaticMatrix::<f64, 2, 3>::zero();
//! let b = StaticMatrix::<f64, 2, 3>::zero();
//! let _product = &a * &b;
//! ```
//!
//! and cross products the vector length:
//!
//! ```compile_fail
//! use lazy_core::{cross, StaticVector};
//!
//! let a = StaticVector::<f64, 4>::zero();
//! let b = StaticVector::<f64, 4>::zero();
//! let _c = cross(&a, &b);
//! ```
//!
//! Vectors are only assigned to vectors of the same orientation:
//!
//! ```compile_fail
//! use lazy_core::{trans, DynamicVector};
//!
//! let a = DynamicVector::<f64>::new(3);
//! let mut b = DynamicVector::<f64>::new(3);
//! b.assign(trans(&a));
//! ```

use crate::traits::{Matrix, Operand, Vector};
use crate::typetraits::{dims_conform, is_dense, is_matrix, is_row_major, is_vector, ColumnMajor, Orientation, RowMajor};
use crate::typetraits::StorageOrder;
use std::marker::PhantomData;

/// Wildcard for constraints parameterized by a storage order: any order passes.
///
/// Distinct from [`crate::typetraits::Invalid`], which marks an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unconstrained;

/// Storage-order arguments accepted by [`MustHaveStorageOrder`]
pub trait OrderConstraint {
    const ACCEPTS_ROW_MAJOR: bool;
    const ACCEPTS_COLUMN_MAJOR: bool;
}

impl OrderConstraint for RowMajor {
    const ACCEPTS_ROW_MAJOR: bool = true;
    const ACCEPTS_COLUMN_MAJOR: bool = false;
}

impl OrderConstraint for ColumnMajor {
    const ACCEPTS_ROW_MAJOR: bool = false;
    const ACCEPTS_COLUMN_MAJOR: bool = true;
}

impl OrderConstraint for Unconstrained {
    const ACCEPTS_ROW_MAJOR: bool = true;
    const ACCEPTS_COLUMN_MAJOR: bool = true;
}

pub struct MustBeMatrix<T: ?Sized>(PhantomData<T>);

impl<T: Operand + ?Sized> MustBeMatrix<T> {
    pub const CHECK: () = assert!(is_matrix::<T>(), "constraint violated: operand must be a matrix");
}

pub struct MustBeVector<T: ?Sized>(PhantomData<T>);

impl<T: Operand + ?Sized> MustBeVector<T> {
    pub const CHECK: () = assert!(is_vector::<T>(), "constraint violated: operand must be a vector");
}

pub struct MustBeDense<T: ?Sized>(PhantomData<T>);

impl<T: Operand + ?Sized> MustBeDense<T> {
    pub const CHECK: () = assert!(is_dense::<T>(), "constraint violated: operand must be dense");
}

pub struct MustBeRowMajor<T: ?Sized>(PhantomData<T>);

impl<T: Operand + ?Sized> MustBeRowMajor<T> {
    pub const CHECK: () = assert!(is_row_major::<T>(), "constraint violated: matrix must be row-major");
}

pub struct MustHaveStorageOrder<T: ?Sized, SO>(PhantomData<(SO, *const T)>);

impl<T: Matrix + ?Sized, SO: OrderConstraint> MustHaveStorageOrder<T, SO> {
    pub const CHECK: () = assert!(
        if <T::Order as StorageOrder>::IS_ROW_MAJOR {
            SO::ACCEPTS_ROW_MAJOR
        } else {
            SO::ACCEPTS_COLUMN_MAJOR
        },
        "constraint violated: matrix has the wrong storage order"
    );
}

pub struct MustFormValidMatMatAdd<L: ?Sized, R: ?Sized>(PhantomData<(*const L, *const R)>);

impl<L: Matrix + ?Sized, R: Matrix + ?Sized> MustFormValidMatMatAdd<L, R> {
    pub const IS_VALID: bool = dims_conform(L::ROWS, R::ROWS) && dims_conform(L::COLUMNS, R::COLUMNS);

    pub const CHECK: () = assert!(
        Self::IS_VALID,
        "constraint violated: matrices do not form a valid matrix/matrix addition"
    );
}

pub struct MustNotFormValidMatMatAdd<L: ?Sized, R: ?Sized>(PhantomData<(*const L, *const R)>);

impl<L: Matrix + ?Sized, R: Matrix + ?Sized> MustNotFormValidMatMatAdd<L, R> {
    pub const CHECK: () = assert!(
        !MustFormValidMatMatAdd::<L, R>::IS_VALID,
        "constraint violated: matrices unexpectedly form a valid matrix/matrix addition"
    );
}

pub struct MustFormValidMatMatMult<L: ?Sized, R: ?Sized>(PhantomData<(*const L, *const R)>);

impl<L: Matrix + ?Sized, R: Matrix + ?Sized> MustFormValidMatMatMult<L, R> {
    pub const CHECK: () = assert!(
        dims_conform(L::COLUMNS, R::ROWS),
        "constraint violated: matrices do not form a valid matrix/matrix multiplication"
    );
}

pub struct MustFormValidMatVecMult<M: ?Sized, V: ?Sized>(PhantomData<(*const M, *const V)>);

impl<M: Matrix + ?Sized, V: Vector + ?Sized> MustFormValidMatVecMult<M, V> {
    pub const CHECK: () = assert!(
        dims_conform(M::COLUMNS, V::SIZE),
        "constraint violated: operands do not form a valid matrix/vector multiplication"
    );
}

pub struct MustFormValidTVecMatMult<V: ?Sized, M: ?Sized>(PhantomData<(*const V, *const M)>);

impl<V: Vector + ?Sized, M: Matrix + ?Sized> MustFormValidTVecMatMult<V, M> {
    pub const CHECK: () = assert!(
        dims_conform(V::SIZE, M::ROWS),
        "constraint violated: operands do not form a valid vector/matrix multiplication"
    );
}

pub struct MustFormValidVecVecOp<L: ?Sized, R: ?Sized>(PhantomData<(*const L, *const R)>);

impl<L: Vector + ?Sized, R: Vector + ?Sized> MustFormValidVecVecOp<L, R> {
    pub const CHECK: () = assert!(
        dims_conform(L::SIZE, R::SIZE),
        "constraint violated: vectors have different sizes"
    );
}

pub struct MustHaveSameOrientation<L: ?Sized, R: ?Sized>(PhantomData<(*const L, *const R)>);

impl<L: Vector + ?Sized, R: Vector + ?Sized> MustHaveSameOrientation<L, R> {
    pub const CHECK: () = assert!(
        <L::Orient as Orientation>::IS_ROW == <R::Orient as Orientation>::IS_ROW,
        "constraint violated: vectors have different orientations"
    );
}

pub struct MustHaveSize<V: ?Sized, const N: usize>(PhantomData<*const V>);

impl<V: Vector + ?Sized, const N: usize> MustHaveSize<V, N> {
    pub const CHECK: () = assert!(
        dims_conform(V::SIZE, Some(N)),
        "constraint violated: vector has the wrong size"
    );
}

#[macro_export]
macro_rules! constraint_must_be_matrix {
    ($t:ty) => {
        let () = $crate::constraints::MustBeMatrix::<$t>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_be_vector {
    ($t:ty) => {
        let () = $crate::constraints::MustBeVector::<$t>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_be_dense {
    ($t:ty) => {
        let () = $crate::constraints::MustBeDense::<$t>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_be_row_major {
    ($t:ty) => {
        let () = $crate::constraints::MustBeRowMajor::<$t>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_have_storage_order {
    ($t:ty, $so:ty) => {
        let () = $crate::constraints::MustHaveStorageOrder::<$t, $so>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_form_valid_matmatadd {
    ($l:ty, $r:ty) => {
        let () = $crate::constraints::MustFormValidMatMatAdd::<$l, $r>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_not_form_valid_matmatadd {
    ($l:ty, $r:ty) => {
        let () = $crate::constraints::MustNotFormValidMatMatAdd::<$l, $r>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_form_valid_matmatmult {
    ($l:ty, $r:ty) => {
        let () = $crate::constraints::MustFormValidMatMatMult::<$l, $r>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_form_valid_matvecmult {
    ($m:ty, $v:ty) => {
        let () = $crate::constraints::MustFormValidMatVecMult::<$m, $v>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_form_valid_tvecmatmult {
    ($v:ty, $m:ty) => {
        let () = $crate::constraints::MustFormValidTVecMatMult::<$v, $m>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_form_valid_vecvecop {
    ($l:ty, $r:ty) => {
        let () = $crate::constraints::MustFormValidVecVecOp::<$l, $r>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_have_same_orientation {
    ($l:ty, $r:ty) => {
        let () = $crate::constraints::MustHaveSameOrientation::<$l, $r>::CHECK;
    };
}

#[macro_export]
macro_rules! constraint_must_have_size {
    ($v:ty, $n:expr) => {
        let () = $crate::constraints::MustHaveSize::<$v, { $n }>::CHECK;
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedMatrix, DynamicMatrix, DynamicVector, StaticMatrix, StaticVector};

    #[test]
    fn test_satisfied_constraints_build() {
        constraint_must_be_matrix!(DynamicMatrix<f64>);
        constraint_must_be_vector!(StaticVector<f32, 3>);
        constraint_must_be_dense!(&DynamicMatrix<f64, ColumnMajor>);
        constraint_must_be_row_major!(CompressedMatrix<i64>);
        constraint_must_have_storage_order!(DynamicMatrix<f64, ColumnMajor>, ColumnMajor);
        constraint_must_have_storage_order!(DynamicMatrix<f64, ColumnMajor>, Unconstrained);
        constraint_must_have_storage_order!(StaticMatrix<f64, 2, 2>, Unconstrained);
        constraint_must_form_valid_matmatadd!(StaticMatrix<f64, 2, 3>, DynamicMatrix<f64>);
        constraint_must_not_form_valid_matmatadd!(StaticMatrix<f64, 2, 3>, StaticMatrix<f64, 3, 2>);
        constraint_must_form_valid_matmatmult!(StaticMatrix<f64, 2, 3>, StaticMatrix<f64, 3, 7>);
        constraint_must_form_valid_matvecmult!(StaticMatrix<f64, 2, 3>, StaticVector<f64, 3>);
        constraint_must_form_valid_tvecmatmult!(DynamicVector<f64>, StaticMatrix<f64, 2, 3>);
        constraint_must_form_valid_vecvecop!(StaticVector<f64, 3>, DynamicVector<f64>);
        constraint_must_have_same_orientation!(StaticVector<f64, 3>, DynamicVector<f64>);
        constraint_must_have_size!(StaticVector<f64, 3>, 3);
        constraint_must_have_size!(DynamicVector<f64>, 3);
    }

    #[test]
    fn test_addition_validity_flag() {
        assert!(MustFormValidMatMatAdd::<DynamicMatrix<f64>, StaticMatrix<f64, 4, 4>>::IS_VALID);
        assert!(!MustFormValidMatMatAdd::<StaticMatrix<f64, 4, 3>, StaticMatrix<f64, 4, 4>>::IS_VALID);
    }
}
