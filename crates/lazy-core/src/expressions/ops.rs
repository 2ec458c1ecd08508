//! Operator overloads and the free functions that build expressions
//!
//! Operators dispatch on the coarse shape of both operand categories
//! (matrix, column vector, row vector, scalar). A pairing with no entry in
//! [`MultShape`], [`AddShape`] or [`SubShape`] has no operator, so for
//! example `&matrix * &row_vector` does not build.

use super::additive::{MatMatAddExpr, MatMatSubExpr, VecVecAddExpr, VecVecSubExpr};
use super::additive::{MatMatAdditiveExpr, VecVecAdditiveExpr};
use super::map::{MatMapExpr, VecMapExpr};
use super::{materialize_vector, CrossExpr, MatMatMultExpr, MatScalarMultExpr, MatTransExpr, MatVecMultExpr};
use super::{OuterExpr, TVecMatMultExpr, VecScalarMultExpr, VecTransExpr, VecVecMultExpr};
use crate::containers::{CompressedMatrix, CompressedVector, CustomMatrix, DynamicMatrix, DynamicVector};
use crate::containers::{StaticMatrix, StaticVector};
use crate::error::precondition;
use crate::numeric::Numeric;
use crate::simd::kernels;
use crate::traits::{Matrix, Operand, Vector};
use crate::typetraits::{is_sparse, Category, ColumnShape, MatrixShape, Orientation, RowShape, ScalarShape, StorageOrder};
use std::ops::{Add, Mul, Sub};

/// Coarse shape of an operand's category
pub type ShapeOf<T> = <<T as Operand>::Category as Category>::Shape;

/// `lhs * rhs`, implemented on `(ShapeOf<L>, ShapeOf<R>)`
pub trait MultShape<L, R> {
    type Output;

    fn mult(lhs: L, rhs: R) -> Self::Output;
}

/// `lhs + rhs`, implemented on `(ShapeOf<L>, ShapeOf<R>)`
pub trait AddShape<L, R> {
    type Output;

    fn add(lhs: L, rhs: R) -> Self::Output;
}

/// `lhs - rhs`, implemented on `(ShapeOf<L>, ShapeOf<R>)`
pub trait SubShape<L, R> {
    type Output;

    fn sub(lhs: L, rhs: R) -> Self::Output;
}

impl<L: Matrix, R: Matrix<Element = L::Element>> MultShape<L, R> for (MatrixShape, MatrixShape) {
    type Output = MatMatMultExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        MatMatMultExpr::new(lhs, rhs)
    }
}

impl<L: Matrix, R: Vector<Element = L::Element>> MultShape<L, R> for (MatrixShape, ColumnShape) {
    type Output = MatVecMultExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        MatVecMultExpr::new(lhs, rhs)
    }
}

impl<L: Vector, R: Matrix<Element = L::Element>> MultShape<L, R> for (RowShape, MatrixShape) {
    type Output = TVecMatMultExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        TVecMatMultExpr::new(lhs, rhs)
    }
}

impl<L: Vector, R: Vector<Element = L::Element>> MultShape<L, R> for (RowShape, ColumnShape) {
    type Output = L::Element;

    fn mult(lhs: L, rhs: R) -> L::Element {
        inner(lhs, rhs)
    }
}

impl<L: Vector, R: Vector<Element = L::Element>> MultShape<L, R> for (ColumnShape, RowShape) {
    type Output = OuterExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        OuterExpr::new(lhs, rhs)
    }
}

impl<L: Vector, R: Vector<Element = L::Element>> MultShape<L, R> for (ColumnShape, ColumnShape) {
    type Output = VecVecMultExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        VecVecMultExpr::new(lhs, rhs)
    }
}

impl<L: Vector, R: Vector<Element = L::Element>> MultShape<L, R> for (RowShape, RowShape) {
    type Output = VecVecMultExpr<L, R>;

    fn mult(lhs: L, rhs: R) -> Self::Output {
        VecVecMultExpr::new(lhs, rhs)
    }
}

impl<L: Matrix> MultShape<L, L::Element> for (MatrixShape, ScalarShape) {
    type Output = MatScalarMultExpr<L>;

    fn mult(lhs: L, rhs: L::Element) -> Self::Output {
        MatScalarMultExpr::new(lhs, rhs)
    }
}

impl<R: Matrix> MultShape<R::Element, R> for (ScalarShape, MatrixShape) {
    type Output = MatScalarMultExpr<R>;

    fn mult(lhs: R::Element, rhs: R) -> Self::Output {
        MatScalarMultExpr::new(rhs, lhs)
    }
}

macro_rules! vector_scalar_shapes {
    ($($shape:ident),*) => {$(
        impl<L: Vector> MultShape<L, L::Element> for ($shape, ScalarShape) {
            type Output = VecScalarMultExpr<L>;

            fn mult(lhs: L, rhs: L::Element) -> Self::Output {
                VecScalarMultExpr::new(lhs, rhs)
            }
        }

        impl<R: Vector> MultShape<R::Element, R> for (ScalarShape, $shape) {
            type Output = VecScalarMultExpr<R>;

            fn mult(lhs: R::Element, rhs: R) -> Self::Output {
                VecScalarMultExpr::new(rhs, lhs)
            }
        }

        impl<L: Vector, R: Vector<Element = L::Element>> AddShape<L, R> for ($shape, $shape) {
            type Output = VecVecAddExpr<L, R>;

            fn add(lhs: L, rhs: R) -> Self::Output {
                VecVecAdditiveExpr::new(lhs, rhs)
            }
        }

        impl<L: Vector, R: Vector<Element = L::Element>> SubShape<L, R> for ($shape, $shape) {
            type Output = VecVecSubExpr<L, R>;

            fn sub(lhs: L, rhs: R) -> Self::Output {
                VecVecAdditiveExpr::new(lhs, rhs)
            }
        }
    )*};
}

vector_scalar_shapes!(ColumnShape, RowShape);

impl<L: Matrix, R: Matrix<Element = L::Element>> AddShape<L, R> for (MatrixShape, MatrixShape) {
    type Output = MatMatAddExpr<L, R>;

    fn add(lhs: L, rhs: R) -> Self::Output {
        MatMatAdditiveExpr::new(lhs, rhs)
    }
}

impl<L: Matrix, R: Matrix<Element = L::Element>> SubShape<L, R> for (MatrixShape, MatrixShape) {
    type Output = MatMatSubExpr<L, R>;

    fn sub(lhs: L, rhs: R) -> Self::Output {
        MatMatAdditiveExpr::new(lhs, rhs)
    }
}

/// `*`, `+` and `-` with any operand on the right, and `scalar * operand`
/// for every supported scalar type
macro_rules! operators {
    ($([$($g:tt)*] $ty:ty;)*) => {$(
        impl<$($g)*, Rhs> Mul<Rhs> for $ty
        where
            $ty: Operand,
            Rhs: Operand,
            (ShapeOf<$ty>, ShapeOf<Rhs>): MultShape<$ty, Rhs>,
        {
            type Output = <(ShapeOf<$ty>, ShapeOf<Rhs>) as MultShape<$ty, Rhs>>::Output;

            #[inline]
            fn mul(self, rhs: Rhs) -> Self::Output {
                <(ShapeOf<$ty>, ShapeOf<Rhs>) as MultShape<$ty, Rhs>>::mult(self, rhs)
            }
        }

        impl<$($g)*, Rhs> Add<Rhs> for $ty
        where
            $ty: Operand,
            Rhs: Operand,
            (ShapeOf<$ty>, ShapeOf<Rhs>): AddShape<$ty, Rhs>,
        {
            type Output = <(ShapeOf<$ty>, ShapeOf<Rhs>) as AddShape<$ty, Rhs>>::Output;

            #[inline]
            fn add(self, rhs: Rhs) -> Self::Output {
                <(ShapeOf<$ty>, ShapeOf<Rhs>) as AddShape<$ty, Rhs>>::add(self, rhs)
            }
        }

        impl<$($g)*, Rhs> Sub<Rhs> for $ty
        where
            $ty: Operand,
            Rhs: Operand,
            (ShapeOf<$ty>, ShapeOf<Rhs>): SubShape<$ty, Rhs>,
        {
            type Output = <(ShapeOf<$ty>, ShapeOf<Rhs>) as SubShape<$ty, Rhs>>::Output;

            #[inline]
            fn sub(self, rhs: Rhs) -> Self::Output {
                <(ShapeOf<$ty>, ShapeOf<Rhs>) as SubShape<$ty, Rhs>>::sub(self, rhs)
            }
        }

        scalar_times!(f32, [$($g)*] $ty);
        scalar_times!(f64, [$($g)*] $ty);
        scalar_times!(i32, [$($g)*] $ty);
        scalar_times!(i64, [$($g)*] $ty);
        scalar_times!(u32, [$($g)*] $ty);
        scalar_times!(u64, [$($g)*] $ty);
    )*};
}

macro_rules! scalar_times {
    ($scalar:ty, [$($g:tt)*] $ty:ty) => {
        impl<$($g)*> Mul<$ty> for $scalar
        where
            $ty: Operand<Element = $scalar>,
            (ScalarShape, ShapeOf<$ty>): MultShape<$scalar, $ty>,
        {
            type Output = <(ScalarShape, ShapeOf<$ty>) as MultShape<$scalar, $ty>>::Output;

            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                <(ScalarShape, ShapeOf<$ty>) as MultShape<$scalar, $ty>>::mult(self, rhs)
            }
        }
    };
}

operators! {
    ['a, T: Numeric, SO: StorageOrder] &'a DynamicMatrix<T, SO>;
    ['a, T: Numeric, const R: usize, const C: usize] &'a StaticMatrix<T, R, C>;
    ['a, 'b, T: Numeric, SO: StorageOrder] &'a CustomMatrix<'b, T, SO>;
    ['a, T: Numeric, SO: StorageOrder] &'a CompressedMatrix<T, SO>;
    ['a, T: Numeric, O: Orientation] &'a DynamicVector<T, O>;
    ['a, T: Numeric, const N: usize, O: Orientation] &'a StaticVector<T, N, O>;
    ['a, T: Numeric, O: Orientation] &'a CompressedVector<T, O>;
    [M] MatTransExpr<M>;
    [V] VecTransExpr<V>;
    [L, R, Op] MatMatAdditiveExpr<L, R, Op>;
    [L, R, Op] VecVecAdditiveExpr<L, R, Op>;
    [L, R] MatMatMultExpr<L, R>;
    [M, V] MatVecMultExpr<M, V>;
    [V, M] TVecMatMultExpr<V, M>;
    [L, R] VecVecMultExpr<L, R>;
    [L, R] OuterExpr<L, R>;
    [M: Matrix] MatScalarMultExpr<M>;
    [V: Vector] VecScalarMultExpr<V>;
    [M, Op] MatMapExpr<M, Op>;
    [V, Op] VecMapExpr<V, Op>;
    [L, R] CrossExpr<L, R>;
}

/// Transposition; transposing a transpose hands back the original operand
pub trait Transpose {
    type Output;

    fn trans(self) -> Self::Output;
}

/// `trans(x)`: a transposed view of a matrix, or a vector of the other
/// orientation. `trans(trans(x))` is `x` itself.
#[inline]
pub fn trans<E: Transpose>(operand: E) -> E::Output {
    operand.trans()
}

impl<M: Matrix> Transpose for MatTransExpr<M> {
    type Output = M;

    #[inline]
    fn trans(self) -> M {
        self.into_operand()
    }
}

impl<'a, M: Matrix> Transpose for &'a MatTransExpr<M> {
    type Output = &'a M;

    #[inline]
    fn trans(self) -> &'a M {
        self.operand()
    }
}

impl<V: Vector> Transpose for VecTransExpr<V> {
    type Output = V;

    #[inline]
    fn trans(self) -> V {
        self.into_operand()
    }
}

impl<'a, V: Vector> Transpose for &'a VecTransExpr<V> {
    type Output = &'a V;

    #[inline]
    fn trans(self) -> &'a V {
        self.operand()
    }
}

macro_rules! transpose_matrices {
    ($([$($g:tt)*] $ty:ty;)*) => {$(
        impl<$($g)*> Transpose for $ty
        where
            $ty: Matrix,
        {
            type Output = MatTransExpr<$ty>;

            #[inline]
            fn trans(self) -> Self::Output {
                MatTransExpr::new(self)
            }
        }
    )*};
}

macro_rules! transpose_vectors {
    ($([$($g:tt)*] $ty:ty;)*) => {$(
        impl<$($g)*> Transpose for $ty
        where
            $ty: Vector,
        {
            type Output = VecTransExpr<$ty>;

            #[inline]
            fn trans(self) -> Self::Output {
                VecTransExpr::new(self)
            }
        }
    )*};
}

transpose_matrices! {
    ['a, T: Numeric, SO: StorageOrder] &'a DynamicMatrix<T, SO>;
    ['a, T: Numeric, const R: usize, const C: usize] &'a StaticMatrix<T, R, C>;
    ['a, 'b, T: Numeric, SO: StorageOrder] &'a CustomMatrix<'b, T, SO>;
    ['a, T: Numeric, SO: StorageOrder] &'a CompressedMatrix<T, SO>;
    [L, R, Op] MatMatAdditiveExpr<L, R, Op>;
    [L, R] MatMatMultExpr<L, R>;
    [L, R] OuterExpr<L, R>;
    [M: Matrix] MatScalarMultExpr<M>;
    [M, Op] MatMapExpr<M, Op>;
}

transpose_vectors! {
    ['a, T: Numeric, O: Orientation] &'a DynamicVector<T, O>;
    ['a, T: Numeric, const N: usize, O: Orientation] &'a StaticVector<T, N, O>;
    ['a, T: Numeric, O: Orientation] &'a CompressedVector<T, O>;
    [L, R, Op] VecVecAdditiveExpr<L, R, Op>;
    [M, V] MatVecMultExpr<M, V>;
    [V, M] TVecMatMultExpr<V, M>;
    [L, R] VecVecMultExpr<L, R>;
    [V: Vector] VecScalarMultExpr<V>;
    [V, Op] VecMapExpr<V, Op>;
    [L, R] CrossExpr<L, R>;
}

/// Inner (dot) product, evaluated immediately.
///
/// # Panics
///
/// When the lengths differ.
pub fn inner<L, R>(lhs: L, rhs: R) -> L::Element
where
    L: Vector,
    R: Vector<Element = L::Element>,
{
    crate::constraint_must_form_valid_vecvecop!(L, R);
    precondition!(
        lhs.size() == rhs.size(),
        "cannot take the inner product of vectors of length {} and {}",
        lhs.size(),
        rhs.size()
    );
    match (L::REQUIRES_EVALUATION, R::REQUIRES_EVALUATION) {
        (false, false) => dot(&lhs, &rhs),
        (true, false) => dot(&materialize_vector::<_, L::Orient>(&lhs), &rhs),
        (false, true) => dot(&lhs, &materialize_vector::<_, R::Orient>(&rhs)),
        (true, true) => dot(
            &materialize_vector::<_, L::Orient>(&lhs),
            &materialize_vector::<_, R::Orient>(&rhs),
        ),
    }
}

fn dot<A, B>(a: &A, b: &B) -> A::Element
where
    A: Vector + ?Sized,
    B: Vector<Element = A::Element> + ?Sized,
{
    if let (Some(x), Some(y)) = (a.as_slice(), b.as_slice()) {
        return kernels::dot(x, y);
    }
    let mut sum = num_traits::zero::<A::Element>();
    if is_sparse::<A>() {
        a.for_each_stored(|i, x| sum += x * b.at(i));
    } else if is_sparse::<B>() {
        b.for_each_stored(|i, y| sum += a.at(i) * y);
    } else {
        for i in 0..a.size() {
            sum += a.at(i) * b.at(i);
        }
    }
    sum
}
