//! Element-wise unary operations: `ceil`, `floor`, `abs`

use super::ops::ShapeOf;
use super::stream::{stream_matrix, stream_vector, Mode};
use super::{materialize, materialize_vector, matrix_operand_can_alias, vector_operand_can_alias};
use crate::numeric::Numeric;
use crate::simd::{kernels, SimdFloat};
use crate::traits::{ij, DenseMatrixMut, DenseVectorMut, Matrix, Operand, Region, Vector};
use crate::typetraits::{ColumnShape, MatrixShape, RowShape, ScalarShape, StorageOrder};
use num_traits::Float;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A function applied to every element. It must map zero to zero, so sparse
/// operands keep their structure.
pub trait UnaryOp<T: Numeric>: Copy + Default + Debug + 'static {
    fn apply(x: T) -> T;

    fn apply_slice(src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len(), "slice lengths differ");
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = Self::apply(s);
        }
    }

    fn apply_in_place(data: &mut [T]) {
        for x in data {
            *x = Self::apply(*x);
        }
    }
}

/// Round toward positive infinity
#[derive(Clone, Copy, Debug, Default)]
pub struct Ceil;

/// Round toward negative infinity
#[derive(Clone, Copy, Debug, Default)]
pub struct Floor;

/// Absolute value
#[derive(Clone, Copy, Debug, Default)]
pub struct Abs;

impl<T> UnaryOp<T> for Ceil
where
    T: Numeric + Float,
    T::Vector: SimdFloat,
{
    #[inline]
    fn apply(x: T) -> T {
        Float::ceil(x)
    }

    fn apply_slice(src: &[T], dst: &mut [T]) {
        kernels::ceil(src, dst);
    }

    fn apply_in_place(data: &mut [T]) {
        kernels::ceil_in_place(data);
    }
}

impl<T> UnaryOp<T> for Floor
where
    T: Numeric + Float,
    T::Vector: SimdFloat,
{
    #[inline]
    fn apply(x: T) -> T {
        Float::floor(x)
    }

    fn apply_slice(src: &[T], dst: &mut [T]) {
        kernels::floor(src, dst);
    }

    fn apply_in_place(data: &mut [T]) {
        kernels::floor_in_place(data);
    }
}

impl<T: Numeric> UnaryOp<T> for Abs {
    #[inline]
    fn apply(x: T) -> T {
        x.abs_val()
    }
}

/// `Op` applied to every element of a matrix
#[derive(Clone, Copy, Debug)]
pub struct MatMapExpr<M, Op> {
    operand: M,
    op: PhantomData<Op>,
}

impl<M: Matrix, Op: UnaryOp<M::Element>> MatMapExpr<M, Op> {
    pub fn new(operand: M) -> Self {
        Self {
            operand,
            op: PhantomData,
        }
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        if M::REQUIRES_EVALUATION {
            let mut temp = materialize::<_, D::Order>(&self.operand);
            Op::apply_in_place(temp.as_mut_slice());
            mode.matrix_into(&temp, target);
            return;
        }

        let same_order = <D::Order as StorageOrder>::IS_ROW_MAJOR == <M::Order as StorageOrder>::IS_ROW_MAJOR;
        if mode != Mode::Assign || !same_order || self.is_aliased(target.region()) {
            stream_matrix(target, self, mode);
            return;
        }
        for major in 0..target.major_len() {
            if let (Some(src), Some(dst)) = (self.operand.major_slice(major), target.major_slice_mut(major)) {
                Op::apply_slice(src, dst);
                continue;
            }
            for minor in 0..target.minor_len() {
                let (i, j) = ij::<D::Order>(major, minor);
                target.set(i, j, Op::apply(self.operand.at(i, j)));
            }
        }
    }
}

impl<M: Matrix, Op: UnaryOp<M::Element>> Operand for MatMapExpr<M, Op> {
    type Element = M::Element;
    type Category = M::Category;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<M: Matrix, Op: UnaryOp<M::Element>> Matrix for MatMapExpr<M, Op> {
    type Order = M::Order;
    const ROWS: Option<usize> = M::ROWS;
    const COLUMNS: Option<usize> = M::COLUMNS;
    const REQUIRES_EVALUATION: bool = M::REQUIRES_EVALUATION;

    #[inline]
    fn rows(&self) -> usize {
        self.operand.rows()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.operand.columns()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> M::Element {
        Op::apply(self.operand.at(i, j))
    }

    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, M::Element),
    {
        self.operand.for_each_stored_in(major, |minor, value| f(minor, Op::apply(value)));
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        matrix_operand_can_alias(&self.operand, region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

/// `Op` applied to every element of a vector
#[derive(Clone, Copy, Debug)]
pub struct VecMapExpr<V, Op> {
    operand: V,
    op: PhantomData<Op>,
}

impl<V: Vector, Op: UnaryOp<V::Element>> VecMapExpr<V, Op> {
    pub fn new(operand: V) -> Self {
        Self {
            operand,
            op: PhantomData,
        }
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        if V::REQUIRES_EVALUATION {
            let mut temp = materialize_vector::<_, V::Orient>(&self.operand);
            Op::apply_in_place(temp.as_mut_slice());
            mode.vector_into(&temp, target);
            return;
        }
        if mode == Mode::Assign && !self.is_aliased(target.region()) {
            if let (Some(src), Some(dst)) = (self.operand.as_slice(), target.as_mut_slice()) {
                Op::apply_slice(src, dst);
                return;
            }
        }
        stream_vector(target, self, mode);
    }
}

impl<V: Vector, Op: UnaryOp<V::Element>> Operand for VecMapExpr<V, Op> {
    type Element = V::Element;
    type Category = V::Category;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<V: Vector, Op: UnaryOp<V::Element>> Vector for VecMapExpr<V, Op> {
    type Orient = V::Orient;
    const SIZE: Option<usize> = V::SIZE;
    const REQUIRES_EVALUATION: bool = V::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        self.operand.size()
    }

    #[inline]
    fn at(&self, i: usize) -> V::Element {
        Op::apply(self.operand.at(i))
    }

    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, V::Element),
    {
        self.operand.for_each_stored(|i, value| f(i, Op::apply(value)));
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        vector_operand_can_alias(&self.operand, region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

/// Picks the map node for an operand's shape; scalars are mapped on the spot
pub trait MapShape<E, Op> {
    type Output;

    fn map(operand: E) -> Self::Output;
}

impl<M: Matrix, Op: UnaryOp<M::Element>> MapShape<M, Op> for MatrixShape {
    type Output = MatMapExpr<M, Op>;

    fn map(operand: M) -> Self::Output {
        MatMapExpr::new(operand)
    }
}

impl<V: Vector, Op: UnaryOp<V::Element>> MapShape<V, Op> for ColumnShape {
    type Output = VecMapExpr<V, Op>;

    fn map(operand: V) -> Self::Output {
        VecMapExpr::new(operand)
    }
}

impl<V: Vector, Op: UnaryOp<V::Element>> MapShape<V, Op> for RowShape {
    type Output = VecMapExpr<V, Op>;

    fn map(operand: V) -> Self::Output {
        VecMapExpr::new(operand)
    }
}

impl<S: Numeric, Op: UnaryOp<S>> MapShape<S, Op> for ScalarShape {
    type Output = S;

    fn map(operand: S) -> S {
        Op::apply(operand)
    }
}

/// Element-wise ceiling of a matrix, vector or scalar
pub fn ceil<E>(operand: E) -> <ShapeOf<E> as MapShape<E, Ceil>>::Output
where
    E: Operand,
    ShapeOf<E>: MapShape<E, Ceil>,
{
    <ShapeOf<E> as MapShape<E, Ceil>>::map(operand)
}

/// Element-wise floor of a matrix, vector or scalar
pub fn floor<E>(operand: E) -> <ShapeOf<E> as MapShape<E, Floor>>::Output
where
    E: Operand,
    ShapeOf<E>: MapShape<E, Floor>,
{
    <ShapeOf<E> as MapShape<E, Floor>>::map(operand)
}

/// Element-wise absolute value of a matrix, vector or scalar
pub fn abs<E>(operand: E) -> <ShapeOf<E> as MapShape<E, Abs>>::Output
where
    E: Operand,
    ShapeOf<E>: MapShape<E, Abs>,
{
    <ShapeOf<E> as MapShape<E, Abs>>::map(operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedVector, DynamicMatrix, DynamicVector};
    use crate::expressions::MatMatMultExpr;
    use crate::typetraits::ColumnMajor;

    #[test]
    fn test_ceil_floor_matrix() {
        let m = DynamicMatrix::<f64>::from_rows(&[[1.5, -1.5], [-0.0, 2.0]]).unwrap();
        let mut out = DynamicMatrix::<f64>::new(2, 2);
        ceil(&m).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[2.0, -1.0, 0.0, 2.0]);
        floor(&m).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[1.0, -2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_map_across_orders_and_modes() {
        let m = DynamicMatrix::<f32, ColumnMajor>::from_fn(2, 3, |i, j| i as f32 - j as f32 - 0.25);
        let mut out = DynamicMatrix::<f32>::new(2, 3);
        floor(&m).assign_to(&mut out);
        abs(&m).add_assign_to(&mut out);
        assert_eq!(out[(0, 0)], -1.0 + 0.25);
        assert_eq!(out[(1, 2)], -2.0 + 1.25);
    }

    #[test]
    fn test_abs_integers_and_scalars() {
        let v = DynamicVector::<i64>::from(vec![-3, 0, 4]);
        let mut out = DynamicVector::<i64>::new(3);
        abs(&v).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[3, 0, 4]);
        assert_eq!(abs(-7i32), 7);
        assert_eq!(ceil(1.25f64), 2.0);
        assert_eq!(floor(-1.25f32), -2.0);
    }

    #[test]
    fn test_sparse_structure_preserved() {
        let s = CompressedVector::<f64>::new(4, vec![1, 3], vec![-0.5, 2.5]).unwrap();
        let mut stored = Vec::new();
        ceil(&s).for_each_stored(|i, v| stored.push((i, v)));
        assert_eq!(stored, vec![(1, -0.0), (3, 3.0)]);
    }

    #[test]
    fn test_map_of_product_materializes() {
        let a = DynamicMatrix::<f64>::from_fn(2, 2, |i, j| 0.5 * (i + j) as f64);
        let b = DynamicMatrix::<f64>::identity(2);
        let mut out = DynamicMatrix::<f64>::new(2, 2);
        ceil(MatMatMultExpr::new(&a, &b)).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[0.0, 1.0, 1.0, 1.0]);
    }
}
