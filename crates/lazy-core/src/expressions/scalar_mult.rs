//! Scaling by a scalar

use super::stream::{stream_scaled_matrix, stream_scaled_vector, Mode};
use super::{materialize, materialize_vector, matrix_operand_can_alias, vector_operand_can_alias};
use crate::traits::{DenseMatrixMut, DenseVectorMut, Matrix, Operand, Region, Vector};

/// `operand * scalar` (and `scalar * operand`) for a matrix operand
#[derive(Clone, Copy, Debug)]
pub struct MatScalarMultExpr<M: Matrix> {
    operand: M,
    scalar: M::Element,
}

impl<M: Matrix> MatScalarMultExpr<M> {
    pub fn new(operand: M, scalar: M::Element) -> Self {
        Self { operand, scalar }
    }

    pub fn scalar(&self) -> M::Element {
        self.scalar
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        if !M::REQUIRES_EVALUATION {
            stream_scaled_matrix(target, &self.operand, self.scalar, mode);
        } else if mode == Mode::Assign {
            self.operand.assign_to(target);
            target.scale(self.scalar);
        } else {
            let temp = materialize::<_, D::Order>(&self.operand);
            stream_scaled_matrix(target, &temp, self.scalar, mode);
        }
    }
}

impl<M: Matrix> Operand for MatScalarMultExpr<M> {
    type Element = M::Element;
    type Category = M::Category;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<M: Matrix> Matrix for MatScalarMultExpr<M> {
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
        self.operand.at(i, j) * self.scalar
    }

    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, M::Element),
    {
        let scalar = self.scalar;
        self.operand.for_each_stored_in(major, |minor, value| f(minor, value * scalar));
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

/// `operand * scalar` (and `scalar * operand`) for a vector operand
#[derive(Clone, Copy, Debug)]
pub struct VecScalarMultExpr<V: Vector> {
    operand: V,
    scalar: V::Element,
}

impl<V: Vector> VecScalarMultExpr<V> {
    pub fn new(operand: V, scalar: V::Element) -> Self {
        Self { operand, scalar }
    }

    pub fn scalar(&self) -> V::Element {
        self.scalar
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        if !V::REQUIRES_EVALUATION {
            stream_scaled_vector(target, &self.operand, self.scalar, mode);
        } else if mode == Mode::Assign {
            self.operand.assign_to(target);
            target.scale(self.scalar);
        } else {
            let temp = materialize_vector::<_, V::Orient>(&self.operand);
            stream_scaled_vector(target, &temp, self.scalar, mode);
        }
    }
}

impl<V: Vector> Operand for VecScalarMultExpr<V> {
    type Element = V::Element;
    type Category = V::Category;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<V: Vector> Vector for VecScalarMultExpr<V> {
    type Orient = V::Orient;
    const SIZE: Option<usize> = V::SIZE;
    const REQUIRES_EVALUATION: bool = V::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        self.operand.size()
    }

    #[inline]
    fn at(&self, i: usize) -> V::Element {
        self.operand.at(i) * self.scalar
    }

    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, V::Element),
    {
        let scalar = self.scalar;
        self.operand.for_each_stored(|i, value| f(i, value * scalar));
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
