//! Expression nodes and the assignment entry points
//!
//! Operators build nested proxies; nothing is computed until a proxy is
//! assigned into a container through [`assign`], [`add_assign`] or
//! [`sub_assign`] (or their vector counterparts). Those check shapes, decide
//! whether the target overlaps anything the expression still has to read,
//! and hand over to the expression's `assign_to` family.

mod additive;
mod cross;
mod map;
mod mat_mat_mult;
mod mat_trans;
mod mat_vec_mult;
mod ops;
mod outer;
mod scalar_mult;
pub(crate) mod stream;
mod transposer;
mod vec_trans;
mod vec_vec_mult;

pub use additive::{AdditiveCategory, AdditiveOp, MatMatAddExpr, MatMatAdditiveExpr, MatMatSubExpr, Minus, Plus};
pub use additive::{VecVecAddExpr, VecVecAdditiveExpr, VecVecSubExpr};
pub use cross::{cross, CrossExpr};
pub use map::{abs, ceil, floor, Abs, Ceil, Floor, MapShape, MatMapExpr, UnaryOp, VecMapExpr};
pub use mat_mat_mult::MatMatMultExpr;
pub use mat_trans::MatTransExpr;
pub use mat_vec_mult::{MatVecMultExpr, TVecMatMultExpr};
pub use ops::{inner, trans, AddShape, MultShape, ShapeOf, SubShape, Transpose};
pub use outer::OuterExpr;
pub use scalar_mult::{MatScalarMultExpr, VecScalarMultExpr};
pub use transposer::Transposer;
pub use vec_trans::VecTransExpr;
pub use vec_vec_mult::VecVecMultExpr;

use crate::containers::{DynamicMatrix, DynamicVector};
use crate::error::precondition;
use crate::traits::{DenseMatrixMut, DenseVectorMut, Matrix, Region, Vector};
use stream::Mode;

/// `target = expr`
///
/// # Panics
///
/// When the shapes differ. Assignment never resizes the target.
pub fn assign<D, E>(target: &mut D, expr: &E)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    assign_matrix_with(target, expr, Mode::Assign);
}

/// `target += expr`
pub fn add_assign<D, E>(target: &mut D, expr: &E)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    assign_matrix_with(target, expr, Mode::Add);
}

/// `target -= expr`
pub fn sub_assign<D, E>(target: &mut D, expr: &E)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    assign_matrix_with(target, expr, Mode::Sub);
}

/// `target = expr` for vectors
pub fn assign_vector<D, E>(target: &mut D, expr: &E)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    assign_vector_with(target, expr, Mode::Assign);
}

pub fn add_assign_vector<D, E>(target: &mut D, expr: &E)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    assign_vector_with(target, expr, Mode::Add);
}

pub fn sub_assign_vector<D, E>(target: &mut D, expr: &E)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    assign_vector_with(target, expr, Mode::Sub);
}

fn assign_matrix_with<D, E>(target: &mut D, expr: &E, mode: Mode)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    crate::constraint_must_form_valid_matmatadd!(D, E);
    precondition!(
        target.rows() == expr.rows() && target.columns() == expr.columns(),
        "cannot assign a {}x{} expression to a {}x{} matrix",
        expr.rows(),
        expr.columns(),
        target.rows(),
        target.columns()
    );

    if expr.can_alias(target.region()) {
        log::trace!(
            "{}x{} target aliases an operand, evaluating into a temporary",
            target.rows(),
            target.columns()
        );
        let mut temp = DynamicMatrix::<D::Element, D::Order>::new(expr.rows(), expr.columns());
        expr.assign_to(&mut temp);
        mode.matrix_into(&temp, target);
        return;
    }
    mode.matrix_into(expr, target);
}

fn assign_vector_with<D, E>(target: &mut D, expr: &E, mode: Mode)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    crate::constraint_must_form_valid_vecvecop!(D, E);
    crate::constraint_must_have_same_orientation!(D, E);
    precondition!(
        target.size() == expr.size(),
        "cannot assign an expression of length {} to a vector of length {}",
        expr.size(),
        target.size()
    );

    if expr.can_alias(target.region()) {
        log::trace!("length-{} target aliases an operand, evaluating into a temporary", target.size());
        let mut temp = DynamicVector::<D::Element, D::Orient>::new(expr.size());
        expr.assign_to(&mut temp);
        mode.vector_into(&temp, target);
        return;
    }
    mode.vector_into(expr, target);
}

/// Whether an operand of an element-wise node could read data the node has
/// already overwritten. A container is safe only when it occupies the target's
/// storage exactly; any other overlap (an offset view, the other storage order)
/// reads elements the node has yet to write.
#[inline]
pub(crate) fn matrix_operand_can_alias<M: Matrix + ?Sized>(operand: &M, region: Region) -> bool {
    if !M::IS_EXPRESSION {
        return operand.is_aliased(region) && !operand.occupies(region);
    }
    if M::REQUIRES_EVALUATION {
        operand.is_aliased(region)
    } else {
        operand.can_alias(region)
    }
}

#[inline]
pub(crate) fn vector_operand_can_alias<V: Vector + ?Sized>(operand: &V, region: Region) -> bool {
    if !V::IS_EXPRESSION {
        return operand.is_aliased(region) && !operand.occupies(region);
    }
    if V::REQUIRES_EVALUATION {
        operand.is_aliased(region)
    } else {
        operand.can_alias(region)
    }
}

/// Evaluate a matrix operand that is too expensive to read element by element
pub(crate) fn materialize<M, SO>(operand: &M) -> DynamicMatrix<M::Element, SO>
where
    M: Matrix + ?Sized,
    SO: crate::typetraits::StorageOrder,
{
    log::trace!("materializing {}x{} operand", operand.rows(), operand.columns());
    DynamicMatrix::from_expr(operand)
}

pub(crate) fn materialize_vector<V, O>(operand: &V) -> DynamicVector<V::Element, O>
where
    V: Vector + ?Sized,
    O: crate::typetraits::Orientation,
{
    log::trace!("materializing length-{} operand", operand.size());
    DynamicVector::from_expr(operand)
}
