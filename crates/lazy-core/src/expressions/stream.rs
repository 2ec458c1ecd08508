//! Element streaming: the default way an expression reaches its target

use crate::numeric::Numeric;
use crate::simd::kernels;
use crate::traits::{ij, DenseMatrixMut, DenseVectorMut, Matrix, Vector};
use crate::typetraits::{is_sparse, StorageOrder};

/// How a computed value combines with what the target already holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Assign,
    Add,
    Sub,
}

impl Mode {
    #[inline(always)]
    pub(crate) fn apply<T: Numeric>(self, current: T, value: T) -> T {
        match self {
            Mode::Assign => value,
            Mode::Add => current + value,
            Mode::Sub => current - value,
        }
    }

    /// Mode for a term that enters the result negated
    pub(crate) fn negated(self) -> Mode {
        match self {
            Mode::Assign | Mode::Add => Mode::Sub,
            Mode::Sub => Mode::Add,
        }
    }

    /// Mode for every term after the first one has been written
    pub(crate) fn accumulating(self) -> Mode {
        match self {
            Mode::Assign => Mode::Add,
            other => other,
        }
    }

    pub(crate) fn update_slice<T: Numeric>(self, dst: &mut [T], src: &[T]) {
        match self {
            Mode::Assign => dst.copy_from_slice(src),
            Mode::Add => kernels::add_assign(dst, src),
            Mode::Sub => kernels::sub_assign(dst, src),
        }
    }

    /// `dst (mode) alpha * src`
    pub(crate) fn update_scaled<T: Numeric>(self, alpha: T, dst: &mut [T], src: &[T]) {
        match self {
            Mode::Assign => kernels::scale(alpha, src, dst),
            Mode::Add => kernels::axpy(alpha, src, dst),
            Mode::Sub => kernels::axmy(alpha, src, dst),
        }
    }

    /// Route a matrix operand through its own assignment method
    pub(crate) fn matrix_into<D, E>(self, expr: &E, target: &mut D)
    where
        D: DenseMatrixMut + ?Sized,
        E: Matrix<Element = D::Element> + ?Sized,
    {
        match self {
            Mode::Assign => expr.assign_to(target),
            Mode::Add => expr.add_assign_to(target),
            Mode::Sub => expr.sub_assign_to(target),
        }
    }

    pub(crate) fn vector_into<D, E>(self, expr: &E, target: &mut D)
    where
        D: DenseVectorMut + ?Sized,
        E: Vector<Element = D::Element> + ?Sized,
    {
        match self {
            Mode::Assign => expr.assign_to(target),
            Mode::Add => expr.add_assign_to(target),
            Mode::Sub => expr.sub_assign_to(target),
        }
    }
}

/// Write `expr` into `target` element by element, using whole rows/columns
/// where both sides are contiguous and cannot overlap
pub(crate) fn stream_matrix<D, E>(target: &mut D, expr: &E, mode: Mode)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    if is_sparse::<E>() {
        scatter_matrix(target, expr, mode);
        return;
    }

    let same_order = <D::Order as StorageOrder>::IS_ROW_MAJOR == <E::Order as StorageOrder>::IS_ROW_MAJOR;
    let contiguous = same_order && !expr.is_aliased(target.region());

    for major in 0..target.major_len() {
        if contiguous {
            if let (Some(src), Some(dst)) = (expr.major_slice(major), target.major_slice_mut(major)) {
                mode.update_slice(dst, src);
                continue;
            }
        }
        for minor in 0..target.minor_len() {
            let (i, j) = ij::<D::Order>(major, minor);
            let value = expr.at(i, j);
            let current = target.at(i, j);
            target.set(i, j, mode.apply(current, value));
        }
    }
}

/// Sparse operands only visit their non-zeros
fn scatter_matrix<D, E>(target: &mut D, expr: &E, mode: Mode)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    if mode == Mode::Assign {
        target.reset();
    }
    let mode = mode.accumulating();
    for major in 0..expr.major_len() {
        expr.for_each_stored_in(major, |minor, value| {
            let (i, j) = ij::<E::Order>(major, minor);
            let current = target.at(i, j);
            target.set(i, j, mode.apply(current, value));
        });
    }
}

/// `target (mode) src * alpha`
pub(crate) fn stream_scaled_matrix<D, E>(target: &mut D, src: &E, alpha: D::Element, mode: Mode)
where
    D: DenseMatrixMut + ?Sized,
    E: Matrix<Element = D::Element> + ?Sized,
{
    if is_sparse::<E>() {
        if mode == Mode::Assign {
            target.reset();
        }
        let mode = mode.accumulating();
        for major in 0..src.major_len() {
            src.for_each_stored_in(major, |minor, value| {
                let (i, j) = ij::<E::Order>(major, minor);
                let current = target.at(i, j);
                target.set(i, j, mode.apply(current, value * alpha));
            });
        }
        return;
    }

    let same_order = <D::Order as StorageOrder>::IS_ROW_MAJOR == <E::Order as StorageOrder>::IS_ROW_MAJOR;
    let contiguous = same_order && !src.is_aliased(target.region());
    for major in 0..target.major_len() {
        if contiguous {
            if let (Some(values), Some(dst)) = (src.major_slice(major), target.major_slice_mut(major)) {
                mode.update_scaled(alpha, dst, values);
                continue;
            }
        }
        for minor in 0..target.minor_len() {
            let (i, j) = ij::<D::Order>(major, minor);
            let value = src.at(i, j) * alpha;
            let current = target.at(i, j);
            target.set(i, j, mode.apply(current, value));
        }
    }
}

/// `target (mode) src * alpha` for vectors
pub(crate) fn stream_scaled_vector<D, E>(target: &mut D, src: &E, alpha: D::Element, mode: Mode)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    if is_sparse::<E>() {
        if mode == Mode::Assign {
            target.reset();
        }
        let mode = mode.accumulating();
        src.for_each_stored(|i, value| {
            let current = target.at(i);
            target.set(i, mode.apply(current, value * alpha));
        });
        return;
    }

    if !src.is_aliased(target.region()) {
        if let (Some(values), Some(dst)) = (src.as_slice(), target.as_mut_slice()) {
            mode.update_scaled(alpha, dst, values);
            return;
        }
    }
    for i in 0..target.size() {
        let value = src.at(i) * alpha;
        let current = target.at(i);
        target.set(i, mode.apply(current, value));
    }
}

/// Vector counterpart of [`stream_matrix`]
pub(crate) fn stream_vector<D, E>(target: &mut D, expr: &E, mode: Mode)
where
    D: DenseVectorMut + ?Sized,
    E: Vector<Element = D::Element> + ?Sized,
{
    if is_sparse::<E>() {
        if mode == Mode::Assign {
            target.reset();
        }
        let mode = mode.accumulating();
        expr.for_each_stored(|i, value| {
            let current = target.at(i);
            target.set(i, mode.apply(current, value));
        });
        return;
    }

    if !expr.is_aliased(target.region()) {
        if let (Some(src), Some(dst)) = (expr.as_slice(), target.as_mut_slice()) {
            mode.update_slice(dst, src);
            return;
        }
    }
    for i in 0..target.size() {
        let value = expr.at(i);
        let current = target.at(i);
        target.set(i, mode.apply(current, value));
    }
}
