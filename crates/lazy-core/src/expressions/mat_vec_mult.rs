//! Matrix/vector products: `A * x` and `trans(x) * A`

use super::stream::Mode;
use super::{materialize, materialize_vector, MatTransExpr};
use crate::error::precondition;
use crate::resolve::{MultExprCategory, MultTrait};
use crate::simd::kernels;
use crate::traits::{DenseVectorMut, Matrix, Operand, Region, Vector};
use crate::typetraits::{is_sparse, StorageOrder, VectorCategory};

/// `mat * vec` for a column vector `vec`
#[derive(Clone, Copy, Debug)]
pub struct MatVecMultExpr<M, V> {
    mat: M,
    vec: V,
}

impl<M, V> MatVecMultExpr<M, V>
where
    M: Matrix,
    V: Vector<Element = M::Element>,
{
    pub fn new(mat: M, vec: V) -> Self {
        crate::constraint_must_form_valid_matvecmult!(M, V);
        precondition!(
            mat.columns() == vec.size(),
            "cannot multiply a {}x{} matrix by a vector of length {}",
            mat.rows(),
            mat.columns(),
            vec.size()
        );
        Self { mat, vec }
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = M::Element> + ?Sized,
    {
        match (M::REQUIRES_EVALUATION, V::REQUIRES_EVALUATION) {
            (false, false) => mat_vec(&self.mat, &self.vec, target, mode),
            (true, false) => mat_vec(&materialize::<_, M::Order>(&self.mat), &self.vec, target, mode),
            (false, true) => mat_vec(&self.mat, &materialize_vector::<_, V::Orient>(&self.vec), target, mode),
            (true, true) => mat_vec(
                &materialize::<_, M::Order>(&self.mat),
                &materialize_vector::<_, V::Orient>(&self.vec),
                target,
                mode,
            ),
        }
    }
}

impl<M, V> Operand for MatVecMultExpr<M, V>
where
    M: Matrix,
    V: Vector<Element = M::Element>,
    M::Category: MultTrait<V::Category>,
{
    type Element = M::Element;
    type Category = MultExprCategory<M, V>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<M, V> Vector for MatVecMultExpr<M, V>
where
    M: Matrix,
    V: Vector<Element = M::Element>,
    M::Category: MultTrait<V::Category>,
    MultExprCategory<M, V>: VectorCategory,
{
    type Orient = <MultExprCategory<M, V> as VectorCategory>::Orient;
    const SIZE: Option<usize> = M::ROWS;
    const REQUIRES_EVALUATION: bool = true;

    #[inline]
    fn size(&self) -> usize {
        self.mat.rows()
    }

    fn at(&self, i: usize) -> M::Element {
        row_dot(&self.mat, &self.vec, i)
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.mat.is_aliased(region) || self.vec.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        self.is_aliased(region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = M::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

/// `trans(vec) * mat` for a row vector `vec`
#[derive(Clone, Copy, Debug)]
pub struct TVecMatMultExpr<V, M> {
    vec: V,
    mat: M,
}

impl<V, M> TVecMatMultExpr<V, M>
where
    V: Vector,
    M: Matrix<Element = V::Element>,
{
    pub fn new(vec: V, mat: M) -> Self {
        crate::constraint_must_form_valid_tvecmatmult!(V, M);
        precondition!(
            vec.size() == mat.rows(),
            "cannot multiply a vector of length {} by a {}x{} matrix",
            vec.size(),
            mat.rows(),
            mat.columns()
        );
        Self { vec, mat }
    }

    // y = trans(mat) * vec, written as a column product
    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        match (V::REQUIRES_EVALUATION, M::REQUIRES_EVALUATION) {
            (false, false) => mat_vec(&MatTransExpr::new(&self.mat), &self.vec, target, mode),
            (true, false) => mat_vec(
                &MatTransExpr::new(&self.mat),
                &materialize_vector::<_, V::Orient>(&self.vec),
                target,
                mode,
            ),
            (false, true) => mat_vec(
                &MatTransExpr::new(&materialize::<_, M::Order>(&self.mat)),
                &self.vec,
                target,
                mode,
            ),
            (true, true) => mat_vec(
                &MatTransExpr::new(&materialize::<_, M::Order>(&self.mat)),
                &materialize_vector::<_, V::Orient>(&self.vec),
                target,
                mode,
            ),
        }
    }
}

impl<V, M> Operand for TVecMatMultExpr<V, M>
where
    V: Vector,
    M: Matrix<Element = V::Element>,
    V::Category: MultTrait<M::Category>,
{
    type Element = V::Element;
    type Category = MultExprCategory<V, M>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<V, M> Vector for TVecMatMultExpr<V, M>
where
    V: Vector,
    M: Matrix<Element = V::Element>,
    V::Category: MultTrait<M::Category>,
    MultExprCategory<V, M>: VectorCategory,
{
    type Orient = <MultExprCategory<V, M> as VectorCategory>::Orient;
    const SIZE: Option<usize> = M::COLUMNS;
    const REQUIRES_EVALUATION: bool = true;

    #[inline]
    fn size(&self) -> usize {
        self.mat.columns()
    }

    fn at(&self, j: usize) -> V::Element {
        row_dot(&MatTransExpr::new(&self.mat), &self.vec, j)
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.vec.is_aliased(region) || self.mat.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        self.is_aliased(region)
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

/// Row `i` of `m` dotted with `v`
fn row_dot<M, V>(m: &M, v: &V, i: usize) -> M::Element
where
    M: Matrix + ?Sized,
    V: Vector<Element = M::Element> + ?Sized,
{
    let row_major = <M::Order as StorageOrder>::IS_ROW_MAJOR;
    if row_major {
        if let (Some(row), Some(x)) = (m.major_slice(i), v.as_slice()) {
            return kernels::dot(row, x);
        }
    }

    let mut sum = num_traits::zero::<M::Element>();
    if is_sparse::<V>() {
        v.for_each_stored(|k, x| sum += m.at(i, k) * x);
    } else if row_major {
        m.for_each_stored_in(i, |k, a| sum += a * v.at(k));
    } else {
        for k in 0..m.columns() {
            sum += m.at(i, k) * v.at(k);
        }
    }
    sum
}

/// `target (mode) m * v` for operands that are cheap to read.
///
/// Row-major matrices take one dot product per row; column-major ones add
/// `v[j] * column j` into the target for every stored `v[j]`.
fn mat_vec<M, V, D>(m: &M, v: &V, target: &mut D, mode: Mode)
where
    M: Matrix + ?Sized,
    V: Vector<Element = M::Element> + ?Sized,
    D: DenseVectorMut<Element = M::Element> + ?Sized,
{
    if <M::Order as StorageOrder>::IS_ROW_MAJOR {
        for i in 0..m.rows() {
            let value = row_dot(m, v, i);
            let current = target.at(i);
            target.set(i, mode.apply(current, value));
        }
        return;
    }

    if mode == Mode::Assign {
        target.reset();
    }
    let mode = mode.accumulating();
    let zero = num_traits::zero::<M::Element>();
    v.for_each_stored(|j, x| {
        if is_sparse::<V>() && x == zero {
            return;
        }
        if let (Some(column), Some(dst)) = (m.major_slice(j), target.as_mut_slice()) {
            if mode == Mode::Add {
                kernels::axpy(x, column, dst);
            } else {
                kernels::axmy(x, column, dst);
            }
            return;
        }
        m.for_each_stored_in(j, |i, m_ij| {
            let current = target.at(i);
            target.set(i, mode.apply(current, m_ij * x));
        });
    });
}
