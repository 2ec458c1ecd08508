//! Element-wise addition and subtraction

use super::stream::{stream_matrix, stream_vector, Mode};
use super::{matrix_operand_can_alias, vector_operand_can_alias};
use crate::error::precondition;
use crate::numeric::Numeric;
use crate::resolve::{AddTrait, SubTrait};
use crate::simd::kernels;
use crate::traits::{DenseMatrixMut, DenseVectorMut, Matrix, Operand, Region, Vector};
use crate::typetraits::{merge_dims, Category, MatrixCategory, StorageOrder, VectorCategory};
use std::fmt::Debug;
use std::marker::PhantomData;

/// `+` or `-`
pub trait AdditiveOp: Copy + Default + Debug + 'static {
    const NEGATE: bool;

    #[inline(always)]
    fn combine<T: Numeric>(a: T, b: T) -> T {
        if Self::NEGATE {
            a - b
        } else {
            a + b
        }
    }

    fn combine_slices<T: Numeric>(a: &[T], b: &[T], out: &mut [T]) {
        if Self::NEGATE {
            kernels::sub(a, b, out)
        } else {
            kernels::add(a, b, out)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Plus;

#[derive(Clone, Copy, Debug, Default)]
pub struct Minus;

impl AdditiveOp for Plus {
    const NEGATE: bool = false;
}

impl AdditiveOp for Minus {
    const NEGATE: bool = true;
}

/// Result category of `A op B`
pub trait AdditiveCategory<A: Category, B: Category> {
    type Output: Category;
}

impl<A: AddTrait<B>, B: Category> AdditiveCategory<A, B> for Plus {
    type Output = <A as AddTrait<B>>::Output;
}

impl<A: SubTrait<B>, B: Category> AdditiveCategory<A, B> for Minus {
    type Output = <A as SubTrait<B>>::Output;
}

type CategoryOf<L, R, Op> = <Op as AdditiveCategory<<L as Operand>::Category, <R as Operand>::Category>>::Output;

/// Mode of the second operand once the first has been written
fn second_mode<Op: AdditiveOp>(mode: Mode) -> Mode {
    if Op::NEGATE {
        mode.negated()
    } else {
        mode.accumulating()
    }
}

/// `lhs + rhs` or `lhs - rhs` for two matrices of the same shape
#[derive(Clone, Copy, Debug)]
pub struct MatMatAdditiveExpr<L, R, Op> {
    lhs: L,
    rhs: R,
    op: PhantomData<Op>,
}

pub type MatMatAddExpr<L, R> = MatMatAdditiveExpr<L, R, Plus>;
pub type MatMatSubExpr<L, R> = MatMatAdditiveExpr<L, R, Minus>;

impl<L, R, Op> MatMatAdditiveExpr<L, R, Op>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    Op: AdditiveOp,
{
    /// # Panics
    ///
    /// When the operand shapes differ
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_form_valid_matmatadd!(L, R);
        precondition!(
            lhs.rows() == rhs.rows() && lhs.columns() == rhs.columns(),
            "cannot combine a {}x{} matrix with a {}x{} matrix",
            lhs.rows(),
            lhs.columns(),
            rhs.rows(),
            rhs.columns()
        );
        Self {
            lhs,
            rhs,
            op: PhantomData,
        }
    }

    pub fn lhs(&self) -> &L {
        &self.lhs
    }

    pub fn rhs(&self) -> &R {
        &self.rhs
    }
}

impl<L, R, Op> MatMatAdditiveExpr<L, R, Op>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
    CategoryOf<L, R, Op>: MatrixCategory,
{
    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        if Self::REQUIRES_EVALUATION {
            mode.matrix_into(&self.lhs, target);
            second_mode::<Op>(mode).matrix_into(&self.rhs, target);
            return;
        }

        let same_order = <D::Order as StorageOrder>::IS_ROW_MAJOR == <L::Order as StorageOrder>::IS_ROW_MAJOR
            && <L::Order as StorageOrder>::IS_ROW_MAJOR == <R::Order as StorageOrder>::IS_ROW_MAJOR;
        if !same_order || self.is_aliased(target.region()) {
            stream_matrix(target, self, mode);
            return;
        }
        for major in 0..target.major_len() {
            match (self.lhs.major_slice(major), self.rhs.major_slice(major), target.major_slice_mut(major)) {
                (Some(a), Some(b), Some(dst)) => {
                    if mode == Mode::Assign {
                        Op::combine_slices(a, b, dst);
                    } else {
                        mode.update_slice(dst, a);
                        second_mode::<Op>(mode).update_slice(dst, b);
                    }
                }
                _ => {
                    for minor in 0..target.minor_len() {
                        let (i, j) = crate::traits::ij::<D::Order>(major, minor);
                        let value = self.at(i, j);
                        let current = target.at(i, j);
                        target.set(i, j, mode.apply(current, value));
                    }
                }
            }
        }
    }
}

impl<L, R, Op> Operand for MatMatAdditiveExpr<L, R, Op>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
{
    type Element = L::Element;
    type Category = CategoryOf<L, R, Op>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<L, R, Op> Matrix for MatMatAdditiveExpr<L, R, Op>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
    CategoryOf<L, R, Op>: MatrixCategory,
{
    type Order = <CategoryOf<L, R, Op> as MatrixCategory>::Order;
    const ROWS: Option<usize> = merge_dims(L::ROWS, R::ROWS);
    const COLUMNS: Option<usize> = merge_dims(L::COLUMNS, R::COLUMNS);
    const REQUIRES_EVALUATION: bool = L::REQUIRES_EVALUATION || R::REQUIRES_EVALUATION;

    #[inline]
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.lhs.columns()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> L::Element {
        Op::combine(self.lhs.at(i, j), self.rhs.at(i, j))
    }

    /// Sparse sums merge the stored entries of both operands
    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, L::Element),
    {
        let aligned = <Self::Order as StorageOrder>::IS_ROW_MAJOR == <L::Order as StorageOrder>::IS_ROW_MAJOR
            && <Self::Order as StorageOrder>::IS_ROW_MAJOR == <R::Order as StorageOrder>::IS_ROW_MAJOR;
        if !<CategoryOf<L, R, Op> as MatrixCategory>::IS_DENSE && aligned {
            let mut lhs = Vec::new();
            let mut rhs = Vec::new();
            self.lhs.for_each_stored_in(major, |minor, value| lhs.push((minor, value)));
            self.rhs.for_each_stored_in(major, |minor, value| rhs.push((minor, value)));
            merge_sorted::<_, Op, _>(&lhs, &rhs, f);
            return;
        }
        for minor in 0..self.minor_len() {
            f(minor, self.at_major(major, minor));
        }
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.lhs.is_aliased(region) || self.rhs.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        matrix_operand_can_alias(&self.lhs, region)
            || matrix_operand_can_alias(&self.rhs, region)
            || (Self::REQUIRES_EVALUATION && self.rhs.is_aliased(region))
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

/// Visit the union of two index-sorted entry lists, combining coinciding entries
fn merge_sorted<T, Op, F>(lhs: &[(usize, T)], rhs: &[(usize, T)], mut f: F)
where
    T: Numeric,
    Op: AdditiveOp,
    F: FnMut(usize, T),
{
    let (mut a, mut b) = (0, 0);
    while a < lhs.len() || b < rhs.len() {
        match (lhs.get(a), rhs.get(b)) {
            (Some(&(i, x)), Some(&(j, y))) if i == j => {
                f(i, Op::combine(x, y));
                a += 1;
                b += 1;
            }
            (Some(&(i, x)), Some(&(j, _))) if i < j => {
                f(i, x);
                a += 1;
            }
            (Some(&(i, x)), None) => {
                f(i, x);
                a += 1;
            }
            (_, Some(&(j, y))) => {
                f(j, Op::combine(T::zero(), y));
                b += 1;
            }
            (None, None) => break,
        }
    }
}

/// `lhs + rhs` or `lhs - rhs` for two vectors of the same orientation and length
#[derive(Clone, Copy, Debug)]
pub struct VecVecAdditiveExpr<L, R, Op> {
    lhs: L,
    rhs: R,
    op: PhantomData<Op>,
}

pub type VecVecAddExpr<L, R> = VecVecAdditiveExpr<L, R, Plus>;
pub type VecVecSubExpr<L, R> = VecVecAdditiveExpr<L, R, Minus>;

impl<L, R, Op> VecVecAdditiveExpr<L, R, Op>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    Op: AdditiveOp,
{
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_form_valid_vecvecop!(L, R);
        precondition!(
            lhs.size() == rhs.size(),
            "cannot combine vectors of length {} and {}",
            lhs.size(),
            rhs.size()
        );
        Self {
            lhs,
            rhs,
            op: PhantomData,
        }
    }
}

impl<L, R, Op> VecVecAdditiveExpr<L, R, Op>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
    CategoryOf<L, R, Op>: VectorCategory,
{
    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        if Self::REQUIRES_EVALUATION {
            mode.vector_into(&self.lhs, target);
            second_mode::<Op>(mode).vector_into(&self.rhs, target);
            return;
        }
        if !self.is_aliased(target.region()) {
            if let (Some(a), Some(b), Some(dst)) = (self.lhs.as_slice(), self.rhs.as_slice(), target.as_mut_slice()) {
                if mode == Mode::Assign {
                    Op::combine_slices(a, b, dst);
                } else {
                    mode.update_slice(dst, a);
                    second_mode::<Op>(mode).update_slice(dst, b);
                }
                return;
            }
        }
        stream_vector(target, self, mode);
    }
}

impl<L, R, Op> Operand for VecVecAdditiveExpr<L, R, Op>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
{
    type Element = L::Element;
    type Category = CategoryOf<L, R, Op>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<L, R, Op> Vector for VecVecAdditiveExpr<L, R, Op>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    Op: AdditiveOp + AdditiveCategory<L::Category, R::Category>,
    CategoryOf<L, R, Op>: VectorCategory,
{
    type Orient = <CategoryOf<L, R, Op> as VectorCategory>::Orient;
    const SIZE: Option<usize> = merge_dims(L::SIZE, R::SIZE);
    const REQUIRES_EVALUATION: bool = L::REQUIRES_EVALUATION || R::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        self.lhs.size()
    }

    #[inline]
    fn at(&self, i: usize) -> L::Element {
        Op::combine(self.lhs.at(i), self.rhs.at(i))
    }

    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, L::Element),
    {
        if !<CategoryOf<L, R, Op> as VectorCategory>::IS_DENSE {
            let mut lhs = Vec::new();
            let mut rhs = Vec::new();
            self.lhs.for_each_stored(|i, value| lhs.push((i, value)));
            self.rhs.for_each_stored(|i, value| rhs.push((i, value)));
            merge_sorted::<_, Op, _>(&lhs, &rhs, f);
            return;
        }
        for i in 0..self.size() {
            f(i, self.at(i));
        }
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.lhs.is_aliased(region) || self.rhs.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        vector_operand_can_alias(&self.lhs, region)
            || vector_operand_can_alias(&self.rhs, region)
            || (Self::REQUIRES_EVALUATION && self.rhs.is_aliased(region))
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}
