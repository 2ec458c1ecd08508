//! Matrix/matrix multiplication

use super::stream::Mode;
use super::transposer::Transposer;
use super::{materialize, MatTransExpr};
use crate::error::precondition;
use crate::resolve::{MultExprCategory, MultTrait};
use crate::simd::kernels;
use crate::traits::{DenseMatrixMut, Matrix, Operand, Region};
use crate::typetraits::{is_sparse, MatrixCategory, StorageOrder};

/// `lhs * rhs`.
///
/// Reading one element costs a full dot product, so the product never streams:
/// it is always evaluated through [`multiply`] (or into a temporary when it
/// appears inside another expression).
#[derive(Clone, Copy, Debug)]
pub struct MatMatMultExpr<L, R> {
    lhs: L,
    rhs: R,
}

impl<L, R> MatMatMultExpr<L, R>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
{
    /// # Panics
    ///
    /// When the inner dimensions differ
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_form_valid_matmatmult!(L, R);
        precondition!(
            lhs.columns() == rhs.rows(),
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            lhs.rows(),
            lhs.columns(),
            rhs.rows(),
            rhs.columns()
        );
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> &L {
        &self.lhs
    }

    pub fn rhs(&self) -> &R {
        &self.rhs
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        match (L::REQUIRES_EVALUATION, R::REQUIRES_EVALUATION) {
            (false, false) => multiply(&self.lhs, &self.rhs, target, mode),
            (true, false) => multiply(&materialize::<_, L::Order>(&self.lhs), &self.rhs, target, mode),
            (false, true) => multiply(&self.lhs, &materialize::<_, R::Order>(&self.rhs), target, mode),
            (true, true) => multiply(
                &materialize::<_, L::Order>(&self.lhs),
                &materialize::<_, R::Order>(&self.rhs),
                target,
                mode,
            ),
        }
    }
}

impl<L, R> Operand for MatMatMultExpr<L, R>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    L::Category: MultTrait<R::Category>,
{
    type Element = L::Element;
    type Category = MultExprCategory<L, R>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<L, R> Matrix for MatMatMultExpr<L, R>
where
    L: Matrix,
    R: Matrix<Element = L::Element>,
    L::Category: MultTrait<R::Category>,
    MultExprCategory<L, R>: MatrixCategory,
{
    type Order = <MultExprCategory<L, R> as MatrixCategory>::Order;
    const ROWS: Option<usize> = L::ROWS;
    const COLUMNS: Option<usize> = R::COLUMNS;
    const REQUIRES_EVALUATION: bool = true;

    #[inline]
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.rhs.columns()
    }

    fn at(&self, i: usize, j: usize) -> L::Element {
        let mut sum = num_traits::zero::<L::Element>();
        if <L::Order as StorageOrder>::IS_ROW_MAJOR {
            self.lhs.for_each_stored_in(i, |k, a| sum += a * self.rhs.at(k, j));
        } else if !<R::Order as StorageOrder>::IS_ROW_MAJOR {
            self.rhs.for_each_stored_in(j, |k, b| sum += self.lhs.at(i, k) * b);
        } else {
            for k in 0..self.lhs.columns() {
                sum += self.lhs.at(i, k) * self.rhs.at(k, j);
            }
        }
        sum
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.lhs.is_aliased(region) || self.rhs.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        self.is_aliased(region)
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

/// `target (mode) a * b` for operands that are cheap to read.
///
/// Column-major targets are handled as `trans(target) = trans(b) * trans(a)`.
pub(crate) fn multiply<A, B, D>(a: &A, b: &B, target: &mut D, mode: Mode)
where
    A: Matrix + ?Sized,
    B: Matrix<Element = A::Element> + ?Sized,
    D: DenseMatrixMut<Element = A::Element> + ?Sized,
{
    if <D::Order as StorageOrder>::IS_ROW_MAJOR {
        multiply_by_rows(a, b, target, mode);
    } else {
        multiply_by_rows(
            &MatTransExpr::new(b),
            &MatTransExpr::new(a),
            &mut Transposer::new(target),
            mode,
        );
    }
}

/// Row `i` of the result accumulates `a[i][k] * row k of b` for every stored
/// `a[i][k]`; rows of `b` and of the target go through the SIMD axpy kernels
/// when both are contiguous.
fn multiply_by_rows<A, B, D>(a: &A, b: &B, target: &mut D, mode: Mode)
where
    A: Matrix + ?Sized,
    B: Matrix<Element = A::Element> + ?Sized,
    D: DenseMatrixMut<Element = A::Element> + ?Sized,
{
    if mode == Mode::Assign {
        target.reset();
    }
    let mode = mode.accumulating();
    let zero = num_traits::zero::<A::Element>();
    // Implicit zeros of sparse operands contribute nothing; dense zeros still
    // multiply, so `0 * inf` reaches the result as NaN
    let sparse_a = is_sparse::<A>();
    let sparse_b = is_sparse::<B>();

    for i in 0..a.rows() {
        let mut accumulate = |k: usize, a_ik: A::Element| {
            if sparse_a && a_ik == zero {
                return;
            }
            if <B::Order as StorageOrder>::IS_ROW_MAJOR {
                if let (Some(src), Some(dst)) = (b.major_slice(k), target.major_slice_mut(i)) {
                    if mode == Mode::Add {
                        kernels::axpy(a_ik, src, dst);
                    } else {
                        kernels::axmy(a_ik, src, dst);
                    }
                    return;
                }
                b.for_each_stored_in(k, |j, b_kj| {
                    let current = target.at(i, j);
                    target.set(i, j, mode.apply(current, a_ik * b_kj));
                });
            } else {
                for j in 0..b.columns() {
                    let b_kj = b.at(k, j);
                    if !sparse_b || b_kj != zero {
                        let current = target.at(i, j);
                        target.set(i, j, mode.apply(current, a_ik * b_kj));
                    }
                }
            }
        };

        if <A::Order as StorageOrder>::IS_ROW_MAJOR {
            a.for_each_stored_in(i, &mut accumulate);
        } else {
            for k in 0..a.columns() {
                accumulate(k, a.at(i, k));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedMatrix, DynamicMatrix};
    use crate::typetraits::{ColumnMajor, RowMajor};
    use approx::assert_relative_eq;

    fn naive(a: &DynamicMatrix<f64>, b: &DynamicMatrix<f64>) -> DynamicMatrix<f64> {
        DynamicMatrix::from_fn(a.rows(), b.columns(), |i, j| (0..a.columns()).map(|k| a[(i, k)] * b[(k, j)]).sum())
    }

    #[test]
    fn test_product_matches_definition() {
        let a = DynamicMatrix::<f64>::from_fn(3, 4, |i, j| (i as f64) - 0.5 * j as f64);
        let b = DynamicMatrix::<f64>::from_fn(4, 2, |i, j| 1.0 + (i * j) as f64);
        let expected = naive(&a, &b);

        let mut row_major = DynamicMatrix::<f64, RowMajor>::new(3, 2);
        MatMatMultExpr::new(&a, &b).assign_to(&mut row_major);
        let mut column_major = DynamicMatrix::<f64, ColumnMajor>::new(3, 2);
        MatMatMultExpr::new(&a, &b).assign_to(&mut column_major);

        for i in 0..3 {
            for j in 0..2 {
                assert_relative_eq!(row_major[(i, j)], expected[(i, j)]);
                assert_relative_eq!(column_major[(i, j)], expected[(i, j)]);
                assert_relative_eq!(MatMatMultExpr::new(&a, &b).at(i, j), expected[(i, j)]);
            }
        }
    }

    #[test]
    fn test_accumulating_products() {
        let a = DynamicMatrix::<i64, ColumnMajor>::from_fn(2, 2, |i, j| (i + j) as i64);
        let b = DynamicMatrix::<i64>::identity(2);
        let mut out = DynamicMatrix::<i64>::from_fn(2, 2, |_, _| 10);
        MatMatMultExpr::new(&a, &b).add_assign_to(&mut out);
        assert_eq!(out.as_slice(), &[10, 11, 11, 12]);
        MatMatMultExpr::new(&a, &b).sub_assign_to(&mut out);
        assert_eq!(out.as_slice(), &[10; 4]);
    }

    #[test]
    fn test_unsigned_subtraction_uses_axmy() {
        let a = DynamicMatrix::<u32>::from_fn(1, 1, |_, _| 2);
        let b = DynamicMatrix::<u32>::from_fn(1, 3, |_, j| j as u32);
        let mut out = DynamicMatrix::<u32>::from_fn(1, 3, |_, _| 9);
        MatMatMultExpr::new(&a, &b).sub_assign_to(&mut out);
        assert_eq!(out.as_slice(), &[9, 7, 5]);
    }

    #[test]
    fn test_sparse_operands() {
        let s = CompressedMatrix::<f64>::from_triplets(2, 3, &[(0, 1, 2.0), (1, 2, -1.0)]).unwrap();
        let d = DynamicMatrix::<f64, ColumnMajor>::from_fn(3, 2, |i, j| (i * 2 + j) as f64);
        let mut out = DynamicMatrix::<f64>::new(2, 2);
        MatMatMultExpr::new(&s, &d).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[4.0, 6.0, -4.0, -5.0]);

        let t = CompressedMatrix::<f64, ColumnMajor>::from_expr(&d);
        let mut out = DynamicMatrix::<f64, ColumnMajor>::new(2, 2);
        MatMatMultExpr::new(&s, &t).assign_to(&mut out);
        assert_eq!(out[(0, 0)], 4.0);
        assert_eq!(out[(1, 1)], -5.0);
    }

    #[test]
    fn test_nested_products_materialize() {
        let a = DynamicMatrix::<f64>::identity(2);
        let b = DynamicMatrix::<f64>::from_fn(2, 2, |i, j| (i + 3 * j) as f64);
        let inner = MatMatMultExpr::new(&a, &b);
        let outer = MatMatMultExpr::new(inner, &a);
        let mut out = DynamicMatrix::<f64>::new(2, 2);
        outer.assign_to(&mut out);
        assert_eq!(out, b);
    }

    #[test]
    fn test_dense_zero_times_infinity_is_nan() {
        let a = DynamicMatrix::<f64>::from_rows(&[[0.0, 1.0]]).unwrap();
        let b = DynamicMatrix::<f64>::from_rows(&[[f64::INFINITY], [2.0]]).unwrap();

        let mut row_major = DynamicMatrix::<f64, RowMajor>::new(1, 1);
        MatMatMultExpr::new(&a, &b).assign_to(&mut row_major);
        assert!(row_major[(0, 0)].is_nan());

        let mut column_major = DynamicMatrix::<f64, ColumnMajor>::new(1, 1);
        MatMatMultExpr::new(&a, &b).assign_to(&mut column_major);
        assert!(column_major[(0, 0)].is_nan());

        let b = DynamicMatrix::<f64, ColumnMajor>::from_expr(&b);
        assert!(MatMatMultExpr::new(&a, &b).at(0, 0).is_nan());
    }

    #[test]
    fn test_sparse_implicit_zero_skips_infinity() {
        let a = CompressedMatrix::<f64>::from_triplets(1, 2, &[(0, 1, 1.0)]).unwrap();
        let b = DynamicMatrix::<f64>::from_rows(&[[f64::INFINITY], [2.0]]).unwrap();
        let mut out = DynamicMatrix::<f64>::new(1, 1);
        MatMatMultExpr::new(&a, &b).assign_to(&mut out);
        assert_eq!(out[(0, 0)], 2.0);
    }

    #[test]
    #[should_panic(expected = "cannot multiply")]
    fn test_inner_dimension_mismatch_panics() {
        let a = DynamicMatrix::<f64>::new(2, 3);
        let b = DynamicMatrix::<f64>::new(2, 3);
        let _ = MatMatMultExpr::new(&a, &b);
    }
}
