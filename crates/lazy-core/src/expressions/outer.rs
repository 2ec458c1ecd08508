//! Outer product: column vector times row vector

use super::stream::Mode;
use super::{materialize_vector, Transposer};
use crate::resolve::{MultExprCategory, MultTrait};
use crate::traits::{DenseMatrixMut, Matrix, Operand, Region, Vector};
use crate::typetraits::{is_sparse, MatrixCategory, StorageOrder};

/// `lhs * rhs` for a column vector `lhs` and a row vector `rhs`;
/// element (i, j) is `lhs[i] * rhs[j]`
#[derive(Clone, Copy, Debug)]
pub struct OuterExpr<L, R> {
    lhs: L,
    rhs: R,
}

impl<L, R> OuterExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
{
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_be_vector!(L);
        crate::constraint_must_be_vector!(R);
        Self { lhs, rhs }
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = L::Element> + ?Sized,
    {
        let region = target.region();
        let aliased = self.lhs.is_aliased(region) || self.rhs.is_aliased(region);
        match (L::REQUIRES_EVALUATION || aliased, R::REQUIRES_EVALUATION || aliased) {
            (false, false) => outer_into(&self.lhs, &self.rhs, target, mode),
            (true, false) => outer_into(&materialize_vector::<_, L::Orient>(&self.lhs), &self.rhs, target, mode),
            (false, true) => outer_into(&self.lhs, &materialize_vector::<_, R::Orient>(&self.rhs), target, mode),
            (true, true) => outer_into(
                &materialize_vector::<_, L::Orient>(&self.lhs),
                &materialize_vector::<_, R::Orient>(&self.rhs),
                target,
                mode,
            ),
        }
    }
}

impl<L, R> Operand for OuterExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: MultTrait<R::Category>,
{
    type Element = L::Element;
    type Category = MultExprCategory<L, R>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<L, R> Matrix for OuterExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: MultTrait<R::Category>,
    MultExprCategory<L, R>: MatrixCategory,
{
    type Order = <MultExprCategory<L, R> as MatrixCategory>::Order;
    const ROWS: Option<usize> = L::SIZE;
    const COLUMNS: Option<usize> = R::SIZE;
    const REQUIRES_EVALUATION: bool = L::REQUIRES_EVALUATION || R::REQUIRES_EVALUATION;

    #[inline]
    fn rows(&self) -> usize {
        self.lhs.size()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.rhs.size()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> L::Element {
        self.lhs.at(i) * self.rhs.at(j)
    }

    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, L::Element),
    {
        let zero = num_traits::zero::<L::Element>();
        if <Self::Order as StorageOrder>::IS_ROW_MAJOR {
            let a = self.lhs.at(major);
            if is_sparse::<L>() && a == zero {
                return;
            }
            self.rhs.for_each_stored(|j, b| f(j, a * b));
        } else {
            let b = self.rhs.at(major);
            if is_sparse::<R>() && b == zero {
                return;
            }
            self.lhs.for_each_stored(|i, a| f(i, a * b));
        }
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

/// `target (mode) a * b`; a column-major target is filled as the transposed
/// product `b * a` through a row-major view
fn outer_into<A, B, D>(a: &A, b: &B, target: &mut D, mode: Mode)
where
    A: Vector + ?Sized,
    B: Vector<Element = A::Element> + ?Sized,
    D: DenseMatrixMut<Element = A::Element> + ?Sized,
{
    if <D::Order as StorageOrder>::IS_ROW_MAJOR {
        outer_by_rows(a, b, target, mode);
    } else {
        outer_by_rows(b, a, &mut Transposer::new(target), mode);
    }
}

/// Row `i` of the target becomes `a[i] * b`
fn outer_by_rows<A, B, D>(a: &A, b: &B, target: &mut D, mode: Mode)
where
    A: Vector + ?Sized,
    B: Vector<Element = A::Element> + ?Sized,
    D: DenseMatrixMut<Element = A::Element> + ?Sized,
{
    let zero = num_traits::zero::<A::Element>();
    let sparse_column = is_sparse::<A>();
    let sparse_row = is_sparse::<B>();
    for i in 0..target.rows() {
        let alpha = a.at(i);
        if sparse_column && alpha == zero && mode != Mode::Assign {
            continue;
        }

        if let (Some(src), Some(dst)) = (b.as_slice(), target.major_slice_mut(i)) {
            mode.update_scaled(alpha, dst, src);
            continue;
        }

        if sparse_row {
            if mode == Mode::Assign {
                for j in 0..target.columns() {
                    target.set(i, j, zero);
                }
            }
            let mode = mode.accumulating();
            b.for_each_stored(|j, value| {
                let current = target.at(i, j);
                target.set(i, j, mode.apply(current, alpha * value));
            });
            continue;
        }

        for j in 0..target.columns() {
            let current = target.at(i, j);
            target.set(i, j, mode.apply(current, alpha * b.at(j)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedVector, DynamicMatrix, DynamicVector, StaticVector};
    use crate::expressions::VecTransExpr;
    use crate::typetraits::{ColumnMajor, RowVector};

    #[test]
    fn test_outer_into_both_orders() {
        let x = DynamicVector::<f64>::from(vec![1.0, 2.0]);
        let y = DynamicVector::<f64, RowVector>::from(vec![3.0, 4.0, 5.0]);
        let expected = [[3.0, 4.0, 5.0], [6.0, 8.0, 10.0]];

        let mut row = DynamicMatrix::<f64>::new(2, 3);
        let mut col = DynamicMatrix::<f64, ColumnMajor>::new(2, 3);
        OuterExpr::new(&x, &y).assign_to(&mut row);
        OuterExpr::new(&x, &y).assign_to(&mut col);
        for (i, expected_row) in expected.iter().enumerate() {
            for (j, &value) in expected_row.iter().enumerate() {
                assert_eq!(row[(i, j)], value);
                assert_eq!(col[(i, j)], value);
            }
        }
    }

    #[test]
    fn test_accumulating_modes() {
        let x = StaticVector::<i64, 2>::new([1, -1]);
        let y = DynamicVector::<i64>::from(vec![2, 3]);
        let outer = OuterExpr::new(&x, VecTransExpr::new(&y));
        let mut m = DynamicMatrix::<i64>::from_rows(&[[1, 1], [1, 1]]).unwrap();
        outer.add_assign_to(&mut m);
        assert_eq!(m.as_slice(), &[3, 4, -1, -2]);
        outer.sub_assign_to(&mut m);
        assert_eq!(m.as_slice(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_assignment_through_alias_check() {
        let x = DynamicVector::<f64>::from(vec![0.0, 2.0]);
        let y = DynamicVector::<f64, RowVector>::from(vec![f64::INFINITY, 1.0]);
        let mut m = DynamicMatrix::<f64>::new(2, 2);
        crate::expressions::assign(&mut m, &OuterExpr::new(&x, &y));
        assert!(m[(0, 0)].is_nan());
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(1, 0)], f64::INFINITY);
        assert_eq!(m[(1, 1)], 2.0);

        let mut col = DynamicMatrix::<f64, ColumnMajor>::new(2, 2);
        OuterExpr::new(&x, &y).assign_to(&mut col);
        assert!(col[(0, 0)].is_nan());
    }

    #[test]
    fn test_sparse_factor() {
        let x = CompressedVector::<f64>::new(3, vec![1], vec![2.0]).unwrap();
        let y = DynamicVector::<f64, RowVector>::from(vec![1.0, -1.0]);
        let outer = OuterExpr::new(&x, &y);
        assert!(is_sparse::<OuterExpr<&CompressedVector<f64>, &DynamicVector<f64, RowVector>>>());

        let mut rows = Vec::new();
        for major in 0..outer.major_len() {
            outer.for_each_stored_in(major, |minor, v| rows.push((major, minor, v)));
        }
        assert_eq!(rows, vec![(1, 0, 2.0), (1, 1, -2.0)]);

        let mut m = DynamicMatrix::<f64>::from_fn(3, 2, |_, _| 7.0);
        outer.assign_to(&mut m);
        assert_eq!(m.as_slice(), &[0.0, 0.0, 2.0, -2.0, 0.0, 0.0]);
    }
}
