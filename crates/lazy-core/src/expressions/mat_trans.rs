//! Matrix transposition

use super::stream::{stream_matrix, Mode};
use super::transposer::Transposer;
use crate::traits::{DenseMatrixMut, Matrix, Operand, Region};
use crate::typetraits::{Category, StorageOrder};

/// `trans(m)` for dense and sparse matrices.
///
/// Reads swap indices; storage is reinterpreted in the opposite order, so the
/// rows of a row-major operand are the columns of the expression.
#[derive(Clone, Copy, Debug)]
pub struct MatTransExpr<M> {
    operand: M,
}

impl<M: Matrix> MatTransExpr<M> {
    pub fn new(operand: M) -> Self {
        crate::constraint_must_be_matrix!(M);
        Self { operand }
    }

    pub fn operand(&self) -> &M {
        &self.operand
    }

    /// The transposed operand itself
    pub fn into_operand(self) -> M {
        self.operand
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseMatrixMut<Element = M::Element> + ?Sized,
    {
        if M::REQUIRES_EVALUATION {
            mode.matrix_into(&self.operand, &mut Transposer::new(target));
        } else {
            stream_matrix(target, self, mode);
        }
    }
}

impl<M: Matrix> Operand for MatTransExpr<M> {
    type Element = M::Element;
    type Category = <M::Category as Category>::Transposed;
    const IS_EXPRESSION: bool = true;
}

impl<M: Matrix> Matrix for MatTransExpr<M> {
    type Order = <M::Order as StorageOrder>::Opposite;
    const ROWS: Option<usize> = M::COLUMNS;
    const COLUMNS: Option<usize> = M::ROWS;
    const REQUIRES_EVALUATION: bool = M::REQUIRES_EVALUATION;

    #[inline]
    fn rows(&self) -> usize {
        self.operand.columns()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.operand.rows()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> M::Element {
        self.operand.at(j, i)
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[M::Element]> {
        self.operand.major_slice(major)
    }

    fn for_each_stored_in<F>(&self, major: usize, f: F)
    where
        F: FnMut(usize, M::Element),
    {
        self.operand.for_each_stored_in(major, f)
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
    }

    // a transposed read can hit any element already written
    fn can_alias(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedMatrix, DynamicMatrix};
    use crate::typetraits::{category_of, ColumnMajor, CategoryKind, Order, RowMajor};

    #[test]
    fn test_index_remapping() {
        let m = DynamicMatrix::<f64>::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        let t = MatTransExpr::new(&m);
        assert_eq!((t.rows(), t.columns()), (3, 2));
        assert_eq!(t.at(2, 1), m.at(1, 2));
        assert_eq!(category_of::<MatTransExpr<&DynamicMatrix<f64>>>(), CategoryKind::DenseMatrix(Order::ColumnMajor));
    }

    #[test]
    fn test_contiguous_assignment_into_opposite_order() {
        let m = DynamicMatrix::<i32, RowMajor>::from_fn(2, 3, |i, j| (i * 3 + j) as i32);
        let mut out = DynamicMatrix::<i32, ColumnMajor>::new(3, 2);
        MatTransExpr::new(&m).assign_to(&mut out);
        // the transpose of a row-major matrix has the same layout in column-major
        assert_eq!(out.as_slice(), m.as_slice());
    }

    #[test]
    fn test_sparse_transpose_scatters() {
        let s = CompressedMatrix::<f64>::from_triplets(2, 3, &[(0, 2, 1.5), (1, 0, -2.0)]).unwrap();
        let mut out = DynamicMatrix::<f64>::from_fn(3, 2, |_, _| 9.0);
        MatTransExpr::new(&s).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[0.0, -2.0, 0.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_add_and_sub_modes() {
        let m = DynamicMatrix::<f64>::from_fn(2, 2, |i, j| (i * 2 + j) as f64);
        let mut out = DynamicMatrix::<f64>::identity(2);
        MatTransExpr::new(&m).add_assign_to(&mut out);
        assert_eq!(out.as_slice(), &[1.0, 2.0, 1.0, 4.0]);
        MatTransExpr::new(&m).sub_assign_to(&mut out);
        assert_eq!(out, DynamicMatrix::identity(2));
    }
}
