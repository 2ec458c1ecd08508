//! Assignment target adaptor that writes the transpose of what it is given

use crate::traits::{DenseMatrixMut, Matrix, Operand, Region};
use crate::typetraits::{Category, StorageOrder};

/// Presents `&mut D` as its transpose, so `trans(x)` can be assigned by letting
/// `x` evaluate itself into the adaptor with its own kernels
pub struct Transposer<'a, D: ?Sized> {
    target: &'a mut D,
}

impl<'a, D: DenseMatrixMut + ?Sized> Transposer<'a, D> {
    pub fn new(target: &'a mut D) -> Self {
        Self { target }
    }
}

impl<'a, D: DenseMatrixMut + ?Sized> Operand for Transposer<'a, D> {
    type Element = D::Element;
    type Category = <D::Category as Category>::Transposed;
}

impl<'a, D: DenseMatrixMut + ?Sized> Matrix for Transposer<'a, D> {
    type Order = <D::Order as StorageOrder>::Opposite;
    const ROWS: Option<usize> = D::COLUMNS;
    const COLUMNS: Option<usize> = D::ROWS;

    #[inline]
    fn rows(&self) -> usize {
        self.target.columns()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.target.rows()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> D::Element {
        self.target.at(j, i)
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[D::Element]> {
        self.target.major_slice(major)
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.target.is_aliased(region)
    }
}

impl<'a, D: DenseMatrixMut + ?Sized> DenseMatrixMut for Transposer<'a, D> {
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: D::Element) {
        self.target.set(j, i, value);
    }

    fn region(&self) -> Region {
        self.target.region().transposed()
    }

    #[inline]
    fn major_slice_mut(&mut self, major: usize) -> Option<&mut [D::Element]> {
        self.target.major_slice_mut(major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::DynamicMatrix;
    use crate::typetraits::{ColumnMajor, RowMajor};

    #[test]
    fn test_writes_land_transposed() {
        let mut m = DynamicMatrix::<i32, RowMajor>::new(2, 3);
        {
            let mut t = Transposer::new(&mut m);
            assert_eq!((t.rows(), t.columns()), (3, 2));
            t.set(2, 1, 7);
        }
        assert_eq!(m[(1, 2)], 7);
    }

    #[test]
    fn test_major_slices_are_shared() {
        let mut m = DynamicMatrix::<f64, ColumnMajor>::from_fn(2, 2, |i, j| (i * 2 + j) as f64);
        let mut t = Transposer::new(&mut m);
        // column 1 of m is row 1 of its transpose
        assert_eq!(t.major_slice(1), Some(&[1.0, 3.0][..]));
        if let Some(row) = t.major_slice_mut(0) {
            row.fill(0.0);
        }
        assert_eq!(m[(1, 0)], 0.0);
    }
}
