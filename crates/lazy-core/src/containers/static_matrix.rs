//! Stack-allocated row-major matrix with compile-time dimensions

use crate::expressions;
use crate::numeric::Numeric;
use crate::traits::{DenseMatrixMut, FromMatrix, Matrix, Operand, Region};
use crate::typetraits::{DenseRowMajorMatrix, RowMajor};
use std::ops::{AddAssign, Index, IndexMut, SubAssign};

/// `R x C` matrix stored inline, row by row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticMatrix<T, const R: usize, const C: usize> {
    data: [[T; C]; R],
}

impl<T: Numeric, const R: usize, const C: usize> StaticMatrix<T, R, C> {
    pub fn zero() -> Self {
        Self {
            data: [[T::zero(); C]; R],
        }
    }

    pub fn from_rows(data: [[T; C]; R]) -> Self {
        Self { data }
    }

    pub fn from_fn<F: FnMut(usize, usize) -> T>(mut f: F) -> Self {
        let mut matrix = Self::zero();
        for (i, row) in matrix.data.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = f(i, j);
            }
        }
        matrix
    }

    /// Evaluate an expression; its shape must be `R x C`
    pub fn from_expr<E: Matrix<Element = T>>(expr: E) -> Self {
        let mut matrix = Self::zero();
        expressions::assign(&mut matrix, &expr);
        matrix
    }

    pub fn assign<E: Matrix<Element = T>>(&mut self, expr: E) {
        expressions::assign(self, &expr);
    }

    pub const fn rows(&self) -> usize {
        R
    }

    pub const fn columns(&self) -> usize {
        C
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_flattened_mut()
    }

    pub fn row(&self, i: usize) -> &[T; C] {
        &self.data[i]
    }
}

impl<T: Numeric, const R: usize, const C: usize> Default for StaticMatrix<T, R, C> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Numeric, const R: usize, const C: usize> Operand for StaticMatrix<T, R, C> {
    type Element = T;
    type Category = DenseRowMajorMatrix;
}

impl<T: Numeric, const R: usize, const C: usize> Matrix for StaticMatrix<T, R, C> {
    type Order = RowMajor;
    const ROWS: Option<usize> = Some(R);
    const COLUMNS: Option<usize> = Some(C);

    #[inline]
    fn rows(&self) -> usize {
        R
    }

    #[inline]
    fn columns(&self) -> usize {
        C
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[i][j]
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[T]> {
        Some(&self.data[major])
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::of_slice(self.as_slice()).overlaps(region)
    }

    fn occupies(&self, region: Region) -> bool {
        self.region() == region
    }
}

impl<T: Numeric, const R: usize, const C: usize> DenseMatrixMut for StaticMatrix<T, R, C> {
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i][j] = value;
    }

    fn region(&self) -> Region {
        Region::of_slice(self.as_slice()).with_layout::<RowMajor>(R, C)
    }

    #[inline]
    fn major_slice_mut(&mut self, major: usize) -> Option<&mut [T]> {
        Some(&mut self.data[major])
    }
}

impl<T: Numeric, const R: usize, const C: usize, E> FromMatrix<E> for StaticMatrix<T, R, C>
where
    E: Matrix<Element = T> + ?Sized,
{
    fn from_matrix(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for StaticMatrix<T, R, C> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i][j]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for StaticMatrix<T, R, C> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i][j]
    }
}

impl<T: Numeric, const R: usize, const C: usize, E: Matrix<Element = T>> AddAssign<E> for StaticMatrix<T, R, C> {
    fn add_assign(&mut self, expr: E) {
        expressions::add_assign(self, &expr);
    }
}

impl<T: Numeric, const R: usize, const C: usize, E: Matrix<Element = T>> SubAssign<E> for StaticMatrix<T, R, C> {
    fn sub_assign(&mut self, expr: E) {
        expressions::sub_assign(self, &expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::DynamicMatrix;

    #[test]
    fn test_static_dimensions() {
        let m = StaticMatrix::<f32, 2, 3>::zero();
        assert_eq!((m.rows(), m.columns()), (2, 3));
        assert_eq!(<StaticMatrix<f32, 2, 3> as Matrix>::ROWS, Some(2));
        assert_eq!(m.as_slice().len(), 6);
    }

    #[test]
    fn test_row_major_storage() {
        let m = StaticMatrix::<i32, 2, 2>::from_rows([[1, 2], [3, 4]]);
        assert_eq!(m.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(m.major_slice(1), Some(&[3, 4][..]));
        assert_eq!(m.row(0), &[1, 2]);
    }

    #[test]
    fn test_from_fn_and_index() {
        let mut m = StaticMatrix::<u64, 3, 2>::from_fn(|i, j| (i * 10 + j) as u64);
        assert_eq!(m[(2, 1)], 21);
        m[(2, 1)] = 7;
        assert_eq!(m.at(2, 1), 7);
    }

    #[test]
    fn test_assign_from_dynamic() {
        let src = DynamicMatrix::<f64>::from_fn(2, 2, |i, j| (i + 2 * j) as f64);
        let mut m = StaticMatrix::<f64, 2, 2>::default();
        m.assign(&src);
        assert_eq!(m.as_slice(), src.as_slice());
        m += &src;
        assert_eq!(m[(1, 1)], 6.0);
        m -= &src;
        assert_eq!(m[(1, 1)], 3.0);
    }

    #[test]
    #[should_panic(expected = "cannot assign")]
    fn test_assign_wrong_shape_panics() {
        let src = DynamicMatrix::<f64>::new(3, 2);
        let mut m = StaticMatrix::<f64, 2, 2>::zero();
        m.assign(&src);
    }
}
