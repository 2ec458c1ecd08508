//! Heap-allocated dense matrix with run-time dimensions

use crate::error::{Error, Result};
use crate::expressions;
use crate::numeric::Numeric;
use crate::traits::{DenseMatrixMut, FromMatrix, Matrix, Operand, Region};
use crate::typetraits::{RowMajor, StorageOrder};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{AddAssign, Index, IndexMut, SubAssign};

/// Dense matrix stored contiguously in storage order `SO`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicMatrix<T, SO = RowMajor> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
    #[serde(skip)]
    order: PhantomData<SO>,
}

impl<T: Numeric, SO: StorageOrder> DynamicMatrix<T, SO> {
    /// Zero-filled `rows x columns` matrix
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![T::zero(); rows * columns],
            order: PhantomData,
        }
    }

    /// Matrix over `data`, laid out in storage order
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * columns {
            return Err(Error::size_mismatch(rows * columns, data.len(), "dense matrix buffer"));
        }
        Ok(Self {
            rows,
            columns,
            data,
            order: PhantomData,
        })
    }

    /// Matrix from a list of rows, whatever the storage order
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != columns) {
            return Err(Error::size_mismatch(columns, bad.as_ref().len(), "matrix row"));
        }
        Ok(Self::from_fn(rows.len(), columns, |i, j| rows[i].as_ref()[j]))
    }

    pub fn from_fn<F: FnMut(usize, usize) -> T>(rows: usize, columns: usize, mut f: F) -> Self {
        let mut matrix = Self::new(rows, columns);
        for i in 0..rows {
            for j in 0..columns {
                let offset = matrix.offset(i, j);
                matrix.data[offset] = f(i, j);
            }
        }
        matrix
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// Evaluate an expression into a new matrix of the same shape
    pub fn from_expr<E: Matrix<Element = T>>(expr: E) -> Self {
        let mut matrix = Self::new(expr.rows(), expr.columns());
        expressions::assign(&mut matrix, &expr);
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Storage in storage order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows && j < self.columns {
            Some(&self.data[self.offset(i, j)])
        } else {
            None
        }
    }

    /// Change the shape, discarding the contents
    pub fn resize(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
        self.data.clear();
        self.data.resize(rows * columns, T::zero());
    }

    /// `self = expr`; shapes must match
    pub fn assign<E: Matrix<Element = T>>(&mut self, expr: E) {
        expressions::assign(self, &expr);
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        if SO::IS_ROW_MAJOR {
            i * self.columns + j
        } else {
            j * self.rows + i
        }
    }
}

impl<T: Numeric, SO: StorageOrder> Operand for DynamicMatrix<T, SO> {
    type Element = T;
    type Category = SO::DenseTag;
}

impl<T: Numeric, SO: StorageOrder> Matrix for DynamicMatrix<T, SO> {
    type Order = SO;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        self.data[self.offset(i, j)]
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[T]> {
        let n = self.minor_len();
        Some(&self.data[major * n..(major + 1) * n])
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::of_slice(&self.data).overlaps(region)
    }

    fn occupies(&self, region: Region) -> bool {
        self.region() == region
    }
}

impl<T: Numeric, SO: StorageOrder> DenseMatrixMut for DynamicMatrix<T, SO> {
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: T) {
        let offset = self.offset(i, j);
        self.data[offset] = value;
    }

    fn region(&self) -> Region {
        Region::of_slice(&self.data).with_layout::<SO>(self.rows, self.columns)
    }

    #[inline]
    fn major_slice_mut(&mut self, major: usize) -> Option<&mut [T]> {
        let n = self.minor_len();
        Some(&mut self.data[major * n..(major + 1) * n])
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T> + ?Sized> FromMatrix<E> for DynamicMatrix<T, SO> {
    fn from_matrix(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T: Numeric, SO: StorageOrder> Index<(usize, usize)> for DynamicMatrix<T, SO> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows && j < self.columns, "index ({i}, {j}) out of bounds for {}x{} matrix", self.rows, self.columns);
        &self.data[self.offset(i, j)]
    }
}

impl<T: Numeric, SO: StorageOrder> IndexMut<(usize, usize)> for DynamicMatrix<T, SO> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows && j < self.columns, "index ({i}, {j}) out of bounds for {}x{} matrix", self.rows, self.columns);
        let offset = self.offset(i, j);
        &mut self.data[offset]
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> AddAssign<E> for DynamicMatrix<T, SO> {
    fn add_assign(&mut self, expr: E) {
        expressions::add_assign(self, &expr);
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> SubAssign<E> for DynamicMatrix<T, SO> {
    fn sub_assign(&mut self, expr: E) {
        expressions::sub_assign(self, &expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typetraits::ColumnMajor;

    #[test]
    fn test_storage_order_layout() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let row_major = DynamicMatrix::<f64, RowMajor>::from_rows(&rows).unwrap();
        let column_major = DynamicMatrix::<f64, ColumnMajor>::from_rows(&rows).unwrap();
        assert_eq!(row_major.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(column_major.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(row_major[(1, 2)], column_major[(1, 2)]);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(DynamicMatrix::<f32>::from_vec(2, 2, vec![1.0; 4]).is_ok());
        match DynamicMatrix::<f32>::from_vec(2, 3, vec![1.0; 4]) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("expected 6, got 4")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<i32>> = vec![vec![1, 2], vec![3]];
        assert!(DynamicMatrix::<i32>::from_rows(&rows).is_err());
    }

    #[test]
    fn test_major_slices() {
        let m = DynamicMatrix::<i64, ColumnMajor>::from_fn(3, 2, |i, j| (10 * i + j) as i64);
        assert_eq!(m.major_len(), 2);
        assert_eq!(m.major_slice(1), Some(&[1i64, 11, 21][..]));
    }

    #[test]
    fn test_identity_and_get() {
        let eye = DynamicMatrix::<u32>::identity(3);
        assert_eq!(eye.get(1, 1), Some(&1));
        assert_eq!(eye.get(0, 2), Some(&0));
        assert_eq!(eye.get(3, 0), None);
    }

    #[test]
    fn test_resize_clears() {
        let mut m = DynamicMatrix::<f64>::identity(2);
        m.resize(3, 1);
        assert_eq!((m.rows(), m.columns()), (3, 1));
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reset_and_scale() {
        let mut m = DynamicMatrix::<f64>::from_fn(2, 3, |i, j| (i + j) as f64);
        m.scale(2.0);
        assert_eq!(m[(1, 2)], 6.0);
        m.reset();
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_serde_round_trip() {
        let m = DynamicMatrix::<f64, ColumnMajor>::from_fn(2, 2, |i, j| (i * 2 + j) as f64);
        let json = serde_json::to_string(&m).unwrap();
        let back: DynamicMatrix<f64, ColumnMajor> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let m = DynamicMatrix::<f64>::new(2, 2);
        let _ = m[(2, 0)];
    }
}
