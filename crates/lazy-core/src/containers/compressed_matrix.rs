//! Compressed sparse matrix (CSR for row-major, CSC for column-major)

use super::DynamicMatrix;
use crate::error::{precondition, Error, Result};
use crate::expressions::stream::Mode;
use crate::numeric::Numeric;
use crate::traits::{ij, FromMatrix, Matrix, Operand, Region};
use crate::typetraits::{RowMajor, StorageOrder};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign};

/// Sparse matrix storing only non-zero elements.
///
/// Row `r` (row-major) or column `c` (column-major) owns the entries
/// `offsets[major]..offsets[major + 1]` of `indices` and `values`. Indices within
/// a row/column are strictly increasing and stored values are never zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressedMatrix<T, SO = RowMajor> {
    rows: usize,
    columns: usize,
    offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
    #[serde(skip)]
    order: PhantomData<SO>,
}

impl<T: Numeric, SO: StorageOrder> CompressedMatrix<T, SO> {
    /// All-zero matrix
    pub fn new(rows: usize, columns: usize) -> Self {
        let majors = if SO::IS_ROW_MAJOR { rows } else { columns };
        Self {
            rows,
            columns,
            offsets: vec![0; majors + 1],
            indices: Vec::new(),
            values: Vec::new(),
            order: PhantomData,
        }
    }

    /// Build from `(row, column, value)` triplets in any order.
    ///
    /// Duplicate positions are summed; entries that end up zero are dropped.
    pub fn from_triplets(rows: usize, columns: usize, triplets: &[(usize, usize, T)]) -> Result<Self> {
        let mut buckets = Self::buckets(rows, columns);
        for &(i, j, value) in triplets {
            if i >= rows {
                return Err(Error::out_of_bounds(i, rows));
            }
            if j >= columns {
                return Err(Error::out_of_bounds(j, columns));
            }
            let (major, minor) = ij::<SO>(i, j);
            buckets[major].push((minor, value));
        }
        Ok(Self::from_buckets(rows, columns, buckets))
    }

    /// Evaluate an expression, keeping its non-zeros
    pub fn from_expr<E: Matrix<Element = T>>(expr: E) -> Self {
        if E::REQUIRES_EVALUATION {
            log::trace!("evaluating {}x{} product before compression", expr.rows(), expr.columns());
            let dense = DynamicMatrix::<T, SO>::from_expr(&expr);
            return Self::compress(&dense);
        }
        Self::compress(&expr)
    }

    /// `self = expr`; shapes must match
    pub fn assign<E: Matrix<Element = T>>(&mut self, expr: E) {
        self.check_shape(&expr);
        *self = Self::from_expr(expr);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of stored (non-zero) elements
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Fraction of elements that are zero
    pub fn sparsity(&self) -> f64 {
        let total = self.rows * self.columns;
        if total == 0 {
            0.0
        } else {
            1.0 - self.nnz() as f64 / total as f64
        }
    }

    /// Stored `(minor index, value)` pairs of one row/column
    pub fn major(&self, major: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.offsets[major]..self.offsets[major + 1];
        self.indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    pub fn to_dense(&self) -> DynamicMatrix<T, SO> {
        DynamicMatrix::from_expr(self)
    }

    fn check_shape<E: Matrix + ?Sized>(&self, expr: &E) {
        precondition!(
            self.rows == expr.rows() && self.columns == expr.columns(),
            "cannot assign a {}x{} expression to a {}x{} matrix",
            expr.rows(),
            expr.columns(),
            self.rows,
            self.columns
        );
    }

    fn buckets(rows: usize, columns: usize) -> Vec<Vec<(usize, T)>> {
        let majors = if SO::IS_ROW_MAJOR { rows } else { columns };
        vec![Vec::new(); majors]
    }

    fn compress<E: Matrix<Element = T> + ?Sized>(expr: &E) -> Self {
        let mut buckets = Self::buckets(expr.rows(), expr.columns());
        for source_major in 0..expr.major_len() {
            expr.for_each_stored_in(source_major, |source_minor, value| {
                if value != T::zero() {
                    let (i, j) = ij::<E::Order>(source_major, source_minor);
                    let (major, minor) = ij::<SO>(i, j);
                    buckets[major].push((minor, value));
                }
            });
        }
        Self::from_buckets(expr.rows(), expr.columns(), buckets)
    }

    fn from_buckets(rows: usize, columns: usize, buckets: Vec<Vec<(usize, T)>>) -> Self {
        let mut matrix = Self {
            rows,
            columns,
            offsets: Vec::with_capacity(buckets.len() + 1),
            indices: Vec::new(),
            values: Vec::new(),
            order: PhantomData,
        };
        matrix.offsets.push(0);
        for mut bucket in buckets {
            bucket.sort_unstable_by_key(|&(minor, _)| minor);
            let mut pending: Option<(usize, T)> = None;
            for (minor, value) in bucket {
                pending = match pending {
                    Some((prev, sum)) if prev == minor => Some((prev, sum + value)),
                    Some(done) => {
                        matrix.push(done);
                        Some((minor, value))
                    }
                    None => Some((minor, value)),
                };
            }
            if let Some(done) = pending {
                matrix.push(done);
            }
            matrix.offsets.push(matrix.indices.len());
        }
        matrix
    }

    fn push(&mut self, (minor, value): (usize, T)) {
        if value != T::zero() {
            self.indices.push(minor);
            self.values.push(value);
        }
    }

    /// Merge two matrices of the same shape and order, one row/column at a time
    fn merge(&self, other: &Self, mode: Mode) -> Self {
        let mut merged = Self::new(self.rows, self.columns);
        merged.offsets.truncate(1);
        for major in 0..self.offsets.len() - 1 {
            let mut lhs = self.major(major).peekable();
            let mut rhs = other.major(major).peekable();
            loop {
                let entry = match (lhs.peek().copied(), rhs.peek().copied()) {
                    (Some((i, a)), Some((j, b))) if i == j => {
                        lhs.next();
                        rhs.next();
                        (i, mode.apply(a, b))
                    }
                    (Some((i, a)), Some((j, _))) if i < j => {
                        lhs.next();
                        (i, a)
                    }
                    (Some((i, a)), None) => {
                        lhs.next();
                        (i, a)
                    }
                    (_, Some((j, b))) => {
                        rhs.next();
                        (j, mode.apply(T::zero(), b))
                    }
                    (None, None) => break,
                };
                merged.push(entry);
            }
            merged.offsets.push(merged.indices.len());
        }
        merged
    }
}

impl<T: Numeric, SO: StorageOrder> Operand for CompressedMatrix<T, SO> {
    type Element = T;
    type Category = SO::SparseTag;
}

impl<T: Numeric, SO: StorageOrder> Matrix for CompressedMatrix<T, SO> {
    type Order = SO;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn columns(&self) -> usize {
        self.columns
    }

    fn at(&self, i: usize, j: usize) -> T {
        assert!(
            i < self.rows && j < self.columns,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.columns
        );
        let (major, minor) = ij::<SO>(i, j);
        let range = self.offsets[major]..self.offsets[major + 1];
        match self.indices[range.clone()].binary_search(&minor) {
            Ok(pos) => self.values[range.start + pos],
            Err(_) => T::zero(),
        }
    }

    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, T),
    {
        for (minor, value) in self.major(major) {
            f(minor, value);
        }
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::of_slice(&self.values).overlaps(region)
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T> + ?Sized> FromMatrix<E> for CompressedMatrix<T, SO> {
    fn from_matrix(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> AddAssign<E> for CompressedMatrix<T, SO> {
    fn add_assign(&mut self, expr: E) {
        self.check_shape(&expr);
        *self = self.merge(&Self::from_expr(expr), Mode::Add);
    }
}

impl<T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> SubAssign<E> for CompressedMatrix<T, SO> {
    fn sub_assign(&mut self, expr: E) {
        self.check_shape(&expr);
        *self = self.merge(&Self::from_expr(expr), Mode::Sub);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typetraits::ColumnMajor;

    fn sample<SO: StorageOrder>() -> CompressedMatrix<f64, SO> {
        CompressedMatrix::from_triplets(3, 3, &[(0, 0, 1.0), (2, 1, 4.0), (0, 2, 2.0), (1, 1, 3.0)]).unwrap()
    }

    #[test]
    fn test_csr_layout() {
        let m = sample::<RowMajor>();
        assert_eq!(m.offsets, vec![0, 2, 3, 4]);
        assert_eq!(m.indices, vec![0, 2, 1, 1]);
        assert_eq!(m.values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_csc_layout() {
        let m = sample::<ColumnMajor>();
        assert_eq!(m.offsets, vec![0, 1, 3, 4]);
        assert_eq!(m.indices, vec![0, 1, 2, 0]);
        assert_eq!(m.at(2, 1), 4.0);
        assert_eq!(m.at(2, 2), 0.0);
    }

    #[test]
    fn test_duplicates_summed_and_zeros_dropped() {
        let m = CompressedMatrix::<i32>::from_triplets(2, 2, &[(0, 1, 2), (0, 1, 3), (1, 0, 4), (1, 0, -4)]).unwrap();
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.at(0, 1), 5);
        assert_eq!(m.at(1, 0), 0);
    }

    #[test]
    fn test_out_of_bounds_triplet() {
        let err = CompressedMatrix::<f32>::from_triplets(2, 2, &[(2, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 2, len: 2 }));
    }

    #[test]
    fn test_compress_dense_across_orders() {
        let dense = DynamicMatrix::<f64, RowMajor>::from_rows(&[[0.0, 1.5], [2.5, 0.0]]).unwrap();
        let sparse = CompressedMatrix::<f64, ColumnMajor>::from_expr(&dense);
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(sparse.to_dense().as_slice(), &[0.0, 2.5, 1.5, 0.0]);
        assert_eq!(sparse.sparsity(), 0.5);
    }

    #[test]
    fn test_add_and_sub_assign() {
        let mut m = sample::<RowMajor>();
        let other = sample::<ColumnMajor>();
        m += &other;
        assert_eq!(m.at(1, 1), 6.0);
        m -= &other;
        m -= &other;
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let m = sample::<ColumnMajor>();
        let json = serde_json::to_string(&m).unwrap();
        let back: CompressedMatrix<f64, ColumnMajor> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
