//! Sparse vector storing sorted indices and their non-zero values

use crate::error::{precondition, Error, Result};
use crate::expressions::stream::Mode;
use crate::numeric::Numeric;
use crate::traits::{FromVector, Operand, Region, Vector};
use crate::typetraits::{ColumnVector, Orientation};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign};

/// Sparse vector of length `size`.
///
/// Only non-zero values are stored, sorted by index:
///
/// ```
/// use lazy_core::CompressedVector;
///
/// let v = CompressedVector::<f64>::new(10, vec![7, 1, 3], vec![0.3, 0.2, 0.5]).unwrap();
/// assert_eq!(v.get(1), 0.2);
/// assert_eq!(v.get(2), 0.0);
/// assert_eq!(v.nnz(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressedVector<T, O = ColumnVector> {
    size: usize,
    indices: Vec<usize>,
    values: Vec<T>,
    #[serde(skip)]
    orient: PhantomData<O>,
}

impl<T: Numeric, O: Orientation> CompressedVector<T, O> {
    /// Build from parallel index/value lists in any order.
    ///
    /// Duplicate indices are summed and zero values dropped.
    pub fn new(size: usize, indices: Vec<usize>, values: Vec<T>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::size_mismatch(indices.len(), values.len(), "sparse vector values"));
        }
        if let Some(&idx) = indices.iter().find(|&&idx| idx >= size) {
            return Err(Error::out_of_bounds(idx, size));
        }
        Ok(Self::from_entries(size, indices.into_iter().zip(values).collect()))
    }

    /// All-zero vector
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            indices: Vec::new(),
            values: Vec::new(),
            orient: PhantomData,
        }
    }

    /// Keep the non-zeros of a dense slice
    pub fn from_dense(dense: &[T]) -> Self {
        let entries = dense
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, value)| value != T::zero())
            .collect();
        Self::from_entries(dense.len(), entries)
    }

    /// Evaluate an expression, keeping its non-zeros
    pub fn from_expr<E: Vector<Element = T>>(expr: E) -> Self {
        let mut entries = Vec::new();
        expr.for_each_stored(|i, value| {
            if value != T::zero() {
                entries.push((i, value));
            }
        });
        Self::from_entries(expr.size(), entries)
    }

    pub fn assign<E: Vector<Element = T>>(&mut self, expr: E) {
        self.check_size(&expr);
        *self = Self::from_expr(expr);
    }

    fn check_size<E: Vector + ?Sized>(&self, expr: &E) {
        crate::constraint_must_have_same_orientation!(Self, E);
        precondition!(
            self.size == expr.size(),
            "cannot assign an expression of length {} to a vector of length {}",
            expr.size(),
            self.size
        );
    }

    /// Merge the stored entries of `other` into `self` under `mode`
    fn merge(&self, other: &Self, mode: Mode) -> Self {
        let mut merged = Self::zeros(self.size);
        let mut lhs = self.indices.iter().copied().zip(self.values.iter().copied()).peekable();
        let mut rhs = other.indices.iter().copied().zip(other.values.iter().copied()).peekable();
        loop {
            let (idx, value) = match (lhs.peek().copied(), rhs.peek().copied()) {
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
            if value != T::zero() {
                merged.indices.push(idx);
                merged.values.push(value);
            }
        }
        merged
    }

    fn from_entries(size: usize, mut entries: Vec<(usize, T)>) -> Self {
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        let mut vector = Self::zeros(size);
        for (idx, value) in entries {
            match vector.indices.last() {
                Some(&last) if last == idx => {
                    if let Some(sum) = vector.values.last_mut() {
                        *sum += value;
                    }
                }
                _ => {
                    vector.indices.push(idx);
                    vector.values.push(value);
                }
            }
        }
        vector.prune();
        vector
    }

    /// Drop entries whose value summed to zero
    fn prune(&mut self) {
        let mut keep = 0;
        for k in 0..self.values.len() {
            if self.values[k] != T::zero() {
                self.indices[keep] = self.indices[k];
                self.values[keep] = self.values[k];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    /// Value at `i`, zero when not stored
    pub fn get(&self, i: usize) -> T {
        match self.indices.binary_search(&i) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::zero(); self.size];
        for (&idx, &value) in self.indices.iter().zip(&self.values) {
            dense[idx] = value;
        }
        dense
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of stored (non-zero) elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Fraction of elements that are zero
    pub fn sparsity(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / self.size as f64)
        }
    }
}

impl<T: Numeric, O: Orientation> Operand for CompressedVector<T, O> {
    type Element = T;
    type Category = O::SparseTag;
}

impl<T: Numeric, O: Orientation> Vector for CompressedVector<T, O> {
    type Orient = O;

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn at(&self, i: usize) -> T {
        assert!(i < self.size, "index {i} out of bounds for vector of length {}", self.size);
        self.get(i)
    }

    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, T),
    {
        for (&idx, &value) in self.indices.iter().zip(&self.values) {
            f(idx, value);
        }
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::of_slice(&self.values).overlaps(region)
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T> + ?Sized> FromVector<E> for CompressedVector<T, O> {
    fn from_vector(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T>> AddAssign<E> for CompressedVector<T, O> {
    fn add_assign(&mut self, expr: E) {
        self.check_size(&expr);
        *self = self.merge(&Self::from_expr(expr), Mode::Add);
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T>> SubAssign<E> for CompressedVector<T, O> {
    fn sub_assign(&mut self, expr: E) {
        self.check_size(&expr);
        *self = self.merge(&Self::from_expr(expr), Mode::Sub);
    }
}
