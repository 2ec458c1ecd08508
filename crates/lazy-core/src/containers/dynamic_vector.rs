//! Heap-allocated dense vector

use crate::expressions;
use crate::numeric::Numeric;
use crate::traits::{DenseVectorMut, FromVector, Operand, Region, Vector};
use crate::typetraits::{ColumnVector, Orientation};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{AddAssign, Index, IndexMut, SubAssign};

/// Dense vector; `O` distinguishes column vectors from transposed (row) vectors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicVector<T, O = ColumnVector> {
    data: Vec<T>,
    #[serde(skip)]
    orient: PhantomData<O>,
}

impl<T: Numeric, O: Orientation> DynamicVector<T, O> {
    /// Zero vector of length `n`
    pub fn new(n: usize) -> Self {
        Self::from_vec(vec![T::zero(); n])
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data,
            orient: PhantomData,
        }
    }

    pub fn from_fn<F: FnMut(usize) -> T>(n: usize, f: F) -> Self {
        Self::from_vec((0..n).map(f).collect())
    }

    /// Evaluate an expression into a new vector
    pub fn from_expr<E: Vector<Element = T>>(expr: E) -> Self {
        let mut vector = Self::new(expr.size());
        expressions::assign_vector(&mut vector, &expr);
        vector
    }

    pub fn assign<E: Vector<Element = T>>(&mut self, expr: E) {
        expressions::assign_vector(self, &expr);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Change the length, discarding the contents
    pub fn resize(&mut self, n: usize) {
        self.data.clear();
        self.data.resize(n, T::zero());
    }
}

impl<T: Numeric, O: Orientation> From<Vec<T>> for DynamicVector<T, O> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Numeric, O: Orientation> Operand for DynamicVector<T, O> {
    type Element = T;
    type Category = O::DenseTag;
}

impl<T: Numeric, O: Orientation> Vector for DynamicVector<T, O> {
    type Orient = O;

    #[inline]
    fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        self.data[i]
    }

    #[inline]
    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::of_slice(&self.data).overlaps(region)
    }

    fn occupies(&self, region: Region) -> bool {
        self.region() == region
    }
}

impl<T: Numeric, O: Orientation> DenseVectorMut for DynamicVector<T, O> {
    #[inline]
    fn set(&mut self, i: usize, value: T) {
        self.data[i] = value;
    }

    fn region(&self) -> Region {
        Region::of_slice(&self.data)
    }

    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        Some(&mut self.data)
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T> + ?Sized> FromVector<E> for DynamicVector<T, O> {
    fn from_vector(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T, O> Index<usize> for DynamicVector<T, O> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, O> IndexMut<usize> for DynamicVector<T, O> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T>> AddAssign<E> for DynamicVector<T, O> {
    fn add_assign(&mut self, expr: E) {
        expressions::add_assign_vector(self, &expr);
    }
}

impl<T: Numeric, O: Orientation, E: Vector<Element = T>> SubAssign<E> for DynamicVector<T, O> {
    fn sub_assign(&mut self, expr: E) {
        expressions::sub_assign_vector(self, &expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typetraits::RowVector;

    #[test]
    fn test_construction() {
        let v = DynamicVector::<f64>::from_fn(4, |i| i as f64 * 0.5);
        assert_eq!(v.len(), 4);
        assert_eq!(v[3], 1.5);
        assert!(DynamicVector::<f64>::new(0).is_empty());
    }

    #[test]
    fn test_assignment_operators() {
        let a = DynamicVector::<i64, RowVector>::from(vec![1, 2, 3]);
        let mut b = DynamicVector::<i64, RowVector>::new(3);
        b.assign(&a);
        b += &a;
        assert_eq!(b.as_slice(), &[2, 4, 6]);
        b -= &a;
        assert_eq!(b, a);
    }

    #[test]
    #[should_panic(expected = "cannot assign")]
    fn test_length_mismatch_panics() {
        let a = DynamicVector::<f32>::new(2);
        let mut b = DynamicVector::<f32>::new(3);
        b.assign(&a);
    }

    #[test]
    fn test_resize() {
        let mut v = DynamicVector::<u32>::from(vec![1, 2]);
        v.resize(3);
        assert_eq!(v.into_vec(), vec![0, 0, 0]);
    }

    #[test]
    fn test_serde_round_trip() {
        let v = DynamicVector::<f64>::from(vec![0.25, -1.0]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(serde_json::from_str::<DynamicVector<f64>>(&json).unwrap(), v);
    }
}
