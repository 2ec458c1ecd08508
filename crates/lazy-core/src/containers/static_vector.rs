//! Stack-allocated vector with compile-time length

use crate::expressions;
use crate::numeric::Numeric;
use crate::traits::{DenseVectorMut, FromVector, Operand, Region, Vector};
use crate::typetraits::{ColumnVector, Orientation};
use std::marker::PhantomData;
use std::ops::{AddAssign, Index, IndexMut, SubAssign};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticVector<T, const N: usize, O = ColumnVector> {
    data: [T; N],
    orient: PhantomData<O>,
}

impl<T: Numeric, const N: usize, O: Orientation> StaticVector<T, N, O> {
    pub fn zero() -> Self {
        Self::new([T::zero(); N])
    }

    pub fn new(data: [T; N]) -> Self {
        Self {
            data,
            orient: PhantomData,
        }
    }

    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self::new(std::array::from_fn(f))
    }

    /// Evaluate an expression of length `N`
    pub fn from_expr<E: Vector<Element = T>>(expr: E) -> Self {
        let mut vector = Self::zero();
        expressions::assign_vector(&mut vector, &expr);
        vector
    }

    pub fn assign<E: Vector<Element = T>>(&mut self, expr: E) {
        expressions::assign_vector(self, &expr);
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_array(self) -> [T; N] {
        self.data
    }
}

impl<T: Numeric, const N: usize, O: Orientation> Default for StaticVector<T, N, O> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Numeric, const N: usize, O: Orientation> Operand for StaticVector<T, N, O> {
    type Element = T;
    type Category = O::DenseTag;
}

impl<T: Numeric, const N: usize, O: Orientation> Vector for StaticVector<T, N, O> {
    type Orient = O;
    const SIZE: Option<usize> = Some(N);

    #[inline]
    fn size(&self) -> usize {
        N
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

impl<T: Numeric, const N: usize, O: Orientation> DenseVectorMut for StaticVector<T, N, O> {
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

impl<T: Numeric, const N: usize, O: Orientation, E> FromVector<E> for StaticVector<T, N, O>
where
    E: Vector<Element = T> + ?Sized,
{
    fn from_vector(source: &E) -> Self {
        Self::from_expr(source)
    }
}

impl<T, const N: usize, O> Index<usize> for StaticVector<T, N, O> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize, O> IndexMut<usize> for StaticVector<T, N, O> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Numeric, const N: usize, O: Orientation, E: Vector<Element = T>> AddAssign<E> for StaticVector<T, N, O> {
    fn add_assign(&mut self, expr: E) {
        expressions::add_assign_vector(self, &expr);
    }
}

impl<T: Numeric, const N: usize, O: Orientation, E: Vector<Element = T>> SubAssign<E> for StaticVector<T, N, O> {
    fn sub_assign(&mut self, expr: E) {
        expressions::sub_assign_vector(self, &expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::DynamicVector;

    #[test]
    fn test_fixed_size() {
        let v = StaticVector::<f64, 3>::new([1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(<StaticVector<f64, 3> as Vector>::SIZE, Some(3));
        assert_eq!(v.at(1), 2.0);
    }

    #[test]
    fn test_from_expr_and_updates() {
        let d = DynamicVector::<i32>::from(vec![4, 5]);
        let mut v = StaticVector::<i32, 2>::from_expr(&d);
        v += &d;
        assert_eq!(v.into_array(), [8, 10]);
        v -= &d;
        v[0] = 1;
        assert_eq!(v.as_slice(), &[1, 5]);
    }
}
