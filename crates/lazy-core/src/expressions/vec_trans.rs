//! Vector transposition: a change of orientation, nothing else

use super::stream::{stream_vector, Mode};
use crate::traits::{DenseVectorMut, Operand, Region, Vector};
use crate::typetraits::{Category, Orientation};

#[derive(Clone, Copy, Debug)]
pub struct VecTransExpr<V> {
    operand: V,
}

impl<V: Vector> VecTransExpr<V> {
    pub fn new(operand: V) -> Self {
        crate::constraint_must_be_vector!(V);
        Self { operand }
    }

    pub fn operand(&self) -> &V {
        &self.operand
    }

    pub fn into_operand(self) -> V {
        self.operand
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        if V::REQUIRES_EVALUATION {
            mode.vector_into(&self.operand, target);
        } else {
            stream_vector(target, self, mode);
        }
    }
}

impl<V: Vector> Operand for VecTransExpr<V> {
    type Element = V::Element;
    type Category = <V::Category as Category>::Transposed;
    const IS_EXPRESSION: bool = true;
}

impl<V: Vector> Vector for VecTransExpr<V> {
    type Orient = <V::Orient as Orientation>::Transposed;
    const SIZE: Option<usize> = V::SIZE;
    const REQUIRES_EVALUATION: bool = V::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        self.operand.size()
    }

    #[inline]
    fn at(&self, i: usize) -> V::Element {
        self.operand.at(i)
    }

    #[inline]
    fn as_slice(&self) -> Option<&[V::Element]> {
        self.operand.as_slice()
    }

    fn for_each_stored<F>(&self, f: F)
    where
        F: FnMut(usize, V::Element),
    {
        self.operand.for_each_stored(f)
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        self.operand.is_aliased(region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = V::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedVector, DynamicVector};
    use crate::typetraits::{is_transpose_vector, RowVector};

    #[test]
    fn test_orientation_flips() {
        assert!(is_transpose_vector::<VecTransExpr<&DynamicVector<f64>>>());
        assert!(!is_transpose_vector::<VecTransExpr<&DynamicVector<f64, RowVector>>>());
    }

    #[test]
    fn test_values_pass_through() {
        let v = DynamicVector::<f32>::from(vec![1.0, 2.0, 3.0]);
        let mut row = DynamicVector::<f32, RowVector>::new(3);
        VecTransExpr::new(&v).assign_to(&mut row);
        assert_eq!(row.as_slice(), v.as_slice());

        let s = CompressedVector::<f32>::new(3, vec![2], vec![1.0]).unwrap();
        VecTransExpr::new(&s).add_assign_to(&mut row);
        assert_eq!(row.as_slice(), &[1.0, 2.0, 4.0]);
    }
}
