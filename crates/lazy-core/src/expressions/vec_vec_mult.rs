//! Component-wise vector product: `a * b` for two vectors of one orientation

use super::stream::Mode;
use super::{materialize_vector, vector_operand_can_alias};
use crate::error::precondition;
use crate::resolve::{MultExprCategory, MultTrait};
use crate::simd::kernels;
use crate::traits::{DenseVectorMut, Operand, Region, Vector};
use crate::typetraits::{is_sparse, merge_dims, VectorCategory};

/// `lhs[i] * rhs[i]` for every `i`
#[derive(Clone, Copy, Debug)]
pub struct VecVecMultExpr<L, R> {
    lhs: L,
    rhs: R,
}

impl<L, R> VecVecMultExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
{
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_form_valid_vecvecop!(L, R);
        precondition!(
            lhs.size() == rhs.size(),
            "cannot multiply vectors of length {} and {}",
            lhs.size(),
            rhs.size()
        );
        Self { lhs, rhs }
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        // Both sides are copied out when the target overlaps either of them
        let aliased = self.lhs.is_aliased(target.region()) || self.rhs.is_aliased(target.region());
        match (L::REQUIRES_EVALUATION || aliased, R::REQUIRES_EVALUATION || aliased) {
            (false, false) => mul_into(&self.lhs, &self.rhs, target, mode),
            (true, false) => mul_into(&materialize_vector::<_, L::Orient>(&self.lhs), &self.rhs, target, mode),
            (false, true) => mul_into(&self.lhs, &materialize_vector::<_, R::Orient>(&self.rhs), target, mode),
            (true, true) => mul_into(
                &materialize_vector::<_, L::Orient>(&self.lhs),
                &materialize_vector::<_, R::Orient>(&self.rhs),
                target,
                mode,
            ),
        }
    }
}

impl<L, R> Operand for VecVecMultExpr<L, R>
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

impl<L, R> Vector for VecVecMultExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: MultTrait<R::Category>,
    MultExprCategory<L, R>: VectorCategory,
{
    type Orient = <MultExprCategory<L, R> as VectorCategory>::Orient;
    const SIZE: Option<usize> = merge_dims(L::SIZE, R::SIZE);
    const REQUIRES_EVALUATION: bool = L::REQUIRES_EVALUATION || R::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        self.lhs.size()
    }

    #[inline]
    fn at(&self, i: usize) -> L::Element {
        self.lhs.at(i) * self.rhs.at(i)
    }

    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, L::Element),
    {
        if is_sparse::<L>() {
            self.lhs.for_each_stored(|i, a| f(i, a * self.rhs.at(i)));
        } else if is_sparse::<R>() {
            self.rhs.for_each_stored(|i, b| f(i, self.lhs.at(i) * b));
        } else {
            for i in 0..self.size() {
                f(i, self.at(i));
            }
        }
    }

    fn is_aliased(&self, region: Region) -> bool {
        self.lhs.is_aliased(region) || self.rhs.is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        vector_operand_can_alias(&self.lhs, region) || vector_operand_can_alias(&self.rhs, region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        self.evaluate(target, Mode::Sub);
    }
}

/// `target (mode) a .* b` for operands that are cheap to read and do not
/// overlap the target
fn mul_into<A, B, D>(a: &A, b: &B, target: &mut D, mode: Mode)
where
    A: Vector + ?Sized,
    B: Vector<Element = A::Element> + ?Sized,
    D: DenseVectorMut<Element = A::Element> + ?Sized,
{
    if is_sparse::<A>() || is_sparse::<B>() {
        if mode == Mode::Assign {
            target.reset();
        }
        let mode = mode.accumulating();
        let mut update = |i: usize, value: A::Element| {
            let current = target.at(i);
            target.set(i, mode.apply(current, value));
        };
        if is_sparse::<A>() {
            a.for_each_stored(|i, x| update(i, x * b.at(i)));
        } else {
            b.for_each_stored(|i, y| update(i, a.at(i) * y));
        }
        return;
    }

    if let (Some(x), Some(y)) = (a.as_slice(), b.as_slice()) {
        if let Some(dst) = target.as_mut_slice() {
            if mode == Mode::Assign {
                kernels::mul(x, y, dst);
            } else {
                let mut product = vec![num_traits::zero(); x.len()];
                kernels::mul(x, y, &mut product);
                mode.update_slice(dst, &product);
            }
            return;
        }
    }

    for i in 0..target.size() {
        let current = target.at(i);
        target.set(i, mode.apply(current, a.at(i) * b.at(i)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{CompressedVector, DynamicMatrix, DynamicVector, StaticVector};
    use crate::expressions::MatVecMultExpr;
    use crate::typetraits::RowVector;

    #[test]
    fn test_dense_component_product() {
        let a = DynamicVector::<f64>::from(vec![1.0, 2.0, 3.0]);
        let b = StaticVector::<f64, 3>::new([4.0, 5.0, 6.0]);
        let mut c = DynamicVector::<f64>::new(3);
        let product = VecVecMultExpr::new(&a, &b);
        product.assign_to(&mut c);
        assert_eq!(c.as_slice(), &[4.0, 10.0, 18.0]);
        product.sub_assign_to(&mut c);
        assert_eq!(c.as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(product.at(1), 10.0);
    }

    #[test]
    fn test_row_vectors_keep_orientation() {
        let a = DynamicVector::<i32, RowVector>::from(vec![2, -1]);
        let mut c = DynamicVector::<i32, RowVector>::from(vec![1, 1]);
        VecVecMultExpr::new(&a, &a).add_assign_to(&mut c);
        assert_eq!(c.as_slice(), &[5, 2]);
    }

    #[test]
    fn test_sparse_side_drives_iteration() {
        let s = CompressedVector::<f64>::new(4, vec![0, 3], vec![2.0, -1.0]).unwrap();
        let d = DynamicVector::<f64>::from(vec![3.0, 7.0, 7.0, 5.0]);
        let product = VecVecMultExpr::new(&d, &s);
        let mut stored = Vec::new();
        product.for_each_stored(|i, v| stored.push((i, v)));
        assert_eq!(stored, vec![(0, 6.0), (3, -5.0)]);

        let mut out = DynamicVector::<f64>::from(vec![9.0; 4]);
        product.assign_to(&mut out);
        assert_eq!(out.as_slice(), &[6.0, 0.0, 0.0, -5.0]);
    }

    #[test]
    fn test_product_operand_is_evaluated_once() {
        let m = DynamicMatrix::<f64>::identity(2);
        let x = DynamicVector::<f64>::from(vec![3.0, 4.0]);
        let mut out = DynamicVector::<f64>::new(2);
        VecVecMultExpr::new(MatVecMultExpr::new(&m, &x), &x).assign_to(&mut out);
        assert_eq!(out.as_slice(), &[9.0, 16.0]);
    }

    #[test]
    #[should_panic(expected = "cannot multiply vectors")]
    fn test_length_mismatch_panics() {
        let a = DynamicVector::<f64>::new(2);
        let b = DynamicVector::<f64>::new(3);
        let _ = VecVecMultExpr::new(&a, &b);
    }
}
