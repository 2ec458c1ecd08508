//! Cross product of two 3-element vectors

use super::stream::Mode;
use super::vector_operand_can_alias;
use crate::error::precondition;
use crate::resolve::{CrossExprCategory, CrossTrait};
use crate::traits::{DenseVectorMut, Operand, Region, Vector};
use crate::typetraits::VectorCategory;

/// `lhs x rhs`
#[derive(Clone, Copy, Debug)]
pub struct CrossExpr<L, R> {
    lhs: L,
    rhs: R,
}

impl<L, R> CrossExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
{
    pub fn new(lhs: L, rhs: R) -> Self {
        crate::constraint_must_form_valid_vecvecop!(L, R);
        crate::constraint_must_have_size!(L, 3);
        crate::constraint_must_have_size!(R, 3);
        precondition!(
            lhs.size() == 3 && rhs.size() == 3,
            "cross product needs two vectors of length 3, got {} and {}",
            lhs.size(),
            rhs.size()
        );
        Self { lhs, rhs }
    }

    /// All three components. Every operand element is read before anything is
    /// returned, so writing the result over an operand is safe.
    pub fn components(&self) -> [L::Element; 3] {
        let (a0, a1, a2) = (self.lhs.at(0), self.lhs.at(1), self.lhs.at(2));
        let (b0, b1, b2) = (self.rhs.at(0), self.rhs.at(1), self.rhs.at(2));
        [a1 * b2 - a2 * b1, a2 * b0 - a0 * b2, a0 * b1 - a1 * b0]
    }

    fn evaluate<D>(&self, target: &mut D, mode: Mode)
    where
        D: DenseVectorMut<Element = L::Element> + ?Sized,
    {
        for (i, value) in self.components().into_iter().enumerate() {
            let current = target.at(i);
            target.set(i, mode.apply(current, value));
        }
    }
}

impl<L, R> Operand for CrossExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: CrossTrait<R::Category>,
{
    type Element = L::Element;
    type Category = CrossExprCategory<L, R>;
    const IS_EXPRESSION: bool = true;
    const IS_COMPUTATION: bool = true;
}

impl<L, R> Vector for CrossExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: CrossTrait<R::Category>,
    CrossExprCategory<L, R>: VectorCategory,
{
    type Orient = <CrossExprCategory<L, R> as VectorCategory>::Orient;
    const SIZE: Option<usize> = Some(3);
    const REQUIRES_EVALUATION: bool = L::REQUIRES_EVALUATION || R::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        3
    }

    fn at(&self, i: usize) -> L::Element {
        precondition!(i < 3, "index {} out of bounds for a cross product", i);
        let (l, r) = (&self.lhs, &self.rhs);
        match i {
            0 => l.at(1) * r.at(2) - l.at(2) * r.at(1),
            1 => l.at(2) * r.at(0) - l.at(0) * r.at(2),
            _ => l.at(0) * r.at(1) - l.at(1) * r.at(0),
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

/// Cross product of two 3-element vectors of the same orientation.
///
/// Fixed-size operands of another length fail to build; dynamic operands are
/// checked when the expression is created.
pub fn cross<L, R>(lhs: L, rhs: R) -> CrossExpr<L, R>
where
    L: Vector,
    R: Vector<Element = L::Element>,
    L::Category: CrossTrait<R::Category>,
    CrossExprCategory<L, R>: VectorCategory,
{
    CrossExpr::new(lhs, rhs)
}
