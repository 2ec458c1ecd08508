//! Result-type resolution
//!
//! Given the categories of two operands and an operator, the traits here name
//! the category of the result; [`ResultFor`] then names the container that
//! represents a category for a given element type. The tables are total over
//! the nine categories: a pairing with no meaning resolves to [`Invalid`], and
//! anything combined with `Invalid` stays `Invalid`.
//!
//! The `*ExprCategory` and `*TraitType` aliases take operand types rather than
//! tags. Operand references forward their referent's category, so
//! `MultTraitType<&A, &B>` and `MultTraitType<A, B>` name the same type.

mod tables;

use crate::containers::{CompressedMatrix, CompressedVector, DynamicMatrix, DynamicVector};
use crate::numeric::Numeric;
use crate::traits::Operand;
use crate::typetraits::*;

/// Category of `Self * Rhs`
pub trait MultTrait<Rhs: Category>: Category {
    type Output: Category;
}

/// Category of `Self + Rhs`
pub trait AddTrait<Rhs: Category>: Category {
    type Output: Category;
}

/// Category of `Self - Rhs`
pub trait SubTrait<Rhs: Category>: Category {
    type Output: Category;
}

/// Category of `cross(Self, Rhs)`
pub trait CrossTrait<Rhs: Category>: Category {
    type Output: Category;
}

/// Container representing a category for element type `T`
pub trait ResultFor<T: Numeric>: Category {
    type Type;
}

macro_rules! invalid_propagates {
    ($($trait:ident),*) => {$(
        impl<C: Category> $trait<Invalid> for C {
            type Output = Invalid;
        }

        invalid_propagates!(@row $trait;
            DenseRowMajorMatrix, DenseColumnMajorMatrix, SparseRowMajorMatrix,
            SparseColumnMajorMatrix, DenseColumnVector, DenseRowVector,
            SparseColumnVector, SparseRowVector, Scalar);
    )*};
    (@row $trait:ident; $($rhs:ident),*) => {$(
        impl $trait<$rhs> for Invalid {
            type Output = Invalid;
        }
    )*};
}

invalid_propagates!(MultTrait, AddTrait, SubTrait, CrossTrait);

impl<T: Numeric> ResultFor<T> for DenseRowMajorMatrix {
    type Type = DynamicMatrix<T, RowMajor>;
}

impl<T: Numeric> ResultFor<T> for DenseColumnMajorMatrix {
    type Type = DynamicMatrix<T, ColumnMajor>;
}

impl<T: Numeric> ResultFor<T> for SparseRowMajorMatrix {
    type Type = CompressedMatrix<T, RowMajor>;
}

impl<T: Numeric> ResultFor<T> for SparseColumnMajorMatrix {
    type Type = CompressedMatrix<T, ColumnMajor>;
}

impl<T: Numeric> ResultFor<T> for DenseColumnVector {
    type Type = DynamicVector<T, ColumnVector>;
}

impl<T: Numeric> ResultFor<T> for DenseRowVector {
    type Type = DynamicVector<T, RowVector>;
}

impl<T: Numeric> ResultFor<T> for SparseColumnVector {
    type Type = CompressedVector<T, ColumnVector>;
}

impl<T: Numeric> ResultFor<T> for SparseRowVector {
    type Type = CompressedVector<T, RowVector>;
}

impl<T: Numeric> ResultFor<T> for Scalar {
    type Type = T;
}

impl<T: Numeric> ResultFor<T> for Invalid {
    type Type = Invalid;
}

pub type MultExprCategory<A, B> =
    <<A as Operand>::Category as MultTrait<<B as Operand>::Category>>::Output;
pub type AddExprCategory<A, B> =
    <<A as Operand>::Category as AddTrait<<B as Operand>::Category>>::Output;
pub type SubExprCategory<A, B> =
    <<A as Operand>::Category as SubTrait<<B as Operand>::Category>>::Output;
pub type CrossExprCategory<A, B> =
    <<A as Operand>::Category as CrossTrait<<B as Operand>::Category>>::Output;
pub type TransExprCategory<A> = <<A as Operand>::Category as Category>::Transposed;

/// Concrete type of `A * B`
pub type MultTraitType<A, B> = <MultExprCategory<A, B> as ResultFor<<A as Operand>::Element>>::Type;
/// Concrete type of `A + B`
pub type AddTraitType<A, B> = <AddExprCategory<A, B> as ResultFor<<A as Operand>::Element>>::Type;
/// Concrete type of `A - B`
pub type SubTraitType<A, B> = <SubExprCategory<A, B> as ResultFor<<A as Operand>::Element>>::Type;
/// Concrete type of `cross(A, B)`
pub type CrossTraitType<A, B> =
    <CrossExprCategory<A, B> as ResultFor<<A as Operand>::Element>>::Type;
/// Concrete type of `trans(A)`
pub type TransTraitType<A> = <TransExprCategory<A> as ResultFor<<A as Operand>::Element>>::Type;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StaticMatrix;
    use std::any::TypeId;

    fn same<A: 'static, B: 'static>() -> bool {
        TypeId::of::<A>() == TypeId::of::<B>()
    }

    fn mult<A: MultTrait<B>, B: Category>() -> CategoryKind {
        <A::Output as Category>::KIND
    }

    fn add<A: AddTrait<B>, B: Category>() -> CategoryKind {
        <A::Output as Category>::KIND
    }

    fn sub<A: SubTrait<B>, B: Category>() -> CategoryKind {
        <A::Output as Category>::KIND
    }

    fn cross<A: CrossTrait<B>, B: Category>() -> CategoryKind {
        <A::Output as Category>::KIND
    }

    // Evaluates `$f::<A, B>()` for every pair of the nine categories; this only
    // compiles if the table has an entry for each pair.
    macro_rules! grid {
        ($f:ident) => {
            grid!(@rows $f;
                [DenseRowMajorMatrix, DenseColumnMajorMatrix, SparseRowMajorMatrix,
                 SparseColumnMajorMatrix, DenseColumnVector, DenseRowVector,
                 SparseColumnVector, SparseRowVector, Scalar];
                DenseRowMajorMatrix, DenseColumnMajorMatrix, SparseRowMajorMatrix,
                SparseColumnMajorMatrix, DenseColumnVector, DenseRowVector,
                SparseColumnVector, SparseRowVector, Scalar)
        };
        (@rows $f:ident; $all:tt; $($a:ident),*) => {
            vec![$(grid!(@row $f; $a; $all)),*]
        };
        (@row $f:ident; $a:ident; [$($b:ident),*]) => {
            vec![$($f::<$a, $b>()),*]
        };
    }

    fn count_invalid(grid: &[Vec<CategoryKind>]) -> usize {
        grid.iter().flatten().filter(|k| k.is_invalid()).count()
    }

    #[test]
    fn test_tables_are_total() {
        let mult_grid = grid!(mult);
        let add_grid = grid!(add);
        let sub_grid = grid!(sub);
        let cross_grid = grid!(cross);

        for g in [&mult_grid, &add_grid, &sub_grid, &cross_grid] {
            assert_eq!(g.len(), 9);
            assert!(g.iter().all(|row| row.len() == 9));
        }

        // matrix x row vector and column vector x matrix
        assert_eq!(count_invalid(&mult_grid), 16);
        // 16 matrix pairs, 8 same-orientation vector pairs, scalar + scalar
        assert_eq!(count_invalid(&add_grid), 81 - 25);
        assert_eq!(add_grid, sub_grid);
        assert_eq!(count_invalid(&cross_grid), 81 - 8);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(grid!(mult), grid!(mult));
    }

    #[test]
    fn test_matrix_products() {
        use CategoryKind::*;
        assert_eq!(mult::<DenseRowMajorMatrix, DenseColumnMajorMatrix>(), DenseMatrix(Order::RowMajor));
        assert_eq!(mult::<SparseRowMajorMatrix, DenseColumnMajorMatrix>(), DenseMatrix(Order::ColumnMajor));
        assert_eq!(mult::<SparseColumnMajorMatrix, SparseRowMajorMatrix>(), SparseMatrix(Order::ColumnMajor));
        assert_eq!(mult::<DenseColumnMajorMatrix, SparseColumnVector>(), DenseVector(Orient::Column));
        assert_eq!(mult::<SparseRowMajorMatrix, SparseColumnVector>(), SparseVector(Orient::Column));
        assert_eq!(mult::<SparseRowVector, SparseColumnMajorMatrix>(), SparseVector(Orient::Row));
        assert_eq!(mult::<DenseRowMajorMatrix, DenseRowVector>(), Invalid);
    }

    #[test]
    fn test_vector_products() {
        use CategoryKind::*;
        assert_eq!(mult::<DenseRowVector, SparseColumnVector>(), Scalar);
        assert_eq!(mult::<DenseColumnVector, DenseRowVector>(), DenseMatrix(Order::RowMajor));
        assert_eq!(mult::<DenseColumnVector, SparseRowVector>(), SparseMatrix(Order::ColumnMajor));
        assert_eq!(mult::<SparseColumnVector, DenseRowVector>(), SparseMatrix(Order::RowMajor));
        assert_eq!(mult::<DenseColumnVector, SparseColumnVector>(), SparseVector(Orient::Column));
        assert_eq!(mult::<SparseColumnVector, crate::typetraits::Scalar>(), SparseVector(Orient::Column));
    }

    #[test]
    fn test_additive_storage_order() {
        use CategoryKind::*;
        assert_eq!(add::<DenseColumnMajorMatrix, DenseColumnMajorMatrix>(), DenseMatrix(Order::ColumnMajor));
        assert_eq!(add::<DenseColumnMajorMatrix, DenseRowMajorMatrix>(), DenseMatrix(Order::RowMajor));
        assert_eq!(add::<SparseColumnMajorMatrix, SparseRowMajorMatrix>(), SparseMatrix(Order::RowMajor));
        assert_eq!(sub::<SparseColumnVector, DenseColumnVector>(), DenseVector(Orient::Column));
        assert_eq!(add::<DenseColumnVector, DenseRowVector>(), Invalid);
    }

    #[test]
    fn test_invalid_propagates() {
        assert!(mult::<Invalid, DenseRowMajorMatrix>().is_invalid());
        assert!(add::<crate::typetraits::Scalar, Invalid>().is_invalid());
        assert!(cross::<Invalid, Invalid>().is_invalid());
    }

    #[test]
    fn test_result_types_for_operands() {
        type A = DynamicMatrix<f64, RowMajor>;
        type B = DynamicMatrix<f64, ColumnMajor>;
        type V = DynamicVector<f64>;

        assert!(same::<MultTraitType<A, B>, DynamicMatrix<f64, RowMajor>>());
        assert!(same::<MultTraitType<&A, &B>, MultTraitType<A, B>>());
        assert!(same::<MultTraitType<B, V>, DynamicVector<f64, ColumnVector>>());
        assert!(same::<MultTraitType<A, f64>, A>());
        assert!(same::<MultTraitType<f64, B>, B>());
        assert!(same::<MultTraitType<A, DynamicVector<f64, RowVector>>, Invalid>());
        assert!(same::<AddTraitType<StaticMatrix<f64, 2, 2>, B>, A>());
        assert!(same::<SubTraitType<CompressedMatrix<f64>, CompressedMatrix<f64>>, CompressedMatrix<f64>>());
        assert!(same::<CrossTraitType<V, CompressedVector<f64>>, V>());
        assert!(same::<TransTraitType<A>, B>());
        assert!(same::<MultTraitType<DynamicVector<f64, RowVector>, V>, f64>());
    }
}
