//! The operator tables, one row per left-hand category
//!
//! Abbreviations would obscure which pairings are legal, so every entry is
//! spelled out. Rows for [`Invalid`] and the `Invalid` column are blanket impls
//! in the parent module.

use super::{AddTrait, CrossTrait, MultTrait, SubTrait};
use crate::typetraits::*;

macro_rules! table {
    ($trait:ident; $($lhs:ident => [$($rhs:ident: $out:ident),* $(,)?])*) => {
        $($(
            impl $trait<$rhs> for $lhs {
                type Output = $out;
            }
        )*)*
    };
}

// Matrix products keep the left storage order, except that a sparse left
// operand takes the order of a dense right one. Sparse only when both are.
table! { MultTrait;
    DenseRowMajorMatrix => [
        DenseRowMajorMatrix: DenseRowMajorMatrix,
        DenseColumnMajorMatrix: DenseRowMajorMatrix,
        SparseRowMajorMatrix: DenseRowMajorMatrix,
        SparseColumnMajorMatrix: DenseRowMajorMatrix,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: DenseColumnVector,
        SparseRowVector: Invalid,
        Scalar: DenseRowMajorMatrix,
    ]
    DenseColumnMajorMatrix => [
        DenseRowMajorMatrix: DenseColumnMajorMatrix,
        DenseColumnMajorMatrix: DenseColumnMajorMatrix,
        SparseRowMajorMatrix: DenseColumnMajorMatrix,
        SparseColumnMajorMatrix: DenseColumnMajorMatrix,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: DenseColumnVector,
        SparseRowVector: Invalid,
        Scalar: DenseColumnMajorMatrix,
    ]
    SparseRowMajorMatrix => [
        DenseRowMajorMatrix: DenseRowMajorMatrix,
        DenseColumnMajorMatrix: DenseColumnMajorMatrix,
        SparseRowMajorMatrix: SparseRowMajorMatrix,
        SparseColumnMajorMatrix: SparseRowMajorMatrix,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: SparseColumnVector,
        SparseRowVector: Invalid,
        Scalar: SparseRowMajorMatrix,
    ]
    SparseColumnMajorMatrix => [
        DenseRowMajorMatrix: DenseRowMajorMatrix,
        DenseColumnMajorMatrix: DenseColumnMajorMatrix,
        SparseRowMajorMatrix: SparseColumnMajorMatrix,
        SparseColumnMajorMatrix: SparseColumnMajorMatrix,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: SparseColumnVector,
        SparseRowVector: Invalid,
        Scalar: SparseColumnMajorMatrix,
    ]
    DenseColumnVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: DenseRowMajorMatrix,
        SparseColumnVector: SparseColumnVector,
        SparseRowVector: SparseColumnMajorMatrix,
        Scalar: DenseColumnVector,
    ]
    DenseRowVector => [
        DenseRowMajorMatrix: DenseRowVector,
        DenseColumnMajorMatrix: DenseRowVector,
        SparseRowMajorMatrix: DenseRowVector,
        SparseColumnMajorMatrix: DenseRowVector,
        DenseColumnVector: Scalar,
        DenseRowVector: DenseRowVector,
        SparseColumnVector: Scalar,
        SparseRowVector: SparseRowVector,
        Scalar: DenseRowVector,
    ]
    SparseColumnVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: SparseColumnVector,
        DenseRowVector: SparseRowMajorMatrix,
        SparseColumnVector: SparseColumnVector,
        SparseRowVector: SparseRowMajorMatrix,
        Scalar: SparseColumnVector,
    ]
    SparseRowVector => [
        DenseRowMajorMatrix: DenseRowVector,
        DenseColumnMajorMatrix: DenseRowVector,
        SparseRowMajorMatrix: SparseRowVector,
        SparseColumnMajorMatrix: SparseRowVector,
        DenseColumnVector: Scalar,
        DenseRowVector: SparseRowVector,
        SparseColumnVector: Scalar,
        SparseRowVector: SparseRowVector,
        Scalar: SparseRowVector,
    ]
    Scalar => [
        DenseRowMajorMatrix: DenseRowMajorMatrix,
        DenseColumnMajorMatrix: DenseColumnMajorMatrix,
        SparseRowMajorMatrix: SparseRowMajorMatrix,
        SparseColumnMajorMatrix: SparseColumnMajorMatrix,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: DenseRowVector,
        SparseColumnVector: SparseColumnVector,
        SparseRowVector: SparseRowVector,
        Scalar: Scalar,
    ]
}

// Sums and differences share one table: sparse only when both operands are,
// the common storage order when the operands agree, row-major otherwise.
macro_rules! additive_table {
    ($trait:ident) => {
        table! { $trait;
            DenseRowMajorMatrix => [
                DenseRowMajorMatrix: DenseRowMajorMatrix,
                DenseColumnMajorMatrix: DenseRowMajorMatrix,
                SparseRowMajorMatrix: DenseRowMajorMatrix,
                SparseColumnMajorMatrix: DenseRowMajorMatrix,
                DenseColumnVector: Invalid,
                DenseRowVector: Invalid,
                SparseColumnVector: Invalid,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            DenseColumnMajorMatrix => [
                DenseRowMajorMatrix: DenseRowMajorMatrix,
                DenseColumnMajorMatrix: DenseColumnMajorMatrix,
                SparseRowMajorMatrix: DenseRowMajorMatrix,
                SparseColumnMajorMatrix: DenseColumnMajorMatrix,
                DenseColumnVector: Invalid,
                DenseRowVector: Invalid,
                SparseColumnVector: Invalid,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            SparseRowMajorMatrix => [
                DenseRowMajorMatrix: DenseRowMajorMatrix,
                DenseColumnMajorMatrix: DenseRowMajorMatrix,
                SparseRowMajorMatrix: SparseRowMajorMatrix,
                SparseColumnMajorMatrix: SparseRowMajorMatrix,
                DenseColumnVector: Invalid,
                DenseRowVector: Invalid,
                SparseColumnVector: Invalid,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            SparseColumnMajorMatrix => [
                DenseRowMajorMatrix: DenseRowMajorMatrix,
                DenseColumnMajorMatrix: DenseColumnMajorMatrix,
                SparseRowMajorMatrix: SparseRowMajorMatrix,
                SparseColumnMajorMatrix: SparseColumnMajorMatrix,
                DenseColumnVector: Invalid,
                DenseRowVector: Invalid,
                SparseColumnVector: Invalid,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            DenseColumnVector => [
                DenseRowMajorMatrix: Invalid,
                DenseColumnMajorMatrix: Invalid,
                SparseRowMajorMatrix: Invalid,
                SparseColumnMajorMatrix: Invalid,
                DenseColumnVector: DenseColumnVector,
                DenseRowVector: Invalid,
                SparseColumnVector: DenseColumnVector,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            DenseRowVector => [
                DenseRowMajorMatrix: Invalid,
                DenseColumnMajorMatrix: Invalid,
                SparseRowMajorMatrix: Invalid,
                SparseColumnMajorMatrix: Invalid,
                DenseColumnVector: Invalid,
                DenseRowVector: DenseRowVector,
                SparseColumnVector: Invalid,
                SparseRowVector: DenseRowVector,
                Scalar: Invalid,
            ]
            SparseColumnVector => [
                DenseRowMajorMatrix: Invalid,
                DenseColumnMajorMatrix: Invalid,
                SparseRowMajorMatrix: Invalid,
                SparseColumnMajorMatrix: Invalid,
                DenseColumnVector: DenseColumnVector,
                DenseRowVector: Invalid,
                SparseColumnVector: SparseColumnVector,
                SparseRowVector: Invalid,
                Scalar: Invalid,
            ]
            SparseRowVector => [
                DenseRowMajorMatrix: Invalid,
                DenseColumnMajorMatrix: Invalid,
                SparseRowMajorMatrix: Invalid,
                SparseColumnMajorMatrix: Invalid,
                DenseColumnVector: Invalid,
                DenseRowVector: DenseRowVector,
                SparseColumnVector: Invalid,
                SparseRowVector: SparseRowVector,
                Scalar: Invalid,
            ]
            Scalar => [
                DenseRowMajorMatrix: Invalid,
                DenseColumnMajorMatrix: Invalid,
                SparseRowMajorMatrix: Invalid,
                SparseColumnMajorMatrix: Invalid,
                DenseColumnVector: Invalid,
                DenseRowVector: Invalid,
                SparseColumnVector: Invalid,
                SparseRowVector: Invalid,
                Scalar: Scalar,
            ]
        }
    };
}

additive_table!(AddTrait);
additive_table!(SubTrait);

// Cross products: equal orientations give a dense vector of that orientation.
table! { CrossTrait;
    DenseRowMajorMatrix => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: Invalid,
        SparseColumnVector: Invalid,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    DenseColumnMajorMatrix => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: Invalid,
        SparseColumnVector: Invalid,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    SparseRowMajorMatrix => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: Invalid,
        SparseColumnVector: Invalid,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    SparseColumnMajorMatrix => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: Invalid,
        SparseColumnVector: Invalid,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    DenseColumnVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: DenseColumnVector,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    DenseRowVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: DenseRowVector,
        SparseColumnVector: Invalid,
        SparseRowVector: DenseRowVector,
        Scalar: Invalid,
    ]
    SparseColumnVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: DenseColumnVector,
        DenseRowVector: Invalid,
        SparseColumnVector: DenseColumnVector,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
    SparseRowVector => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: DenseRowVector,
        SparseColumnVector: Invalid,
        SparseRowVector: DenseRowVector,
        Scalar: Invalid,
    ]
    Scalar => [
        DenseRowMajorMatrix: Invalid,
        DenseColumnMajorMatrix: Invalid,
        SparseRowMajorMatrix: Invalid,
        SparseColumnMajorMatrix: Invalid,
        DenseColumnVector: Invalid,
        DenseRowVector: Invalid,
        SparseColumnVector: Invalid,
        SparseRowVector: Invalid,
        Scalar: Invalid,
    ]
}
