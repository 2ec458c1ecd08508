//! Core of lazy-linalg: containers, expression templates and SIMD kernels
//!
//! Arithmetic on matrices and vectors builds lightweight expression proxies
//! instead of computing anything. The work happens once, when a proxy is
//! assigned into a container, so `c.assign(&a + &b * 2.0)` makes one pass over
//! memory with no temporaries.
//!
//! # Architecture Overview
//!
//! 1. **Capabilities** ([`typetraits`]) - every operand carries a category tag
//!    (dense/sparse, matrix/vector, storage order, orientation)
//! 2. **Resolution** ([`resolve`]) - operator tables name the result category
//!    and container of every operation
//! 3. **Constraints** ([`constraints`]) - static shape checks that fail the build
//! 4. **Expressions** ([`expressions`]) - proxies, operators and assignment
//! 5. **Kernels** ([`simd`]) - slice kernels over the build-time SIMD tier
//!
//! # Example
//!
//! ```rust
//! use lazy_core::{trans, DynamicMatrix, DynamicVector, Matrix};
//!
//! let a = DynamicMatrix::<f64>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! let x = DynamicVector::<f64>::from(vec![1.0, -1.0]);
//!
//! // Nothing is computed until the proxy is assigned
//! let y = DynamicVector::<f64>::from_expr(&a * &x);
//! assert_eq!(y.as_slice(), &[-1.0, -1.0]);
//!
//! let t = trans(&a);
//! assert_eq!(t.at(0, 1), 3.0);
//!
//! let mut c = DynamicMatrix::<f64>::new(2, 2);
//! c.assign(&a * trans(&a) - &a);
//! assert_eq!(c[(1, 1)], 21.0);
//! ```

pub mod constraints;
pub mod containers;
pub mod error;
pub mod expressions;
pub mod numeric;
pub mod resolve;
pub mod simd;
pub mod traits;
pub mod typetraits;

// Re-export core types
pub use error::{Error, Result};

pub use containers::{
    CompressedMatrix, CompressedVector, CustomMatrix, DynamicMatrix, DynamicVector, StaticMatrix,
    StaticVector,
};

pub use expressions::{abs, ceil, cross, floor, inner, trans, Transpose};
pub use expressions::{add_assign, add_assign_vector, assign, assign_vector, sub_assign, sub_assign_vector};

pub use numeric::{MakeUnsigned, Numeric, Unsigned};

pub use resolve::{
    AddTrait, AddTraitType, CrossTrait, CrossTraitType, MultTrait, MultTraitType, ResultFor, SubTrait,
    SubTraitType, TransTraitType,
};

pub use simd::{best_tier_name, SimdConfig, SimdTier};

pub use traits::{
    DenseMatrixMut, DenseVectorMut, FromMatrix, FromVector, Layout, Matrix, Operand, Region, ResultType, Vector,
};

pub use typetraits::{Capabilities, CategoryKind, ColumnMajor, ColumnVector, Invalid, RowMajor, RowVector};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Containers
        CompressedMatrix,
        CompressedVector,
        CustomMatrix,
        DynamicMatrix,
        DynamicVector,
        StaticMatrix,
        StaticVector,
        // Operand traits
        DenseMatrixMut,
        DenseVectorMut,
        Matrix,
        Numeric,
        Operand,
        Result,
        Vector,
        // Layout tags
        ColumnMajor,
        ColumnVector,
        RowMajor,
        RowVector,
    };

    pub use crate::error::Error;

    // Expression builders
    pub use crate::expressions::{abs, ceil, cross, floor, inner, trans};
}
