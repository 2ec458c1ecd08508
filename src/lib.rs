//! Expression-template linear algebra with build-time SIMD dispatch
//!
//! `lazy-linalg` re-exports the workspace crates under one name. See
//! [`lazy_core`] for the architecture.
//!
//! # Quick Start
//!
//! ```rust
//! use lazy_linalg::prelude::*;
//!
//! let a = DynamicMatrix::<f64>::from_fn(3, 3, |i, j| (i + j) as f64);
//! let b = StaticMatrix::<f64, 3, 3>::from_fn(|i, j| if i == j { 2.0 } else { 0.0 });
//!
//! // One pass over memory, no temporaries
//! let mut c = DynamicMatrix::<f64>::new(3, 3);
//! c.assign(&a + &b);
//! assert_eq!(c[(1, 1)], 4.0);
//!
//! // Products are evaluated through their own kernel
//! c.assign(&a * &b);
//! assert_eq!(c[(2, 1)], 6.0);
//! ```
//!
//! # Errors
//!
//! Building a container from raw data returns [`Result`]; the error converts
//! into `anyhow::Error` for applications.
//!
//! ```rust
//! use lazy_linalg::prelude::*;
//!
//! fn build(values: Vec<f64>) -> anyhow::Result<DynamicVector<f64>> {
//!     let a = DynamicMatrix::<f64>::from_vec(2, 2, values)?;
//!     let x = DynamicVector::<f64>::from_vec(vec![1.0, 2.0]);
//!     Ok(DynamicVector::<f64>::from_expr(floor(&a * &x * 0.5)))
//! }
//!
//! let y = build(vec![2.0, -1.0, 0.5, 3.0])?;
//! assert_eq!(y.as_slice(), &[0.0, 3.0]);
//!
//! let err = build(vec![1.0; 3]).unwrap_err();
//! assert!(err.to_string().contains("Size mismatch"));
//! assert!(lazy_linalg::SimdConfig::current().f64_lanes >= 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub use lazy_core::*;

/// Convenient imports for the common case
pub mod prelude {
    pub use lazy_core::prelude::*;
}
