//! Shared utilities for integration tests
#![allow(dead_code)]

pub use approx::assert_relative_eq;

use lazy_core::{DynamicMatrix, Matrix};

pub const EPSILON: f64 = 1e-10;

/// Lengths around every register width, so kernels hit both body and tail
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,  // Empty
        1,  // Single element
        2,  // SSE f64 width
        3,  // SSE width + 1
        4,  // AVX f64 width
        5,  // AVX width + 1
        7,  // AVX f32 width - 1
        8,  // AVX-512 f64 width
        9,  // AVX-512 width + 1
        15, // Multiple of no width
        16, // AVX-512 f32 width
        17, // Power of 2 + 1
        31, // Prime
        33, // Two registers and a tail
        64, // Cache line of f64
        100,
    ]
}

/// Values where rounding is easy to get wrong
pub fn rounding_values() -> Vec<f64> {
    vec![
        0.0,
        -0.0,
        0.5,
        -0.5,
        1.5,
        -1.5,
        2.5,
        -2.5,
        0.49999999999999994,
        -0.49999999999999994,
        1.0,
        -1.0,
        f64::MIN_POSITIVE,
        -f64::MIN_POSITIVE,
        f64::EPSILON,
        -f64::EPSILON,
        4503599627370495.5, // Largest value with a fractional part
        -4503599627370495.5,
        4503599627370496.0, // 2^52, every larger value is integral
        f64::MAX,
        f64::MIN,
        1e308,
        -1e308,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ]
}

/// The f32 counterpart of [`rounding_values`]
pub fn rounding_values_f32() -> Vec<f32> {
    vec![
        0.0,
        -0.0,
        0.5,
        -0.5,
        1.5,
        -1.5,
        0.49999997, // Largest value below 0.5
        -0.49999997,
        f32::MIN_POSITIVE,
        -f32::MIN_POSITIVE,
        f32::EPSILON,
        -f32::EPSILON,
        8388607.5, // Largest value with a fractional part
        -8388607.5,
        8388608.0, // 2^23, every larger value is integral
        -8388608.0,
        16777216.0, // 2^24, last exact integer step of 1
        f32::MAX,
        f32::MIN,
        3.0e38,
        -3.0e38,
        f32::INFINITY,
        f32::NEG_INFINITY,
    ]
}

/// Fill `len` values by cycling through `values`
pub fn cycled<T: Copy>(values: &[T], len: usize) -> Vec<T> {
    values.iter().copied().cycle().take(len).collect()
}

/// Assert two slices agree bit for bit (so `0.0` and `-0.0` differ)
pub fn assert_bits_equal(actual: &[f64], expected: &[f64], context: &str) {
    assert_eq!(actual.len(), expected.len(), "length mismatch for {context}");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "{context}: index {i}: got {a:e}, expected {e:e}"
        );
    }
}

pub fn assert_bits_equal_f32(actual: &[f32], expected: &[f32], context: &str) {
    assert_eq!(actual.len(), expected.len(), "length mismatch for {context}");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "{context}: index {i}: got {a:e}, expected {e:e}"
        );
    }
}

/// Reference product: `c[i][j] = sum_k a[i][k] * b[k][j]`
pub fn naive_product<A, B>(a: &A, b: &B) -> Vec<Vec<f64>>
where
    A: Matrix<Element = f64>,
    B: Matrix<Element = f64>,
{
    let mut c = vec![vec![0.0; b.columns()]; a.rows()];
    for (i, row) in c.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            for k in 0..a.columns() {
                *value += a.at(i, k) * b.at(k, j);
            }
        }
    }
    c
}

/// Assert every element of `actual` is within `epsilon` of `expected`
pub fn assert_matrix_close<M: Matrix<Element = f64>>(actual: &M, expected: &[Vec<f64>], epsilon: f64) {
    assert_eq!(actual.rows(), expected.len(), "row count");
    for (i, row) in expected.iter().enumerate() {
        assert_eq!(actual.columns(), row.len(), "column count");
        for (j, &value) in row.iter().enumerate() {
            assert_relative_eq!(actual.at(i, j), value, epsilon = epsilon, max_relative = epsilon);
        }
    }
}

/// Deterministic test matrix with distinct entries
pub fn sample_matrix(rows: usize, columns: usize) -> DynamicMatrix<f64> {
    DynamicMatrix::from_fn(rows, columns, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0)
}
