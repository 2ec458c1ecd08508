//! Products agree with their definition across storage orders and sparsity

mod common;

use common::*;
use lazy_core::prelude::*;
use proptest::prelude::*;

fn matrix_strategy(rows: usize, columns: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, rows * columns)
}

fn dims() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..12, 1usize..12, 1usize..12)
}

proptest! {
    // c[i][j] is row i of a dotted with column j of b
    #[test]
    fn prop_product_matches_definition(
        (m, n, p) in dims(),
        seed in any::<u64>(),
    ) {
        let a = DynamicMatrix::<f64>::from_fn(m, n, |i, j| ((seed as usize).wrapping_add(i * 31 + j * 17) % 23) as f64 - 11.0);
        let b = DynamicMatrix::<f64, ColumnMajor>::from_fn(n, p, |i, j| ((i * 13 + j * 5) % 19) as f64 * 0.25);
        let expected = naive_product(&a, &b);

        let row = DynamicMatrix::<f64>::from_expr(&a * &b);
        let column = DynamicMatrix::<f64, ColumnMajor>::from_expr(&a * &b);
        assert_matrix_close(&row, &expected, 1e-9);
        assert_matrix_close(&column, &expected, 1e-9);

        let product = &a * &b;
        prop_assert_eq!(product.rows(), m);
        prop_assert_eq!(product.columns(), p);
    }

    #[test]
    fn prop_product_values_from_strategy(
        values in matrix_strategy(4, 5),
        others in matrix_strategy(5, 3),
    ) {
        let a = DynamicMatrix::<f64>::from_vec(4, 5, values).unwrap();
        let b = DynamicMatrix::<f64>::from_vec(5, 3, others).unwrap();
        let expected = naive_product(&a, &b);
        let c = DynamicMatrix::<f64>::from_expr(&a * &b);
        assert_matrix_close(&c, &expected, 1e-9);
    }

    // trans(trans(a)) reads exactly like a
    #[test]
    fn prop_transpose_involution(values in matrix_strategy(3, 7)) {
        let a = DynamicMatrix::<f64>::from_vec(3, 7, values).unwrap();
        let t = trans(&a);
        prop_assert_eq!((t.rows(), t.columns()), (7, 3));
        let back = trans(t);
        prop_assert!(std::ptr::eq(back, &a));

        let materialized = DynamicMatrix::<f64>::from_expr(trans(trans(&a)));
        prop_assert_eq!(materialized.as_slice(), a.as_slice());
    }

    // A sparse copy of an operand gives the same product
    #[test]
    fn prop_sparse_operands_agree(
        values in prop::collection::vec(prop_oneof![Just(0.0), -10.0f64..10.0], 6 * 4),
    ) {
        let dense = DynamicMatrix::<f64>::from_vec(6, 4, values).unwrap();
        let sparse = CompressedMatrix::<f64>::from_expr(&dense);
        let b = sample_matrix(4, 5);
        let expected = naive_product(&dense, &b);

        assert_matrix_close(&DynamicMatrix::<f64>::from_expr(&sparse * &b), &expected, 1e-9);
        assert_matrix_close(&DynamicMatrix::<f64>::from_expr(trans(&b) * trans(&sparse)), &transpose(&expected), 1e-9);

        let x = DynamicVector::<f64>::from_fn(4, |i| i as f64 - 1.5);
        let y = DynamicVector::<f64>::from_expr(&sparse * &x);
        for i in 0..6 {
            let reference: f64 = (0..4).map(|k| dense[(i, k)] * x[k]).sum();
            prop_assert!((y[i] - reference).abs() < 1e-9);
        }
    }
}

fn transpose(m: &[Vec<f64>]) -> Vec<Vec<f64>> {
    (0..m[0].len()).map(|j| m.iter().map(|row| row[j]).collect()).collect()
}

#[test]
fn test_static_product_shape_is_known_at_build_time() {
    let a = StaticMatrix::<f64, 2, 3>::from_fn(|i, j| (i + j) as f64);
    let b = StaticMatrix::<f64, 3, 4>::from_fn(|i, j| (i * j) as f64);
    let product = &a * &b;
    assert_eq!(<lazy_core::expressions::MatMatMultExpr<&StaticMatrix<f64, 2, 3>, &StaticMatrix<f64, 3, 4>> as Matrix>::ROWS, Some(2));
    let c = StaticMatrix::<f64, 2, 4>::from_expr(product);
    assert_matrix_close(&c, &naive_product(&a, &b), EPSILON);
}

#[test]
fn test_chained_products_and_sums() {
    let a = sample_matrix(5, 4);
    let b = sample_matrix(4, 6);
    let c = sample_matrix(6, 3);
    let d = sample_matrix(5, 3);

    let ab = naive_product(&a, &b);
    let ab = DynamicMatrix::<f64>::from_fn(5, 6, |i, j| ab[i][j]);
    let mut expected = naive_product(&ab, &c);
    for (i, row) in expected.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = 2.0 * *value - d[(i, j)];
        }
    }

    let result = DynamicMatrix::<f64>::from_expr(&a * &b * &c * 2.0 - &d);
    assert_matrix_close(&result, &expected, 1e-9);

    let mut accumulated = d.clone();
    accumulated += &a * &b * &c;
    accumulated -= &a * &b * &c;
    let d_rows: Vec<Vec<f64>> = (0..5).map(|i| (0..3).map(|j| d[(i, j)]).collect()).collect();
    assert_matrix_close(&accumulated, &d_rows, 1e-9);
}

#[test]
fn test_eval_resolves_the_result_type() {
    let a = sample_matrix(3, 3);
    let s = CompressedMatrix::<f64>::from_expr(&a);
    let dense: DynamicMatrix<f64> = (&a * &s).eval();
    let sparse: CompressedMatrix<f64> = (&s * &s).eval();
    assert_matrix_close(&dense, &naive_product(&a, &a), 1e-9);
    assert_matrix_close(&sparse, &naive_product(&a, &a), 1e-9);

    let x = DynamicVector::<f64>::from(vec![1.0, 2.0, 3.0]);
    let dot: f64 = trans(&x) * &x;
    assert_relative_eq!(dot, 14.0);
}
