//! Assignments whose target shares storage with an operand

mod common;

use common::*;
use lazy_core::expressions;
use lazy_core::prelude::*;

/// Two views over one buffer: one read as an operand, one written as the target
fn with_shared_views<F>(data: &mut [f64], rows: usize, columns: usize, f: F)
where
    F: FnOnce(&CustomMatrix<'_, f64>, &mut CustomMatrix<'_, f64>),
{
    let ptr = data.as_mut_ptr();
    // SAFETY: both views cover `data`, which outlives them, and the caller
    // touches `data` only after they are dropped.
    let (source, mut target) = unsafe {
        (
            CustomMatrix::<f64>::from_raw_parts(ptr, rows, columns).unwrap(),
            CustomMatrix::<f64>::from_raw_parts(ptr, rows, columns).unwrap(),
        )
    };
    f(&source, &mut target);
}

#[test]
fn test_self_transpose_through_aliased_views() {
    let mut data: Vec<f64> = (0..9).map(|x| x as f64).collect();
    with_shared_views(&mut data, 3, 3, |a, target| {
        assert!(trans(a).can_alias(target.region()));
        target.assign(trans(a));
    });
    assert_eq!(data, vec![0.0, 3.0, 6.0, 1.0, 4.0, 7.0, 2.0, 5.0, 8.0]);
}

#[test]
fn test_self_product_through_aliased_views() {
    let mut data = vec![1.0, 2.0, 3.0, 4.0];
    with_shared_views(&mut data, 2, 2, |a, target| {
        target.assign(a * a);
    });
    assert_eq!(data, vec![7.0, 10.0, 15.0, 22.0]);
}

#[test]
fn test_element_wise_update_needs_no_temporary() {
    let mut data = vec![1.0, -2.0, 3.0, -4.0, 5.0, -6.0];
    let other = DynamicMatrix::<f64>::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
    with_shared_views(&mut data, 2, 3, |a, target| {
        let sum = a + &other;
        // Each element is read before it is written, so the aliased container
        // does not force a copy
        assert!(sum.is_aliased(target.region()));
        assert!(!sum.can_alias(target.region()));
        target.assign(sum);
    });
    assert_eq!(data, vec![1.0, -1.0, 5.0, -1.0, 9.0, -1.0]);
}

#[test]
fn test_nested_product_inside_sum_is_protected() {
    let mut data = vec![1.0, 2.0, 3.0, 4.0];
    with_shared_views(&mut data, 2, 2, |a, target| {
        let expr = a * a + a;
        assert!(expr.can_alias(target.region()));
        expressions::sub_assign(target, &expr);
    });
    // a - (a * a + a) = -(a * a)
    assert_eq!(data, vec![-7.0, -10.0, -15.0, -22.0]);
}

#[test]
fn test_disjoint_views_do_not_alias() {
    let mut data = vec![0.0; 8];
    let (head, tail) = data.split_at_mut(4);
    for (i, x) in head.iter_mut().enumerate() {
        *x = i as f64 + 1.0;
    }
    let source = CustomMatrix::<f64>::new(head, 2, 2).unwrap();
    let mut target = CustomMatrix::<f64>::new(tail, 2, 2).unwrap();
    assert!(!trans(&source).can_alias(target.region()));
    target.assign(trans(&source));
    assert_matrix_close(&target, &[vec![1.0, 3.0], vec![2.0, 4.0]], EPSILON);
}

#[test]
fn test_offset_view_is_copied_first() {
    let mut data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let ptr = data.as_mut_ptr();
    // SAFETY: both 1x4 views lie inside `data`, which is only read after
    // they are dropped.
    unsafe {
        let source = CustomMatrix::<f64>::from_raw_parts(ptr, 1, 4).unwrap();
        let mut target = CustomMatrix::<f64>::from_raw_parts(ptr.add(1), 1, 4).unwrap();
        let scaled = &source * 1.0;
        assert!(scaled.can_alias(target.region()));
        target.assign(scaled);
    }
    assert_eq!(data, vec![1.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_opposite_order_view_is_copied_first() {
    let mut data: Vec<f64> = (0..9).map(|x| x as f64).collect();
    let zero = DynamicMatrix::<f64>::new(3, 3);
    let ptr = data.as_mut_ptr();
    // SAFETY: as above; both views cover all of `data`
    unsafe {
        let source = CustomMatrix::<f64, ColumnMajor>::from_raw_parts(ptr, 3, 3).unwrap();
        let mut target = CustomMatrix::<f64, RowMajor>::from_raw_parts(ptr, 3, 3).unwrap();
        let sum = &source + &zero;
        assert!(sum.can_alias(target.region()));
        target.assign(sum);
    }
    assert_eq!(data, vec![0.0, 3.0, 6.0, 1.0, 4.0, 7.0, 2.0, 5.0, 8.0]);
}
