//! Slice kernels over the active register type
//!
//! Every kernel walks full registers first and finishes the tail with the
//! equivalent scalar operation. Operands are borrowed as slices, so inputs and
//! outputs can never overlap.

use super::{SimdElement, SimdFloat, SimdVector};
use num_traits::Float;

#[inline(always)]
fn load<T: SimdElement>(slice: &[T]) -> T::Vector {
    <T::Vector as SimdVector>::load(slice)
}

#[inline(always)]
fn body_len<T: SimdElement>(len: usize) -> usize {
    len - len % <T::Vector as SimdVector>::LANES
}

#[inline(always)]
fn check_lengths(a: usize, b: usize, kernel: &str) {
    assert_eq!(a, b, "{kernel}: slice lengths differ ({a} vs {b})");
}

/// `out[i] = f(src[i])`
#[inline(always)]
fn map_into<T, V, S>(src: &[T], dst: &mut [T], vector: V, scalar: S)
where
    T: SimdElement,
    V: Fn(T::Vector) -> T::Vector,
    S: Fn(T) -> T,
{
    check_lengths(src.len(), dst.len(), "map");
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(src.len());
    let (src_body, src_tail) = src.split_at(body);
    let (dst_body, dst_tail) = dst.split_at_mut(body);
    for (s, d) in src_body.chunks_exact(lanes).zip(dst_body.chunks_exact_mut(lanes)) {
        vector(load(s)).store(d);
    }
    for (s, d) in src_tail.iter().zip(dst_tail) {
        *d = scalar(*s);
    }
}

/// `out[i] = f(a[i], b[i])`
#[inline(always)]
fn zip_into<T, V, S>(a: &[T], b: &[T], out: &mut [T], vector: V, scalar: S)
where
    T: SimdElement,
    V: Fn(T::Vector, T::Vector) -> T::Vector,
    S: Fn(T, T) -> T,
{
    check_lengths(a.len(), b.len(), "zip");
    check_lengths(a.len(), out.len(), "zip");
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(a.len());
    let (a_body, a_tail) = a.split_at(body);
    let (b_body, b_tail) = b.split_at(body);
    let (out_body, out_tail) = out.split_at_mut(body);
    for ((x, y), o) in a_body
        .chunks_exact(lanes)
        .zip(b_body.chunks_exact(lanes))
        .zip(out_body.chunks_exact_mut(lanes))
    {
        vector(load(x), load(y)).store(o);
    }
    for ((x, y), o) in a_tail.iter().zip(b_tail).zip(out_tail) {
        *o = scalar(*x, *y);
    }
}

/// `dst[i] = f(dst[i], src[i])`
#[inline(always)]
fn update<T, V, S>(dst: &mut [T], src: &[T], vector: V, scalar: S)
where
    T: SimdElement,
    V: Fn(T::Vector, T::Vector) -> T::Vector,
    S: Fn(T, T) -> T,
{
    check_lengths(dst.len(), src.len(), "update");
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(dst.len());
    let (dst_body, dst_tail) = dst.split_at_mut(body);
    let (src_body, src_tail) = src.split_at(body);
    for (d, s) in dst_body.chunks_exact_mut(lanes).zip(src_body.chunks_exact(lanes)) {
        vector(load(d), load(s)).store(d);
    }
    for (d, s) in dst_tail.iter_mut().zip(src_tail) {
        *d = scalar(*d, *s);
    }
}

/// `out = a + b`
pub fn add<T: SimdElement>(a: &[T], b: &[T], out: &mut [T]) {
    zip_into(a, b, out, |x, y| x.add(y), |x, y| x + y);
}

/// `out = a - b`
pub fn sub<T: SimdElement>(a: &[T], b: &[T], out: &mut [T]) {
    zip_into(a, b, out, |x, y| x.sub(y), |x, y| x - y);
}

/// `out = a * b`, component-wise
pub fn mul<T: SimdElement>(a: &[T], b: &[T], out: &mut [T]) {
    zip_into(a, b, out, |x, y| x.mul(y), |x, y| x * y);
}

/// `dst += src`
pub fn add_assign<T: SimdElement>(dst: &mut [T], src: &[T]) {
    update(dst, src, |d, s| d.add(s), |d, s| d + s);
}

/// `dst -= src`
pub fn sub_assign<T: SimdElement>(dst: &mut [T], src: &[T]) {
    update(dst, src, |d, s| d.sub(s), |d, s| d - s);
}

/// `dst *= src`, component-wise
pub fn mul_assign<T: SimdElement>(dst: &mut [T], src: &[T]) {
    update(dst, src, |d, s| d.mul(s), |d, s| d * s);
}

/// `out = alpha * x`
pub fn scale<T: SimdElement>(alpha: T, x: &[T], out: &mut [T]) {
    let a = <T::Vector as SimdVector>::splat(alpha);
    map_into(x, out, |v| v.mul(a), |v| v * alpha);
}

/// `y *= alpha`
pub fn scale_in_place<T: SimdElement>(alpha: T, y: &mut [T]) {
    let a = <T::Vector as SimdVector>::splat(alpha);
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(y.len());
    let (y_body, y_tail) = y.split_at_mut(body);
    for d in y_body.chunks_exact_mut(lanes) {
        load(d).mul(a).store(d);
    }
    for d in y_tail {
        *d = *d * alpha;
    }
}

/// `y += alpha * x`
pub fn axpy<T: SimdElement>(alpha: T, x: &[T], y: &mut [T]) {
    let a = <T::Vector as SimdVector>::splat(alpha);
    update(y, x, |d, s| d.add(s.mul(a)), |d, s| d + s * alpha);
}

/// `y -= alpha * x`
pub fn axmy<T: SimdElement>(alpha: T, x: &[T], y: &mut [T]) {
    let a = <T::Vector as SimdVector>::splat(alpha);
    update(y, x, |d, s| d.sub(s.mul(a)), |d, s| d - s * alpha);
}

/// Inner product of two equally long slices
pub fn dot<T: SimdElement>(a: &[T], b: &[T]) -> T {
    check_lengths(a.len(), b.len(), "dot");
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(a.len());
    let mut acc = <T::Vector as SimdVector>::splat(T::zero());
    for (x, y) in a[..body].chunks_exact(lanes).zip(b[..body].chunks_exact(lanes)) {
        acc = acc.add(load(x).mul(load(y)));
    }
    let mut sum = acc.horizontal_sum();
    for (x, y) in a[body..].iter().zip(&b[body..]) {
        sum += *x * *y;
    }
    sum
}

/// `out = ceil(src)`
pub fn ceil<T>(src: &[T], out: &mut [T])
where
    T: SimdElement + Float,
    T::Vector: SimdFloat,
{
    map_into(src, out, |v| v.ceil(), |x| x.ceil());
}

/// `out = floor(src)`
pub fn floor<T>(src: &[T], out: &mut [T])
where
    T: SimdElement + Float,
    T::Vector: SimdFloat,
{
    map_into(src, out, |v| v.floor(), |x| x.floor());
}

/// `data = ceil(data)`
pub fn ceil_in_place<T>(data: &mut [T])
where
    T: SimdElement + Float,
    T::Vector: SimdFloat,
{
    round_in_place(data, |v| v.ceil(), |x| x.ceil());
}

/// `data = floor(data)`
pub fn floor_in_place<T>(data: &mut [T])
where
    T: SimdElement + Float,
    T::Vector: SimdFloat,
{
    round_in_place(data, |v| v.floor(), |x| x.floor());
}

#[inline(always)]
fn round_in_place<T, V, S>(data: &mut [T], vector: V, scalar: S)
where
    T: SimdElement,
    V: Fn(T::Vector) -> T::Vector,
    S: Fn(T) -> T,
{
    let lanes = <T::Vector as SimdVector>::LANES;
    let body = body_len::<T>(data.len());
    let (body, tail) = data.split_at_mut(body);
    for d in body.chunks_exact_mut(lanes) {
        vector(load(d)).store(d);
    }
    for d in tail {
        *d = scalar(*d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.75 - 3.0).collect()
    }

    #[test]
    fn test_add_sub_mul_against_scalar() {
        for n in [0, 1, 3, 7, 8, 9, 17, 33] {
            let a = ramp(n);
            let b: Vec<f64> = a.iter().map(|x| x * 2.0 + 1.0).collect();
            let mut out = vec![0.0; n];

            add(&a, &b, &mut out);
            for i in 0..n {
                assert_eq!(out[i], a[i] + b[i]);
            }
            sub(&a, &b, &mut out);
            for i in 0..n {
                assert_eq!(out[i], a[i] - b[i]);
            }
            mul(&a, &b, &mut out);
            for i in 0..n {
                assert_eq!(out[i], a[i] * b[i]);
            }
        }
    }

    #[test]
    fn test_in_place_updates() {
        let src = ramp(11);
        let mut dst = vec![1.0; 11];
        add_assign(&mut dst, &src);
        sub_assign(&mut dst, &src);
        assert!(dst.iter().all(|&x| x == 1.0));

        mul_assign(&mut dst, &src);
        assert_eq!(dst, src);

        scale_in_place(2.0, &mut dst);
        for (d, s) in dst.iter().zip(&src) {
            assert_eq!(*d, 2.0 * s);
        }
    }

    #[test]
    fn test_axpy_and_axmy() {
        let x = ramp(13);
        let mut y = vec![0.5; 13];
        axpy(3.0, &x, &mut y);
        for (i, v) in y.iter().enumerate() {
            assert_eq!(*v, 0.5 + x[i] * 3.0);
        }
        axmy(3.0, &x, &mut y);
        for v in &y {
            assert_relative_eq!(*v, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_scale_integers() {
        let x = [1i32, -2, 3, -4, 5];
        let mut out = [0i32; 5];
        scale(-3, &x, &mut out);
        assert_eq!(out, [-3, 6, -9, 12, -15]);
    }

    #[test]
    fn test_dot() {
        let a: Vec<f32> = (1..=19).map(|i| i as f32).collect();
        let b = vec![1.0f32; 19];
        assert_eq!(dot(&a, &b), 190.0);
        assert_eq!(dot::<u64>(&[], &[]), 0);
    }

    #[test]
    fn test_rounding_tail_and_body_agree() {
        let src: Vec<f64> = (0..21).map(|i| i as f64 * 0.5 - 5.25).collect();
        let mut up = vec![0.0; src.len()];
        let mut down = vec![0.0; src.len()];
        ceil(&src, &mut up);
        floor(&src, &mut down);
        for i in 0..src.len() {
            assert_eq!(up[i].to_bits(), src[i].ceil().to_bits());
            assert_eq!(down[i].to_bits(), src[i].floor().to_bits());
        }

        let mut data = src.clone();
        ceil_in_place(&mut data);
        assert_eq!(data, up);
        let mut data = src;
        floor_in_place(&mut data);
        assert_eq!(data, down);
    }

    #[test]
    #[should_panic(expected = "slice lengths differ")]
    fn test_length_mismatch_panics() {
        let mut out = [0.0f64; 2];
        add(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &mut out);
    }
}
