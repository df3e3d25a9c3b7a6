use crate::algebra::*;

#[test]
fn test_scalarop_and_scale() {
    let mut x = vec![3., 0., 2., 1.];
    x.scalarop(|v| if v > 0. { 1. / v } else { 1. }).scale(6.);
    assert_eq!(x, vec![2., 6., 3., 6.]);
}

#[test]
fn test_hadamard() {
    let mut x = vec![1., 2., 3., 4.];
    x.hadamard(&[-1., -2., -4., 8.]);
    assert_eq!(x, vec![-1., -4., -12., 32.]);
}

#[test]
fn test_dot() {
    let x = [3., 0., 2., 1.];
    let y = [-1., -2., 3., 4.];
    assert_eq!(x.dot(&y), 7.);
    assert_eq!(y.dot(&x), 7.);

    // small terms survive next to a large one
    let x = [1e16, 1., 1., -1e16];
    assert_eq!(x.dot(&[1.; 4]), 2.);
}

#[test]
fn test_min_max() {
    let x = [-3., 4., -12., -1.];
    assert_eq!(x.minimum(), -12.);
    assert_eq!(x.maximum(), 4.);
    assert_eq!(Vec::<f64>::new().minimum(), f64::INFINITY);
}
