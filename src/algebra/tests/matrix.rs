#![allow(non_snake_case)]
use crate::algebra::*;

//  [-1  -17   6   10]
//  [ 3    .   7    .]
//  [ .   -4   .   -5]
fn test_matrix_3x4() -> CscMatrix<f64> {
    CscMatrix::from_columns(
        3,
        &[
            vec![(0, -1.), (1, 3.)],
            vec![(0, -17.), (2, -4.)],
            vec![(0, 6.), (1, 7.)],
            vec![(0, 10.), (2, -5.)],
        ],
    )
}

#[test]
fn test_check_format() {
    let A = test_matrix_3x4();
    assert_eq!(A.nnz(), 8);
    assert!(A.check_format().is_ok());

    let mut B = A.clone();
    B.rowval.swap(0, 1);
    assert_eq!(B.check_format(), Err(SparseFormatError::BadRowOrdering));

    let mut B = A.clone();
    B.rowval[7] = 3;
    assert_eq!(B.check_format(), Err(SparseFormatError::BadRowval(3)));

    let mut B = A;
    B.colptr.pop();
    assert_eq!(
        B.check_format(),
        Err(SparseFormatError::IncompatibleDimension)
    );
}

#[test]
fn test_col_norms() {
    let A = test_matrix_3x4();
    let mut norms = vec![0.; 4];
    A.col_norms(&mut norms);
    assert_eq!(norms, vec![3., 17., 7., 10.]);
}

#[test]
fn test_lrscale_matches_separate_scaling() {
    let mut A = test_matrix_3x4();
    let l = [2., 1., -1.];
    let r = [1., 0.5, 1., 2.];
    A.lrscale(&l, &r);
    assert_eq!(A.nzval, vec![-2., 3., -17., 2., 12., 7., 40., 10.]);

    let mut B = test_matrix_3x4();
    B.lscale(&l);
    B.rscale(&r);
    assert_eq!(A, B);
}

#[test]
fn test_gemv() {
    let A = test_matrix_3x4();
    let x = [1., 2., -3., 4.];

    let mut y = [1., 1., 1.];
    A.gemv(&mut y, &x, 1., 0.);
    assert_eq!(y, [-13., -18., -28.]);

    // y = -A*x + 2*y
    let mut y = [1., 1., 1.];
    A.gemv(&mut y, &x, -1., 2.);
    assert_eq!(y, [15., 20., 30.]);
}
