use crate::algebra::*;
use std::iter::zip;

impl<T: FloatT> MatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        if b == T::zero() {
            y.fill(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }
        if a == T::zero() {
            return;
        }
        for (j, &xj) in x.iter().enumerate() {
            if xj == T::zero() {
                continue;
            }
            let (rows, vals) = self.col(j);
            for (&i, &aij) in zip(rows, vals) {
                y[i] += a * aij * xj;
            }
        }
    }
}

impl<T: FloatT> MatrixMath for CscMatrix<T> {
    type T = T;

    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);
        for (j, v) in norms.iter_mut().enumerate() {
            let (_, vals) = self.col(j);
            *v = vals.iter().fold(T::zero(), |m, &a| m.max(a.abs()));
        }
    }

    fn lscale(&mut self, l: &[T]) {
        for (val, &row) in zip(&mut self.nzval, &self.rowval) {
            *val *= l[row];
        }
    }

    fn rscale(&mut self, r: &[T]) {
        for (j, &rj) in r.iter().enumerate() {
            let rng = self.colptr[j]..self.colptr[j + 1];
            self.nzval[rng].scale(rj);
        }
    }

    fn lrscale(&mut self, l: &[T], r: &[T]) {
        for (j, &rj) in r.iter().enumerate() {
            let rng = self.colptr[j]..self.colptr[j + 1];
            for (val, &row) in zip(&mut self.nzval[rng.clone()], &self.rowval[rng]) {
                *val *= l[row] * rj;
            }
        }
    }
}
