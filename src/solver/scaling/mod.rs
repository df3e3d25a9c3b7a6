//! Row and column scaling of the constraint matrix.
//!
//! A scaled matrix has entries `R[i] * a[i][j] * C[j]`.  The simplex works
//! on the scaled problem, whose columns are `x[j] / C[j]` and whose rows
//! are `R[i] * (A x)[i]`.   Results are mapped back with the `unscale_*`
//! functions.

#![allow(non_snake_case)]
use crate::algebra::*;
use crate::solver::core::{ScaleAlgorithm, ScaleModes};
use crate::solver::model::ProblemData;
use itertools::izip;
use std::iter::zip;

// scale factors are kept in this range
const MIN_SCALE: f64 = 1e-10;
const MAX_SCALE: f64 = 1e10;

// ---------------
// scaling data
// ---------------

/// Diagonal row and column scaling of a constraint matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleFactors {
    /// row scaling terms
    pub row: Vec<f64>,
    /// column scaling terms
    pub col: Vec<f64>,
}

impl ScaleFactors {
    /// no scaling
    pub fn identity(m: usize, n: usize) -> Self {
        Self {
            row: vec![1.0; m],
            col: vec![1.0; n],
        }
    }

    /// true if every factor is 1
    #[cfg(test)]
    pub fn is_identity(&self) -> bool {
        self.row.iter().chain(self.col.iter()).all(|&s| s == 1.0)
    }

    /// Compute scale factors for `A`.
    ///
    /// The integer part of `scale_limit` is the maximum number of passes
    /// (0 meaning 20), the fractional part the relative improvement below
    /// which the passes stop.   Columns flagged in `integer` keep factor 1
    /// unless `ScaleModes::INTEGERS` is set.
    pub fn compute(
        A: &CscMatrix<f64>,
        integer: &[bool],
        algorithm: ScaleAlgorithm,
        modes: ScaleModes,
        scale_limit: f64,
    ) -> Self {
        let (m, n) = (A.m, A.n);
        let mut factors = Self::identity(m, n);
        if algorithm == ScaleAlgorithm::None || A.nnz() == 0 {
            return factors;
        }

        let passes = match scale_limit.trunc() as usize {
            0 => 20,
            p => p,
        };
        let tol = scale_limit.fract();
        let fixed: Vec<bool> = if modes.contains(ScaleModes::INTEGERS) {
            vec![false; n]
        } else {
            integer.to_vec()
        };

        let mut work = A.clone();

        if algorithm == ScaleAlgorithm::CurtisReid {
            let (r, c) = curtis_reid(&work, &fixed, passes, tol);
            work.lrscale(&r, &c);
            factors.row.hadamard(&r);
            factors.col.hadamard(&c);
        } else {
            let mut r = vec![1.0; m];
            let mut c = vec![1.0; n];
            let mut spread = log_spread(&work);

            for _ in 0..passes {
                row_factors(&work, algorithm, &mut r);
                work.lscale(&r);
                factors.row.hadamard(&r);

                col_factors(&work, algorithm, &mut c);
                mask_fixed(&mut c, &fixed);
                work.rscale(&c);
                factors.col.hadamard(&c);

                let next = log_spread(&work);
                let converged = spread - next <= tol * spread;
                spread = next;
                if converged {
                    break;
                }
            }
        }

        if modes.contains(ScaleModes::EQUILIBRATE) {
            let mut c = vec![1.0; n];
            work.col_norms(&mut c);
            c.scalarop(|x| if x > 0.0 { 1.0 / x } else { 1.0 });
            mask_fixed(&mut c, &fixed);
            work.rscale(&c);
            factors.col.hadamard(&c);
        }

        let power2 = modes.contains(ScaleModes::POWER2);
        for s in factors.row.iter_mut().chain(factors.col.iter_mut()) {
            *s = s.clamp(MIN_SCALE, MAX_SCALE);
            if power2 {
                *s = s.log2().round().exp2();
            }
        }
        factors
    }

    /// `A <- R A C`
    pub fn scale_matrix(&self, A: &mut CscMatrix<f64>) {
        A.lrscale(&self.row, &self.col);
    }

    /// `A <- R⁻¹ A C⁻¹`
    #[cfg(test)]
    pub fn unscale_matrix(&self, A: &mut CscMatrix<f64>) {
        let rinv: Vec<f64> = self.row.iter().map(|s| s.recip()).collect();
        let cinv: Vec<f64> = self.col.iter().map(|s| s.recip()).collect();
        A.lrscale(&rinv, &cinv);
    }

    /// Transform a problem into its scaled form in place.
    pub(crate) fn scale_problem(&self, data: &mut ProblemData) {
        self.scale_matrix(&mut data.a);
        for (c, lo, hi, &s) in izip!(
            data.cost.iter_mut(),
            data.col_lower.iter_mut(),
            data.col_upper.iter_mut(),
            &self.col
        ) {
            *c *= s;
            *lo /= s;
            *hi /= s;
        }
        for (lo, hi, &s) in izip!(
            data.row_lower.iter_mut(),
            data.row_upper.iter_mut(),
            &self.row
        ) {
            *lo *= s;
            *hi *= s;
        }
    }

    /// column values of the original problem from scaled ones
    pub(crate) fn unscale_columns(&self, x: &mut [f64]) {
        x.hadamard(&self.col);
    }

    /// a single original column value from a scaled one
    pub(crate) fn unscale_column(&self, j: usize, v: f64) -> f64 {
        v * self.col[j]
    }

    /// a single scaled column value from an original one
    pub(crate) fn scale_column(&self, j: usize, v: f64) -> f64 {
        v / self.col[j]
    }

    /// row duals of the original problem from scaled ones
    pub(crate) fn unscale_duals(&self, y: &mut [f64]) {
        y.hadamard(&self.row);
    }
}

fn mask_fixed(c: &mut [f64], fixed: &[bool]) {
    for (s, &f) in zip(c.iter_mut(), fixed) {
        if f {
            *s = 1.0;
        }
    }
}

// row wise magnitudes (min, max, sum, count) over the stored entries
fn row_stats(A: &CscMatrix<f64>) -> Vec<(f64, f64, f64, usize)> {
    let mut stats = vec![(f64::INFINITY, 0.0, 0.0, 0); A.m];
    for (&r, &v) in zip(&A.rowval, &A.nzval) {
        let a = v.abs();
        let s = &mut stats[r];
        s.0 = s.0.min(a);
        s.1 = f64::max(s.1, a);
        s.2 += a;
        s.3 += 1;
    }
    stats
}

fn col_stats(A: &CscMatrix<f64>) -> Vec<(f64, f64, f64, usize)> {
    (0..A.n)
        .map(|j| {
            let (_, vals) = A.col(j);
            vals.iter().fold((f64::INFINITY, 0.0, 0.0, 0), |s, &v| {
                let a = v.abs();
                (s.0.min(a), f64::max(s.1, a), s.2 + a, s.3 + 1)
            })
        })
        .collect()
}

fn factor_from_stats(algorithm: ScaleAlgorithm, stats: (f64, f64, f64, usize)) -> f64 {
    let (min, max, sum, count) = stats;
    if count == 0 || max == 0.0 {
        return 1.0;
    }
    match algorithm {
        ScaleAlgorithm::Extreme => 1.0 / max,
        ScaleAlgorithm::Range => 2.0 / (min + max),
        ScaleAlgorithm::Mean => count as f64 / sum,
        _ => 1.0 / (min * max).sqrt(),
    }
}

fn row_factors(A: &CscMatrix<f64>, algorithm: ScaleAlgorithm, r: &mut [f64]) {
    for (s, stats) in zip(r.iter_mut(), row_stats(A)) {
        *s = factor_from_stats(algorithm, stats);
    }
}

fn col_factors(A: &CscMatrix<f64>, algorithm: ScaleAlgorithm, c: &mut [f64]) {
    for (s, stats) in zip(c.iter_mut(), col_stats(A)) {
        *s = factor_from_stats(algorithm, stats);
    }
}

// sum of squared log2 magnitudes, zero for a perfectly scaled matrix
fn log_spread(A: &CscMatrix<f64>) -> f64 {
    A.nzval.iter().map(|v| v.abs().log2().powi(2)).sum()
}

// Curtis-Reid: least squares fit of log2|a_ij| + rho_i + gamma_j = 0 by
// alternating row and column updates
fn curtis_reid(
    A: &CscMatrix<f64>,
    fixed: &[bool],
    passes: usize,
    tol: f64,
) -> (Vec<f64>, Vec<f64>) {
    let (m, n) = (A.m, A.n);
    let mut rho = vec![0.0; m];
    let mut gamma = vec![0.0; n];
    let tol = tol.max(1e-3);

    let mut row_count = vec![0usize; m];
    for &r in A.rowval.iter() {
        row_count[r] += 1;
    }

    for _ in 0..passes.max(20) {
        let mut row_sum = vec![0.0; m];
        for j in 0..n {
            let (rows, vals) = A.col(j);
            for (&r, &v) in zip(rows, vals) {
                row_sum[r] += v.abs().log2() + gamma[j];
            }
        }
        let mut change: f64 = 0.0;
        for (rh, &sum, &count) in izip!(rho.iter_mut(), &row_sum, &row_count) {
            if count > 0 {
                let next = -sum / count as f64;
                change = change.max((next - *rh).abs());
                *rh = next;
            }
        }

        for j in (0..n).filter(|&j| !fixed[j]) {
            let (rows, vals) = A.col(j);
            if rows.is_empty() {
                continue;
            }
            let sum: f64 = zip(rows, vals)
                .map(|(&r, &v)| v.abs().log2() + rho[r])
                .sum();
            let next = -sum / rows.len() as f64;
            change = change.max((next - gamma[j]).abs());
            gamma[j] = next;
        }

        if change < tol {
            break;
        }
    }

    let r = rho.iter().map(|x| x.exp2()).collect();
    let c = gamma.iter().map(|x| x.exp2()).collect();
    (r, c)
}
