use super::{PostOp, PresolveInfeasible, Presolver};
use std::collections::HashMap;

type Reduction = Result<bool, PresolveInfeasible>;

// relative tolerance for recognizing parallel rows and integral
// coefficients
const COEFF_TOL: f64 = 1e-9;

impl Presolver {
    // ---------------------------------
    // helpers
    // ---------------------------------

    fn bound_tol(&self, v: f64) -> f64 {
        self.tol * (1.0 + v.abs())
    }

    fn entry(&self, i: usize, j: usize) -> Result<usize, usize> {
        self.rows[i].binary_search_by_key(&j, |&(c, _)| c)
    }

    /// kept rows holding column `j`, with the coefficient
    fn column_entries(&self, j: usize) -> Vec<(usize, f64)> {
        (0..self.rows.len())
            .filter(|&i| self.keep_row[i])
            .filter_map(|i| self.entry(i, j).ok().map(|k| (i, self.rows[i][k].1)))
            .collect()
    }

    fn column_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.keep_col.len()];
        for (row, _) in self.rows.iter().zip(&self.keep_row).filter(|(_, &k)| k) {
            for &(j, _) in row.iter() {
                counts[j] += 1;
            }
        }
        counts
    }

    /// Intersect the bounds of column `j` with `[lower, upper]`, rounded
    /// inward for integer columns.
    fn tighten_column(
        &mut self,
        j: usize,
        lower: f64,
        upper: f64,
    ) -> Result<(), PresolveInfeasible> {
        let (mut lower, mut upper) = (lower, upper);
        if self.integer[j] {
            lower = (lower - self.int_tol).ceil();
            upper = (upper + self.int_tol).floor();
        }
        let lo = self.col_lower[j].max(lower);
        let hi = self.col_upper[j].min(upper);
        if lo > hi + self.bound_tol(hi) {
            return Err(PresolveInfeasible);
        }
        self.col_lower[j] = lo;
        self.col_upper[j] = hi.max(lo);
        Ok(())
    }

    /// Remove column `j` at `value`, moving its contribution into the row
    /// bounds and the objective constant.
    fn fix_column(&mut self, j: usize, value: f64) {
        for i in 0..self.rows.len() {
            if !self.keep_row[i] {
                continue;
            }
            if let Ok(k) = self.entry(i, j) {
                let (_, a) = self.rows[i].remove(k);
                self.row_lower[i] -= a * value;
                self.row_upper[i] -= a * value;
            }
        }
        self.offset += self.cost[j] * value;
        self.keep_col[j] = false;
        self.ops.push(PostOp::Fix { col: j, value });
    }

    // ---------------------------------
    // reductions
    // ---------------------------------

    /// Drop empty rows and turn singleton rows into column bounds.
    pub(super) fn reduce_rows(&mut self) -> Reduction {
        let mut changed = false;
        for i in 0..self.rows.len() {
            if !self.keep_row[i] {
                continue;
            }
            let (lo, hi) = (self.row_lower[i], self.row_upper[i]);
            match self.rows[i].len() {
                0 => {
                    if lo > self.bound_tol(lo) || hi < -self.bound_tol(hi) {
                        return Err(PresolveInfeasible);
                    }
                }
                1 => {
                    let (j, a) = self.rows[i][0];
                    if self.protected[j] || a.abs() <= COEFF_TOL {
                        continue;
                    }
                    let (l, u) = if a > 0.0 {
                        (lo / a, hi / a)
                    } else {
                        (hi / a, lo / a)
                    };
                    self.tighten_column(j, l, u)?;
                }
                _ => continue,
            }
            self.keep_row[i] = false;
            changed = true;
        }
        Ok(changed)
    }

    /// Substitute out fixed columns and fix empty columns at the bound
    /// the objective prefers.
    pub(super) fn reduce_columns(&mut self) -> Reduction {
        let mut changed = false;
        let counts = self.column_counts();
        for j in 0..self.keep_col.len() {
            if !self.keep_col[j] || self.protected[j] {
                continue;
            }
            let (l, u) = (self.col_lower[j], self.col_upper[j]);
            if l.is_finite() && u - l <= self.bound_tol(l) {
                self.fix_column(j, l);
                changed = true;
            } else if counts[j] == 0 {
                let c = self.cost[j];
                let mut value = if c > 0.0 || (c == 0.0 && l.is_finite()) {
                    l
                } else if c < 0.0 || u.is_finite() {
                    u
                } else {
                    0.0
                };
                if !value.is_finite() {
                    // unbounded direction, left for the simplex to report
                    continue;
                }
                if self.integer[j] {
                    value = if value == l {
                        (l - self.int_tol).ceil()
                    } else {
                        (u + self.int_tol).floor()
                    };
                    if value < l - self.int_tol || value > u + self.int_tol {
                        return Err(PresolveInfeasible);
                    }
                }
                self.fix_column(j, value);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Merge rows whose coefficients are multiples of each other.
    pub(super) fn merge_parallel_rows(&mut self) -> Reduction {
        let mut groups: HashMap<Vec<usize>, Vec<usize>> = HashMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            if self.keep_row[i] && row.len() > 1 {
                let support = row.iter().map(|&(j, _)| j).collect();
                groups.entry(support).or_default().push(i);
            }
        }

        let mut changed = false;
        let mut candidates: Vec<_> = groups.into_values().filter(|g| g.len() > 1).collect();
        candidates.sort_unstable();
        for group in candidates {
            let mut representatives: Vec<usize> = Vec::new();
            for k in group {
                let found = representatives
                    .iter()
                    .find_map(|&i| self.parallel_factor(i, k).map(|f| (i, f)));
                match found {
                    None => representatives.push(k),
                    Some((i, factor)) => {
                        // row k = factor * row i
                        let (lk, uk) = (self.row_lower[k] / factor, self.row_upper[k] / factor);
                        let (lk, uk) = if factor > 0.0 { (lk, uk) } else { (uk, lk) };
                        let lo = self.row_lower[i].max(lk);
                        let hi = self.row_upper[i].min(uk);
                        if lo > hi + self.bound_tol(hi) {
                            return Err(PresolveInfeasible);
                        }
                        self.row_lower[i] = lo;
                        self.row_upper[i] = hi.max(lo);
                        self.keep_row[k] = false;
                        changed = true;
                    }
                }
            }
        }
        Ok(changed)
    }

    // `Some(f)` if row k is f times row i; both rows have the same support
    fn parallel_factor(&self, i: usize, k: usize) -> Option<f64> {
        let (ri, rk) = (&self.rows[i], &self.rows[k]);
        let factor = rk[0].1 / ri[0].1;
        let parallel = ri
            .iter()
            .zip(rk)
            .all(|(&(_, a), &(_, b))| (b - factor * a).abs() <= COEFF_TOL * (1.0 + b.abs()));
        parallel.then_some(factor)
    }

    /// Use equalities with two entries to substitute out a continuous
    /// column.
    pub(super) fn eliminate_doubleton_equalities(&mut self) -> Reduction {
        let mut changed = false;
        for i in 0..self.rows.len() {
            if !self.keep_row[i] || self.rows[i].len() != 2 {
                continue;
            }
            let (lo, hi) = (self.row_lower[i], self.row_upper[i]);
            if !lo.is_finite() || lo != hi {
                continue;
            }
            let (first, second) = (self.rows[i][0], self.rows[i][1]);
            let eliminable = |(j, a): (usize, f64)| {
                !self.integer[j] && !self.protected[j] && a.abs() > COEFF_TOL
            };
            // eliminate through the larger coefficient when both qualify
            let ((j, aj), (k, ak)) = match (eliminable(first), eliminable(second)) {
                (true, true) if second.1.abs() > first.1.abs() => (second, first),
                (true, _) => (first, second),
                (false, true) => (second, first),
                (false, false) => continue,
            };
            if self.protected[k] {
                continue;
            }

            // x_j = constant + factor * x_k
            let constant = lo / aj;
            let factor = -ak / aj;

            let (lj, uj) = (self.col_lower[j], self.col_upper[j]);
            let (l, u) = ((lj - constant) / factor, (uj - constant) / factor);
            let (l, u) = if factor > 0.0 { (l, u) } else { (u, l) };
            self.tighten_column(k, l, u)?;

            self.keep_row[i] = false;
            for (r, arj) in self.column_entries(j) {
                self.substitute_in_row(r, j, k, arj, constant, factor);
            }
            self.cost[k] += self.cost[j] * factor;
            self.offset += self.cost[j] * constant;
            self.keep_col[j] = false;
            self.ops.push(PostOp::Substitute {
                col: j,
                partner: k,
                constant,
                factor,
            });
            changed = true;
        }
        Ok(changed)
    }

    // replace a_rj x_j in row r by a_rj (constant + factor x_k)
    fn substitute_in_row(
        &mut self,
        r: usize,
        j: usize,
        k: usize,
        arj: f64,
        constant: f64,
        factor: f64,
    ) {
        if let Ok(pos) = self.entry(r, j) {
            self.rows[r].remove(pos);
        }
        self.row_lower[r] -= arj * constant;
        self.row_upper[r] -= arj * constant;
        let add = arj * factor;
        match self.entry(r, k) {
            Ok(pos) => {
                let v = self.rows[r][pos].1 + add;
                if v.abs() <= COEFF_TOL {
                    self.rows[r].remove(pos);
                } else {
                    self.rows[r][pos].1 = v;
                }
            }
            Err(pos) => self.rows[r].insert(pos, (k, add)),
        }
    }

    /// Divide all-integer rows by the GCD of their coefficients and round
    /// the row bounds inward.
    pub(super) fn reduce_gcd(&mut self) -> Reduction {
        let mut changed = false;
        for i in 0..self.rows.len() {
            if !self.keep_row[i] || self.rows[i].is_empty() {
                continue;
            }
            let integral = self.rows[i].iter().all(|&(j, a)| {
                self.integer[j] && (a - a.round()).abs() <= COEFF_TOL * (1.0 + a.abs())
            });
            if !integral {
                continue;
            }
            let g = self.rows[i]
                .iter()
                .map(|&(_, a)| a.round().abs() as u64)
                .fold(0, gcd);
            if g == 0 {
                continue;
            }
            let g = g as f64;

            let (lo, hi) = (self.row_lower[i], self.row_upper[i]);
            let new_lo = (lo / g - self.int_tol).ceil();
            let new_hi = (hi / g + self.int_tol).floor();
            if new_lo > new_hi {
                return Err(PresolveInfeasible);
            }
            if g > 1.0 {
                for entry in self.rows[i].iter_mut() {
                    entry.1 = entry.1.round() / g;
                }
                self.row_divisor[i] *= g;
            }
            changed |= g > 1.0 || new_lo != lo || new_hi != hi;
            self.row_lower[i] = new_lo;
            self.row_upper[i] = new_hi;
        }
        Ok(changed)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
