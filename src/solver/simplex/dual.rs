use super::engine::{PhaseEnd, SimplexEngine, NONBASIC, STALL_LIMIT};
use super::pricing::{scatter_column, PricingRule};
use crate::solver::core::context::SolveContext;
use crate::solver::core::{PivotModes, SolverStatus};

// relative disagreement allowed between the pivot element computed from
// the row and from the column before the basis is refactored
const PIVOT_CONSISTENCY: f64 = 1e-7;

// entering candidate of the dual ratio test
#[derive(Debug, Clone, Copy)]
struct Entering {
    var: usize,
    ratio: f64,
    alpha: f64,
}

impl SimplexEngine {
    /// Dual simplex.   In phase 1 the cost is replaced by a flat cost that
    /// makes the starting basis dual feasible, so `Optimal` means a primal
    /// feasible basis was found.
    pub(super) fn dual_loop(
        &mut self,
        ctx: &mut SolveContext,
        phase1: bool,
    ) -> Result<PhaseEnd, SolverStatus> {
        if phase1 {
            self.set_flat_cost();
        } else {
            self.restore_cost();
        }
        let mut degenerate = 0;
        self.bland = false;

        loop {
            self.tick(ctx)?;
            self.compute_duals();

            let Some((r, infeas)) = self.select_leaving() else {
                return Ok(PhaseEnd::Optimal);
            };
            let b = self.head[r];
            let below = self.x[b] < self.lower[b];
            let (target, to_upper) = if below {
                (self.lower[b], false)
            } else {
                (self.upper[b], true)
            };
            let sgn = if below { 1.0 } else { -1.0 };

            let row = self.pivot_row(r, NONBASIC);
            let candidates = self.dual_candidates(&row, sgn);
            if candidates.is_empty() {
                return Ok(PhaseEnd::Infeasible);
            }
            let (entering, flips) = self.dual_ratio_test(candidates, infeas);
            let q = entering.var;

            let alpha = self.transformed_column(q);
            let arq = alpha[r];
            if (arq - entering.alpha).abs() > PIVOT_CONSISTENCY * (1.0 + arq.abs())
                || arq.abs() <= self.opts.pivot_tol
            {
                if self.factor.updates() == 0 {
                    return Err(SolverStatus::NumFailure);
                }
                self.invert(ctx)?;
                continue;
            }

            self.apply_flips(&flips);

            let step = (self.x[b] - target) / arq;
            self.x[q] += step;
            for (k, &v) in self.head.iter().enumerate() {
                self.x[v] -= alpha[k] * step;
            }
            self.pivot(q, r, &alpha, to_upper, Some(&row), true);
            self.count_iteration(ctx);

            if self.d[q].abs() <= self.opts.dual_tol {
                degenerate += 1;
                if degenerate > STALL_LIMIT {
                    self.on_stall(ctx, true);
                    degenerate = 0;
                }
            } else {
                degenerate = 0;
                self.bland = false;
            }
        }
    }

    // Cost making the current basis strictly dual feasible: +1 on
    // nonbasic variables at a finite lower bound, -1 at an upper bound.
    fn set_flat_cost(&mut self) {
        for j in 0..self.n + self.m {
            let (l, u) = (self.lower[j], self.upper[j]);
            self.work_cost[j] = if self.position[j] != NONBASIC || l == u {
                0.0
            } else if self.at_upper[j] && u.is_finite() {
                -1.0
            } else if l.is_finite() {
                1.0
            } else {
                0.0
            };
        }
    }

    /// Choose the leaving basis position by the pricing rule, or `None` if
    /// the basis is primal feasible.
    fn select_leaving(&mut self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64, f64)> = None;
        for r in 0..self.m {
            let b = self.head[r];
            let infeas = self.infeasibility(b);
            if infeas <= 0.0 {
                continue;
            }
            let score = if self.bland {
                -(b as f64)
            } else {
                self.pricer.dual_score(r, b, infeas) * self.score_noise()
            };
            if best.map_or(true, |(_, s, _)| score > s) {
                best = Some((r, score, infeas));
            }
        }
        best.map(|(r, _, infeas)| (r, infeas))
    }

    // Nonbasic variables that move the leaving variable toward its
    // violated bound, with their dual ratios.
    fn dual_candidates(&self, row: &[(usize, f64)], sgn: f64) -> Vec<Entering> {
        let ptol = self.opts.pivot_tol;
        row.iter()
            .filter_map(|&(j, a)| {
                let (l, u) = (self.lower[j], self.upper[j]);
                if l == u || a.abs() <= ptol {
                    return None;
                }
                let dj = self.d[j];
                let free = !l.is_finite() && !u.is_finite();
                let reduced = if free {
                    dj.abs()
                } else if self.at_upper[j] {
                    if sgn * a <= 0.0 {
                        return None;
                    }
                    (-dj).max(0.0)
                } else {
                    if sgn * a >= 0.0 {
                        return None;
                    }
                    dj.max(0.0)
                };
                Some(Entering {
                    var: j,
                    ratio: reduced / a.abs(),
                    alpha: a,
                })
            })
            .collect()
    }

    // Choose the entering variable.  Unless PRICE_NOBOUNDFLIP is set,
    // boxed candidates passed by the long step are flipped to their
    // other bound instead of entering.
    fn dual_ratio_test(&self, mut candidates: Vec<Entering>, infeas: f64) -> (Entering, Vec<usize>) {
        let modes = self.opts.pivot_modes;

        if self.bland {
            let min = candidates.iter().map(|c| c.ratio).fold(f64::INFINITY, f64::min);
            let chosen = candidates
                .iter()
                .filter(|c| c.ratio <= min)
                .min_by_key(|c| c.var)
                .copied()
                .unwrap_or(candidates[0]);
            return (chosen, Vec::new());
        }

        if !modes.contains(PivotModes::NOBOUNDFLIP) {
            candidates.sort_by(|a, b| {
                a.ratio
                    .total_cmp(&b.ratio)
                    .then(b.alpha.abs().total_cmp(&a.alpha.abs()))
            });
            let mut slope = infeas;
            let mut flips = Vec::new();
            let last = candidates.len() - 1;
            for (k, c) in candidates.iter().enumerate() {
                let range = self.upper[c.var] - self.lower[c.var];
                if k < last && range.is_finite() {
                    slope -= c.alpha.abs() * range;
                    if slope > 0.0 {
                        flips.push(c.var);
                        continue;
                    }
                }
                return (*c, flips);
            }
            return (candidates[last], flips);
        }

        if modes.contains(PivotModes::HARRISTWOPASS) {
            let tol = self.opts.dual_tol;
            let theta_max = candidates
                .iter()
                .map(|c| c.ratio + tol / c.alpha.abs())
                .fold(f64::INFINITY, f64::min);
            if let Some(c) = candidates
                .iter()
                .filter(|c| c.ratio <= theta_max)
                .max_by(|a, b| a.alpha.abs().total_cmp(&b.alpha.abs()))
            {
                return (*c, Vec::new());
            }
        }

        let min = candidates.iter().map(|c| c.ratio).fold(f64::INFINITY, f64::min);
        let chosen = candidates
            .iter()
            .filter(|c| c.ratio <= min)
            .max_by(|a, b| a.alpha.abs().total_cmp(&b.alpha.abs()))
            .copied()
            .unwrap_or(candidates[0]);
        (chosen, Vec::new())
    }

    // move boxed nonbasic variables to their opposite bound and update
    // the basic values
    fn apply_flips(&mut self, flips: &[usize]) {
        if flips.is_empty() {
            return;
        }
        let mut delta = vec![0.0; self.m];
        let mut column = vec![0.0; self.m];
        for &j in flips {
            let old = self.x[j];
            self.at_upper[j] = !self.at_upper[j];
            self.x[j] = if self.at_upper[j] {
                self.upper[j]
            } else {
                self.lower[j]
            };
            let change = self.x[j] - old;
            column.fill(0.0);
            scatter_column(&self.a, j, &mut column);
            for (dv, &c) in delta.iter_mut().zip(&column) {
                *dv += c * change;
            }
        }
        self.factor.ftran(&mut delta);
        for (k, &b) in self.head.iter().enumerate() {
            self.x[b] -= delta[k];
        }
    }
}
