use super::engine::{PhaseEnd, SimplexEngine, NONBASIC, STALL_LIMIT};
use super::pricing::PricingRule;
use crate::solver::core::context::SolveContext;
use crate::solver::core::{PivotModes, SolverStatus};

// number of blocks scanned in turn with PRICE_PARTIAL
const PARTIAL_BLOCKS: usize = 4;

// steps below this length count as degenerate
const DEGENERATE_STEP: f64 = 1e-12;

/// What limits a primal step
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Leave {
    /// the entering variable reaches its opposite bound
    Flip,
    /// the basic variable at this position leaves at its upper (`true`)
    /// or lower bound
    Row(usize, bool),
}

// ratio test candidate
struct Candidate {
    position: usize,
    ratio: f64,
    relaxed: f64,
    to_upper: bool,
    pivot: f64,
}

impl SimplexEngine {
    /// Primal simplex.   In phase 1 the cost is the sum of infeasibilities
    /// of the basic variables and `Optimal` means a feasible basis was
    /// found.
    pub(super) fn primal_loop(
        &mut self,
        ctx: &mut SolveContext,
        phase1: bool,
    ) -> Result<PhaseEnd, SolverStatus> {
        let mut degenerate = 0;
        self.bland = false;

        loop {
            self.tick(ctx)?;

            if phase1 && !self.set_phase1_cost() {
                return Ok(PhaseEnd::Optimal);
            }
            self.compute_duals();

            let Some(q) = self.select_entering() else {
                return Ok(if phase1 {
                    PhaseEnd::Infeasible
                } else {
                    PhaseEnd::Optimal
                });
            };
            let dir = if self.d[q] < 0.0 { 1.0 } else { -1.0 };
            let alpha = self.transformed_column(q);

            let Some((theta, leave)) = self.primal_ratio_test(&alpha, q, dir, phase1) else {
                if !phase1 {
                    return Ok(PhaseEnd::Unbounded);
                }
                // a ray in phase 1 can only come from lost accuracy
                if self.factor.updates() == 0 {
                    return Err(SolverStatus::NumFailure);
                }
                self.invert(ctx)?;
                continue;
            };

            let step = dir * theta;
            if step != 0.0 {
                self.x[q] += step;
                for (k, &b) in self.head.iter().enumerate() {
                    self.x[b] -= alpha[k] * step;
                }
            }

            match leave {
                Leave::Flip => {
                    self.at_upper[q] = !self.at_upper[q];
                    self.x[q] = if self.at_upper[q] {
                        self.upper[q]
                    } else {
                        self.lower[q]
                    };
                }
                Leave::Row(r, to_upper) => {
                    self.pivot(q, r, &alpha, to_upper, None, false);
                }
            }
            self.count_iteration(ctx);

            if theta <= DEGENERATE_STEP {
                degenerate += 1;
                if degenerate > STALL_LIMIT {
                    self.on_stall(ctx, false);
                    degenerate = 0;
                }
            } else {
                degenerate = 0;
                self.bland = false;
            }
        }
    }

    // Composite phase 1 cost: -1 on basic variables below their lower
    // bound, +1 above their upper bound.  False if nothing is infeasible.
    fn set_phase1_cost(&mut self) -> bool {
        self.work_cost.fill(0.0);
        let mut any = false;
        for &b in self.head.iter() {
            let (l, v) = (self.lower[b], self.x[b]);
            if self.infeasibility(b) > 0.0 {
                self.work_cost[b] = if v < l { -1.0 } else { 1.0 };
                any = true;
            }
        }
        any
    }

    /// Choose the entering variable by the pricing rule, or `None` if
    /// every reduced cost has the right sign.
    pub(super) fn select_entering(&mut self) -> Option<usize> {
        let nvars = self.n + self.m;
        if nvars == 0 {
            return None;
        }
        let tol = self.opts.dual_tol;
        let partial = !self.bland && self.opts.pivot_modes.contains(PivotModes::PARTIAL);
        let block = if partial {
            (nvars + PARTIAL_BLOCKS - 1) / PARTIAL_BLOCKS
        } else {
            nvars
        };
        let start = if partial { self.partial_start } else { 0 };

        let mut best: Option<(usize, f64)> = None;
        for k in 0..nvars {
            let j = (start + k) % nvars;
            if self.position[j] == NONBASIC && self.lower[j] != self.upper[j] {
                let dj = self.d[j];
                let can_increase = !self.at_upper[j];
                let can_decrease = self.at_upper[j] || !self.lower[j].is_finite();
                if (dj < -tol && can_increase) || (dj > tol && can_decrease) {
                    let score = if self.bland {
                        -(j as f64)
                    } else {
                        self.pricer.primal_score(j, dj) * self.score_noise()
                    };
                    if best.map_or(true, |(_, s)| score > s) {
                        best = Some((j, score));
                    }
                }
            }
            if partial && (k + 1) % block == 0 && best.is_some() {
                break;
            }
        }
        if partial {
            self.partial_start = (start + block) % nvars;
        }
        best.map(|(j, _)| j)
    }

    /// Ratio test for entering `q` moving in direction `dir`.  Returns the
    /// step length and what limits it, or `None` for an unbounded ray.
    pub(super) fn primal_ratio_test(
        &self,
        alpha: &[f64],
        q: usize,
        dir: f64,
        phase1: bool,
    ) -> Option<(f64, Leave)> {
        let ptol = self.opts.pivot_tol;
        let mut candidates = Vec::new();

        for (k, &a) in alpha.iter().enumerate() {
            if a.abs() <= ptol {
                continue;
            }
            let b = self.head[k];
            let rate = -a * dir;
            let (l, u, v) = (self.lower[b], self.upper[b], self.x[b]);

            // (distance to the blocking bound, its tolerance, bound is upper)
            let limit = if phase1 && v < l - self.feas_tol(l) {
                (rate > 0.0).then_some((l - v, 0.0, false))
            } else if phase1 && v > u + self.feas_tol(u) {
                (rate < 0.0).then_some((v - u, 0.0, true))
            } else if rate > 0.0 {
                u.is_finite().then(|| (u - v, self.feas_tol(u), true))
            } else {
                l.is_finite().then(|| (v - l, self.feas_tol(l), false))
            };
            if let Some((gap, tol, to_upper)) = limit {
                candidates.push(Candidate {
                    position: k,
                    ratio: gap.max(0.0) / rate.abs(),
                    relaxed: (gap.max(0.0) + tol) / rate.abs(),
                    to_upper,
                    pivot: a.abs(),
                });
            }
        }

        let chosen = if self.opts.pivot_modes.contains(PivotModes::HARRISTWOPASS) && !self.bland {
            self.harris_choice(&candidates)
        } else {
            self.min_ratio_choice(&candidates)
        };

        let range = self.upper[q] - self.lower[q];
        match chosen {
            Some(c) if c.ratio < range => Some((c.ratio, Leave::Row(c.position, c.to_upper))),
            _ if range.is_finite() => Some((range, Leave::Flip)),
            Some(c) => Some((c.ratio, Leave::Row(c.position, c.to_upper))),
            None => None,
        }
    }

    // smallest ratio; ties go to the largest pivot, or the lowest index
    // under Bland's rule
    fn min_ratio_choice<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        let min = candidates.iter().map(|c| c.ratio).fold(f64::INFINITY, f64::min);
        let ties = candidates
            .iter()
            .filter(|c| c.ratio <= min + DEGENERATE_STEP * (1.0 + min));
        if self.bland {
            ties.min_by_key(|c| self.head[c.position])
        } else {
            ties.max_by(|a, b| a.pivot.total_cmp(&b.pivot))
        }
    }

    // Harris' two pass test: the largest pivot among the candidates whose
    // ratio fits within the bound-relaxed minimum
    fn harris_choice<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        let theta_max = candidates
            .iter()
            .map(|c| c.relaxed)
            .fold(f64::INFINITY, f64::min);
        candidates
            .iter()
            .filter(|c| c.ratio <= theta_max)
            .max_by(|a, b| a.pivot.total_cmp(&b.pivot))
    }
}
