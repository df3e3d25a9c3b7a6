use super::engine::{SimplexEngine, NONBASIC};

/// Ranging of the final basis in minimization sense and unscaled values.
/// Unbounded ends are `±f64::INFINITY`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ranging {
    pub cost_lower: Vec<f64>,
    pub cost_upper: Vec<f64>,
    pub rhs_lower: Vec<f64>,
    pub rhs_upper: Vec<f64>,
    pub value_lower: Vec<f64>,
    pub value_upper: Vec<f64>,
}

/// Dual values of a solved relaxation, unscaled and in minimization
/// sense, with optional ranging.
#[derive(Debug, Clone)]
pub(crate) struct DualInfo {
    pub duals: Vec<f64>,
    pub ranging: Option<Ranging>,
}

impl SimplexEngine {
    pub fn dual_info(&self, with_ranging: bool) -> DualInfo {
        DualInfo {
            duals: self.duals(),
            ranging: with_ranging.then(|| self.ranging()),
        }
    }

    /// Sensitivity analysis of the current (optimal) basis.
    pub fn ranging(&self) -> Ranging {
        let (m, n) = (self.m, self.n);
        let mut out = Ranging {
            cost_lower: vec![f64::NEG_INFINITY; n],
            cost_upper: vec![f64::INFINITY; n],
            rhs_lower: vec![f64::NEG_INFINITY; m],
            rhs_upper: vec![f64::INFINITY; m],
            value_lower: vec![f64::NEG_INFINITY; n],
            value_upper: vec![f64::INFINITY; n],
        };

        for j in 0..n {
            let c = self.cost[j];
            let (lo, hi) = match self.position[j] {
                NONBASIC => self.nonbasic_cost_range(j),
                r => {
                    let (dlo, dhi) = self.basic_cost_shift(r);
                    (c + dlo, c + dhi)
                }
            };
            // scaled cost is c·C_j
            let s = self.scale.col[j];
            out.cost_lower[j] = lo / s;
            out.cost_upper[j] = hi / s;

            if self.position[j] == NONBASIC {
                let (dlo, dhi) = self.value_shift(j);
                let lo = (self.x[j] + dlo).max(self.lower[j]);
                let hi = (self.x[j] + dhi).min(self.upper[j]);
                out.value_lower[j] = self.scale.unscale_column(j, lo);
                out.value_upper[j] = self.scale.unscale_column(j, hi);
            }
        }

        for i in 0..m {
            let v = n + i;
            if self.position[v] != NONBASIC {
                continue;
            }
            let (dlo, dhi) = self.value_shift(v);
            let s = self.scale.row[i];
            out.rhs_lower[i] = (self.x[v] + dlo) / s;
            out.rhs_upper[i] = (self.x[v] + dhi) / s;
        }
        out
    }

    // A nonbasic column stays nonbasic while its reduced cost keeps the
    // sign required by the bound it sits at.
    fn nonbasic_cost_range(&self, j: usize) -> (f64, f64) {
        let (l, u) = (self.lower[j], self.upper[j]);
        if l == u || (!l.is_finite() && !u.is_finite()) {
            return (f64::NEG_INFINITY, f64::INFINITY);
        }
        let limit = self.cost[j] - self.d[j];
        if self.at_upper[j] {
            (f64::NEG_INFINITY, limit)
        } else {
            (limit, f64::INFINITY)
        }
    }

    // Range of cost changes of the basic variable at position `r` that
    // keep every nonbasic reduced cost dual feasible.
    fn basic_cost_shift(&self, r: usize) -> (f64, f64) {
        let tol = self.opts.pivot_tol;
        let (mut lo, mut hi) = (f64::NEG_INFINITY, f64::INFINITY);
        for (k, a) in self.pivot_row(r, NONBASIC) {
            if a.abs() <= tol || self.lower[k] == self.upper[k] {
                continue;
            }
            let dk = self.d[k];
            let free = !self.lower[k].is_finite() && !self.upper[k].is_finite();
            let t = dk / a;
            // d_k - δ·a must stay >= 0 at lower and <= 0 at upper
            let upper_limit = if free {
                lo = lo.max(t.min(0.0));
                hi = hi.min(t.max(0.0));
                continue;
            } else if self.at_upper[k] {
                a < 0.0
            } else {
                a > 0.0
            };
            if upper_limit {
                hi = hi.min(t.max(0.0));
            } else {
                lo = lo.max(t.min(0.0));
            }
        }
        (lo, hi)
    }

    // Range of changes of nonbasic variable `j` for which the basic
    // variables stay within their bounds.
    fn value_shift(&self, j: usize) -> (f64, f64) {
        let tol = self.opts.pivot_tol;
        let alpha = self.transformed_column(j);
        let (mut lo, mut hi) = (f64::NEG_INFINITY, f64::INFINITY);
        for (k, &a) in alpha.iter().enumerate() {
            if a.abs() <= tol {
                continue;
            }
            let b = self.head[k];
            // x_b - Δ·a must stay within [l, u]
            let to_lower = (self.x[b] - self.lower[b]) / a;
            let to_upper = (self.x[b] - self.upper[b]) / a;
            let (dmin, dmax) = if a > 0.0 {
                (to_upper, to_lower)
            } else {
                (to_lower, to_upper)
            };
            lo = lo.max(dmin.min(0.0));
            hi = hi.min(dmax.max(0.0));
        }
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::PrintTarget;
    use crate::solver::core::callbacks::SolverCallbacks;
    use crate::solver::core::context::SolveContext;
    use crate::solver::core::*;
    use crate::solver::model::{Model, ProblemData};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + b.abs())
    }

    #[test]
    fn test_ranging() {
        let mut model = Model::new(0, 2).unwrap();
        model.set_maxim();
        model.set_obj_fn(&[143.0, 60.0]).unwrap();
        model
            .add_constraint(&[120.0, 210.0], ConstraintType::Le, 15000.0)
            .unwrap();
        model
            .add_constraint(&[110.0, 30.0], ConstraintType::Le, 4000.0)
            .unwrap();
        model
            .add_constraint(&[1.0, 1.0], ConstraintType::Le, 75.0)
            .unwrap();
        let data = ProblemData::from_model(&model);

        let settings = SolverSettings::default();
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, &settings);
        let mut engine = SimplexEngine::new(&data, &settings);
        assert_eq!(engine.solve(&mut ctx), SolverStatus::Optimal);

        let ranging = engine.ranging();

        // minimization form: cost of x is -143, of y is -60
        assert!(close(ranging.cost_lower[0], -220.0));
        assert!(close(ranging.cost_upper[0], -60.0));
        assert!(close(ranging.cost_lower[1], -143.0));
        assert!(close(ranging.cost_upper[1], -39.0));

        // the first row is slack
        assert_eq!(ranging.rhs_lower[0], f64::NEG_INFINITY);
        assert_eq!(ranging.rhs_upper[0], f64::INFINITY);
        assert!(close(ranging.rhs_lower[1], 2916.666666666667));
        assert!(close(ranging.rhs_upper[1], 8250.0));
        assert!(close(ranging.rhs_lower[2], 36.36363636363637));
        assert!(close(ranging.rhs_upper[2], 80.0));

        // both columns are basic
        assert_eq!(ranging.value_lower[0], f64::NEG_INFINITY);
        assert_eq!(ranging.value_upper[1], f64::INFINITY);
    }

    #[test]
    fn test_nonbasic_ranging() {
        // min x + 2y, x + y >= 2: y stays at zero
        let mut model = Model::new(0, 2).unwrap();
        model.set_obj_fn(&[1.0, 2.0]).unwrap();
        model
            .add_constraint(&[1.0, 1.0], ConstraintType::Ge, 2.0)
            .unwrap();
        let data = ProblemData::from_model(&model);

        let settings = SolverSettings::default();
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, &settings);
        let mut engine = SimplexEngine::new(&data, &settings);
        assert_eq!(engine.solve(&mut ctx), SolverStatus::Optimal);

        let ranging = engine.ranging();
        // y enters once its cost drops below that of x
        assert!(close(ranging.cost_lower[1], 1.0));
        assert_eq!(ranging.cost_upper[1], f64::INFINITY);
        // x stays basic for costs in [0, 2]
        assert!(close(ranging.cost_lower[0], 0.0));
        assert!(close(ranging.cost_upper[0], 2.0));
        // y may rise to 2 before x leaves
        assert!(close(ranging.value_lower[1], 0.0));
        assert!(close(ranging.value_upper[1], 2.0));
        assert!(close(ranging.rhs_lower[0], 0.0));
        assert_eq!(ranging.rhs_upper[0], f64::INFINITY);
    }
}
