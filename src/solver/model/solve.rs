use super::{Basis, Model, ProblemData};
use crate::io::PrintTarget;
use crate::solver::branch::BranchAndBound;
use crate::solver::core::callbacks::SolverCallbacks;
use crate::solver::core::context::{report, SolveContext};
use crate::solver::core::*;
use crate::solver::presolve::{PresolveOutcome, Presolver, Postsolve};
use crate::solver::report::{info_print, Sensitivity, SolutionReport};
use crate::solver::simplex::{DualInfo, Ranging, SimplexEngine};
use crate::timers::*;

// Result of the simplex or branch-and-bound stage on the (possibly
// reduced) problem.   The bound is in minimization sense and includes
// the objective constant.
struct StageResult {
    status: SolverStatus,
    x: Option<Vec<f64>>,
    best_bound: f64,
    iterations: u64,
    nodes: u64,
    max_depth: u32,
    solution_count: u32,
    basis: Option<Basis>,
    duals: Option<DualInfo>,
}

impl StageResult {
    fn failed(status: SolverStatus) -> Self {
        Self {
            status,
            x: None,
            best_bound: f64::INFINITY,
            iterations: 0,
            nodes: 0,
            max_depth: 0,
            solution_count: 0,
            basis: None,
            duals: None,
        }
    }
}

impl Model {
    /// Solve the model with the callbacks stored on it.   The full result
    /// is available from [`solution`](Model::solution) afterwards.
    pub fn solve(&mut self) -> SolverStatus {
        let mut callbacks = std::mem::take(&mut self.callbacks);
        let status = self.solve_with(&mut callbacks);
        self.callbacks = callbacks;
        status
    }

    /// Solve the model with `callbacks` in place of the stored ones.
    pub fn solve_with(&mut self, callbacks: &mut SolverCallbacks) -> SolverStatus {
        let mut stream = std::mem::replace(&mut self.stream, PrintTarget::Sink);
        let mut timers = Timers::default();

        let (solution, basis) = {
            let mut ctx = SolveContext::new(callbacks, &mut stream, &self.settings);
            let outcome;
            timeit! {timers => "solve"; {
                outcome = self.run_solve(&mut ctx, &mut timers);
            }}
            let (mut solution, basis) = outcome;
            solution.solve_time = ctx.elapsed();
            info_print::print_footer(&mut ctx, &solution);
            info_print::print_timers(&mut ctx, &timers);
            (solution, basis)
        };

        self.stream = stream;
        if let Some(basis) = basis {
            self.basis = Some(basis);
        }
        self.solution = solution;
        self.solution.status
    }

    fn run_solve(
        &self,
        ctx: &mut SolveContext,
        timers: &mut Timers,
    ) -> (SolutionReport, Option<Basis>) {
        let settings = &self.settings;
        if let Err(e) = settings.validate() {
            report!(ctx, Verbosity::Critical, "invalid settings: {}", e);
            return (SolutionReport::default(), None);
        }

        let data = ProblemData::from_model(self);
        info_print::print_banner(ctx);
        info_print::print_configuration(ctx, self, &data);

        if data.has_crossed_bounds(settings.epsilon_primal) {
            report!(ctx, Verbosity::Normal, "the problem is infeasible: crossed bounds");
            let stage = StageResult::failed(SolverStatus::Infeasible);
            return (self.assemble(&data, &data, None, stage), None);
        }

        let mut reduced = None;
        if !settings.presolve.reductions().is_empty() {
            let outcome;
            timeit! {timers => "presolve"; {
                outcome = Presolver::reduce(&data, settings);
            }}
            ctx.message(MsgMask::PRESOLVE);
            match outcome {
                PresolveOutcome::Infeasible => {
                    report!(ctx, Verbosity::Normal, "presolve found the problem infeasible");
                    let stage = StageResult::failed(SolverStatus::Infeasible);
                    return (self.assemble(&data, &data, None, stage), None);
                }
                PresolveOutcome::Reduced { problem, postsolve } => {
                    let (rows, cols) = postsolve.count_reduced();
                    report!(
                        ctx,
                        Verbosity::Normal,
                        "presolve removed {} rows and {} columns",
                        rows,
                        cols
                    );
                    reduced = Some((problem, postsolve));
                }
            }
        }
        let (problem, postsolve) = match reduced {
            Some((ref problem, ref postsolve)) => (problem, Some(postsolve)),
            None => (&data, None),
        };

        // a stored basis only fits the unreduced problem
        let warm = match postsolve {
            None => self.basis.as_ref(),
            Some(_) => None,
        };

        let stage = if problem.n == 0 {
            self.presolved(problem)
        } else if problem.has_discrete() {
            let stage;
            timeit! {timers => "branch and bound"; {
                stage = self.solve_mip(ctx, problem, warm);
            }}
            stage
        } else {
            let stage;
            timeit! {timers => "simplex"; {
                stage = self.solve_lp(ctx, problem, warm);
            }}
            stage
        };

        let basis = match postsolve {
            None if stage.status.has_solution() => stage.basis.clone(),
            _ => None,
        };
        (self.assemble(&data, problem, postsolve, stage), basis)
    }

    // Presolve removed every column.  The values follow from postsolve
    // alone.
    fn presolved(&self, problem: &ProblemData) -> StageResult {
        let duals = self.settings.wants_duals().then(|| DualInfo {
            duals: vec![0.0; problem.m],
            ranging: self.settings.wants_sensitivity().then(|| Ranging {
                rhs_lower: vec![f64::NEG_INFINITY; problem.m],
                rhs_upper: vec![f64::INFINITY; problem.m],
                ..Ranging::default()
            }),
        });
        StageResult {
            status: SolverStatus::PreSolved,
            x: Some(Vec::new()),
            best_bound: problem.offset,
            duals,
            ..StageResult::failed(SolverStatus::PreSolved)
        }
    }

    fn solve_lp(
        &self,
        ctx: &mut SolveContext,
        problem: &ProblemData,
        warm: Option<&Basis>,
    ) -> StageResult {
        let settings = &self.settings;
        let mut engine = SimplexEngine::new(problem, settings);
        if let Some(basis) = warm {
            if !engine.set_basis(basis) {
                report!(ctx, Verbosity::Detailed, "stored basis does not fit, ignored");
            }
        }

        let status = engine.solve(ctx);
        let optimal = status == SolverStatus::Optimal;
        if optimal {
            ctx.message(MsgMask::LPFEASIBLE);
            ctx.message(MsgMask::LPOPTIMAL);
        }
        StageResult {
            status,
            x: optimal.then(|| engine.primal_values()),
            best_bound: if optimal {
                engine.objective() + problem.offset
            } else {
                f64::INFINITY
            },
            iterations: engine.iterations(),
            nodes: 0,
            max_depth: 0,
            solution_count: u32::from(optimal),
            basis: Some(engine.basis()),
            duals: (optimal && settings.wants_duals())
                .then(|| engine.dual_info(settings.wants_sensitivity())),
        }
    }

    fn solve_mip(
        &self,
        ctx: &mut SolveContext,
        problem: &ProblemData,
        warm: Option<&Basis>,
    ) -> StageResult {
        let mut engine = SimplexEngine::new(problem, &self.settings);
        if let Some(basis) = warm {
            engine.set_basis(basis);
        }
        let mut bb = BranchAndBound::new(problem, &self.settings, engine);
        let result = bb.run(ctx);
        StageResult {
            status: result.status,
            x: result.x,
            best_bound: result.best_bound,
            iterations: bb.iterations(),
            nodes: result.nodes,
            max_depth: result.max_depth,
            solution_count: result.solution_count,
            basis: result.basis,
            duals: result.duals,
        }
    }

    // Map the stage result back to the original numbering and the user's
    // objective sense.
    fn assemble(
        &self,
        data: &ProblemData,
        problem: &ProblemData,
        postsolve: Option<&Postsolve>,
        stage: StageResult,
    ) -> SolutionReport {
        let settings = &self.settings;
        let sense = data.sense;
        let mut report = SolutionReport {
            status: stage.status,
            best_bound: settings.to_external(sense * stage.best_bound),
            iterations: stage.iterations,
            nodes: stage.nodes,
            max_depth: stage.max_depth,
            solution_count: stage.solution_count,
            presolve_map: postsolve.map(|p| p.map()),
            ..SolutionReport::default()
        };
        let Some(ref reduced_x) = stage.x else {
            return report;
        };

        let x = match postsolve {
            Some(p) => p.primal(reduced_x),
            None => reduced_x.clone(),
        };
        let constraints = data.row_activity(&x);

        if stage.status == SolverStatus::PreSolved && !self.rows_satisfied(data, &constraints) {
            report.status = SolverStatus::Infeasible;
            return report;
        }

        report.objective = data.user_objective(&x);
        if matches!(
            stage.status,
            SolverStatus::Optimal | SolverStatus::PreSolved
        ) {
            report.best_bound = report.objective;
        }

        if let Some(ref info) = stage.duals {
            let y = match postsolve {
                Some(p) => p.duals(&info.duals),
                None => info.duals.clone(),
            };
            let d: Vec<f64> = (0..data.n)
                .map(|j| data.cost[j] - data.a.col_dot(j, &y))
                .collect();
            report.duals = Some(y.iter().map(|v| sense * v).collect());
            report.reduced_costs = Some(d.iter().map(|v| sense * v).collect());
            if let Some(ref ranging) = info.ranging {
                report.sensitivity = Some(self.map_ranging(data, problem, postsolve, ranging));
            }
        }

        report.variables = x;
        report.constraints = constraints;
        report
    }

    fn rows_satisfied(&self, data: &ProblemData, activity: &[f64]) -> bool {
        let tol = self.settings.break_numeric_accuracy;
        activity.iter().enumerate().all(|(i, &r)| {
            let (lo, hi) = (data.row_lower[i], data.row_upper[i]);
            r >= lo - tol * (1.0 + lo.abs()) && r <= hi + tol * (1.0 + hi.abs())
        })
    }

    fn map_ranging(
        &self,
        data: &ProblemData,
        problem: &ProblemData,
        postsolve: Option<&Postsolve>,
        ranging: &Ranging,
    ) -> Sensitivity {
        let sense = data.sense;

        // objective ranges refer to the original cost of each column
        let mut cost_from = Vec::with_capacity(problem.n);
        let mut cost_till = Vec::with_capacity(problem.n);
        for k in 0..ranging.cost_lower.len() {
            let j = postsolve.map_or(k, |p| p.col_index[k]);
            let shift = data.cost[j] - problem.cost[k];
            let (lo, hi) = (ranging.cost_lower[k] + shift, ranging.cost_upper[k] + shift);
            let (lo, hi) = if sense > 0.0 { (lo, hi) } else { (-hi, -lo) };
            cost_from.push(lo);
            cost_till.push(hi);
        }

        let divisor = |r: usize| postsolve.map_or(1.0, |p| p.row_divisor[p.row_index[r]]);
        let rhs_from: Vec<f64> = (0..ranging.rhs_lower.len())
            .map(|r| ranging.rhs_lower[r] * divisor(r))
            .collect();
        let rhs_till: Vec<f64> = (0..ranging.rhs_upper.len())
            .map(|r| ranging.rhs_upper[r] * divisor(r))
            .collect();

        let columns = |v: &[f64], fill: f64| match postsolve {
            Some(p) => p.expand_columns(v, fill),
            None => v.to_vec(),
        };
        let rows = |v: &[f64], fill: f64| match postsolve {
            Some(p) => p.expand_rows(v, fill),
            None => v.to_vec(),
        };
        let external = |v: Vec<f64>| v.into_iter().map(|x| self.settings.to_external(x)).collect();

        Sensitivity {
            objective_from: external(columns(&cost_from, f64::NEG_INFINITY)),
            objective_till: external(columns(&cost_till, f64::INFINITY)),
            rhs_from: external(rows(&rhs_from, f64::NEG_INFINITY)),
            rhs_till: external(rows(&rhs_till, f64::INFINITY)),
            value_from: external(columns(&ranging.value_lower, f64::NEG_INFINITY)),
            value_till: external(columns(&ranging.value_upper, f64::INFINITY)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Model {
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
        model
    }

    #[test]
    fn test_solve_reports_duals() {
        let mut model = example();
        model.settings_mut().presolve = PresolveModes::SENSDUALS;
        assert_eq!(model.solve(), SolverStatus::Optimal);

        let duals = model.get_duals().unwrap();
        assert!(duals[0].abs() < 1e-9);
        assert!((duals[1] - 1.0375).abs() < 1e-6);
        assert!((duals[2] - 28.875).abs() < 1e-6);

        let sens = model.get_sensitivity().unwrap();
        // maximization: the ranges are those of the user's coefficients
        assert!((sens.objective_from[0] - 60.0).abs() < 1e-6);
        assert!((sens.objective_till[0] - 220.0).abs() < 1e-6);
        assert_eq!(sens.rhs_from[0], -1e30);
        assert!(model.get_working_objective() == model.get_objective());
    }

    #[test]
    fn test_presolve_removes_everything() {
        // x1 = 2 and x2 = 3 through singleton rows
        let mut model = Model::new(0, 2).unwrap();
        model.set_obj_fn(&[1.0, 1.0]).unwrap();
        model.add_constraint(&[1.0, 0.0], ConstraintType::Eq, 2.0).unwrap();
        model.add_constraint(&[0.0, 1.0], ConstraintType::Eq, 3.0).unwrap();
        model.settings_mut().presolve = PresolveModes::ROWS | PresolveModes::COLS;

        assert_eq!(model.solve(), SolverStatus::PreSolved);
        assert_eq!(model.get_variables(), &[2.0, 3.0]);
        assert_eq!(model.get_objective(), 5.0);
        let map = model.solution().presolve_map.as_ref().unwrap();
        assert_eq!(map.columns, vec![0, 0]);
        assert_eq!(model.get_lp_index(1), 0);
    }

    #[test]
    fn test_invalid_settings_do_not_solve() {
        let mut model = example();
        model.settings_mut().max_pivot = 0;
        assert_eq!(model.solve(), SolverStatus::NotRun);
    }
}
