use super::factor::{BasisFactor, Singular};
use super::pricing::{scatter_column, BasisView, PivotData, Pricer, PricingRule};
use crate::algebra::*;
use crate::solver::core::context::{report, SolveContext};
use crate::solver::core::*;
use crate::solver::model::{Basis, ProblemData};
use crate::solver::scaling::ScaleFactors;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(super) const NONBASIC: usize = usize::MAX;

// the abort callback and the clock are polled this often
const STOP_CHECK_INTERVAL: u64 = 25;

// consecutive degenerate pivots before anti-degeneracy measures start
pub(super) const STALL_LIMIT: usize = 50;

// phase changes, perturbation removals and accuracy retries per solve
const MAX_DRIVER_PASSES: usize = 24;

/// How a single simplex phase ended.   Stops and numerical failures are
/// carried in the `Err` branch of the phase results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseEnd {
    Optimal,
    Infeasible,
    Unbounded,
}

/// Tolerances and rule choices of the simplex, taken from the settings.
#[derive(Debug, Clone)]
pub(crate) struct SimplexOptions {
    pub primal_tol: f64,
    pub dual_tol: f64,
    pub pivot_tol: f64,
    pub perturb: f64,
    pub accuracy: f64,
    pub max_pivot: usize,
    pub simplex_type: SimplexType,
    pub pivot_modes: PivotModes,
    pub improve: ImproveModes,
    pub anti_degen: AntiDegenModes,
}

impl SimplexOptions {
    pub fn new(settings: &SolverSettings) -> Self {
        Self {
            primal_tol: settings.epsilon_primal,
            dual_tol: settings.epsilon_dual,
            pivot_tol: settings.epsilon_pivot,
            perturb: settings.epsilon_perturb,
            accuracy: settings.break_numeric_accuracy,
            max_pivot: settings.max_pivot as usize,
            simplex_type: settings.simplex_type,
            pivot_modes: settings.pivot_modes,
            improve: settings.improve,
            anti_degen: settings.anti_degen,
        }
    }
}

/// Bounded revised simplex over the scaled problem `[A | -I] (x, r) = 0`.
///
/// Variable `j < n` is structural column `j`, variable `n + i` is the
/// activity of row `i`.   All public accessors work in unscaled values;
/// objective values and duals are in minimization sense.
pub(crate) struct SimplexEngine {
    pub(super) m: usize,
    pub(super) n: usize,
    pub(super) a: CscMatrix<f64>,
    pub(super) scale: ScaleFactors,

    // true cost, and the cost driving the current phase
    pub(super) cost: Vec<f64>,
    pub(super) work_cost: Vec<f64>,
    pub(super) perturbed_cost: Option<Vec<f64>>,

    // bounds of the problem, of the current subproblem, and the working
    // bounds that may be perturbed
    root_lower: Vec<f64>,
    root_upper: Vec<f64>,
    pub(super) bound_lower: Vec<f64>,
    pub(super) bound_upper: Vec<f64>,
    pub(super) lower: Vec<f64>,
    pub(super) upper: Vec<f64>,
    pub(super) perturbed_bounds: bool,

    pub(super) head: Vec<usize>,
    pub(super) position: Vec<usize>,
    pub(super) at_upper: Vec<bool>,

    pub(super) x: Vec<f64>,
    pub(super) y: Vec<f64>,
    pub(super) d: Vec<f64>,

    pub(super) factor: BasisFactor,
    pub(super) pricer: Pricer,
    pub(super) opts: SimplexOptions,
    pub(super) rng: StdRng,

    pub(super) bland: bool,
    pub(super) partial_start: usize,
    may_perturb: bool,
    allow_perturb: bool,

    iterations: u64,
    solve_iterations: u64,
    ticks: u64,
    max_iterations: u64,
}

impl SimplexEngine {
    pub fn new(data: &ProblemData, settings: &SolverSettings) -> Self {
        let (m, n) = (data.m, data.n);

        let scale = ScaleFactors::compute(
            &data.a,
            &data.integer,
            settings.scale_algorithm,
            settings.scale_modes,
            settings.scale_limit,
        );

        let mut scaled = data.clone();
        for j in 0..n {
            let (lo, hi) = data.relaxed_bounds(j);
            scaled.col_lower[j] = lo;
            scaled.col_upper[j] = hi;
        }
        scale.scale_problem(&mut scaled);

        let mut lower = scaled.col_lower;
        lower.extend_from_slice(&scaled.row_lower);
        let mut upper = scaled.col_upper;
        upper.extend_from_slice(&scaled.row_upper);
        let mut cost = scaled.cost;
        cost.resize(n + m, 0.0);

        let basis = Basis::slack(m, n);
        let mut engine = Self {
            m,
            n,
            a: scaled.a,
            scale,
            work_cost: cost.clone(),
            cost,
            perturbed_cost: None,
            root_lower: lower.clone(),
            root_upper: upper.clone(),
            bound_lower: lower.clone(),
            bound_upper: upper.clone(),
            lower,
            upper,
            perturbed_bounds: false,
            head: Vec::new(),
            position: vec![NONBASIC; n + m],
            at_upper: Vec::new(),
            x: vec![0.0; n + m],
            y: vec![0.0; m],
            d: vec![0.0; n + m],
            factor: BasisFactor::new(m),
            pricer: Pricer::new(settings.pivot_rule),
            opts: SimplexOptions::new(settings),
            rng: StdRng::seed_from_u64(settings.seed),
            bland: false,
            partial_start: 0,
            may_perturb: true,
            allow_perturb: true,
            iterations: 0,
            solve_iterations: 0,
            ticks: 0,
            max_iterations: 50_000 + 200 * (n + m) as u64,
        };
        engine.install_basis(&basis);
        engine
    }

    // ---------------------------------
    // basis and bounds
    // ---------------------------------

    fn install_basis(&mut self, basis: &Basis) {
        self.head.clone_from(&basis.head);
        self.at_upper.clone_from(&basis.at_upper);
        self.rebuild_positions();
    }

    pub(super) fn rebuild_positions(&mut self) {
        self.position.fill(NONBASIC);
        for (k, &b) in self.head.iter().enumerate() {
            self.position[b] = k;
        }
    }

    /// Use `basis` as the starting basis of the next solve.   A basis of
    /// the wrong dimensions is ignored and `false` returned.
    pub fn set_basis(&mut self, basis: &Basis) -> bool {
        if basis.m() != self.m || basis.n() != self.n {
            return false;
        }
        self.install_basis(basis);
        true
    }

    /// the current basis
    pub fn basis(&self) -> Basis {
        Basis {
            head: self.head.clone(),
            at_upper: self.at_upper.clone(),
        }
    }

    /// set unscaled bounds of column `j` for the following solves
    pub fn set_column_bounds(&mut self, j: usize, lower: f64, upper: f64) {
        self.bound_lower[j] = self.scale.scale_column(j, lower);
        self.bound_upper[j] = self.scale.scale_column(j, upper);
    }

    /// unscaled bounds of column `j` in the current subproblem
    #[cfg(test)]
    pub fn column_bounds(&self, j: usize) -> (f64, f64) {
        (
            self.scale.unscale_column(j, self.bound_lower[j]),
            self.scale.unscale_column(j, self.bound_upper[j]),
        )
    }

    /// restore the column bounds of the problem
    pub fn reset_bounds(&mut self) {
        self.bound_lower.clone_from(&self.root_lower);
        self.bound_upper.clone_from(&self.root_upper);
    }

    /// whether anti-degeneracy perturbations may be used
    pub fn set_perturbation_allowed(&mut self, allowed: bool) {
        self.allow_perturb = allowed;
    }

    // ---------------------------------
    // results
    // ---------------------------------

    /// simplex iterations over all solves of this engine
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// unscaled column values
    pub fn primal_values(&self) -> Vec<f64> {
        let mut x = self.x[..self.n].to_vec();
        self.scale.unscale_columns(&mut x);
        x
    }

    /// objective value in minimization sense, without constant
    pub fn objective(&self) -> f64 {
        self.cost[..self.n].dot(&self.x[..self.n])
    }

    /// unscaled row duals in minimization sense
    pub fn duals(&self) -> Vec<f64> {
        let mut y = self.y.clone();
        self.scale.unscale_duals(&mut y);
        y
    }

    // ---------------------------------
    // primal and dual values
    // ---------------------------------

    pub(super) fn view(&self) -> BasisView<'_> {
        BasisView {
            a: &self.a,
            factor: &self.factor,
        }
    }

    /// Move nonbasic `j` onto the bound it sits at.  A variable flagged at
    /// upper without a finite upper bound goes to its lower bound, a free
    /// variable to zero.
    pub(super) fn place_nonbasic(&mut self, j: usize) {
        let (l, u) = (self.lower[j], self.upper[j]);
        self.at_upper[j] = u.is_finite() && (self.at_upper[j] || !l.is_finite());
        self.x[j] = if self.at_upper[j] {
            u
        } else if l.is_finite() {
            l
        } else {
            0.0
        };
    }

    /// recompute all variable values from the nonbasic ones
    pub(super) fn compute_primal(&mut self) {
        let (m, n) = (self.m, self.n);
        let mut rhs = vec![0.0; m];
        for j in 0..n + m {
            if self.position[j] != NONBASIC {
                continue;
            }
            self.place_nonbasic(j);
            let v = self.x[j];
            if v == 0.0 {
                continue;
            }
            if j < n {
                let (rows, vals) = self.a.col(j);
                for (&r, &a) in rows.iter().zip(vals) {
                    rhs[r] -= a * v;
                }
            } else {
                rhs[j - n] += v;
            }
        }
        self.factor.ftran(&mut rhs);
        for (k, &b) in self.head.iter().enumerate() {
            self.x[b] = rhs[k];
        }
    }

    /// duals and reduced costs of the working cost
    pub(super) fn compute_duals(&mut self) {
        let mut y: Vec<f64> = self.head.iter().map(|&b| self.work_cost[b]).collect();
        self.factor.btran(&mut y);
        let view = BasisView {
            a: &self.a,
            factor: &self.factor,
        };
        for j in 0..self.n + self.m {
            self.d[j] = if self.position[j] == NONBASIC {
                self.work_cost[j] - view.column_dot(j, &y)
            } else {
                0.0
            };
        }
        self.y = y;
    }

    pub(super) fn feas_tol(&self, bound: f64) -> f64 {
        self.opts.primal_tol * (1.0 + bound.abs())
    }

    /// bound violation of variable `j` beyond the feasibility tolerance
    pub(super) fn infeasibility(&self, j: usize) -> f64 {
        let (l, u, v) = (self.lower[j], self.upper[j], self.x[j]);
        if v < l - self.feas_tol(l) {
            l - v
        } else if v > u + self.feas_tol(u) {
            v - u
        } else {
            0.0
        }
    }

    pub(super) fn is_primal_feasible(&self) -> bool {
        self.head.iter().all(|&b| self.infeasibility(b) == 0.0)
    }

    // largest relative bound violation of the basic variables
    fn max_relative_violation(&self) -> f64 {
        self.head
            .iter()
            .map(|&b| {
                let (l, u, v) = (self.lower[b], self.upper[b], self.x[b]);
                f64::max((l - v) / (1.0 + l.abs()), (v - u) / (1.0 + u.abs())).max(0.0)
            })
            .fold(0.0, f64::max)
    }

    /// true if the reduced cost of nonbasic `j` has the wrong sign for
    /// the bound it sits at
    pub(super) fn is_dual_infeasible(&self, j: usize) -> bool {
        let tol = self.opts.dual_tol;
        let (l, u) = (self.lower[j], self.upper[j]);
        if l == u {
            return false;
        }
        let dj = self.d[j];
        let free = !l.is_finite() && !u.is_finite();
        if free {
            dj.abs() > tol
        } else if self.at_upper[j] {
            dj > tol
        } else {
            dj < -tol
        }
    }

    // Compute duals of the true cost and report dual feasibility.  With
    // IMPROVE_DUALFEAS boxed columns of the wrong sign are flipped to
    // their other bound first.
    fn make_dual_feasible(&mut self) -> bool {
        self.restore_cost();
        self.compute_duals();
        let flip = self.opts.improve.contains(ImproveModes::DUALFEAS);
        let mut feasible = true;
        let mut flipped = false;
        for j in 0..self.n + self.m {
            if self.position[j] != NONBASIC || !self.is_dual_infeasible(j) {
                continue;
            }
            if flip && self.lower[j].is_finite() && self.upper[j].is_finite() {
                self.at_upper[j] = !self.at_upper[j];
                flipped = true;
            } else {
                feasible = false;
            }
        }
        if flipped {
            self.compute_primal();
        }
        feasible
    }

    pub(super) fn restore_cost(&mut self) {
        match self.perturbed_cost {
            Some(ref c) => self.work_cost.clone_from(c),
            None => self.work_cost.clone_from(&self.cost),
        }
    }

    // ---------------------------------
    // factorization
    // ---------------------------------

    /// Refactor the basis and recompute the variable values.  Dependent
    /// basis columns are replaced by row logicals.
    pub(super) fn invert(&mut self, ctx: &mut SolveContext) -> Result<(), SolverStatus> {
        for _ in 0..2 {
            let result = {
                let (a, head) = (&self.a, &self.head);
                self.factor.factor(|k, col| scatter_column(a, head[k], col))
            };
            match result {
                Ok(()) => {
                    self.compute_primal();
                    return Ok(());
                }
                Err(Singular { positions, rows }) => {
                    report!(
                        ctx,
                        Verbosity::Detailed,
                        "singular basis: replacing {} columns by slacks",
                        positions.len()
                    );
                    for (&k, &r) in positions.iter().zip(&rows) {
                        let old = self.head[k];
                        self.head[k] = self.n + r;
                        self.at_upper[old] = false;
                    }
                    self.rebuild_positions();
                    if self.may_perturb
                        && self.allow_perturb
                        && self.opts.anti_degen.contains(AntiDegenModes::NUMFAILURE)
                    {
                        self.perturb_bounds();
                    }
                }
            }
        }
        Err(SolverStatus::NumFailure)
    }

    /// Perform the basis change: `q` enters at position `r`, whose
    /// variable leaves at its upper (`to_upper`) or lower bound.
    pub(super) fn pivot(
        &mut self,
        q: usize,
        r: usize,
        alpha_q: &[f64],
        to_upper: bool,
        row: Option<&[(usize, f64)]>,
        dual: bool,
    ) {
        let p = self.head[r];

        let computed;
        let row = match row {
            Some(row) => row,
            None if self.pricer.needs_pivot_row() && !dual => {
                computed = self.pivot_row(r, q);
                &computed[..]
            }
            None => &[],
        };
        let data = PivotData {
            q,
            p,
            r,
            alpha_q,
            row,
        };
        let view = BasisView {
            a: &self.a,
            factor: &self.factor,
        };
        if dual {
            self.pricer.dual_update(&view, &data);
        } else {
            self.pricer.primal_update(&view, &data);
        }

        self.factor.update(r, alpha_q);
        self.head[r] = q;
        self.position[q] = r;
        self.position[p] = NONBASIC;
        self.at_upper[p] = to_upper;
        self.x[p] = if to_upper { self.upper[p] } else { self.lower[p] };
    }

    /// row `r` of `B⁻¹ [A | -I]` over the nonbasic variables other than `skip`
    pub(super) fn pivot_row(&self, r: usize, skip: usize) -> Vec<(usize, f64)> {
        let mut rho = vec![0.0; self.m];
        rho[r] = 1.0;
        self.factor.btran(&mut rho);
        let view = self.view();
        (0..self.n + self.m)
            .filter(|&j| j != skip && self.position[j] == NONBASIC)
            .filter_map(|j| {
                let v = view.column_dot(j, &rho);
                (v != 0.0).then_some((j, v))
            })
            .collect()
    }

    /// the transformed column `B⁻¹ a_q`
    pub(super) fn transformed_column(&self, q: usize) -> Vec<f64> {
        let mut alpha = vec![0.0; self.m];
        scatter_column(&self.a, q, &mut alpha);
        self.factor.ftran(&mut alpha);
        alpha
    }

    // ---------------------------------
    // anti-degeneracy
    // ---------------------------------

    /// react to a run of degenerate pivots
    pub(super) fn on_stall(&mut self, ctx: &mut SolveContext, dual: bool) {
        let stalling = self.opts.anti_degen.contains(AntiDegenModes::STALLING);
        if stalling && self.may_perturb && self.allow_perturb && !self.is_perturbed() {
            report!(
                ctx,
                Verbosity::Detailed,
                "stalling: perturbing {}",
                if dual { "costs" } else { "bounds" }
            );
            if dual {
                self.perturb_costs();
            } else {
                self.perturb_bounds();
            }
        } else if self.opts.pivot_modes.contains(PivotModes::ADAPTIVE) && !self.bland {
            report!(ctx, Verbosity::Detailed, "stalling: switching to Bland's rule");
            self.bland = true;
        }
    }

    fn is_perturbed(&self) -> bool {
        self.perturbed_bounds || self.perturbed_cost.is_some()
    }

    // widen the bounds of the basic variables by small random amounts
    pub(super) fn perturb_bounds(&mut self) {
        let eps = self.opts.perturb;
        for k in 0..self.m {
            let b = self.head[k];
            let (l, u) = (self.lower[b], self.upper[b]);
            if l == u {
                continue;
            }
            if l.is_finite() {
                self.lower[b] = l - eps * (1.0 + l.abs()) * self.rng.random::<f64>();
            }
            if u.is_finite() {
                self.upper[b] = u + eps * (1.0 + u.abs()) * self.rng.random::<f64>();
            }
        }
        self.perturbed_bounds = true;
    }

    // move the costs of nonbasic variables further into dual feasibility
    fn perturb_costs(&mut self) {
        let eps = self.opts.perturb;
        for j in 0..self.n + self.m {
            let (l, u) = (self.lower[j], self.upper[j]);
            if self.position[j] != NONBASIC || l == u || (!l.is_finite() && !u.is_finite()) {
                continue;
            }
            let c = self.work_cost[j];
            let delta = eps * (1.0 + c.abs()) * self.rng.random::<f64>();
            self.work_cost[j] = if self.at_upper[j] { c - delta } else { c + delta };
        }
        self.perturbed_cost = Some(self.work_cost.clone());
    }

    // restore the unperturbed problem; true if anything was perturbed
    fn remove_perturbation(&mut self) -> bool {
        if !self.is_perturbed() {
            return false;
        }
        self.lower.clone_from(&self.bound_lower);
        self.upper.clone_from(&self.bound_upper);
        self.perturbed_bounds = false;
        self.perturbed_cost = None;
        self.work_cost.clone_from(&self.cost);
        self.may_perturb = false;
        self.compute_primal();
        true
    }

    // ---------------------------------
    // iteration bookkeeping
    // ---------------------------------

    /// poll for stop requests and enforce the iteration limit
    pub(super) fn tick(&mut self, ctx: &mut SolveContext) -> Result<(), SolverStatus> {
        self.ticks += 1;
        if self.ticks % STOP_CHECK_INTERVAL == 0 {
            if let Some(status) = ctx.check_stop() {
                return Err(status);
            }
        }
        if self.solve_iterations > self.max_iterations {
            return Err(SolverStatus::NumFailure);
        }
        if self.factor.updates() >= self.opts.max_pivot {
            self.invert(ctx)?;
        }
        Ok(())
    }

    pub(super) fn count_iteration(&mut self, ctx: &mut SolveContext) {
        self.iterations += 1;
        self.solve_iterations += 1;
        ctx.progress.iterations += 1;
    }

    /// random factor applied to pricing scores with PRICE_RANDOMIZE
    pub(super) fn score_noise(&mut self) -> f64 {
        if self.opts.pivot_modes.contains(PivotModes::RANDOMIZE) {
            1.0 + 0.1 * self.rng.random::<f64>()
        } else {
            1.0
        }
    }

    // ---------------------------------
    // driver
    // ---------------------------------

    /// Solve from the current basis.   Returns `Optimal`, `Infeasible`,
    /// `Unbounded`, `NumFailure`, `AccuracyError`, `TimedOut` or
    /// `UserAborted`.
    pub fn solve(&mut self, ctx: &mut SolveContext) -> SolverStatus {
        match self.run(ctx) {
            Ok(status) | Err(status) => status,
        }
    }

    fn run(&mut self, ctx: &mut SolveContext) -> Result<SolverStatus, SolverStatus> {
        self.lower.clone_from(&self.bound_lower);
        self.upper.clone_from(&self.bound_upper);
        self.perturbed_bounds = false;
        self.perturbed_cost = None;
        self.work_cost.clone_from(&self.cost);
        self.may_perturb = true;
        self.bland = false;
        self.solve_iterations = 0;
        self.pricer.reset(self.n + self.m, self.m);

        self.invert(ctx)?;

        let mut retried = false;
        for _ in 0..MAX_DRIVER_PASSES {
            let end = if self.is_primal_feasible() {
                self.restore_cost();
                self.primal_loop(ctx, false)?
            } else if (self.opts.simplex_type.dual_phase1() || self.opts.simplex_type.dual_phase2())
                && self.make_dual_feasible()
            {
                report!(ctx, Verbosity::Detailed, "dual simplex phase 2");
                self.dual_loop(ctx, false)?
            } else {
                report!(ctx, Verbosity::Detailed, "simplex phase 1");
                if !self.phase1(ctx)? {
                    return Ok(SolverStatus::Infeasible);
                }
                continue;
            };

            match end {
                PhaseEnd::Infeasible => return Ok(SolverStatus::Infeasible),
                PhaseEnd::Unbounded => {
                    if self.remove_perturbation() {
                        continue;
                    }
                    return Ok(SolverStatus::Unbounded);
                }
                PhaseEnd::Optimal => {
                    if self.remove_perturbation() {
                        report!(ctx, Verbosity::Detailed, "perturbation removed");
                        continue;
                    }
                    self.invert(ctx)?;
                    self.restore_cost();
                    self.compute_duals();
                    if self.is_primal_feasible() {
                        return Ok(SolverStatus::Optimal);
                    }
                    if !retried {
                        report!(ctx, Verbosity::Detailed, "accuracy check failed, retrying");
                        retried = true;
                        continue;
                    }
                    return if self.max_relative_violation() > self.opts.accuracy {
                        Err(SolverStatus::AccuracyError)
                    } else {
                        Ok(SolverStatus::Optimal)
                    };
                }
            }
        }
        Err(SolverStatus::NumFailure)
    }

    // Reach primal feasibility.  Dual phase 1 works on flat costs, and a
    // dual infeasibility proof is confirmed by primal phase 1.
    fn phase1(&mut self, ctx: &mut SolveContext) -> Result<bool, SolverStatus> {
        if self.opts.simplex_type.dual_phase1() && self.dual_loop(ctx, true)? == PhaseEnd::Optimal {
            return Ok(true);
        }
        Ok(self.primal_loop(ctx, true)? == PhaseEnd::Optimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::PrintTarget;
    use crate::solver::core::callbacks::SolverCallbacks;
    use crate::solver::model::Model;

    fn example_model() -> Model {
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

    fn solve(data: &ProblemData, settings: &SolverSettings) -> (SolverStatus, SimplexEngine) {
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, settings);
        let mut engine = SimplexEngine::new(data, settings);
        let status = engine.solve(&mut ctx);
        (status, engine)
    }

    #[test]
    fn test_simplex_variants() {
        let data = ProblemData::from_model(&example_model());

        for simplex_type in [
            SimplexType::PrimalPrimal,
            SimplexType::DualPrimal,
            SimplexType::PrimalDual,
            SimplexType::DualDual,
        ] {
            for pivot_rule in [
                PivotRule::FirstIndex,
                PivotRule::Dantzig,
                PivotRule::Devex,
                PivotRule::SteepestEdge,
            ] {
                let settings = SolverSettings {
                    simplex_type,
                    pivot_rule,
                    pivot_modes: PivotModes::HARRISTWOPASS,
                    ..SolverSettings::default()
                };
                let (status, engine) = solve(&data, &settings);
                assert_eq!(status, SolverStatus::Optimal);
                assert!((data.user_objective(&engine.primal_values()) - 6315.625).abs() < 1e-6);
                let x = engine.primal_values();
                assert!((x[0] - 21.875).abs() < 1e-6);
                assert!((x[1] - 53.125).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_warm_start_needs_no_iterations() {
        let data = ProblemData::from_model(&example_model());
        let settings = SolverSettings::default();
        let (status, engine) = solve(&data, &settings);
        assert_eq!(status, SolverStatus::Optimal);
        assert!(engine.iterations() > 0);

        let basis = engine.basis();
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, &settings);
        let mut warm = SimplexEngine::new(&data, &settings);
        assert!(warm.set_basis(&basis));
        assert_eq!(warm.solve(&mut ctx), SolverStatus::Optimal);
        assert_eq!(warm.iterations(), 0);
    }

    #[test]
    fn test_infeasible_and_unbounded() {
        // x + y >= 4, x + y <= 2
        let mut model = Model::new(0, 2).unwrap();
        model
            .add_constraint(&[1.0, 1.0], ConstraintType::Ge, 4.0)
            .unwrap();
        model
            .add_constraint(&[1.0, 1.0], ConstraintType::Le, 2.0)
            .unwrap();
        let data = ProblemData::from_model(&model);
        for simplex_type in [SimplexType::PrimalPrimal, SimplexType::DualPrimal] {
            let settings = SolverSettings {
                simplex_type,
                ..SolverSettings::default()
            };
            assert_eq!(solve(&data, &settings).0, SolverStatus::Infeasible);
        }

        // max x - y, x - y <= ... with x unbounded above
        let mut model = Model::new(0, 2).unwrap();
        model.set_maxim();
        model.set_obj_fn(&[1.0, 0.0]).unwrap();
        model
            .add_constraint(&[1.0, -1.0], ConstraintType::Le, 1.0)
            .unwrap();
        let data = ProblemData::from_model(&model);
        let settings = SolverSettings::default();
        assert_eq!(solve(&data, &settings).0, SolverStatus::Unbounded);
    }

    #[test]
    fn test_bound_changes_and_duals() {
        let data = ProblemData::from_model(&example_model());
        let settings = SolverSettings::default();
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, &settings);
        let mut engine = SimplexEngine::new(&data, &settings);
        assert_eq!(engine.solve(&mut ctx), SolverStatus::Optimal);

        // duals in minimization sense
        let y = engine.duals();
        assert!(y[0].abs() < 1e-9);
        assert!((y[1] + 1.0375).abs() < 1e-9);
        assert!((y[2] + 28.875).abs() < 1e-9);

        // x <= 21 forces a new vertex, warm started from the old basis
        engine.set_column_bounds(0, 0.0, 21.0);
        let (lo, hi) = engine.column_bounds(0);
        assert_eq!(lo, 0.0);
        assert!((hi - 21.0).abs() < 1e-12);
        assert_eq!(engine.solve(&mut ctx), SolverStatus::Optimal);
        let x = engine.primal_values();
        assert!((x[0] - 21.0).abs() < 1e-9);
        assert!((x[1] - 54.0).abs() < 1e-9);

        engine.reset_bounds();
        assert_eq!(engine.solve(&mut ctx), SolverStatus::Optimal);
        assert!((engine.primal_values()[0] - 21.875).abs() < 1e-9);
    }
}
