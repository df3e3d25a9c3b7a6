use super::node::{BoundChange, BranchRecord, Node, NodeQueue};
use super::select::{select_candidate, Fractional, PseudoCosts};
use crate::solver::core::callbacks::{BranchCandidate, CandidateKind};
use crate::solver::core::context::{report, SolveContext};
use crate::solver::core::*;
use crate::solver::model::{Basis, ProblemData};
use crate::solver::simplex::{DualInfo, SimplexEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of a branch-and-bound search.  The bound is in minimization
/// sense and includes the objective constant.
#[derive(Debug)]
pub(crate) struct MipResult {
    pub status: SolverStatus,
    /// unscaled column values of the incumbent
    pub x: Option<Vec<f64>>,
    pub best_bound: f64,
    pub nodes: u64,
    pub max_depth: u32,
    pub solution_count: u32,
    /// final basis of the relaxation that produced the incumbent
    pub basis: Option<Basis>,
    pub duals: Option<DualInfo>,
}

#[derive(Debug)]
struct Incumbent {
    objective: f64,
    x: Vec<f64>,
    basis: Basis,
    duals: Option<DualInfo>,
}

/// Depth first branch-and-bound over integer columns, semi-continuous
/// columns and special ordered sets.  Every node is an LP relaxation
/// solved by the simplex engine, warm started from its parent's basis.
pub(crate) struct BranchAndBound<'a> {
    data: &'a ProblemData,
    settings: &'a SolverSettings,
    engine: SimplexEngine,
    queue: NodeQueue,
    pseudo: PseudoCosts,
    rng: StdRng,

    // columns and sets in branching order
    order: Vec<usize>,
    sos_order: Vec<usize>,
    depth_limit: Option<u32>,
    // objective bound in minimization sense
    bound: Option<f64>,

    incumbent: Option<Incumbent>,
    equal_count: u32,
    solution_count: u32,
    nodes: u64,
    max_depth: u32,
    truncated: bool,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(data: &'a ProblemData, settings: &'a SolverSettings, engine: SimplexEngine) -> Self {
        let mut order: Vec<usize> = (0..data.n).collect();
        order.sort_by(|&a, &b| data.priority[a].total_cmp(&data.priority[b]));
        if settings.node_modes.contains(NodeModes::WEIGHTREVERSE) {
            order.reverse();
        }
        let mut sos_order: Vec<usize> = (0..data.sos.len()).collect();
        sos_order.sort_by_key(|&k| data.sos[k].priority);

        let discrete = 2 * data.integer.iter().filter(|&&b| b).count()
            + (0..data.n).filter(|&j| data.is_active_semicont(j)).count()
            + data.sos.iter().map(|s| s.columns.len()).sum::<usize>();
        let depth_limit = match settings.depth_limit {
            0 => None,
            d if d > 0 => Some(d as u32),
            d => Some(d.unsigned_abs() * discrete as u32),
        };

        Self {
            data,
            settings,
            engine,
            queue: NodeQueue::new(settings.node_modes),
            pseudo: PseudoCosts::new(data.n),
            rng: StdRng::seed_from_u64(settings.seed),
            order,
            sos_order,
            depth_limit,
            bound: settings.objective_bound.map(|b| data.sense * b),
            incumbent: None,
            equal_count: 0,
            solution_count: 0,
            nodes: 0,
            max_depth: 0,
            truncated: false,
        }
    }

    /// simplex iterations over every node
    pub fn iterations(&self) -> u64 {
        self.engine.iterations()
    }

    pub fn run(&mut self, ctx: &mut SolveContext) -> MipResult {
        self.queue.push(Node::root());
        let mut stop = None;
        let mut stopped_early = false;

        while let Some(node) = self.queue.pop() {
            if let Some(status) = ctx.check_stop() {
                self.queue.push(node);
                stop = Some(status);
                break;
            }
            if self.is_pruned(node.estimate) {
                continue;
            }
            if self.depth_limit.map_or(false, |d| node.depth > d) {
                self.truncated = true;
                continue;
            }

            let status = self.solve_node(ctx, &node);
            if node.depth == 0 {
                if status != SolverStatus::Optimal {
                    return self.result(status);
                }
                report!(
                    ctx,
                    Verbosity::Normal,
                    "relaxed solution {:>18.12} after {:>10} iter",
                    self.data.sense * (self.engine.objective() + self.data.offset),
                    self.engine.iterations()
                );
                ctx.message(MsgMask::LPOPTIMAL);
            }
            match status {
                SolverStatus::Optimal => {}
                SolverStatus::Infeasible => continue,
                SolverStatus::TimedOut | SolverStatus::UserAborted => {
                    self.queue.push(node);
                    stop = Some(status);
                    break;
                }
                _ => {
                    report!(ctx, Verbosity::Detailed, "node {} dropped: {}", self.nodes, status);
                    self.truncated = true;
                    continue;
                }
            }

            let z = self.engine.objective() + self.data.offset;
            if let Some(ref branch) = node.branch {
                self.pseudo.update(branch, z - node.estimate);
            }
            if self.is_pruned(z) {
                continue;
            }

            let x = self.engine.primal_values();
            match self.branch(ctx, &node, &x, z) {
                Some(children) => {
                    for child in children {
                        self.queue.push(child);
                    }
                }
                None => {
                    if self.store_solution(ctx, z, x) && self.is_good_enough(z) {
                        stopped_early = true;
                        break;
                    }
                }
            }
        }

        let status = match (&self.incumbent, stop) {
            (Some(_), Some(_)) => SolverStatus::SubOptimal,
            (None, Some(status)) => status,
            (Some(_), None) if self.truncated => SolverStatus::SubOptimal,
            (Some(_), None) if stopped_early => SolverStatus::SubOptimal,
            (Some(_), None) => SolverStatus::Optimal,
            (None, None) => SolverStatus::Infeasible,
        };
        report!(
            ctx,
            Verbosity::Normal,
            "branch and bound finished: {} nodes, depth {}",
            self.nodes,
            self.max_depth
        );
        self.result(status)
    }

    fn result(&mut self, status: SolverStatus) -> MipResult {
        let incumbent = self.incumbent.take();
        let objective = incumbent.as_ref().map(|inc| inc.objective);
        let best_bound = if status == SolverStatus::Optimal {
            objective
        } else {
            self.queue.best_estimate().into_iter().chain(objective).reduce(f64::min)
        };

        let (x, basis, duals) = match incumbent {
            Some(inc) => (Some(inc.x), Some(inc.basis), inc.duals),
            None => (None, None, None),
        };
        MipResult {
            status,
            x,
            best_bound: best_bound.unwrap_or(f64::INFINITY),
            nodes: self.nodes,
            max_depth: self.max_depth,
            solution_count: self.solution_count,
            basis,
            duals,
        }
    }

    // ---------------------------------
    // nodes
    // ---------------------------------

    fn solve_node(&mut self, ctx: &mut SolveContext, node: &Node) -> SolverStatus {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(node.depth);
        ctx.progress.nodes = self.nodes;
        ctx.progress.depth = node.depth;

        self.engine.reset_bounds();
        for b in node.bounds.iter() {
            self.engine.set_column_bounds(b.col, b.lower, b.upper);
        }
        if let Some(ref basis) = node.basis {
            self.engine.set_basis(basis);
        }
        let perturb =
            node.depth == 0 || self.settings.anti_degen.contains(AntiDegenModes::DURINGBB);
        self.engine.set_perturbation_allowed(perturb);

        let status = self.engine.solve(ctx);
        report!(
            ctx,
            Verbosity::Full,
            "node {:>6} depth {:>4}: {}",
            self.nodes,
            node.depth,
            status
        );
        status
    }

    // bounds of `col` in `node`
    fn node_bounds(&self, node: &Node, col: usize) -> (f64, f64) {
        node.bounds_of(col)
            .unwrap_or_else(|| self.data.relaxed_bounds(col))
    }

    fn gap(&self, z: f64) -> f64 {
        f64::max(
            self.settings.mip_gap_abs,
            self.settings.mip_gap_rel * (1.0 + z.abs()),
        )
    }

    // Relaxation values at or above this can not improve on an incumbent
    // with objective `z`.   Equal solutions stay admissible while more
    // than one solution is requested.
    fn cutoff(&self, z: f64) -> f64 {
        if self.settings.solution_limit > 1 {
            z + self.gap(z)
        } else {
            z - self.gap(z)
        }
    }

    fn is_pruned(&self, z: f64) -> bool {
        if self.bound.map_or(false, |b| z > b) {
            return true;
        }
        match self.incumbent {
            Some(ref inc) => z >= self.cutoff(inc.objective),
            None => false,
        }
    }

    fn is_good_enough(&self, z: f64) -> bool {
        if self.settings.break_at_first {
            return true;
        }
        match self.settings.break_at_value {
            Some(value) => z <= self.data.sense * value,
            None => false,
        }
    }

    // Returns true if the solution improved on the incumbent.
    fn store_solution(&mut self, ctx: &mut SolveContext, z: f64, mut x: Vec<f64>) -> bool {
        for (v, &integer) in x.iter_mut().zip(self.data.integer.iter()) {
            if integer {
                *v = v.round();
            }
        }

        let improved = match self.incumbent {
            None => true,
            Some(ref inc) => z < inc.objective - self.gap(inc.objective),
        };
        self.solution_count += 1;
        ctx.progress.solution_count = self.solution_count;

        if improved {
            let first = self.incumbent.is_none();
            self.equal_count = 0;
            self.incumbent = Some(self.capture(z, x));
            self.queue.prune(self.cutoff(z));

            report!(
                ctx,
                Verbosity::Normal,
                "{} solution {:>18.12} after {:>10} iter, {:>6} nodes",
                if first { "first" } else { "improved" },
                self.data.sense * z,
                self.engine.iterations(),
                self.nodes
            );
            ctx.progress.incumbent = Some(self.data.sense * z);
            ctx.message(if first {
                MsgMask::MILPFEASIBLE
            } else {
                MsgMask::MILPBETTER
            });
        } else {
            self.equal_count += 1;
            if self.equal_count < self.settings.solution_limit {
                self.incumbent = Some(self.capture(z, x));
            }
            report!(ctx, Verbosity::Detailed, "equal solution at node {}", self.nodes);
            ctx.message(MsgMask::MILPEQUAL);
        }
        improved
    }

    fn capture(&self, z: f64, x: Vec<f64>) -> Incumbent {
        let duals = self
            .settings
            .wants_duals()
            .then(|| self.engine.dual_info(self.settings.wants_sensitivity()));
        Incumbent {
            objective: z,
            x,
            basis: self.engine.basis(),
            duals,
        }
    }

    // ---------------------------------
    // branching
    // ---------------------------------

    // Children of `node` whose relaxation has values `x` and objective `z`,
    // or `None` if `x` satisfies every integrality, semi-continuity and
    // SOS requirement.
    fn branch(
        &mut self,
        ctx: &mut SolveContext,
        node: &Node,
        x: &[f64],
        z: f64,
    ) -> Option<Vec<Node>> {
        let tol = self.settings.epsilon_int;

        let mut integers = Vec::new();
        let mut semis = Vec::new();
        for &j in self.order.iter() {
            let (lower, upper) = self.node_bounds(node, j);
            let candidate = Fractional {
                col: j,
                value: x[j],
                lower,
                upper,
            };
            if self.data.integer[j] {
                let f = candidate.frac();
                if f > tol && f < 1.0 - tol {
                    integers.push(candidate);
                    continue;
                }
            }
            if self.data.is_active_semicont(j) {
                let v = x[j];
                if v > tol && v < self.data.col_lower[j] - tol {
                    semis.push(candidate);
                }
            }
        }

        if self.settings.node_rule == NodeRule::UserSelect && ctx.callbacks.has_node_selector() {
            if let Some(children) = self.user_branch(ctx, node, &integers, &semis, z) {
                return Some(children);
            }
        }

        let (rule, modes) = (self.settings.node_rule, self.settings.node_modes);
        if !integers.is_empty() {
            let k = select_candidate(rule, modes, &integers, &self.pseudo, &mut self.rng);
            return Some(self.integer_children(ctx, node, integers[k], z));
        }
        if !semis.is_empty() {
            let k = select_candidate(rule, modes, &semis, &self.pseudo, &mut self.rng);
            return Some(self.semicont_children(ctx, node, semis[k], z));
        }
        let data = self.data;
        let violated = self
            .sos_order
            .iter()
            .copied()
            .find(|&s| !data.sos[s].is_satisfied(x, tol));
        violated.map(|s| self.sos_children(node, s, x, z))
    }

    fn user_branch(
        &mut self,
        ctx: &mut SolveContext,
        node: &Node,
        integers: &[Fractional],
        semis: &[Fractional],
        z: f64,
    ) -> Option<Vec<Node>> {
        let data = self.data;
        let column_of = |c: &Fractional| data.col_origin[c.col] + 1;
        let offered: Vec<BranchCandidate> = integers
            .iter()
            .map(|c| (c, CandidateKind::Integer))
            .chain(semis.iter().map(|c| (c, CandidateKind::SemiContinuous)))
            .map(|(c, kind)| BranchCandidate {
                column: column_of(c),
                value: c.value,
                lower: c.lower,
                upper: c.upper,
                kind,
            })
            .collect();
        if offered.is_empty() {
            return None;
        }

        let column = ctx.callbacks.select_node(&offered)?;
        if let Some(&c) = integers.iter().find(|c| column_of(c) == column) {
            return Some(self.integer_children(ctx, node, c, z));
        }
        let c = *semis.iter().find(|c| column_of(c) == column)?;
        Some(self.semicont_children(ctx, node, c, z))
    }

    // true if the up branch of `col` is explored first
    fn prefers_up(&mut self, ctx: &mut SolveContext, col: usize, frac: f64) -> bool {
        let mode = ctx
            .callbacks
            .select_branch(self.data.col_origin[col] + 1)
            .unwrap_or(match self.data.branch[col] {
                BranchMode::Default => self.settings.floor_first,
                mode => mode,
            });
        match mode {
            BranchMode::Floor => false,
            BranchMode::Ceiling => true,
            BranchMode::Automatic | BranchMode::Default => {
                let modes = self.settings.node_modes;
                if modes.contains(NodeModes::RANDOMIZE) {
                    self.rng.random_bool(0.5)
                } else {
                    (frac > 0.5) != modes.contains(NodeModes::BRANCHREVERSE)
                }
            }
        }
    }

    fn integer_children(
        &mut self,
        ctx: &mut SolveContext,
        node: &Node,
        c: Fractional,
        z: f64,
    ) -> Vec<Node> {
        let f = c.frac();
        let up_first = self.prefers_up(ctx, c.col, f);
        let basis = self.engine.basis();

        let down = child(
            node,
            BoundChange {
                col: c.col,
                lower: c.lower.ceil(),
                upper: c.value.floor(),
            },
            z,
            &basis,
            Some(BranchRecord {
                col: c.col,
                up: false,
                distance: f,
            }),
        );
        let up = child(
            node,
            BoundChange {
                col: c.col,
                lower: c.value.ceil(),
                upper: c.upper.floor(),
            },
            z,
            &basis,
            Some(BranchRecord {
                col: c.col,
                up: true,
                distance: 1.0 - f,
            }),
        );
        let children = if up_first { [up, down] } else { [down, up] };
        self.push_order(children.into_iter().flatten().collect())
    }

    // A semi-continuous column is either zero or at least its lower bound.
    fn semicont_children(
        &mut self,
        ctx: &mut SolveContext,
        node: &Node,
        c: Fractional,
        z: f64,
    ) -> Vec<Node> {
        let sc_lower = self.data.col_lower[c.col];
        let on_first = self.prefers_up(ctx, c.col, c.value / sc_lower);
        let basis = self.engine.basis();

        let off = (c.lower <= 0.0 && c.upper >= 0.0)
            .then(|| {
                child(
                    node,
                    BoundChange {
                        col: c.col,
                        lower: 0.0,
                        upper: 0.0,
                    },
                    z,
                    &basis,
                    Some(BranchRecord {
                        col: c.col,
                        up: false,
                        distance: c.value,
                    }),
                )
            })
            .flatten();
        let on = child(
            node,
            BoundChange {
                col: c.col,
                lower: sc_lower.max(c.lower),
                upper: c.upper,
            },
            z,
            &basis,
            Some(BranchRecord {
                col: c.col,
                up: true,
                distance: sc_lower - c.value,
            }),
        );
        let children = if on_first { [on, off] } else { [off, on] };
        self.push_order(children.into_iter().flatten().collect())
    }

    // One child per window of `sos_type` consecutive members that
    // overlaps the nonzero members of `x`.  Members outside the window
    // are fixed at zero.
    fn sos_children(&mut self, node: &Node, s: usize, x: &[f64], z: f64) -> Vec<Node> {
        let data = self.data;
        let set = &data.sos[s];
        let Some((first, last)) = set.nonzero_span(x, self.settings.epsilon_int) else {
            return Vec::new();
        };
        let k = set.columns.len();
        let width = set.sos_type.min(k);
        let basis = self.engine.basis();

        let mut children = Vec::new();
        for w in (first + 1).saturating_sub(width)..=last.min(k - width) {
            let mut bounds = node.bounds.clone();
            let mut feasible = true;
            for (p, &col) in set.columns.iter().enumerate() {
                if p >= w && p < w + width {
                    continue;
                }
                let (lower, upper) = self.node_bounds(node, col);
                if lower > 0.0 || upper < 0.0 {
                    feasible = false;
                    break;
                }
                if lower != 0.0 || upper != 0.0 {
                    bounds.push(BoundChange {
                        col,
                        lower: 0.0,
                        upper: 0.0,
                    });
                }
            }
            if feasible {
                children.push(Node {
                    bounds,
                    depth: node.depth + 1,
                    estimate: z,
                    basis: Some(basis.clone()),
                    branch: None,
                });
            }
        }
        self.push_order(children)
    }

    // `children` arrive in preferred order.  Depth first search pops the
    // newest node, so the preferred child is pushed last.
    fn push_order(&self, mut children: Vec<Node>) -> Vec<Node> {
        let modes = self.settings.node_modes;
        if !modes.intersects(NodeModes::GREEDY | NodeModes::BREADTHFIRST) {
            children.reverse();
        }
        children
    }
}

fn child(
    node: &Node,
    change: BoundChange,
    z: f64,
    basis: &Basis,
    branch: Option<BranchRecord>,
) -> Option<Node> {
    if change.lower > change.upper {
        return None;
    }
    let mut bounds = node.bounds.clone();
    bounds.push(change);
    Some(Node {
        bounds,
        depth: node.depth + 1,
        estimate: z,
        basis: Some(basis.clone()),
        branch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::PrintTarget;
    use crate::solver::core::callbacks::SolverCallbacks;
    use crate::solver::model::Model;

    fn solve(model: &Model, settings: &SolverSettings) -> MipResult {
        let data = ProblemData::from_model(model);
        let mut callbacks = SolverCallbacks::new();
        let mut stream = PrintTarget::Sink;
        let mut ctx = SolveContext::new(&mut callbacks, &mut stream, settings);
        let engine = SimplexEngine::new(&data, settings);
        let mut bb = BranchAndBound::new(&data, settings, engine);
        bb.run(&mut ctx)
    }

    fn integer_model() -> Model {
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
        model.set_int(1, true).unwrap();
        model.set_int(2, true).unwrap();
        model
    }

    #[test]
    fn test_integer_search_orders() {
        let model = integer_model();
        for node_modes in [
            NodeModes::empty(),
            NodeModes::GREEDY,
            NodeModes::BREADTHFIRST,
            NodeModes::WEIGHTREVERSE | NodeModes::BRANCHREVERSE,
            NodeModes::RANDOMIZE,
        ] {
            for node_rule in [
                NodeRule::FirstSelect,
                NodeRule::GapSelect,
                NodeRule::FractionSelect,
                NodeRule::PseudoCostSelect,
            ] {
                let settings = SolverSettings {
                    node_modes,
                    node_rule,
                    floor_first: BranchMode::Automatic,
                    ..SolverSettings::default()
                };
                let result = solve(&model, &settings);
                assert_eq!(result.status, SolverStatus::Optimal);
                assert!((result.best_bound + 6266.0).abs() < 1e-6);
                assert_eq!(result.x.unwrap(), vec![22.0, 52.0]);
                assert!(result.nodes > 1);
                assert!(result.solution_count >= 1);
            }
        }
    }

    #[test]
    fn test_break_at_first() {
        let model = integer_model();
        let settings = SolverSettings {
            break_at_first: true,
            ..SolverSettings::default()
        };
        let result = solve(&model, &settings);
        assert_eq!(result.status, SolverStatus::SubOptimal);
        assert_eq!(result.solution_count, 1);
        let x = result.x.unwrap();
        assert!(143.0 * x[0] + 60.0 * x[1] <= 6266.0 + 1e-6);
    }

    #[test]
    fn test_objective_bound_excludes_everything() {
        let model = integer_model();
        let settings = SolverSettings {
            objective_bound: Some(7000.0),
            ..SolverSettings::default()
        };
        let result = solve(&model, &settings);
        assert_eq!(result.status, SolverStatus::Infeasible);
        assert!(result.x.is_none());
    }

    #[test]
    fn test_integer_infeasible() {
        // 0.2 <= x <= 0.8 has no integer point
        let mut model = Model::new(0, 1).unwrap();
        model.set_obj_fn(&[1.0]).unwrap();
        model.add_constraint(&[1.0], ConstraintType::Ge, 0.2).unwrap();
        model.add_constraint(&[1.0], ConstraintType::Le, 0.8).unwrap();
        model.set_int(1, true).unwrap();
        let result = solve(&model, &SolverSettings::default());
        assert_eq!(result.status, SolverStatus::Infeasible);
        assert_eq!(result.nodes, 3);
    }

    #[test]
    fn test_semicontinuous_branch() {
        // min x, x >= 1, x semi-continuous in [2, 10]
        let mut model = Model::new(0, 1).unwrap();
        model.set_obj_fn(&[1.0]).unwrap();
        model.add_constraint(&[1.0], ConstraintType::Ge, 1.0).unwrap();
        model.set_semicont(1, true).unwrap();
        model.set_bounds(1, 2.0, 10.0).unwrap();
        let result = solve(&model, &SolverSettings::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert!((result.best_bound - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_sos1_branch() {
        // max x1 + 2 x2 + 3 x3, x1 + x2 + x3 <= 2, x <= 1, at most one nonzero
        let mut model = Model::new(0, 3).unwrap();
        model.set_maxim();
        model.set_obj_fn(&[1.0, 2.0, 3.0]).unwrap();
        model
            .add_constraint(&[1.0, 1.0, 1.0], ConstraintType::Le, 2.0)
            .unwrap();
        for j in 1..=3 {
            model.set_upbo(j, 1.0).unwrap();
        }
        model
            .add_sos("s1", 1, 1, &[(1, 1.0), (2, 2.0), (3, 3.0)])
            .unwrap();
        let result = solve(&model, &SolverSettings::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert!((result.best_bound + 3.0).abs() < 1e-9);
        let x = result.x.unwrap();
        assert!(x[0].abs() < 1e-9 && x[1].abs() < 1e-9);
    }

    #[test]
    fn test_depth_limit_truncates() {
        let model = integer_model();
        let settings = SolverSettings {
            depth_limit: 1,
            ..SolverSettings::default()
        };
        let result = solve(&model, &settings);
        assert!(matches!(
            result.status,
            SolverStatus::SubOptimal | SolverStatus::Infeasible
        ));
        assert!(result.max_depth <= 1);
    }
}
