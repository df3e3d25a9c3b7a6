use super::{Model, SosSet};
use crate::algebra::*;
use crate::solver::core::BranchMode;

// ---------------
// Data type for the computational form of a model
// ---------------

/// Computational form of a model: 0-based, minimization sense, infinite
/// bounds as `±f64::INFINITY` and the objective row split off from the
/// constraint matrix.
///
/// The same type describes the problem handed to the simplex after
/// presolve, in which case `col_origin` / `row_origin` give the original
/// index of every kept column and row.
#[derive(Debug, Clone)]
pub(crate) struct ProblemData {
    pub m: usize,
    pub n: usize,
    pub a: CscMatrix<f64>,
    /// objective coefficients, already negated for maximization
    pub cost: Vec<f64>,
    /// objective constant, already negated for maximization
    pub offset: f64,
    /// 1 for minimization, -1 for maximization
    pub sense: f64,
    pub col_lower: Vec<f64>,
    pub col_upper: Vec<f64>,
    pub row_lower: Vec<f64>,
    pub row_upper: Vec<f64>,
    pub integer: Vec<bool>,
    pub semicont: Vec<bool>,
    pub priority: Vec<f64>,
    pub branch: Vec<BranchMode>,
    pub sos: Vec<SosSet>,
    pub col_origin: Vec<usize>,
    pub row_origin: Vec<usize>,
}

impl ProblemData {
    pub fn from_model(model: &Model) -> Self {
        let (m, n) = (model.rows(), model.columns());
        let sense = if model.maximize { -1.0 } else { 1.0 };

        let a = model.matrix.to_csc();
        let mut cost = model.matrix.objective().to_vec();
        cost.scale(sense);

        let (row_lower, row_upper) = model.rows.iter().map(|r| r.bounds()).unzip();

        let priority = model
            .cols
            .iter()
            .enumerate()
            .map(|(j, c)| c.priority.unwrap_or((j + 1) as f64))
            .collect();

        Self {
            m,
            n,
            a,
            cost,
            offset: sense * model.obj_const,
            sense,
            col_lower: model.cols.iter().map(|c| c.lower).collect(),
            col_upper: model.cols.iter().map(|c| c.upper).collect(),
            row_lower,
            row_upper,
            integer: model.cols.iter().map(|c| c.integer).collect(),
            semicont: model.cols.iter().map(|c| c.semicont).collect(),
            priority,
            branch: model.cols.iter().map(|c| c.branch).collect(),
            sos: model.sos.clone(),
            col_origin: (0..n).collect(),
            row_origin: (0..m).collect(),
        }
    }

    /// true if any column needs branch-and-bound: integers,
    /// semi-continuous columns with a positive lower bound, or SOS members
    pub fn has_discrete(&self) -> bool {
        self.integer.iter().any(|&b| b)
            || (0..self.n).any(|j| self.is_active_semicont(j))
            || !self.sos.is_empty()
    }

    /// A semi-continuous column only restricts the model when its lower
    /// bound is positive.
    pub fn is_active_semicont(&self, j: usize) -> bool {
        self.semicont[j] && self.col_lower[j] > 0.0
    }

    /// `(lower, upper)` bounds of column `j` in the continuous relaxation
    pub fn relaxed_bounds(&self, j: usize) -> (f64, f64) {
        if self.is_active_semicont(j) {
            (0.0, self.col_upper[j])
        } else {
            (self.col_lower[j], self.col_upper[j])
        }
    }

    /// true if some column or row has a lower bound above its upper bound
    pub fn has_crossed_bounds(&self, tol: f64) -> bool {
        let crossed = |lo: &[f64], hi: &[f64]| {
            lo.iter()
                .zip(hi)
                .any(|(&l, &u)| l > u + tol * (1.0 + u.abs().min(l.abs())))
        };
        crossed(&self.col_lower, &self.col_upper) || crossed(&self.row_lower, &self.row_upper)
    }

    /// row activities `A x`
    pub fn row_activity(&self, x: &[f64]) -> Vec<f64> {
        let mut r = vec![0.0; self.m];
        self.a.gemv(&mut r, x, 1.0, 0.0);
        r
    }

    /// objective value in minimization sense, including the constant
    pub fn objective(&self, x: &[f64]) -> f64 {
        self.cost.dot(x) + self.offset
    }

    /// objective value as seen by the user
    pub fn user_objective(&self, x: &[f64]) -> f64 {
        self.sense * self.objective(x)
    }
}

#[test]
fn test_problem_data_from_model() {
    use crate::solver::core::ConstraintType;

    let mut model = Model::new(0, 2).unwrap();
    model.set_maxim();
    model.set_obj_fn(&[1.0, 2.0]).unwrap();
    model
        .add_constraint(&[1.0, 1.0], ConstraintType::Ge, 2.0)
        .unwrap();
    model.set_semicont(2, true).unwrap();
    model.set_bounds(2, 1.0, 5.0).unwrap();

    let data = ProblemData::from_model(&model);
    assert_eq!(data.cost, vec![-1.0, -2.0]);
    assert_eq!(data.row_lower, vec![2.0]);
    assert_eq!(data.row_upper, vec![f64::INFINITY]);
    assert!(data.has_discrete());
    assert_eq!(data.relaxed_bounds(1), (0.0, 5.0));
    assert_eq!(data.user_objective(&[1.0, 1.0]), 3.0);
    assert_eq!(data.row_activity(&[1.0, 1.0]), vec![2.0]);
    assert!(!data.has_crossed_bounds(1e-9));
}
