use crate::solver::core::SolverStatus;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ranging information on the final basis.  Infinite ends of a range are
/// reported as ± the model's infinity value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sensitivity {
    /// lowest objective coefficient (per column) keeping the basis optimal
    pub objective_from: Vec<f64>,
    /// highest objective coefficient (per column) keeping the basis optimal
    pub objective_till: Vec<f64>,
    /// lowest right hand side (per row) for which the dual value stays valid
    pub rhs_from: Vec<f64>,
    /// highest right hand side (per row) for which the dual value stays valid
    pub rhs_till: Vec<f64>,
    /// lowest value (per column) for which the reduced cost stays valid
    pub value_from: Vec<f64>,
    /// highest value (per column) for which the reduced cost stays valid
    pub value_till: Vec<f64>,
}

/// Index maps produced by presolve.   Entry `k` of each map is the 1-based
/// index in the reduced problem of original row / column `k + 1`, or 0 if
/// presolve removed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresolveMap {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
}

impl PresolveMap {
    /// number of rows kept in the reduced problem
    pub fn kept_rows(&self) -> usize {
        self.rows.iter().filter(|&&r| r != 0).count()
    }

    /// number of columns kept in the reduced problem
    pub fn kept_columns(&self) -> usize {
        self.columns.iter().filter(|&&c| c != 0).count()
    }
}

/// Result of the last solve, expressed in the original numbering of
/// the model.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolutionReport {
    /// termination status
    pub status: SolverStatus,
    /// objective value including the objective constant
    pub objective: f64,
    /// best bound on the objective known at termination
    pub best_bound: f64,
    /// column values
    pub variables: Vec<f64>,
    /// row activities
    pub constraints: Vec<f64>,
    /// row dual values, if requested
    pub duals: Option<Vec<f64>>,
    /// column reduced costs, if requested
    pub reduced_costs: Option<Vec<f64>>,
    /// ranging information, if requested
    pub sensitivity: Option<Sensitivity>,
    /// simplex iterations
    pub iterations: u64,
    /// branch-and-bound nodes
    pub nodes: u64,
    /// deepest branch-and-bound level reached
    pub max_depth: u32,
    /// improved (or counted equal) solutions found
    pub solution_count: u32,
    /// seconds spent in the solve
    pub solve_time: f64,
    /// presolve index maps, if presolve reduced the problem
    pub presolve_map: Option<PresolveMap>,
}

impl SolutionReport {
    /// true if primal values are available
    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }
}
