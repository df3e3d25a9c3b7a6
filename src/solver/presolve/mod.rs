//! Problem reductions applied before the simplex.
//!
//! Reductions run in a fixed order and are repeated until a pass changes
//! nothing or the configured number of passes is reached.  Removed
//! columns are recorded as [`PostOp`]s so the solution of the reduced
//! problem can be mapped back.

use crate::algebra::*;
use crate::solver::core::{PresolveModes, SolverSettings};
use crate::solver::model::ProblemData;

mod postsolve;
mod reductions;

pub(crate) use postsolve::{PostOp, Postsolve};

// bound on the number of passes when looping until nothing changes
const MAX_PASSES: usize = 100;

/// Presolve proved the problem infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PresolveInfeasible;

#[derive(Debug)]
pub(crate) enum PresolveOutcome {
    Reduced {
        problem: ProblemData,
        postsolve: Postsolve,
    },
    Infeasible,
}

/// Working copy of a problem being reduced, stored by rows.
#[derive(Debug)]
pub(crate) struct Presolver {
    // entries of each row, sorted by column
    rows: Vec<Vec<(usize, f64)>>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
    row_divisor: Vec<f64>,
    keep_row: Vec<bool>,

    cost: Vec<f64>,
    offset: f64,
    col_lower: Vec<f64>,
    col_upper: Vec<f64>,
    integer: Vec<bool>,
    // semi-continuous and SOS member columns are never eliminated
    protected: Vec<bool>,
    keep_col: Vec<bool>,

    ops: Vec<PostOp>,
    tol: f64,
    int_tol: f64,
}

impl Presolver {
    /// Apply the reductions enabled in `settings.presolve`.
    pub fn reduce(data: &ProblemData, settings: &SolverSettings) -> PresolveOutcome {
        let mut presolver = Presolver::new(data, settings);
        match presolver.run(settings.presolve, settings.presolve_loops) {
            Ok(()) => presolver.finish(data),
            Err(PresolveInfeasible) => PresolveOutcome::Infeasible,
        }
    }

    fn new(data: &ProblemData, settings: &SolverSettings) -> Self {
        let (m, n) = (data.m, data.n);

        let mut rows = vec![Vec::new(); m];
        for j in 0..n {
            let (rowidx, vals) = data.a.col(j);
            for (&i, &v) in rowidx.iter().zip(vals) {
                if v != 0.0 {
                    rows[i].push((j, v));
                }
            }
        }

        let mut protected = data.semicont.clone();
        for sos in data.sos.iter() {
            for &c in sos.columns.iter() {
                protected[c] = true;
            }
        }

        Self {
            rows,
            row_lower: data.row_lower.clone(),
            row_upper: data.row_upper.clone(),
            row_divisor: vec![1.0; m],
            keep_row: vec![true; m],
            cost: data.cost.clone(),
            offset: data.offset,
            col_lower: data.col_lower.clone(),
            col_upper: data.col_upper.clone(),
            integer: data.integer.clone(),
            protected,
            keep_col: vec![true; n],
            ops: Vec::new(),
            tol: settings.epsilon_primal,
            int_tol: settings.epsilon_int,
        }
    }

    fn run(&mut self, modes: PresolveModes, loops: i32) -> Result<(), PresolveInfeasible> {
        let max_passes = if loops > 0 {
            loops as usize
        } else {
            MAX_PASSES
        };

        for _ in 0..max_passes {
            let mut changed = false;
            if modes.contains(PresolveModes::ROWS) {
                changed |= self.reduce_rows()?;
            }
            if modes.contains(PresolveModes::COLS) {
                changed |= self.reduce_columns()?;
            }
            if modes.contains(PresolveModes::LINDEP) {
                changed |= self.merge_parallel_rows()?;
            }
            if modes.contains(PresolveModes::ELIMEQ2) {
                changed |= self.eliminate_doubleton_equalities()?;
            }
            if modes.contains(PresolveModes::REDUCEGCD) {
                changed |= self.reduce_gcd()?;
            }
            if !changed {
                break;
            }
        }
        Ok(())
    }

    // Assemble the reduced problem from the surviving rows and columns.
    fn finish(self, data: &ProblemData) -> PresolveOutcome {
        let row_index = findall(&self.keep_row);
        let col_index = findall(&self.keep_col);

        let mut new_col = vec![usize::MAX; data.n];
        for (k, &j) in col_index.iter().enumerate() {
            new_col[j] = k;
        }

        let mut columns = vec![Vec::new(); col_index.len()];
        for (r, &i) in row_index.iter().enumerate() {
            for &(j, v) in self.rows[i].iter() {
                if self.keep_col[j] {
                    columns[new_col[j]].push((r, v));
                }
            }
        }
        let a = CscMatrix::from_columns(row_index.len(), &columns);

        let pick = |v: &[f64], index: &[usize]| index.iter().map(|&k| v[k]).collect::<Vec<_>>();

        let sos = data
            .sos
            .iter()
            .map(|s| {
                let mut s = s.clone();
                for c in s.columns.iter_mut() {
                    *c = new_col[*c];
                }
                s
            })
            .collect();

        let problem = ProblemData {
            m: row_index.len(),
            n: col_index.len(),
            a,
            cost: pick(&self.cost, &col_index),
            offset: self.offset,
            sense: data.sense,
            col_lower: pick(&self.col_lower, &col_index),
            col_upper: pick(&self.col_upper, &col_index),
            row_lower: pick(&self.row_lower, &row_index),
            row_upper: pick(&self.row_upper, &row_index),
            integer: col_index.iter().map(|&j| data.integer[j]).collect(),
            semicont: col_index.iter().map(|&j| data.semicont[j]).collect(),
            priority: pick(&data.priority, &col_index),
            branch: col_index.iter().map(|&j| data.branch[j]).collect(),
            sos,
            col_origin: col_index.iter().map(|&j| data.col_origin[j]).collect(),
            row_origin: row_index.iter().map(|&i| data.row_origin[i]).collect(),
        };

        let postsolve = Postsolve {
            keep_row: self.keep_row,
            keep_col: self.keep_col,
            row_index,
            col_index,
            row_divisor: self.row_divisor,
            ops: self.ops,
        };
        PresolveOutcome::Reduced { problem, postsolve }
    }
}

fn findall(keep_logical: &[bool]) -> Vec<usize> {
    keep_logical
        .iter()
        .enumerate()
        .filter(|(_, &k)| k)
        .map(|(index, _)| index)
        .collect()
}
