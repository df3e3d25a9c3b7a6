use super::{Basis, ModelError, SosSet, SparseMatrix};
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use crate::solver::core::callbacks::{BranchCandidate, SolveProgress, SolverCallbacks};
use crate::solver::core::*;
use crate::solver::report::{Sensitivity, SolutionReport};
use std::io::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------
// row and column attributes
// ---------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub(crate) struct RowData {
    pub name: Option<String>,
    pub kind: ConstraintType,
    pub rhs: f64,
    /// second bound of a ranged `Le` / `Ge` row
    pub range: f64,
}

impl Default for RowData {
    fn default() -> Self {
        RowData::new(ConstraintType::Le, 0.0)
    }
}

impl RowData {
    pub fn new(kind: ConstraintType, rhs: f64) -> Self {
        Self {
            name: None,
            kind,
            rhs,
            range: unset_range(kind),
        }
    }

    /// `(lower, upper)` bounds on the row activity
    pub fn bounds(&self) -> (f64, f64) {
        match self.kind {
            ConstraintType::Le => (self.range, self.rhs),
            ConstraintType::Ge => (self.rhs, self.range),
            ConstraintType::Eq => (self.rhs, self.rhs),
            ConstraintType::Free => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

fn unset_range(kind: ConstraintType) -> f64 {
    match kind {
        ConstraintType::Le => f64::NEG_INFINITY,
        ConstraintType::Ge => f64::INFINITY,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub(crate) struct ColData {
    pub name: Option<String>,
    pub lower: f64,
    pub upper: f64,
    pub integer: bool,
    pub semicont: bool,
    /// branching weight, lower is branched on first
    pub priority: Option<f64>,
    pub branch: BranchMode,
}

impl Default for ColData {
    fn default() -> Self {
        Self {
            name: None,
            lower: 0.0,
            upper: f64::INFINITY,
            integer: false,
            semicont: false,
            priority: None,
            branch: BranchMode::Default,
        }
    }
}

// ---------------------------------
// the model
// ---------------------------------

/// A linear or mixed integer program together with its settings, callbacks,
/// warm start basis and the result of the last solve.
///
/// Rows and columns are numbered from 1; row 0 is the objective.
///
/// ```no_run
/// use lpsolve::solver::*;
///
/// let mut model = Model::new(0, 2).unwrap();
/// model.set_maxim();
/// model.set_obj_fn(&[143., 60.]).unwrap();
/// model.add_constraint(&[120., 210.], ConstraintType::Le, 15000.).unwrap();
/// model.add_constraint(&[110., 30.], ConstraintType::Le, 4000.).unwrap();
/// model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
///
/// assert_eq!(model.solve(), SolverStatus::Optimal);
/// println!("objective = {}", model.get_objective());
/// ```
#[derive(Debug)]
pub struct Model {
    pub(crate) name: String,
    pub(crate) matrix: SparseMatrix,
    pub(crate) rows: Vec<RowData>,
    pub(crate) cols: Vec<ColData>,
    pub(crate) sos: Vec<SosSet>,
    pub(crate) maximize: bool,
    pub(crate) obj_const: f64,
    pub(crate) obj_name: Option<String>,
    pub(crate) row_mode: bool,
    pub(crate) settings: SolverSettings,
    pub(crate) callbacks: SolverCallbacks,
    pub(crate) stream: PrintTarget,
    pub(crate) basis: Option<Basis>,
    pub(crate) solution: SolutionReport,
}

impl Model {
    /// Create a model with `rows` empty `<= 0` constraints and `columns`
    /// continuous non-negative columns.  Returns `None` if the storage
    /// can not be reserved.
    pub fn new(rows: usize, columns: usize) -> Option<Self> {
        Self::with_settings(rows, columns, SolverSettings::default())
    }

    /// As [`new`](Model::new), with the given solver settings.
    pub fn with_settings(rows: usize, columns: usize, settings: SolverSettings) -> Option<Self> {
        let matrix = SparseMatrix::try_new(rows, columns)?;
        let mut row_data = Vec::new();
        row_data.try_reserve_exact(rows).ok()?;
        row_data.resize(rows, RowData::default());
        let mut col_data = Vec::new();
        col_data.try_reserve_exact(columns).ok()?;
        col_data.resize(columns, ColData::default());

        Some(Self {
            name: String::from("Unnamed"),
            matrix,
            rows: row_data,
            cols: col_data,
            sos: Vec::new(),
            maximize: false,
            obj_const: 0.0,
            obj_name: None,
            row_mode: false,
            settings,
            callbacks: SolverCallbacks::default(),
            stream: PrintTarget::default(),
            basis: None,
            solution: SolutionReport::default(),
        })
    }

    /// Grow or shrink the model.  Removed rows and columns are taken from
    /// the end, added ones get default attributes.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<(), ModelError> {
        if columns > self.columns() {
            self.matrix
                .try_reserve_columns(columns - self.columns())
                .ok_or(ModelError::Allocation)?;
        }
        while self.rows() > rows {
            self.matrix.delete_row(self.rows() - 1);
            self.rows.pop();
        }
        while self.rows() < rows {
            self.matrix.append_row(&[]);
            self.rows.push(RowData::default());
        }
        while self.columns() > columns {
            let col = self.columns() - 1;
            self.remove_column_data(col);
        }
        while self.columns() < columns {
            self.matrix.append_column(0.0, &[]);
            self.cols.push(ColData::default());
        }
        self.invalidate_dims();
        Ok(())
    }

    // ---------------------------------
    // dimensions and naming
    // ---------------------------------

    /// number of constraint rows
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// number of columns
    pub fn columns(&self) -> usize {
        self.cols.len()
    }

    /// number of stored constraint coefficients
    pub fn nonzeros(&self) -> usize {
        self.matrix.nonzeros()
    }

    pub fn set_lp_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn get_lp_name(&self) -> &str {
        &self.name
    }

    /// Name row `row`; row 0 names the objective.
    pub fn set_row_name(&mut self, row: usize, name: &str) -> Result<(), ModelError> {
        self.check_row_or_objective(row)?;
        if row == 0 {
            self.obj_name = Some(name.to_string());
        } else {
            self.rows[row - 1].name = Some(name.to_string());
        }
        Ok(())
    }

    /// Name of row `row`; unnamed rows are called `R<row>`.
    pub fn get_row_name(&self, row: usize) -> Result<String, ModelError> {
        self.check_row_or_objective(row)?;
        let name = if row == 0 {
            self.obj_name.as_ref()
        } else {
            self.rows[row - 1].name.as_ref()
        };
        Ok(name.cloned().unwrap_or_else(|| format!("R{}", row)))
    }

    pub fn set_col_name(&mut self, col: usize, name: &str) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].name = Some(name.to_string());
        Ok(())
    }

    /// Name of column `col`; unnamed columns are called `C<col>`.
    pub fn get_col_name(&self, col: usize) -> Result<String, ModelError> {
        self.check_column(col)?;
        Ok(self.col_name(col - 1))
    }

    /// Index of the row (`is_row`) or column with the given name.
    /// Explicit names take precedence over the default `R<i>` / `C<j>`.
    pub fn get_nameindex(&self, name: &str, is_row: bool) -> Result<usize, ModelError> {
        let explicit = if is_row {
            self.rows
                .iter()
                .position(|r| r.name.as_deref() == Some(name))
        } else {
            self.cols
                .iter()
                .position(|c| c.name.as_deref() == Some(name))
        };
        if let Some(k) = explicit {
            return Ok(k + 1);
        }
        let (prefix, count) = if is_row {
            ('R', self.rows())
        } else {
            ('C', self.columns())
        };
        name.strip_prefix(prefix)
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&k| k >= 1 && k <= count)
            .ok_or_else(|| ModelError::UnknownName(name.to_string()))
    }

    pub(crate) fn row_name(&self, row: usize) -> String {
        self.rows[row]
            .name
            .clone()
            .unwrap_or_else(|| format!("R{}", row + 1))
    }

    pub(crate) fn col_name(&self, col: usize) -> String {
        self.cols[col]
            .name
            .clone()
            .unwrap_or_else(|| format!("C{}", col + 1))
    }

    // ---------------------------------
    // entry mode
    // ---------------------------------

    /// Switch between row-wise and column-wise model building.  Row mode
    /// can only be turned on while the model has no rows, and column
    /// insertion or deletion is rejected while it is on.
    pub fn set_add_rowmode(&mut self, on: bool) -> Result<(), ModelError> {
        if on && !self.row_mode && self.rows() > 0 {
            return Err(ModelError::InvalidState(
                "row entry mode must be set before rows are added",
            ));
        }
        self.row_mode = on;
        Ok(())
    }

    pub fn is_add_rowmode(&self) -> bool {
        self.row_mode
    }

    // ---------------------------------
    // rows
    // ---------------------------------

    /// Append a constraint from a dense coefficient slice with one entry
    /// per column.  Returns the index of the new row.
    pub fn add_constraint(
        &mut self,
        coeffs: &[f64],
        kind: ConstraintType,
        rhs: f64,
    ) -> Result<usize, ModelError> {
        self.check_len(coeffs.len(), self.columns())?;
        let entries: Vec<(usize, f64)> = coeffs
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(j, &v)| (j + 1, v))
            .collect();
        self.add_constraint_ex(&entries, kind, rhs)
    }

    /// Append a constraint from 1-based `(column, value)` pairs.  Returns
    /// the index of the new row.
    pub fn add_constraint_ex(
        &mut self,
        entries: &[(usize, f64)],
        kind: ConstraintType,
        rhs: f64,
    ) -> Result<usize, ModelError> {
        for &(col, _) in entries {
            self.check_column(col)?;
        }
        let zero_based: Vec<(usize, f64)> = entries.iter().map(|&(c, v)| (c - 1, v)).collect();
        self.matrix.append_row(&zero_based);
        let rhs = self.settings.to_internal(rhs);
        self.rows.push(RowData::new(kind, rhs));
        self.invalidate_dims();
        Ok(self.rows())
    }

    /// Delete row `row`; rows after it move up by one.
    pub fn del_constraint(&mut self, row: usize) -> Result<(), ModelError> {
        self.check_row(row)?;
        self.matrix.delete_row(row - 1);
        self.rows.remove(row - 1);
        self.invalidate_dims();
        Ok(())
    }

    /// Change the operator of a row.  Any range on the row is cleared.
    pub fn set_constr_type(&mut self, row: usize, kind: ConstraintType) -> Result<(), ModelError> {
        self.check_row(row)?;
        let data = &mut self.rows[row - 1];
        data.kind = kind;
        data.range = unset_range(kind);
        self.invalidate();
        Ok(())
    }

    pub fn get_constr_type(&self, row: usize) -> Result<ConstraintType, ModelError> {
        self.check_row(row)?;
        Ok(self.rows[row - 1].kind)
    }

    /// Set the right hand side of row `row`.  Row 0 sets the objective
    /// constant.
    pub fn set_rh(&mut self, row: usize, value: f64) -> Result<(), ModelError> {
        self.check_row_or_objective(row)?;
        if row == 0 {
            self.obj_const = value;
        } else {
            self.rows[row - 1].rhs = self.settings.to_internal(value);
        }
        self.invalidate();
        Ok(())
    }

    pub fn get_rh(&self, row: usize) -> Result<f64, ModelError> {
        self.check_row_or_objective(row)?;
        if row == 0 {
            Ok(self.obj_const)
        } else {
            Ok(self.settings.to_external(self.rows[row - 1].rhs))
        }
    }

    /// Set all right hand sides from a slice with one entry per row.
    pub fn set_rh_vec(&mut self, rhs: &[f64]) -> Result<(), ModelError> {
        self.check_len(rhs.len(), self.rows())?;
        for (data, &v) in self.rows.iter_mut().zip(rhs) {
            data.rhs = self.settings.to_internal(v);
        }
        self.invalidate();
        Ok(())
    }

    /// Restrict the activity of row `row` to `[lower, upper]`.  Equal
    /// bounds turn the row into an equality.
    pub fn set_rh_range(&mut self, row: usize, lower: f64, upper: f64) -> Result<(), ModelError> {
        self.check_row(row)?;
        let lo = self.settings.to_internal(lower);
        let hi = self.settings.to_internal(upper);
        let data = &mut self.rows[row - 1];

        if lo == hi {
            data.kind = ConstraintType::Eq;
            data.rhs = lo;
            data.range = 0.0;
        } else {
            match data.kind {
                ConstraintType::Le => {
                    data.rhs = hi;
                    data.range = lo;
                }
                ConstraintType::Ge => {
                    data.rhs = lo;
                    data.range = hi;
                }
                ConstraintType::Eq | ConstraintType::Free if lo == f64::NEG_INFINITY => {
                    data.kind = ConstraintType::Le;
                    data.rhs = hi;
                    data.range = lo;
                }
                ConstraintType::Eq | ConstraintType::Free => {
                    data.kind = ConstraintType::Ge;
                    data.rhs = lo;
                    data.range = hi;
                }
            }
        }
        self.invalidate();
        Ok(())
    }

    /// `(lower, upper)` bounds on the activity of row `row`
    pub fn get_rh_range(&self, row: usize) -> Result<(f64, f64), ModelError> {
        self.check_row(row)?;
        let (lo, hi) = self.rows[row - 1].bounds();
        Ok((self.settings.to_external(lo), self.settings.to_external(hi)))
    }

    /// Dense copy of row `row` with one entry per column.  Row 0 is the
    /// objective.
    pub fn get_row(&self, row: usize) -> Result<Vec<f64>, ModelError> {
        self.check_row_or_objective(row)?;
        if row == 0 {
            return Ok(self.matrix.objective().to_vec());
        }
        let mut dense = vec![0.0; self.columns()];
        for (j, v) in self.matrix.row(row - 1) {
            dense[j] = v;
        }
        Ok(dense)
    }

    // ---------------------------------
    // columns
    // ---------------------------------

    /// Append a column from a dense slice with `rows + 1` entries; entry 0
    /// is the objective coefficient.   Returns the index of the new column.
    pub fn add_column(&mut self, coeffs: &[f64]) -> Result<usize, ModelError> {
        self.check_len(coeffs.len(), self.rows() + 1)?;
        let entries: Vec<(usize, f64)> = coeffs
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .collect();
        self.add_column_ex(&entries)
    }

    /// Append a column from `(row, value)` pairs, row 0 being the
    /// objective.  Returns the index of the new column.
    pub fn add_column_ex(&mut self, entries: &[(usize, f64)]) -> Result<usize, ModelError> {
        if self.row_mode {
            return Err(ModelError::InvalidState(
                "columns can not be added in row entry mode",
            ));
        }
        for &(row, _) in entries {
            self.check_row_or_objective(row)?;
        }
        let obj = entries
            .iter()
            .filter(|(r, _)| *r == 0)
            .map(|&(_, v)| v)
            .last()
            .unwrap_or(0.0);
        let body: Vec<(usize, f64)> = entries
            .iter()
            .filter(|(r, _)| *r > 0)
            .map(|&(r, v)| (r - 1, v))
            .collect();
        self.matrix.append_column(obj, &body);
        self.cols.push(ColData::default());
        self.invalidate_dims();
        Ok(self.columns())
    }

    /// Delete column `col`; columns after it move left by one.
    pub fn del_column(&mut self, col: usize) -> Result<(), ModelError> {
        if self.row_mode {
            return Err(ModelError::InvalidState(
                "columns can not be deleted in row entry mode",
            ));
        }
        self.check_column(col)?;
        self.remove_column_data(col - 1);
        self.invalidate_dims();
        Ok(())
    }

    fn remove_column_data(&mut self, col: usize) {
        self.matrix.delete_column(col);
        self.cols.remove(col);
        self.sos.retain_mut(|s| s.delete_column(col));
    }

    /// Dense copy of column `col` with `rows + 1` entries, entry 0 being
    /// the objective coefficient.
    pub fn get_column(&self, col: usize) -> Result<Vec<f64>, ModelError> {
        self.check_column(col)?;
        let mut dense = vec![0.0; self.rows() + 1];
        dense[0] = self.matrix.objective()[col - 1];
        for &(i, v) in self.matrix.column(col - 1) {
            dense[i + 1] = v;
        }
        Ok(dense)
    }

    // ---------------------------------
    // matrix cells and objective
    // ---------------------------------

    /// Set the coefficient at `(row, col)`; row 0 is the objective.
    /// Setting 0 removes the coefficient.
    pub fn set_mat(&mut self, row: usize, col: usize, value: f64) -> Result<(), ModelError> {
        self.check_row_or_objective(row)?;
        self.check_column(col)?;
        if row == 0 {
            self.matrix.set_objective(col - 1, value);
        } else {
            self.matrix.set(row - 1, col - 1, value);
        }
        self.invalidate();
        Ok(())
    }

    /// Coefficient at `(row, col)`.  Out of range indices read as 0.
    pub fn get_mat(&self, row: usize, col: usize) -> f64 {
        if row > self.rows() || col == 0 || col > self.columns() {
            return 0.0;
        }
        if row == 0 {
            self.matrix.objective()[col - 1]
        } else {
            self.matrix.get(row - 1, col - 1)
        }
    }

    /// Set the objective from a dense slice with one entry per column.
    pub fn set_obj_fn(&mut self, coeffs: &[f64]) -> Result<(), ModelError> {
        self.check_len(coeffs.len(), self.columns())?;
        for (j, &v) in coeffs.iter().enumerate() {
            self.matrix.set_objective(j, v);
        }
        self.invalidate();
        Ok(())
    }

    /// Set the objective from 1-based `(column, value)` pairs.  Columns not
    /// listed get a zero coefficient.
    pub fn set_obj_fn_ex(&mut self, entries: &[(usize, f64)]) -> Result<(), ModelError> {
        for &(col, _) in entries {
            self.check_column(col)?;
        }
        for j in 0..self.columns() {
            self.matrix.set_objective(j, 0.0);
        }
        for &(col, v) in entries {
            self.matrix.set_objective(col - 1, v);
        }
        self.invalidate();
        Ok(())
    }

    /// Set a single objective coefficient.
    pub fn set_obj(&mut self, col: usize, value: f64) -> Result<(), ModelError> {
        self.set_mat(0, col, value)
    }

    pub fn set_maxim(&mut self) {
        self.set_sense(true);
    }

    pub fn set_minim(&mut self) {
        self.set_sense(false);
    }

    pub fn set_sense(&mut self, maximize: bool) {
        if self.maximize != maximize {
            self.maximize = maximize;
            self.invalidate();
        }
    }

    pub fn is_maxim(&self) -> bool {
        self.maximize
    }

    // ---------------------------------
    // bounds and column types
    // ---------------------------------

    /// Set both bounds of column `col`.  A lower bound above the upper bound
    /// is accepted and makes the model infeasible.
    pub fn set_bounds(&mut self, col: usize, lower: f64, upper: f64) -> Result<(), ModelError> {
        self.check_column(col)?;
        let data = &mut self.cols[col - 1];
        data.lower = self.settings.to_internal(lower);
        data.upper = self.settings.to_internal(upper);
        self.invalidate();
        Ok(())
    }

    pub fn set_lowbo(&mut self, col: usize, value: f64) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].lower = self.settings.to_internal(value);
        self.invalidate();
        Ok(())
    }

    pub fn set_upbo(&mut self, col: usize, value: f64) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].upper = self.settings.to_internal(value);
        self.invalidate();
        Ok(())
    }

    pub fn get_lowbo(&self, col: usize) -> Result<f64, ModelError> {
        self.check_column(col)?;
        Ok(self.settings.to_external(self.cols[col - 1].lower))
    }

    pub fn get_upbo(&self, col: usize) -> Result<f64, ModelError> {
        self.check_column(col)?;
        Ok(self.settings.to_external(self.cols[col - 1].upper))
    }

    /// Make column `col` free: both bounds infinite.
    pub fn set_unbounded(&mut self, col: usize) -> Result<(), ModelError> {
        self.set_bounds(col, -self.settings.infinity, self.settings.infinity)
    }

    pub fn is_unbounded(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        let data = &self.cols[col - 1];
        Ok(data.lower == f64::NEG_INFINITY && data.upper == f64::INFINITY)
    }

    /// true if column `col` can only take non-positive values
    pub fn is_negative(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        let data = &self.cols[col - 1];
        Ok(data.upper <= 0.0 && data.lower < 0.0)
    }

    pub fn set_int(&mut self, col: usize, integer: bool) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].integer = integer;
        self.invalidate();
        Ok(())
    }

    pub fn is_int(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        Ok(self.cols[col - 1].integer)
    }

    /// Make column `col` a 0/1 variable.  Clearing the flag only removes
    /// the integer restriction.
    pub fn set_binary(&mut self, col: usize, binary: bool) -> Result<(), ModelError> {
        self.check_column(col)?;
        let data = &mut self.cols[col - 1];
        data.integer = binary;
        if binary {
            data.lower = 0.0;
            data.upper = 1.0;
        }
        self.invalidate();
        Ok(())
    }

    pub fn is_binary(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        let data = &self.cols[col - 1];
        Ok(data.integer && data.lower == 0.0 && data.upper == 1.0)
    }

    /// Make column `col` semi-continuous: it is either 0 or between its
    /// bounds.
    pub fn set_semicont(&mut self, col: usize, semicont: bool) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].semicont = semicont;
        self.invalidate();
        Ok(())
    }

    pub fn is_semicont(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        Ok(self.cols[col - 1].semicont)
    }

    // ---------------------------------
    // branch-and-bound metadata
    // ---------------------------------

    /// Add a special ordered set from 1-based `(column, weight)` pairs.
    /// Returns the number of sets in the model.
    pub fn add_sos(
        &mut self,
        name: &str,
        sos_type: usize,
        priority: i32,
        members: &[(usize, f64)],
    ) -> Result<usize, ModelError> {
        for &(col, _) in members {
            self.check_column(col)?;
        }
        let zero_based: Vec<(usize, f64)> = members.iter().map(|&(c, w)| (c - 1, w)).collect();
        let set = SosSet::new(name, sos_type, priority, &zero_based)?;
        self.sos.push(set);
        self.invalidate();
        Ok(self.sos.len())
    }

    /// the special ordered sets of the model
    pub fn sos_sets(&self) -> &[SosSet] {
        &self.sos
    }

    pub fn is_sos_var(&self, col: usize) -> Result<bool, ModelError> {
        self.check_column(col)?;
        Ok(self.sos.iter().any(|s| s.contains(col - 1)))
    }

    /// Set the branching weights of all columns; lower weights are
    /// branched on first.
    pub fn set_var_weights(&mut self, weights: &[f64]) -> Result<(), ModelError> {
        self.check_len(weights.len(), self.columns())?;
        for (data, &w) in self.cols.iter_mut().zip(weights) {
            data.priority = Some(w);
        }
        self.invalidate();
        Ok(())
    }

    /// 1-based rank of column `col` in branching order
    pub fn get_var_priority(&self, col: usize) -> Result<usize, ModelError> {
        self.check_column(col)?;
        let order = self.priority_order();
        let rank = order.iter().position(|&j| j == col - 1).unwrap_or(col - 1);
        Ok(rank + 1)
    }

    /// 0-based columns sorted by branching weight
    pub(crate) fn priority_order(&self) -> Vec<usize> {
        let weight = |j: usize| self.cols[j].priority.unwrap_or((j + 1) as f64);
        let mut order: Vec<usize> = (0..self.columns()).collect();
        order.sort_by(|&a, &b| weight(a).total_cmp(&weight(b)));
        order
    }

    /// Set the preferred branching direction of column `col`.
    /// `BranchMode::Default` defers to the `floor_first` setting.
    pub fn set_var_branch(&mut self, col: usize, mode: BranchMode) -> Result<(), ModelError> {
        self.check_column(col)?;
        self.cols[col - 1].branch = mode;
        Ok(())
    }

    /// effective branching direction of column `col`
    pub fn get_var_branch(&self, col: usize) -> Result<BranchMode, ModelError> {
        self.check_column(col)?;
        Ok(match self.cols[col - 1].branch {
            BranchMode::Default => self.settings.floor_first,
            mode => mode,
        })
    }

    // ---------------------------------
    // basis
    // ---------------------------------

    /// Set the starting basis in the external encoding: `1 + rows`
    /// entries, or `1 + rows + columns` entries including the nonbasic
    /// variables.
    pub fn set_basis(&mut self, basis: &[i32]) -> Result<(), ModelError> {
        let basis = Basis::from_external(basis, self.rows(), self.columns())?;
        self.basis = Some(basis);
        Ok(())
    }

    /// Current basis in the external encoding.  Without a stored basis the
    /// default slack basis is returned.
    pub fn get_basis(&self, nonbasic: bool) -> Vec<i32> {
        match self.basis {
            Some(ref b) => b.to_external(nonbasic),
            None => Basis::slack(self.rows(), self.columns()).to_external(nonbasic),
        }
    }

    /// Reset to the default slack basis.
    pub fn default_basis(&mut self) {
        self.basis = None;
    }

    pub(crate) fn basis_or_slack(&self) -> Basis {
        self.basis
            .clone()
            .unwrap_or_else(|| Basis::slack(self.rows(), self.columns()))
    }

    // ---------------------------------
    // settings
    // ---------------------------------

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Mutable access to the settings.   They are validated when solving.
    pub fn settings_mut(&mut self) -> &mut SolverSettings {
        &mut self.settings
    }

    /// Replace the settings after validating them.
    pub fn set_settings(&mut self, settings: SolverSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    // ---------------------------------
    // callbacks
    // ---------------------------------

    pub fn set_abort_callback<F>(&mut self, f: F)
    where
        F: FnMut(&SolveProgress) -> bool + Send + 'static,
    {
        self.callbacks.set_abort_callback(f);
    }

    pub fn set_log_callback<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.callbacks.set_log_callback(f);
    }

    pub fn set_message_callback<F>(&mut self, mask: MsgMask, f: F)
    where
        F: FnMut(&SolveProgress, MsgMask) + Send + 'static,
    {
        self.callbacks.set_message_callback(mask, f);
    }

    pub fn set_node_selector<F>(&mut self, f: F)
    where
        F: FnMut(&[BranchCandidate]) -> Option<usize> + Send + 'static,
    {
        self.callbacks.set_node_selector(f);
    }

    pub fn set_branch_selector<F>(&mut self, f: F)
    where
        F: FnMut(usize) -> BranchMode + Send + 'static,
    {
        self.callbacks.set_branch_selector(f);
    }

    /// remove every stored callback
    pub fn unset_callbacks(&mut self) {
        self.callbacks.unset_all();
    }

    // ---------------------------------
    // results
    // ---------------------------------

    /// status of the last solve, `NotRun` if the model changed since
    pub fn status(&self) -> SolverStatus {
        self.solution.status
    }

    /// full report of the last solve
    pub fn solution(&self) -> &SolutionReport {
        &self.solution
    }

    pub fn get_objective(&self) -> f64 {
        self.solution.objective
    }

    /// best bound on the objective, equal to the objective once optimal
    pub fn get_working_objective(&self) -> f64 {
        self.solution.best_bound
    }

    pub fn get_variables(&self) -> &[f64] {
        &self.solution.variables
    }

    pub fn get_constraints(&self) -> &[f64] {
        &self.solution.constraints
    }

    /// row dual values, available when requested through the presolve
    /// `DUALS` or `SENSDUALS` options
    pub fn get_duals(&self) -> Option<&[f64]> {
        self.solution.duals.as_deref()
    }

    pub fn get_reduced_costs(&self) -> Option<&[f64]> {
        self.solution.reduced_costs.as_deref()
    }

    /// ranging information, available when requested through the presolve
    /// `SENSDUALS` option
    pub fn get_sensitivity(&self) -> Option<&Sensitivity> {
        self.solution.sensitivity.as_ref()
    }

    pub fn get_total_iter(&self) -> u64 {
        self.solution.iterations
    }

    pub fn get_total_nodes(&self) -> u64 {
        self.solution.nodes
    }

    pub fn get_solution_count(&self) -> u32 {
        self.solution.solution_count
    }

    /// Index in the presolved problem of an original row (`1..=rows`) or
    /// column (`rows + j`), in the same combined numbering.   Returns 0 for
    /// removed rows and columns and for out of range indices.
    pub fn get_lp_index(&self, orig_index: usize) -> usize {
        let m = self.rows();
        match self.solution.presolve_map {
            None if orig_index >= 1 && orig_index <= m + self.columns() => orig_index,
            None => 0,
            Some(ref map) => {
                let kept_rows = map.kept_rows();
                if orig_index == 0 {
                    0
                } else if orig_index <= map.rows.len() {
                    map.rows[orig_index - 1]
                } else if orig_index <= map.rows.len() + map.columns.len() {
                    match map.columns[orig_index - map.rows.len() - 1] {
                        0 => 0,
                        c => kept_rows + c,
                    }
                } else {
                    0
                }
            }
        }
    }

    /// Original index of a row or column of the presolved problem, in the
    /// combined numbering used by [`get_lp_index`](Model::get_lp_index).
    pub fn get_orig_index(&self, lp_index: usize) -> usize {
        match self.solution.presolve_map {
            None if lp_index >= 1 && lp_index <= self.rows() + self.columns() => lp_index,
            None => 0,
            Some(ref map) => {
                let kept_rows = map.kept_rows();
                if lp_index == 0 {
                    0
                } else if lp_index <= kept_rows {
                    map.rows
                        .iter()
                        .position(|&r| r == lp_index)
                        .map_or(0, |k| k + 1)
                } else {
                    map.columns
                        .iter()
                        .position(|&c| c == lp_index - kept_rows)
                        .map_or(0, |k| map.rows.len() + k + 1)
                }
            }
        }
    }

    // ---------------------------------
    // internal helpers
    // ---------------------------------

    pub(crate) fn check_row(&self, row: usize) -> Result<(), ModelError> {
        if row == 0 || row > self.rows() {
            Err(ModelError::RowIndex {
                index: row,
                rows: self.rows(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_row_or_objective(&self, row: usize) -> Result<(), ModelError> {
        if row > self.rows() {
            Err(ModelError::RowIndex {
                index: row,
                rows: self.rows(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_column(&self, col: usize) -> Result<(), ModelError> {
        if col == 0 || col > self.columns() {
            Err(ModelError::ColumnIndex {
                index: col,
                columns: self.columns(),
            })
        } else {
            Ok(())
        }
    }

    fn check_len(&self, found: usize, expected: usize) -> Result<(), ModelError> {
        if found != expected {
            Err(ModelError::DimensionMismatch { expected, found })
        } else {
            Ok(())
        }
    }

    /// forget the last solution after a data change
    pub(crate) fn invalidate(&mut self) {
        self.solution = SolutionReport::default();
    }

    /// forget the last solution and the stored basis after a change of
    /// dimensions
    pub(crate) fn invalidate_dims(&mut self) {
        self.invalidate();
        self.basis = None;
    }
}

impl ConfigurablePrintTarget for Model {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

#[test]
fn test_row_range_model() {
    let mut model = Model::new(1, 1).unwrap();
    assert_eq!(model.get_rh_range(1).unwrap(), (-1e30, 0.0));

    model.set_rh_range(1, -2.0, 4.0).unwrap();
    assert_eq!(model.get_constr_type(1).unwrap(), ConstraintType::Le);
    assert_eq!(model.get_rh_range(1).unwrap(), (-2.0, 4.0));
    assert_eq!(model.get_rh(1).unwrap(), 4.0);

    model.set_rh_range(1, 3.0, 3.0).unwrap();
    assert_eq!(model.get_constr_type(1).unwrap(), ConstraintType::Eq);

    model.set_rh_range(1, 1.0, 1e30).unwrap();
    assert_eq!(model.get_constr_type(1).unwrap(), ConstraintType::Ge);
    assert_eq!(model.get_rh_range(1).unwrap(), (1.0, 1e30));

    model.set_constr_type(1, ConstraintType::Le).unwrap();
    assert_eq!(model.get_rh_range(1).unwrap(), (-1e30, 1.0));

    model.set_rh(0, 2.5).unwrap();
    assert_eq!(model.get_rh(0).unwrap(), 2.5);
}

#[test]
fn test_names_and_priorities() {
    let mut model = Model::new(2, 3).unwrap();
    model.set_col_name(2, "y").unwrap();
    assert_eq!(model.get_col_name(1).unwrap(), "C1");
    assert_eq!(model.get_col_name(2).unwrap(), "y");
    assert_eq!(model.get_nameindex("y", false).unwrap(), 2);
    assert_eq!(model.get_nameindex("C3", false).unwrap(), 3);
    assert_eq!(model.get_nameindex("R2", true).unwrap(), 2);
    assert!(matches!(
        model.get_nameindex("C4", false),
        Err(ModelError::UnknownName(_))
    ));

    model.set_var_weights(&[3.0, 1.0, 2.0]).unwrap();
    assert_eq!(model.get_var_priority(2).unwrap(), 1);
    assert_eq!(model.get_var_priority(1).unwrap(), 3);

    assert_eq!(model.get_var_branch(1).unwrap(), BranchMode::Ceiling);
    model.set_var_branch(1, BranchMode::Floor).unwrap();
    assert_eq!(model.get_var_branch(1).unwrap(), BranchMode::Floor);
}
