use crate::algebra::CscMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constraint matrix and objective row of a model.
///
/// Constraint coefficients are stored column by column as `(row, value)`
/// pairs sorted by row, with 0-based row indices.   The objective is kept
/// as a dense vector with one entry per column.   Only nonzero
/// coefficients are ever stored.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparseMatrix {
    m: usize,
    columns: Vec<Vec<(usize, f64)>>,
    objective: Vec<f64>,
}

impl SparseMatrix {
    /// zero matrix with `m` constraint rows and `n` columns
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            m,
            columns: vec![Vec::new(); n],
            objective: vec![0.0; n],
        }
    }

    /// Like [`new`](SparseMatrix::new), but fails instead of aborting
    /// when storage can not be reserved.
    pub fn try_new(m: usize, n: usize) -> Option<Self> {
        let mut columns = Vec::new();
        columns.try_reserve_exact(n).ok()?;
        columns.resize_with(n, Vec::new);
        let mut objective = Vec::new();
        objective.try_reserve_exact(n).ok()?;
        objective.resize(n, 0.0);
        Some(Self {
            m,
            columns,
            objective,
        })
    }

    pub fn rows(&self) -> usize {
        self.m
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// number of stored constraint coefficients (the objective is not counted)
    pub fn nonzeros(&self) -> usize {
        self.columns.iter().map(|c| c.len()).sum()
    }

    /// reserve space for `additional` more columns
    pub fn try_reserve_columns(&mut self, additional: usize) -> Option<()> {
        self.columns.try_reserve(additional).ok()?;
        self.objective.try_reserve(additional).ok()
    }

    /// append an empty constraint row and set its coefficients from
    /// `(column, value)` pairs.  Later duplicates overwrite earlier ones.
    pub fn append_row(&mut self, entries: &[(usize, f64)]) {
        let row = self.m;
        self.m += 1;
        for &(col, val) in entries {
            self.set(row, col, val);
        }
    }

    /// append a column with objective coefficient `obj` and constraint
    /// coefficients given as `(row, value)` pairs
    pub fn append_column(&mut self, obj: f64, entries: &[(usize, f64)]) {
        self.columns.push(Vec::new());
        self.objective.push(obj);
        let col = self.columns.len() - 1;
        for &(row, val) in entries {
            self.set(row, col, val);
        }
    }

    /// remove constraint row `row`; rows below it move up by one
    pub fn delete_row(&mut self, row: usize) {
        for col in self.columns.iter_mut() {
            col.retain(|&(r, _)| r != row);
            for entry in col.iter_mut().filter(|(r, _)| *r > row) {
                entry.0 -= 1;
            }
        }
        self.m -= 1;
    }

    /// remove column `col`; columns to its right move left by one
    pub fn delete_column(&mut self, col: usize) {
        self.columns.remove(col);
        self.objective.remove(col);
    }

    /// Set a constraint coefficient.  Setting zero removes the entry.
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        let column = &mut self.columns[col];
        match column.binary_search_by_key(&row, |&(r, _)| r) {
            Ok(k) if val == 0.0 => {
                column.remove(k);
            }
            Ok(k) => column[k].1 = val,
            Err(_) if val == 0.0 => {}
            Err(k) => column.insert(k, (row, val)),
        }
    }

    /// constraint coefficient at `(row, col)`, zero if not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let column = &self.columns[col];
        match column.binary_search_by_key(&row, |&(r, _)| r) {
            Ok(k) => column[k].1,
            Err(_) => 0.0,
        }
    }

    /// true if a coefficient is stored at `(row, col)`
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.columns[col]
            .binary_search_by_key(&row, |&(r, _)| r)
            .is_ok()
    }

    pub fn set_objective(&mut self, col: usize, val: f64) {
        self.objective[col] = val;
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// `(row, value)` pairs of column `col`
    pub fn column(&self, col: usize) -> &[(usize, f64)] {
        &self.columns[col]
    }

    /// `(column, value)` pairs of constraint row `row`
    pub fn row(&self, row: usize) -> Vec<(usize, f64)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(j, col)| {
                col.binary_search_by_key(&row, |&(r, _)| r)
                    .ok()
                    .map(|k| (j, col[k].1))
            })
            .collect()
    }

    /// constraint rows in compressed sparse column form
    pub fn to_csc(&self) -> CscMatrix<f64> {
        CscMatrix::from_columns(self.m, &self.columns)
    }
}

#[test]
fn test_sparse_matrix_edit() {
    let mut a = SparseMatrix::new(2, 2);
    a.set(1, 0, 3.0);
    a.set(0, 0, 1.0);
    a.set(0, 1, 2.0);
    assert_eq!(a.column(0), &[(0, 1.0), (1, 3.0)]);
    assert_eq!(a.nonzeros(), 3);

    a.set(0, 0, 0.0);
    assert!(!a.contains(0, 0));
    assert_eq!(a.get(0, 0), 0.0);

    a.append_row(&[(1, 5.0)]);
    assert_eq!(a.rows(), 3);
    assert_eq!(a.row(2), vec![(1, 5.0)]);

    a.delete_row(0);
    assert_eq!(a.rows(), 2);
    assert_eq!(a.get(0, 0), 3.0);
    assert_eq!(a.get(1, 1), 5.0);

    a.append_column(7.0, &[(0, 4.0)]);
    a.delete_column(0);
    assert_eq!(a.columns(), 2);
    assert_eq!(a.objective(), &[0.0, 7.0]);

    let csc = a.to_csc();
    assert!(csc.check_format().is_ok());
    assert_eq!(csc.get_entry((0, 1)), Some(4.0));
}
