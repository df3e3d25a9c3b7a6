#![allow(non_snake_case)]

use crate::algebra::{FloatT, SparseFormatError};
use std::iter::zip;

/// Compressed sparse column matrix.
///
/// This is the read-only form of the constraint matrix handed to the
/// presolve, scaling and simplex layers. Row indices are 0-based and
/// sorted within each column; the objective row is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// start of each column in `rowval`/`nzval`, length `n + 1`
    pub colptr: Vec<usize>,
    pub rowval: Vec<usize>,
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// Wrap raw CSC arrays. Only the array lengths are checked here,
    /// use [`check_format`](Self::check_format) for the ordering.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// Assemble a matrix with `m` rows from `(row, value)` columns
    /// sorted by row. Explicit zeros are dropped.
    pub fn from_columns(m: usize, columns: &[Vec<(usize, T)>]) -> Self {
        let n = columns.len();
        let nnz = columns.iter().map(|c| c.len()).sum();
        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::with_capacity(nnz);
        let mut nzval = Vec::with_capacity(nnz);

        colptr.push(0);
        for col in columns {
            for &(r, v) in col.iter().filter(|(_, v)| *v != T::zero()) {
                rowval.push(r);
                nzval.push(v);
            }
            colptr.push(rowval.len());
        }
        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// Row indices and values of column `col`.
    pub fn col(&self, col: usize) -> (&[usize], &[T]) {
        let rng = self.colptr[col]..self.colptr[col + 1];
        (&self.rowval[rng.clone()], &self.nzval[rng])
    }

    /// Inner product of column `col` with a dense row vector `y`.
    pub fn col_dot(&self, col: usize, y: &[T]) -> T {
        let (rows, vals) = self.col(col);
        zip(rows, vals).fold(T::zero(), |acc, (&r, &v)| acc + v * y[r])
    }

    /// Entry at `(row, col)`: zero when not stored, `None` when out of range.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        if row >= self.m || col >= self.n {
            return None;
        }
        let (rows, vals) = self.col(col);
        Some(rows.binary_search(&row).map_or(T::zero(), |k| vals[k]))
    }

    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len()
            || self.colptr.len() != self.n + 1
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }
        for col in 0..self.n {
            let (rows, _) = self.col(col);
            if rows.windows(2).any(|r| r[0] >= r[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        match self.rowval.iter().find(|&&r| r >= self.m) {
            Some(&r) => Err(SparseFormatError::BadRowval(r)),
            None => Ok(()),
        }
    }
}

#[test]
fn test_csc_from_columns() {
    let cols = vec![vec![(0, 1.), (2, 0.)], vec![], vec![(1, -2.), (2, 3.)]];
    let A = CscMatrix::from_columns(3, &cols);
    assert!(A.check_format().is_ok());
    assert_eq!(A.nnz(), 3);
    assert_eq!(A.colptr, vec![0, 1, 1, 3]);
    assert_eq!(A.get_entry((2, 0)), Some(0.));
    assert_eq!(A.get_entry((1, 2)), Some(-2.));
    assert_eq!(A.get_entry((3, 2)), None);
    assert_eq!(A.col_dot(2, &[1., 1., 1.]), 1.);
}
