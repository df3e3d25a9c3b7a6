use crate::solver::report::PresolveMap;

/// A column removed by presolve, in the order of removal.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PostOp {
    /// column fixed at `value`
    Fix { col: usize, value: f64 },
    /// column replaced by `constant + factor * x[partner]`
    Substitute {
        col: usize,
        partner: usize,
        constant: f64,
        factor: f64,
    },
}

/// Everything needed to map a solution of the reduced problem back to
/// the problem presolve started from.
#[derive(Debug, Clone)]
pub(crate) struct Postsolve {
    // vectors of length = original rows / columns.   Entries are false
    // for those removed before the solve
    pub keep_row: Vec<bool>,
    pub keep_col: Vec<bool>,

    // vectors of length = reduced rows / columns, mapping each back to
    // its original index
    pub row_index: Vec<usize>,
    pub col_index: Vec<usize>,

    // rows of the reduced problem are the original ones divided by this
    pub row_divisor: Vec<f64>,

    pub ops: Vec<PostOp>,
}

impl Postsolve {
    /// number of original rows and columns
    pub fn dims(&self) -> (usize, usize) {
        (self.keep_row.len(), self.keep_col.len())
    }

    pub fn count_reduced(&self) -> (usize, usize) {
        let (m, n) = self.dims();
        (m - self.row_index.len(), n - self.col_index.len())
    }

    /// Original column values from the reduced ones.
    pub fn primal(&self, reduced: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; self.keep_col.len()];
        for (&j, &v) in self.col_index.iter().zip(reduced) {
            x[j] = v;
        }
        for op in self.ops.iter().rev() {
            match *op {
                PostOp::Fix { col, value } => x[col] = value,
                PostOp::Substitute {
                    col,
                    partner,
                    constant,
                    factor,
                } => x[col] = constant + factor * x[partner],
            }
        }
        x
    }

    /// Original row duals from the reduced ones.  Removed rows get 0.
    pub fn duals(&self, reduced: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.keep_row.len()];
        for (&i, &v) in self.row_index.iter().zip(reduced) {
            y[i] = v / self.row_divisor[i];
        }
        y
    }

    /// Spread per-row values of the reduced problem over the original
    /// rows, filling removed rows with `fill`.
    pub fn expand_rows(&self, reduced: &[f64], fill: f64) -> Vec<f64> {
        let mut out = vec![fill; self.keep_row.len()];
        for (&i, &v) in self.row_index.iter().zip(reduced) {
            out[i] = v;
        }
        out
    }

    /// As [`expand_rows`](Postsolve::expand_rows), for columns.
    pub fn expand_columns(&self, reduced: &[f64], fill: f64) -> Vec<f64> {
        let mut out = vec![fill; self.keep_col.len()];
        for (&j, &v) in self.col_index.iter().zip(reduced) {
            out[j] = v;
        }
        out
    }

    /// 1-based index maps for the solution report
    pub fn map(&self) -> PresolveMap {
        PresolveMap {
            rows: one_based(&self.keep_row),
            columns: one_based(&self.keep_col),
        }
    }
}

fn one_based(keep: &[bool]) -> Vec<usize> {
    let mut next = 0;
    keep.iter()
        .map(|&k| {
            if k {
                next += 1;
                next
            } else {
                0
            }
        })
        .collect()
}

#[test]
fn test_postsolve_reconstruction() {
    // columns 0 and 2 removed: x2 fixed at 4, then x0 = 1 + 2 x1
    let post = Postsolve {
        keep_row: vec![false, true],
        keep_col: vec![false, true, false],
        row_index: vec![1],
        col_index: vec![1],
        row_divisor: vec![1.0, 2.0],
        ops: vec![
            PostOp::Fix { col: 2, value: 4.0 },
            PostOp::Substitute {
                col: 0,
                partner: 1,
                constant: 1.0,
                factor: 2.0,
            },
        ],
    };
    assert_eq!(post.primal(&[3.0]), vec![7.0, 3.0, 4.0]);
    assert_eq!(post.duals(&[5.0]), vec![0.0, 2.5]);
    assert_eq!(post.count_reduced(), (1, 2));
    let map = post.map();
    assert_eq!(map.rows, vec![0, 1]);
    assert_eq!(map.columns, vec![0, 1, 0]);
}
