// ---------------------------------------------------------
// Basis factorization: dense LU with partial pivoting, followed by
// product form updates (one eta column per basis change).
// ---------------------------------------------------------

// pivots below this magnitude mark a basis column as dependent
const SINGULAR_TOL: f64 = 1e-11;

const NO_STEP: usize = usize::MAX;

// column of an elementary transformation replacing basis position `row`
#[derive(Debug, Clone)]
struct Eta {
    row: usize,
    pivot: f64,
    entries: Vec<(usize, f64)>,
}

/// Basis positions whose columns turned out dependent, and the rows
/// left without a pivot.  Both lists have the same length.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Singular {
    pub positions: Vec<usize>,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct BasisFactor {
    m: usize,
    // row-major elimination workspace: U above and L multipliers below
    // the pivots, addressed through the pivot sequence
    w: Vec<f64>,
    pivot_row: Vec<usize>,
    step_of_row: Vec<usize>,
    etas: Vec<Eta>,
}

impl BasisFactor {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            w: vec![0.0; m * m],
            pivot_row: vec![0; m],
            step_of_row: vec![NO_STEP; m],
            etas: Vec::new(),
        }
    }

    /// number of product form updates since the last factorization
    pub fn updates(&self) -> usize {
        self.etas.len()
    }

    /// Factor the basis matrix whose `k`-th column is written into the
    /// zeroed slice passed to `fill(k, column)`.
    pub fn factor<F>(&mut self, mut fill: F) -> Result<(), Singular>
    where
        F: FnMut(usize, &mut [f64]),
    {
        let m = self.m;
        self.etas.clear();
        self.w.fill(0.0);
        self.step_of_row.fill(NO_STEP);

        let mut column = vec![0.0; m];
        for k in 0..m {
            column.fill(0.0);
            fill(k, &mut column);
            for (i, &v) in column.iter().enumerate() {
                self.w[i * m + k] = v;
            }
        }

        let mut dependent = Vec::new();
        let mut step = 0;
        for k in 0..m {
            // pivot on the largest remaining entry of column k
            let mut best = NO_STEP;
            let mut best_val = SINGULAR_TOL;
            for i in 0..m {
                if self.step_of_row[i] == NO_STEP {
                    let v = self.w[i * m + k].abs();
                    if v > best_val {
                        best_val = v;
                        best = i;
                    }
                }
            }
            if best == NO_STEP {
                dependent.push(k);
                continue;
            }
            let p = best;
            self.pivot_row[k] = p;
            self.step_of_row[p] = k;
            step += 1;

            let piv = self.w[p * m + k];
            for i in 0..m {
                if self.step_of_row[i] != NO_STEP {
                    continue;
                }
                let l = self.w[i * m + k] / piv;
                self.w[i * m + k] = l;
                if l != 0.0 {
                    for j in k + 1..m {
                        self.w[i * m + j] -= l * self.w[p * m + j];
                    }
                }
            }
        }

        if step == m {
            Ok(())
        } else {
            let rows = (0..m)
                .filter(|&i| self.step_of_row[i] == NO_STEP)
                .collect();
            Err(Singular {
                positions: dependent,
                rows,
            })
        }
    }

    /// Solve `B x = b` in place.  On entry `b` is indexed by row, on exit
    /// by basis position.
    pub fn ftran(&self, b: &mut [f64]) {
        let m = self.m;
        let w = &self.w;

        // forward substitution through L
        for k in 0..m {
            let p = self.pivot_row[k];
            let bp = b[p];
            if bp == 0.0 {
                continue;
            }
            for i in 0..m {
                if self.step_of_row[i] > k {
                    b[i] -= w[i * m + k] * bp;
                }
            }
        }

        // back substitution through U
        let mut x = vec![0.0; m];
        for k in (0..m).rev() {
            let p = self.pivot_row[k];
            let mut s = b[p];
            for j in k + 1..m {
                s -= w[p * m + j] * x[j];
            }
            x[k] = s / w[p * m + k];
        }
        b.copy_from_slice(&x);

        for eta in self.etas.iter() {
            let xr = b[eta.row] / eta.pivot;
            b[eta.row] = xr;
            if xr != 0.0 {
                for &(i, a) in eta.entries.iter() {
                    b[i] -= a * xr;
                }
            }
        }
    }

    /// Solve `Bᵀ y = c` in place.  On entry `c` is indexed by basis
    /// position, on exit by row.
    pub fn btran(&self, c: &mut [f64]) {
        let m = self.m;
        let w = &self.w;

        for eta in self.etas.iter().rev() {
            let s: f64 = eta.entries.iter().map(|&(i, a)| a * c[i]).sum();
            c[eta.row] = (c[eta.row] - s) / eta.pivot;
        }

        // Uᵀ v = c, v indexed by step
        let mut v = vec![0.0; m];
        for j in 0..m {
            let mut s = c[j];
            for k in 0..j {
                s -= w[self.pivot_row[k] * m + j] * v[k];
            }
            v[j] = s / w[self.pivot_row[j] * m + j];
        }

        // Lᵀ z = v, z indexed by step
        for k in (0..m).rev() {
            let mut s = v[k];
            for s_step in k + 1..m {
                s -= w[self.pivot_row[s_step] * m + k] * v[s_step];
            }
            v[k] = s;
        }

        for k in 0..m {
            c[self.pivot_row[k]] = v[k];
        }
    }

    /// Record the replacement of basis position `row` by a column whose
    /// transformed form is `alpha = B⁻¹ a`.
    pub fn update(&mut self, row: usize, alpha: &[f64]) {
        let entries = alpha
            .iter()
            .enumerate()
            .filter(|&(i, &a)| i != row && a != 0.0)
            .map(|(i, &a)| (i, a))
            .collect();
        self.etas.push(Eta {
            row,
            pivot: alpha[row],
            entries,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(cols: &[[f64; 3]]) -> impl FnMut(usize, &mut [f64]) + '_ {
        move |k, col| col.copy_from_slice(&cols[k])
    }

    fn mul(cols: &[[f64; 3]], x: &[f64]) -> Vec<f64> {
        let mut b = vec![0.0; 3];
        for (k, c) in cols.iter().enumerate() {
            for i in 0..3 {
                b[i] += c[i] * x[k];
            }
        }
        b
    }

    #[test]
    fn test_lu_solves() {
        let cols = [[2.0, 4.0, -2.0], [1.0, -6.0, 7.0], [1.0, 0.0, 2.0]];
        let mut f = BasisFactor::new(3);
        f.factor(dense(&cols)).unwrap();

        let x = [1.0, -2.0, 3.0];
        let mut b = mul(&cols, &x);
        f.ftran(&mut b);
        for (u, v) in b.iter().zip(x) {
            assert!((u - v).abs() < 1e-12);
        }

        // yᵀ B = cᵀ
        let c = [1.0, 2.0, 3.0];
        let mut y = c.to_vec();
        f.btran(&mut y);
        for (k, col) in cols.iter().enumerate() {
            let dot: f64 = col.iter().zip(&y).map(|(a, b)| a * b).sum();
            assert!((dot - c[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_eta_update() {
        let mut cols = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mut f = BasisFactor::new(3);
        f.factor(dense(&cols)).unwrap();

        // replace position 1 by a new column
        let a = [3.0, 2.0, 1.0];
        let mut alpha = a.to_vec();
        f.ftran(&mut alpha);
        f.update(1, &alpha);
        cols[1] = a;
        assert_eq!(f.updates(), 1);

        let x = [1.0, 1.0, -1.0];
        let mut b = mul(&cols, &x);
        f.ftran(&mut b);
        for (u, v) in b.iter().zip(x) {
            assert!((u - v).abs() < 1e-12);
        }

        let c = [0.5, -1.0, 2.0];
        let mut y = c.to_vec();
        f.btran(&mut y);
        for (k, col) in cols.iter().enumerate() {
            let dot: f64 = col.iter().zip(&y).map(|(a, b)| a * b).sum();
            assert!((dot - c[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_singular_basis() {
        let cols = [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
        let mut f = BasisFactor::new(3);
        let err = f.factor(dense(&cols)).unwrap_err();
        assert_eq!(err.positions, vec![1]);
        assert_eq!(err.rows.len(), 1);
    }
}
