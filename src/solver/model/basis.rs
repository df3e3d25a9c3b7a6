use super::ModelError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simplex basis over the `n` structural columns followed by the `m` row
/// logicals.  Variable `j < n` is column `j`, variable `n + i` is the
/// activity of row `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub(crate) struct Basis {
    /// basic variable at each of the `m` basis positions
    pub head: Vec<usize>,
    /// nonbasic variables sitting at their upper bound
    pub at_upper: Vec<bool>,
}

impl Basis {
    /// every row logical basic, every column at its lower bound
    pub fn slack(m: usize, n: usize) -> Self {
        Self {
            head: (n..n + m).collect(),
            at_upper: vec![false; n + m],
        }
    }

    pub fn m(&self) -> usize {
        self.head.len()
    }

    pub fn n(&self) -> usize {
        self.at_upper.len() - self.head.len()
    }

    /// basic flag for every variable
    pub fn basic_flags(&self) -> Vec<bool> {
        let mut flags = vec![false; self.at_upper.len()];
        for &j in self.head.iter() {
            flags[j] = true;
        }
        flags
    }

    /// Encode in the external form: element 0 unused, then the `m`
    /// basic variables and optionally the `n` nonbasic ones.  Magnitudes
    /// `1..=m` are row logicals, `m + j` is column `j`; negative entries
    /// are at their lower bound.
    pub fn to_external(&self, nonbasic: bool) -> Vec<i32> {
        let (m, n) = (self.m(), self.n());
        let encode = |var: usize| {
            let index = (if var < n { m + var + 1 } else { var - n + 1 }) as i32;
            if self.at_upper[var] {
                index
            } else {
                -index
            }
        };

        let mut list = Vec::with_capacity(1 + m + n);
        list.push(0);
        list.extend(self.head.iter().map(|&v| encode(v)));
        if nonbasic {
            let basic = self.basic_flags();
            list.extend((0..n + m).filter(|&v| !basic[v]).map(encode));
        }
        list
    }

    /// Decode the external form for a model with `m` rows and `n` columns.
    pub fn from_external(list: &[i32], m: usize, n: usize) -> Result<Self, ModelError> {
        if list.len() != 1 + m && list.len() != 1 + m + n {
            return Err(ModelError::DimensionMismatch {
                expected: 1 + m + n,
                found: list.len(),
            });
        }
        let decode = |code: i32| -> Result<(usize, bool), ModelError> {
            let mag = code.unsigned_abs() as usize;
            if mag == 0 || mag > m + n {
                return Err(ModelError::InvalidState("basis entry out of range"));
            }
            let var = if mag <= m { n + mag - 1 } else { mag - m - 1 };
            Ok((var, code > 0))
        };

        let mut basis = Basis {
            head: Vec::with_capacity(m),
            at_upper: vec![false; n + m],
        };
        let mut seen = vec![false; n + m];
        for (k, &code) in list.iter().enumerate().skip(1) {
            let (var, upper) = decode(code)?;
            if seen[var] {
                return Err(ModelError::InvalidState("basis lists a variable twice"));
            }
            seen[var] = true;
            if k <= m {
                basis.head.push(var);
            } else {
                basis.at_upper[var] = upper;
            }
        }
        Ok(basis)
    }
}

#[test]
fn test_basis_encoding() {
    // 2 rows, 3 columns: column 2 and row 1 basic, column 3 at upper
    let basis = Basis {
        head: vec![1, 3],
        at_upper: vec![false, false, true, false, false],
    };
    let short = basis.to_external(false);
    assert_eq!(short, vec![0, -4, -1]);
    let full = basis.to_external(true);
    assert_eq!(full, vec![0, -4, -1, -3, 5, -2]);

    let back = Basis::from_external(&full, 2, 3).unwrap();
    assert_eq!(back, basis);

    let partial = Basis::from_external(&short, 2, 3).unwrap();
    assert_eq!(partial.head, basis.head);
    assert!(partial.at_upper.iter().all(|u| !u));

    assert!(Basis::from_external(&[0, -1], 2, 3).is_err());
    assert!(Basis::from_external(&[0, -1, -1], 2, 3).is_err());
    assert!(Basis::from_external(&[0, -1, 9], 2, 3).is_err());
    assert_eq!(Basis::slack(2, 3).to_external(false), vec![0, -1, -2]);
}
