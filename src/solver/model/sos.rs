use super::ModelError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A special ordered set: at most `sos_type` consecutive members (in
/// order of increasing weight) may be nonzero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SosSet {
    pub name: String,
    /// maximum number of consecutive nonzero members
    pub sos_type: usize,
    /// branching priority, lower values are branched on first
    pub priority: i32,
    /// 0-based member columns, ordered by weight
    pub(crate) columns: Vec<usize>,
    /// strictly increasing member weights
    pub(crate) weights: Vec<f64>,
}

impl SosSet {
    /// Build a set from 0-based `(column, weight)` pairs, sorting the
    /// members by weight.
    pub(crate) fn new(
        name: &str,
        sos_type: usize,
        priority: i32,
        members: &[(usize, f64)],
    ) -> Result<Self, ModelError> {
        if sos_type == 0 {
            return Err(ModelError::InvalidSos(format!(
                "set \"{}\" must have a type of at least 1",
                name
            )));
        }
        if members.is_empty() {
            return Err(ModelError::InvalidSos(format!(
                "set \"{}\" has no members",
                name
            )));
        }
        let mut sorted = members.to_vec();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

        if sorted.iter().any(|(_, w)| !w.is_finite()) {
            return Err(ModelError::InvalidSos(format!(
                "set \"{}\" has a non-finite weight",
                name
            )));
        }
        if sorted.windows(2).any(|w| w[0].1 == w[1].1) {
            return Err(ModelError::InvalidSos(format!(
                "set \"{}\" has duplicate weights",
                name
            )));
        }
        let columns: Vec<usize> = sorted.iter().map(|&(c, _)| c).collect();
        let weights = sorted.iter().map(|&(_, w)| w).collect();

        let mut unique = columns.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != columns.len() {
            return Err(ModelError::InvalidSos(format!(
                "set \"{}\" lists a column twice",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            sos_type,
            priority,
            columns,
            weights,
        })
    }

    /// member columns as 1-based `(column, weight)` pairs
    pub fn members(&self) -> Vec<(usize, f64)> {
        self.columns
            .iter()
            .zip(self.weights.iter())
            .map(|(&c, &w)| (c + 1, w))
            .collect()
    }

    pub(crate) fn contains(&self, col: usize) -> bool {
        self.columns.contains(&col)
    }

    /// Drop column `col` from the set and renumber the columns after it.
    /// Returns false if the set became empty.
    pub(crate) fn delete_column(&mut self, col: usize) -> bool {
        if let Some(k) = self.columns.iter().position(|&c| c == col) {
            self.columns.remove(k);
            self.weights.remove(k);
        }
        for c in self.columns.iter_mut().filter(|c| **c > col) {
            *c -= 1;
        }
        !self.columns.is_empty()
    }

    /// Positions (in weight order) of the first and last member whose value
    /// is nonzero, or `None` if every member is zero.
    pub(crate) fn nonzero_span(&self, x: &[f64], tol: f64) -> Option<(usize, usize)> {
        let first = self.columns.iter().position(|&c| x[c].abs() > tol)?;
        let last = self.columns.iter().rposition(|&c| x[c].abs() > tol)?;
        Some((first, last))
    }

    /// true if the nonzero members of `x` fit in a window of
    /// `sos_type` consecutive members
    pub(crate) fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        match self.nonzero_span(x, tol) {
            None => true,
            Some((first, last)) => last - first < self.sos_type,
        }
    }
}

#[test]
fn test_sos_construction() {
    let sos = SosSet::new("s1", 1, 1, &[(2, 3.0), (0, 1.0), (1, 2.0)]).unwrap();
    assert_eq!(sos.columns, vec![0, 1, 2]);
    assert_eq!(sos.members(), vec![(1, 1.0), (2, 2.0), (3, 3.0)]);

    assert!(SosSet::new("dup", 1, 1, &[(0, 1.0), (1, 1.0)]).is_err());
    assert!(SosSet::new("twice", 2, 1, &[(0, 1.0), (0, 2.0)]).is_err());
    assert!(SosSet::new("empty", 1, 1, &[]).is_err());
    assert!(SosSet::new("zero", 0, 1, &[(0, 1.0)]).is_err());

    let x = [0.0, 0.5, 0.5];
    assert!(!sos.is_satisfied(&x, 1e-9));
    let sos2 = SosSet::new("s2", 2, 1, &[(0, 1.0), (1, 2.0), (2, 3.0)]).unwrap();
    assert!(sos2.is_satisfied(&x, 1e-9));
    assert_eq!(sos2.nonzero_span(&x, 1e-9), Some((1, 2)));

    let mut sos3 = sos2.clone();
    assert!(sos3.delete_column(1));
    assert_eq!(sos3.columns, vec![0, 1]);
}
