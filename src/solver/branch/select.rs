use super::node::BranchRecord;
use crate::solver::core::{NodeModes, NodeRule};
use rand::rngs::StdRng;
use rand::Rng;

// smallest pseudo-cost used when forming products and ratios
const MIN_PSEUDO_COST: f64 = 1e-6;

/// A column whose relaxation value violates its integrality or
/// semi-continuity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fractional {
    pub col: usize,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fractional {
    /// fractional part of the value
    pub fn frac(&self) -> f64 {
        self.value - self.value.floor()
    }
}

/// Average objective degradation per unit of branching distance,
/// separately for down and up branches.
#[derive(Debug, Clone)]
pub(crate) struct PseudoCosts {
    down: Vec<(f64, u32)>,
    up: Vec<(f64, u32)>,
}

impl PseudoCosts {
    pub fn new(n: usize) -> Self {
        Self {
            down: vec![(0.0, 0); n],
            up: vec![(0.0, 0); n],
        }
    }

    /// record the degradation observed after a branch
    pub fn update(&mut self, branch: &BranchRecord, degradation: f64) {
        if branch.distance <= 0.0 {
            return;
        }
        let entry = if branch.up {
            &mut self.up[branch.col]
        } else {
            &mut self.down[branch.col]
        };
        entry.0 += degradation.max(0.0) / branch.distance;
        entry.1 += 1;
    }

    pub fn down(&self, col: usize) -> f64 {
        average(&self.down, col)
    }

    pub fn up(&self, col: usize) -> f64 {
        average(&self.up, col)
    }
}

// Mean of the recorded values of `col`.  Columns never branched on use
// the mean over all columns, or 1.
fn average(costs: &[(f64, u32)], col: usize) -> f64 {
    let (sum, count) = costs[col];
    if count > 0 {
        return sum / count as f64;
    }
    let (sum, count) = costs
        .iter()
        .filter(|(_, c)| *c > 0)
        .fold((0.0, 0), |(s, n), (v, c)| (s + v / *c as f64, n + 1));
    if count > 0 {
        sum / count as f64
    } else {
        1.0
    }
}

/// Pick the branching column among `candidates`, which are listed in
/// branching priority order.  Returns an index into `candidates`.
pub(crate) fn select_candidate(
    rule: NodeRule,
    modes: NodeModes,
    candidates: &[Fractional],
    pseudo: &PseudoCosts,
    rng: &mut StdRng,
) -> usize {
    if candidates.is_empty() {
        return 0;
    }
    let randomize = modes.contains(NodeModes::RANDOMIZE);

    let score = |c: &Fractional| -> Option<f64> {
        let f = c.frac();
        let (down, up) = (pseudo.down(c.col) * f, pseudo.up(c.col) * (1.0 - f));
        match rule {
            NodeRule::FirstSelect | NodeRule::UserSelect => None,
            NodeRule::GapSelect => {
                let gap = f64::min(c.value - c.lower, c.upper - c.value);
                Some(if gap.is_finite() { gap } else { f.min(1.0 - f) })
            }
            NodeRule::RangeSelect => {
                let range = c.upper - c.lower;
                Some(if range.is_finite() { range } else { f64::MAX })
            }
            NodeRule::FractionSelect => Some(f.min(1.0 - f)),
            NodeRule::PseudoCostSelect => {
                Some(down.max(MIN_PSEUDO_COST) * up.max(MIN_PSEUDO_COST))
            }
            NodeRule::PseudoNonIntSelect => Some((down + up) * f.min(1.0 - f)),
            NodeRule::PseudoRatioSelect => {
                let (pd, pu) = (pseudo.down(c.col), pseudo.up(c.col));
                Some(pd.max(pu) / pd.min(pu).max(MIN_PSEUDO_COST))
            }
        }
    };

    if score(&candidates[0]).is_none() {
        return if randomize {
            rng.random_range(0..candidates.len())
        } else {
            0
        };
    }

    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (k, c) in candidates.iter().enumerate() {
        let mut s = score(c).unwrap_or(0.0);
        if randomize {
            s *= 1.0 + 0.1 * rng.random::<f64>();
        }
        if s > best_score {
            best = k;
            best_score = s;
        }
    }
    best
}
