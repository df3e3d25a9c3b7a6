use super::factor::BasisFactor;
use crate::algebra::*;
use crate::solver::core::PivotRule;
use enum_dispatch::*;

// smallest reference weight kept after an update
const MIN_WEIGHT: f64 = 1e-6;

// ---------------------------------------------------------
// read only access to the basis for weight updates
// ---------------------------------------------------------

/// The constraint matrix `[A | -I]` together with the current basis
/// factorization.
pub(crate) struct BasisView<'a> {
    pub a: &'a CscMatrix<f64>,
    pub factor: &'a BasisFactor,
}

impl BasisView<'_> {
    /// `a_jᵀ v` for structural or logical variable `j`
    pub fn column_dot(&self, j: usize, v: &[f64]) -> f64 {
        if j < self.a.n {
            self.a.col_dot(j, v)
        } else {
            -v[j - self.a.n]
        }
    }
}

/// scatter column `j` of `[A | -I]` into the zeroed slice `out`
pub(crate) fn scatter_column(a: &CscMatrix<f64>, j: usize, out: &mut [f64]) {
    if j < a.n {
        let (rows, vals) = a.col(j);
        for (&r, &v) in rows.iter().zip(vals) {
            out[r] = v;
        }
    } else {
        out[j - a.n] = -1.0;
    }
}

/// Data of one basis change handed to the pricing rules.  Everything
/// refers to the basis before the change.
pub(crate) struct PivotData<'a> {
    /// entering variable
    pub q: usize,
    /// leaving variable
    pub p: usize,
    /// leaving basis position
    pub r: usize,
    /// transformed entering column `B⁻¹ a_q`
    pub alpha_q: &'a [f64],
    /// pivot row `e_rᵀ B⁻¹ a_j` over the nonbasic variables
    pub row: &'a [(usize, f64)],
}

impl PivotData<'_> {
    pub fn pivot(&self) -> f64 {
        self.alpha_q[self.r]
    }
}

// ---------------------------------------------------------
// pricing rules
// ---------------------------------------------------------

#[enum_dispatch]
pub(crate) trait PricingRule {
    /// reset reference weights for `nvars` variables and `m` positions
    fn reset(&mut self, nvars: usize, m: usize);

    /// attractiveness of entering variable `j` with reduced cost `d`
    fn primal_score(&self, j: usize, d: f64) -> f64;

    /// attractiveness of leaving position `r` holding variable `var`
    /// with primal infeasibility `infeas`
    fn dual_score(&self, r: usize, var: usize, infeas: f64) -> f64;

    fn primal_update(&mut self, view: &BasisView<'_>, pivot: &PivotData<'_>);

    fn dual_update(&mut self, view: &BasisView<'_>, pivot: &PivotData<'_>);
}

#[enum_dispatch(PricingRule)]
#[derive(Debug, Clone)]
pub(crate) enum Pricer {
    FirstIndex(FirstIndexPricer),
    Dantzig(DantzigPricer),
    Devex(DevexPricer),
    SteepestEdge(SteepestEdgePricer),
}

impl Pricer {
    pub fn new(rule: PivotRule) -> Self {
        match rule {
            PivotRule::FirstIndex => FirstIndexPricer.into(),
            PivotRule::Dantzig => DantzigPricer.into(),
            PivotRule::Devex => DevexPricer::default().into(),
            PivotRule::SteepestEdge => SteepestEdgePricer::default().into(),
        }
    }

    /// true if primal weight updates use the pivot row
    pub fn needs_pivot_row(&self) -> bool {
        matches!(self, Pricer::Devex(_) | Pricer::SteepestEdge(_))
    }
}

// Bland's rule: the lowest index wins

#[derive(Debug, Clone, Default)]
pub(crate) struct FirstIndexPricer;

impl PricingRule for FirstIndexPricer {
    fn reset(&mut self, _nvars: usize, _m: usize) {}

    fn primal_score(&self, j: usize, _d: f64) -> f64 {
        -(j as f64)
    }

    fn dual_score(&self, _r: usize, var: usize, _infeas: f64) -> f64 {
        -(var as f64)
    }

    fn primal_update(&mut self, _view: &BasisView<'_>, _pivot: &PivotData<'_>) {}

    fn dual_update(&mut self, _view: &BasisView<'_>, _pivot: &PivotData<'_>) {}
}

// largest reduced cost / infeasibility

#[derive(Debug, Clone, Default)]
pub(crate) struct DantzigPricer;

impl PricingRule for DantzigPricer {
    fn reset(&mut self, _nvars: usize, _m: usize) {}

    fn primal_score(&self, _j: usize, d: f64) -> f64 {
        d.abs()
    }

    fn dual_score(&self, _r: usize, _var: usize, infeas: f64) -> f64 {
        infeas
    }

    fn primal_update(&mut self, _view: &BasisView<'_>, _pivot: &PivotData<'_>) {}

    fn dual_update(&mut self, _view: &BasisView<'_>, _pivot: &PivotData<'_>) {}
}

// Devex approximate reference weights

#[derive(Debug, Clone, Default)]
pub(crate) struct DevexPricer {
    primal: Vec<f64>,
    dual: Vec<f64>,
}

impl PricingRule for DevexPricer {
    fn reset(&mut self, nvars: usize, m: usize) {
        self.primal = vec![1.0; nvars];
        self.dual = vec![1.0; m];
    }

    fn primal_score(&self, j: usize, d: f64) -> f64 {
        d * d / self.primal[j]
    }

    fn dual_score(&self, r: usize, _var: usize, infeas: f64) -> f64 {
        infeas * infeas / self.dual[r]
    }

    fn primal_update(&mut self, _view: &BasisView<'_>, pivot: &PivotData<'_>) {
        let arq = pivot.pivot();
        let wq = self.primal[pivot.q];
        for &(j, arj) in pivot.row.iter() {
            let ratio = arj / arq;
            self.primal[j] = f64::max(self.primal[j], ratio * ratio * wq);
        }
        self.primal[pivot.p] = f64::max(wq / (arq * arq), 1.0);
    }

    fn dual_update(&mut self, _view: &BasisView<'_>, pivot: &PivotData<'_>) {
        let (r, arq) = (pivot.r, pivot.pivot());
        let wr = self.dual[r];
        for (i, &ai) in pivot.alpha_q.iter().enumerate() {
            if i != r && ai != 0.0 {
                let ratio = ai / arq;
                self.dual[i] = f64::max(self.dual[i], ratio * ratio * wr);
            }
        }
        self.dual[r] = f64::max(wr / (arq * arq), 1.0);
    }
}

// steepest edge weights, recurrences of Goldfarb-Reid (primal) and
// Forrest-Goldfarb (dual) started from unit weights

#[derive(Debug, Clone, Default)]
pub(crate) struct SteepestEdgePricer {
    primal: Vec<f64>,
    dual: Vec<f64>,
}

impl PricingRule for SteepestEdgePricer {
    fn reset(&mut self, nvars: usize, m: usize) {
        self.primal = vec![1.0; nvars];
        self.dual = vec![1.0; m];
    }

    fn primal_score(&self, j: usize, d: f64) -> f64 {
        d * d / self.primal[j]
    }

    fn dual_score(&self, r: usize, _var: usize, infeas: f64) -> f64 {
        infeas * infeas / self.dual[r]
    }

    fn primal_update(&mut self, view: &BasisView<'_>, pivot: &PivotData<'_>) {
        let arq = pivot.pivot();
        let gq = self.primal[pivot.q];

        // w = B⁻ᵀ α_q
        let mut w = pivot.alpha_q.to_vec();
        view.factor.btran(&mut w);

        for &(j, arj) in pivot.row.iter() {
            let ratio = arj / arq;
            let g = self.primal[j] - 2.0 * ratio * view.column_dot(j, &w) + ratio * ratio * gq;
            self.primal[j] = f64::max(g, 1.0 + ratio * ratio);
        }
        self.primal[pivot.p] = f64::max(gq / (arq * arq), 1.0);
    }

    fn dual_update(&mut self, view: &BasisView<'_>, pivot: &PivotData<'_>) {
        let (r, arq) = (pivot.r, pivot.pivot());
        let br = self.dual[r];

        // τ = B⁻¹ ρ_r with ρ_r = B⁻ᵀ e_r
        let m = pivot.alpha_q.len();
        let mut tau = vec![0.0; m];
        tau[r] = 1.0;
        view.factor.btran(&mut tau);
        view.factor.ftran(&mut tau);

        for (i, &ai) in pivot.alpha_q.iter().enumerate() {
            if i != r && ai != 0.0 {
                let ratio = ai / arq;
                let b = self.dual[i] - 2.0 * ratio * tau[i] + ratio * ratio * br;
                self.dual[i] = f64::max(b, MIN_WEIGHT);
            }
        }
        self.dual[r] = f64::max(br / (arq * arq), MIN_WEIGHT);
    }
}

#[test]
fn test_pricer_scores() {
    let mut devex = Pricer::new(PivotRule::Devex);
    devex.reset(4, 2);
    assert_eq!(devex.primal_score(1, -2.0), 4.0);
    assert_eq!(devex.dual_score(0, 3, 0.5), 0.25);

    let bland = Pricer::new(PivotRule::FirstIndex);
    assert!(bland.primal_score(1, -0.1) > bland.primal_score(2, -5.0));

    let dantzig = Pricer::new(PivotRule::Dantzig);
    assert!(dantzig.primal_score(1, -0.1) < dantzig.primal_score(2, -5.0));
}

#[test]
fn test_devex_update() {
    let a = CscMatrix::from_columns(2, &[vec![(0, 1.0), (1, 1.0)], vec![(0, 2.0)]]);
    let mut factor = BasisFactor::new(2);
    factor
        .factor(|k, col| col[k] = -1.0)
        .unwrap();
    let view = BasisView { a: &a, factor: &factor };

    let mut devex = Pricer::new(PivotRule::Devex);
    devex.reset(4, 2);
    // column 0 enters at position 0, logical 2 leaves
    let alpha_q = [-0.5, -1.0];
    let row = [(1, 4.0)];
    let pivot = PivotData {
        q: 0,
        p: 2,
        r: 0,
        alpha_q: &alpha_q,
        row: &row,
    };
    devex.primal_update(&view, &pivot);
    devex.dual_update(&view, &pivot);
    // (4 / -0.5)² = 64
    assert_eq!(devex.primal_score(1, 8.0), 1.0);
    assert_eq!(devex.primal_score(2, 2.0), 1.0);
    assert_eq!(devex.dual_score(1, 1, 2.0), 1.0);
}
