use super::options::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Solver configuration.   Every model owns its own copy, so there are
/// no process wide tolerances or infinity values.
///
/// Settings are most conveniently created with the builder:
///
/// ```no_run
/// use lpsolve::solver::*;
/// let settings = SolverSettingsBuilder::default()
///     .timeout(10)
///     .presolve(PresolveModes::ROWS | PresolveModes::COLS)
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverSettings {
    ///print level
    #[builder(default = "Verbosity::Critical")]
    pub verbose: Verbosity,

    ///maximum run time in seconds (0 = no limit)
    #[builder(default = "0")]
    pub timeout: u64,

    ///magnitude at and beyond which values are treated as infinite
    #[builder(default = "1e30")]
    pub infinity: f64,

    ///values smaller than this in magnitude are rounded to zero
    #[builder(default = "1e-12")]
    pub epsilon_value: f64,

    ///primal feasibility tolerance on bounds and right hand sides
    #[builder(default = "1e-10")]
    pub epsilon_primal: f64,

    ///dual feasibility tolerance on reduced costs
    #[builder(default = "1e-9")]
    pub epsilon_dual: f64,

    ///smallest pivot element accepted by the ratio tests
    #[builder(default = "2e-7")]
    pub epsilon_pivot: f64,

    ///tolerance for deciding that a value is integer
    #[builder(default = "1e-7")]
    pub epsilon_int: f64,

    ///magnitude of anti-degeneracy perturbations
    #[builder(default = "1e-5")]
    pub epsilon_perturb: f64,

    ///absolute branch-and-bound gap
    #[builder(default = "1e-11")]
    pub mip_gap_abs: f64,

    ///relative branch-and-bound gap
    #[builder(default = "1e-11")]
    pub mip_gap_rel: f64,

    ///largest relative residual accepted in the final solution
    #[builder(default = "5e-7")]
    pub break_numeric_accuracy: f64,

    ///number of basis updates between refactorizations
    #[builder(default = "250")]
    pub max_pivot: u32,

    ///simplex variants used for phases 1 and 2
    #[builder(default = "SimplexType::DualPrimal")]
    pub simplex_type: SimplexType,

    ///pricing rule
    #[builder(default = "PivotRule::Devex")]
    pub pivot_rule: PivotRule,

    ///pricing modifiers
    #[builder(default = "PivotModes::ADAPTIVE")]
    pub pivot_modes: PivotModes,

    ///improvement steps
    #[builder(default = "ImproveModes::DUALFEAS")]
    pub improve: ImproveModes,

    ///anti-degeneracy rules
    #[builder(default = "AntiDegenModes::STALLING")]
    pub anti_degen: AntiDegenModes,

    ///scaling algorithm
    #[builder(default = "ScaleAlgorithm::Geometric")]
    pub scale_algorithm: ScaleAlgorithm,

    ///scaling modifiers
    #[builder(default = "ScaleModes::EQUILIBRATE | ScaleModes::INTEGERS")]
    pub scale_modes: ScaleModes,

    ///scaling passes (integer part) and convergence tolerance (fractional part)
    #[builder(default = "5.0")]
    pub scale_limit: f64,

    ///presolve reductions and dual value requests
    #[builder(default = "PresolveModes::NONE")]
    pub presolve: PresolveModes,

    ///maximum presolve passes (-1 = until nothing changes)
    #[builder(default = "-1")]
    pub presolve_loops: i32,

    ///branch explored first
    #[builder(default = "BranchMode::Ceiling")]
    pub floor_first: BranchMode,

    ///branching variable selection
    #[builder(default = "NodeRule::FirstSelect")]
    pub node_rule: NodeRule,

    ///node selection modifiers
    #[builder(default = "NodeModes::empty()")]
    pub node_modes: NodeModes,

    ///branch-and-bound depth limit.  Negative values are relative to the
    ///number of integer, semi-continuous and SOS variables
    #[builder(default = "-50")]
    pub depth_limit: i32,

    ///number of equally good solutions to accept before the incumbent is kept
    #[builder(default = "1")]
    pub solution_limit: u32,

    ///stop at the first integer feasible solution
    #[builder(default = "false")]
    pub break_at_first: bool,

    ///stop once a solution at least this good is found
    #[builder(default = "None")]
    pub break_at_value: Option<f64>,

    ///do not look for solutions worse than this objective value
    #[builder(default = "None")]
    pub objective_bound: Option<f64>,

    ///seed for randomized pricing, node ordering and perturbations
    #[builder(default = "0x5eed")]
    pub seed: u64,
}

impl Default for SolverSettings {
    fn default() -> SolverSettings {
        SolverSettingsBuilder::default().build().unwrap()
    }
}

impl SolverSettings {
    /// Checks that the settings are valid.  Tolerances must be positive
    /// and finite, limits must be in range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_infinity(self.infinity)?;
        validate_tolerance("epsilon_value", self.epsilon_value)?;
        validate_tolerance("epsilon_primal", self.epsilon_primal)?;
        validate_tolerance("epsilon_dual", self.epsilon_dual)?;
        validate_tolerance("epsilon_pivot", self.epsilon_pivot)?;
        validate_tolerance("epsilon_int", self.epsilon_int)?;
        validate_tolerance("epsilon_perturb", self.epsilon_perturb)?;
        validate_tolerance("break_numeric_accuracy", self.break_numeric_accuracy)?;
        validate_gap("mip_gap_abs", self.mip_gap_abs)?;
        validate_gap("mip_gap_rel", self.mip_gap_rel)?;
        validate_max_pivot(self.max_pivot)?;
        validate_scale_limit(self.scale_limit)?;
        validate_solution_limit(self.solution_limit)?;
        Ok(())
    }

    /// true if dual values were requested for the solution report
    pub fn wants_duals(&self) -> bool {
        self.presolve
            .intersects(PresolveModes::DUALS | PresolveModes::SENSDUALS)
    }

    /// true if sensitivity ranges were requested for the solution report
    pub fn wants_sensitivity(&self) -> bool {
        self.presolve.contains(PresolveModes::SENSDUALS)
    }

    /// clamp a user value to ±infinity if it reaches the infinity sentinel
    pub(crate) fn to_internal(&self, v: f64) -> f64 {
        if v >= self.infinity {
            f64::INFINITY
        } else if v <= -self.infinity {
            f64::NEG_INFINITY
        } else {
            v
        }
    }

    /// map ±infinity back to the user visible sentinel
    pub(crate) fn to_external(&self, v: f64) -> f64 {
        if v == f64::INFINITY {
            self.infinity
        } else if v == f64::NEG_INFINITY {
            -self.infinity
        } else {
            v
        }
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SolverSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SolverSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl SolverSettingsBuilder {
    /// check the fields that have been set explicitly
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(v) = self.infinity {
            validate_infinity(v)?;
        }
        if let Some(v) = self.epsilon_pivot {
            validate_tolerance("epsilon_pivot", v)?;
        }
        if let Some(v) = self.epsilon_int {
            validate_tolerance("epsilon_int", v)?;
        }
        if let Some(v) = self.mip_gap_abs {
            validate_gap("mip_gap_abs", v)?;
        }
        if let Some(v) = self.mip_gap_rel {
            validate_gap("mip_gap_rel", v)?;
        }
        if let Some(v) = self.max_pivot {
            validate_max_pivot(v)?;
        }
        if let Some(v) = self.scale_limit {
            validate_scale_limit(v)?;
        }
        if let Some(v) = self.solution_limit {
            validate_solution_limit(v)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_infinity(v: f64) -> Result<(), SettingsError> {
    if v.is_finite() && v >= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("infinity"))
    }
}

fn validate_tolerance(field: &'static str, v: f64) -> Result<(), SettingsError> {
    if v.is_finite() && v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_gap(field: &'static str, v: f64) -> Result<(), SettingsError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_max_pivot(v: u32) -> Result<(), SettingsError> {
    if v >= 1 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("max_pivot"))
    }
}

fn validate_scale_limit(v: f64) -> Result<(), SettingsError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("scale_limit"))
    }
}

fn validate_solution_limit(v: u32) -> Result<(), SettingsError> {
    if v >= 1 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("solution_limit"))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = SolverSettingsBuilder::default().build().unwrap();
    assert_eq!(settings.infinity, 1e30);
    assert_eq!(settings.max_pivot, 250);
    assert_eq!(settings.mip_gap_abs, 1e-11);
    assert_eq!(settings.floor_first, BranchMode::Ceiling);
    assert_eq!(settings.depth_limit, -50);

    // fail on bad values in the builder
    assert!(SolverSettingsBuilder::default()
        .epsilon_pivot(0.0)
        .build()
        .is_err());
    assert!(SolverSettingsBuilder::default()
        .infinity(f64::INFINITY)
        .build()
        .is_err());
    assert!(SolverSettingsBuilder::default()
        .solution_limit(0)
        .build()
        .is_err());

    // directly construct bad settings and manually check
    let settings = SolverSettings {
        max_pivot: 0,
        ..SolverSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("max_pivot"))
    );

    let settings = SolverSettings {
        mip_gap_rel: -1.0,
        ..SolverSettings::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_infinity_mapping() {
    let settings = SolverSettings::default();
    assert_eq!(settings.to_internal(1e30), f64::INFINITY);
    assert_eq!(settings.to_internal(-2e30), f64::NEG_INFINITY);
    assert_eq!(settings.to_internal(1e29), 1e29);
    assert_eq!(settings.to_external(f64::NEG_INFINITY), -1e30);
    assert!(!settings.wants_duals());

    let settings = SolverSettings {
        presolve: PresolveModes::SENSDUALS,
        ..SolverSettings::default()
    };
    assert!(settings.wants_duals());
    assert!(settings.wants_sensitivity());
}
