//! lpsolve solver main module.
//!
//! A problem is described by a [`Model`], solved with [`Model::solve`] and
//! inspected through the [`SolutionReport`] the solve leaves behind.
//! Internally a solve runs through the following stages:
//!
//! * presolve: optional reductions that remove rows and columns, recorded
//!   so the solution can be mapped back
//! * scaling: row and column scale factors
//! * simplex: the bounded primal and dual revised simplex
//! * branch-and-bound for integer, semi-continuous and SOS restrictions
//!
//! Everything needed by users is re-exported here.

// internal module structure
pub(crate) mod branch;
pub(crate) mod core;
pub(crate) mod model;
pub(crate) mod presolve;
pub(crate) mod report;
pub(crate) mod scaling;
pub(crate) mod simplex;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

//settings, option sets, status codes and callback types
pub use crate::solver::core::callbacks::{
    BranchCandidate, CandidateKind, SolveProgress, SolverCallbacks,
};
pub use crate::solver::core::{
    AntiDegenModes, BranchMode, ConstraintType, ImproveModes, MsgMask, NodeModes, NodeRule,
    PivotModes, PivotRule, PresolveModes, ScaleAlgorithm, ScaleModes, SettingsError, SimplexType,
    SolverSettings, SolverSettingsBuilder, SolverSettingsBuilderError, SolverStatus, Verbosity,
};

//the model and its results
pub use crate::solver::model::{Model, ModelError, SosSet, SparseMatrix};
pub use crate::solver::report::{PresolveMap, Sensitivity, SolutionReport};

//file format errors
pub use crate::formats::{BasisFileError, LpFormatError, ParamsError};
