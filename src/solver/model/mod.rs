//! The user facing model: sparse constraint storage, row and column
//! attributes, special ordered sets, warm start bases and the solve
//! pipeline that connects presolve, scaling, simplex and branch-and-bound.

mod basis;
mod error;
mod matrix;
#[allow(clippy::module_inception)]
mod model;
mod problemdata;
mod solve;
mod sos;

#[cfg(feature = "serde")]
mod json;

pub(crate) use basis::Basis;
pub use error::ModelError;
pub use matrix::SparseMatrix;
pub use model::Model;
pub(crate) use model::{ColData, RowData};
pub(crate) use problemdata::ProblemData;
pub use sos::SosSet;
