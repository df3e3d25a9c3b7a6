//! Bounded revised simplex method.
//!
//! The engine works on the scaled problem `[A | -I] (x, r) = 0` with
//! bounds on both the structural columns `x` and the row activities `r`.
//! Primal and dual variants share one basis factorization and one set of
//! pricing rules.

mod dual;
mod engine;
mod factor;
mod pricing;
mod primal;
mod sensitivity;

pub(crate) use engine::SimplexEngine;
pub(crate) use sensitivity::{DualInfo, Ranging};
