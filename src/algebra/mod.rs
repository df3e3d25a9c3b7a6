//! Sparse matrix storage and the small set of vector kernels the
//! presolve, scaling and simplex layers share.
//!
//! Constraint data reaches the solver as a [`CscMatrix`] with the
//! objective row stripped off. Dense vectors are plain slices.

mod csc;
mod error_types;
mod floats;
mod math_traits;
mod vecmath;
pub use csc::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;

#[cfg(test)]
mod tests;
