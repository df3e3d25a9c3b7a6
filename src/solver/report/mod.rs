//! Results of a solve and the printers that present them.

pub(crate) mod info_print;
mod print;
mod solution;

pub use solution::{PresolveMap, Sensitivity, SolutionReport};
