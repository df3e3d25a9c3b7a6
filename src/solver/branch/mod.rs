//! Branch-and-bound for integer, semi-continuous and SOS restrictions.

mod engine;
mod node;
mod select;

pub(crate) use engine::BranchAndBound;
