//! Nested wall-clock timers for the solve phases.

#[allow(clippy::module_inception)]
mod timers;
pub use timers::*;
