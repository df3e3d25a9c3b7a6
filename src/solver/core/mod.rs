// package together all of the following and re-export
// in a partially flattened structure :
// : termination status
// : option sets and enumerated settings
// : user settings
// : user callbacks and the per-solve context

pub mod callbacks;
pub(crate) mod context;

//partially flatten top level pieces

mod options;
mod settings;
mod status;
pub use options::*;
pub use settings::*;
pub use status::*;
