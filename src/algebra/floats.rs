use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display};

/// Floating point type accepted by the sparse matrix and vector helpers.
///
/// The simplex engine is compiled for `f64` only. The bound is kept
/// generic so the matrix utilities can be tested on other widths.
pub trait FloatT:
    'static + Send + Float + NumAssign + Default + FromPrimitive + Display + Debug
{
}

impl<T> FloatT for T where
    T: 'static + Send + Float + NumAssign + Default + FromPrimitive + Display + Debug
{
}
