use thiserror::Error;

/// Structural defects found by [`CscMatrix::check_format`](crate::algebra::CscMatrix::check_format).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SparseFormatError {
    #[error("column pointer length or final entry does not match the stored nonzeros")]
    IncompatibleDimension,
    #[error("column pointers are not monotone")]
    BadColptr,
    #[error("row indices within a column are unsorted or repeated")]
    BadRowOrdering,
    #[error("row index {0} is outside the matrix")]
    BadRowval(usize),
}
