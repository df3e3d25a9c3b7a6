use thiserror::Error;

/// Error type returned by structural model operations.
///
/// A failing call leaves the model unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("row index {index} out of range (model has {rows} rows)")]
    RowIndex { index: usize, rows: usize },
    #[error("column index {index} out of range (model has {columns} columns)")]
    ColumnIndex { index: usize, columns: usize },
    #[error("operation not allowed: {0}")]
    InvalidState(&'static str),
    #[error("invalid SOS definition: {0}")]
    InvalidSos(String),
    #[error("expected {expected} values, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("could not reserve storage for the model")]
    Allocation,
    #[error("no row or column named \"{0}\"")]
    UnknownName(String),
}
