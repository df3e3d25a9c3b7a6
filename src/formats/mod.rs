//! Text formats for models and solver state: the LP model format, the
//! parameter (ini) file and the MPS style basis file.
//!
//! Every format is reachable through methods on [`Model`](crate::solver::Model):
//!
//! ```no_run
//! use lpsolve::solver::*;
//!
//! let mut model = Model::read_lp("max: 3x + 2y; c1: x + y <= 4;".as_bytes()).unwrap();
//! model.read_params("settings.ini").unwrap();
//! model.solve();
//! model.write_basis("final.bas").unwrap();
//! ```

mod basis;
mod lp;
mod params;

pub use params::{read_settings, write_settings};

use crate::solver::core::SettingsError;
use crate::solver::model::ModelError;
use thiserror::Error;

/// Error type returned by the LP format reader
#[derive(Error, Debug)]
pub enum LpFormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: {source}")]
    Model { line: usize, source: ModelError },
}

/// Error type returned by the parameter file reader
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: unknown parameter \"{key}\"")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: bad value \"{value}\" for parameter \"{key}\"")]
    BadValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("section [{0}] not found")]
    MissingSection(String),
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Error type returned by the basis file reader
#[derive(Error, Debug)]
pub enum BasisFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: {source}")]
    Model { line: usize, source: ModelError },
}

// Shortest text that reads back as the same value.  Very large and very
// small magnitudes use exponent notation.
pub(crate) fn format_number(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-4..1e15).contains(&a) {
        format!("{:e}", v)
    } else {
        format!("{}", v)
    }
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(143.0), "143");
    assert_eq!(format_number(-2.5), "-2.5");
    assert_eq!(format_number(1e30), "1e30");
    assert_eq!(format_number(-1e30), "-1e30");
    assert_eq!(format_number(1.5e-7), "1.5e-7");
    assert_eq!(format_number(0.0), "0");
    let v = 0.1 + 0.2;
    assert_eq!(format_number(v).parse::<f64>().unwrap(), v);
}
