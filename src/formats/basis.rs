//! MPS style basis files.
//!
//! ```text
//! NAME          Unnamed Rows 3 Cols 2 Iters 2
//!  XU x R2
//!  XL y R3
//! ENDATA
//! ```
//!
//! `XU`/`XL` records make a column basic in place of a row that leaves the
//! basis at its upper/lower bound.   `UL`/`LL` records put a nonbasic
//! column or row at its upper/lower bound.   Variables that are not
//! mentioned keep the slack basis state: rows basic, columns at their
//! lower bound.

use super::BasisFileError;
use crate::solver::model::{Basis, Model};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

impl Model {
    /// Read a starting basis from file `path`.   On failure the stored
    /// basis is left unchanged.
    pub fn read_basis<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BasisFileError> {
        let file = File::open(path)?;
        self.read_basis_from(BufReader::new(file))
    }

    /// Write the stored basis, or the slack basis if there is none, to
    /// file `path`.
    pub fn write_basis<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_basis_to(&mut out)
    }

    pub(crate) fn read_basis_from<R: BufRead>(&mut self, reader: R) -> Result<(), BasisFileError> {
        let basis = BasisReader::new(self).read(reader)?;
        self.basis = Some(basis);
        Ok(())
    }

    pub(crate) fn write_basis_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let basis = self.basis_or_slack();
        let (m, n) = (self.rows(), self.columns());
        let basic = basis.basic_flags();

        writeln!(
            out,
            "NAME          {} Rows {} Cols {} Iters {}",
            self.get_lp_name(),
            m,
            n,
            self.solution.iterations
        )?;

        // every basic column takes the place of a nonbasic row
        let columns = (0..n).filter(|&j| basic[j]);
        let rows = (0..m).filter(|&i| !basic[n + i]);
        for (j, i) in columns.zip(rows) {
            let kind = if basis.at_upper[n + i] { "XU" } else { "XL" };
            writeln!(out, " {} {} {}", kind, self.col_name(j), self.row_name(i))?;
        }

        for var in (0..n + m).filter(|&v| !basic[v] && basis.at_upper[v]) {
            let name = if var < n {
                self.col_name(var)
            } else {
                self.row_name(var - n)
            };
            writeln!(out, " UL {}", name)?;
        }
        writeln!(out, "ENDATA")?;
        out.flush()
    }
}

struct BasisReader<'a> {
    model: &'a Model,
    basic: Vec<bool>,
    at_upper: Vec<bool>,
    line: usize,
}

impl<'a> BasisReader<'a> {
    fn new(model: &'a Model) -> Self {
        let (m, n) = (model.rows(), model.columns());
        let slack = Basis::slack(m, n);
        Self {
            model,
            basic: slack.basic_flags(),
            at_upper: slack.at_upper,
            line: 0,
        }
    }

    fn syntax(&self, message: impl Into<String>) -> BasisFileError {
        BasisFileError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn column(&self, name: &str) -> Result<usize, BasisFileError> {
        self.model
            .get_nameindex(name, false)
            .map(|j| j - 1)
            .map_err(|source| BasisFileError::Model {
                line: self.line,
                source,
            })
    }

    fn row(&self, name: &str) -> Result<usize, BasisFileError> {
        self.model
            .get_nameindex(name, true)
            .map(|i| self.model.columns() + i - 1)
            .map_err(|source| BasisFileError::Model {
                line: self.line,
                source,
            })
    }

    // a column name, or a row name if no column has it
    fn variable(&self, name: &str) -> Result<usize, BasisFileError> {
        self.column(name).or_else(|_| self.row(name))
    }

    fn check_header(&self, fields: &[&str]) -> Result<(), BasisFileError> {
        let (m, n) = (self.model.rows(), self.model.columns());
        for pair in fields.windows(2) {
            let expected = match pair[0] {
                "Rows" => m,
                "Cols" => n,
                _ => continue,
            };
            if pair[1].parse::<usize>().ok() != Some(expected) {
                return Err(self.syntax(format!(
                    "basis is for a model with {} {}, not {}",
                    pair[1], pair[0], expected
                )));
            }
        }
        Ok(())
    }

    fn read<R: BufRead>(mut self, reader: R) -> Result<Basis, BasisFileError> {
        let mut ended = false;
        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            self.line = k + 1;
            if line.trim().is_empty() || line.starts_with('*') {
                continue;
            }
            if ended {
                return Err(self.syntax("data after ENDATA"));
            }
            let fields: Vec<&str> = line.split_whitespace().collect();

            match fields[0] {
                "NAME" => self.check_header(&fields)?,
                "ENDATA" => ended = true,
                "XU" | "XL" => {
                    let [_, col, row] = fields[..] else {
                        return Err(self.syntax("expected a column and a row name"));
                    };
                    let (col, row) = (self.column(col)?, self.row(row)?);
                    if self.basic[col] || !self.basic[row] {
                        return Err(self.syntax("column is already basic or row is not"));
                    }
                    self.basic[col] = true;
                    self.basic[row] = false;
                    self.at_upper[row] = fields[0] == "XU";
                }
                "UL" | "LL" => {
                    let [_, name] = fields[..] else {
                        return Err(self.syntax("expected a single name"));
                    };
                    let var = self.variable(name)?;
                    if self.basic[var] {
                        return Err(self.syntax(format!("{} is basic", name)));
                    }
                    self.at_upper[var] = fields[0] == "UL";
                }
                other => return Err(self.syntax(format!("unknown record \"{}\"", other))),
            }
        }
        if !ended {
            return Err(self.syntax("missing ENDATA"));
        }

        let head: Vec<usize> = (0..self.basic.len()).filter(|&v| self.basic[v]).collect();
        if head.len() != self.model.rows() {
            return Err(self.syntax("number of basic variables differs from the number of rows"));
        }
        Ok(Basis {
            head,
            at_upper: self.at_upper,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::formats::BasisFileError;
    use crate::io::ConfigurablePrintTarget;
    use crate::solver::*;

    fn model() -> Model {
        let mut model = Model::new(0, 2).unwrap();
        model.set_maxim();
        model.set_obj_fn(&[143., 60.]).unwrap();
        model.add_constraint(&[120., 210.], ConstraintType::Le, 15000.).unwrap();
        model.add_constraint(&[110., 30.], ConstraintType::Le, 4000.).unwrap();
        model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
        model.set_col_name(1, "x").unwrap();
        model.set_col_name(2, "y").unwrap();
        model.print_to_sink();
        model
    }

    #[test]
    fn test_slack_basis_text() {
        let model = model();
        let mut out = Vec::new();
        model.write_basis_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "NAME          Unnamed Rows 3 Cols 2 Iters 0\nENDATA\n");
    }

    #[test]
    fn test_warm_start_from_file() {
        let mut solved = model();
        assert_eq!(solved.solve(), SolverStatus::Optimal);
        assert!(solved.get_total_iter() > 0);

        let mut out = Vec::new();
        solved.write_basis_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with(" X")).count(), 2);

        let mut fresh = model();
        fresh.read_basis_from(text.as_bytes()).unwrap();
        assert_eq!(fresh.get_basis(true).len(), 1 + 3 + 2);
        assert_eq!(fresh.solve(), SolverStatus::Optimal);
        assert_eq!(fresh.get_total_iter(), 0);
        assert!((fresh.get_objective() - 6315.625).abs() < 1e-6);
    }

    #[test]
    fn test_basis_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bas");

        let mut solved = model();
        solved.solve();
        solved.write_basis(&path).unwrap();

        let mut fresh = model();
        fresh.read_basis(&path).unwrap();
        // same basic variables, same nonbasic bound states
        let (a, b) = (fresh.get_basis(true), solved.get_basis(true));
        let basic = |list: &[i32]| {
            let mut v: Vec<i32> = list[1..4].iter().map(|c| c.abs()).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(basic(&a), basic(&b));
        assert_eq!(a[4..], b[4..]);
    }

    #[test]
    fn test_bad_basis_files() {
        let mut model = model();
        let before = model.get_basis(true);

        let err = model.read_basis_from(" XU x R1\n XL x R2\nENDATA\n".as_bytes());
        assert!(matches!(err, Err(BasisFileError::Syntax { line: 2, .. })));

        let err = model.read_basis_from(" XU z R1\nENDATA\n".as_bytes());
        assert!(matches!(err, Err(BasisFileError::Model { line: 1, .. })));

        let err = model.read_basis_from("NAME m Rows 4 Cols 2\nENDATA\n".as_bytes());
        assert!(matches!(err, Err(BasisFileError::Syntax { line: 1, .. })));

        let err = model.read_basis_from(" UL R1\n".as_bytes());
        assert!(matches!(err, Err(BasisFileError::Syntax { .. })));

        assert_eq!(model.get_basis(true), before);

        model.read_basis_from(" UL y\n LL x\nENDATA\n".as_bytes()).unwrap();
        assert_eq!(model.get_basis(true), vec![0, -1, -2, -3, -4, 5]);
    }
}
