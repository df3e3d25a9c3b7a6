use super::{Basis, ColData, Model, RowData, SosSet, SparseMatrix};
use crate::solver::core::SolverSettings;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// The user supplied part of a model: no solution, callbacks or print
// target.

#[derive(Serialize, Deserialize)]
struct JsonModel {
    name: String,
    matrix: SparseMatrix,
    rows: Vec<RowData>,
    cols: Vec<ColData>,
    sos: Vec<SosSet>,
    maximize: bool,
    obj_const: f64,
    obj_name: Option<String>,
    settings: SolverSettings,
    basis: Option<Basis>,
}

impl Model {
    /// Write the model data, settings and stored basis to `file` as JSON.
    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = JsonModel {
            name: self.name.clone(),
            matrix: self.matrix.clone(),
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            sos: self.sos.clone(),
            maximize: self.maximize,
            obj_const: self.obj_const,
            obj_name: self.obj_name.clone(),
            settings: self.settings.clone(),
            basis: self.basis.clone(),
        };

        // sanitize values that can't be serialized, i.e. infs
        sanitize_bounds(&mut json_data);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// Read a model written by [`write_to_file`](Model::write_to_file).
    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonModel = serde_json::from_str(&buffer)?;

        // restore sanitized bounds to their original values
        desanitize_bounds(&mut json_data);

        let (m, n) = (json_data.rows.len(), json_data.cols.len());
        if json_data.matrix.rows() != m || json_data.matrix.columns() != n {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "matrix dimensions do not match the row and column data",
            ));
        }
        let basis = json_data
            .basis
            .filter(|b| b.m() == m && b.at_upper.len() == m + n);

        let mut model = Model::with_settings(0, 0, json_data.settings)
            .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "model allocation"))?;
        model.name = json_data.name;
        model.matrix = json_data.matrix;
        model.rows = json_data.rows;
        model.cols = json_data.cols;
        model.sos = json_data.sos;
        model.maximize = json_data.maximize;
        model.obj_const = json_data.obj_const;
        model.obj_name = json_data.obj_name;
        model.basis = basis;

        Ok(model)
    }
}

fn sanitize(v: &mut f64) {
    if *v == f64::INFINITY {
        *v = f64::MAX;
    } else if *v == f64::NEG_INFINITY {
        *v = f64::MIN;
    }
}

fn desanitize(v: &mut f64) {
    if *v == f64::MAX {
        *v = f64::INFINITY;
    } else if *v == f64::MIN {
        *v = f64::NEG_INFINITY;
    }
}

fn sanitize_bounds(data: &mut JsonModel) {
    for row in data.rows.iter_mut() {
        sanitize(&mut row.rhs);
        sanitize(&mut row.range);
    }
    for col in data.cols.iter_mut() {
        sanitize(&mut col.lower);
        sanitize(&mut col.upper);
    }
}

fn desanitize_bounds(data: &mut JsonModel) {
    for row in data.rows.iter_mut() {
        desanitize(&mut row.rhs);
        desanitize(&mut row.range);
    }
    for col in data.cols.iter_mut() {
        desanitize(&mut col.lower);
        desanitize(&mut col.upper);
    }
}

#[test]
fn test_json_io() {
    use crate::io::ConfigurablePrintTarget;
    use crate::solver::core::{ConstraintType, SolverStatus};
    use std::io::{Seek, SeekFrom};

    let mut model = Model::new(0, 2).unwrap();
    model.set_maxim();
    model.set_obj_fn(&[143., 60.]).unwrap();
    model
        .add_constraint(&[120., 210.], ConstraintType::Le, 15000.)
        .unwrap();
    model
        .add_constraint(&[110., 30.], ConstraintType::Le, 4000.)
        .unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
    model.set_lowbo(2, f64::NEG_INFINITY).unwrap();
    model.set_col_name(1, "x").unwrap();
    model.print_to_sink();
    model.solve();

    // write the model to a file
    let mut file = tempfile::tempfile().unwrap();
    model.write_to_file(&mut file).unwrap();

    // read the model from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut model2 = Model::read_from_file(&mut file).unwrap();
    assert_eq!(model2.get_lowbo(2).unwrap(), -1e30);
    assert_eq!(model2.get_upbo(1).unwrap(), 1e30);
    assert_eq!(model2.get_col_name(1).unwrap(), "x");

    model2.print_to_sink();
    assert_eq!(model2.solve(), SolverStatus::Optimal);
    for (a, b) in model.get_variables().iter().zip(model2.get_variables()) {
        assert!((a - b).abs() < 1e-9);
    }
    // the stored basis was optimal already
    assert_eq!(model2.get_total_iter(), 0);
}
