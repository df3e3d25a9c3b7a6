use lpsolve::{io::ConfigurablePrintTarget, solver::*};
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

fn print_test_model() -> Model {
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
    model.set_col_name(1, "x").unwrap();
    model.set_col_name(2, "y").unwrap();
    model.settings_mut().verbose = Verbosity::Normal;
    model
}

#[test]
fn test_print_to_buffer() {
    let mut model = print_test_model();
    model.print_to_buffer();
    model.solve();

    let text = model.get_print_buffer().unwrap();
    assert!(text.contains("lpsolve v"));

    model.print_to_buffer();
    model.print_objective().unwrap();
    model.print_solution(1).unwrap();
    model.print_constraints(1).unwrap();
    let text = model.get_print_buffer().unwrap();
    assert!(text.contains("Value of objective function: 6315.62500000"));
    assert!(text.contains("Actual values of the variables:"));
    assert!(text.lines().any(|l| l.starts_with("x") && l.ends_with("21.875")));
    assert!(text.lines().any(|l| l.starts_with("R3") && l.ends_with("75")));
}

#[test]
fn test_print_duals() {
    let mut model = print_test_model();
    model.settings_mut().verbose = Verbosity::Critical;
    model.print_to_buffer();

    // nothing to print before duals are requested
    model.solve();
    model.print_duals().unwrap();
    assert_eq!(model.get_print_buffer().unwrap(), "");

    model.settings_mut().presolve = PresolveModes::SENSDUALS;
    model.solve();
    model.print_duals().unwrap();
    let text = model.get_print_buffer().unwrap();
    assert!(text.contains("Dual value"));
    assert!(text.contains("Primal objective:"));
    assert!(text.lines().any(|l| l.starts_with("R3") && l.contains("28.875")));
}

#[test]
fn test_print_quiet() {
    let mut model = print_test_model();
    model.settings_mut().verbose = Verbosity::Neutral;
    model.print_to_buffer();
    model.solve();
    assert_eq!(model.get_print_buffer().unwrap(), "");
}

#[test]
fn test_print_to_file() {
    let mut model = print_test_model();
    let mut file = tempfile::tempfile().unwrap();
    model.print_to_file(file.try_clone().unwrap());
    model.solve();
    model.print_objective().unwrap();

    let mut text = String::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_string(&mut text).unwrap();
    assert!(text.contains("lpsolve v"));
    assert!(text.contains("Value of objective function"));

    // no buffer when printing to a file
    assert!(model.get_print_buffer().is_err());
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_print_to_stream() {
    let mut model = print_test_model();
    let buffer = SharedBuffer::default();
    model.print_to_stream(Box::new(buffer.clone()));
    model.solve();

    let bytes = buffer.0.lock().unwrap().clone();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("lpsolve v"));
}

#[test]
fn test_print_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    let mut model = print_test_model();
    model.print_to_path(&path).unwrap();
    model.solve();
    model.print_objective().unwrap();
    model.print_to_sink();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Value of objective function: 6315.62500000"));

    // an empty path discards output
    model.print_to_path("").unwrap();
    model.print_objective().unwrap();
    assert!(model.get_print_buffer().is_err());

    let missing = dir.path().join("no/such/dir/report.txt");
    assert!(model.print_to_path(missing).is_err());
}
