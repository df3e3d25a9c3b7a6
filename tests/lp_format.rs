use lpsolve::{io::ConfigurablePrintTarget, solver::*};

const FACTORY: &str = "\
/* a small production planning model */
max: 143 x + 60 y;

land: 120 x + 210 y <= 15000;
labour: 110 x + 30 y <= 4000;
area: x + y <= 75;

int x, y;
";

#[test]
fn test_lp_file_solve() {
    let mut model = Model::read_lp(FACTORY.as_bytes()).unwrap();
    model.print_to_sink();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6266.).abs() <= 1e-8);
    assert_eq!(model.get_nameindex("labour", true), Ok(2));
    assert_eq!(model.get_nameindex("y", false), Ok(2));
}

#[test]
fn test_lp_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("factory.lp");

    let mut model = Model::read_lp(FACTORY.as_bytes()).unwrap();
    model.print_to_sink();
    model.set_rh_range(3, 10., 75.).unwrap();
    model.set_bounds(2, -5., 60.).unwrap();
    model.set_rh(0, 25.).unwrap();
    model.write_lp_file(&path).unwrap();

    let mut copy = Model::read_lp_file(&path).unwrap();
    copy.print_to_sink();
    assert_eq!(copy.get_rh_range(3).unwrap(), (10., 75.));
    assert_eq!(copy.get_lowbo(2).unwrap(), -5.);
    assert_eq!(copy.get_upbo(2).unwrap(), 60.);
    assert_eq!(copy.get_rh(0).unwrap(), 25.);
    assert_eq!(copy.get_row_name(1).unwrap(), "land");

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert_eq!(copy.solve(), SolverStatus::Optimal);
    assert!((copy.get_objective() - model.get_objective()).abs() <= 1e-9);
    assert_eq!(copy.get_variables(), model.get_variables());
}

#[test]
fn test_lp_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.lp");
    assert!(matches!(
        Model::read_lp_file(missing),
        Err(LpFormatError::Io(_))
    ));

    let err = Model::read_lp("max: 2 x;\n\nc1: 3 x <= ;\n".as_bytes()).unwrap_err();
    assert!(matches!(err, LpFormatError::Syntax { line: 3, .. }));
    assert!(err.to_string().contains('3'));
}
