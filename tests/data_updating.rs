use lpsolve::{io::ConfigurablePrintTarget, solver::*};

fn updating_test_model() -> Model {
    let mut model = Model::new(0, 3).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 2., 3.]).unwrap();
    model
        .add_constraint(&[1., 1., 0.], ConstraintType::Ge, 1.)
        .unwrap();
    model
        .add_constraint(&[0., 1., 1.], ConstraintType::Ge, 2.)
        .unwrap();
    model
        .add_constraint(&[1., 0., 1.], ConstraintType::Le, 10.)
        .unwrap();
    model
}

#[test]
fn test_update_cells() {
    let mut model = updating_test_model();
    assert_eq!(model.nonzeros(), 6);

    model.set_mat(1, 3, 4.).unwrap();
    assert_eq!(model.get_mat(1, 3), 4.);
    assert_eq!(model.nonzeros(), 7);

    // writing a zero removes the entry
    model.set_mat(1, 1, 0.).unwrap();
    assert_eq!(model.get_mat(1, 1), 0.);
    assert_eq!(model.nonzeros(), 6);

    // row 0 is the objective
    model.set_mat(0, 2, -5.).unwrap();
    assert_eq!(model.get_mat(0, 2), -5.);
    assert_eq!(model.get_row(0).unwrap(), vec![1., -5., 3.]);

    // out of range reads are zero
    assert_eq!(model.get_mat(4, 1), 0.);
    assert_eq!(model.get_mat(1, 0), 0.);
    assert_eq!(model.get_mat(1, 4), 0.);
}

#[test]
fn test_update_objective() {
    let mut model = updating_test_model();
    model.set_obj_fn_ex(&[(3, 7.)]).unwrap();
    assert_eq!(model.get_row(0).unwrap(), vec![0., 0., 7.]);

    model.set_obj(1, 2.).unwrap();
    assert_eq!(model.get_column(1).unwrap(), vec![2., 1., 0., 1.]);

    model.set_maxim();
    assert!(model.is_maxim());
    model.set_minim();
    assert!(!model.is_maxim());
}

#[test]
fn test_update_rhs_and_types() {
    let mut model = updating_test_model();

    model.set_rh(2, 3.).unwrap();
    assert_eq!(model.get_rh(2).unwrap(), 3.);
    model.set_rh_vec(&[1., 2., 3.]).unwrap();
    assert_eq!(model.get_rh(3).unwrap(), 3.);

    model.set_rh_range(3, -1., 5.).unwrap();
    assert_eq!(model.get_rh_range(3).unwrap(), (-1., 5.));
    assert_eq!(model.get_constr_type(3).unwrap(), ConstraintType::Le);

    // changing the operator drops the range
    model.set_constr_type(3, ConstraintType::Ge).unwrap();
    assert_eq!(model.get_rh_range(3).unwrap(), (5., 1e30));

    // equal ends make an equality
    model.set_rh_range(1, 4., 4.).unwrap();
    assert_eq!(model.get_constr_type(1).unwrap(), ConstraintType::Eq);
    assert_eq!(model.get_rh(1).unwrap(), 4.);

    model.set_constr_type(2, ConstraintType::Free).unwrap();
    assert_eq!(model.get_rh_range(2).unwrap(), (-1e30, 1e30));
}

#[test]
fn test_add_delete_rows() {
    let mut model = updating_test_model();
    model.set_row_name(3, "cap").unwrap();

    assert_eq!(model.del_constraint(1), Ok(()));
    assert_eq!(model.rows(), 2);
    // later rows move up, names move with them
    assert_eq!(model.get_row(1).unwrap(), vec![0., 1., 1.]);
    assert_eq!(model.get_row_name(2).unwrap(), "cap");
    assert_eq!(model.get_nameindex("cap", true), Ok(2));
    // unnamed rows follow their new position
    assert_eq!(model.get_row_name(1).unwrap(), "R1");

    let r = model
        .add_constraint_ex(&[(1, 2.), (3, -1.)], ConstraintType::Eq, 0.)
        .unwrap();
    assert_eq!(r, 3);
    assert_eq!(model.get_row(3).unwrap(), vec![2., 0., -1.]);
    assert_eq!(model.get_rh(3).unwrap(), 0.);
}

#[test]
fn test_add_delete_columns() {
    let mut model = updating_test_model();
    model.set_col_name(2, "y").unwrap();
    model.set_int(3, true).unwrap();

    let c = model.add_column(&[4., 0., 1., 1.]).unwrap();
    assert_eq!(c, 4);
    assert_eq!(model.get_column(4).unwrap(), vec![4., 0., 1., 1.]);

    let c = model.add_column_ex(&[(0, 1.), (2, 5.)]).unwrap();
    assert_eq!(c, 5);
    assert_eq!(model.get_mat(2, 5), 5.);
    assert_eq!(model.get_lowbo(5).unwrap(), 0.);
    assert_eq!(model.get_upbo(5).unwrap(), 1e30);

    model.del_column(1).unwrap();
    assert_eq!(model.columns(), 4);
    assert_eq!(model.get_col_name(1).unwrap(), "y");
    assert!(model.is_int(2).unwrap());
    assert_eq!(model.get_row(1).unwrap(), vec![1., 0., 0., 0.]);
}

#[test]
fn test_update_bounds_and_types() {
    let mut model = updating_test_model();

    model.set_bounds(1, -2., 8.).unwrap();
    assert_eq!((model.get_lowbo(1).unwrap(), model.get_upbo(1).unwrap()), (-2., 8.));

    model.set_unbounded(2).unwrap();
    assert!(model.is_unbounded(2).unwrap());
    assert_eq!(model.get_lowbo(2).unwrap(), -1e30);

    model.set_bounds(3, -5., 0.).unwrap();
    assert!(model.is_negative(3).unwrap());

    model.set_binary(1, true).unwrap();
    assert!(model.is_binary(1).unwrap());
    assert!(model.is_int(1).unwrap());
    model.set_binary(1, false).unwrap();
    assert!(!model.is_int(1).unwrap());

    model.set_semicont(3, true).unwrap();
    assert!(model.is_semicont(3).unwrap());
}

#[test]
fn test_names() {
    let mut model = updating_test_model();
    assert_eq!(model.get_lp_name(), "Unnamed");
    model.set_lp_name("demo");
    assert_eq!(model.get_lp_name(), "demo");

    assert_eq!(model.get_row_name(0).unwrap(), "R0");
    model.set_row_name(0, "cost").unwrap();
    assert_eq!(model.get_row_name(0).unwrap(), "cost");

    assert_eq!(model.get_col_name(3).unwrap(), "C3");
    assert_eq!(model.get_nameindex("C3", false), Ok(3));
    model.set_col_name(3, "z").unwrap();
    assert_eq!(model.get_nameindex("z", false), Ok(3));
    assert!(matches!(
        model.get_nameindex("nothing", false),
        Err(ModelError::UnknownName(_))
    ));
}

#[test]
fn test_changes_reset_the_solution() {
    let mut model = updating_test_model();
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 4.).abs() <= 1e-9);

    model.set_obj(2, 10.).unwrap();
    assert_eq!(model.status(), SolverStatus::NotRun);
    assert!(model.get_variables().is_empty());

    assert_eq!(model.solve(), SolverStatus::Optimal);
    // y is now expensive: x covers row 1, z covers row 2
    assert!((model.get_objective() - 7.).abs() <= 1e-9);

    model.del_constraint(2).unwrap();
    assert_eq!(model.status(), SolverStatus::NotRun);
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 1.).abs() <= 1e-9);
}

#[test]
fn test_row_mode() {
    let mut model = Model::new(0, 0).unwrap();
    model.print_to_sink();
    model.set_add_rowmode(true).unwrap();
    assert!(model.is_add_rowmode());
    assert!(matches!(
        model.add_column(&[1.]),
        Err(ModelError::InvalidState(_))
    ));
    model.set_add_rowmode(false).unwrap();

    model.add_column(&[1.]).unwrap();
    model.add_column(&[1.]).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, 2.).unwrap();
    assert!(model.set_add_rowmode(true).is_err());

    model.resize(2, 3).unwrap();
    assert_eq!((model.rows(), model.columns()), (2, 3));
    model.resize(1, 2).unwrap();
    assert_eq!(model.get_row(1).unwrap(), vec![1., 1.]);
}
