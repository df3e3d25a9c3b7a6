use lpsolve::{io::ConfigurablePrintTarget, solver::*};

fn api_dim_check_model() -> Model {
    let mut model = Model::new(2, 3).unwrap();
    model.print_to_sink();
    model
}

#[test]
fn test_api_good_dims() {
    let mut model = api_dim_check_model();
    assert!(model.set_obj_fn(&[1., 2., 3.]).is_ok());
    assert!(model.set_rh_vec(&[1., 2.]).is_ok());
    assert!(model.add_column(&[0., 1., 1.]).is_ok());
    assert!(model.set_basis(&[0, -1, -2]).is_ok());
}

#[test]
fn test_api_bad_dense_lengths() {
    let mut model = api_dim_check_model();

    assert_eq!(
        model.set_obj_fn(&[1., 2.]),
        Err(ModelError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
    assert_eq!(
        model.add_constraint(&[1., 2., 3., 4.], ConstraintType::Le, 1.),
        Err(ModelError::DimensionMismatch {
            expected: 3,
            found: 4
        })
    );
    assert_eq!(
        model.add_column(&[1., 2.]),
        Err(ModelError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
    assert_eq!(
        model.set_rh_vec(&[1.]),
        Err(ModelError::DimensionMismatch {
            expected: 2,
            found: 1
        })
    );
    assert!(matches!(
        model.set_var_weights(&[1.]),
        Err(ModelError::DimensionMismatch { .. })
    ));

    // failed calls leave the model unchanged
    assert_eq!((model.rows(), model.columns()), (2, 3));
    assert_eq!(model.get_row(0).unwrap(), vec![0., 0., 0.]);
}

#[test]
fn test_api_bad_indices() {
    let mut model = api_dim_check_model();

    assert_eq!(
        model.set_mat(3, 1, 1.),
        Err(ModelError::RowIndex { index: 3, rows: 2 })
    );
    assert_eq!(
        model.set_mat(1, 4, 1.),
        Err(ModelError::ColumnIndex {
            index: 4,
            columns: 3
        })
    );
    assert!(matches!(
        model.set_bounds(0, 0., 1.),
        Err(ModelError::ColumnIndex { index: 0, .. })
    ));
    assert!(matches!(
        model.del_constraint(0),
        Err(ModelError::RowIndex { .. })
    ));
    assert!(matches!(
        model.set_constr_type(3, ConstraintType::Ge),
        Err(ModelError::RowIndex { .. })
    ));
    assert!(matches!(model.get_rh(3), Err(ModelError::RowIndex { .. })));
    assert!(matches!(
        model.add_constraint_ex(&[(5, 1.)], ConstraintType::Le, 1.),
        Err(ModelError::ColumnIndex { .. })
    ));
    assert!(matches!(
        model.add_column_ex(&[(4, 1.)]),
        Err(ModelError::RowIndex { .. })
    ));
    assert!(matches!(model.del_column(7), Err(ModelError::ColumnIndex { .. })));
    assert!(matches!(model.get_col_name(0), Err(ModelError::ColumnIndex { .. })));
    assert_eq!(model.rows(), 2);
    assert_eq!(model.columns(), 3);
}

#[test]
fn test_api_bad_sos() {
    let mut model = api_dim_check_model();

    assert!(matches!(
        model.add_sos("s", 1, 1, &[(1, 1.), (4, 2.)]),
        Err(ModelError::ColumnIndex { .. })
    ));
    assert!(matches!(
        model.add_sos("s", 1, 1, &[(1, 1.), (2, 1.)]),
        Err(ModelError::InvalidSos(_))
    ));
    assert!(matches!(
        model.add_sos("s", 0, 1, &[(1, 1.)]),
        Err(ModelError::InvalidSos(_))
    ));
    assert!(model.sos_sets().is_empty());

    assert_eq!(model.add_sos("s", 2, 1, &[(1, 1.), (2, 2.), (3, 3.)]), Ok(1));
    assert_eq!(model.sos_sets()[0].members(), vec![(1, 1.), (2, 2.), (3, 3.)]);
}

#[test]
fn test_api_bad_basis() {
    let mut model = api_dim_check_model();

    assert!(matches!(
        model.set_basis(&[0, -1]),
        Err(ModelError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        model.set_basis(&[0, -1, -1]),
        Err(ModelError::InvalidState(_))
    ));
    assert!(matches!(
        model.set_basis(&[0, -1, -9]),
        Err(ModelError::InvalidState(_))
    ));
    assert_eq!(model.get_basis(false), vec![0, -1, -2]);
}

#[test]
fn test_api_bad_settings() {
    let mut model = api_dim_check_model();

    let settings = SolverSettings {
        epsilon_int: -1.,
        ..SolverSettings::default()
    };
    assert!(model.set_settings(settings).is_err());
    assert_eq!(model.settings().epsilon_int, SolverSettings::default().epsilon_int);

    // invalid values written through settings_mut are caught at solve time
    model.settings_mut().epsilon_int = -1.;
    assert_eq!(model.solve(), SolverStatus::NotRun);

    assert!(SolverSettingsBuilder::default()
        .solution_limit(0)
        .build()
        .is_err());
}
