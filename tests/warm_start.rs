use lpsolve::{io::ConfigurablePrintTarget, solver::*};

fn warm_start_model() -> Model {
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
    model.print_to_sink();
    model
}

#[test]
fn test_optimal_basis_restarts_without_iterations() {
    let mut cold = warm_start_model();
    assert_eq!(cold.solve(), SolverStatus::Optimal);
    assert!(cold.get_total_iter() > 0);
    let basis = cold.get_basis(true);
    assert_eq!(basis.len(), 1 + 3 + 2);

    let mut warm = warm_start_model();
    warm.set_basis(&basis).unwrap();
    assert_eq!(warm.solve(), SolverStatus::Optimal);
    assert_eq!(warm.get_total_iter(), 0);
    assert!((warm.get_objective() - 6315.625).abs() <= 1e-8);
}

#[test]
fn test_basic_part_only() {
    let mut cold = warm_start_model();
    cold.solve();

    // the basic variables alone are enough, nonbasic ones sit at a bound
    let basic = cold.get_basis(false);
    assert_eq!(basic.len(), 1 + 3);

    let mut warm = warm_start_model();
    warm.set_basis(&basic).unwrap();
    assert_eq!(warm.solve(), SolverStatus::Optimal);
    assert_eq!(warm.get_total_iter(), 0);
}

#[test]
fn test_resolve_reuses_the_last_basis() {
    let mut model = warm_start_model();
    model.solve();
    let first = model.get_total_iter();

    // a small change in the right hand side keeps the basis nearly optimal
    model.set_rh(3, 74.).unwrap();
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(model.get_total_iter() <= first);

    // back to the slack basis: the solve starts from scratch
    model.default_basis();
    assert_eq!(model.get_basis(false), vec![0, -1, -2, -3]);
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(model.get_total_iter() > 0);
}

#[test]
fn test_structural_change_drops_the_basis() {
    let mut model = warm_start_model();
    model.solve();
    assert_ne!(model.get_basis(false), vec![0, -1, -2, -3]);

    model
        .add_constraint(&[1., 0.], ConstraintType::Le, 30.)
        .unwrap();
    assert_eq!(model.get_basis(false), vec![0, -1, -2, -3, -4]);
    assert_eq!(model.solve(), SolverStatus::Optimal);
}
