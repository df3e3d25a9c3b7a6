use lpsolve::{io::ConfigurablePrintTarget, solver::*};

// min x + y + z
//   R1: x <= 4             (singleton, becomes a bound)
//   R2: x + y + z >= 6
//   R3: 0 <= 5             (empty)
// with z fixed at 1
fn presolve_test_model() -> Model {
    let mut model = Model::new(0, 3).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 1., 1.]).unwrap();
    model
        .add_constraint(&[1., 0., 0.], ConstraintType::Le, 4.)
        .unwrap();
    model
        .add_constraint(&[1., 1., 1.], ConstraintType::Ge, 6.)
        .unwrap();
    model
        .add_constraint(&[0., 0., 0.], ConstraintType::Le, 5.)
        .unwrap();
    model.set_bounds(3, 1., 1.).unwrap();
    model
}

fn assert_feasible(model: &Model) {
    let x = model.get_variables();
    let rows = model.get_constraints();
    assert_eq!(x.len(), model.columns());
    assert_eq!(rows.len(), model.rows());
    for i in 1..=model.rows() {
        let activity: f64 = (1..=model.columns())
            .map(|j| model.get_mat(i, j) * x[j - 1])
            .sum();
        assert!((activity - rows[i - 1]).abs() <= 1e-9);
        let (lo, hi) = model.get_rh_range(i).unwrap();
        assert!(activity >= lo - 1e-9 && activity <= hi + 1e-9);
    }
    for j in 1..=model.columns() {
        assert!(x[j - 1] >= model.get_lowbo(j).unwrap() - 1e-9);
        assert!(x[j - 1] <= model.get_upbo(j).unwrap() + 1e-9);
    }
}

#[test]
fn test_presolve_rows_and_columns() {
    let mut model = presolve_test_model();
    model.settings_mut().presolve = PresolveModes::ROWS | PresolveModes::COLS;

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6.).abs() <= 1e-9);
    assert_feasible(&model);
    assert_eq!(model.get_variables()[2], 1.);

    let map = model.solution().presolve_map.clone().unwrap();
    assert_eq!(map.rows, vec![0, 1, 0]);
    assert_eq!(map.columns, vec![1, 2, 0]);
    assert_eq!(map.kept_rows(), 1);
    assert_eq!(map.kept_columns(), 2);

    // combined numbering: rows first, then columns
    assert_eq!(model.get_lp_index(1), 0);
    assert_eq!(model.get_lp_index(2), 1);
    assert_eq!(model.get_lp_index(3 + 1), 2);
    assert_eq!(model.get_lp_index(3 + 3), 0);
    assert_eq!(model.get_orig_index(1), 2);
    assert_eq!(model.get_orig_index(2), 3 + 1);
    assert_eq!(model.get_orig_index(3), 3 + 2);
}

#[test]
fn test_no_presolve_identity_map() {
    let mut model = presolve_test_model();
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(model.solution().presolve_map.is_none());
    assert_eq!(model.get_lp_index(2), 2);
    assert_eq!(model.get_orig_index(5), 5);
    assert_eq!(model.get_lp_index(7), 0);
}

#[test]
fn test_presolve_duals_are_mapped_back() {
    let mut model = presolve_test_model();
    model.settings_mut().presolve =
        PresolveModes::ROWS | PresolveModes::COLS | PresolveModes::DUALS;

    assert_eq!(model.solve(), SolverStatus::Optimal);
    let duals = model.get_duals().unwrap();
    assert_eq!(duals.len(), 3);
    // removed rows have a zero dual, the covering row prices one unit
    assert!((duals[1] - 1.).abs() <= 1e-9);
    assert_eq!(duals[2], 0.);
    assert_eq!(model.get_reduced_costs().unwrap().len(), 3);
}

#[test]
fn test_presolve_removes_everything() {
    // min x, x >= 2 as a singleton row
    let mut model = Model::new(0, 1).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1.]).unwrap();
    model.add_constraint(&[1.], ConstraintType::Ge, 2.).unwrap();
    model.settings_mut().presolve = PresolveModes::ROWS | PresolveModes::COLS;

    assert_eq!(model.solve(), SolverStatus::PreSolved);
    assert!(model.solution().has_solution());
    assert_eq!(model.get_variables(), &[2.]);
    assert_eq!(model.get_objective(), 2.);
    assert_eq!(model.get_total_iter(), 0);
}

#[test]
fn test_presolve_detects_infeasibility() {
    let mut model = presolve_test_model();
    model.set_rh(3, -1.).unwrap();
    model.settings_mut().presolve = PresolveModes::ROWS;

    assert_eq!(model.solve(), SolverStatus::Infeasible);
}

#[test]
fn test_presolve_parallel_rows() {
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_maxim();
    model.set_obj_fn(&[143., 60.]).unwrap();
    model
        .add_constraint(&[120., 210.], ConstraintType::Le, 15000.)
        .unwrap();
    model
        .add_constraint(&[110., 30.], ConstraintType::Le, 4000.)
        .unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
    model.add_constraint(&[2., 2.], ConstraintType::Le, 160.).unwrap();
    model.settings_mut().presolve = PresolveModes::LINDEP;

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6315.625).abs() <= 1e-6);
    assert_eq!(model.solution().presolve_map.as_ref().unwrap().kept_rows(), 3);
    assert_feasible(&model);
}

#[test]
fn test_presolve_doubleton_equality() {
    // min x + y, x - y = 1, x + y >= 3, x <= 5
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 1.]).unwrap();
    model.set_upbo(1, 5.).unwrap();
    model.add_constraint(&[1., -1.], ConstraintType::Eq, 1.).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, 3.).unwrap();
    model.settings_mut().presolve = PresolveModes::ELIMEQ2;

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 3.).abs() <= 1e-9);
    assert_eq!(model.solution().presolve_map.as_ref().unwrap().columns, vec![0, 1]);
    assert_feasible(&model);
}
