use lpsolve::{io::ConfigurablePrintTarget, solver::*};

fn basic_lp_model() -> Model {
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

fn dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[test]
fn test_lp_feasible() {
    let mut model = basic_lp_model();

    assert_eq!(model.solve(), SolverStatus::Optimal);

    let refsol = vec![21.875, 53.125];
    assert!(dist(model.get_variables(), &refsol) <= 1e-8);

    let refrows = vec![13781.25, 4000., 75.];
    assert!(dist(model.get_constraints(), &refrows) <= 1e-6);

    assert!(f64::abs(model.get_objective() - 6315.625) <= 1e-8);
    assert_eq!(model.get_total_nodes(), 0);
    assert!(model.get_total_iter() > 0);
}

#[test]
fn test_lp_duals() {
    let mut model = basic_lp_model();

    // duals are only reported when requested
    model.solve();
    assert!(model.get_duals().is_none());

    model.settings_mut().presolve = PresolveModes::DUALS;
    assert_eq!(model.solve(), SolverStatus::Optimal);
    let duals = model.get_duals().unwrap();
    assert!(dist(duals, &[0., 1.0375, 28.875]) <= 1e-8);
    let reduced = model.get_reduced_costs().unwrap();
    assert!(dist(reduced, &[0., 0.]) <= 1e-8);
    assert!(model.get_sensitivity().is_none());
}

#[test]
fn test_lp_sensitivity() {
    let mut model = basic_lp_model();
    model.settings_mut().presolve = PresolveModes::SENSDUALS;
    assert_eq!(model.solve(), SolverStatus::Optimal);

    let sens = model.get_sensitivity().unwrap();
    // x stays optimal while its profit is between 60 and 220
    assert!((sens.objective_from[0] - 60.).abs() <= 1e-6);
    assert!((sens.objective_till[0] - 220.).abs() <= 1e-6);
    // y stays optimal while its profit is between 39 and 143
    assert!((sens.objective_from[1] - 39.).abs() <= 1e-6);
    assert!((sens.objective_till[1] - 143.).abs() <= 1e-6);
    // the first row is not binding
    assert_eq!(sens.rhs_from[0], -1e30);
}

#[test]
fn test_lp_crossed_bounds_infeasible() {
    let mut model = Model::new(1, 1).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1.]).unwrap();
    model.set_mat(1, 1, 1.).unwrap();
    model.set_rh(1, 10.).unwrap();
    model.set_bounds(1, 5., 3.).unwrap();

    assert_eq!(model.solve(), SolverStatus::Infeasible);
}

#[test]
fn test_lp_primal_infeasible() {
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 1.]).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, 5.).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Le, 3.).unwrap();

    assert_eq!(model.solve(), SolverStatus::Infeasible);
    assert!(model.get_variables().is_empty() || !model.solution().has_solution());
}

#[test]
fn test_lp_unbounded() {
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_maxim();
    model.set_obj_fn(&[1., 1.]).unwrap();
    model.add_constraint(&[1., -1.], ConstraintType::Le, 1.).unwrap();

    assert_eq!(model.solve(), SolverStatus::Unbounded);
}

#[test]
fn test_lp_zero_objective() {
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, 2.).unwrap();
    model.add_constraint(&[1., -1.], ConstraintType::Le, 1.).unwrap();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert_eq!(model.get_objective(), 0.);

    // any feasible point will do
    let x = model.get_variables().to_vec();
    assert!(x[0] + x[1] >= 2. - 1e-9);
    assert!(x[0] - x[1] <= 1. + 1e-9);
    assert!(x.iter().all(|&v| v >= -1e-9));
}

#[test]
fn test_lp_ranges_and_equalities() {
    // min x + 2y, 2 <= x + y <= 6, x - y = 1
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 2.]).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Le, 6.).unwrap();
    model.set_rh_range(1, 2., 6.).unwrap();
    model.add_constraint(&[1., -1.], ConstraintType::Eq, 1.).unwrap();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(dist(model.get_variables(), &[1.5, 0.5]) <= 1e-8);
    assert!((model.get_objective() - 2.5).abs() <= 1e-8);
}

#[test]
fn test_lp_free_variables() {
    // min x + 2y, x + y >= -4, x - y <= 2, x and y free
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 2.]).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, -4.).unwrap();
    model.add_constraint(&[1., -1.], ConstraintType::Le, 2.).unwrap();
    model.set_unbounded(1).unwrap();
    model.set_unbounded(2).unwrap();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(dist(model.get_variables(), &[-1., -3.]) <= 1e-8);
    assert!((model.get_objective() + 7.).abs() <= 1e-8);
}

#[test]
fn test_lp_objective_constant() {
    let mut model = basic_lp_model();
    model.set_rh(0, 100.).unwrap();
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6415.625).abs() <= 1e-8);
}

#[test]
fn test_lp_simplex_variants() {
    let simplex_types = [
        SimplexType::PrimalPrimal,
        SimplexType::DualPrimal,
        SimplexType::PrimalDual,
        SimplexType::DualDual,
    ];
    let pivot_rules = [
        PivotRule::FirstIndex,
        PivotRule::Dantzig,
        PivotRule::Devex,
        PivotRule::SteepestEdge,
    ];

    for simplex_type in simplex_types {
        for pivot_rule in pivot_rules {
            let mut model = basic_lp_model();
            model.settings_mut().simplex_type = simplex_type;
            model.settings_mut().pivot_rule = pivot_rule;
            assert_eq!(model.solve(), SolverStatus::Optimal);
            assert!(
                (model.get_objective() - 6315.625).abs() <= 1e-8,
                "{:?} {:?}",
                simplex_type,
                pivot_rule
            );
        }
    }
}

#[test]
fn test_lp_scaling_variants() {
    let algorithms = [
        ScaleAlgorithm::None,
        ScaleAlgorithm::Extreme,
        ScaleAlgorithm::Range,
        ScaleAlgorithm::Mean,
        ScaleAlgorithm::Geometric,
        ScaleAlgorithm::CurtisReid,
    ];
    for algorithm in algorithms {
        for modes in [ScaleModes::empty(), ScaleModes::POWER2 | ScaleModes::EQUILIBRATE] {
            let mut model = basic_lp_model();
            model.settings_mut().scale_algorithm = algorithm;
            model.settings_mut().scale_modes = modes;
            assert_eq!(model.solve(), SolverStatus::Optimal);
            assert!(dist(model.get_variables(), &[21.875, 53.125]) <= 1e-7);
        }
    }
}

#[test]
fn test_lp_resolve_after_change() {
    let mut model = basic_lp_model();
    assert_eq!(model.solve(), SolverStatus::Optimal);

    // a data change forgets the previous result
    model.set_rh(3, 50.).unwrap();
    assert_eq!(model.status(), SolverStatus::NotRun);

    assert_eq!(model.solve(), SolverStatus::Optimal);
    // x + y <= 50 binds with the labour row
    assert!(dist(model.get_variables(), &[31.25, 18.75]) <= 1e-8);
}
