use lpsolve::{io::ConfigurablePrintTarget, solver::*};

fn basic_milp_model() -> Model {
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
    model.set_int(1, true).unwrap();
    model.set_int(2, true).unwrap();
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
fn test_milp_feasible() {
    let mut model = basic_milp_model();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(dist(model.get_variables(), &[22., 52.]) <= 1e-9);
    assert!((model.get_objective() - 6266.).abs() <= 1e-8);
    assert!(model.get_total_nodes() > 1);
    assert!(model.get_solution_count() >= 1);

    let report = model.solution();
    assert!(report.max_depth >= 1);
    assert!((report.best_bound - 6266.).abs() <= 1e-8);
}

#[test]
fn test_milp_knapsack() {
    let mut model = Model::new(0, 4).unwrap();
    model.print_to_sink();
    model.set_maxim();
    model.set_obj_fn(&[10., 13., 7., 8.]).unwrap();
    model
        .add_constraint(&[4., 6., 3., 5.], ConstraintType::Le, 10.)
        .unwrap();
    for j in 1..=4 {
        model.set_binary(j, true).unwrap();
    }

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 23.).abs() <= 1e-9);
    assert!(dist(model.get_variables(), &[1., 1., 0., 0.]) <= 1e-9);
}

#[test]
fn test_milp_semicontinuous() {
    // x is either 0 or within [2, 10]
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 0.]).unwrap();
    model.add_constraint(&[1., 1.], ConstraintType::Ge, 1.5).unwrap();
    model.set_bounds(1, 2., 10.).unwrap();
    model.set_upbo(2, 1.).unwrap();
    model.set_semicont(1, true).unwrap();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_variables()[0] - 2.).abs() <= 1e-9);
    assert!((model.get_objective() - 2.).abs() <= 1e-9);

    // with more room in y, x can drop to zero
    model.set_upbo(2, 5.).unwrap();
    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!(model.get_variables()[0].abs() <= 1e-9);
}

fn sos_model() -> Model {
    let mut model = Model::new(0, 3).unwrap();
    model.print_to_sink();
    model.set_maxim();
    model.set_obj_fn(&[1., 2., 3.]).unwrap();
    model
        .add_constraint(&[1., 1., 1.], ConstraintType::Le, 2.)
        .unwrap();
    for j in 1..=3 {
        model.set_upbo(j, 1.).unwrap();
    }
    model
}

#[test]
fn test_milp_sos1() {
    let mut model = sos_model();
    model
        .add_sos("s1", 1, 1, &[(1, 1.), (2, 2.), (3, 3.)])
        .unwrap();
    assert!(model.is_sos_var(2).unwrap());

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 3.).abs() <= 1e-9);
    assert!(dist(model.get_variables(), &[0., 0., 1.]) <= 1e-9);
}

#[test]
fn test_milp_sos2() {
    // order z, x, y: only (z, x) or (x, y) may be nonzero together
    let mut model = sos_model();
    model
        .add_sos("s2", 2, 1, &[(3, 1.), (1, 2.), (2, 3.)])
        .unwrap();

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 4.).abs() <= 1e-9);
    assert!(dist(model.get_variables(), &[1., 0., 1.]) <= 1e-9);
}

#[test]
fn test_milp_break_at_first() {
    let mut model = basic_milp_model();
    model.settings_mut().break_at_first = true;

    assert_eq!(model.solve(), SolverStatus::SubOptimal);
    assert!(model.solution().has_solution());

    // any solution found must be integer and feasible
    let x = model.get_variables().to_vec();
    assert!(x.iter().all(|v| (v - v.round()).abs() <= 1e-9));
    assert!(x[0] + x[1] <= 75. + 1e-9);
    assert!(model.get_objective() <= 6266. + 1e-8);
}

#[test]
fn test_milp_break_at_value() {
    let mut model = basic_milp_model();
    model.settings_mut().break_at_value = Some(6000.);

    assert_eq!(model.solve(), SolverStatus::SubOptimal);
    assert!(model.get_objective() >= 6000.);
}

#[test]
fn test_milp_integer_infeasible() {
    // 2x + 2y = 3 has no integer solution
    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    model.set_obj_fn(&[1., 1.]).unwrap();
    model.add_constraint(&[2., 2.], ConstraintType::Eq, 3.).unwrap();
    model.set_bounds(1, 0., 5.).unwrap();
    model.set_bounds(2, 0., 5.).unwrap();
    model.set_int(1, true).unwrap();
    model.set_int(2, true).unwrap();

    assert_eq!(model.solve(), SolverStatus::Infeasible);
}

#[test]
fn test_milp_node_rules_and_directions() {
    let rules = [
        NodeRule::FirstSelect,
        NodeRule::GapSelect,
        NodeRule::RangeSelect,
        NodeRule::FractionSelect,
        NodeRule::PseudoCostSelect,
        NodeRule::PseudoNonIntSelect,
        NodeRule::PseudoRatioSelect,
    ];
    let directions = [BranchMode::Floor, BranchMode::Ceiling, BranchMode::Automatic];
    let modes = [
        NodeModes::empty(),
        NodeModes::DEPTHFIRST,
        NodeModes::BREADTHFIRST,
        NodeModes::GREEDY,
    ];

    for rule in rules {
        for direction in directions {
            for node_modes in modes {
                let mut model = basic_milp_model();
                model.settings_mut().node_rule = rule;
                model.settings_mut().floor_first = direction;
                model.settings_mut().node_modes = node_modes;
                assert_eq!(model.solve(), SolverStatus::Optimal);
                assert!(
                    (model.get_objective() - 6266.).abs() <= 1e-8,
                    "{:?} {:?} {:?}",
                    rule,
                    direction,
                    node_modes
                );
            }
        }
    }
}

#[test]
fn test_milp_per_column_branching() {
    let mut model = basic_milp_model();
    model.set_var_branch(1, BranchMode::Floor).unwrap();
    assert_eq!(model.get_var_branch(1).unwrap(), BranchMode::Floor);
    assert_eq!(model.get_var_branch(2).unwrap(), BranchMode::Ceiling);

    model.set_var_weights(&[2., 1.]).unwrap();
    assert_eq!(model.get_var_priority(2).unwrap(), 1);
    assert_eq!(model.get_var_priority(1).unwrap(), 2);

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6266.).abs() <= 1e-8);
}

#[test]
fn test_milp_with_presolve() {
    let mut model = basic_milp_model();
    model.settings_mut().presolve =
        PresolveModes::ROWS | PresolveModes::COLS | PresolveModes::REDUCEGCD;

    assert_eq!(model.solve(), SolverStatus::Optimal);
    assert!((model.get_objective() - 6266.).abs() <= 1e-8);
    assert_eq!(model.get_variables().len(), 2);
}

// A market split instance: four equalities over binary columns with
// pseudo-random weights.   Such models take branch-and-bound a very long
// time, so the one second limit is reached first.
fn market_split(rows: usize, columns: usize) -> Model {
    let mut state: u64 = 12345;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) % 100
    };

    let mut model = Model::new(0, columns).unwrap();
    model.print_to_sink();
    model.set_maxim();
    let costs: Vec<f64> = (0..columns).map(|_| (next() + 1) as f64).collect();
    model.set_obj_fn(&costs).unwrap();
    for _ in 0..rows {
        let row: Vec<f64> = (0..columns).map(|_| next() as f64).collect();
        let rhs = (row.iter().sum::<f64>() / 2.).floor();
        model.add_constraint(&row, ConstraintType::Eq, rhs).unwrap();
    }
    for j in 1..=columns {
        model.set_binary(j, true).unwrap();
    }
    model
}

#[test]
fn test_milp_timeout() {
    let mut model = market_split(4, 30);
    model.settings_mut().timeout = 1;

    let status = model.solve();
    assert!(
        matches!(status, SolverStatus::TimedOut | SolverStatus::SubOptimal),
        "{:?}",
        status
    );
    assert!(model.solution().solve_time < 30.);
    assert!(model.get_total_nodes() > 1);
}

// max x1 + x2 + x3, 2 x1 + 2 x2 + 2 x3 <= 3, binary: three optima of value 1
fn equal_optima_model(limit: u32) -> Model {
    let mut model = Model::new(0, 3).unwrap();
    model.print_to_sink();
    model.set_maxim();
    model.set_obj_fn(&[1., 1., 1.]).unwrap();
    model
        .add_constraint(&[2., 2., 2.], ConstraintType::Le, 3.)
        .unwrap();
    for j in 1..=3 {
        model.set_binary(j, true).unwrap();
    }
    model.settings_mut().solution_limit = limit;
    model
}

#[test]
fn test_milp_solution_limit() {
    let expected = [
        (1, [0., 1., 0.], 1),
        (2, [0., 0., 1.], 3),
        (3, [1., 0., 0.], 3),
    ];
    for (limit, x, count) in expected {
        let mut model = equal_optima_model(limit);
        assert_eq!(model.solve(), SolverStatus::Optimal);
        assert!((model.get_objective() - 1.).abs() <= 1e-9);
        assert!(
            dist(model.get_variables(), &x) <= 1e-9,
            "limit {}: {:?}",
            limit,
            model.get_variables()
        );
        assert_eq!(model.get_solution_count(), count, "limit {}", limit);
    }
}

#[test]
fn test_milp_gap_stops_search() {
    let mut exact = basic_milp_model();
    assert_eq!(exact.solve(), SolverStatus::Optimal);
    let exact_nodes = exact.get_total_nodes();

    // a gap wider than any objective difference accepts the first incumbent
    let mut model = basic_milp_model();
    model.settings_mut().mip_gap_abs = 1e6;
    let first_found = std::sync::Arc::new(std::sync::Mutex::new(None));
    let sink = first_found.clone();
    model.set_message_callback(MsgMask::MILPFEASIBLE, move |progress, _| {
        *sink.lock().unwrap() = Some(progress.nodes);
    });

    assert_eq!(model.solve(), SolverStatus::Optimal);
    let first_found = first_found.lock().unwrap().unwrap();
    assert_eq!(model.get_total_nodes(), first_found);
    assert!(model.get_total_nodes() <= exact_nodes);
    assert_eq!(model.get_solution_count(), 1);
    assert!(model.get_objective() <= 6266. + 1e-8);
    assert!(model.get_objective() >= 6266. - 1e6);
}
