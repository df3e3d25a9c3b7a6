use lpsolve::{formats::read_settings, io::ConfigurablePrintTarget, solver::*};

#[test]
fn test_params_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solver.ini");

    let mut model = Model::new(0, 2).unwrap();
    model.print_to_sink();
    {
        let settings = model.settings_mut();
        settings.simplex_type = SimplexType::PrimalPrimal;
        settings.pivot_rule = PivotRule::Dantzig;
        settings.floor_first = BranchMode::Floor;
        settings.presolve = PresolveModes::ROWS | PresolveModes::LINDEP;
        settings.mip_gap_rel = 1e-6;
        settings.break_at_value = Some(100.);
    }
    model.write_params(&path).unwrap();

    let mut fresh = Model::new(0, 2).unwrap();
    fresh.read_params(&path).unwrap();
    assert_eq!(fresh.settings(), model.settings());
}

#[test]
fn test_params_file_partial_and_sections() {
    let text = "\
; tuning for the nightly runs
[Other]
MaxPivot=10

[Default]
Epsilon=1e-11
FloorFirst=BRANCH_CEILING
NodeRule=NODE_GAPSELECT + NODE_DEPTHFIRSTMODE
MaxIter=5
";
    let mut settings = SolverSettings::default();
    let err = read_settings(text.as_bytes(), "Default", &mut settings).unwrap_err();
    assert!(matches!(err, ParamsError::UnknownKey { line: 9, .. }));
    assert_eq!(settings, SolverSettings::default());

    let text = text.replace("MaxIter=5\n", "");
    read_settings(text.as_bytes(), "Default", &mut settings).unwrap();
    assert_eq!(settings.epsilon_value, 1e-11);
    assert_eq!(settings.node_rule, NodeRule::GapSelect);
    assert_eq!(settings.node_modes, NodeModes::DEPTHFIRST);
    // the other section is ignored
    assert_eq!(settings.max_pivot, SolverSettings::default().max_pivot);

    read_settings(text.as_bytes(), "other", &mut settings).unwrap();
    assert_eq!(settings.max_pivot, 10);

    assert!(matches!(
        read_settings(text.as_bytes(), "Missing", &mut settings),
        Err(ParamsError::MissingSection(_))
    ));
}

#[test]
fn test_params_file_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ini");
    std::fs::write(&path, "[Default]\nEpsInt=-1\n").unwrap();

    let mut model = Model::new(0, 1).unwrap();
    assert!(matches!(
        model.read_params(&path),
        Err(ParamsError::Settings(_))
    ));
    assert_eq!(model.settings(), &SolverSettings::default());

    std::fs::write(&path, "[Default]\nSimplexType=SIMPLEX_SIDEWAYS\n").unwrap();
    assert!(matches!(
        model.read_params(&path),
        Err(ParamsError::BadValue { line: 2, .. })
    ));
}
