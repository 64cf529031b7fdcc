//! Integration test: reference scenarios, example presets and session state.

use std::f64::consts::PI;

use sm_sim::{
    ClosedForm, DampingRegime, DerivedQuantities, DisplayRange, EquationKind, InitialConditions,
    OverdampedModel, Playback, SessionState, SimulationOptions, SystemParameters, VirtualClock,
    examples, find_example, generate, render_equations,
};

#[test]
fn scenario_simple_oscillation() {
    let params = SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped);
    let derived = DerivedQuantities::compute(&params).unwrap();
    assert_eq!(derived.omega0, 2.0);
    assert_eq!(derived.zeta, 0.0);
    assert!((derived.period - PI).abs() < 1e-12);

    let solution = ClosedForm::select(&params, &derived, 1.0, 0.0, OverdampedModel::Legacy).unwrap();
    let quarter = solution.sample(PI / 4.0);
    assert!(quarter.position.abs() < 1e-9);
    assert!((quarter.velocity + 2.0).abs() < 1e-9);

    let ic = InitialConditions::new(1.0, 0.0, 0.0, 10.0);
    let traj = generate(&params, &ic, &SimulationOptions::default()).unwrap();
    assert_eq!(traj.len(), 1001);
    assert_eq!(traj.position[0], 1.0);
    for (t, y) in traj.time.iter().zip(&traj.position) {
        assert!((y - (2.0 * t).cos()).abs() < 1e-9);
    }
}

#[test]
fn scenario_critical_damping() {
    let params = SystemParameters::new(1.0, 4.0, 4.0, EquationKind::Damped);
    let derived = DerivedQuantities::compute(&params).unwrap();
    assert_eq!(derived.omega0, 2.0);
    assert_eq!(derived.regime, DampingRegime::Critical);
    assert_eq!(derived.regime.label(), "crítico");
    assert_eq!(derived.omega_d_or_zero(), 0.0);

    // legacy model: y0·e^{-ζω0t}·cos(ω0t)
    let ic = InitialConditions::new(1.0, 0.0, 0.0, 2.0);
    let traj = generate(&params, &ic, &SimulationOptions::default()).unwrap();
    for (t, y) in traj.time.iter().zip(&traj.position) {
        let expected = (-2.0 * t).exp() * (2.0 * t).cos();
        assert!((y - expected).abs() < 1e-12);
    }
}

#[test]
fn scenario_light_damping_amplitude_matches_brute_force() {
    let params = SystemParameters::new(1.0, 4.0, 0.2, EquationKind::Damped);
    let derived = DerivedQuantities::compute(&params).unwrap();
    assert!((derived.zeta - 0.05).abs() < 1e-15);
    assert_eq!(derived.regime, DampingRegime::Underdamped);

    let ic = InitialConditions::new(1.0, 0.0, 0.0, 10.0);
    let traj = generate(&params, &ic, &SimulationOptions::default()).unwrap();

    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for &y in &traj.position {
        if y > max {
            max = y;
        }
        if y < min {
            min = y;
        }
    }
    assert_eq!(traj.statistics.position_max, max);
    assert_eq!(traj.statistics.position_min, min);
    assert_eq!(traj.statistics.amplitude, max - min);
}

#[test]
fn equations_describe_the_sampled_solution() {
    let params = SystemParameters::new(2.0, 8.0, 1.0, EquationKind::Damped);
    let eq = render_equations(&params, 2.0, 0.0, OverdampedModel::Legacy).unwrap();
    assert_eq!(eq.differential, "2.00*y'' + 1.00*y' + 8.00*y = 0");
    // β = 0.25, ωd = 2·sqrt(1 - 0.125²) ≈ 1.98
    assert!(eq.position.starts_with("exp(-0.25*t)*(2.00*cos(1.98*t)"));
}

#[test]
fn every_example_generates() {
    for example in examples() {
        let p = &example.parameters;
        let ic = InitialConditions::new(p.y0, p.v0, 0.0, 10.0);
        let traj = generate(&p.system, &ic, &SimulationOptions::default()).unwrap();
        assert_eq!(traj.len(), 1001, "{}", example.name);
    }
}

#[test]
fn example_wire_shape() {
    let example = find_example("Fuerza Senoidal").unwrap();
    let json = serde_json::to_value(&example).unwrap();
    assert_eq!(json["nombre"], "Fuerza Senoidal");
    assert_eq!(json["parametros"]["masa"], 1.0);
    assert_eq!(json["parametros"]["fuerza"], "2*sin(2*t)");
    assert_eq!(json["parametros"]["tipo_ecuacion"], "amortiguado_forzado");
    assert_eq!(json["parametros"]["valor_inicial"], 0.0);
}

#[test]
fn session_round_trips_through_json_and_yaml() {
    let mut session = SessionState::default();
    session.apply_example(&find_example("Subamortiguado").unwrap());
    session.options.overdamped_model = OverdampedModel::Exact;
    session.playback.speed = 2.0;

    let json = serde_json::to_string(&session).unwrap();
    let from_json: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, session);

    let yaml = serde_yaml::to_string(&session).unwrap();
    let from_yaml: SessionState = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(from_yaml, session);
}

#[test]
fn session_drives_playback_and_display() {
    let clock = VirtualClock::new();
    let mut playback = Playback::with_interval(clock.clone(), std::time::Duration::from_millis(10));
    let mut session = SessionState::default();
    let traj = session.simulate(&mut playback).unwrap();

    playback.restore(&session.playback).unwrap();
    assert!(playback.start());
    clock.advance(std::time::Duration::from_millis(100));
    let tick = playback.tick();
    assert_eq!(tick.frame, 10);
    session.capture(&playback);
    assert_eq!(session.playback.frame, 10);
    assert!(session.playback.playing);

    let range = DisplayRange::fit(&traj.position).unwrap();
    let (_, sample) = traj.sample(tick.frame).unwrap();
    let x = range.normalize(sample.position);
    assert!((0.0..=1.0).contains(&x));
}
