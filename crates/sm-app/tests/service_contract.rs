//! Integration test: service operations and their wire shapes.

use std::cell::Cell;
use std::path::PathBuf;

use sm_app::{
    AppConfig, AppError, AppResult, EquationsRequest, EquationsResponse, FallbackBackend,
    HealthStatus, LocalBackend, ServiceStatus, SimulationBackend, SimulationRequest,
    SimulationResponse, equations, list_examples, simulate, simulate_with_stats,
};
use sm_sim::{EquationKind, Example, InitialConditions, OverdampedModel, SystemParameters};

fn request_for(system: &SystemParameters, t_stop: f64) -> SimulationRequest {
    SimulationRequest::from_parts(system, &InitialConditions::new(1.0, 0.0, 0.0, t_stop))
}

#[test]
fn simulate_response_shape() {
    let system = SystemParameters::new(1.0, 4.0, 0.2, EquationKind::Damped);
    let response = simulate(&request_for(&system, 10.0), &AppConfig::default()).unwrap();
    assert_eq!(response.time.len(), 1001);
    assert_eq!(response.acceleration.len(), 1001);

    let json = serde_json::to_value(&response).unwrap();
    for key in [
        "tiempo",
        "posicion",
        "velocidad",
        "aceleracion",
        "ecuaciones",
        "parametros",
        "estadisticas",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    let params = &json["parametros"];
    assert_eq!(params["masa"], 1.0);
    assert_eq!(params["tipo_ecuacion"], "amortiguado");
    assert_eq!(params["tipo_amortiguamiento"], "subamortiguado");
    assert_eq!(params["omega_0"], 2.0);
    assert_eq!(params["frecuencia_natural"], 2.0);
    assert!((params["coeficiente_amortiguamiento"].as_f64().unwrap() - 0.05).abs() < 1e-12);
    assert!(json["ecuaciones"]["posicion_latex"].is_string());
    assert!(json["estadisticas"]["amplitud"].as_f64().unwrap() > 0.0);

    // and back again
    let text = serde_json::to_string(&response).unwrap();
    let parsed: SimulationResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.parameters.system.kind, EquationKind::Damped);
}

#[test]
fn request_accepts_raw_json() {
    let body = r#"{
        "masa": 1, "constante_resorte": 4, "constante_amortiguamiento": 4,
        "tipo_ecuacion": "amortiguado", "step_time": 0, "stop_time": "2",
        "valor_inicial": 1, "velocidad_inicial": 0
    }"#;
    let request: SimulationRequest = serde_json::from_str(body).unwrap();
    let response = simulate(&request, &AppConfig::default()).unwrap();
    assert_eq!(response.time.len(), 201);
    assert_eq!(response.parameters.report.regime.label(), "crítico");
    assert_eq!(response.parameters.system.forcing, "0");
}

#[test]
fn point_cap_widens_time_step() {
    let system = SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped);
    let config = AppConfig::default();
    let response = simulate(&request_for(&system, 100.0), &config).unwrap();
    let n = response.time.len();
    assert!(n <= config.limits.max_time_points);
    assert!(n >= config.limits.max_time_points - 1);
    let dt = response.time[1] - response.time[0];
    assert!((dt - 100.0 / 9999.0).abs() < 1e-12);
}

#[test]
fn extreme_scales_are_rejected_as_bad_input() {
    let system = SystemParameters::new(1e-200, 1e-200, 1.0, EquationKind::Damped);
    let err = simulate(&request_for(&system, 1.0), &AppConfig::default()).unwrap_err();
    assert!(err.is_client_error(), "{err:?}");
    assert!(err.to_response().error.starts_with("Parámetro no válido"));

    let eq = equations(
        &EquationsRequest::from_parts(&system, 1.0, 0.0),
        &AppConfig::default(),
    );
    assert!(eq.unwrap_err().is_client_error());
}

#[test]
fn stats_count_samples() {
    let system = SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped);
    let (response, stats) =
        simulate_with_stats(&request_for(&system, 1.0), &AppConfig::default()).unwrap();
    assert_eq!(stats.samples, response.time.len());
}

#[test]
fn exact_model_from_config() {
    let system = SystemParameters::new(1.0, 4.0, 4.0, EquationKind::Damped);
    let config = AppConfig {
        overdamped_model: OverdampedModel::Exact,
        ..AppConfig::default()
    };
    let eq = equations(&EquationsRequest::from_parts(&system, 1.0, 0.0), &config).unwrap();
    assert_eq!(eq.equations.position, "(1.00 + 2.00*t)*exp(-2.00*t)");
    assert_eq!(eq.system.omega_d, 0.0);
}

#[test]
fn equations_response_shape() {
    let eq = equations(&EquationsRequest::default(), &AppConfig::default()).unwrap();
    let json = serde_json::to_value(&eq).unwrap();
    // zero damping drops the y' term
    assert_eq!(json["ecuaciones"]["diferencial"], "1.00*y'' + 4.00*y = 0");
    assert_eq!(json["parametros_sistema"]["tipo_amortiguamiento"], "subamortiguado");
    let period = json["parametros_sistema"]["periodo"].as_f64().unwrap();
    assert!((period - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn examples_simulate_cleanly() {
    for example in list_examples() {
        let p = &example.parameters;
        let request = SimulationRequest::from_parts(
            &p.system,
            &InitialConditions::new(p.y0, p.v0, 0.0, 10.0),
        );
        assert!(simulate(&request, &AppConfig::default()).is_ok(), "{}", example.name);
    }
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sm-app-{}-{name}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn config_files_in_json_and_yaml() {
    let json = temp_file(
        "limits.json",
        r#"{"limits": {"max_simulation_time": 5.0}, "overdamped_model": "exact"}"#,
    );
    let config = AppConfig::from_file(&json).unwrap();
    assert_eq!(config.limits.max_simulation_time, 5.0);
    assert_eq!(config.limits.max_time_points, 10_000);
    assert_eq!(config.overdamped_model, OverdampedModel::Exact);

    let system = SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped);
    let err = simulate(&request_for(&system, 6.0), &config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "El tiempo de simulación no puede exceder 5.0 segundos"
    );

    let yaml = temp_file("limits.yaml", "limits:\n  puntos_maximos: 1\n");
    assert!(matches!(AppConfig::from_file(&yaml), Err(AppError::Config(_))));

    let missing = std::env::temp_dir().join("sm-app-does-not-exist.yaml");
    assert!(matches!(
        AppConfig::from_file(&missing),
        Err(AppError::FileRead { .. })
    ));

    std::fs::remove_file(json).ok();
    std::fs::remove_file(yaml).ok();
}

/// Remote stand-in that answers like the local service until taken down.
struct RemoteService {
    inner: LocalBackend,
    up: Cell<bool>,
}

impl RemoteService {
    fn guard(&self) -> AppResult<()> {
        if self.up.get() {
            Ok(())
        } else {
            Err(AppError::ServiceUnavailable {
                message: "connection refused".to_string(),
            })
        }
    }
}

impl SimulationBackend for RemoteService {
    fn name(&self) -> &str {
        "remote"
    }

    fn health(&self) -> AppResult<HealthStatus> {
        self.guard()?;
        self.inner.health()
    }

    fn simulate(&self, request: &SimulationRequest) -> AppResult<SimulationResponse> {
        self.guard()?;
        self.inner.simulate(request)
    }

    fn equations(&self, request: &EquationsRequest) -> AppResult<EquationsResponse> {
        self.guard()?;
        self.inner.equations(request)
    }

    fn examples(&self) -> AppResult<Vec<Example>> {
        self.guard()?;
        self.inner.examples()
    }
}

#[test]
fn fallback_gives_identical_results() {
    let backend = FallbackBackend::new(
        RemoteService {
            inner: LocalBackend::default(),
            up: Cell::new(true),
        },
        LocalBackend::default(),
    );
    let system = SystemParameters::new(2.0, 8.0, 1.0, EquationKind::Damped);
    let request = request_for(&system, 5.0);

    let online = backend.simulate(&request).unwrap();
    assert_eq!(backend.status(), ServiceStatus::Online);

    backend.remote().up.set(false);
    let offline = backend.simulate(&request).unwrap();
    assert_eq!(backend.status(), ServiceStatus::Offline);
    assert_eq!(online, offline);

    // client errors are reported, not masked by the fallback
    let mut bad = request.clone();
    bad.mass = None;
    let err = backend.simulate(&bad).unwrap_err();
    assert!(err.is_client_error());
}
