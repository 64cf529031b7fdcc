//! Service operations: simulate, equations, examples, info and health.

use sm_core::timing::{PerfStats, Timer};
use sm_sim::{
    DerivedQuantities, EquationKind, Example, InitialConditions, SimulationOptions,
    SystemParameters, examples, generate, render_equations,
};
use tracing::{debug, info};

use crate::config::{AppConfig, ServiceLimits};
use crate::error::{AppError, AppResult};
use crate::wire::{
    EquationsRequest, EquationsResponse, HealthStatus, NumberInput, ParameterGlossary,
    ResponseParameters, SimulationRequest, SimulationResponse, SystemInfo, SystemReport,
};

pub const EQUATION_TEMPLATE: &str = "m·y'' + b·y' + k·y = F(t)";

fn invalid(message: impl Into<String>) -> AppError {
    AppError::InvalidInput(message.into())
}

fn required(field: &Option<NumberInput>, name: &'static str) -> AppResult<f64> {
    field
        .as_ref()
        .ok_or_else(|| invalid(format!("Campos requeridos faltantes: {name}")))?
        .parse(name)
}

fn or_default(field: &Option<NumberInput>, name: &'static str, default: f64) -> AppResult<f64> {
    field.as_ref().map_or(Ok(default), |v| v.parse(name))
}

fn parse_kind(raw: &str) -> AppResult<EquationKind> {
    raw.parse()
        .map_err(|_| invalid(format!("Tipo de ecuación no válido: '{raw}'")))
}

/// Parameter checks shared by every operation, with client-facing messages.
fn check_system(system: &SystemParameters) -> AppResult<()> {
    if !(system.mass > 0.0) {
        return Err(invalid("La masa debe ser positiva"));
    }
    if !(system.spring_constant > 0.0) {
        return Err(invalid("La constante del resorte debe ser positiva"));
    }
    if system.damping < 0.0 {
        return Err(invalid("La constante de amortiguamiento no puede ser negativa"));
    }
    Ok(())
}

fn check_window(initial: &InitialConditions, limits: &ServiceLimits) -> AppResult<()> {
    if initial.t_stop <= initial.t_start {
        return Err(invalid("El tiempo final debe ser mayor al tiempo inicial"));
    }
    if initial.t_start < 0.0 {
        return Err(invalid("El tiempo inicial no puede ser negativo"));
    }
    if initial.window() > limits.max_simulation_time {
        return Err(invalid(format!(
            "El tiempo de simulación no puede exceder {:?} segundos",
            limits.max_simulation_time
        )));
    }
    Ok(())
}

/// Validate a simulation request into generator inputs.
pub fn parse_simulation_request(
    request: &SimulationRequest,
    limits: &ServiceLimits,
) -> AppResult<(SystemParameters, InitialConditions)> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(invalid(format!(
            "Campos requeridos faltantes: {}",
            missing.join(", ")
        )));
    }

    let mass = required(&request.mass, "masa")?;
    let spring_constant = required(&request.spring_constant, "constante_resorte")?;
    let damping = required(&request.damping, "constante_amortiguamiento")?;
    let t_start = required(&request.t_start, "step_time")?;
    let t_stop = required(&request.t_stop, "stop_time")?;
    let y0 = required(&request.y0, "valor_inicial")?;
    let v0 = required(&request.v0, "velocidad_inicial")?;
    let kind = parse_kind(request.kind.as_deref().unwrap_or_default())?;

    let mut system = SystemParameters::new(mass, spring_constant, damping, kind);
    if let Some(forcing) = &request.forcing {
        system.forcing = forcing.clone();
    }
    let initial = InitialConditions::new(y0, v0, t_start, t_stop);

    check_system(&system)?;
    check_window(&initial, limits)?;
    Ok((system, initial))
}

/// Validate an equations request, filling absent fields with defaults.
pub fn parse_equations_request(
    request: &EquationsRequest,
) -> AppResult<(SystemParameters, f64, f64)> {
    let mass = or_default(&request.mass, "masa", 1.0)?;
    let spring_constant = or_default(&request.spring_constant, "constante_resorte", 4.0)?;
    let damping = or_default(&request.damping, "constante_amortiguamiento", 0.0)?;
    let y0 = or_default(&request.y0, "valor_inicial", 1.0)?;
    let v0 = or_default(&request.v0, "velocidad_inicial", 0.0)?;
    let kind = match request.kind.as_deref() {
        Some(raw) => parse_kind(raw)?,
        None => EquationKind::Damped,
    };

    let mut system = SystemParameters::new(mass, spring_constant, damping, kind);
    if let Some(forcing) = &request.forcing {
        system.forcing = forcing.clone();
    }
    check_system(&system)?;
    Ok((system, y0, v0))
}

/// Check an already assembled parameter set against the service limits and
/// build the generator options for it. The time step is widened past the
/// point cap the same way served requests are.
pub fn simulation_options(
    system: &SystemParameters,
    initial: &InitialConditions,
    config: &AppConfig,
) -> AppResult<SimulationOptions> {
    check_system(system)?;
    check_window(initial, &config.limits)?;
    Ok(SimulationOptions {
        dt: config.limits.time_step_for(initial.window()),
        overdamped_model: config.overdamped_model,
    })
}

/// Run a simulation request.
pub fn simulate(request: &SimulationRequest, config: &AppConfig) -> AppResult<SimulationResponse> {
    simulate_with_stats(request, config).map(|(response, _)| response)
}

/// Run a simulation request and report where the time went.
pub fn simulate_with_stats(
    request: &SimulationRequest,
    config: &AppConfig,
) -> AppResult<(SimulationResponse, PerfStats)> {
    let (system, initial) = parse_simulation_request(request, &config.limits)?;
    let options = simulation_options(&system, &initial, config)?;

    let mut stats = PerfStats::default();

    let timer = Timer::start("generate");
    let trajectory = generate(&system, &initial, &options)?;
    stats.generate_time_s = timer.stop().unwrap_or(0.0);
    stats.samples = trajectory.len();

    let timer = Timer::start("render");
    let equations = render_equations(&system, initial.y0, initial.v0, options.overdamped_model)?;
    stats.render_time_s = timer.stop().unwrap_or(0.0);

    info!(
        kind = %system.kind,
        regime = %trajectory.derived.regime,
        samples = trajectory.len(),
        dt = options.dt,
        "simulation request served"
    );

    let derived = trajectory.derived;
    let response = SimulationResponse {
        equations,
        parameters: ResponseParameters {
            system,
            report: SystemReport::from(&derived),
            omega0: derived.omega0,
        },
        statistics: trajectory.statistics,
        time: trajectory.time,
        position: trajectory.position,
        velocity: trajectory.velocity,
        acceleration: trajectory.acceleration,
    };
    Ok((response, stats))
}

/// Render the equations for a parameter set.
pub fn equations(request: &EquationsRequest, config: &AppConfig) -> AppResult<EquationsResponse> {
    let (system, y0, v0) = parse_equations_request(request)?;
    let derived = DerivedQuantities::compute(&system)?;
    let equations = render_equations(&system, y0, v0, config.overdamped_model)?;
    debug!(kind = %system.kind, regime = %derived.regime, "equations rendered");
    Ok(EquationsResponse {
        equations,
        system: SystemReport::from(&derived),
    })
}

/// The example library.
pub fn list_examples() -> Vec<Example> {
    examples()
}

pub fn system_info(config: &AppConfig) -> SystemInfo {
    SystemInfo {
        equation: EQUATION_TEMPLATE.to_string(),
        parameters: ParameterGlossary {
            m: "Masa del sistema (kg)".to_string(),
            k: "Constante del resorte (N/m)".to_string(),
            b: "Constante de amortiguamiento (N·s/m)".to_string(),
            forcing: "Fuerza externa función del tiempo (N)".to_string(),
        },
        kinds: EquationKind::ALL.to_vec(),
        limits: config.limits,
    }
}

pub fn health() -> HealthStatus {
    HealthStatus {
        status: "OK".to_string(),
        message: "Servicio de simulación funcionando correctamente".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
