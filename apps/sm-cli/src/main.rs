use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sm_app::{
    AppConfig, AppError, AppResult, EquationsRequest, SimulationRequest, SimulationResponse,
    service,
};
use sm_core::timing::enable_timing;
use sm_core::units::{kg, m, stiffness_from_static_deflection};
use sm_sim::{
    DisplayRange, EquationKind, InitialConditions, Playback, SessionState, SystemClock,
    SystemParameters, Trajectory, find_example,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(about = "SpringMass CLI - Spring-mass-damper trajectory generator", long_about = None)]
struct Cli {
    /// Service config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a trajectory
    Simulate {
        #[command(flatten)]
        system: SystemArgs,
        /// Read a JSON simulation request instead of using flags
        #[arg(long, conflicts_with = "preset")]
        request: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print generate/render timings (same as SM_TIMING=1)
        #[arg(long)]
        timing: bool,
    },
    /// Show the differential equation and its closed-form solution
    Equations {
        #[command(flatten)]
        system: SystemArgs,
        /// Print LaTeX instead of plain text
        #[arg(long)]
        latex: bool,
    },
    /// List the built-in examples
    Examples,
    /// Show model description and service limits
    Info,
    /// Check the simulation service
    Health,
    /// Animate a trajectory in the terminal
    Play {
        #[command(flatten)]
        system: SystemArgs,
        /// Playback speed multiplier (0.25 to 4)
        #[arg(long)]
        speed: Option<f64>,
        /// Animation ticks per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Session file to resume from and save to (YAML)
        #[arg(long)]
        session: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Yaml,
    Csv,
}

#[derive(Args, Debug, Clone)]
struct SystemArgs {
    /// Start from a named example
    #[arg(long)]
    preset: Option<String>,
    /// Mass in kg
    #[arg(long)]
    mass: Option<f64>,
    /// Spring constant in N/m
    #[arg(long)]
    spring: Option<f64>,
    /// Static deflection in m of the mass hanging on the spring; sets the spring constant
    #[arg(long, conflicts_with = "spring")]
    deflection: Option<f64>,
    /// Damping coefficient in N·s/m
    #[arg(long)]
    damping: Option<f64>,
    /// Equation kind (amortiguado, amortiguado_forzado, no_amortiguado, no_amortiguado_forzado)
    #[arg(long)]
    kind: Option<EquationKind>,
    /// Forcing expression F(t), display only
    #[arg(long)]
    forcing: Option<String>,
    /// Initial position in m
    #[arg(long, allow_negative_numbers = true)]
    y0: Option<f64>,
    /// Initial velocity in m/s
    #[arg(long, allow_negative_numbers = true)]
    v0: Option<f64>,
    /// Start time in seconds
    #[arg(long)]
    t_start: Option<f64>,
    /// Stop time in seconds
    #[arg(long)]
    t_stop: Option<f64>,
}

impl SystemArgs {
    /// Apply the preset, then individual flags, on top of `session`.
    fn apply(&self, session: &mut SessionState) -> AppResult<()> {
        if let Some(name) = &self.preset {
            let example = find_example(name)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown example: {name}")))?;
            session.apply_example(&example);
        }
        let system = &mut session.system;
        if let Some(v) = self.mass {
            system.mass = v;
        }
        if let Some(v) = self.spring {
            system.spring_constant = v;
        }
        if let Some(v) = self.damping {
            system.damping = v;
        }
        if let Some(d) = self.deflection {
            if d.is_nan() || d <= 0.0 {
                return Err(AppError::InvalidInput(
                    "La deflexión estática debe ser positiva".to_string(),
                ));
            }
            system.spring_constant = stiffness_from_static_deflection(kg(system.mass), m(d));
        }
        if let Some(kind) = self.kind {
            system.kind = kind;
        }
        if let Some(forcing) = &self.forcing {
            system.forcing = forcing.clone();
        }
        let initial = &mut session.initial;
        if let Some(v) = self.y0 {
            initial.y0 = v;
        }
        if let Some(v) = self.v0 {
            initial.v0 = v;
        }
        if let Some(v) = self.t_start {
            initial.t_start = v;
        }
        if let Some(v) = self.t_stop {
            initial.t_stop = v;
        }
        Ok(())
    }

    fn resolve(&self) -> AppResult<(SystemParameters, InitialConditions)> {
        let mut session = SessionState::default();
        self.apply(&mut session)?;
        Ok((session.system, session.initial))
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            system,
            request,
            format,
            output,
            timing,
        } => {
            if timing {
                enable_timing();
            }
            cmd_simulate(
                &config,
                &system,
                request.as_deref(),
                format,
                output.as_deref(),
            )
        }
        Commands::Equations { system, latex } => cmd_equations(&config, &system, latex),
        Commands::Examples => cmd_examples(),
        Commands::Info => cmd_info(&config),
        Commands::Health => cmd_health(),
        Commands::Play {
            system,
            speed,
            fps,
            session,
        } => cmd_play(&config, &system, speed, fps, session.as_deref()),
    }
}

fn emit(text: &str, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, text)?;
        println!("✓ Wrote {}", path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn cmd_simulate(
    config: &AppConfig,
    system: &SystemArgs,
    request_path: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
) -> AppResult<()> {
    let request = match request_path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            serde_json::from_str(&content)?
        }
        None => {
            let (params, initial) = system.resolve()?;
            SimulationRequest::from_parts(&params, &initial)
        }
    };

    let (response, stats) = service::simulate_with_stats(&request, config)?;
    info!(samples = response.time.len(), "trajectory ready");

    match format {
        OutputFormat::Summary => print_summary(&response),
        OutputFormat::Json => emit(&to_json(&response)?, output)?,
        OutputFormat::Yaml => emit(&serde_yaml::to_string(&response)?, output)?,
        OutputFormat::Csv => emit(&to_csv(&response), output)?,
    }
    stats.print_summary();
    Ok(())
}

fn to_csv(response: &SimulationResponse) -> String {
    let mut csv = String::from("time_s,position_m,velocity_mps,acceleration_mps2\n");
    for i in 0..response.time.len() {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            response.time[i], response.position[i], response.velocity[i], response.acceleration[i]
        ));
    }
    csv
}

fn print_summary(response: &SimulationResponse) {
    let p = &response.parameters;
    let s = &response.statistics;
    println!(
        "System: m={} kg, k={} N/m, b={} N·s/m ({})",
        p.system.mass, p.system.spring_constant, p.system.damping, p.system.kind
    );
    println!(
        "  ω0={:.4} rad/s  ζ={:.4}  β={:.4}  ωd={:.4} rad/s  T={:.4} s",
        p.omega0, p.report.damping_ratio, p.report.beta, p.report.omega_d, p.report.period
    );
    println!("  Regime: {}", p.report.regime);
    println!("Equations:");
    println!("  {}", response.equations.differential);
    println!("  y(t) = {}", response.equations.position);
    println!("  v(t) = {}", response.equations.velocity);
    println!("  a(t) = {}", response.equations.acceleration);
    println!("Statistics:");
    println!(
        "  position:     [{:.4}, {:.4}]  amplitude={:.4}",
        s.position_min, s.position_max, s.amplitude
    );
    println!("  velocity:     [{:.4}, {:.4}]", s.velocity_min, s.velocity_max);
    println!(
        "  acceleration: [{:.4}, {:.4}]",
        s.acceleration_min, s.acceleration_max
    );
    if let (Some(first), Some(last)) = (response.time.first(), response.time.last()) {
        println!(
            "✓ Simulated {} samples over [{}, {}] s",
            response.time.len(),
            first,
            last
        );
    }
}

fn cmd_equations(config: &AppConfig, system: &SystemArgs, latex: bool) -> AppResult<()> {
    let (params, initial) = system.resolve()?;
    let request = EquationsRequest::from_parts(&params, initial.y0, initial.v0);
    let response = service::equations(&request, config)?;
    let eq = &response.equations;

    if latex {
        println!("{}", eq.differential_latex);
        println!("y(t) = {}", eq.position_latex);
        println!("v(t) = {}", eq.velocity_latex);
        println!("a(t) = {}", eq.acceleration_latex);
    } else {
        println!("{}", eq.differential);
        println!("y(t) = {}", eq.position);
        println!("v(t) = {}", eq.velocity);
        println!("a(t) = {}", eq.acceleration);
    }
    println!(
        "Regime: {} (ζ={:.4})",
        response.system.regime, response.system.damping_ratio
    );
    Ok(())
}

fn cmd_examples() -> AppResult<()> {
    let examples = service::list_examples();
    println!("Examples:");
    for ex in examples {
        let p = &ex.parameters;
        println!(
            "  {} - {} (m={}, k={}, b={}, {}, y0={})",
            ex.name, ex.description, p.system.mass, p.system.spring_constant, p.system.damping,
            p.system.kind, p.y0
        );
    }
    Ok(())
}

fn cmd_info(config: &AppConfig) -> AppResult<()> {
    print!("{}", to_json(&service::system_info(config))?);
    Ok(())
}

fn cmd_health() -> AppResult<()> {
    let health = service::health();
    println!("✓ {} - {} (v{})", health.status, health.message, health.version);
    Ok(())
}

fn load_session(path: &Path) -> AppResult<SessionState> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

fn cmd_play(
    config: &AppConfig,
    system: &SystemArgs,
    speed: Option<f64>,
    fps: u32,
    session_path: Option<&Path>,
) -> AppResult<()> {
    let (mut session, resumed) = match session_path {
        Some(path) if path.exists() => {
            println!("Resuming session: {}", path.display());
            (load_session(path)?, true)
        }
        _ => (SessionState::default(), false),
    };
    system.apply(&mut session)?;

    let mut options = service::simulation_options(&session.system, &session.initial, config)?;
    if resumed {
        // a resumed session keeps the model it was saved with
        if session.options.overdamped_model != config.overdamped_model {
            info!(
                session = ?session.options.overdamped_model,
                config = ?config.overdamped_model,
                "keeping overdamped model from session"
            );
        }
        options.overdamped_model = session.options.overdamped_model;
    }
    session.options = options;
    if let Some(speed) = speed {
        session.playback.speed = speed;
    }

    let interval = Duration::from_secs(1) / fps.max(1);
    let mut playback = Playback::with_interval(SystemClock::default(), interval);
    let trajectory = session.simulate(&mut playback)?;
    let range = DisplayRange::fit(&trajectory.position)?;

    println!(
        "Playing {} frames at {}x ({})",
        trajectory.len(),
        playback.speed(),
        trajectory.derived.regime
    );
    playback.start();
    render_frame(&trajectory, playback.frame(), &range);
    while playback.is_playing() {
        std::thread::sleep(playback.interval());
        let tick = playback.tick();
        if tick.advanced > 0 {
            render_frame(&trajectory, tick.frame, &range);
        }
    }
    println!();
    println!("✓ Playback finished");

    session.capture(&playback);
    if let Some(path) = session_path {
        std::fs::write(path, serde_yaml::to_string(&session)?)?;
        println!("✓ Saved session to {}", path.display());
    }
    Ok(())
}

fn render_frame(trajectory: &Trajectory, frame: usize, range: &DisplayRange) {
    let Some((t, sample)) = trajectory.sample(frame) else {
        return;
    };
    let width = 40usize;
    let x = range.normalize(sample.position).clamp(0.0, 1.0);
    let pos = (x * (width - 1) as f64).round() as usize;
    let track = format!("{}O{}", "~".repeat(pos), " ".repeat(width - 1 - pos));
    print!(
        "\r|{}|  t={:>7.2}s  y={:>+8.4}  v={:>+8.4}",
        track, t, sample.position, sample.velocity
    );
    let _ = io::stdout().flush();
}
