//! Physical parameters, initial conditions and generator options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sm_core::units::{Damping, Mass};
use sm_core::{ensure_finite, ensure_non_negative, ensure_positive};

use crate::error::{SimError, SimResult};

/// Sample spacing used when no other step is requested (seconds).
pub const DEFAULT_DT: f64 = 0.01;

/// Which form of `m·y'' + b·y' + k·y = F(t)` the user picked.
///
/// Forced kinds are accepted but the forcing term never enters the numeric
/// solution; it only shows up in the rendered differential equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationKind {
    #[serde(rename = "no_amortiguado")]
    Undamped,
    #[serde(rename = "no_amortiguado_forzado")]
    UndampedForced,
    #[serde(rename = "amortiguado")]
    Damped,
    #[serde(rename = "amortiguado_forzado")]
    DampedForced,
}

impl EquationKind {
    pub const ALL: [EquationKind; 4] = [
        EquationKind::Damped,
        EquationKind::DampedForced,
        EquationKind::Undamped,
        EquationKind::UndampedForced,
    ];

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EquationKind::Undamped => "no_amortiguado",
            EquationKind::UndampedForced => "no_amortiguado_forzado",
            EquationKind::Damped => "amortiguado",
            EquationKind::DampedForced => "amortiguado_forzado",
        }
    }

    pub fn is_forced(self) -> bool {
        matches!(
            self,
            EquationKind::UndampedForced | EquationKind::DampedForced
        )
    }

    /// Whether the damping term appears in the equation of motion. True for
    /// every kind solved through the damped family.
    pub fn has_damping_term(self) -> bool {
        !self.is_simple_harmonic()
    }

    /// Only the plain undamped kind takes the simple harmonic branch; the
    /// undamped forced kind is routed through the damped family.
    pub fn is_simple_harmonic(self) -> bool {
        self == EquationKind::Undamped
    }
}

impl fmt::Display for EquationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquationKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| SimError::invalid(format!("unknown equation kind '{s}'")))
    }
}

/// Mass, spring and damper of the oscillator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemParameters {
    /// Mass `m` in kg.
    #[serde(rename = "masa")]
    pub mass: f64,
    /// Spring constant `k` in N/m.
    #[serde(rename = "constante_resorte")]
    pub spring_constant: f64,
    /// Viscous damping coefficient `b` in N·s/m.
    #[serde(rename = "constante_amortiguamiento")]
    pub damping: f64,
    /// Forcing expression `F(t)`. Display only.
    #[serde(rename = "fuerza", default = "default_forcing")]
    pub forcing: String,
    #[serde(rename = "tipo_ecuacion")]
    pub kind: EquationKind,
}

pub(crate) fn default_forcing() -> String {
    "0".to_string()
}

impl SystemParameters {
    pub fn new(mass: f64, spring_constant: f64, damping: f64, kind: EquationKind) -> Self {
        Self {
            mass,
            spring_constant,
            damping,
            forcing: default_forcing(),
            kind,
        }
    }

    /// Build from typed SI quantities.
    pub fn from_quantities(
        mass: Mass,
        spring_constant: f64,
        damping: Damping,
        kind: EquationKind,
    ) -> Self {
        use sm_core::uom::si::mass::kilogram;
        use sm_core::uom::si::mass_rate::kilogram_per_second;
        Self::new(
            mass.get::<kilogram>(),
            spring_constant,
            damping.get::<kilogram_per_second>(),
            kind,
        )
    }

    pub fn with_forcing(mut self, forcing: impl Into<String>) -> Self {
        self.forcing = forcing.into();
        self
    }

    /// `m > 0`, `k > 0`, `b >= 0`, all finite.
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.mass, "mass must be positive")?;
        ensure_positive(self.spring_constant, "spring constant must be positive")?;
        ensure_non_negative(self.damping, "damping coefficient must not be negative")?;
        Ok(())
    }
}

/// Initial state and simulated time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    /// Position at `t = 0` (m).
    #[serde(rename = "valor_inicial")]
    pub y0: f64,
    /// Velocity at `t = 0` (m/s).
    #[serde(rename = "velocidad_inicial")]
    pub v0: f64,
    /// First sampled instant (s).
    #[serde(rename = "step_time")]
    pub t_start: f64,
    /// Last sampled instant (s).
    #[serde(rename = "stop_time")]
    pub t_stop: f64,
}

impl InitialConditions {
    pub fn new(y0: f64, v0: f64, t_start: f64, t_stop: f64) -> Self {
        Self {
            y0,
            v0,
            t_start,
            t_stop,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.y0, "initial position")?;
        ensure_finite(self.v0, "initial velocity")?;
        ensure_finite(self.t_start, "start time")?;
        ensure_finite(self.t_stop, "stop time")?;
        if self.t_stop <= self.t_start {
            return Err(SimError::invalid("stop time must be after start time"));
        }
        Ok(())
    }

    pub fn window(&self) -> f64 {
        self.t_stop - self.t_start
    }
}

/// How the `ζ >= 1` branch is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdampedModel {
    /// `y0·exp(-ζω0t)·cos(ω0t)`. Not a solution of the IVP for `ζ >= 1`, kept
    /// so results stay numerically identical across front ends.
    #[default]
    Legacy,
    /// Repeated-root and two-real-root solutions fitted to `y0`, `v0`.
    Exact,
}

/// Options for trajectory generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Fixed sample spacing (seconds)
    pub dt: f64,
    /// Model used when `ζ >= 1`
    #[serde(default)]
    pub overdamped_model: OverdampedModel,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            overdamped_model: OverdampedModel::default(),
        }
    }
}

impl SimulationOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.dt, "time step must be positive")?;
        Ok(())
    }
}
