//! Quantities derived from `(m, k, b)`: natural frequency, damping ratio and
//! the damping regime.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::params::SystemParameters;

/// `|ζ - 1|` below this counts as critical damping.
pub const CRITICAL_TOLERANCE: f64 = 1e-12;

/// Damping regime selected by the damping ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DampingRegime {
    #[serde(rename = "subamortiguado")]
    Underdamped,
    #[serde(rename = "crítico")]
    Critical,
    #[serde(rename = "sobreamortiguado")]
    Overdamped,
}

impl DampingRegime {
    /// `ζ < 1` is underdamped, `ζ ≈ 1` critical, anything above overdamped.
    pub fn classify(zeta: f64) -> Self {
        if zeta < 1.0 {
            DampingRegime::Underdamped
        } else if (zeta - 1.0).abs() < CRITICAL_TOLERANCE {
            DampingRegime::Critical
        } else {
            DampingRegime::Overdamped
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DampingRegime::Underdamped => "subamortiguado",
            DampingRegime::Critical => "crítico",
            DampingRegime::Overdamped => "sobreamortiguado",
        }
    }
}

impl fmt::Display for DampingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only quantities shared by the generator and the equation renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantities {
    /// `ω0 = sqrt(k/m)` (rad/s)
    pub omega0: f64,
    /// `ζ = b / (2·sqrt(m·k))`
    pub zeta: f64,
    /// `β = b / (2m)` (1/s)
    pub beta: f64,
    pub regime: DampingRegime,
    /// `ωd = ω0·sqrt(1-ζ²)`, only when underdamped
    pub omega_d: Option<f64>,
    /// `2π/ω0` (s)
    pub period: f64,
}

impl DerivedQuantities {
    /// Validates `params` and derives the oscillator quantities.
    pub fn compute(params: &SystemParameters) -> SimResult<Self> {
        params.validate()?;
        let (m, k, b) = (params.mass, params.spring_constant, params.damping);

        let omega0 = (k / m).sqrt();
        let zeta = if b > 0.0 {
            b / (2.0 * (m * k).sqrt())
        } else {
            0.0
        };
        // extreme but individually valid inputs can still overflow or underflow
        if !(omega0.is_finite() && omega0 > 0.0 && zeta.is_finite()) {
            return Err(SimError::invalid(
                "mass, spring constant and damping give a non-finite natural frequency or damping ratio",
            ));
        }
        let regime = DampingRegime::classify(zeta);
        let omega_d = match regime {
            DampingRegime::Underdamped => Some(omega0 * (1.0 - zeta * zeta).sqrt()),
            _ => None,
        };

        Ok(Self {
            omega0,
            zeta,
            beta: b / (2.0 * m),
            regime,
            omega_d,
            period: 2.0 * PI / omega0,
        })
    }

    /// Decay rate of the envelope, `ζ·ω0`.
    pub fn decay_rate(&self) -> f64 {
        self.zeta * self.omega0
    }

    /// `ωd`, or `0.0` outside the underdamped regime.
    pub fn omega_d_or_zero(&self) -> f64 {
        self.omega_d.unwrap_or(0.0)
    }
}
