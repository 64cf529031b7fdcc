//! Regime selection: picks the closed-form position, velocity and
//! acceleration for a parameter set.

use serde::{Deserialize, Serialize};

use crate::derived::{DampingRegime, DerivedQuantities};
use crate::error::{SimError, SimResult};
use crate::expr::Expr;
use crate::params::{OverdampedModel, SystemParameters};

/// Which closed form was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionBranch {
    SimpleHarmonic,
    Underdamped,
    /// `ζ >= 1` under [`OverdampedModel::Legacy`].
    LegacyDecay,
    Critical,
    Overdamped,
}

/// One sample of the motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

/// Position, velocity and acceleration as closed-form expressions of `t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedForm {
    pub branch: SolutionBranch,
    pub position: Expr,
    pub velocity: Expr,
    pub acceleration: Expr,
}

impl ClosedForm {
    /// Select the solution for `params` with initial state `(y0, v0)` at `t = 0`.
    pub fn select(
        params: &SystemParameters,
        derived: &DerivedQuantities,
        y0: f64,
        v0: f64,
        model: OverdampedModel,
    ) -> SimResult<Self> {
        let omega0 = derived.omega0;
        if omega0 <= 0.0 || !omega0.is_finite() {
            return Err(SimError::Invariant {
                what: "natural frequency must be positive",
            });
        }

        if params.kind.is_simple_harmonic() {
            let position = Expr::DampedSinusoid {
                decay: 0.0,
                omega: omega0,
                cos_coef: y0,
                sin_coef: v0 / omega0,
            };
            let velocity = position.derivative();
            let acceleration = velocity.derivative();
            return Self::checked(SolutionBranch::SimpleHarmonic, position, velocity, acceleration);
        }

        let zeta = derived.zeta;
        let sigma = derived.decay_rate();
        let (branch, position) = match (derived.regime, model) {
            (DampingRegime::Underdamped, _) => {
                let omega_d = derived.omega_d.ok_or(SimError::Invariant {
                    what: "damped frequency missing for underdamped regime",
                })?;
                if omega_d <= 0.0 {
                    return Err(SimError::Invariant {
                        what: "damped frequency must be positive",
                    });
                }
                let a = y0;
                let b = (v0 + zeta * omega0 * a) / omega_d;
                (
                    SolutionBranch::Underdamped,
                    Expr::DampedSinusoid {
                        decay: sigma,
                        omega: omega_d,
                        cos_coef: a,
                        sin_coef: b,
                    },
                )
            }
            (_, OverdampedModel::Legacy) => (
                SolutionBranch::LegacyDecay,
                Expr::DampedSinusoid {
                    decay: sigma,
                    omega: omega0,
                    cos_coef: y0,
                    sin_coef: 0.0,
                },
            ),
            (DampingRegime::Critical, OverdampedModel::Exact) => (
                SolutionBranch::Critical,
                Expr::PolyExp {
                    rate: omega0,
                    c0: y0,
                    c1: v0 + omega0 * y0,
                },
            ),
            (DampingRegime::Overdamped, OverdampedModel::Exact) => {
                let root = omega0 * (zeta * zeta - 1.0).sqrt();
                let r1 = -sigma + root;
                let r2 = -sigma - root;
                let c1 = (v0 - r2 * y0) / (r1 - r2);
                (
                    SolutionBranch::Overdamped,
                    Expr::TwoExp {
                        c1,
                        r1,
                        c2: y0 - c1,
                        r2,
                    },
                )
            }
        };

        // m·a + b·v + k·y = 0 gives the acceleration without a second derivative.
        let velocity = position.derivative();
        let k_over_m = params.spring_constant / params.mass;
        let b_over_m = params.damping / params.mass;
        let acceleration = position.combine(-k_over_m, &velocity, -b_over_m)?;
        Self::checked(branch, position, velocity, acceleration)
    }

    fn checked(
        branch: SolutionBranch,
        position: Expr,
        velocity: Expr,
        acceleration: Expr,
    ) -> SimResult<Self> {
        if !(position.is_finite() && velocity.is_finite() && acceleration.is_finite()) {
            return Err(SimError::Invariant {
                what: "closed-form coefficients must be finite",
            });
        }
        Ok(Self {
            branch,
            position,
            velocity,
            acceleration,
        })
    }

    pub fn sample(&self, t: f64) -> MotionSample {
        MotionSample {
            position: self.position.eval(t),
            velocity: self.velocity.eval(t),
            acceleration: self.acceleration.eval(t),
        }
    }
}
