//! Closed-form expressions of time used by the oscillator solutions.
//!
//! Every regime's position, velocity and acceleration share one shape, so
//! the equation-of-motion substitution `a = -(k/m)·y - (b/m)·v` can be folded
//! into coefficients once instead of per sample.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A function of time with a fixed analytic shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Expr {
    /// `exp(-decay·t)·(cos_coef·cos(omega·t) + sin_coef·sin(omega·t))`
    DampedSinusoid {
        decay: f64,
        omega: f64,
        cos_coef: f64,
        sin_coef: f64,
    },
    /// `(c0 + c1·t)·exp(-rate·t)`
    PolyExp { rate: f64, c0: f64, c1: f64 },
    /// `c1·exp(r1·t) + c2·exp(r2·t)`
    TwoExp { c1: f64, r1: f64, c2: f64, r2: f64 },
}

impl Expr {
    pub fn eval(&self, t: f64) -> f64 {
        match *self {
            Expr::DampedSinusoid {
                decay,
                omega,
                cos_coef,
                sin_coef,
            } => {
                let (s, c) = (omega * t).sin_cos();
                (-decay * t).exp() * (cos_coef * c + sin_coef * s)
            }
            Expr::PolyExp { rate, c0, c1 } => (c0 + c1 * t) * (-rate * t).exp(),
            Expr::TwoExp { c1, r1, c2, r2 } => c1 * (r1 * t).exp() + c2 * (r2 * t).exp(),
        }
    }

    /// Exact time derivative, same shape.
    pub fn derivative(&self) -> Expr {
        match *self {
            Expr::DampedSinusoid {
                decay,
                omega,
                cos_coef,
                sin_coef,
            } => Expr::DampedSinusoid {
                decay,
                omega,
                cos_coef: -decay * cos_coef + omega * sin_coef,
                sin_coef: -omega * cos_coef - decay * sin_coef,
            },
            Expr::PolyExp { rate, c0, c1 } => Expr::PolyExp {
                rate,
                c0: c1 - rate * c0,
                c1: -rate * c1,
            },
            Expr::TwoExp { c1, r1, c2, r2 } => Expr::TwoExp {
                c1: c1 * r1,
                r1,
                c2: c2 * r2,
                r2,
            },
        }
    }

    /// `alpha·self + beta·other`; both must share shape and rates.
    pub fn combine(&self, alpha: f64, other: &Expr, beta: f64) -> SimResult<Expr> {
        match (*self, *other) {
            (
                Expr::DampedSinusoid {
                    decay,
                    omega,
                    cos_coef: a_cos,
                    sin_coef: a_sin,
                },
                Expr::DampedSinusoid {
                    decay: other_decay,
                    omega: other_omega,
                    cos_coef: b_cos,
                    sin_coef: b_sin,
                },
            ) if decay == other_decay && omega == other_omega => Ok(Expr::DampedSinusoid {
                decay,
                omega,
                cos_coef: alpha * a_cos + beta * b_cos,
                sin_coef: alpha * a_sin + beta * b_sin,
            }),
            (
                Expr::PolyExp {
                    rate,
                    c0: a0,
                    c1: a1,
                },
                Expr::PolyExp {
                    rate: other_rate,
                    c0: b0,
                    c1: b1,
                },
            ) if rate == other_rate => Ok(Expr::PolyExp {
                rate,
                c0: alpha * a0 + beta * b0,
                c1: alpha * a1 + beta * b1,
            }),
            (
                Expr::TwoExp {
                    c1: a1,
                    r1,
                    c2: a2,
                    r2,
                },
                Expr::TwoExp {
                    c1: b1,
                    r1: other_r1,
                    c2: b2,
                    r2: other_r2,
                },
            ) if r1 == other_r1 && r2 == other_r2 => Ok(Expr::TwoExp {
                c1: alpha * a1 + beta * b1,
                r1,
                c2: alpha * a2 + beta * b2,
                r2,
            }),
            _ => Err(SimError::Invariant {
                what: "combined expressions must share shape and rates",
            }),
        }
    }

    /// All coefficients and rates are finite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Expr::DampedSinusoid {
                decay,
                omega,
                cos_coef,
                sin_coef,
            } => [decay, omega, cos_coef, sin_coef].iter().all(|v| v.is_finite()),
            Expr::PolyExp { rate, c0, c1 } => [rate, c0, c1].iter().all(|v| v.is_finite()),
            Expr::TwoExp { c1, r1, c2, r2 } => [c1, r1, c2, r2].iter().all(|v| v.is_finite()),
        }
    }
}
