//! Trajectory generation: samples the closed-form solution on a fixed grid.

use serde::{Deserialize, Serialize};
use sm_core::timing::{GENERATE_CALLS, Timer};
use tracing::debug;

use crate::derived::DerivedQuantities;
use crate::error::{SimError, SimResult};
use crate::params::{InitialConditions, SimulationOptions, SystemParameters};
use crate::solution::{ClosedForm, MotionSample, SolutionBranch};

/// Upper bound on samples per trajectory (safety limit).
pub const MAX_SAMPLES: usize = 10_000_000;

/// Extremes of the sampled series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "posicion_maxima")]
    pub position_max: f64,
    #[serde(rename = "posicion_minima")]
    pub position_min: f64,
    /// `position_max - position_min`
    #[serde(rename = "amplitud")]
    pub amplitude: f64,
    #[serde(rename = "velocidad_maxima")]
    pub velocity_max: f64,
    #[serde(rename = "velocidad_minima")]
    pub velocity_min: f64,
    #[serde(rename = "aceleracion_maxima")]
    pub acceleration_max: f64,
    #[serde(rename = "aceleracion_minima")]
    pub acceleration_min: f64,
}

impl Statistics {
    /// Single pass over the three series. Returns `None` for empty input.
    pub fn scan(position: &[f64], velocity: &[f64], acceleration: &[f64]) -> Option<Self> {
        let (position_min, position_max) = min_max(position)?;
        let (velocity_min, velocity_max) = min_max(velocity)?;
        let (acceleration_min, acceleration_max) = min_max(acceleration)?;
        Some(Self {
            position_max,
            position_min,
            amplitude: position_max - position_min,
            velocity_max,
            velocity_min,
            acceleration_max,
            acceleration_min,
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Sampled motion over the simulation window.
///
/// The four series always have the same length and `time[i] = t_start + i·dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub statistics: Statistics,
    pub derived: DerivedQuantities,
    pub branch: SolutionBranch,
    pub dt: f64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Never true for a generated trajectory.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<(f64, MotionSample)> {
        Some((
            *self.time.get(index)?,
            MotionSample {
                position: *self.position.get(index)?,
                velocity: *self.velocity.get(index)?,
                acceleration: *self.acceleration.get(index)?,
            },
        ))
    }

    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

/// `floor((t_stop - t_start) / dt) + 1`.
pub fn sample_count(initial: &InitialConditions, dt: f64) -> SimResult<usize> {
    let steps = (initial.window() / dt).floor();
    if !steps.is_finite() || steps < 0.0 || steps >= MAX_SAMPLES as f64 {
        return Err(SimError::InvalidParameter {
            what: format!(
                "window of {} s at dt={dt} s exceeds {MAX_SAMPLES} samples",
                initial.window()
            ),
        });
    }
    Ok(steps as usize + 1)
}

/// Generate the trajectory for one request.
///
/// Pure and deterministic: the same inputs always give bit-identical output.
pub fn generate(
    params: &SystemParameters,
    initial: &InitialConditions,
    opts: &SimulationOptions,
) -> SimResult<Trajectory> {
    let timer = Timer::start("generate");

    opts.validate()?;
    initial.validate()?;
    let derived = DerivedQuantities::compute(params)?;
    let solution = ClosedForm::select(
        params,
        &derived,
        initial.y0,
        initial.v0,
        opts.overdamped_model,
    )?;
    let n = sample_count(initial, opts.dt)?;

    let mut time = Vec::with_capacity(n);
    let mut position = Vec::with_capacity(n);
    let mut velocity = Vec::with_capacity(n);
    let mut acceleration = Vec::with_capacity(n);

    for i in 0..n {
        let t = initial.t_start + i as f64 * opts.dt;
        let s = solution.sample(t);
        for (what, value) in [
            ("position", s.position),
            ("velocity", s.velocity),
            ("acceleration", s.acceleration),
        ] {
            if !value.is_finite() {
                return Err(SimError::NonFinite { what, value });
            }
        }
        time.push(t);
        position.push(s.position);
        velocity.push(s.velocity);
        acceleration.push(s.acceleration);
    }

    let statistics =
        Statistics::scan(&position, &velocity, &acceleration).ok_or(SimError::Invariant {
            what: "trajectory must contain at least one sample",
        })?;

    debug!(
        samples = n,
        regime = %derived.regime,
        branch = ?solution.branch,
        omega0 = derived.omega0,
        zeta = derived.zeta,
        "generated trajectory"
    );
    if let Some(elapsed) = timer.stop() {
        GENERATE_CALLS.record(elapsed);
    }

    Ok(Trajectory {
        time,
        position,
        velocity,
        acceleration,
        statistics,
        derived,
        branch: solution.branch,
        dt: opts.dt,
    })
}
