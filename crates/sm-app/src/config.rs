//! Service limits and configuration loading.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! YAML or JSON config file, then the `MAX_SIMULATION_TIME`,
//! `DEFAULT_TIME_STEP` and `MAX_TIME_POINTS` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sm_sim::OverdampedModel;

use crate::error::{AppError, AppResult};

pub const ENV_MAX_SIMULATION_TIME: &str = "MAX_SIMULATION_TIME";
pub const ENV_DEFAULT_TIME_STEP: &str = "DEFAULT_TIME_STEP";
pub const ENV_MAX_TIME_POINTS: &str = "MAX_TIME_POINTS";

/// Request limits enforced by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLimits {
    /// Longest accepted window `t_stop - t_start` (s).
    #[serde(rename = "tiempo_maximo", alias = "max_simulation_time")]
    pub max_simulation_time: f64,
    /// Sample spacing used unless the point cap forces a wider one (s).
    #[serde(rename = "paso_tiempo_defecto", alias = "default_time_step")]
    pub default_time_step: f64,
    /// Cap on samples per trajectory.
    #[serde(rename = "puntos_maximos", alias = "max_time_points")]
    pub max_time_points: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_simulation_time: 100.0,
            default_time_step: sm_sim::DEFAULT_DT,
            max_time_points: 10_000,
        }
    }
}

impl ServiceLimits {
    pub fn validate(&self) -> AppResult<()> {
        if !(self.max_simulation_time > 0.0 && self.max_simulation_time.is_finite()) {
            return Err(AppError::Config(format!(
                "max_simulation_time must be positive, got {}",
                self.max_simulation_time
            )));
        }
        if !(self.default_time_step > 0.0 && self.default_time_step.is_finite()) {
            return Err(AppError::Config(format!(
                "default_time_step must be positive, got {}",
                self.default_time_step
            )));
        }
        if self.max_time_points < 2 {
            return Err(AppError::Config(format!(
                "max_time_points must be at least 2, got {}",
                self.max_time_points
            )));
        }
        Ok(())
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_SIMULATION_TIME) {
            self.max_simulation_time = parse_var(ENV_MAX_SIMULATION_TIME, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_TIME_STEP) {
            self.default_time_step = parse_var(ENV_DEFAULT_TIME_STEP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_TIME_POINTS) {
            self.max_time_points = parse_var(ENV_MAX_TIME_POINTS, &raw)?;
        }
        self.validate()
    }

    /// Sample spacing for a window: the default step, widened to
    /// `window / (max_time_points - 1)` when the default would exceed the cap.
    pub fn time_step_for(&self, window: f64) -> f64 {
        let dt = self.default_time_step;
        let points = (window / dt).floor() + 1.0;
        if points > self.max_time_points as f64 {
            window / (self.max_time_points.max(2) - 1) as f64
        } else {
            dt
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{name} has an invalid value: '{raw}'")))
}

/// Full service configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub limits: ServiceLimits,
    /// Closed form used when `ζ >= 1`.
    #[serde(default)]
    pub overdamped_model: OverdampedModel,
}

impl AppConfig {
    /// Read a config file (`.json`, otherwise YAML) without applying the environment.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: AppConfig = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.limits.validate()?;
        Ok(config)
    }

    /// File (when given) then environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.limits.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }
}
