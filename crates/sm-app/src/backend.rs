//! Simulation backends and remote-with-local fallback.
//!
//! A front end talks to a [`SimulationBackend`]. [`FallbackBackend`] wraps a
//! remote backend and answers from the in-process [`LocalBackend`] once the
//! remote reports itself unavailable. Going back online only happens through
//! an explicit [`FallbackBackend::retry_remote`].

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use sm_sim::Example;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::service;
use crate::wire::{
    EquationsRequest, EquationsResponse, HealthStatus, SimulationRequest, SimulationResponse,
};

/// The operations a front end needs from a simulation service.
pub trait SimulationBackend {
    fn name(&self) -> &str;
    fn health(&self) -> AppResult<HealthStatus>;
    fn simulate(&self, request: &SimulationRequest) -> AppResult<SimulationResponse>;
    fn equations(&self, request: &EquationsRequest) -> AppResult<EquationsResponse>;
    fn examples(&self) -> AppResult<Vec<Example>>;
}

/// In-process backend over the service functions.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    config: AppConfig,
}

impl LocalBackend {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl SimulationBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    fn health(&self) -> AppResult<HealthStatus> {
        Ok(service::health())
    }

    fn simulate(&self, request: &SimulationRequest) -> AppResult<SimulationResponse> {
        service::simulate(request, &self.config)
    }

    fn equations(&self, request: &EquationsRequest) -> AppResult<EquationsResponse> {
        service::equations(request, &self.config)
    }

    fn examples(&self) -> AppResult<Vec<Example>> {
        Ok(service::list_examples())
    }
}

/// Whether requests currently go to the remote backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Online,
    Offline,
}

/// Remote backend with local fallback.
#[derive(Debug)]
pub struct FallbackBackend<R> {
    remote: R,
    local: LocalBackend,
    status: Cell<ServiceStatus>,
}

impl<R: SimulationBackend> FallbackBackend<R> {
    pub fn new(remote: R, local: LocalBackend) -> Self {
        Self {
            remote,
            local,
            status: Cell::new(ServiceStatus::Online),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        self.status.get()
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Probe the remote backend. Returns whether it is back online.
    pub fn retry_remote(&self) -> bool {
        match self.remote.health() {
            Ok(_) => {
                if self.status.get() == ServiceStatus::Offline {
                    info!(backend = self.remote.name(), "remote backend back online");
                }
                self.status.set(ServiceStatus::Online);
                true
            }
            Err(err) => {
                warn!(backend = self.remote.name(), error = %err, "remote backend still unavailable");
                self.status.set(ServiceStatus::Offline);
                false
            }
        }
    }

    /// Run `op` on the remote while online; switch to the local backend the
    /// first time the remote is unavailable. Other remote errors pass through.
    fn dispatch<T>(&self, op: impl Fn(&dyn SimulationBackend) -> AppResult<T>) -> AppResult<T> {
        if self.status.get() == ServiceStatus::Online {
            match op(&self.remote) {
                Err(err) if err.is_unavailable() => {
                    warn!(
                        backend = self.remote.name(),
                        error = %err,
                        "remote backend unavailable, using local simulation"
                    );
                    self.status.set(ServiceStatus::Offline);
                }
                result => return result,
            }
        }
        op(&self.local)
    }
}

impl<R: SimulationBackend> SimulationBackend for FallbackBackend<R> {
    fn name(&self) -> &str {
        match self.status.get() {
            ServiceStatus::Online => self.remote.name(),
            ServiceStatus::Offline => self.local.name(),
        }
    }

    /// While offline, reports the local service with status `OFFLINE`.
    fn health(&self) -> AppResult<HealthStatus> {
        let mut health = self.dispatch(|b| b.health())?;
        if self.status.get() == ServiceStatus::Offline {
            health.status = "OFFLINE".to_string();
            health.message = "Servidor remoto no disponible; usando simulación local".to_string();
        }
        Ok(health)
    }

    fn simulate(&self, request: &SimulationRequest) -> AppResult<SimulationResponse> {
        self.dispatch(|b| b.simulate(request))
    }

    fn equations(&self, request: &EquationsRequest) -> AppResult<EquationsResponse> {
        self.dispatch(|b| b.equations(request))
    }

    fn examples(&self) -> AppResult<Vec<Example>> {
        self.dispatch(|b| b.examples())
    }
}
