//! Shared application service layer for springmass.
//!
//! Exposes the simulation service contract (simulate, equations, examples,
//! info, health) as plain functions over serializable request/response
//! types, plus the backend abstraction front ends use to fall back to local
//! simulation when a remote service is unreachable.

pub mod backend;
pub mod config;
pub mod error;
pub mod service;
pub mod wire;

// Re-export key types for convenience
pub use backend::{FallbackBackend, LocalBackend, ServiceStatus, SimulationBackend};
pub use config::{AppConfig, ServiceLimits};
pub use error::{AppError, AppResult, ErrorResponse};
pub use service::{
    equations, health, list_examples, parse_equations_request, parse_simulation_request,
    simulate, simulate_with_stats, simulation_options, system_info,
};
pub use wire::{
    EquationsRequest, EquationsResponse, HealthStatus, NumberInput, SimulationRequest,
    SimulationResponse, SystemInfo, SystemReport,
};
