//! Request and response shapes exchanged with front ends.
//!
//! Field names on the wire are Spanish and match the simulation service
//! contract; Rust-side names are English.

use serde::{Deserialize, Serialize};
use sm_sim::{
    DampingRegime, DerivedQuantities, EquationKind, EquationSet, InitialConditions, Statistics,
    SystemParameters,
};

use crate::config::ServiceLimits;
use crate::error::{AppError, AppResult};

/// A numeric field as sent by a client: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Parse to a finite `f64`. `field` names the wire field in the error.
    pub fn parse(&self, field: &str) -> AppResult<f64> {
        let value = match self {
            NumberInput::Number(v) => *v,
            NumberInput::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                AppError::InvalidInput(format!(
                    "Error en los datos numéricos: valor no numérico en '{field}': '{raw}'"
                ))
            })?,
        };
        if !value.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "Error en los datos numéricos: valor no finito en '{field}'"
            )));
        }
        Ok(value)
    }
}

impl From<f64> for NumberInput {
    fn from(v: f64) -> Self {
        NumberInput::Number(v)
    }
}

/// Body of a simulation request. Every field except `fuerza` is required;
/// presence is checked by the service so all missing fields are reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(rename = "masa", default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<NumberInput>,
    #[serde(rename = "constante_resorte", default, skip_serializing_if = "Option::is_none")]
    pub spring_constant: Option<NumberInput>,
    #[serde(
        rename = "constante_amortiguamiento",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub damping: Option<NumberInput>,
    #[serde(rename = "fuerza", default, skip_serializing_if = "Option::is_none")]
    pub forcing: Option<String>,
    #[serde(rename = "tipo_ecuacion", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Start of the window (s).
    #[serde(rename = "step_time", default, skip_serializing_if = "Option::is_none")]
    pub t_start: Option<NumberInput>,
    #[serde(rename = "stop_time", default, skip_serializing_if = "Option::is_none")]
    pub t_stop: Option<NumberInput>,
    #[serde(rename = "valor_inicial", default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<NumberInput>,
    #[serde(rename = "velocidad_inicial", default, skip_serializing_if = "Option::is_none")]
    pub v0: Option<NumberInput>,
}

impl SimulationRequest {
    /// Fully populated request for a parameter set.
    pub fn from_parts(system: &SystemParameters, initial: &InitialConditions) -> Self {
        Self {
            mass: Some(system.mass.into()),
            spring_constant: Some(system.spring_constant.into()),
            damping: Some(system.damping.into()),
            forcing: Some(system.forcing.clone()),
            kind: Some(system.kind.as_str().to_string()),
            t_start: Some(initial.t_start.into()),
            t_stop: Some(initial.t_stop.into()),
            y0: Some(initial.y0.into()),
            v0: Some(initial.v0.into()),
        }
    }

    /// Wire names of required fields that are absent, in contract order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("masa", self.mass.is_none()),
            ("constante_resorte", self.spring_constant.is_none()),
            ("constante_amortiguamiento", self.damping.is_none()),
            ("tipo_ecuacion", self.kind.is_none()),
            ("step_time", self.t_start.is_none()),
            ("stop_time", self.t_stop.is_none()),
            ("valor_inicial", self.y0.is_none()),
            ("velocidad_inicial", self.v0.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

/// Body of an equations request. Absent fields take the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationsRequest {
    #[serde(rename = "masa", default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<NumberInput>,
    #[serde(rename = "constante_resorte", default, skip_serializing_if = "Option::is_none")]
    pub spring_constant: Option<NumberInput>,
    #[serde(
        rename = "constante_amortiguamiento",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub damping: Option<NumberInput>,
    #[serde(rename = "fuerza", default, skip_serializing_if = "Option::is_none")]
    pub forcing: Option<String>,
    #[serde(rename = "tipo_ecuacion", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "valor_inicial", default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<NumberInput>,
    #[serde(rename = "velocidad_inicial", default, skip_serializing_if = "Option::is_none")]
    pub v0: Option<NumberInput>,
}

impl EquationsRequest {
    pub fn from_parts(system: &SystemParameters, y0: f64, v0: f64) -> Self {
        Self {
            mass: Some(system.mass.into()),
            spring_constant: Some(system.spring_constant.into()),
            damping: Some(system.damping.into()),
            forcing: Some(system.forcing.clone()),
            kind: Some(system.kind.as_str().to_string()),
            y0: Some(y0.into()),
            v0: Some(v0.into()),
        }
    }
}

/// Derived system quantities as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemReport {
    #[serde(rename = "frecuencia_natural")]
    pub natural_frequency: f64,
    #[serde(rename = "coeficiente_amortiguamiento")]
    pub damping_ratio: f64,
    pub beta: f64,
    #[serde(rename = "tipo_amortiguamiento")]
    pub regime: DampingRegime,
    pub omega_d: f64,
    #[serde(rename = "periodo")]
    pub period: f64,
}

impl From<&DerivedQuantities> for SystemReport {
    fn from(d: &DerivedQuantities) -> Self {
        Self {
            natural_frequency: d.omega0,
            damping_ratio: d.zeta,
            beta: d.beta,
            regime: d.regime,
            omega_d: d.omega_d_or_zero(),
            period: d.period,
        }
    }
}

/// `parametros` of a simulation response: the inputs echoed back plus
/// the derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseParameters {
    #[serde(flatten)]
    pub system: SystemParameters,
    #[serde(flatten)]
    pub report: SystemReport,
    #[serde(rename = "omega_0")]
    pub omega0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(rename = "tiempo")]
    pub time: Vec<f64>,
    #[serde(rename = "posicion")]
    pub position: Vec<f64>,
    #[serde(rename = "velocidad")]
    pub velocity: Vec<f64>,
    #[serde(rename = "aceleracion")]
    pub acceleration: Vec<f64>,
    #[serde(rename = "ecuaciones")]
    pub equations: EquationSet,
    #[serde(rename = "parametros")]
    pub parameters: ResponseParameters,
    #[serde(rename = "estadisticas")]
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationsResponse {
    #[serde(rename = "ecuaciones")]
    pub equations: EquationSet,
    #[serde(rename = "parametros_sistema")]
    pub system: SystemReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// Descriptions of the model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGlossary {
    pub m: String,
    pub k: String,
    pub b: String,
    #[serde(rename = "F(t)")]
    pub forcing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "ecuacion")]
    pub equation: String,
    #[serde(rename = "parametros")]
    pub parameters: ParameterGlossary,
    #[serde(rename = "tipos_ecuacion")]
    pub kinds: Vec<EquationKind>,
    #[serde(rename = "limites")]
    pub limits: ServiceLimits,
}
