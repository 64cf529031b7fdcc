//! Built-in library of example parameter sets.

use serde::{Deserialize, Serialize};

use crate::params::{EquationKind, SystemParameters};

/// Parameters of an example: the system plus its initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleParameters {
    #[serde(flatten)]
    pub system: SystemParameters,
    #[serde(rename = "valor_inicial")]
    pub y0: f64,
    #[serde(rename = "velocidad_inicial")]
    pub v0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "parametros")]
    pub parameters: ExampleParameters,
}

fn example(
    name: &str,
    description: &str,
    system: SystemParameters,
    y0: f64,
    v0: f64,
) -> Example {
    Example {
        name: name.to_string(),
        description: description.to_string(),
        parameters: ExampleParameters { system, y0, v0 },
    }
}

/// The fixed example library, in display order.
pub fn examples() -> Vec<Example> {
    vec![
        example(
            "Oscilación Simple",
            "Sistema masa-resorte básico sin amortiguamiento",
            SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped),
            1.0,
            0.0,
        ),
        example(
            "Amortiguamiento Crítico",
            "Sistema con amortiguamiento crítico",
            SystemParameters::new(1.0, 4.0, 4.0, EquationKind::Damped),
            1.0,
            0.0,
        ),
        example(
            "Fuerza Senoidal",
            "Sistema forzado con entrada senoidal",
            SystemParameters::new(1.0, 4.0, 0.5, EquationKind::DampedForced)
                .with_forcing("2*sin(2*t)"),
            0.0,
            0.0,
        ),
        example(
            "Subamortiguado",
            "Sistema subamortiguado con oscilaciones decrecientes",
            SystemParameters::new(2.0, 8.0, 1.0, EquationKind::Damped),
            2.0,
            0.0,
        ),
    ]
}

/// Look up an example by name, ignoring case and surrounding whitespace.
pub fn find_example(name: &str) -> Option<Example> {
    let wanted = name.trim().to_lowercase();
    examples()
        .into_iter()
        .find(|e| e.name.to_lowercase() == wanted)
}
