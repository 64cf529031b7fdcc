//! Human-readable and LaTeX rendering of the equation of motion and its
//! closed-form solution.
//!
//! Coefficients come from the same [`ClosedForm`] the generator samples, so
//! the displayed equations always describe the plotted trajectory.

use serde::{Deserialize, Serialize};
use sm_core::round_to;

use crate::derived::DerivedQuantities;
use crate::error::SimResult;
use crate::expr::Expr;
use crate::params::{OverdampedModel, SystemParameters};
use crate::solution::ClosedForm;

/// Rendered equations, keyed the way the front end expects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationSet {
    #[serde(rename = "diferencial")]
    pub differential: String,
    #[serde(rename = "diferencial_latex")]
    pub differential_latex: String,
    #[serde(rename = "posicion")]
    pub position: String,
    #[serde(rename = "posicion_latex")]
    pub position_latex: String,
    #[serde(rename = "velocidad")]
    pub velocity: String,
    #[serde(rename = "velocidad_latex")]
    pub velocity_latex: String,
    #[serde(rename = "aceleracion")]
    pub acceleration: String,
    #[serde(rename = "aceleracion_latex")]
    pub acceleration_latex: String,
}

/// Render the equations for `params` with initial state `(y0, v0)`.
pub fn render_equations(
    params: &SystemParameters,
    y0: f64,
    v0: f64,
    model: OverdampedModel,
) -> SimResult<EquationSet> {
    let derived = DerivedQuantities::compute(params)?;
    let solution = ClosedForm::select(params, &derived, y0, v0, model)?;
    Ok(render_closed_form(params, &solution))
}

/// Render an already selected solution.
pub fn render_closed_form(params: &SystemParameters, solution: &ClosedForm) -> EquationSet {
    EquationSet {
        differential: differential_text(params),
        differential_latex: differential_latex(params),
        position: expr_text(&solution.position),
        position_latex: expr_latex(&solution.position),
        velocity: expr_text(&solution.velocity),
        velocity_latex: expr_latex(&solution.velocity),
        acceleration: expr_text(&solution.acceleration),
        acceleration_latex: expr_latex(&solution.acceleration),
    }
}

/// Forcing expression shown on the right-hand side; `"0"` when unforced.
pub fn forcing_display(params: &SystemParameters) -> String {
    let cleaned = params.forcing.trim().replace("sen", "sin");
    if params.kind.is_forced() && !cleaned.is_empty() {
        cleaned
    } else {
        "0".to_string()
    }
}

fn two_decimals(v: f64) -> String {
    let r = round_to(v, 2);
    // avoid printing "-0.00"
    format!("{:.2}", if r == 0.0 { 0.0 } else { r })
}

fn is_zero(v: f64) -> bool {
    round_to(v, 2) == 0.0
}

/// Rates and frequencies: two decimals, or enough for two significant
/// digits when a non-zero value would otherwise print as zero.
fn rate_text(v: f64) -> String {
    if v == 0.0 || !is_zero(v) {
        return two_decimals(v);
    }
    let decimals = (1.0 - v.abs().log10()).ceil().clamp(2.0, 12.0) as usize;
    format!("{v:.decimals$}")
}

/// Join `coef·term` pairs with explicit signs, skipping terms that round to zero.
fn join_terms(terms: &[(f64, String)], separator: &str) -> String {
    let mut out = String::new();
    for (coef, term) in terms.iter().filter(|(c, _)| !is_zero(*c)) {
        let magnitude = two_decimals(coef.abs());
        let body = if term.is_empty() {
            magnitude
        } else {
            format!("{magnitude}{separator}{term}")
        };
        if out.is_empty() {
            if *coef < 0.0 {
                out.push('-');
            }
        } else if *coef < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        out.push_str(&body);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

fn differential_text(params: &SystemParameters) -> String {
    let mut terms = vec![(params.mass, "y''".to_string())];
    if params.kind.has_damping_term() {
        terms.push((params.damping, "y'".to_string()));
    }
    terms.push((params.spring_constant, "y".to_string()));
    format!("{} = {}", join_terms(&terms, "*"), forcing_display(params))
}

fn differential_latex(params: &SystemParameters) -> String {
    let mut terms = vec![(params.mass, r"\ddot{y}(t)".to_string())];
    if params.kind.has_damping_term() {
        terms.push((params.damping, r"\dot{y}(t)".to_string()));
    }
    terms.push((params.spring_constant, "y(t)".to_string()));
    format!("{} = {}", join_terms(&terms, " "), forcing_display(params))
}

fn expr_text(expr: &Expr) -> String {
    match *expr {
        Expr::DampedSinusoid {
            decay,
            omega,
            cos_coef,
            sin_coef,
        } => {
            let w = rate_text(omega);
            let body = join_terms(
                &[
                    (cos_coef, format!("cos({w}*t)")),
                    (sin_coef, format!("sin({w}*t)")),
                ],
                "*",
            );
            if decay == 0.0 || body == "0" {
                body
            } else {
                format!("exp(-{}*t)*({body})", rate_text(decay))
            }
        }
        Expr::PolyExp { rate, c0, c1 } => {
            let poly = join_terms(&[(c0, String::new()), (c1, "t".to_string())], "*");
            if poly == "0" {
                return poly;
            }
            format!("({poly})*exp(-{}*t)", rate_text(rate))
        }
        Expr::TwoExp { c1, r1, c2, r2 } => join_terms(
            &[
                (c1, format!("exp({}*t)", rate_text(r1))),
                (c2, format!("exp({}*t)", rate_text(r2))),
            ],
            "*",
        ),
    }
}

fn expr_latex(expr: &Expr) -> String {
    match *expr {
        Expr::DampedSinusoid {
            decay,
            omega,
            cos_coef,
            sin_coef,
        } => {
            let w = rate_text(omega);
            let body = join_terms(
                &[
                    (cos_coef, format!(r"\cos{{\left({w} t \right)}}")),
                    (sin_coef, format!(r"\sin{{\left({w} t \right)}}")),
                ],
                " ",
            );
            if decay == 0.0 || body == "0" {
                body
            } else {
                format!(r"e^{{-{} t}} \left({body}\right)", rate_text(decay))
            }
        }
        Expr::PolyExp { rate, c0, c1 } => {
            let poly = join_terms(&[(c0, String::new()), (c1, "t".to_string())], " ");
            if poly == "0" {
                return poly;
            }
            format!(r"\left({poly}\right) e^{{-{} t}}", rate_text(rate))
        }
        Expr::TwoExp { c1, r1, c2, r2 } => join_terms(
            &[
                (c1, format!("e^{{{} t}}", rate_text(r1))),
                (c2, format!("e^{{{} t}}", rate_text(r2))),
            ],
            " ",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EquationKind;

    #[test]
    fn join_terms_signs() {
        let terms = vec![(1.0, "a".to_string()), (-2.5, "b".to_string()), (0.001, "c".to_string())];
        assert_eq!(join_terms(&terms, "*"), "1.00*a - 2.50*b");
        assert_eq!(join_terms(&[(-1.0, "x".to_string())], "*"), "-1.00*x");
        assert_eq!(join_terms(&[(0.0, "x".to_string())], "*"), "0");
    }

    #[test]
    fn simple_harmonic_text() {
        let p = SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped);
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Legacy).unwrap();
        assert_eq!(eq.differential, "1.00*y'' + 4.00*y = 0");
        assert_eq!(eq.position, "1.00*cos(2.00*t)");
        assert_eq!(eq.velocity, "-2.00*sin(2.00*t)");
        assert_eq!(eq.acceleration, "-4.00*cos(2.00*t)");
        assert_eq!(eq.position_latex, r"1.00 \cos{\left(2.00 t \right)}");
    }

    #[test]
    fn underdamped_text_has_envelope() {
        let p = SystemParameters::new(1.0, 4.0, 0.2, EquationKind::Damped);
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Legacy).unwrap();
        assert_eq!(eq.differential, "1.00*y'' + 0.20*y' + 4.00*y = 0");
        assert!(eq.position.starts_with("exp(-0.10*t)*(1.00*cos(2.00*t)"));
        assert!(eq.position_latex.starts_with(r"e^{-0.10 t} \left("));
    }

    #[test]
    fn critical_exact_text() {
        let p = SystemParameters::new(1.0, 4.0, 4.0, EquationKind::Damped);
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Exact).unwrap();
        assert_eq!(eq.position, "(1.00 + 2.00*t)*exp(-2.00*t)");
        assert_eq!(eq.position_latex, r"\left(1.00 + 2.00 t\right) e^{-2.00 t}");
    }

    #[test]
    fn overdamped_exact_text_uses_two_exponentials() {
        let p = SystemParameters::new(1.0, 2.0, 3.0, EquationKind::Damped);
        // roots -1 and -2, y0 = 1, v0 = 0 -> 2 e^{-t} - e^{-2t}
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Exact).unwrap();
        assert_eq!(eq.position, "2.00*exp(-1.00*t) - 1.00*exp(-2.00*t)");
    }

    #[test]
    fn forced_kind_shows_forcing_on_rhs() {
        let p = SystemParameters::new(1.0, 4.0, 0.5, EquationKind::DampedForced)
            .with_forcing("2*sen(2*t)");
        let eq = render_equations(&p, 0.0, 0.0, OverdampedModel::Legacy).unwrap();
        assert_eq!(eq.differential, "1.00*y'' + 0.50*y' + 4.00*y = 2*sin(2*t)");
        assert_eq!(eq.position, "0");

        let unforced = SystemParameters::new(1.0, 4.0, 0.5, EquationKind::Damped)
            .with_forcing("2*sin(2*t)");
        assert_eq!(forcing_display(&unforced), "0");
    }

    #[test]
    fn undamped_forced_shows_the_damping_it_is_solved_with() {
        let p = SystemParameters::new(1.0, 4.0, 0.5, EquationKind::UndampedForced)
            .with_forcing("2*sin(2*t)");
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Legacy).unwrap();
        assert_eq!(eq.differential, "1.00*y'' + 0.50*y' + 4.00*y = 2*sin(2*t)");
        assert!(eq.differential_latex.contains(r"0.50 \dot{y}(t)"));
        assert!(eq.position.starts_with("exp(-0.25*t)*("));
    }

    #[test]
    fn small_decay_keeps_its_envelope() {
        // zeta = 0.001, decay rate 0.002 would round to 0.00
        let p = SystemParameters::new(1.0, 4.0, 0.004, EquationKind::Damped);
        let eq = render_equations(&p, 1.0, 0.0, OverdampedModel::Legacy).unwrap();
        assert!(eq.position.starts_with("exp(-0.0020*t)*(1.00*cos(2.00*t)"), "{}", eq.position);
        assert!(eq.position_latex.starts_with(r"e^{-0.0020 t} \left("));
        assert_eq!(rate_text(0.25), "0.25");
        assert_eq!(rate_text(0.0), "0.00");
        assert_eq!(rate_text(-0.004), "-0.0040");
    }
}
