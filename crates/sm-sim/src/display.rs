//! Axis auto-scaling for plotted series and the animated spring.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Fraction of the data span added on each side.
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.1;
/// Smallest half-width shown around a constant series.
pub const DEFAULT_MIN_HALF_WIDTH: f64 = 1.0;

/// Closed display interval `[lower, upper]` with `upper > lower`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub lower: f64,
    pub upper: f64,
}

impl DisplayRange {
    /// Fit `values` with the default margins.
    pub fn fit(values: &[f64]) -> SimResult<Self> {
        Self::fit_with(values, DEFAULT_MARGIN_FRACTION, DEFAULT_MIN_HALF_WIDTH)
    }

    /// Fit `values`, padding by `margin_fraction` of the span. A zero span
    /// (constant series) is widened to `min_half_width` on each side, or to
    /// `margin_fraction` of the value's magnitude when that is larger.
    pub fn fit_with(values: &[f64], margin_fraction: f64, min_half_width: f64) -> SimResult<Self> {
        if !(margin_fraction >= 0.0 && margin_fraction.is_finite()) {
            return Err(SimError::invalid("margin fraction must be finite and non-negative"));
        }
        if !(min_half_width > 0.0 && min_half_width.is_finite()) {
            return Err(SimError::invalid("minimum half width must be finite and positive"));
        }

        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let first = finite
            .next()
            .ok_or_else(|| SimError::invalid("cannot fit a display range without finite values"))?;
        let (lo, hi) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let span = hi - lo;
        if span > 0.0 {
            let pad = span * margin_fraction;
            return Ok(Self {
                lower: lo - pad,
                upper: hi + pad,
            });
        }

        let half = min_half_width.max(lo.abs() * margin_fraction);
        Ok(Self {
            lower: lo - half,
            upper: hi + half,
        })
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// Map `value` to `[0, 1]` across the range (values outside extrapolate).
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.lower) / self.span()
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}
