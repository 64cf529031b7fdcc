//! sm-core: stable foundation for springmass.
//!
//! Contains:
//! - units (uom SI types + constructors for the oscillator parameters)
//! - numeric (Real + finiteness/sign checks + rounding)
//! - error (shared error types)
//! - timing (opt-in wall clock measurements)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SmError, SmResult};
pub use numeric::*;
pub use units::*;

// Downstream crates reach unit modules through here.
pub use uom;
