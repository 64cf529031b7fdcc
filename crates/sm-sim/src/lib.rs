//! Closed-form trajectory generation for a single-degree-of-freedom
//! spring-mass-damper.
//!
//! Provides:
//! - Derived quantities and damping-regime classification
//! - Closed-form position/velocity/acceleration per regime
//! - Fixed-step trajectory sampling with summary statistics
//! - Text and LaTeX rendering of the equations
//! - Clock-driven playback scheduling and display auto-scaling
//! - Example library and serializable session state

pub mod derived;
pub mod display;
pub mod equations;
pub mod error;
pub mod expr;
pub mod params;
pub mod playback;
pub mod presets;
pub mod session;
pub mod solution;
pub mod trajectory;

// Re-exports for public API
pub use derived::{DampingRegime, DerivedQuantities};
pub use display::DisplayRange;
pub use equations::{EquationSet, forcing_display, render_closed_form, render_equations};
pub use error::{SimError, SimResult};
pub use expr::Expr;
pub use params::{
    DEFAULT_DT, EquationKind, InitialConditions, OverdampedModel, SimulationOptions,
    SystemParameters,
};
pub use playback::{Clock, Playback, PlaybackState, SystemClock, Tick, VirtualClock};
pub use presets::{Example, ExampleParameters, examples, find_example};
pub use session::{SessionState, Snapshot};
pub use solution::{ClosedForm, MotionSample, SolutionBranch};
pub use trajectory::{Statistics, Trajectory, generate, sample_count};
