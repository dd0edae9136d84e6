//! Reference solutions and run diagnostics.
//!
//! - [`dam_break`]: Ritter (dry bed) and Stoker (wet bed) analytic solutions
//!   for validating the solver on discontinuous initial data
//! - [`stability`]: per-step monitoring of depth, velocity and Courant number

pub mod dam_break;
pub mod stability;

pub use dam_break::DamBreakSolution;
pub use stability::{StabilityMonitor, StabilityStatus, StabilityThresholds, StabilityWarning};
