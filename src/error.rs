//! Error types for the Saint-Venant solver.
//!
//! Setup errors (`Domain`, `InvalidState`) are raised before any time step is
//! taken. Per-step anomalies such as negative-depth undershoots are not errors;
//! they are counted in [`StepReport`](crate::solver::StepReport) and
//! [`RunDiagnostics`](crate::simulation::RunDiagnostics). Only the step-count
//! safety valve (and a non-finite state) terminates a run with
//! [`SaintVenantError::Divergence`].

use thiserror::Error;

/// Errors raised by channel geometry, state setup and the time-marching loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaintVenantError {
    /// Invalid static configuration (geometry, grid, physical constants).
    #[error("Domain error: {0}")]
    Domain(String),

    /// Initial-condition arrays of the wrong length or with negative depths.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// `run()`/`advance_step()` called before an initial condition was set.
    #[error("Solver has no initial condition; call set_uniform, set_from_arrays or set_dam_break first")]
    NotInitialized,

    /// The run could not reach `t_end` within the step cap, or the state
    /// became non-finite.
    #[error("Divergence at t = {time:.6e} after {steps} steps: {reason}")]
    Divergence {
        /// Simulation time when the run was aborted
        time: f64,
        /// Steps taken in the aborted run
        steps: usize,
        /// Human-readable cause
        reason: String,
    },

    /// A steady-flow root finder failed to bracket or converge.
    #[error("Root finder did not converge: {0}")]
    NoConvergence(String),
}

impl SaintVenantError {
    /// Create a domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Create an invalid-state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a divergence error.
    pub fn divergence(time: f64, steps: usize, reason: impl Into<String>) -> Self {
        Self::Divergence {
            time,
            steps,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SaintVenantError>;
