//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaintVenantError};

/// Time step selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeStepping {
    /// dt = cfl_factor · dx / max(|v| + c), recomputed every step.
    Adaptive,
    /// Constant dt; the Courant number is only monitored.
    Fixed { dt: f64 },
}

/// How an end without a prescribed value is filled from the interior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryExtrapolation {
    /// A_b = 2·A₁ − A₂, Q_b = 2·Q₁ − Q₂.
    ///
    /// Undoes the Lax averaging next to the boundary, so a wave reaching an
    /// open end under this rule is only weakly damped.
    #[default]
    Linear,
    /// A_b = A₁, Q_b = Q₁.
    ZeroGradient,
}

/// Construction parameters of a [`SaintVenantSolver`](super::SaintVenantSolver).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// CFL safety factor for adaptive stepping
    pub cfl_factor: f64,
    /// Depth floor applied after every update (m)
    pub min_depth_floor: f64,
    /// Time step selection
    pub time_step: TimeStepping,
    /// Step cap per `run()` call
    pub max_steps: usize,
    /// Fill rule for unprescribed boundary values
    pub extrapolation: BoundaryExtrapolation,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            cfl_factor: 0.7,
            min_depth_floor: 0.01,
            time_step: TimeStepping::Adaptive,
            max_steps: 100_000,
            extrapolation: BoundaryExtrapolation::Linear,
        }
    }
}

impl SolverConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the CFL safety factor.
    pub fn with_cfl(mut self, cfl_factor: f64) -> Self {
        self.cfl_factor = cfl_factor;
        self
    }

    /// Set the depth floor.
    pub fn with_min_depth_floor(mut self, floor: f64) -> Self {
        self.min_depth_floor = floor;
        self
    }

    /// Use a constant time step.
    pub fn with_fixed_dt(mut self, dt: f64) -> Self {
        self.time_step = TimeStepping::Fixed { dt };
        self
    }

    /// Use CFL-adaptive time stepping.
    pub fn with_adaptive_dt(mut self) -> Self {
        self.time_step = TimeStepping::Adaptive;
        self
    }

    /// Set the step cap.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the extrapolation rule for open ends.
    pub fn with_extrapolation(mut self, extrapolation: BoundaryExtrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Check the physical and numerical parameters.
    ///
    /// A CFL factor ≥ 1 is accepted; the solver warns about it instead.
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        if !(self.cfl_factor.is_finite() && self.cfl_factor > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "CFL factor must be positive, got {}",
                self.cfl_factor
            )));
        }
        if !(self.min_depth_floor.is_finite() && self.min_depth_floor >= 0.0) {
            return Err(SaintVenantError::domain(format!(
                "depth floor must be non-negative, got {}",
                self.min_depth_floor
            )));
        }
        if let TimeStepping::Fixed { dt } = self.time_step
            && !(dt.is_finite() && dt > 0.0)
        {
            return Err(SaintVenantError::domain(format!(
                "fixed time step must be positive, got {}",
                dt
            )));
        }
        if self.max_steps == 0 {
            return Err(SaintVenantError::domain("step cap must be at least 1"));
        }
        Ok(())
    }
}
