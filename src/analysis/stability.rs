//! Stability monitoring for channel simulations.
//!
//! The Lax scheme fails loudly: once the Courant number exceeds one, or an
//! open end keeps reflecting a wave, depths and velocities grow without
//! bound within a few dozen steps. The monitor inspects the state after each
//! step and flags the symptoms before they turn into NaNs.
//!
//! # Example
//!
//! ```ignore
//! use saint_venant::analysis::{StabilityMonitor, StabilityThresholds};
//!
//! let mut monitor = StabilityMonitor::new(StabilityThresholds::default());
//! loop {
//!     let report = solver.advance_step()?;
//!     let status = monitor.check(solver.state(), &report);
//!     if monitor.should_stop() {
//!         monitor.log_report(report.time, solver.step_count());
//!         break;
//!     }
//! }
//! ```

use log::warn;

use crate::solver::{FlowState, StepReport};

/// Thresholds for stability monitoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityThresholds {
    /// Maximum allowed water depth (m).
    pub max_depth: f64,
    /// Maximum velocity magnitude (m/s).
    pub max_velocity: f64,
    /// Maximum Courant number.
    pub max_courant: f64,
    /// Minimum timestep before warning (s).
    pub min_dt: f64,
    /// Maximum consecutive warnings before recommending stop.
    pub max_consecutive_warnings: usize,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            max_depth: 100.0,
            max_velocity: 30.0,
            max_courant: 1.0,
            min_dt: 1e-4,
            max_consecutive_warnings: 10,
        }
    }
}

impl StabilityThresholds {
    /// Strict thresholds for detecting issues early.
    pub fn strict() -> Self {
        Self {
            max_depth: 20.0,
            max_velocity: 10.0,
            max_courant: 0.9,
            min_dt: 1e-3,
            max_consecutive_warnings: 3,
        }
    }

    /// Relaxed thresholds that only catch catastrophic blow-up.
    pub fn relaxed() -> Self {
        Self {
            max_depth: 1e4,
            max_velocity: 1e3,
            max_courant: 2.0,
            min_dt: 1e-8,
            max_consecutive_warnings: 100,
        }
    }

    /// Thresholds scaled to a reference depth h₀: depth may grow to ten
    /// times h₀ and velocity to five times √(g h₀).
    pub fn for_depth(h0: f64, g: f64) -> Self {
        Self {
            max_depth: 10.0 * h0,
            max_velocity: 5.0 * (g * h0).sqrt(),
            ..Self::default()
        }
    }

    /// Set maximum depth threshold.
    pub fn with_max_depth(mut self, max_depth: f64) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set maximum velocity threshold.
    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Set maximum Courant number.
    pub fn with_max_courant(mut self, max_courant: f64) -> Self {
        self.max_courant = max_courant;
        self
    }

    /// Set minimum timestep threshold.
    pub fn with_min_dt(mut self, min_dt: f64) -> Self {
        self.min_dt = min_dt;
        self
    }
}

/// Types of stability warnings.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilityWarning {
    /// Water depth exceeds maximum threshold.
    DepthExceedsMax { node: usize, value: f64, threshold: f64 },
    /// Velocity magnitude exceeds threshold.
    VelocityExceedsMax { node: usize, value: f64, threshold: f64 },
    /// The step ran above the Courant limit.
    CourantExceeded { value: f64, threshold: f64 },
    /// Timestep dropped below minimum.
    TimestepBelowMin { value: f64, threshold: f64 },
    /// Depth undershot zero and was clamped to the floor.
    NegativeDepthClamped { count: usize },
    /// Non-finite depth or discharge.
    NonFiniteValue { node: usize },
    /// Solution has blown up catastrophically.
    SolutionBlowUp,
}

impl std::fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthExceedsMax {
                node,
                value,
                threshold,
            } => write!(
                f,
                "Depth exceeds max: h={:.2}m > {:.2}m at node {}",
                value, threshold, node
            ),
            Self::VelocityExceedsMax {
                node,
                value,
                threshold,
            } => write!(
                f,
                "Velocity exceeds max: |v|={:.2}m/s > {:.2}m/s at node {}",
                value, threshold, node
            ),
            Self::CourantExceeded { value, threshold } => {
                write!(f, "Courant number {:.3} > {:.3}", value, threshold)
            }
            Self::TimestepBelowMin { value, threshold } => {
                write!(f, "Timestep below min: dt={:.2e}s < {:.2e}s", value, threshold)
            }
            Self::NegativeDepthClamped { count } => {
                write!(f, "{} negative depth(s) clamped", count)
            }
            Self::NonFiniteValue { node } => write!(f, "Non-finite value at node {}", node),
            Self::SolutionBlowUp => write!(f, "SOLUTION BLOW-UP DETECTED"),
        }
    }
}

/// Stability diagnostics of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityStatus {
    /// Water depth range (min, max).
    pub h_range: (f64, f64),
    /// Maximum velocity magnitude.
    pub max_velocity: f64,
    /// Timestep of the step.
    pub dt: f64,
    /// Courant number of the step.
    pub courant: f64,
    /// Whether no warning was raised.
    pub is_stable: bool,
    /// Warnings raised.
    pub warnings: Vec<StabilityWarning>,
}

impl StabilityStatus {
    /// Check if any warnings were generated.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if any critical warnings (blow-up, non-finite) were detected.
    pub fn has_critical_warnings(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                StabilityWarning::SolutionBlowUp | StabilityWarning::NonFiniteValue { .. }
            )
        })
    }
}

/// Monitor for tracking solution stability over a run.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    thresholds: StabilityThresholds,
    consecutive_warnings: usize,
    total_checks: usize,
    total_warnings: usize,
    last_status: Option<StabilityStatus>,
}

impl StabilityMonitor {
    /// Create a new stability monitor with the given thresholds.
    pub fn new(thresholds: StabilityThresholds) -> Self {
        Self {
            thresholds,
            consecutive_warnings: 0,
            total_checks: 0,
            total_warnings: 0,
            last_status: None,
        }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> &StabilityThresholds {
        &self.thresholds
    }

    /// Number of consecutive checks that raised warnings.
    pub fn consecutive_warnings(&self) -> usize {
        self.consecutive_warnings
    }

    /// Total number of checks performed.
    pub fn total_checks(&self) -> usize {
        self.total_checks
    }

    /// Total number of warnings raised.
    pub fn total_warnings(&self) -> usize {
        self.total_warnings
    }

    /// Status of the most recent check.
    pub fn last_status(&self) -> Option<&StabilityStatus> {
        self.last_status.as_ref()
    }

    /// Inspect the state left behind by the step described in `report`.
    pub fn check(&mut self, state: &FlowState, report: &StepReport) -> StabilityStatus {
        self.total_checks += 1;

        let mut warnings = Vec::new();
        let mut max_h = f64::NEG_INFINITY;
        let mut min_h = f64::INFINITY;
        let mut max_vel = 0.0_f64;
        let mut found_blow_up = false;

        let depth = state.depth();
        let discharge = state.discharge();
        let velocity = state.velocity();

        for i in 0..state.n_nodes() {
            let h = depth[i];
            if !h.is_finite() || !discharge[i].is_finite() {
                warnings.push(StabilityWarning::NonFiniteValue { node: i });
                found_blow_up = true;
                continue;
            }

            max_h = max_h.max(h);
            min_h = min_h.min(h);
            if h > self.thresholds.max_depth {
                warnings.push(StabilityWarning::DepthExceedsMax {
                    node: i,
                    value: h,
                    threshold: self.thresholds.max_depth,
                });
            }

            let vel = velocity[i].abs();
            max_vel = max_vel.max(vel);
            if vel > self.thresholds.max_velocity {
                warnings.push(StabilityWarning::VelocityExceedsMax {
                    node: i,
                    value: vel,
                    threshold: self.thresholds.max_velocity,
                });
            }
        }

        if !report.stagnant {
            if report.courant > self.thresholds.max_courant {
                warnings.push(StabilityWarning::CourantExceeded {
                    value: report.courant,
                    threshold: self.thresholds.max_courant,
                });
            }
            if report.dt < self.thresholds.min_dt {
                warnings.push(StabilityWarning::TimestepBelowMin {
                    value: report.dt,
                    threshold: self.thresholds.min_dt,
                });
            }
        }
        if report.negative_depth_events > 0 {
            warnings.push(StabilityWarning::NegativeDepthClamped {
                count: report.negative_depth_events,
            });
        }

        if found_blow_up || max_h > 1e6 || max_vel > 1e6 {
            warnings.push(StabilityWarning::SolutionBlowUp);
        }

        let is_stable = warnings.is_empty();
        if is_stable {
            self.consecutive_warnings = 0;
        } else {
            self.consecutive_warnings += 1;
            self.total_warnings += warnings.len();
        }

        let status = StabilityStatus {
            h_range: (min_h, max_h),
            max_velocity: max_vel,
            dt: report.dt,
            courant: report.courant,
            is_stable,
            warnings,
        };

        self.last_status = Some(status.clone());
        status
    }

    /// Whether the warning history suggests stopping the run.
    pub fn should_stop(&self) -> bool {
        if self.consecutive_warnings >= self.thresholds.max_consecutive_warnings {
            return true;
        }
        self.last_status
            .as_ref()
            .is_some_and(|status| status.has_critical_warnings())
    }

    /// Suggested remediation for the warnings of the last check.
    pub fn suggest_remediation(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if let Some(status) = &self.last_status {
            for warning in &status.warnings {
                let text = match warning {
                    StabilityWarning::CourantExceeded { .. } => {
                        "Courant number above one: lower the CFL factor or the fixed time step"
                    }
                    StabilityWarning::DepthExceedsMax { .. }
                    | StabilityWarning::VelocityExceedsMax { .. } => {
                        "Growth at an open end: switch to zero-gradient extrapolation or prescribe the boundary"
                    }
                    StabilityWarning::TimestepBelowMin { .. } => {
                        "Timestep too small: a wave speed is growing, the solution may be unstable"
                    }
                    StabilityWarning::NegativeDepthClamped { .. } => {
                        "Depth undershoots at a wet/dry front: refine the grid or lower the CFL factor"
                    }
                    StabilityWarning::NonFiniteValue { .. } | StabilityWarning::SolutionBlowUp => {
                        "Solution blow-up: restart with a smaller time step"
                    }
                };
                suggestions.push(text.to_string());
            }
        }

        suggestions.sort();
        suggestions.dedup();
        suggestions
    }

    /// Log the last status through `log::warn!` if it raised warnings.
    pub fn log_report(&self, time: f64, step: usize) {
        let Some(status) = &self.last_status else {
            return;
        };
        if status.is_stable {
            return;
        }

        warn!(
            "Stability warning at t = {:.3} s, step {}: h in [{:.3}, {:.3}] m, max |v| = {:.3} m/s, \
             dt = {:.2e} s, Cr = {:.3}",
            time, step, status.h_range.0, status.h_range.1, status.max_velocity, status.dt, status.courant
        );
        for warning in &status.warnings {
            warn!("  - {}", warning);
        }
        if self.should_stop() {
            warn!("Recommendation: stop the simulation");
            for suggestion in self.suggest_remediation() {
                warn!("  * {}", suggestion);
            }
        }
    }
}

impl Default for StabilityMonitor {
    fn default() -> Self {
        Self::new(StabilityThresholds::default())
    }
}
