//! Run loop: repeated steps with snapshot capture.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SaintVenantError};
use crate::solver::{SaintVenantSolver, SolverPhase};

// =============================================================================
// Snapshots
// =============================================================================

/// Deep copy of the flow state at one output time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation time
    pub time: f64,
    /// Depth per node
    pub depth: Vec<f64>,
    /// Discharge per node
    pub discharge: Vec<f64>,
    /// Velocity per node
    pub velocity: Vec<f64>,
}

impl Snapshot {
    /// Copy the solver's current state.
    pub fn capture(solver: &SaintVenantSolver) -> Self {
        let state = solver.state();
        Self {
            time: solver.time(),
            depth: state.depth().to_vec(),
            discharge: state.discharge().to_vec(),
            velocity: state.velocity().to_vec(),
        }
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.depth.len()
    }

    /// Largest depth.
    pub fn max_depth(&self) -> f64 {
        self.depth.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cooperative cancellation flag, checked once per step.
///
/// Clones share the same flag, so one can be handed to another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag for reuse.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

// =============================================================================
// Run result
// =============================================================================

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Reached `t_end`.
    Completed,
    /// Stopped early through a [`CancelFlag`].
    Cancelled,
}

/// Step statistics of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Steps taken (stagnant steps included)
    pub steps: usize,
    /// Smallest time step taken
    pub dt_min: f64,
    /// Largest time step taken
    pub dt_max: f64,
    /// Largest Courant number seen
    pub max_courant: f64,
    /// Negative depths clamped to the floor
    pub negative_depth_events: usize,
    /// Steps skipped because no wave moved
    pub stagnant_steps: usize,
    /// Stored volume at the start of the run
    pub volume_start: f64,
    /// Stored volume at the end of the run
    pub volume_end: f64,
    /// Wall-clock time in seconds
    pub wall_time: f64,
}

impl RunDiagnostics {
    fn new(volume_start: f64) -> Self {
        Self {
            steps: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
            max_courant: 0.0,
            negative_depth_events: 0,
            stagnant_steps: 0,
            volume_start,
            volume_end: volume_start,
            wall_time: 0.0,
        }
    }

    /// (V_end − V_start) / V_start, or 0 for an empty channel.
    pub fn relative_volume_change(&self) -> f64 {
        if self.volume_start > 0.0 {
            (self.volume_end - self.volume_start) / self.volume_start
        } else {
            0.0
        }
    }
}

/// Outcome of [`SaintVenantSolver::run_cancellable`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Completed or cancelled
    pub status: RunStatus,
    /// Time reached
    pub final_time: f64,
    /// Snapshot history of this run
    pub snapshots: Vec<Snapshot>,
    /// Step statistics
    pub diagnostics: RunDiagnostics,
}

// =============================================================================
// Run loop
// =============================================================================

impl SaintVenantSolver {
    /// Step until `t_end`, capturing a snapshot at every multiple of
    /// `output_interval` and at the end.
    ///
    /// Steps are shortened to land exactly on output times, so a run to `T`
    /// followed by a run to `2T` produces the same history as one run to
    /// `2T` whenever `T` is an output time. The first run after an initial
    /// condition also records the state at t = 0.
    ///
    /// Fails with [`SaintVenantError::Divergence`] when the configured step
    /// cap is exhausted before `t_end` or the state becomes non-finite.
    pub fn run(&mut self, t_end: f64, output_interval: f64) -> Result<Vec<Snapshot>> {
        self.run_loop(t_end, output_interval, None)
            .map(|report| report.snapshots)
    }

    /// [`run`](Self::run) with cooperative cancellation and step statistics.
    ///
    /// Cancellation is not an error: the report has status
    /// [`RunStatus::Cancelled`] and ends with a snapshot at the time reached.
    pub fn run_cancellable(
        &mut self,
        t_end: f64,
        output_interval: f64,
        cancel: &CancelFlag,
    ) -> Result<RunReport> {
        self.run_loop(t_end, output_interval, Some(cancel))
    }

    fn run_loop(
        &mut self,
        t_end: f64,
        output_interval: f64,
        cancel: Option<&CancelFlag>,
    ) -> Result<RunReport> {
        if self.phase() == SolverPhase::Uninitialized {
            return Err(SaintVenantError::NotInitialized);
        }
        if !t_end.is_finite() {
            return Err(SaintVenantError::domain(format!(
                "end time must be finite, got {}",
                t_end
            )));
        }
        if !(output_interval.is_finite() && output_interval > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "output interval must be positive, got {}",
                output_interval
            )));
        }

        let start_wall = std::time::Instant::now();
        let max_steps = self.config().max_steps;
        let mut diagnostics = RunDiagnostics::new(self.total_volume());
        let mut snapshots = Vec::new();
        let mut last_snapshot_time = None;

        if self.phase() == SolverPhase::Configured {
            snapshots.push(Snapshot::capture(self));
            last_snapshot_time = Some(self.time());
        }

        let mut output_index = next_output_index(self.time(), output_interval);
        let mut next_output = output_index as f64 * output_interval;
        let mut status = RunStatus::Completed;

        info!(
            "Run from t = {:.4} to t = {:.4}, output every {:.4}",
            self.time(),
            t_end,
            output_interval
        );

        while self.time() < t_end {
            if let Some(flag) = cancel
                && flag.is_cancelled()
            {
                status = RunStatus::Cancelled;
                break;
            }
            if diagnostics.steps >= max_steps {
                return Err(SaintVenantError::divergence(
                    self.time(),
                    diagnostics.steps,
                    format!("step cap {} reached before t_end = {}", max_steps, t_end),
                ));
            }

            let target = next_output.min(t_end);
            let report = self.advance_step_until(target)?;
            diagnostics.steps += 1;

            if report.stagnant {
                diagnostics.stagnant_steps += 1;
                self.skip_to(target);
            } else {
                diagnostics.dt_min = diagnostics.dt_min.min(report.dt);
                diagnostics.dt_max = diagnostics.dt_max.max(report.dt);
                diagnostics.max_courant = diagnostics.max_courant.max(report.courant);
                diagnostics.negative_depth_events += report.negative_depth_events;
            }

            if self.time() >= next_output {
                snapshots.push(Snapshot::capture(self));
                last_snapshot_time = Some(self.time());
                output_index = next_output_index(self.time(), output_interval);
                next_output = output_index as f64 * output_interval;
            }
        }

        if last_snapshot_time != Some(self.time()) {
            snapshots.push(Snapshot::capture(self));
        }
        if status == RunStatus::Completed {
            self.mark_completed();
        }

        diagnostics.volume_end = self.total_volume();
        diagnostics.wall_time = start_wall.elapsed().as_secs_f64();

        info!(
            "Run {:?} at t = {:.4}: {} steps, dt in [{:.3e}, {:.3e}], max Courant {:.3}, \
             {} negative-depth events, {} snapshots",
            status,
            self.time(),
            diagnostics.steps,
            diagnostics.dt_min,
            diagnostics.dt_max,
            diagnostics.max_courant,
            diagnostics.negative_depth_events,
            snapshots.len()
        );

        Ok(RunReport {
            status,
            final_time: self.time(),
            snapshots,
            diagnostics,
        })
    }
}

/// Smallest k with k · interval > t.
fn next_output_index(t: f64, interval: f64) -> u64 {
    let mut k = (t / interval).floor().max(0.0) as u64;
    while k as f64 * interval <= t {
        k += 1;
    }
    k
}
