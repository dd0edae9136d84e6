//! Explicit Lax solver for the 1D Saint-Venant equations.
//!
//! One step advances the interior nodes with the Lax scheme
//!
//! A_i' = ½(A_{i-1} + A_{i+1}) − dt/(2dx) (Q_{i+1} − Q_{i-1})
//! Q_i' = ½(Q_{i-1} + Q_{i+1}) − dt/(2dx) (F_{i+1} − F_{i-1}) + dt S_i
//!
//! with F = Q²/A + g A²/(2T) and S = g A (S0 − Sf), then fills both end nodes
//! from the boundary providers at t + dt. The old state is only read and the
//! new values are written into scratch buffers, which are swapped in once the
//! whole update is finite.

use log::{debug, info, trace, warn};

use super::config::{BoundaryExtrapolation, SolverConfig, TimeStepping};
use super::state::FlowState;
use crate::boundary::{BoundaryPrescription, BoundaryProvider};
use crate::channel::{Channel, ChannelGeometry, normal_depth};
use crate::equations::SaintVenant1D;
use crate::error::{Result, SaintVenantError};
use crate::mesh::{ChannelEnd, Grid1D};
use crate::source::{SourceContext, SourceSet, SourceTerm};

/// Lifecycle of a solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverPhase {
    /// Constructed, no initial condition yet.
    Uninitialized,
    /// Initial condition set, no step taken.
    Configured,
    /// Stepping.
    Running,
    /// A `run()` reached its end time.
    Completed,
}

/// Outcome of one call to [`SaintVenantSolver::advance_step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Time after the step
    pub time: f64,
    /// Time step taken (0 for a stagnant step)
    pub dt: f64,
    /// Largest |v| + c over the interior nodes before the step
    pub c_max: f64,
    /// Courant number c_max · dt / dx
    pub courant: f64,
    /// Nodes whose depth undershot zero before clamping
    pub negative_depth_events: usize,
    /// No wave speed anywhere; the state was left unchanged
    pub stagnant: bool,
}

/// Saint-Venant solver on a prismatic channel.
pub struct SaintVenantSolver {
    config: SolverConfig,
    channel: Channel,
    grid: Grid1D,
    equations: SaintVenant1D,
    sources: SourceSet,
    upstream: Option<Box<dyn BoundaryProvider>>,
    downstream: Option<Box<dyn BoundaryProvider>>,
    state: FlowState,

    // Scratch buffers for the next time level
    next_area: Vec<f64>,
    next_discharge: Vec<f64>,
    next_depth: Vec<f64>,
    flux: Vec<f64>,

    time: f64,
    step_count: usize,
    last_dt: f64,
    negative_depth_events: usize,
    stagnant_steps: usize,
    phase: SolverPhase,
    courant_warned: bool,
}

impl SaintVenantSolver {
    /// Create a solver for `channel` discretized on `grid`.
    ///
    /// Bed slope and Manning friction of the channel are registered as source
    /// terms. The solver starts [`SolverPhase::Uninitialized`].
    pub fn new(config: SolverConfig, channel: Channel, grid: Grid1D) -> Result<Self> {
        config.validate()?;
        channel.validate()?;
        grid.validate()?;

        if config.time_step == TimeStepping::Adaptive && config.cfl_factor >= 1.0 {
            warn!(
                "CFL factor {} >= 1: the Lax scheme is unstable above unit Courant number",
                config.cfl_factor
            );
        }

        let g = config.gravity;
        let n = grid.n_nodes;
        let sources = SourceSet::for_channel(g, channel.bed_slope, channel.manning_n);
        let state = FlowState::new(n, config.min_depth_floor, &channel.geometry);

        debug!(
            "Saint-Venant solver: {} nodes, dx = {:.4}, sources {:?}",
            n, grid.dx, sources
        );

        Ok(Self {
            equations: SaintVenant1D::new(g),
            config,
            channel,
            grid,
            sources,
            upstream: None,
            downstream: None,
            state,
            next_area: vec![0.0; n],
            next_discharge: vec![0.0; n],
            next_depth: vec![0.0; n],
            flux: vec![0.0; n],
            time: 0.0,
            step_count: 0,
            last_dt: 0.0,
            negative_depth_events: 0,
            stagnant_steps: 0,
            phase: SolverPhase::Uninitialized,
            courant_warned: false,
        })
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Uniform depth and discharge everywhere.
    pub fn set_uniform(&mut self, h0: f64, q0: f64) -> Result<()> {
        self.state.set_uniform(&self.channel.geometry, h0, q0)?;
        self.reset_clock();
        Ok(())
    }

    /// Arbitrary initial profile; both slices must have one value per node.
    pub fn set_from_arrays(&mut self, depth: &[f64], discharge: &[f64]) -> Result<()> {
        self.state
            .set_from_arrays(&self.channel.geometry, depth, discharge)?;
        self.reset_clock();
        Ok(())
    }

    /// Still water with a step from `h_up` to `h_down` at `x_dam`.
    pub fn set_dam_break(&mut self, h_up: f64, h_down: f64, x_dam: f64) -> Result<()> {
        self.state
            .set_dam_break(&self.channel.geometry, &self.grid, h_up, h_down, x_dam)?;
        self.reset_clock();
        Ok(())
    }

    /// Uniform flow at normal depth for discharge `q`. Returns the depth.
    pub fn set_normal_flow(&mut self, q: f64) -> Result<f64> {
        let hn = normal_depth(&self.channel, q)?;
        self.set_uniform(hn, q)?;
        Ok(hn)
    }

    fn reset_clock(&mut self) {
        self.time = 0.0;
        self.step_count = 0;
        self.last_dt = 0.0;
        self.negative_depth_events = 0;
        self.stagnant_steps = 0;
        self.courant_warned = false;
        self.phase = SolverPhase::Configured;
    }

    /// Provider for the upstream end (x = 0).
    pub fn set_upstream<P: BoundaryProvider + 'static>(&mut self, provider: P) {
        self.upstream = Some(Box::new(provider));
    }

    /// Provider for the downstream end (x = L).
    pub fn set_downstream<P: BoundaryProvider + 'static>(&mut self, provider: P) {
        self.downstream = Some(Box::new(provider));
    }

    /// Remove the provider at `end`; it falls back to extrapolation.
    pub fn clear_boundary(&mut self, end: ChannelEnd) {
        match end {
            ChannelEnd::Upstream => self.upstream = None,
            ChannelEnd::Downstream => self.downstream = None,
        }
    }

    /// Register an additional momentum source term.
    pub fn add_source(&mut self, source: Box<dyn SourceTerm>) {
        self.sources.push(source);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Channel geometry, slope and roughness.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Cross-section shape.
    pub fn geometry(&self) -> &ChannelGeometry {
        &self.channel.geometry
    }

    /// Node grid.
    pub fn grid(&self) -> &Grid1D {
        &self.grid
    }

    /// Equation constants.
    pub fn equations(&self) -> &SaintVenant1D {
        &self.equations
    }

    /// Registered source terms.
    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// Current flow state.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Steps taken since the initial condition was set.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Time step of the most recent step.
    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    /// Negative-depth undershoots clamped since the initial condition was set.
    pub fn negative_depth_events(&self) -> usize {
        self.negative_depth_events
    }

    /// Stagnant steps since the initial condition was set.
    pub fn stagnant_steps(&self) -> usize {
        self.stagnant_steps
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Stored water volume ∫A dx.
    pub fn total_volume(&self) -> f64 {
        self.state.total_volume(self.grid.dx)
    }

    /// Largest Froude number on the grid.
    pub fn max_froude(&self) -> f64 {
        self.state
            .max_froude(&self.channel.geometry, self.equations.g)
    }

    /// Largest |v| + √(g h) over the interior nodes. NaN if any is NaN.
    pub fn max_wave_speed(&self) -> f64 {
        let depth = self.state.depth();
        let velocity = self.state.velocity();
        self.grid.interior().fold(0.0, |m: f64, i| {
            let s = velocity[i].abs() + self.equations.celerity(depth[i]);
            if s.is_nan() || m.is_nan() {
                f64::NAN
            } else {
                m.max(s)
            }
        })
    }

    /// Time step the solver would take now, before any clipping.
    ///
    /// `None` when the flow is stagnant in adaptive mode.
    pub fn stable_dt(&self) -> Option<f64> {
        match self.config.time_step {
            TimeStepping::Fixed { dt } => Some(dt),
            TimeStepping::Adaptive => {
                let c_max = self.max_wave_speed();
                (c_max > 0.0).then(|| self.config.cfl_factor * self.grid.dx / c_max)
            }
        }
    }

    // =========================================================================
    // Time stepping
    // =========================================================================

    /// Advance one time step.
    pub fn advance_step(&mut self) -> Result<StepReport> {
        self.step(None)
    }

    /// Advance one time step without passing `target`; a step that would
    /// overshoot is shortened to land exactly on it.
    pub fn advance_step_until(&mut self, target: f64) -> Result<StepReport> {
        if target.is_nan() || target <= self.time {
            return Err(SaintVenantError::invalid_state(format!(
                "target time {} is not ahead of the current time {}",
                target, self.time
            )));
        }
        self.step(Some(target))
    }

    fn step(&mut self, target: Option<f64>) -> Result<StepReport> {
        if self.phase == SolverPhase::Uninitialized {
            return Err(SaintVenantError::NotInitialized);
        }
        self.phase = SolverPhase::Running;

        let c_max = self.max_wave_speed();
        if !c_max.is_finite() {
            return Err(SaintVenantError::divergence(
                self.time,
                self.step_count,
                format!("non-finite wave speed {}", c_max),
            ));
        }
        if c_max == 0.0 {
            self.stagnant_steps += 1;
            info!("Stagnant flow at t = {:.4}: no wave speed, step skipped", self.time);
            return Ok(StepReport {
                time: self.time,
                dt: 0.0,
                c_max,
                courant: 0.0,
                negative_depth_events: 0,
                stagnant: true,
            });
        }

        let dx = self.grid.dx;
        let mut dt = match self.config.time_step {
            TimeStepping::Adaptive => self.config.cfl_factor * dx / c_max,
            TimeStepping::Fixed { dt } => dt,
        };
        let mut t_new = self.time + dt;
        if let Some(target) = target
            && t_new >= target
        {
            dt = target - self.time;
            t_new = target;
        }

        let courant = c_max * dt / dx;
        if courant >= 1.0 {
            if !self.courant_warned {
                warn!(
                    "Courant number {:.3} >= 1 at t = {:.4} (dt = {:.3e}, c_max = {:.3})",
                    courant, self.time, dt, c_max
                );
                self.courant_warned = true;
            }
        } else {
            self.courant_warned = false;
        }

        self.lax_update(dt);
        self.fill_boundaries(t_new);

        if let Some(i) = (0..self.grid.n_nodes)
            .find(|&i| !(self.next_depth[i].is_finite() && self.next_discharge[i].is_finite()))
        {
            return Err(SaintVenantError::divergence(
                self.time,
                self.step_count,
                format!(
                    "non-finite state at node {} (h = {}, Q = {})",
                    i, self.next_depth[i], self.next_discharge[i]
                ),
            ));
        }

        // Commit: swap the new time level in
        {
            let (depth, discharge) = self.state.prognostic_mut();
            std::mem::swap(depth, &mut self.next_depth);
            std::mem::swap(discharge, &mut self.next_discharge);
        }
        let negative = self.state.apply_floor();
        self.state.refresh_derived(&self.channel.geometry);
        if negative > 0 {
            debug!(
                "{} negative depth(s) clamped to {} at t = {:.4}",
                negative, self.config.min_depth_floor, t_new
            );
        }

        self.time = t_new;
        self.step_count += 1;
        self.last_dt = dt;
        self.negative_depth_events += negative;

        trace!(
            "step {}: t = {:.4}, dt = {:.3e}, c_max = {:.3}, Cr = {:.3}",
            self.step_count, self.time, dt, c_max, courant
        );

        Ok(StepReport {
            time: t_new,
            dt,
            c_max,
            courant,
            negative_depth_events: negative,
            stagnant: false,
        })
    }

    /// Interior Lax update into the scratch buffers.
    fn lax_update(&mut self, dt: f64) {
        let geometry = &self.channel.geometry;
        let depth = self.state.depth();
        let area = self.state.area();
        let discharge = self.state.discharge();
        let n = self.grid.n_nodes;

        for i in 0..n {
            let top_width = geometry.top_width_unchecked(depth[i]);
            self.flux[i] = self
                .equations
                .momentum_flux(discharge[i], area[i], top_width);
        }

        // End nodes are overwritten by the boundary fill; seed them with the
        // old level so a 3-node grid extrapolates from defined values.
        self.next_area.copy_from_slice(area);
        self.next_discharge.copy_from_slice(discharge);
        self.next_depth.copy_from_slice(depth);

        let r = dt / (2.0 * self.grid.dx);
        let with_sources = !self.sources.is_empty();
        for i in self.grid.interior() {
            let a_new =
                0.5 * (area[i - 1] + area[i + 1]) - r * (discharge[i + 1] - discharge[i - 1]);

            let source = if with_sources {
                let ctx = SourceContext {
                    area: area[i],
                    discharge: discharge[i],
                    hydraulic_radius: geometry.hydraulic_radius_unchecked(depth[i]),
                    position: self.grid.x(i),
                    time: self.time,
                };
                self.sources.evaluate(&ctx)
            } else {
                0.0
            };
            let q_new = 0.5 * (discharge[i - 1] + discharge[i + 1])
                - r * (self.flux[i + 1] - self.flux[i - 1])
                + dt * source;

            self.next_area[i] = a_new;
            self.next_discharge[i] = q_new;
            self.next_depth[i] = geometry.depth_from_area(a_new);
        }
    }

    /// Fill both end nodes of the scratch buffers for time `t`.
    fn fill_boundaries(&mut self, t: f64) {
        for end in [ChannelEnd::Upstream, ChannelEnd::Downstream] {
            let provider = match end {
                ChannelEnd::Upstream => self.upstream.as_deref(),
                ChannelEnd::Downstream => self.downstream.as_deref(),
            };
            let prescription = provider.map_or(BoundaryPrescription::Extrapolate, |p| p.prescribe(t));

            let (b, i1, i2) = end.stencil(self.grid.n_nodes);
            let (a_ext, q_ext) = match self.config.extrapolation {
                BoundaryExtrapolation::Linear => (
                    2.0 * self.next_area[i1] - self.next_area[i2],
                    2.0 * self.next_discharge[i1] - self.next_discharge[i2],
                ),
                BoundaryExtrapolation::ZeroGradient => {
                    (self.next_area[i1], self.next_discharge[i1])
                }
            };

            let geometry = &self.channel.geometry;
            let (h, q) = match prescription {
                BoundaryPrescription::State { depth, discharge } => (depth, discharge),
                BoundaryPrescription::Discharge(q) => (geometry.depth_from_area(a_ext), q),
                BoundaryPrescription::Stage(h) => (h, q_ext),
                BoundaryPrescription::Extrapolate => (geometry.depth_from_area(a_ext), q_ext),
            };
            self.next_depth[b] = h;
            self.next_discharge[b] = q;
        }
    }

    /// Move the clock to `t` without changing the state (stagnant flow).
    pub(crate) fn skip_to(&mut self, t: f64) {
        if t > self.time {
            self.time = t;
        }
    }

    /// Mark the end of a `run()`.
    pub(crate) fn mark_completed(&mut self) {
        if self.phase != SolverPhase::Uninitialized {
            self.phase = SolverPhase::Completed;
        }
    }
}

impl std::fmt::Debug for SaintVenantSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaintVenantSolver")
            .field("channel", &self.channel)
            .field("grid", &self.grid)
            .field("sources", &self.sources)
            .field("upstream", &self.upstream.as_ref().map(|p| p.name()))
            .field("downstream", &self.downstream.as_ref().map(|p| p.name()))
            .field("time", &self.time)
            .field("step_count", &self.step_count)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
