//! Time-marching solver.
//!
//! # Submodules
//!
//! - [`config`]: Solver parameters (gravity, CFL factor, depth floor, time stepping)
//! - [`state`]: Flow state on the node grid (depth, discharge, area, velocity)
//! - [`saint_venant`]: Lax scheme, boundary filling and lifecycle

pub mod config;
pub mod saint_venant;
pub mod state;

pub use config::{BoundaryExtrapolation, SolverConfig, TimeStepping};
pub use saint_venant::{SaintVenantSolver, SolverPhase, StepReport};
pub use state::FlowState;
