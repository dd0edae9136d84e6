//! Running a solver to a target time.
//!
//! - [`SaintVenantSolver::run`](crate::solver::SaintVenantSolver::run): step
//!   to `t_end`, returning the snapshot history
//! - [`SaintVenantSolver::run_cancellable`](crate::solver::SaintVenantSolver::run_cancellable):
//!   same with a [`CancelFlag`] and [`RunDiagnostics`]
//! - [`sweep::run_sweep`]: many independent solvers, optionally on rayon
//!
//! # Example
//! ```ignore
//! use saint_venant::prelude::*;
//!
//! let channel = Channel::frictionless(ChannelGeometry::rectangular(50.0)?)?;
//! let grid = Grid1D::new(10_000.0, 1001)?;
//! let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid)?;
//! solver.set_dam_break(10.0, 0.0, 5000.0)?;
//!
//! let snapshots = solver.run(60.0, 10.0)?;
//! for s in &snapshots {
//!     println!("t = {:.1}, max depth = {:.3}", s.time, s.max_depth());
//! }
//! ```

mod runner;
pub mod sweep;

pub use runner::{CancelFlag, RunDiagnostics, RunReport, RunStatus, Snapshot};
pub use sweep::{SweepCase, SweepResult, run_sweep};
