//! # saint-venant
//!
//! Explicit solver for one-dimensional unsteady open-channel flow.
//!
//! Given a prismatic channel (cross-section, bed slope, Manning roughness),
//! an initial flow state and time-varying boundary conditions, the crate
//! evolves water depth and discharge along the channel with the first-order
//! Lax scheme, including discontinuous dam-break releases.
//!
//! This crate provides:
//! - Channel cross-sections (rectangular, trapezoidal, compound) and steady
//!   normal/critical depth helpers
//! - The Saint-Venant equations in area/discharge form
//! - Momentum source terms (bed slope, Manning friction)
//! - Boundary providers (fixed state, discharge, stage, hydrographs, closures)
//! - A CFL-adaptive time-marching solver with snapshot output
//! - Ritter and Stoker dam-break solutions for validation
//!
//! # Example
//! ```ignore
//! use saint_venant::prelude::*;
//!
//! let channel = Channel::new(ChannelGeometry::trapezoidal(5.0, 1.5)?, 0.001, 0.03)?;
//! let grid = Grid1D::new(5000.0, 251)?;
//! let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid)?;
//!
//! let hn = solver.set_normal_flow(20.0)?;
//! solver.set_upstream(Hydrograph::discharge(&[(0.0, 20.0), (600.0, 60.0), (1800.0, 20.0)])?);
//! solver.set_downstream(FixedStage::new(hn));
//!
//! let snapshots = solver.run(3600.0, 300.0)?;
//! ```

pub mod analysis;
pub mod boundary;
pub mod channel;
pub mod equations;
pub mod error;
pub mod mesh;
pub mod simulation;
pub mod solver;
pub mod source;

// Re-export main types for convenience
pub use analysis::{DamBreakSolution, StabilityMonitor, StabilityThresholds};
pub use boundary::{
    BoundaryPrescription, BoundaryProvider, ClosedEnd, Extrapolated, FixedDischarge, FixedStage,
    FixedState, HarmonicStage, Hydrograph,
};
pub use channel::{Channel, ChannelGeometry, critical_depth, froude_number, normal_depth};
pub use equations::SaintVenant1D;
pub use error::{Result, SaintVenantError};
pub use mesh::{ChannelEnd, Grid1D};
pub use simulation::{
    CancelFlag, RunDiagnostics, RunReport, RunStatus, Snapshot, SweepCase, SweepResult, run_sweep,
};
pub use solver::{
    BoundaryExtrapolation, FlowState, SaintVenantSolver, SolverConfig, SolverPhase, StepReport,
    TimeStepping,
};
pub use source::{BedSlope, ManningFriction, SourceContext, SourceSet, SourceTerm};

/// Everything needed to set up and run a channel simulation.
pub mod prelude {
    pub use crate::analysis::DamBreakSolution;
    pub use crate::boundary::{
        BoundaryPrescription, BoundaryProvider, ClosedEnd, Extrapolated, FixedDischarge,
        FixedStage, FixedState, HarmonicStage, Hydrograph,
    };
    pub use crate::channel::{Channel, ChannelGeometry};
    pub use crate::error::{Result, SaintVenantError};
    pub use crate::mesh::Grid1D;
    pub use crate::simulation::{CancelFlag, RunReport, RunStatus, Snapshot};
    pub use crate::solver::{BoundaryExtrapolation, SaintVenantSolver, SolverConfig};
}
