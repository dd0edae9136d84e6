//! Time-independent boundary providers.

use super::{BoundaryPrescription, BoundaryProvider};

/// Constant depth and discharge (Dirichlet).
///
/// Typical use: normal-depth inflow/outflow in a steady-state test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedState {
    /// Depth (m)
    pub depth: f64,
    /// Discharge (m³/s)
    pub discharge: f64,
}

impl FixedState {
    /// Create a fixed-state provider.
    pub fn new(depth: f64, discharge: f64) -> Self {
        Self { depth, discharge }
    }
}

impl BoundaryProvider for FixedState {
    fn prescribe(&self, _t: f64) -> BoundaryPrescription {
        BoundaryPrescription::State {
            depth: self.depth,
            discharge: self.discharge,
        }
    }

    fn name(&self) -> &'static str {
        "fixed_state"
    }
}

/// Constant discharge; the depth follows the interior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDischarge {
    /// Discharge (m³/s), positive in +x
    pub discharge: f64,
}

impl FixedDischarge {
    /// Create a fixed-discharge provider.
    pub fn new(discharge: f64) -> Self {
        Self { discharge }
    }
}

impl BoundaryProvider for FixedDischarge {
    fn prescribe(&self, _t: f64) -> BoundaryPrescription {
        BoundaryPrescription::Discharge(self.discharge)
    }

    fn name(&self) -> &'static str {
        "fixed_discharge"
    }
}

/// Constant depth (stage); the discharge follows the interior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStage {
    /// Depth (m)
    pub depth: f64,
}

impl FixedStage {
    /// Create a fixed-stage provider.
    pub fn new(depth: f64) -> Self {
        Self { depth }
    }
}

impl BoundaryProvider for FixedStage {
    fn prescribe(&self, _t: f64) -> BoundaryPrescription {
        BoundaryPrescription::Stage(self.depth)
    }

    fn name(&self) -> &'static str {
        "fixed_stage"
    }
}

/// Open end: depth and discharge extrapolated from the interior.
///
/// Same as leaving the end without a provider.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extrapolated;

impl BoundaryProvider for Extrapolated {
    fn prescribe(&self, _t: f64) -> BoundaryPrescription {
        BoundaryPrescription::Extrapolate
    }

    fn name(&self) -> &'static str {
        "extrapolated"
    }
}

/// Solid wall: no flow through the end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClosedEnd;

impl BoundaryProvider for ClosedEnd {
    fn prescribe(&self, _t: f64) -> BoundaryPrescription {
        BoundaryPrescription::Discharge(0.0)
    }

    fn name(&self) -> &'static str {
        "closed_end"
    }
}
