//! Boundary conditions at the two ends of the channel.
//!
//! A provider is asked once per step, at the new time level t + dt, what it
//! prescribes at its end. The solver turns the answer into the boundary
//! node's depth and discharge; providers never touch the flow state.
//!
//! # Available Providers
//!
//! | Provider | Prescription |
//! |----------|--------------|
//! | `FixedState` | Depth and discharge (Dirichlet) |
//! | `FixedDischarge` | Discharge, depth extrapolated |
//! | `FixedStage` | Depth, discharge extrapolated |
//! | `Extrapolated` | Both extrapolated from the interior |
//! | `ClosedEnd` | Zero discharge (wall) |
//! | `Hydrograph` | Piecewise-linear time series |
//! | `HarmonicStage` | Mean depth plus harmonic constituents |
//!
//! Any closure `Fn(f64) -> Option<(f64, f64)>` is a provider too: `Some((h, q))`
//! prescribes the full state, `None` falls back to extrapolation.
//!
//! ```ignore
//! solver.set_upstream(|t: f64| Some((2.0, 10.0 + 5.0 * (t / 600.0).min(1.0))));
//! solver.set_downstream(FixedStage::new(1.5));
//! ```

mod fixed;
mod harmonic;
mod hydrograph;

pub use fixed::{ClosedEnd, Extrapolated, FixedDischarge, FixedStage, FixedState};
pub use harmonic::{HarmonicStage, StageConstituent};
pub use hydrograph::{Hydrograph, HydrographKind};

/// What a provider imposes at a boundary node for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryPrescription {
    /// Depth and discharge both given.
    State { depth: f64, discharge: f64 },
    /// Discharge given, depth extrapolated from the interior.
    Discharge(f64),
    /// Depth given, discharge extrapolated from the interior.
    Stage(f64),
    /// Nothing given, both extrapolated from the interior.
    Extrapolate,
}

impl BoundaryPrescription {
    /// Prescribed depth, if any.
    pub fn depth(&self) -> Option<f64> {
        match *self {
            Self::State { depth, .. } | Self::Stage(depth) => Some(depth),
            _ => None,
        }
    }

    /// Prescribed discharge, if any.
    pub fn discharge(&self) -> Option<f64> {
        match *self {
            Self::State { discharge, .. } | Self::Discharge(discharge) => Some(discharge),
            _ => None,
        }
    }
}

impl From<Option<(f64, f64)>> for BoundaryPrescription {
    fn from(value: Option<(f64, f64)>) -> Self {
        match value {
            Some((depth, discharge)) => Self::State { depth, discharge },
            None => Self::Extrapolate,
        }
    }
}

/// Source of boundary values at one end of the channel.
///
/// Implementations must be side-effect free: the same `t` yields the same
/// prescription.
pub trait BoundaryProvider: Send + Sync {
    /// Prescription at time `t`.
    fn prescribe(&self, t: f64) -> BoundaryPrescription;

    /// Name of this provider for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> BoundaryProvider for F
where
    F: Fn(f64) -> Option<(f64, f64)> + Send + Sync,
{
    fn prescribe(&self, t: f64) -> BoundaryPrescription {
        self(t).into()
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed<P: BoundaryProvider + 'static>(p: P) -> Box<dyn BoundaryProvider> {
        Box::new(p)
    }

    #[test]
    fn test_closure_provider() {
        let ramp = |t: f64| {
            if t < 10.0 {
                Some((1.0, t))
            } else {
                None
            }
        };
        assert_eq!(
            ramp.prescribe(4.0),
            BoundaryPrescription::State {
                depth: 1.0,
                discharge: 4.0
            }
        );
        assert_eq!(ramp.prescribe(12.0), BoundaryPrescription::Extrapolate);
        assert_eq!(BoundaryProvider::name(&ramp), "closure");
    }

    #[test]
    fn test_providers_are_object_safe() {
        let providers = [
            boxed(FixedState::new(2.0, 3.0)),
            boxed(FixedDischarge::new(5.0)),
            boxed(FixedStage::new(1.5)),
            boxed(Extrapolated),
            boxed(ClosedEnd),
            boxed(|_t: f64| Some((1.0, 0.0))),
        ];
        let names: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "fixed_state",
                "fixed_discharge",
                "fixed_stage",
                "extrapolated",
                "closed_end",
                "closure"
            ]
        );
    }

    #[test]
    fn test_prescription_accessors() {
        let s = BoundaryPrescription::State {
            depth: 2.0,
            discharge: -1.0,
        };
        assert_eq!(s.depth(), Some(2.0));
        assert_eq!(s.discharge(), Some(-1.0));

        assert_eq!(BoundaryPrescription::Discharge(3.0).depth(), None);
        assert_eq!(BoundaryPrescription::Discharge(3.0).discharge(), Some(3.0));
        assert_eq!(BoundaryPrescription::Stage(1.2).depth(), Some(1.2));
        assert_eq!(BoundaryPrescription::Stage(1.2).discharge(), None);
        assert_eq!(BoundaryPrescription::Extrapolate.depth(), None);
    }
}
