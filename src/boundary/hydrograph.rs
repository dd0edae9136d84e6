//! Piecewise-linear boundary time series.
//!
//! A hydrograph is a list of `(t, value)` records. Between records the value
//! is interpolated linearly; before the first and after the last record it is
//! held constant.

use super::{BoundaryPrescription, BoundaryProvider};
use crate::error::{Result, SaintVenantError};

/// Which boundary quantity the records carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrographKind {
    /// Discharge series; depth extrapolated.
    Discharge,
    /// Depth series; discharge extrapolated.
    Stage,
    /// Depth and discharge series.
    State,
}

/// Time series boundary provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Hydrograph {
    kind: HydrographKind,
    times: Vec<f64>,
    /// `[depth, discharge]`, or `[value, 0]` for single-valued series
    values: Vec<[f64; 2]>,
}

impl Hydrograph {
    /// Discharge hydrograph from `(t, Q)` records.
    pub fn discharge(records: &[(f64, f64)]) -> Result<Self> {
        let values = records.iter().map(|&(_, q)| [q, 0.0]).collect();
        Self::build(HydrographKind::Discharge, records.iter().map(|r| r.0), values)
    }

    /// Stage hydrograph from `(t, h)` records.
    pub fn stage(records: &[(f64, f64)]) -> Result<Self> {
        if let Some(&(t, h)) = records.iter().find(|r| r.1 < 0.0) {
            return Err(SaintVenantError::domain(format!(
                "hydrograph depth must be non-negative, got {} at t = {}",
                h, t
            )));
        }
        let values = records.iter().map(|&(_, h)| [h, 0.0]).collect();
        Self::build(HydrographKind::Stage, records.iter().map(|r| r.0), values)
    }

    /// Full-state hydrograph from `(t, h, Q)` records.
    pub fn state(records: &[(f64, f64, f64)]) -> Result<Self> {
        if let Some(&(t, h, _)) = records.iter().find(|r| r.1 < 0.0) {
            return Err(SaintVenantError::domain(format!(
                "hydrograph depth must be non-negative, got {} at t = {}",
                h, t
            )));
        }
        let values = records.iter().map(|&(_, h, q)| [h, q]).collect();
        Self::build(HydrographKind::State, records.iter().map(|r| r.0), values)
    }

    fn build(
        kind: HydrographKind,
        times: impl Iterator<Item = f64>,
        values: Vec<[f64; 2]>,
    ) -> Result<Self> {
        let times: Vec<f64> = times.collect();
        if times.is_empty() {
            return Err(SaintVenantError::domain("hydrograph needs at least one record"));
        }
        if times.iter().chain(values.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(SaintVenantError::domain("hydrograph records must be finite"));
        }
        if let Some(w) = times.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SaintVenantError::domain(format!(
                "hydrograph times must be strictly increasing, got {} after {}",
                w[1], w[0]
            )));
        }
        Ok(Self {
            kind,
            times,
            values,
        })
    }

    /// Quantity carried by the records.
    pub fn kind(&self) -> HydrographKind {
        self.kind
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a hydrograph holds at least one record.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time span covered by the records.
    pub fn time_range(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    fn interpolate(&self, t: f64) -> [f64; 2] {
        let last = self.times.len() - 1;
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[last] {
            return self.values[last];
        }

        // First record strictly after t; 1 ≤ k ≤ last here
        let k = self.times.partition_point(|&tk| tk <= t);
        let (t0, t1) = (self.times[k - 1], self.times[k]);
        let (v0, v1) = (self.values[k - 1], self.values[k]);
        let alpha = (t - t0) / (t1 - t0);
        [
            v0[0] + alpha * (v1[0] - v0[0]),
            v0[1] + alpha * (v1[1] - v0[1]),
        ]
    }
}

impl BoundaryProvider for Hydrograph {
    fn prescribe(&self, t: f64) -> BoundaryPrescription {
        let [a, b] = self.interpolate(t);
        match self.kind {
            HydrographKind::Discharge => BoundaryPrescription::Discharge(a),
            HydrographKind::Stage => BoundaryPrescription::Stage(a),
            HydrographKind::State => BoundaryPrescription::State {
                depth: a,
                discharge: b,
            },
        }
    }

    fn name(&self) -> &'static str {
        "hydrograph"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn q_of(p: BoundaryPrescription) -> f64 {
        match p {
            BoundaryPrescription::Discharge(q) => q,
            other => panic!("expected discharge, got {:?}", other),
        }
    }

    #[test]
    fn test_discharge_interpolation() {
        let hg = Hydrograph::discharge(&[(0.0, 10.0), (100.0, 50.0), (300.0, 10.0)]).unwrap();
        assert_eq!(hg.kind(), HydrographKind::Discharge);
        assert_eq!(hg.len(), 3);

        assert!((q_of(hg.prescribe(0.0)) - 10.0).abs() < TOL);
        assert!((q_of(hg.prescribe(50.0)) - 30.0).abs() < TOL);
        assert!((q_of(hg.prescribe(100.0)) - 50.0).abs() < TOL);
        assert!((q_of(hg.prescribe(200.0)) - 30.0).abs() < TOL);
    }

    #[test]
    fn test_clamped_outside_range() {
        let hg = Hydrograph::discharge(&[(10.0, 1.0), (20.0, 3.0)]).unwrap();
        assert!((q_of(hg.prescribe(-5.0)) - 1.0).abs() < TOL);
        assert!((q_of(hg.prescribe(1e9)) - 3.0).abs() < TOL);
        assert_eq!(hg.time_range(), (10.0, 20.0));
    }

    #[test]
    fn test_single_record_is_constant() {
        let hg = Hydrograph::stage(&[(0.0, 2.5)]).unwrap();
        assert_eq!(hg.prescribe(-1.0), BoundaryPrescription::Stage(2.5));
        assert_eq!(hg.prescribe(123.0), BoundaryPrescription::Stage(2.5));
    }

    #[test]
    fn test_state_hydrograph() {
        let hg = Hydrograph::state(&[(0.0, 1.0, 0.0), (10.0, 3.0, 20.0)]).unwrap();
        match hg.prescribe(2.5) {
            BoundaryPrescription::State { depth, discharge } => {
                assert!((depth - 1.5).abs() < TOL);
                assert!((discharge - 5.0).abs() < TOL);
            }
            other => panic!("expected state, got {:?}", other),
        }
    }

    #[test]
    fn test_validation() {
        assert!(Hydrograph::discharge(&[]).is_err());
        assert!(Hydrograph::discharge(&[(0.0, 1.0), (0.0, 2.0)]).is_err());
        assert!(Hydrograph::discharge(&[(5.0, 1.0), (1.0, 2.0)]).is_err());
        assert!(Hydrograph::discharge(&[(0.0, f64::NAN)]).is_err());
        assert!(matches!(
            Hydrograph::stage(&[(0.0, -1.0)]),
            Err(SaintVenantError::Domain(_))
        ));
        assert!(Hydrograph::state(&[(0.0, 1.0, 2.0), (1.0, -0.5, 2.0)]).is_err());
    }
}
