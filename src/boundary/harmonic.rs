//! Periodic stage forcing.
//!
//! The boundary depth is a mean level plus a sum of harmonic constituents:
//!
//! h(t) = h₀ + R(t) × Σᵢ Aᵢ cos(ωᵢ t + φᵢ)
//!
//! where R(t) is a smooth ramp (0 at t = 0, 1 after the ramp duration) that
//! avoids starting the channel with a sudden jump. Discharge is extrapolated
//! from the interior, so waves can leave through the forced end.

use std::f64::consts::PI;

use super::{BoundaryPrescription, BoundaryProvider};

/// One harmonic component of the stage signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConstituent {
    /// Amplitude (m)
    pub amplitude: f64,
    /// Period (s)
    pub period: f64,
    /// Phase (radians)
    pub phase: f64,
}

impl StageConstituent {
    /// Create a constituent.
    pub fn new(amplitude: f64, period: f64, phase: f64) -> Self {
        Self {
            amplitude,
            period,
            phase,
        }
    }

    /// Angular frequency ω = 2π/T.
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI / self.period
    }

    /// Contribution at time t.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.amplitude * (self.angular_frequency() * t + self.phase).cos()
    }
}

/// Harmonic stage boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicStage {
    /// Mean depth h₀ (m), not ramped
    pub mean_depth: f64,
    /// Harmonic constituents
    pub constituents: Vec<StageConstituent>,
    /// Ramp-up duration in seconds (None = no ramp-up)
    pub ramp_duration: Option<f64>,
}

impl HarmonicStage {
    /// Create a harmonic stage from its constituents.
    pub fn new(mean_depth: f64, constituents: Vec<StageConstituent>) -> Self {
        Self {
            mean_depth,
            constituents,
            ramp_duration: None,
        }
    }

    /// Single sinusoid around the mean depth.
    pub fn sinusoidal(mean_depth: f64, amplitude: f64, period: f64) -> Self {
        Self::new(mean_depth, vec![StageConstituent::new(amplitude, period, 0.0)])
    }

    /// Ramp the oscillation in over `duration` seconds.
    pub fn with_ramp_up(mut self, duration: f64) -> Self {
        self.ramp_duration = Some(duration);
        self
    }

    /// Smoothstep ramp 3τ² − 2τ³, τ = t/duration.
    fn ramp_factor(&self, t: f64) -> f64 {
        match self.ramp_duration {
            Some(duration) if duration > 0.0 => {
                let tau = (t / duration).clamp(0.0, 1.0);
                tau * tau * (3.0 - 2.0 * tau)
            }
            _ => 1.0,
        }
    }

    /// Depth at time t, never negative.
    pub fn depth(&self, t: f64) -> f64 {
        let ramp = self.ramp_factor(t);
        let oscillation: f64 = self.constituents.iter().map(|c| c.evaluate(t)).sum();
        (self.mean_depth + ramp * oscillation).max(0.0)
    }
}

impl BoundaryProvider for HarmonicStage {
    fn prescribe(&self, t: f64) -> BoundaryPrescription {
        BoundaryPrescription::Stage(self.depth(t))
    }

    fn name(&self) -> &'static str {
        "harmonic_stage"
    }
}
