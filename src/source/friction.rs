//! Bed friction for open-channel flow.
//!
//! Manning friction slope:
//!
//! Sf = n² Q² / (A² R^{4/3})
//!
//! where n is the Manning coefficient (typical values 0.01-0.05) and R the
//! hydraulic radius. The momentum source is -g A Sf, applied against the
//! direction of flow.

use super::{SourceContext, SourceTerm};

/// Below this area or hydraulic radius friction is switched off.
///
/// A dry bed exerts no friction rather than an infinite one.
pub const FRICTION_EPS: f64 = 1e-10;

/// Manning bed friction.
///
/// Manning coefficient n has units of s/m^{1/3}:
/// - Smooth concrete: n ≈ 0.012
/// - Natural channels: n ≈ 0.03-0.05
/// - Floodplains with vegetation: n ≈ 0.1-0.15
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManningFriction {
    /// Gravitational acceleration
    pub g: f64,
    /// Manning coefficient (s/m^{1/3})
    pub manning_n: f64,
}

impl ManningFriction {
    /// Create a Manning friction term.
    pub fn new(g: f64, manning_n: f64) -> Self {
        Self { g, manning_n }
    }

    /// Standard gravity (9.81 m/s²) with the given Manning coefficient.
    pub fn standard(manning_n: f64) -> Self {
        Self::new(9.81, manning_n)
    }

    /// Friction slope Sf = n² Q² / (A² R^{4/3}), always non-negative.
    ///
    /// Returns 0 when `a` or `r` is below [`FRICTION_EPS`].
    pub fn friction_slope(&self, q: f64, a: f64, r: f64) -> f64 {
        if a < FRICTION_EPS || r < FRICTION_EPS {
            return 0.0;
        }
        self.manning_n * self.manning_n * q * q / (a * a * r.powf(4.0 / 3.0))
    }

    /// Momentum source -g A Sf sign(Q).
    pub fn momentum_source(&self, q: f64, a: f64, r: f64) -> f64 {
        -self.g * a * self.friction_slope(q, a, r) * q.signum()
    }
}

impl SourceTerm for ManningFriction {
    fn evaluate(&self, ctx: &SourceContext) -> f64 {
        self.momentum_source(ctx.discharge, ctx.area, ctx.hydraulic_radius)
    }

    fn name(&self) -> &'static str {
        "manning_friction"
    }
}
