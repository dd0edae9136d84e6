//! 1D Saint-Venant equations in area/discharge form.
//!
//! ∂A/∂t + ∂Q/∂x = 0                                   (continuity)
//! ∂Q/∂t + ∂(Q²/A + g A² / (2T))/∂x = g A (S0 - Sf)     (momentum)
//!
//! where:
//! - A = flow area, Q = discharge
//! - T = top width (the pressure term g A²/(2T) is exact for a rectangular
//!   section and a flat-top approximation for sloped banks)
//! - S0 = bed slope, Sf = friction slope
//!
//! The source term g A (S0 - Sf) is handled in the source module.

/// Areas below this are treated as dry when forming velocities and fluxes.
pub const AREA_EPS: f64 = 1e-10;

/// Physical constants and pointwise flux functions of the Saint-Venant system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaintVenant1D {
    /// Gravitational acceleration (default 9.81 m/s²)
    pub g: f64,
}

impl SaintVenant1D {
    /// Create the equations with gravity `g`.
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// Standard gravity (9.81 m/s²).
    pub fn standard() -> Self {
        Self::new(9.81)
    }

    /// Mean velocity v = Q / A, zero for a dry section.
    #[inline]
    pub fn velocity(&self, q: f64, a: f64) -> f64 {
        if a > AREA_EPS { q / a } else { 0.0 }
    }

    /// Gravity-wave celerity c = √(g h).
    #[inline]
    pub fn celerity(&self, h: f64) -> f64 {
        (self.g * h.max(0.0)).sqrt()
    }

    /// Fastest characteristic speed |v| + c at a node.
    #[inline]
    pub fn wave_speed(&self, h: f64, q: f64, a: f64) -> f64 {
        self.velocity(q, a).abs() + self.celerity(h)
    }

    /// Momentum flux F = Q²/A + g A² / (2T).
    #[inline]
    pub fn momentum_flux(&self, q: f64, a: f64, top_width: f64) -> f64 {
        let advective = if a > AREA_EPS { q * q / a } else { 0.0 };
        let pressure = if top_width > 0.0 {
            0.5 * self.g * a * a / top_width
        } else {
            0.0
        };
        advective + pressure
    }

    /// Froude number Fr = |v| / √(g h).
    pub fn froude(&self, h: f64, q: f64, a: f64) -> f64 {
        let c = self.celerity(h);
        if c > 1e-10 {
            self.velocity(q, a).abs() / c
        } else {
            0.0
        }
    }
}

impl Default for SaintVenant1D {
    fn default() -> Self {
        Self::standard()
    }
}
