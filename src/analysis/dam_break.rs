//! Analytic dam-break solutions for a frictionless horizontal rectangular
//! channel.
//!
//! At t = 0 still water of depth h₀ fills x < x_dam and depth h_d ≥ 0 the
//! rest. With c₀ = √(g h₀) and the similarity variable ξ = (x − x_dam)/t:
//!
//! **Dry bed (Ritter), h_d = 0**
//! - ξ ≤ −c₀: undisturbed, h = h₀
//! - −c₀ < ξ < 2c₀: rarefaction fan, h = (2c₀ − ξ)²/(9g), v = ⅔(c₀ + ξ)
//! - ξ ≥ 2c₀: dry
//!
//! **Wet bed (Stoker), h_d > 0**
//!
//! The fan ends in a constant state (h*, v*) behind a bore moving at U.
//! Along the fan's forward characteristic v* = 2(c₀ − c*), and across the
//! bore the Rankine–Hugoniot conditions give
//!
//! U (h* − h_d) = h* v*              (mass)
//! U = √(g h* (h* + h_d) / (2 h_d))   (momentum)
//!
//! h* ∈ (h_d, h₀) is found by bisection on the mismatch of the two bore
//! speeds.

use crate::error::{Result, SaintVenantError};

/// Bisection iterations for the Stoker intermediate depth.
const MAX_BISECTIONS: usize = 200;
/// Relative bracket width at which bisection stops.
const REL_TOL: f64 = 1e-14;

/// Exact solution of the ideal dam-break problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamBreakSolution {
    /// Release onto a dry bed.
    Ritter {
        /// Upstream depth h₀
        h0: f64,
        /// Dam position
        x_dam: f64,
        /// Gravitational acceleration
        g: f64,
    },
    /// Release onto a wet bed.
    Stoker {
        /// Upstream depth h₀
        h0: f64,
        /// Downstream depth h_d
        hd: f64,
        /// Dam position
        x_dam: f64,
        /// Gravitational acceleration
        g: f64,
        /// Depth between fan and bore
        h_star: f64,
        /// Velocity between fan and bore
        v_star: f64,
        /// Bore speed U
        bore_speed: f64,
    },
}

impl DamBreakSolution {
    /// Ritter solution for depth `h0` released onto a dry bed.
    pub fn ritter(h0: f64, x_dam: f64, g: f64) -> Result<Self> {
        validate(h0, 0.0, x_dam, g)?;
        Ok(Self::Ritter { h0, x_dam, g })
    }

    /// Stoker solution for depth `h0` released onto still water of depth `hd`.
    pub fn stoker(h0: f64, hd: f64, x_dam: f64, g: f64) -> Result<Self> {
        validate(h0, hd, x_dam, g)?;
        if hd <= 0.0 {
            return Err(SaintVenantError::domain(
                "wet-bed solution needs a positive downstream depth",
            ));
        }
        let (h_star, v_star, bore_speed) = stoker_state(h0, hd, g)?;
        Ok(Self::Stoker {
            h0,
            hd,
            x_dam,
            g,
            h_star,
            v_star,
            bore_speed,
        })
    }

    /// Ritter for `hd == 0`, Stoker otherwise.
    pub fn new(h0: f64, hd: f64, x_dam: f64, g: f64) -> Result<Self> {
        if hd == 0.0 {
            Self::ritter(h0, x_dam, g)
        } else {
            Self::stoker(h0, hd, x_dam, g)
        }
    }

    fn h0(&self) -> f64 {
        match *self {
            Self::Ritter { h0, .. } | Self::Stoker { h0, .. } => h0,
        }
    }

    fn x_dam(&self) -> f64 {
        match *self {
            Self::Ritter { x_dam, .. } | Self::Stoker { x_dam, .. } => x_dam,
        }
    }

    fn g(&self) -> f64 {
        match *self {
            Self::Ritter { g, .. } | Self::Stoker { g, .. } => g,
        }
    }

    fn downstream_depth(&self) -> f64 {
        match *self {
            Self::Ritter { .. } => 0.0,
            Self::Stoker { hd, .. } => hd,
        }
    }

    /// Depth and velocity at position `x` and time `t`.
    ///
    /// For `t ≤ 0` this is the initial step.
    pub fn evaluate(&self, x: f64, t: f64) -> (f64, f64) {
        let (h0, x_dam, g) = (self.h0(), self.x_dam(), self.g());
        if t <= 0.0 {
            let h = if x < x_dam { h0 } else { self.downstream_depth() };
            return (h, 0.0);
        }

        let c0 = (g * h0).sqrt();
        let xi = (x - x_dam) / t;
        if xi <= -c0 {
            return (h0, 0.0);
        }
        let fan = |xi: f64| {
            let c = (2.0 * c0 - xi) / 3.0;
            (c * c / g, 2.0 / 3.0 * (c0 + xi))
        };

        match *self {
            Self::Ritter { .. } => {
                if xi < 2.0 * c0 {
                    fan(xi)
                } else {
                    (0.0, 0.0)
                }
            }
            Self::Stoker {
                hd,
                h_star,
                v_star,
                bore_speed,
                ..
            } => {
                let fan_tail = v_star - (g * h_star).sqrt();
                if xi <= fan_tail {
                    fan(xi)
                } else if xi <= bore_speed {
                    (h_star, v_star)
                } else {
                    (hd, 0.0)
                }
            }
        }
    }

    /// Depth profile at time `t` on the given positions.
    pub fn depth_profile(&self, positions: &[f64], t: f64) -> Vec<f64> {
        positions.iter().map(|&x| self.evaluate(x, t).0).collect()
    }

    /// Position of the leading edge: the wet/dry front for Ritter, the bore
    /// for Stoker.
    pub fn front_position(&self, t: f64) -> f64 {
        self.x_dam() + self.front_speed() * t.max(0.0)
    }

    /// Speed of the leading edge: 2c₀ for Ritter, U for Stoker.
    pub fn front_speed(&self) -> f64 {
        match *self {
            Self::Ritter { h0, g, .. } => 2.0 * (g * h0).sqrt(),
            Self::Stoker { bore_speed, .. } => bore_speed,
        }
    }

    /// Position of the rarefaction head travelling upstream at −c₀.
    pub fn rarefaction_head(&self, t: f64) -> f64 {
        self.x_dam() - (self.g() * self.h0()).sqrt() * t.max(0.0)
    }

    /// Intermediate state (h*, v*) of the wet-bed solution.
    pub fn intermediate_state(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Ritter { .. } => None,
            Self::Stoker { h_star, v_star, .. } => Some((h_star, v_star)),
        }
    }
}

fn validate(h0: f64, hd: f64, x_dam: f64, g: f64) -> Result<()> {
    if !(h0.is_finite() && h0 > 0.0) {
        return Err(SaintVenantError::domain(format!(
            "upstream depth must be positive, got {}",
            h0
        )));
    }
    if !(hd.is_finite() && hd >= 0.0 && hd < h0) {
        return Err(SaintVenantError::domain(format!(
            "downstream depth must lie in [0, {}), got {}",
            h0, hd
        )));
    }
    if !x_dam.is_finite() {
        return Err(SaintVenantError::domain("dam position must be finite"));
    }
    if !(g.is_finite() && g > 0.0) {
        return Err(SaintVenantError::domain(format!(
            "gravity must be positive, got {}",
            g
        )));
    }
    Ok(())
}

/// Intermediate depth, velocity and bore speed of the Stoker solution.
fn stoker_state(h0: f64, hd: f64, g: f64) -> Result<(f64, f64, f64)> {
    let c0 = (g * h0).sqrt();
    let v_star = |hs: f64| 2.0 * (c0 - (g * hs).sqrt());
    let momentum_speed = |hs: f64| (g * hs * (hs + hd) / (2.0 * hd)).sqrt();
    // Positive just above hd (mass bore speed → ∞), negative at h0 (v* = 0)
    let mismatch = |hs: f64| hs * v_star(hs) / (hs - hd) - momentum_speed(hs);

    let mut lo = hd * (1.0 + 1e-12);
    let mut hi = h0;
    if !(mismatch(lo) > 0.0 && mismatch(hi) < 0.0) {
        return Err(SaintVenantError::NoConvergence(format!(
            "Stoker bore relation not bracketed for h0 = {}, hd = {}",
            h0, hd
        )));
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if mismatch(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= REL_TOL * hi {
            break;
        }
    }

    let h_star = 0.5 * (lo + hi);
    Ok((h_star, v_star(h_star), momentum_speed(h_star)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 9.81;
    const TOL: f64 = 1e-10;

    #[test]
    fn test_ritter_regions() {
        let sol = DamBreakSolution::ritter(10.0, 0.0, G).unwrap();
        let c0 = (G * 10.0).sqrt();
        let t = 2.0;

        // Undisturbed reservoir
        assert_eq!(sol.evaluate(-c0 * t - 1.0, t), (10.0, 0.0));
        // Dam site: ξ = 0 → h = 4h₀/9, v = 2c₀/3
        let (h, v) = sol.evaluate(0.0, t);
        assert!((h - 4.0 * 10.0 / 9.0).abs() < TOL);
        assert!((v - 2.0 * c0 / 3.0).abs() < TOL);
        // Beyond the front
        assert_eq!(sol.evaluate(2.0 * c0 * t + 1.0, t), (0.0, 0.0));
        // Fan is continuous with the reservoir at ξ = −c₀
        let (h, v) = sol.evaluate(-c0 * t + 1e-9, t);
        assert!((h - 10.0).abs() < 1e-6);
        assert!(v.abs() < 1e-6);
    }

    #[test]
    fn test_ritter_front() {
        let sol = DamBreakSolution::ritter(10.0, 5000.0, G).unwrap();
        let c0 = (G * 10.0).sqrt();
        assert!((sol.front_speed() - 2.0 * c0).abs() < TOL);
        assert!((sol.front_position(30.0) - (5000.0 + 60.0 * c0)).abs() < TOL);
        assert!((sol.rarefaction_head(30.0) - (5000.0 - 30.0 * c0)).abs() < TOL);
        assert_eq!(sol.intermediate_state(), None);
    }

    #[test]
    fn test_initial_step() {
        let sol = DamBreakSolution::new(10.0, 2.0, 100.0, G).unwrap();
        assert_eq!(sol.evaluate(50.0, 0.0), (10.0, 0.0));
        assert_eq!(sol.evaluate(150.0, 0.0), (2.0, 0.0));
    }

    #[test]
    fn test_stoker_intermediate_state() {
        let sol = DamBreakSolution::stoker(10.0, 2.0, 0.0, G).unwrap();
        let (h_star, v_star) = sol.intermediate_state().unwrap();

        assert!((h_star - 5.078714).abs() < 1e-5, "h* = {}", h_star);
        assert!((v_star - 5.692122).abs() < 1e-5, "v* = {}", v_star);
        assert!((sol.front_speed() - 9.389849).abs() < 1e-5, "U = {}", sol.front_speed());
    }

    #[test]
    fn test_stoker_satisfies_jump_conditions() {
        for &(h0, hd) in &[(10.0, 2.0), (1.0, 0.5), (5.0, 0.1), (3.0, 2.9)] {
            let sol = DamBreakSolution::stoker(h0, hd, 0.0, G).unwrap();
            let (hs, vs) = sol.intermediate_state().unwrap();
            let u = sol.front_speed();

            assert!(hd < hs && hs < h0);
            // Mass across the bore
            assert!((u * (hs - hd) - hs * vs).abs() < 1e-8 * h0 * u);
            // Riemann invariant through the fan
            let c0 = (G * h0).sqrt();
            assert!((vs - 2.0 * (c0 - (G * hs).sqrt())).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stoker_regions() {
        let sol = DamBreakSolution::stoker(10.0, 2.0, 0.0, G).unwrap();
        let (hs, vs) = sol.intermediate_state().unwrap();
        let u = sol.front_speed();
        let t = 10.0;

        // Plateau just behind the bore, still water ahead of it
        assert_eq!(sol.evaluate(u * t - 1.0, t), (hs, vs));
        assert_eq!(sol.evaluate(u * t + 1.0, t), (2.0, 0.0));

        // Fan tail meets the plateau continuously
        let tail = vs - (G * hs).sqrt();
        let (h, v) = sol.evaluate(tail * t - 1e-9, t);
        assert!((h - hs).abs() < 1e-6);
        assert!((v - vs).abs() < 1e-6);
    }

    #[test]
    fn test_depth_profile() {
        let sol = DamBreakSolution::ritter(1.0, 0.0, G).unwrap();
        let xs = [-100.0, 0.0, 100.0];
        let h = sol.depth_profile(&xs, 1.0);
        assert_eq!(h[0], 1.0);
        assert!((h[1] - 4.0 / 9.0).abs() < TOL);
        assert_eq!(h[2], 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(DamBreakSolution::ritter(0.0, 0.0, G).is_err());
        assert!(DamBreakSolution::ritter(1.0, f64::NAN, G).is_err());
        assert!(DamBreakSolution::stoker(1.0, 0.0, 0.0, G).is_err());
        assert!(DamBreakSolution::stoker(1.0, 1.0, 0.0, G).is_err());
        assert!(DamBreakSolution::stoker(1.0, 2.0, 0.0, G).is_err());
        assert!(DamBreakSolution::new(1.0, -0.1, 0.0, G).is_err());
        assert!(DamBreakSolution::new(1.0, 0.5, 0.0, 0.0).is_err());
    }
}
