//! Steady uniform and critical flow helpers.
//!
//! These root finders set up steady initial conditions. They are never
//! called from inside the time-stepping loop.
//!
//! Normal depth h_n solves Manning's equation
//!
//! Q = (1/n) A(h) R(h)^{2/3} √S0
//!
//! and critical depth h_c solves Q² T(h) = g A(h)³.

use super::{Channel, ChannelGeometry};
use crate::error::{Result, SaintVenantError};

/// Relative bracket width at which bisection stops.
const REL_TOL: f64 = 1e-13;
/// Bisection iteration cap (the bracket halves each time).
const MAX_BISECTIONS: usize = 200;
/// Upper bracket doublings before giving up.
const MAX_EXPANSIONS: usize = 64;

/// Discharge carried by uniform flow at depth `h` (Manning).
pub fn normal_discharge(channel: &Channel, h: f64) -> Result<f64> {
    let geom = &channel.geometry;
    let area = geom.area(h)?;
    let radius = geom.hydraulic_radius(h)?;
    if channel.manning_n <= 0.0 || channel.bed_slope <= 0.0 {
        return Err(SaintVenantError::domain(
            "uniform flow needs a positive bed slope and Manning coefficient",
        ));
    }
    Ok(area * radius.powf(2.0 / 3.0) * channel.bed_slope.sqrt() / channel.manning_n)
}

/// Normal (uniform-flow) depth for discharge `q`.
pub fn normal_depth(channel: &Channel, q: f64) -> Result<f64> {
    if !(q.is_finite() && q > 0.0) {
        return Err(SaintVenantError::domain(format!(
            "normal depth needs a positive discharge, got {}",
            q
        )));
    }
    // Validates slope and roughness once up front.
    normal_discharge(channel, 1.0)?;

    bisect_increasing(|h| normal_discharge(channel, h).map(|q_h| q_h - q), "normal depth")
}

/// Critical depth for discharge `q`.
pub fn critical_depth(geometry: &ChannelGeometry, q: f64, g: f64) -> Result<f64> {
    if !(q.is_finite() && q > 0.0) {
        return Err(SaintVenantError::domain(format!(
            "critical depth needs a positive discharge, got {}",
            q
        )));
    }
    if !(g.is_finite() && g > 0.0) {
        return Err(SaintVenantError::domain(format!(
            "gravity must be positive, got {}",
            g
        )));
    }

    // g A³ - Q² T grows with depth and is negative at the invert.
    bisect_increasing(
        |h| {
            let a = geometry.area(h)?;
            let t = geometry.top_width(h)?;
            Ok(g * a * a * a - q * q * t)
        },
        "critical depth",
    )
}

/// Froude number based on the hydraulic depth A/T.
pub fn froude_number(geometry: &ChannelGeometry, h: f64, q: f64, g: f64) -> Result<f64> {
    let a = geometry.area(h)?;
    let t = geometry.top_width(h)?;
    if a <= 0.0 || t <= 0.0 {
        return Ok(0.0);
    }
    let v = q / a;
    Ok(v.abs() / (g * a / t).sqrt())
}

/// Find the root of `f` on `(0, ∞)`, given `f(0) < 0` and `f` eventually positive.
fn bisect_increasing<F>(f: F, what: &str) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    let mut lo = 0.0;
    let mut hi = 1.0;

    let mut expansions = 0;
    while f(hi)? <= 0.0 {
        lo = hi;
        hi *= 2.0;
        expansions += 1;
        if expansions > MAX_EXPANSIONS {
            return Err(SaintVenantError::NoConvergence(format!(
                "could not bracket {} (upper bound reached {:.3e} m)",
                what, hi
            )));
        }
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if f(mid)? > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo <= REL_TOL * hi {
            break;
        }
    }

    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 9.81;

    #[test]
    fn test_normal_depth_rectangular() {
        let geom = ChannelGeometry::rectangular(10.0).unwrap();
        let channel = Channel::new(geom, 0.001, 0.03).unwrap();

        let q = 25.0;
        let h_n = normal_depth(&channel, q).unwrap();

        let q_back = normal_discharge(&channel, h_n).unwrap();
        assert!(
            (q_back - q).abs() / q < 1e-10,
            "Manning discharge at h_n = {} should be {}, got {}",
            h_n,
            q,
            q_back
        );
        // Wide-channel estimate h ≈ (nQ / (b √S0))^{3/5} is a lower bound
        let wide = (0.03 * q / (10.0 * 0.001_f64.sqrt())).powf(0.6);
        assert!(h_n > wide);
    }

    #[test]
    fn test_normal_depth_compound_above_bench() {
        let geom = ChannelGeometry::compound_symmetric(5.0, 1.0, 1.0, 15.0, 2.0).unwrap();
        let channel = Channel::new(geom, 0.0005, 0.035).unwrap();
        let q = 60.0;
        let h_n = normal_depth(&channel, q).unwrap();
        let q_back = normal_discharge(&channel, h_n).unwrap();
        assert!((q_back - q).abs() / q < 1e-8);
    }

    #[test]
    fn test_normal_depth_requires_slope_and_roughness() {
        let geom = ChannelGeometry::rectangular(10.0).unwrap();
        let flat = Channel::new(geom, 0.0, 0.03).unwrap();
        assert!(normal_depth(&flat, 10.0).is_err());

        let smooth = Channel::new(geom, 0.001, 0.0).unwrap();
        assert!(normal_depth(&smooth, 10.0).is_err());

        let channel = Channel::new(geom, 0.001, 0.03).unwrap();
        assert!(normal_depth(&channel, 0.0).is_err());
    }

    #[test]
    fn test_critical_depth_rectangular_closed_form() {
        // Rectangular: h_c = (q² / g)^{1/3}, q = Q/b
        let geom = ChannelGeometry::rectangular(4.0).unwrap();
        let q = 12.0;
        let h_c = critical_depth(&geom, q, G).unwrap();
        let expected = ((q / 4.0_f64).powi(2) / G).cbrt();
        assert!(
            (h_c - expected).abs() < 1e-10,
            "h_c = {}, expected {}",
            h_c,
            expected
        );

        // Froude number is one at critical depth
        let fr = froude_number(&geom, h_c, q, G).unwrap();
        assert!((fr - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_critical_depth_trapezoidal() {
        let geom = ChannelGeometry::trapezoidal(3.0, 1.5).unwrap();
        let q = 20.0;
        let h_c = critical_depth(&geom, q, G).unwrap();
        let a = geom.area(h_c).unwrap();
        let t = geom.top_width(h_c).unwrap();
        assert!((q * q * t / (G * a * a * a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_froude_regimes() {
        let geom = ChannelGeometry::rectangular(10.0).unwrap();
        // h = 2, v = 0.5 → subcritical
        assert!(froude_number(&geom, 2.0, 10.0, G).unwrap() < 1.0);
        // h = 0.2, v = 10 → supercritical
        assert!(froude_number(&geom, 0.2, 20.0, G).unwrap() > 1.0);
        assert_eq!(froude_number(&geom, 0.0, 1.0, G).unwrap(), 0.0);
    }
}
