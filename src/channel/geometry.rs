//! Cross-section geometry of prismatic channels.
//!
//! Maps a water depth h (above the channel invert) to the hydraulic
//! quantities used by the transient solver and by the steady-flow helpers:
//!
//! | Shape       | Area A(h)                          | Wetted perimeter P(h)          |
//! |-------------|------------------------------------|--------------------------------|
//! | Rectangular | b h                                | b + 2h                         |
//! | Trapezoidal | (b + m h) h                        | b + 2h √(1 + m²)               |
//! | Compound    | main channel up to h_m, then benches | main + benches + bench banks |
//!
//! The side slope m is the horizontal:vertical ratio of the banks.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaintVenantError};

/// Below this wetted perimeter the hydraulic radius is reported as zero.
const PERIMETER_EPS: f64 = 1e-12;

/// Channel cross-section shape.
///
/// Dispatch happens once per call on the variant; there is no trait object
/// per node in the hot loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ChannelGeometry {
    /// Vertical walls.
    Rectangular {
        /// Bed width b (m)
        bottom_width: f64,
    },
    /// Sloped banks with the same slope on both sides.
    Trapezoidal {
        /// Bed width b (m)
        bottom_width: f64,
        /// Bank slope m (horizontal:vertical)
        side_slope: f64,
    },
    /// Two-stage channel: a trapezoidal main channel of height `main_depth`
    /// with flood-plain benches on either side.
    Compound {
        /// Main channel bed width b (m)
        bottom_width: f64,
        /// Main channel bank slope m
        side_slope: f64,
        /// Main channel height h_m (m), bench level above the invert
        main_depth: f64,
        /// Left bench width B_l (m)
        left_bench: f64,
        /// Right bench width B_r (m)
        right_bench: f64,
        /// Left flood-plain bank slope m_l
        left_slope: f64,
        /// Right flood-plain bank slope m_r
        right_slope: f64,
    },
}

impl ChannelGeometry {
    /// Rectangular channel of bed width `b`.
    pub fn rectangular(bottom_width: f64) -> Result<Self> {
        let geom = Self::Rectangular { bottom_width };
        geom.validate()?;
        Ok(geom)
    }

    /// Trapezoidal channel of bed width `b` and bank slope `m`.
    pub fn trapezoidal(bottom_width: f64, side_slope: f64) -> Result<Self> {
        let geom = Self::Trapezoidal {
            bottom_width,
            side_slope,
        };
        geom.validate()?;
        Ok(geom)
    }

    /// Compound channel with symmetric benches.
    pub fn compound_symmetric(
        bottom_width: f64,
        side_slope: f64,
        main_depth: f64,
        bench_width: f64,
        bench_slope: f64,
    ) -> Result<Self> {
        Self::compound(
            bottom_width,
            side_slope,
            main_depth,
            (bench_width, bench_slope),
            (bench_width, bench_slope),
        )
    }

    /// Compound channel; benches are given as `(width, bank slope)`.
    pub fn compound(
        bottom_width: f64,
        side_slope: f64,
        main_depth: f64,
        left: (f64, f64),
        right: (f64, f64),
    ) -> Result<Self> {
        let geom = Self::Compound {
            bottom_width,
            side_slope,
            main_depth,
            left_bench: left.0,
            right_bench: right.0,
            left_slope: left.1,
            right_slope: right.1,
        };
        geom.validate()?;
        Ok(geom)
    }

    /// Check the construction-time invariants.
    ///
    /// Needed again after deserialization, which bypasses the constructors.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SaintVenantError::domain(format!(
                    "{} must be positive, got {}",
                    name, v
                )))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(SaintVenantError::domain(format!(
                    "{} must be non-negative, got {}",
                    name, v
                )))
            }
        };

        match *self {
            Self::Rectangular { bottom_width } => positive("bottom width", bottom_width),
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => {
                positive("bottom width", bottom_width)?;
                non_negative("side slope", side_slope)
            }
            Self::Compound {
                bottom_width,
                side_slope,
                main_depth,
                left_bench,
                right_bench,
                left_slope,
                right_slope,
            } => {
                positive("bottom width", bottom_width)?;
                non_negative("side slope", side_slope)?;
                positive("main channel depth", main_depth)?;
                non_negative("left bench width", left_bench)?;
                non_negative("right bench width", right_bench)?;
                non_negative("left bench slope", left_slope)?;
                non_negative("right bench slope", right_slope)
            }
        }
    }

    /// Bed width at the invert.
    pub fn bottom_width(&self) -> f64 {
        match *self {
            Self::Rectangular { bottom_width }
            | Self::Trapezoidal { bottom_width, .. }
            | Self::Compound { bottom_width, .. } => bottom_width,
        }
    }

    /// Cross-sectional flow area A(h).
    pub fn area(&self, h: f64) -> Result<f64> {
        check_depth(h)?;
        Ok(self.area_unchecked(h))
    }

    /// Wetted perimeter P(h).
    pub fn wetted_perimeter(&self, h: f64) -> Result<f64> {
        check_depth(h)?;
        Ok(self.wetted_perimeter_unchecked(h))
    }

    /// Hydraulic radius R = A / P, zero for a dry section.
    pub fn hydraulic_radius(&self, h: f64) -> Result<f64> {
        check_depth(h)?;
        Ok(self.hydraulic_radius_unchecked(h))
    }

    /// Free-surface width T(h).
    pub fn top_width(&self, h: f64) -> Result<f64> {
        check_depth(h)?;
        Ok(self.top_width_unchecked(h))
    }

    /// Area without the depth precondition check.
    ///
    /// The caller guarantees `h >= 0` (the solver only calls this after
    /// applying the depth floor).
    pub fn area_unchecked(&self, h: f64) -> f64 {
        match *self {
            Self::Rectangular { bottom_width } => bottom_width * h,
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => (bottom_width + side_slope * h) * h,
            Self::Compound {
                bottom_width,
                side_slope,
                main_depth,
                left_bench,
                right_bench,
                left_slope,
                right_slope,
            } => {
                if h <= main_depth {
                    (bottom_width + side_slope * h) * h
                } else {
                    let main = (bottom_width + side_slope * main_depth) * main_depth;
                    let y = h - main_depth;
                    let width_at_bench =
                        bottom_width + 2.0 * side_slope * main_depth + left_bench + right_bench;
                    main + width_at_bench * y + 0.5 * (left_slope + right_slope) * y * y
                }
            }
        }
    }

    /// Wetted perimeter without the depth precondition check.
    pub fn wetted_perimeter_unchecked(&self, h: f64) -> f64 {
        match *self {
            Self::Rectangular { bottom_width } => bottom_width + 2.0 * h,
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => bottom_width + 2.0 * h * bank_length(side_slope),
            Self::Compound {
                bottom_width,
                side_slope,
                main_depth,
                left_bench,
                right_bench,
                left_slope,
                right_slope,
            } => {
                if h <= main_depth {
                    bottom_width + 2.0 * h * bank_length(side_slope)
                } else {
                    let main = bottom_width + 2.0 * main_depth * bank_length(side_slope);
                    let y = h - main_depth;
                    main + left_bench
                        + right_bench
                        + y * (bank_length(left_slope) + bank_length(right_slope))
                }
            }
        }
    }

    /// Hydraulic radius without the depth precondition check.
    pub fn hydraulic_radius_unchecked(&self, h: f64) -> f64 {
        let p = self.wetted_perimeter_unchecked(h);
        if p <= PERIMETER_EPS {
            0.0
        } else {
            self.area_unchecked(h) / p
        }
    }

    /// Top width without the depth precondition check.
    pub fn top_width_unchecked(&self, h: f64) -> f64 {
        match *self {
            Self::Rectangular { bottom_width } => bottom_width,
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => bottom_width + 2.0 * side_slope * h,
            Self::Compound {
                bottom_width,
                side_slope,
                main_depth,
                left_bench,
                right_bench,
                left_slope,
                right_slope,
            } => {
                if h <= main_depth {
                    bottom_width + 2.0 * side_slope * h
                } else {
                    bottom_width
                        + 2.0 * side_slope * main_depth
                        + left_bench
                        + right_bench
                        + (left_slope + right_slope) * (h - main_depth)
                }
            }
        }
    }

    /// Invert [`area`](Self::area): the depth that carries flow area `a`.
    ///
    /// A non-positive area maps linearly through the bed width, so an
    /// undershooting update (A < 0) produces a negative depth that the solver
    /// can detect before clamping.
    pub fn depth_from_area(&self, a: f64) -> f64 {
        let b = self.bottom_width();
        if a <= 0.0 {
            return a / b;
        }

        match *self {
            Self::Rectangular { bottom_width } => a / bottom_width,
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => quadratic_depth(bottom_width, side_slope, a),
            Self::Compound {
                bottom_width,
                side_slope,
                main_depth,
                left_bench,
                right_bench,
                left_slope,
                right_slope,
            } => {
                let main_area = (bottom_width + side_slope * main_depth) * main_depth;
                if a <= main_area {
                    quadratic_depth(bottom_width, side_slope, a)
                } else {
                    let width_at_bench =
                        bottom_width + 2.0 * side_slope * main_depth + left_bench + right_bench;
                    let half_slope = 0.5 * (left_slope + right_slope);
                    main_depth + quadratic_depth(width_at_bench, half_slope, a - main_area)
                }
            }
        }
    }
}

/// Length of bank per unit rise: √(1 + m²).
#[inline]
fn bank_length(m: f64) -> f64 {
    (1.0 + m * m).sqrt()
}

/// Positive root y of `c y² + w y = a` for `w > 0`, `c ≥ 0`, `a ≥ 0`.
///
/// Written as `2a / (w + √(w² + 4ca))` to stay accurate when `c → 0`.
#[inline]
fn quadratic_depth(w: f64, c: f64, a: f64) -> f64 {
    2.0 * a / (w + (w * w + 4.0 * c * a).sqrt())
}

fn check_depth(h: f64) -> Result<()> {
    if h.is_finite() && h >= 0.0 {
        Ok(())
    } else {
        Err(SaintVenantError::domain(format!(
            "depth must be non-negative and finite, got {}",
            h
        )))
    }
}
