//! Prismatic channel description: cross-section, bed slope and roughness.
//!
//! - [`ChannelGeometry`]: depth → area / wetted perimeter / hydraulic radius / top width
//! - [`Channel`]: geometry plus the bed slope S0 and Manning coefficient n
//! - [`steady`]: normal and critical depth root finders used to build
//!   steady initial conditions (never called inside the time loop)

mod geometry;
pub mod steady;

pub use geometry::ChannelGeometry;
pub use steady::{critical_depth, froude_number, normal_depth, normal_discharge};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaintVenantError};

/// A prismatic channel reach.
///
/// Immutable once handed to a solver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Cross-section shape
    pub geometry: ChannelGeometry,
    /// Bed slope S0 (positive for a bed falling in +x)
    pub bed_slope: f64,
    /// Manning roughness n (s/m^{1/3})
    pub manning_n: f64,
}

impl Channel {
    /// Create a channel, validating geometry, slope and roughness.
    pub fn new(geometry: ChannelGeometry, bed_slope: f64, manning_n: f64) -> Result<Self> {
        let channel = Self {
            geometry,
            bed_slope,
            manning_n,
        };
        channel.validate()?;
        Ok(channel)
    }

    /// Frictionless horizontal channel (dam-break and conservation studies).
    pub fn frictionless(geometry: ChannelGeometry) -> Result<Self> {
        Self::new(geometry, 0.0, 0.0)
    }

    /// Check all construction invariants.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !self.bed_slope.is_finite() {
            return Err(SaintVenantError::domain(format!(
                "bed slope must be finite, got {}",
                self.bed_slope
            )));
        }
        if !(self.manning_n.is_finite() && self.manning_n >= 0.0) {
            return Err(SaintVenantError::domain(format!(
                "Manning coefficient must be non-negative, got {}",
                self.manning_n
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_validation() {
        let geom = ChannelGeometry::rectangular(10.0).unwrap();
        assert!(Channel::new(geom, 0.001, 0.03).is_ok());
        assert!(Channel::new(geom, f64::NAN, 0.03).is_err());
        assert!(Channel::new(geom, 0.001, -0.01).is_err());

        let channel = Channel::frictionless(geom).unwrap();
        assert_eq!(channel.bed_slope, 0.0);
        assert_eq!(channel.manning_n, 0.0);
    }

    #[test]
    fn test_deserialized_geometry_is_validated() {
        let channel = Channel {
            geometry: ChannelGeometry::Rectangular { bottom_width: -3.0 },
            bed_slope: 0.0,
            manning_n: 0.0,
        };
        assert!(matches!(channel.validate(), Err(SaintVenantError::Domain(_))));
    }
}
