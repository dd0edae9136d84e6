//! Gravity component along a sloping bed.

use super::{SourceContext, SourceTerm};

/// Bed-slope source S = g A S0.
///
/// S0 > 0 means the bed falls in the +x direction and accelerates flow
/// downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BedSlope {
    /// Gravitational acceleration
    pub g: f64,
    /// Bed slope S0
    pub slope: f64,
}

impl BedSlope {
    /// Create a bed-slope source term.
    pub fn new(g: f64, slope: f64) -> Self {
        Self { g, slope }
    }
}

impl SourceTerm for BedSlope {
    fn evaluate(&self, ctx: &SourceContext) -> f64 {
        self.g * ctx.area * self.slope
    }

    fn name(&self) -> &'static str {
        "bed_slope"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bed_slope_source() {
        let src = BedSlope::new(10.0, 0.002);
        let ctx = SourceContext {
            area: 50.0,
            ..Default::default()
        };
        assert!((src.evaluate(&ctx) - 1.0).abs() < 1e-14);

        // Adverse slope decelerates
        let adverse = BedSlope::new(10.0, -0.002);
        assert!(adverse.evaluate(&ctx) < 0.0);
    }
}
