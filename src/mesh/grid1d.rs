//! Uniform 1D node grid along the channel axis.
//!
//! The finite-difference scheme stores depth and discharge at `N` nodes
//! spanning `[0, L]` with constant spacing `dx = L / (N - 1)`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaintVenantError};

/// Relative mismatch allowed between `dx` and `L / (N - 1)`.
const SPACING_REL_TOL: f64 = 1e-9;

/// Channel end identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelEnd {
    /// Node 0 (x = 0)
    Upstream,
    /// Node N-1 (x = L)
    Downstream,
}

impl ChannelEnd {
    /// Index of the boundary node and its two nearest interior nodes,
    /// ordered from the boundary inwards.
    pub fn stencil(self, n_nodes: usize) -> (usize, usize, usize) {
        match self {
            ChannelEnd::Upstream => (0, 1, 2),
            ChannelEnd::Downstream => (n_nodes - 1, n_nodes - 2, n_nodes - 3),
        }
    }
}

/// Uniform grid of `n_nodes` points on `[0, length]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid1D {
    /// Channel length L (m)
    pub length: f64,
    /// Number of nodes N (at least 3)
    pub n_nodes: usize,
    /// Node spacing dx = L / (N - 1)
    pub dx: f64,
}

impl Grid1D {
    /// Minimum node count: one interior node for the centred stencil.
    pub const MIN_NODES: usize = 3;

    /// Create a grid with `n_nodes` nodes on `[0, length]`.
    pub fn new(length: f64, n_nodes: usize) -> Result<Self> {
        let grid = Self {
            length,
            n_nodes,
            dx: length / n_nodes.saturating_sub(1) as f64,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the construction-time invariants.
    ///
    /// Needed again after deserialization or a struct literal, which bypass
    /// the constructors.
    pub fn validate(&self) -> Result<()> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "channel length must be positive and finite, got {}",
                self.length
            )));
        }
        if self.n_nodes < Self::MIN_NODES {
            return Err(SaintVenantError::domain(format!(
                "need at least {} nodes, got {}",
                Self::MIN_NODES,
                self.n_nodes
            )));
        }
        if !(self.dx.is_finite() && self.dx > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "node spacing must be positive and finite, got {}",
                self.dx
            )));
        }
        let expected = self.length / (self.n_nodes - 1) as f64;
        if (self.dx - expected).abs() > SPACING_REL_TOL * expected {
            return Err(SaintVenantError::domain(format!(
                "node spacing {} does not match L / (N - 1) = {}",
                self.dx, expected
            )));
        }
        Ok(())
    }

    /// Create a grid from a target spacing.
    ///
    /// The node count is `round(L / dx) + 1` and the spacing is then
    /// recomputed so the last node lands exactly on `L`.
    pub fn with_spacing(length: f64, dx: f64) -> Result<Self> {
        if !(dx.is_finite() && dx > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "node spacing must be positive and finite, got {}",
                dx
            )));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(SaintVenantError::domain(format!(
                "channel length must be positive and finite, got {}",
                length
            )));
        }
        let n_nodes = ((length / dx).round() as usize)
            .checked_add(1)
            .ok_or_else(|| {
                SaintVenantError::domain(format!(
                    "spacing {} is too fine for a channel of length {}",
                    dx, length
                ))
            })?;
        Self::new(length, n_nodes)
    }

    /// Position of node i.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }

    /// All node positions.
    pub fn positions(&self) -> Vec<f64> {
        (0..self.n_nodes).map(|i| self.x(i)).collect()
    }

    /// Index of the node closest to position x (clamped to the grid).
    pub fn nearest_node(&self, x: f64) -> usize {
        let i = (x / self.dx).round();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(self.n_nodes - 1)
        }
    }

    /// Range of interior node indices `1..N-1`.
    #[inline]
    pub fn interior(&self) -> std::ops::Range<usize> {
        1..self.n_nodes - 1
    }
}
