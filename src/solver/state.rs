//! Grid flow state: depth and discharge at every node.
//!
//! Depth h and discharge Q are the prognostic variables. Area A(h) and
//! velocity v = Q/A are derived and kept in sync after every update.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelGeometry;
use crate::equations::AREA_EPS;
use crate::error::{Result, SaintVenantError};
use crate::mesh::Grid1D;

/// Flow state on the node grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    depth: Vec<f64>,
    discharge: Vec<f64>,
    area: Vec<f64>,
    velocity: Vec<f64>,
    min_depth_floor: f64,
}

impl FlowState {
    /// A state of `n_nodes` nodes at the depth floor and at rest.
    pub fn new(n_nodes: usize, min_depth_floor: f64, geometry: &ChannelGeometry) -> Self {
        let mut state = Self {
            depth: vec![min_depth_floor; n_nodes],
            discharge: vec![0.0; n_nodes],
            area: vec![0.0; n_nodes],
            velocity: vec![0.0; n_nodes],
            min_depth_floor,
        };
        state.refresh_derived(geometry);
        state
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.depth.len()
    }

    /// Water depth at each node.
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Discharge at each node.
    pub fn discharge(&self) -> &[f64] {
        &self.discharge
    }

    /// Flow area at each node.
    pub fn area(&self) -> &[f64] {
        &self.area
    }

    /// Mean velocity at each node.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Depth floor applied after every update.
    pub fn min_depth_floor(&self) -> f64 {
        self.min_depth_floor
    }

    /// Fill every node with the same depth and discharge.
    pub fn set_uniform(&mut self, geometry: &ChannelGeometry, h0: f64, q0: f64) -> Result<()> {
        check_depth_value(h0, "uniform depth")?;
        if !q0.is_finite() {
            return Err(SaintVenantError::invalid_state(format!(
                "uniform discharge must be finite, got {}",
                q0
            )));
        }
        self.depth.fill(h0);
        self.discharge.fill(q0);
        self.apply_floor();
        self.refresh_derived(geometry);
        Ok(())
    }

    /// Copy an arbitrary depth/discharge profile.
    pub fn set_from_arrays(
        &mut self,
        geometry: &ChannelGeometry,
        depth: &[f64],
        discharge: &[f64],
    ) -> Result<()> {
        let n = self.n_nodes();
        if depth.len() != n || discharge.len() != n {
            return Err(SaintVenantError::invalid_state(format!(
                "expected {} nodes, got {} depths and {} discharges",
                n,
                depth.len(),
                discharge.len()
            )));
        }
        for (i, &h) in depth.iter().enumerate() {
            check_depth_value(h, &format!("depth[{}]", i))?;
        }
        if let Some(i) = discharge.iter().position(|q| !q.is_finite()) {
            return Err(SaintVenantError::invalid_state(format!(
                "discharge[{}] must be finite, got {}",
                i, discharge[i]
            )));
        }

        self.depth.copy_from_slice(depth);
        self.discharge.copy_from_slice(discharge);
        self.apply_floor();
        self.refresh_derived(geometry);
        Ok(())
    }

    /// Dam-break initial condition: `h_up` for x < x_dam, `h_down` elsewhere,
    /// water at rest. `h_down = 0` is the dry-bed case (raised to the floor).
    pub fn set_dam_break(
        &mut self,
        geometry: &ChannelGeometry,
        grid: &Grid1D,
        h_up: f64,
        h_down: f64,
        x_dam: f64,
    ) -> Result<()> {
        check_depth_value(h_up, "upstream depth")?;
        check_depth_value(h_down, "downstream depth")?;
        if h_down > h_up {
            return Err(SaintVenantError::invalid_state(format!(
                "downstream depth {} exceeds upstream depth {}",
                h_down, h_up
            )));
        }
        if !(x_dam.is_finite() && (0.0..=grid.length).contains(&x_dam)) {
            return Err(SaintVenantError::invalid_state(format!(
                "dam position {} outside the channel [0, {}]",
                x_dam, grid.length
            )));
        }

        for (i, h) in self.depth.iter_mut().enumerate() {
            *h = if grid.x(i) < x_dam { h_up } else { h_down };
        }
        self.discharge.fill(0.0);
        self.apply_floor();
        self.refresh_derived(geometry);
        Ok(())
    }

    /// Raise every depth to the floor. Returns the number of nodes that were
    /// strictly negative before clamping.
    pub(crate) fn apply_floor(&mut self) -> usize {
        let floor = self.min_depth_floor;
        let mut negative = 0;
        for h in &mut self.depth {
            if *h < 0.0 {
                negative += 1;
            }
            if *h < floor {
                *h = floor;
            }
        }
        negative
    }

    /// Recompute area and velocity from depth and discharge.
    pub(crate) fn refresh_derived(&mut self, geometry: &ChannelGeometry) {
        for i in 0..self.depth.len() {
            let a = geometry.area_unchecked(self.depth[i]);
            self.area[i] = a;
            self.velocity[i] = if a > AREA_EPS {
                self.discharge[i] / a
            } else {
                0.0
            };
        }
    }

    /// Mutable access to the prognostic arrays for the solver's buffer swap.
    pub(crate) fn prognostic_mut(&mut self) -> (&mut Vec<f64>, &mut Vec<f64>) {
        (&mut self.depth, &mut self.discharge)
    }

    /// Stored volume ∫A dx (trapezoidal rule).
    pub fn total_volume(&self, dx: f64) -> f64 {
        let n = self.area.len();
        let interior: f64 = self.area[1..n - 1].iter().sum();
        dx * (interior + 0.5 * (self.area[0] + self.area[n - 1]))
    }

    /// Largest depth on the grid (NaN-propagating).
    pub fn max_depth(&self) -> f64 {
        self.depth
            .iter()
            .fold(f64::NEG_INFINITY, |m, &h| if h.is_nan() || m.is_nan() { f64::NAN } else { m.max(h) })
    }

    /// Smallest depth on the grid.
    pub fn min_depth(&self) -> f64 {
        self.depth.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest absolute velocity on the grid.
    pub fn max_speed(&self) -> f64 {
        self.velocity.iter().fold(0.0, |m: f64, v| m.max(v.abs()))
    }

    /// Largest Froude number |v|/√(g A/T) on the grid.
    pub fn max_froude(&self, geometry: &ChannelGeometry, g: f64) -> f64 {
        let mut fr_max: f64 = 0.0;
        for i in 0..self.depth.len() {
            let t = geometry.top_width_unchecked(self.depth[i]);
            let a = self.area[i];
            if t <= 0.0 || a <= AREA_EPS {
                continue;
            }
            let c = (g * a / t).sqrt();
            fr_max = fr_max.max(self.velocity[i].abs() / c);
        }
        fr_max
    }

    /// Whether every stored value is finite.
    pub fn is_finite(&self) -> bool {
        self.depth.iter().all(|v| v.is_finite()) && self.discharge.iter().all(|v| v.is_finite())
    }
}

fn check_depth_value(h: f64, what: &str) -> Result<()> {
    if h.is_finite() && h >= 0.0 {
        Ok(())
    } else {
        Err(SaintVenantError::invalid_state(format!(
            "{} must be non-negative and finite, got {}",
            what, h
        )))
    }
}
