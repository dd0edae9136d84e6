//! Conservation and equilibrium tests.
//!
//! These tests verify:
//! 1. Volume is conserved in a channel closed at both ends
//! 2. Volume gained equals the prescribed inflow
//! 3. Uniform flow at normal depth is a steady state
//! 4. Still water stays still in every cross-section shape

use saint_venant::{
    Channel, ChannelGeometry, ClosedEnd, FixedDischarge, FixedState, Grid1D, SaintVenantSolver,
    SolverConfig, normal_depth,
};

fn gaussian_hump(grid: &Grid1D) -> Vec<f64> {
    grid.positions()
        .iter()
        .map(|&x| 1.0 + 0.2 * (-((x - 500.0) / 50.0).powi(2)).exp())
        .collect()
}

fn closed_channel(geometry: ChannelGeometry) -> SaintVenantSolver {
    let channel = Channel::frictionless(geometry).unwrap();
    let grid = Grid1D::new(1000.0, 201).unwrap();
    let depth = gaussian_hump(&grid);
    let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid).unwrap();
    solver.set_from_arrays(&depth, &vec![0.0; 201]).unwrap();
    solver.set_upstream(ClosedEnd);
    solver.set_downstream(ClosedEnd);
    solver
}

/// A hump of water spreading and reflecting between two walls keeps its
/// volume.
#[test]
fn test_closed_channel_conserves_volume() {
    let mut solver = closed_channel(ChannelGeometry::rectangular(10.0).unwrap());
    let v0 = solver.total_volume();

    solver.run(100.0, 50.0).unwrap();
    let rel_short = (solver.total_volume() - v0) / v0;
    assert!(
        rel_short.abs() < 1e-5,
        "Volume drift after 100 s: {:.3e}",
        rel_short
    );

    // Several wall reflections later
    solver.run(1000.0, 500.0).unwrap();
    let rel_long = (solver.total_volume() - v0) / v0;
    assert!(
        rel_long.abs() < 1e-4,
        "Volume drift after 1000 s: {:.3e}",
        rel_long
    );
    assert_eq!(solver.negative_depth_events(), 0);
}

#[test]
fn test_closed_trapezoidal_channel_conserves_volume() {
    let mut solver = closed_channel(ChannelGeometry::trapezoidal(10.0, 2.0).unwrap());
    let v0 = solver.total_volume();

    solver.run(1000.0, 100.0).unwrap();
    let rel = (solver.total_volume() - v0) / v0;
    assert!(rel.abs() < 1e-4, "Volume drift: {:.3e}", rel);

    // The hump has spread out
    assert!(solver.state().max_depth() < 1.1);
}

/// Constant inflow into still water: the stored volume grows by Q·T.
#[test]
fn test_inflow_volume_balance() {
    let geometry = ChannelGeometry::rectangular(10.0).unwrap();
    let channel = Channel::frictionless(geometry).unwrap();
    let grid = Grid1D::new(2000.0, 401).unwrap();
    let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid).unwrap();
    solver.set_uniform(1.0, 0.0).unwrap();

    let inflow = 5.0;
    solver.set_upstream(FixedDischarge::new(inflow));

    let v0 = solver.total_volume();
    let t_end = 300.0;
    solver.run(t_end, 100.0).unwrap();

    let gained = solver.total_volume() - v0;
    let ratio = gained / (inflow * t_end);
    assert!(
        (ratio - 1.0).abs() < 0.01,
        "Volume gained {:.2} m³ vs inflow {:.2} m³ (ratio {:.5})",
        gained,
        inflow * t_end,
        ratio
    );
}

/// Normal-depth flow with the same state prescribed at both ends does not
/// move.
#[test]
fn test_uniform_flow_is_steady() {
    let geometry = ChannelGeometry::trapezoidal(10.0, 2.0).unwrap();
    let channel = Channel::new(geometry, 0.001, 0.03).unwrap();
    let q = 20.0;
    let hn = normal_depth(&channel, q).unwrap();

    let grid = Grid1D::new(2000.0, 101).unwrap();
    let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid).unwrap();
    solver.set_uniform(hn, q).unwrap();
    solver.set_upstream(FixedState::new(hn, q));
    solver.set_downstream(FixedState::new(hn, q));

    let snapshots = solver.run(600.0, 200.0).unwrap();
    assert_eq!(snapshots.len(), 4);

    for snapshot in &snapshots {
        for (h, qi) in snapshot.depth.iter().zip(&snapshot.discharge) {
            assert!((h - hn).abs() < 1e-8, "t = {}: depth {} vs {}", snapshot.time, h, hn);
            assert!((qi - q).abs() < 1e-6, "t = {}: discharge {} vs {}", snapshot.time, qi, q);
        }
    }
}

#[test]
fn test_still_water_in_every_shape() {
    let shapes = [
        ChannelGeometry::rectangular(8.0).unwrap(),
        ChannelGeometry::trapezoidal(4.0, 1.5).unwrap(),
        ChannelGeometry::compound_symmetric(5.0, 1.0, 2.0, 20.0, 3.0).unwrap(),
    ];

    for geometry in shapes {
        let channel = Channel::frictionless(geometry).unwrap();
        let grid = Grid1D::new(500.0, 51).unwrap();
        let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel, grid).unwrap();
        // Above the bench level for the compound section
        solver.set_uniform(3.0, 0.0).unwrap();
        solver.set_upstream(ClosedEnd);
        solver.set_downstream(ClosedEnd);

        solver.run(60.0, 60.0).unwrap();
        for (h, q) in solver.state().depth().iter().zip(solver.state().discharge()) {
            assert!((h - 3.0).abs() < 1e-10, "{:?}: depth {}", geometry, h);
            assert!(q.abs() < 1e-10, "{:?}: discharge {}", geometry, q);
        }
    }
}
