//! Time-step stability tests.
//!
//! These tests verify:
//! 1. A grid-scale perturbation decays below the CFL limit
//! 2. The same perturbation grows (or the run diverges) above it
//! 3. Depth never drops below the floor during a dry-bed release
//! 4. The stability monitor flags an unstable configuration

use saint_venant::analysis::StabilityWarning;
use saint_venant::{
    BoundaryExtrapolation, Channel, ChannelGeometry, Grid1D, SaintVenantError, SaintVenantSolver,
    SolverConfig, StabilityMonitor, StabilityThresholds,
};

const N_STEPS: usize = 150;

/// Still water 2 m deep with a ±1 mm sawtooth around mid-channel.
fn perturbed_solver(config: SolverConfig) -> SaintVenantSolver {
    let geometry = ChannelGeometry::rectangular(10.0).unwrap();
    let channel = Channel::frictionless(geometry).unwrap();
    let grid = Grid1D::new(2000.0, 201).unwrap();
    let mut depth = vec![2.0; 201];
    let pattern = [0.0, 1.0, 0.0, -1.0];
    for (i, h) in depth.iter_mut().enumerate().take(121).skip(80) {
        *h += 1e-3 * pattern[i % 4];
    }
    let mut solver = SaintVenantSolver::new(config, channel, grid).unwrap();
    solver.set_from_arrays(&depth, &vec![0.0; 201]).unwrap();
    solver
}

#[test]
fn test_stable_below_cfl_limit() {
    let mut solver = perturbed_solver(SolverConfig::new().with_cfl(0.8));
    for _ in 0..N_STEPS {
        let report = solver.advance_step().unwrap();
        assert!(report.courant <= 0.8 + 1e-12);
    }
    let max_depth = solver.state().max_depth();
    assert!(max_depth < 2.01, "Perturbation grew to {}", max_depth);
    assert!(solver.state().min_depth() > 1.99);
}

#[test]
fn test_unstable_above_cfl_limit() {
    let mut solver = perturbed_solver(SolverConfig::new().with_cfl(1.5));
    let mut outcome = Ok(());
    for _ in 0..N_STEPS {
        if let Err(e) = solver.advance_step() {
            outcome = Err(e);
            break;
        }
    }

    match outcome {
        Err(SaintVenantError::Divergence { .. }) => {}
        Err(other) => panic!("Unexpected error: {}", other),
        Ok(()) => {
            let max_depth = solver.state().max_depth();
            assert!(
                max_depth > 4.0,
                "Expected growth above the CFL limit, max depth {}",
                max_depth
            );
        }
    }
}

#[test]
fn test_fixed_step_above_limit_diverges() {
    // c ≈ 4.43 m/s on a 10 m grid: dt = 4 s gives Courant ≈ 1.8
    let mut solver = perturbed_solver(SolverConfig::new().with_fixed_dt(4.0));
    let result = solver.run(10_000.0, 1000.0);
    assert!(
        matches!(result, Err(SaintVenantError::Divergence { .. })),
        "expected divergence, got {:?}",
        result.map(|s| s.len())
    );
}

#[test]
fn test_dry_bed_release_keeps_floor() {
    let geometry = ChannelGeometry::rectangular(20.0).unwrap();
    let channel = Channel::frictionless(geometry).unwrap();
    let grid = Grid1D::new(1000.0, 201).unwrap();
    let config = SolverConfig::default().with_extrapolation(BoundaryExtrapolation::ZeroGradient);
    let floor = config.min_depth_floor;
    let mut solver = SaintVenantSolver::new(config, channel, grid).unwrap();
    solver.set_dam_break(5.0, 0.0, 500.0).unwrap();

    let mut monitor = StabilityMonitor::new(StabilityThresholds::for_depth(5.0, 9.81));
    for _ in 0..300 {
        let report = solver.advance_step().unwrap();
        let status = monitor.check(solver.state(), &report);
        assert!(!status.has_critical_warnings(), "{:?}", status.warnings);
        assert!(solver.state().min_depth() >= floor);
    }
    assert!(solver.state().is_finite());
    assert_eq!(monitor.total_checks(), 300);
}

#[test]
fn test_monitor_flags_courant_violation() {
    let mut solver = perturbed_solver(SolverConfig::new().with_cfl(1.2));
    let mut monitor = StabilityMonitor::new(StabilityThresholds::default());

    let report = solver.advance_step().unwrap();
    let status = monitor.check(solver.state(), &report);

    assert!(!status.is_stable);
    assert!(status
        .warnings
        .iter()
        .any(|w| matches!(w, StabilityWarning::CourantExceeded { .. })));
    assert!(
        monitor
            .suggest_remediation()
            .iter()
            .any(|s| s.contains("CFL"))
    );
}
