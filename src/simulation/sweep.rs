//! Batches of independent runs.
//!
//! Every case builds its own solver, so cases share nothing and can run on
//! separate threads. With the `parallel` feature the batch is spread over the
//! rayon thread pool; otherwise it runs serially in input order. Results are
//! always returned in input order.

use super::runner::{CancelFlag, RunReport};
use crate::channel::Channel;
use crate::error::Result;
use crate::mesh::Grid1D;
use crate::solver::{SaintVenantSolver, SolverConfig};

type SolverSetup = Box<dyn Fn() -> Result<SaintVenantSolver> + Send + Sync>;

/// One member of a sweep: a label and a recipe for a ready-to-run solver.
pub struct SweepCase {
    /// Case label, copied into the result
    pub label: String,
    setup: SolverSetup,
}

impl SweepCase {
    /// Case built by an arbitrary setup closure (initial and boundary
    /// conditions included).
    pub fn new<F>(label: impl Into<String>, setup: F) -> Self
    where
        F: Fn() -> Result<SaintVenantSolver> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            setup: Box::new(setup),
        }
    }

    /// Dam break between two still pools with open ends.
    pub fn dam_break(
        label: impl Into<String>,
        config: SolverConfig,
        channel: Channel,
        grid: Grid1D,
        (h_up, h_down, x_dam): (f64, f64, f64),
    ) -> Self {
        Self::new(label, move || {
            let mut solver = SaintVenantSolver::new(config.clone(), channel, grid.clone())?;
            solver.set_dam_break(h_up, h_down, x_dam)?;
            Ok(solver)
        })
    }

    /// Build the solver for this case.
    pub fn build(&self) -> Result<SaintVenantSolver> {
        (self.setup)()
    }
}

impl std::fmt::Debug for SweepCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepCase")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Outcome of one sweep case.
#[derive(Debug)]
pub struct SweepResult {
    /// Label of the case
    pub label: String,
    /// Run report, or the setup/run error of this case
    pub outcome: Result<RunReport>,
}

fn run_case(case: &SweepCase, t_end: f64, output_interval: f64, cancel: &CancelFlag) -> SweepResult {
    let outcome = case
        .build()
        .and_then(|mut solver| solver.run_cancellable(t_end, output_interval, cancel));
    SweepResult {
        label: case.label.clone(),
        outcome,
    }
}

/// Run every case to `t_end`.
///
/// A failing case does not stop the others. Setting `cancel` stops all cases
/// still running.
pub fn run_sweep(
    cases: &[SweepCase],
    t_end: f64,
    output_interval: f64,
    cancel: &CancelFlag,
) -> Vec<SweepResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        cases
            .par_iter()
            .map(|case| run_case(case, t_end, output_interval, cancel))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        cases
            .iter()
            .map(|case| run_case(case, t_end, output_interval, cancel))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::ClosedEnd;
    use crate::channel::ChannelGeometry;
    use crate::error::SaintVenantError;
    use crate::simulation::RunStatus;

    fn channel() -> Channel {
        Channel::frictionless(ChannelGeometry::rectangular(10.0).unwrap()).unwrap()
    }

    #[test]
    fn test_sweep_preserves_order_and_isolates_failures() {
        let grid = Grid1D::new(1000.0, 101).unwrap();
        let cases = vec![
            SweepCase::dam_break(
                "deep",
                SolverConfig::default(),
                channel(),
                grid.clone(),
                (4.0, 1.0, 500.0),
            ),
            SweepCase::new("broken", || {
                let grid = Grid1D::new(1000.0, 101)?;
                let mut solver = SaintVenantSolver::new(SolverConfig::default(), channel(), grid)?;
                solver.set_uniform(-1.0, 0.0)?;
                Ok(solver)
            }),
            SweepCase::new("closed", move || {
                let mut solver =
                    SaintVenantSolver::new(SolverConfig::default(), channel(), grid.clone())?;
                solver.set_uniform(2.0, 0.0)?;
                solver.set_upstream(ClosedEnd);
                solver.set_downstream(ClosedEnd);
                Ok(solver)
            }),
        ];

        let results = run_sweep(&cases, 20.0, 10.0, &CancelFlag::new());
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["deep", "broken", "closed"]);

        let deep = results[0].outcome.as_ref().unwrap();
        assert_eq!(deep.status, RunStatus::Completed);
        assert_eq!(deep.snapshots.len(), 3);

        assert!(matches!(
            results[1].outcome,
            Err(SaintVenantError::InvalidState(_))
        ));

        let closed = results[2].outcome.as_ref().unwrap();
        assert_eq!(closed.final_time, 20.0);
    }

    #[test]
    fn test_cancelled_sweep() {
        let grid = Grid1D::new(1000.0, 101).unwrap();
        let cases: Vec<_> = (0..4)
            .map(|k| {
                SweepCase::dam_break(
                    format!("case-{}", k),
                    SolverConfig::default(),
                    channel(),
                    grid.clone(),
                    (2.0 + k as f64, 1.0, 500.0),
                )
            })
            .collect();

        let cancel = CancelFlag::new();
        cancel.cancel();
        for result in run_sweep(&cases, 100.0, 10.0, &cancel) {
            let report = result.outcome.unwrap();
            assert_eq!(report.status, RunStatus::Cancelled);
            assert_eq!(report.final_time, 0.0);
        }
    }
}
