//! Monte Carlo batches on a worker thread

use std::thread;
use std::time::Duration;

use color_eyre::eyre::eyre;
use nestplan_core::SimulationError;
use nestplan_core::config::LifecycleParameters;
use nestplan_core::model::{MonteCarloConfig, MonteCarloProgress, MonteCarloResult};
use nestplan_core::simulation::monte_carlo_simulate;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Run a batch in the background, calling `on_tick` with the completed trial
/// count while it runs. Returns `None` when `progress` was cancelled.
pub fn run_monte_carlo(
    params: LifecycleParameters,
    config: MonteCarloConfig,
    progress: &MonteCarloProgress,
    mut on_tick: impl FnMut(usize),
) -> color_eyre::Result<Option<MonteCarloResult>> {
    let worker_progress = progress.clone();
    let handle =
        thread::spawn(move || monte_carlo_simulate(&params, &config, Some(&worker_progress)));

    while !handle.is_finished() {
        on_tick(progress.completed());
        thread::sleep(POLL_INTERVAL);
    }
    on_tick(progress.completed());

    match handle
        .join()
        .map_err(|_| eyre!("Monte Carlo worker panicked"))?
    {
        Ok(result) => Ok(Some(result)),
        Err(SimulationError::Cancelled) => {
            tracing::info!(completed = progress.completed(), "Monte Carlo cancelled");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
