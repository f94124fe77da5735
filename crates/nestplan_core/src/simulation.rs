use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::accumulation::AccumulationSimulator;
use crate::config::LifecycleParameters;
use crate::drawdown::DrawdownSimulator;
use crate::error::{Result, SimulationError};
use crate::model::{LifecycleResult, MonteCarloConfig, MonteCarloProgress, MonteCarloResult};

/// Accumulation chained into drawdown, built once and run per seed
#[derive(Debug, Clone)]
pub struct LifecycleSimulator {
    accumulation: AccumulationSimulator,
    drawdown: DrawdownSimulator,
}

impl LifecycleSimulator {
    pub fn new(params: &LifecycleParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            accumulation: AccumulationSimulator::new(&params.accumulation)?,
            // Starting corpus is replaced by each run's accumulation result
            drawdown: DrawdownSimulator::new(&params.drawdown_after(0.0))?,
        })
    }

    /// Run both phases from a single seeded stream
    #[must_use]
    pub fn run(&self, seed: u64) -> LifecycleResult {
        let mut rng = SmallRng::seed_from_u64(seed);
        let accumulation = self.accumulation.run(&mut rng);
        let retirement_corpus = accumulation.last().map_or(0.0, |r| r.corpus);
        let drawdown = self.drawdown.run_from(retirement_corpus, &mut rng);

        LifecycleResult {
            seed,
            accumulation,
            drawdown,
        }
    }
}

pub fn simulate_lifecycle(params: &LifecycleParameters, seed: u64) -> Result<LifecycleResult> {
    Ok(LifecycleSimulator::new(params)?.run(seed))
}

/// Run `config.iterations` independent lifecycle trials.
///
/// Trial seeds are drawn up front from the master seed, so results are the
/// same whatever the thread count. Cancellation is checked before each trial
/// starts; a cancelled batch returns [`SimulationError::Cancelled`].
pub fn monte_carlo_simulate(
    params: &LifecycleParameters,
    config: &MonteCarloConfig,
    progress: Option<&MonteCarloProgress>,
) -> Result<MonteCarloResult> {
    let simulator = LifecycleSimulator::new(params)?;

    let master_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut master = SmallRng::seed_from_u64(master_seed);
    let seeds: Vec<u64> = (0..config.iterations).map(|_| master.next_u64()).collect();

    tracing::debug!(
        iterations = config.iterations,
        master_seed,
        "starting monte carlo"
    );

    let run_trial = |seed: u64| -> Result<LifecycleResult> {
        if progress.is_some_and(MonteCarloProgress::is_cancelled) {
            return Err(SimulationError::Cancelled);
        }
        let result = simulator.run(seed);
        if let Some(progress) = progress {
            progress.increment();
        }
        Ok(result)
    };

    #[cfg(feature = "parallel")]
    let trials = seeds
        .into_par_iter()
        .map(run_trial)
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let trials = seeds
        .into_iter()
        .map(run_trial)
        .collect::<Result<Vec<_>>>()?;

    Ok(MonteCarloResult {
        master_seed,
        trials,
    })
}
