//! Run results and Monte Carlo bookkeeping

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::records::{AccumulationRecord, DrawdownRecord};

/// Accumulation followed by drawdown on the resulting corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleResult {
    /// Seed that reproduces this run
    pub seed: u64,
    pub accumulation: Vec<AccumulationRecord>,
    pub drawdown: Vec<DrawdownRecord>,
}

impl LifecycleResult {
    /// Corpus at the end of the last working year
    #[must_use]
    pub fn retirement_corpus(&self) -> f64 {
        self.accumulation.last().map_or(0.0, |r| r.corpus)
    }

    /// Corpus at the end of the last retirement year
    #[must_use]
    pub fn final_corpus(&self) -> f64 {
        self.drawdown
            .last()
            .map_or_else(|| self.retirement_corpus(), |r| r.corpus)
    }

    /// Age in the first retirement year that ends with a negative corpus
    #[must_use]
    pub fn depletion_age(&self) -> Option<u32> {
        self.drawdown.iter().find(|r| r.corpus < 0.0).map(|r| r.age)
    }

    #[must_use]
    pub fn total_contributions(&self) -> f64 {
        self.accumulation.iter().map(|r| r.total_contribution).sum()
    }

    /// Corpus at retirement less everything paid in: market growth net of
    /// withdrawals, home purchases and FIF tax
    #[must_use]
    pub fn total_profit(&self) -> f64 {
        self.retirement_corpus() - self.total_contributions()
    }

    /// Whether any unforeseen withdrawal could not be met in full
    #[must_use]
    pub fn had_withdrawal_shortfall(&self) -> bool {
        self.accumulation
            .iter()
            .any(|r| r.withdrawal_shortfall > 0.0)
    }
}

/// How many trials to run and how to seed them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// Master seed; `None` draws one from the operating system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            seed: None,
        }
    }
}

/// Shared progress counter and cancellation flag for a batch of trials.
///
/// Clones share the same atomics, so one clone can be handed to the worker
/// and another kept by the caller to poll or cancel.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Request cancellation; trials already running finish normally
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Results from a batch of independent trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub master_seed: u64,
    pub trials: Vec<LifecycleResult>,
}

impl MonteCarloResult {
    #[must_use]
    pub fn retirement_corpora(&self) -> Vec<f64> {
        self.trials.iter().map(LifecycleResult::retirement_corpus).collect()
    }

    #[must_use]
    pub fn final_corpora(&self) -> Vec<f64> {
        self.trials.iter().map(LifecycleResult::final_corpus).collect()
    }

    /// Share of trials whose corpus never went negative in retirement
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let ok = self
            .trials
            .iter()
            .filter(|t| t.depletion_age().is_none())
            .count();
        ok as f64 / self.trials.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn drawdown(year: u32, age: u32, corpus: f64) -> DrawdownRecord {
        DrawdownRecord {
            year,
            age,
            target_spend: 0.0,
            government_support: 0.0,
            net_withdrawal: 0.0,
            return_rate: 0.0,
            growth: 0.0,
            corpus,
            target_spend_to_corpus: 0.0,
            withdrawal_to_corpus: 0.0,
        }
    }

    #[test]
    fn test_depletion_age_is_first_negative_year() {
        let result = LifecycleResult {
            seed: 1,
            accumulation: vec![],
            drawdown: vec![
                drawdown(1, 65, 10.0),
                drawdown(2, 66, -1.0),
                drawdown(3, 67, -5.0),
            ],
        };
        assert_eq!(result.depletion_age(), Some(66));
        assert_eq!(result.final_corpus(), -5.0);
        assert_eq!(result.retirement_corpus(), 0.0);
    }

    #[test]
    fn test_total_profit_is_corpus_less_contributions() {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(8);
        let accumulation = crate::accumulation::simulate_accumulation(
            &crate::config::AccumulationParameters::default(),
            &mut rng,
        )
        .unwrap();
        let paid_in: f64 = accumulation.iter().map(|r| r.total_contribution).sum();
        let corpus = accumulation.last().unwrap().corpus;
        let result = LifecycleResult {
            seed: 8,
            accumulation,
            drawdown: vec![],
        };
        assert!((result.total_profit() - (corpus - paid_in)).abs() < 1e-6);
    }

    #[test]
    fn test_success_rate() {
        let ok = LifecycleResult {
            seed: 1,
            accumulation: vec![],
            drawdown: vec![drawdown(1, 65, 10.0)],
        };
        let failed = LifecycleResult {
            seed: 2,
            accumulation: vec![],
            drawdown: vec![drawdown(1, 65, -10.0)],
        };
        let result = MonteCarloResult {
            master_seed: 0,
            trials: vec![ok.clone(), ok, failed],
        };
        assert!((result.success_rate() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            MonteCarloResult {
                master_seed: 0,
                trials: vec![]
            }
            .success_rate(),
            0.0
        );
    }

    #[test]
    fn test_progress_clones_share_state() {
        let progress = MonteCarloProgress::new();
        let worker = progress.clone();
        worker.increment();
        worker.increment();
        progress.cancel();
        assert_eq!(progress.completed(), 2);
        assert!(worker.is_cancelled());
    }
}
