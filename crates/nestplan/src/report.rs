//! Summary statistics over a Monte Carlo batch

use nestplan_core::model::{LifecycleResult, MonteCarloResult};
use serde::{Deserialize, Serialize};

/// 5th, 50th and 95th percentile of one quantity across trials
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileSummary {
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl PercentileSummary {
    #[must_use]
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.sort_by(|a, b| a.total_cmp(b));
        Self {
            p5: percentile(&values, 5.0),
            p50: percentile(&values, 50.0),
            p95: percentile(&values, 95.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub iterations: usize,
    /// Pass back as `--seed` to reproduce this batch
    pub master_seed: u64,
    pub retirement_corpus: PercentileSummary,
    pub final_corpus: PercentileSummary,
    /// Share of trials whose corpus went negative in retirement
    pub depletion_probability: f64,
    /// Median depletion age among depleted trials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_depletion_age: Option<f64>,
    pub mean_total_contributions: f64,
    /// Mean of retirement corpus minus total contributions
    pub mean_total_profit: f64,
    /// Share of trials with at least one partly unpaid withdrawal
    pub withdrawal_shortfall_frequency: f64,
}

impl MonteCarloReport {
    #[must_use]
    pub fn from_result(result: &MonteCarloResult) -> Self {
        let trials = &result.trials;
        let n = trials.len();
        let share = |count: usize| if n == 0 { 0.0 } else { count as f64 / n as f64 };

        let mut depletion_ages: Vec<f64> = trials
            .iter()
            .filter_map(|t| t.depletion_age())
            .map(f64::from)
            .collect();
        depletion_ages.sort_by(|a, b| a.total_cmp(b));
        let median_depletion_age =
            (!depletion_ages.is_empty()).then(|| percentile(&depletion_ages, 50.0));

        let mean = |f: fn(&LifecycleResult) -> f64| {
            if n == 0 {
                0.0
            } else {
                trials.iter().map(f).sum::<f64>() / n as f64
            }
        };

        Self {
            iterations: n,
            master_seed: result.master_seed,
            retirement_corpus: PercentileSummary::from_values(result.retirement_corpora()),
            final_corpus: PercentileSummary::from_values(result.final_corpora()),
            depletion_probability: share(depletion_ages.len()),
            median_depletion_age,
            mean_total_contributions: mean(LifecycleResult::total_contributions),
            mean_total_profit: mean(LifecycleResult::total_profit),
            withdrawal_shortfall_frequency: share(
                trials.iter().filter(|t| t.had_withdrawal_shortfall()).count(),
            ),
        }
    }
}

/// Linearly interpolated percentile of an ascending slice, `p` in 0..=100
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let w = rank - lower as f64;
        sorted[lower] * (1.0 - w) + sorted[upper] * w
    }
}
