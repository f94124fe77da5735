//! Drawdown simulator: the retirement years.
//!
//! The lifestyle target and government support are indexed forward over the
//! accumulation horizon to get year-1 nominal figures, then grow with
//! inflation each year. The corpus earns one aggregate return per year and
//! pays the net withdrawal; it is never floored.

use rand::Rng;

use crate::config::DrawdownParameters;
use crate::error::{ConfigError, Result};
use crate::model::{DrawdownRecord, ReturnSampler, corpus_ratio};

#[derive(Debug, Clone)]
pub struct DrawdownSimulator {
    params: DrawdownParameters,
    returns: ReturnSampler,
}

impl DrawdownSimulator {
    pub fn new(params: &DrawdownParameters) -> Result<Self> {
        if params.years == 0 {
            return Err(ConfigError::ZeroHorizon.into());
        }
        Ok(Self {
            returns: params.returns.sampler("drawdown return")?,
            params: params.clone(),
        })
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<DrawdownRecord> {
        self.run_from(self.params.starting_corpus, rng)
    }

    /// Run with a different starting corpus, keeping every other parameter
    pub fn run_from<R: Rng + ?Sized>(&self, starting_corpus: f64, rng: &mut R) -> Vec<DrawdownRecord> {
        let params = &self.params;
        tracing::debug!(
            years = params.years,
            start_age = params.start_age,
            starting_corpus,
            "starting drawdown run"
        );

        let lifestyle = params.indexed_lifestyle();
        let support = params.indexed_support();
        let mut corpus = starting_corpus;
        let mut records = Vec::with_capacity(params.years as usize);

        for year in 1..=params.years {
            let index = (1.0 + params.inflation).powi(year as i32 - 1);
            let target_spend = lifestyle * index;
            let government_support = support * index;
            let net_withdrawal = target_spend - government_support;

            let return_rate = self.returns.sample(rng);
            let growth = corpus * return_rate;
            corpus += growth - net_withdrawal;

            records.push(DrawdownRecord {
                year,
                age: params.start_age + year - 1,
                target_spend,
                government_support,
                net_withdrawal,
                return_rate,
                growth,
                corpus,
                target_spend_to_corpus: corpus_ratio(target_spend, corpus),
                withdrawal_to_corpus: corpus_ratio(net_withdrawal, corpus),
            });
        }

        if let Some(depleted) = records.iter().find(|r| r.corpus < 0.0) {
            tracing::debug!(age = depleted.age, "corpus depleted");
        }
        records
    }
}

/// Build a simulator for `params` and run it once
pub fn simulate_drawdown<R: Rng + ?Sized>(
    params: &DrawdownParameters,
    rng: &mut R,
) -> Result<Vec<DrawdownRecord>> {
    Ok(DrawdownSimulator::new(params)?.run(rng))
}
