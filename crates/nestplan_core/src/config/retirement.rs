use serde::{Deserialize, Serialize};

use super::AccumulationParameters;
use crate::model::ReturnProfile;

/// Retirement-phase assumptions expressed in today's money.
///
/// These are the drawdown inputs that do not depend on how the working years
/// turned out. [`DrawdownParameters::after_accumulation`] combines them with
/// an accumulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementAssumptions {
    pub years: u32,
    /// Aggregate portfolio return, one sample per year
    pub returns: ReturnProfile,
    pub inflation: f64,
    pub lifestyle_base_today: f64,
    /// One-time uplift applied to the lifestyle base on retiring
    pub lifestyle_improvement: f64,
    pub government_support_today: f64,
}

impl Default for RetirementAssumptions {
    fn default() -> Self {
        Self {
            years: 25,
            returns: ReturnProfile::normal(0.05, 0.02),
            inflation: 0.025,
            lifestyle_base_today: 70_000.0,
            lifestyle_improvement: 0.40,
            government_support_today: 23_000.0,
        }
    }
}

/// Everything the drawdown simulator needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownParameters {
    pub starting_corpus: f64,
    pub start_age: u32,
    pub years: u32,
    pub returns: ReturnProfile,
    pub inflation: f64,
    pub lifestyle_base_today: f64,
    pub lifestyle_improvement: f64,
    pub government_support_today: f64,
    /// Years between "today" and the first retirement year, used to index
    /// the lifestyle and support figures forward
    pub accumulation_years: u32,
}

impl DrawdownParameters {
    /// Drawdown that starts the year after `accumulation` ends, from `corpus`
    #[must_use]
    pub fn after_accumulation(
        assumptions: &RetirementAssumptions,
        corpus: f64,
        accumulation: &AccumulationParameters,
    ) -> Self {
        Self::from_assumptions(
            assumptions,
            corpus,
            accumulation.retirement_age(),
            accumulation.years,
        )
    }

    #[must_use]
    pub fn from_assumptions(
        assumptions: &RetirementAssumptions,
        starting_corpus: f64,
        start_age: u32,
        accumulation_years: u32,
    ) -> Self {
        Self {
            starting_corpus,
            start_age,
            years: assumptions.years,
            returns: assumptions.returns,
            inflation: assumptions.inflation,
            lifestyle_base_today: assumptions.lifestyle_base_today,
            lifestyle_improvement: assumptions.lifestyle_improvement,
            government_support_today: assumptions.government_support_today,
            accumulation_years,
        }
    }

    /// Year-1 nominal lifestyle target
    #[must_use]
    pub fn indexed_lifestyle(&self) -> f64 {
        self.lifestyle_base_today * (1.0 + self.lifestyle_improvement) * self.indexation()
    }

    /// Year-1 nominal government support
    #[must_use]
    pub fn indexed_support(&self) -> f64 {
        self.government_support_today * self.indexation()
    }

    fn indexation(&self) -> f64 {
        (1.0 + self.inflation).powi(self.accumulation_years as i32)
    }
}
