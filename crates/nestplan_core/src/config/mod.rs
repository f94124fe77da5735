//! Simulation parameters
//!
//! Parameters are plain serde structs with `Default` impls that reproduce a
//! complete example plan: a 30 year old earning 70 000, saving for 35 years
//! under New Zealand tax rules, then drawing down for 25 years.
//!
//! # Conceptual Organization
//!
//! **Your situation**: `initial_salary`, `start_age`, `years`
//!
//! **World assumptions**: `salary_hike`, `inflation_rate`, `tax`, `levy_rate`,
//! `funds`, `foreign_equity`
//!
//! **Your plan**: `contributions`, `lump_sum`, `allocation`, `life_events`,
//! `expenses`
//!
//! Every struct is `#[serde(default)]`, so a scenario file only needs the
//! fields it changes.

mod retirement;

pub use retirement::{DrawdownParameters, RetirementAssumptions};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{
    AllocationBlock, AllocationSchedule, ContributionSchedule, ForeignEquityModel, FundSpec,
    LifeEventConfig, LivingExpenseProfile, ReturnProfile, default_allocation, default_funds,
};
use crate::taxes::TaxConfig;

/// Periodic extra contribution on top of salary-derived contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumpSumPlan {
    pub amount: f64,
    pub frequency_years: u32,
    pub start_year: u32,
}

impl Default for LumpSumPlan {
    fn default() -> Self {
        Self {
            amount: 10_000.0,
            frequency_years: 5,
            start_year: 5,
        }
    }
}

impl LumpSumPlan {
    /// No lump sums at all
    #[must_use]
    pub fn none() -> Self {
        Self {
            amount: 0.0,
            ..Default::default()
        }
    }

    /// Whether a lump sum lands in `year`.
    ///
    /// The start year counts as the first year of the first period, so with
    /// a start of 5 and a frequency of 5 the payments land in years 9, 14, 19...
    #[must_use]
    pub fn is_due(&self, year: u32) -> bool {
        self.frequency_years > 0
            && year >= self.start_year
            && (year - self.start_year + 1) % self.frequency_years == 0
    }
}

/// Everything the accumulation simulator needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulationParameters {
    pub initial_salary: f64,
    /// Annual salary growth, sampled once per year
    pub salary_hike: ReturnProfile,
    pub contributions: ContributionSchedule,
    pub lump_sum: LumpSumPlan,
    /// Number of working years simulated
    pub years: u32,
    pub start_age: u32,
    pub levy_rate: f64,
    pub inflation_rate: f64,
    /// Marginal income tax rate applied to the deemed FIF return
    pub marginal_tax_rate: f64,
    pub tax: TaxConfig,
    pub funds: Vec<FundSpec>,
    pub foreign_equity: ForeignEquityModel,
    pub allocation: Vec<AllocationBlock>,
    pub life_events: LifeEventConfig,
    pub expenses: LivingExpenseProfile,
}

impl Default for AccumulationParameters {
    fn default() -> Self {
        Self {
            initial_salary: 70_000.0,
            salary_hike: ReturnProfile::normal(0.05, 0.007),
            contributions: ContributionSchedule::default(),
            lump_sum: LumpSumPlan::default(),
            years: 35,
            start_age: 30,
            levy_rate: 0.0167,
            inflation_rate: 0.025,
            marginal_tax_rate: 0.30,
            tax: TaxConfig::default(),
            funds: default_funds(),
            foreign_equity: ForeignEquityModel::default(),
            allocation: default_allocation(),
            life_events: LifeEventConfig::default(),
            expenses: LivingExpenseProfile::default(),
        }
    }
}

impl AccumulationParameters {
    /// Age in the first year after the last working year
    #[must_use]
    pub fn retirement_age(&self) -> u32 {
        self.start_age + self.years
    }

    /// Build the validated allocation schedule for these parameters
    pub fn allocation_schedule(&self) -> Result<AllocationSchedule, ConfigError> {
        AllocationSchedule::new(
            self.allocation.clone(),
            self.funds.iter().map(|f| f.name.as_str()),
        )
    }

    /// Structural checks. Economic plausibility (rates, amounts) is the
    /// caller's responsibility.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.lump_sum.frequency_years == 0 {
            return Err(ConfigError::ZeroLumpSumFrequency);
        }
        self.contributions.validate()?;
        self.tax.validate()?;
        self.allocation_schedule()?;

        let events = &self.life_events;
        if let Some(year) = events.promotion_year
            && !(1..=self.years).contains(&year)
        {
            return Err(ConfigError::PromotionOutsideHorizon {
                year,
                years: self.years,
            });
        }
        if let Some(request) = events
            .withdrawals
            .iter()
            .find(|w| !(1..=self.years).contains(&w.year))
        {
            return Err(ConfigError::WithdrawalOutsideHorizon {
                year: request.year,
                years: self.years,
            });
        }

        let assumptions = &events.assumptions;
        let (min, max) = assumptions.random_withdrawal_range;
        if min >= max {
            return Err(ConfigError::InvalidWithdrawalRange { min, max });
        }
        if assumptions.home_auto_first_year > assumptions.home_auto_last_year {
            return Err(ConfigError::InvalidHomeYearRange {
                first: assumptions.home_auto_first_year,
                last: assumptions.home_auto_last_year,
            });
        }

        Ok(())
    }
}

/// A full plan: the working years and the retirement that follows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleParameters {
    pub accumulation: AccumulationParameters,
    pub retirement: RetirementAssumptions,
}

impl LifecycleParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retirement.years == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        self.accumulation.validate()
    }

    /// Drawdown parameters starting from `corpus` at the end of the working years
    #[must_use]
    pub fn drawdown_after(&self, corpus: f64) -> DrawdownParameters {
        DrawdownParameters::after_accumulation(&self.retirement, corpus, &self.accumulation)
    }
}
