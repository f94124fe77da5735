//! Life-event resolution
//!
//! Onset years are drawn once when a run starts ([`ResolvedLifeEvents`]); the
//! simulator then asks [`LifeEventSchedule::year`] for each year's flags and
//! deterministic costs. The only per-year randomness left is the extra child
//! cost and random withdrawal amounts, both sampled through [`LifeEventModel`].

use rand::Rng;
use rand::distr::{Bernoulli, Distribution};
use rand_distr::Poisson;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MarketError, Result};
use crate::model::{LifeEventAssumptions, LifeEventConfig, LifeEventMode};

/// Onset year of each event, `None` when it never happens within the horizon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLifeEvents {
    pub partner_year: Option<u32>,
    pub child_year: Option<u32>,
    pub home_year: Option<u32>,
}

impl ResolvedLifeEvents {
    /// Resolve onsets for a run of `horizon` years
    pub fn resolve<R: Rng + ?Sized>(
        config: &LifeEventConfig,
        horizon: u32,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(LifeEventModel::new(config)?.resolve(horizon, rng))
    }
}

/// Prebuilt distributions for the stochastic parts of the life-event model
#[derive(Debug, Clone)]
pub struct LifeEventModel {
    config: LifeEventConfig,
    partner_trial: Bernoulli,
    child_extra_cost: Option<Poisson<f64>>,
}

impl LifeEventModel {
    pub fn new(config: &LifeEventConfig) -> Result<Self> {
        let assumptions = &config.assumptions;
        if assumptions.home_auto_first_year > assumptions.home_auto_last_year {
            return Err(ConfigError::InvalidHomeYearRange {
                first: assumptions.home_auto_first_year,
                last: assumptions.home_auto_last_year,
            }
            .into());
        }
        let (min, max) = assumptions.random_withdrawal_range;
        if min >= max {
            return Err(ConfigError::InvalidWithdrawalRange { min, max }.into());
        }

        let partner_trial = Bernoulli::new(assumptions.partner_probability).map_err(|_| {
            MarketError::InvalidProbability {
                label: "partner onset",
                probability: assumptions.partner_probability,
            }
        })?;

        let mean = assumptions.child_extra_cost_mean;
        let child_extra_cost = if mean == 0.0 {
            None
        } else {
            Some(
                Poisson::new(mean).map_err(|_| MarketError::InvalidDistributionParameters {
                    profile_type: "child extra cost",
                    mean,
                    std_dev: 0.0,
                    reason: "Poisson mean must be positive and finite",
                })?,
            )
        };

        Ok(Self {
            config: config.clone(),
            partner_trial,
            child_extra_cost,
        })
    }

    pub fn resolve<R: Rng + ?Sized>(&self, horizon: u32, rng: &mut R) -> ResolvedLifeEvents {
        let assumptions = &self.config.assumptions;

        let partner_year = match self.config.partner {
            LifeEventMode::Auto => {
                let window = assumptions.partner_window_years;
                let drawn = (1..=window).find(|_| self.partner_trial.sample(rng));
                Some(drawn.unwrap_or(window))
            }
            LifeEventMode::Forced(true) => Some(1),
            LifeEventMode::Forced(false) => None,
        };

        let child_year = match self.config.children {
            LifeEventMode::Auto => partner_year.map(|year| year + 1),
            LifeEventMode::Forced(true) => Some(1),
            LifeEventMode::Forced(false) => None,
        };

        let home_year = match self.config.home {
            LifeEventMode::Auto => Some(
                rng.random_range(assumptions.home_auto_first_year..=assumptions.home_auto_last_year),
            ),
            LifeEventMode::Forced(true) => Some(assumptions.home_forced_year),
            LifeEventMode::Forced(false) => None,
        };

        let within = |year: Option<u32>| year.filter(|y| (1..=horizon).contains(y));
        let resolved = ResolvedLifeEvents {
            partner_year: within(partner_year),
            child_year: within(child_year),
            home_year: within(home_year),
        };

        tracing::debug!(
            partner_year = ?resolved.partner_year,
            child_year = ?resolved.child_year,
            home_year = ?resolved.home_year,
            "resolved life events"
        );

        resolved
    }

    /// Extra cost for a year with children, zero when the mean is zero
    pub fn sample_child_extra_cost<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.child_extra_cost
            .as_ref()
            .map_or(0.0, |poisson| poisson.sample(rng))
    }

    /// Total withdrawal requested in `year`, `None` when nothing is scheduled.
    /// Requests without an amount draw a whole-dollar amount from the
    /// configured range.
    pub fn requested_withdrawal<R: Rng + ?Sized>(&self, year: u32, rng: &mut R) -> Option<f64> {
        let (min, max) = self.config.assumptions.random_withdrawal_range;
        self.config
            .withdrawals
            .iter()
            .filter(|request| request.year == year)
            .map(|request| {
                request
                    .amount
                    .unwrap_or_else(|| f64::from(rng.random_range(min..max)))
            })
            .reduce(|total, amount| total + amount)
    }
}

/// What the life events mean for one simulated year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LifeEventYear {
    pub has_partner: bool,
    pub has_children: bool,
    /// Deterministic, inflation-indexed cost of raising children this year
    pub child_expense: f64,
    /// Home owned at the end of this year
    pub owns_home: bool,
    /// Down payment falls due this year
    pub buys_home: bool,
    /// Salary doubles this year
    pub promotion: bool,
}

/// Per-year view over a resolved set of onsets
#[derive(Debug, Clone)]
pub struct LifeEventSchedule {
    resolved: ResolvedLifeEvents,
    start_age: u32,
    inflation: f64,
    promotion_year: Option<u32>,
    child_duration_years: u32,
    child_base_cost: f64,
}

impl LifeEventSchedule {
    #[must_use]
    pub fn new(
        resolved: ResolvedLifeEvents,
        config: &LifeEventConfig,
        start_age: u32,
        inflation: f64,
    ) -> Self {
        let LifeEventAssumptions {
            child_duration_years,
            child_base_cost,
            ..
        } = config.assumptions;
        Self {
            resolved,
            start_age,
            inflation,
            promotion_year: config.promotion_year,
            child_duration_years,
            child_base_cost,
        }
    }

    #[must_use]
    pub fn year(&self, year: u32) -> LifeEventYear {
        let started = |onset: Option<u32>| onset.is_some_and(|y| year >= y);
        LifeEventYear {
            has_partner: started(self.resolved.partner_year),
            has_children: started(self.resolved.child_year),
            child_expense: self.child_expense(year),
            owns_home: started(self.resolved.home_year),
            buys_home: self.resolved.home_year == Some(year),
            promotion: self.promotion_year == Some(year),
        }
    }

    /// Child expense for `year`. The window is measured in ages, starting
    /// at the age reached in the child-onset year.
    fn child_expense(&self, year: u32) -> f64 {
        let Some(child_year) = self.resolved.child_year else {
            return 0.0;
        };
        let age = self.start_age + year - 1;
        let onset_age = self.start_age + child_year - 1;
        if age < onset_age || age >= onset_age + self.child_duration_years {
            return 0.0;
        }
        self.child_base_cost * (1.0 + self.inflation).powi((age - onset_age) as i32)
    }
}
