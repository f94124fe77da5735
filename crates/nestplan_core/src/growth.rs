//! Fund growth model
//!
//! Samplers for every fund are built once per simulator. Each year
//! [`FundGrowthModel::sample_year`] draws one rate per allocated fund (in
//! fund-name order) plus the foreign compound rate, and [`apply_growth`]
//! turns those rates into per-fund flows.

use std::collections::BTreeMap;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::MarketError;
use crate::model::{ForeignEquityModel, FundFlow, FundSpec, ReturnSampler, Weights};

/// Share of a year's growth credited to contributions made during the year
pub const MID_YEAR_CONTRIBUTION_CREDIT: f64 = 0.5;

/// One fund's weight and sampled rate for a year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundDraw<'a> {
    pub fund: &'a str,
    pub weight: f64,
    pub rate: f64,
}

/// Rates sampled for a single year
#[derive(Debug, Clone, PartialEq)]
pub struct YearReturns<'a> {
    /// `(1 + base) * (1 + currency) - 1`, sampled every year
    pub foreign_rate: f64,
    /// Weight of the foreign fund this year, zero when it is not allocated
    pub foreign_weight: f64,
    pub draws: Vec<FundDraw<'a>>,
}

/// Result of crediting one year's growth
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthOutcome {
    pub funds: BTreeMap<String, FundFlow>,
    pub total_growth: f64,
}

#[derive(Debug, Clone)]
pub struct FundGrowthModel {
    samplers: FxHashMap<String, ReturnSampler>,
    foreign_fund: String,
    foreign_base: ReturnSampler,
    foreign_currency: ReturnSampler,
}

impl FundGrowthModel {
    pub fn new(funds: &[FundSpec], foreign: &ForeignEquityModel) -> Result<Self, MarketError> {
        let mut samplers = FxHashMap::default();
        for fund in funds {
            if fund.name == foreign.fund {
                continue;
            }
            samplers.insert(fund.name.clone(), fund.returns.sampler("fund return")?);
        }

        Ok(Self {
            samplers,
            foreign_fund: foreign.fund.clone(),
            foreign_base: foreign.base.sampler("foreign base growth")?,
            foreign_currency: foreign.currency.sampler("foreign currency movement")?,
        })
    }

    /// Sample this year's rates for every fund in `weights`
    pub fn sample_year<'a, R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        weights: &'a Weights,
    ) -> YearReturns<'a> {
        let base = self.foreign_base.sample(rng);
        let currency = self.foreign_currency.sample(rng);
        let foreign_rate = (1.0 + base) * (1.0 + currency) - 1.0;

        let draws = weights
            .iter()
            .map(|(fund, &weight)| {
                let rate = if *fund == self.foreign_fund {
                    foreign_rate
                } else {
                    // Unknown funds are rejected when the allocation schedule is built
                    self.samplers
                        .get(fund.as_str())
                        .map_or(0.0, |sampler| sampler.sample(rng))
                };
                FundDraw {
                    fund: fund.as_str(),
                    weight,
                    rate,
                }
            })
            .collect();

        YearReturns {
            foreign_rate,
            foreign_weight: weights.get(&self.foreign_fund).copied().unwrap_or(0.0),
            draws,
        }
    }
}

/// Per-fund flows for one year.
///
/// Each fund receives `total_contribution * w` and grows by
/// `corpus * w * g + contribution * g * MID_YEAR_CONTRIBUTION_CREDIT`.
#[must_use]
pub fn apply_growth(corpus: f64, total_contribution: f64, returns: &YearReturns) -> GrowthOutcome {
    let mut funds = BTreeMap::new();
    let mut total_growth = 0.0;

    for draw in &returns.draws {
        let contribution = total_contribution * draw.weight;
        let growth = corpus * draw.weight * draw.rate
            + contribution * draw.rate * MID_YEAR_CONTRIBUTION_CREDIT;
        total_growth += growth;
        funds.insert(
            draw.fund.to_string(),
            FundFlow {
                weight: draw.weight,
                contribution,
                growth,
                return_rate: draw.rate,
            },
        );
    }

    GrowthOutcome {
        funds,
        total_growth,
    }
}

/// Running balance of foreign-equity holdings, tracked beside the main corpus
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForeignCorpus {
    value: f64,
}

impl ForeignCorpus {
    /// Grow the existing balance at `rate`, then add this year's contribution
    pub fn advance(&mut self, contribution: f64, rate: f64) -> f64 {
        self.value += contribution + self.value * rate;
        self.value
    }
}
