//! Year-scoped asset allocation
//!
//! An allocation is an ordered list of blocks, each covering every year up to
//! and including its `until_year`. Years past the last block keep using the
//! last block's weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fund name to weight. Sorted by name so iteration order is stable.
pub type Weights = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationBlock {
    /// Last simulation year (inclusive) this block applies to
    pub until_year: u32,
    pub weights: Weights,
}

impl AllocationBlock {
    pub fn new<S: Into<String>>(until_year: u32, weights: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            until_year,
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Resolve the weights for `year`: the first block whose `until_year` is at
/// least `year`, else the last block. `None` only for an empty list.
#[must_use]
pub fn resolve_allocation(year: u32, blocks: &[AllocationBlock]) -> Option<&Weights> {
    blocks
        .iter()
        .find(|b| year <= b.until_year)
        .or_else(|| blocks.last())
        .map(|b| &b.weights)
}

/// Validated, non-empty allocation list
#[derive(Debug, Clone)]
pub struct AllocationSchedule {
    blocks: Vec<AllocationBlock>,
}

impl AllocationSchedule {
    /// Check ordering and that every weighted fund is one of `known_funds`
    pub fn new<'a>(
        blocks: Vec<AllocationBlock>,
        known_funds: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Result<Self, ConfigError> {
        if blocks.is_empty() {
            return Err(ConfigError::EmptyAllocation);
        }

        for (index, pair) in blocks.windows(2).enumerate() {
            if pair[1].until_year < pair[0].until_year {
                return Err(ConfigError::UnsortedAllocation {
                    index: index + 1,
                    until_year: pair[1].until_year,
                    previous: pair[0].until_year,
                });
            }
        }

        for block in &blocks {
            for fund in block.weights.keys() {
                if !known_funds.clone().into_iter().any(|k| k == fund) {
                    return Err(ConfigError::UnknownFund {
                        fund: fund.clone(),
                        until_year: block.until_year,
                    });
                }
            }
            let total: f64 = block.weights.values().sum();
            if (total - 1.0).abs() > 1e-6 {
                tracing::warn!(
                    until_year = block.until_year,
                    total,
                    "allocation weights do not sum to 1"
                );
            }
        }

        Ok(Self { blocks })
    }

    #[must_use]
    pub fn weights_for(&self, year: u32) -> &Weights {
        // Non-empty by construction
        resolve_allocation(year, &self.blocks).unwrap_or(&self.blocks[0].weights)
    }
}

/// Glide path from growth-heavy to conservative over seven five-year blocks
#[must_use]
pub fn default_allocation() -> Vec<AllocationBlock> {
    vec![
        AllocationBlock::new(
            5,
            [
                ("Harboursafe", 0.05),
                ("Horizon", 0.05),
                ("SkyHigh", 0.45),
                ("Foreign_Equities", 0.30),
                ("Bitcoin", 0.15),
            ],
        ),
        AllocationBlock::new(
            10,
            [
                ("Harboursafe", 0.10),
                ("Horizon", 0.10),
                ("SkyHigh", 0.50),
                ("Foreign_Equities", 0.20),
                ("Bitcoin", 0.10),
            ],
        ),
        AllocationBlock::new(
            15,
            [
                ("Harboursafe", 0.20),
                ("Horizon", 0.15),
                ("SkyHigh", 0.45),
                ("Foreign_Equities", 0.15),
                ("Bitcoin", 0.05),
            ],
        ),
        AllocationBlock::new(
            20,
            [
                ("Harboursafe", 0.30),
                ("Horizon", 0.20),
                ("SkyHigh", 0.30),
                ("Foreign_Equities", 0.15),
            ],
        ),
        AllocationBlock::new(
            25,
            [
                ("Harboursafe", 0.45),
                ("Horizon", 0.25),
                ("SkyHigh", 0.20),
                ("Foreign_Equities", 0.10),
            ],
        ),
        AllocationBlock::new(
            30,
            [
                ("Harboursafe", 0.60),
                ("Horizon", 0.25),
                ("SkyHigh", 0.10),
                ("Foreign_Equities", 0.05),
            ],
        ),
        AllocationBlock::new(
            35,
            [("Harboursafe", 0.70), ("Horizon", 0.20), ("SkyHigh", 0.10)],
        ),
    ]
}
