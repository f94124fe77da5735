//! Per-year output records
//!
//! A run is a `Vec` of records in chronological order, one per simulated year.
//! Rates are fractions; percentage presentation is left to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::expenses::LivingExpenses;

/// Contribution into and growth of one fund during a year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundFlow {
    pub weight: f64,
    pub contribution: f64,
    pub growth: f64,
    /// Sampled annual rate (the compound rate for the foreign fund)
    pub return_rate: f64,
}

/// One working year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulationRecord {
    pub year: u32,
    pub age: u32,

    // Salary & deductions
    pub gross_salary: f64,
    pub salary_change: f64,
    pub salary_change_rate: f64,
    pub income_tax: f64,
    pub levy: f64,
    pub net_salary: f64,

    // Contributions
    pub employee_contribution_rate: f64,
    pub employer_contribution_rate: f64,
    pub employee_contribution: f64,
    pub employer_contribution: f64,
    pub partner_contribution: f64,
    pub child_extra_cost: f64,
    pub lump_sum: f64,
    pub total_contribution: f64,

    // Funds
    pub funds: BTreeMap<String, FundFlow>,
    pub total_growth: f64,

    // Foreign investment & tax
    pub foreign_corpus: f64,
    pub foreign_return_rate: f64,
    pub fif_tax: f64,
    pub fif_tax_rate: f64,

    // Spending
    pub expenses: LivingExpenses,
    pub total_spend: f64,

    // Life events
    pub has_partner: bool,
    pub has_children: bool,
    pub owns_home: bool,
    pub home_down_payment: f64,

    // Unforeseen withdrawals
    pub withdrawal_requested: f64,
    pub withdrawal_applied: f64,
    pub withdrawal_shortfall: f64,

    pub corpus: f64,
}

/// One retirement year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownRecord {
    pub year: u32,
    pub age: u32,
    pub target_spend: f64,
    pub government_support: f64,
    /// Target spend minus support; negative when support exceeds the target
    pub net_withdrawal: f64,
    pub return_rate: f64,
    pub growth: f64,
    pub corpus: f64,
    /// `target_spend / corpus`, zero when the corpus is not positive
    pub target_spend_to_corpus: f64,
    /// `net_withdrawal / corpus`, zero when the corpus is not positive
    pub withdrawal_to_corpus: f64,
}

/// `numerator / corpus`, or zero when the corpus is not positive
#[must_use]
#[inline]
pub fn corpus_ratio(numerator: f64, corpus: f64) -> f64 {
    if corpus > 0.0 {
        numerator / corpus
    } else {
        0.0
    }
}
