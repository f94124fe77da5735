//! End-to-end scenarios with every source of randomness pinned
//!
//! These tests verify that:
//! - A one-year flat accumulation produces exactly the formula contribution
//! - A two-year flat drawdown pays exactly the inflation-indexed withdrawal
//! - Unforeseen withdrawals are capped at the available corpus

use crate::accumulation::simulate_accumulation;
use crate::config::{AccumulationParameters, DrawdownParameters, LumpSumPlan};
use crate::drawdown::simulate_drawdown;
use crate::model::{
    AllocationBlock, ContributionSchedule, ForeignEquityModel, FundSpec, LifeEventConfig,
    ReturnProfile, WithdrawalRequest,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn flat_accumulation(years: u32) -> AccumulationParameters {
    AccumulationParameters {
        initial_salary: 70_000.0,
        salary_hike: ReturnProfile::normal(0.0, 0.0),
        contributions: ContributionSchedule {
            start_rate: 0.06,
            max_rate: 0.15,
            ..Default::default()
        },
        lump_sum: LumpSumPlan::none(),
        years,
        funds: vec![FundSpec::normal("Cash", 0.0, 0.0)],
        foreign_equity: ForeignEquityModel {
            base: ReturnProfile::normal(0.0, 0.0),
            currency: ReturnProfile::normal(0.0, 0.0),
            ..Default::default()
        },
        allocation: vec![AllocationBlock::new(years, [("Cash", 1.0)])],
        life_events: LifeEventConfig::none(),
        ..Default::default()
    }
}

/// One year, zero growth: the corpus is exactly the year's contribution
#[test]
fn test_single_year_accumulation() {
    let params = flat_accumulation(1);
    let mut rng = SmallRng::seed_from_u64(42);
    let records = simulate_accumulation(&params, &mut rng).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];

    // 15 600 at 10.5%, 15 601..53 500 at 17.5%, 53 501..70 000 at 30%
    let expected_tax = 15_600.0 * 0.105 + 37_899.0 * 0.175 + 16_499.0 * 0.30;
    assert!((record.income_tax - expected_tax).abs() < 1e-6);
    assert!((record.levy - 70_000.0 * 0.0167).abs() < 1e-9);

    let net = 70_000.0 - expected_tax - 70_000.0 * 0.0167;
    assert!((record.net_salary - net).abs() < 1e-6);
    assert_eq!(record.employee_contribution_rate, 0.06);
    assert_eq!(record.employer_contribution_rate, 0.03);
    assert!((record.total_contribution - net * (0.06 + 0.03)).abs() < 1e-6);

    assert_eq!(record.total_growth, 0.0);
    assert_eq!(record.fif_tax, 0.0);
    assert_eq!(record.corpus, record.total_contribution);
}

/// Net withdrawal of 5 000 in today's terms, indexed at 2% from year 2
#[test]
fn test_two_year_drawdown() {
    let params = DrawdownParameters {
        starting_corpus: 100_000.0,
        start_age: 65,
        years: 2,
        returns: ReturnProfile::normal(0.0, 0.0),
        inflation: 0.02,
        lifestyle_base_today: 20_000.0,
        lifestyle_improvement: 0.0,
        government_support_today: 15_000.0,
        accumulation_years: 0,
    };
    let mut rng = SmallRng::seed_from_u64(42);
    let records = simulate_drawdown(&params, &mut rng).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].net_withdrawal, 5_000.0);
    assert_eq!(records[0].corpus, 95_000.0);
    assert!((records[1].net_withdrawal - 5_100.0).abs() < 1e-9);
    assert!((records[1].corpus - 89_900.0).abs() < 1e-9);
    assert!((records[1].target_spend - 20_400.0).abs() < 1e-9);
    assert!((records[1].government_support - 15_300.0).abs() < 1e-9);
}

/// Requests beyond the corpus pay out the corpus and report the rest
#[test]
fn test_withdrawal_capping() {
    let mut params = flat_accumulation(3);
    params.life_events.withdrawals = vec![
        WithdrawalRequest::fixed(2, 1_000_000.0),
        WithdrawalRequest::fixed(3, 1_000.0),
    ];
    let mut rng = SmallRng::seed_from_u64(42);
    let records = simulate_accumulation(&params, &mut rng).unwrap();

    let available = records[0].corpus;
    let capped = &records[1];
    assert_eq!(capped.withdrawal_requested, 1_000_000.0);
    assert_eq!(capped.withdrawal_applied, available);
    assert_eq!(capped.withdrawal_shortfall, 1_000_000.0 - available);
    assert!((capped.corpus - capped.total_contribution).abs() < 1e-6);

    let paid = &records[2];
    assert_eq!(paid.withdrawal_applied, 1_000.0);
    assert_eq!(paid.withdrawal_shortfall, 0.0);
    let expected = capped.corpus - 1_000.0 + paid.total_contribution;
    assert!((paid.corpus - expected).abs() < 1e-6);

    assert_eq!(records[0].withdrawal_requested, 0.0);
}
