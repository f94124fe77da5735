//! Accumulation simulator: the working years.
//!
//! [`AccumulationSimulator::new`] validates the parameters and builds every
//! sampler up front, so [`AccumulationSimulator::run`] cannot fail. A run
//! resolves life events once, then walks years `1..=years` in a fixed order:
//!
//! 1. income tax and levy, net salary
//! 2. contribution and employer-match rates
//! 3. life events for the year, extra child cost
//! 4. lump sum
//! 5. partner contribution
//! 6. home purchase
//! 7. promotion
//! 8. unforeseen withdrawal
//! 9. fund returns, foreign corpus and FIF tax
//! 10. corpus update
//! 11. living expenses
//! 12. record, then the salary hike for next year

use rand::Rng;

use crate::config::AccumulationParameters;
use crate::error::Result;
use crate::growth::{FundGrowthModel, apply_growth};
use crate::life_events::{LifeEventModel, LifeEventSchedule, LifeEventYear};
use crate::model::{AccumulationRecord, AllocationSchedule, ReturnSampler, StepSchedule};
use crate::simulation_state::AccumulationState;
use crate::taxes::{calculate_fif_tax, calculate_levy};

#[derive(Debug, Clone)]
pub struct AccumulationSimulator {
    params: AccumulationParameters,
    allocation: AllocationSchedule,
    contribution_rates: StepSchedule,
    growth: FundGrowthModel,
    salary_hike: ReturnSampler,
    life_events: LifeEventModel,
}

impl AccumulationSimulator {
    pub fn new(params: &AccumulationParameters) -> Result<Self> {
        params.validate()?;

        Ok(Self {
            allocation: params.allocation_schedule()?,
            contribution_rates: params.contributions.compile(params.years),
            growth: FundGrowthModel::new(&params.funds, &params.foreign_equity)?,
            salary_hike: params.salary_hike.sampler("salary hike")?,
            life_events: LifeEventModel::new(&params.life_events)?,
            params: params.clone(),
        })
    }

    /// One forward pass over the working years
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<AccumulationRecord> {
        let params = &self.params;
        tracing::debug!(
            years = params.years,
            start_age = params.start_age,
            initial_salary = params.initial_salary,
            "starting accumulation run"
        );

        let resolved = self.life_events.resolve(params.years, rng);
        let schedule = LifeEventSchedule::new(
            resolved,
            &params.life_events,
            params.start_age,
            params.inflation_rate,
        );
        let mut state = AccumulationState::new(params.initial_salary, &params.expenses);

        let mut records = Vec::with_capacity(params.years as usize);
        for year in 1..=params.years {
            let events = schedule.year(year);
            records.push(self.step(year, events, &mut state, rng));
        }
        records
    }

    fn step<R: Rng + ?Sized>(
        &self,
        year: u32,
        events: LifeEventYear,
        state: &mut AccumulationState,
        rng: &mut R,
    ) -> AccumulationRecord {
        let params = &self.params;
        let assumptions = &params.life_events.assumptions;
        let age = params.start_age + year - 1;

        // 1. Salary deductions
        let taxed_salary = state.salary;
        let income_tax = params
            .tax
            .income_tax(taxed_salary, year, params.inflation_rate);
        let levy = calculate_levy(taxed_salary, params.levy_rate);
        let mut net_salary = taxed_salary - income_tax - levy;

        // 2. Contributions
        let employee_rate = self.contribution_rates.value_at(year);
        let employer_rate = params.contributions.employer_rate(employee_rate);
        let employee_contribution = net_salary * employee_rate;
        let employer_contribution = net_salary * employer_rate;
        let mut total_contribution = employee_contribution + employer_contribution;

        // 3. Children
        let child_extra_cost = if events.has_children {
            let cost = self.life_events.sample_child_extra_cost(rng);
            net_salary -= cost;
            total_contribution =
                (total_contribution - cost * assumptions.child_contribution_offset).max(0.0);
            cost
        } else {
            0.0
        };

        // 4. Lump sum
        let mut lump_sum = 0.0;
        if params.lump_sum.is_due(year) {
            lump_sum = params.lump_sum.amount;
            total_contribution += lump_sum;
        }

        // 5. Partner
        let partner_contribution = if events.has_partner {
            taxed_salary * params.life_events.partner_contribution_rate
        } else {
            0.0
        };
        total_contribution += partner_contribution;

        // 6. Home purchase
        let mut home_down_payment = 0.0;
        if events.buys_home {
            home_down_payment = assumptions.home_down_payment;
            state.corpus -= home_down_payment;
            state.owns_home = true;
        }
        state.owns_home |= events.owns_home;

        // 7. Promotion: the bonus is reported with the lump sum but not invested
        if events.promotion {
            state.salary *= 2.0;
            lump_sum += assumptions.promotion_bonus;
        }

        // 8. Unforeseen withdrawal
        let (withdrawal_requested, withdrawal_applied, withdrawal_shortfall) =
            match self.life_events.requested_withdrawal(year, rng) {
                Some(requested) => {
                    let (applied, shortfall) = state.withdraw(requested);
                    (requested, applied, shortfall)
                }
                None => (0.0, 0.0, 0.0),
            };

        // 9. Growth
        let weights = self.allocation.weights_for(year);
        let returns = self.growth.sample_year(rng, weights);
        let growth = apply_growth(state.corpus, total_contribution, &returns);
        let foreign_corpus = state.foreign.advance(
            total_contribution * returns.foreign_weight,
            returns.foreign_rate,
        );
        let fif = calculate_fif_tax(foreign_corpus, params.marginal_tax_rate);

        // 10. Corpus (the withdrawal was taken out in step 8)
        state.corpus += total_contribution + growth.total_growth - fif.amount;

        // 11. Living expenses
        let (salary_change, salary_change_rate) = state.salary_change();
        state.prev_salary = Some(state.salary);
        let inflation_index = (1.0 + params.inflation_rate).powi(year as i32 - 1);
        state.expenses.escalate(year, state.owns_home);
        let expenses = state.expenses.amounts(
            net_salary,
            inflation_index,
            state.owns_home,
            events.child_expense,
        );

        // 12. Record
        let record = AccumulationRecord {
            year,
            age,
            gross_salary: state.salary,
            salary_change,
            salary_change_rate,
            income_tax,
            levy,
            net_salary,
            employee_contribution_rate: employee_rate,
            employer_contribution_rate: employer_rate,
            employee_contribution,
            employer_contribution,
            partner_contribution,
            child_extra_cost,
            lump_sum,
            total_contribution,
            funds: growth.funds,
            total_growth: growth.total_growth,
            foreign_corpus,
            foreign_return_rate: returns.foreign_rate,
            fif_tax: fif.amount,
            fif_tax_rate: fif.rate,
            total_spend: expenses.total(),
            expenses,
            has_partner: events.has_partner,
            has_children: events.has_children,
            owns_home: state.owns_home,
            home_down_payment,
            withdrawal_requested,
            withdrawal_applied,
            withdrawal_shortfall,
            corpus: state.corpus,
        };

        state.salary *= 1.0 + self.salary_hike.sample(rng);
        record
    }
}

/// Build a simulator for `params` and run it once
pub fn simulate_accumulation<R: Rng + ?Sized>(
    params: &AccumulationParameters,
    rng: &mut R,
) -> Result<Vec<AccumulationRecord>> {
    Ok(AccumulationSimulator::new(params)?.run(rng))
}
