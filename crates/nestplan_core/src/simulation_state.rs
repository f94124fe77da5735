use crate::growth::ForeignCorpus;
use crate::model::{ExpenseBases, LivingExpenseProfile};

/// Running state of one accumulation run, mutated year by year
#[derive(Debug, Clone)]
pub struct AccumulationState {
    /// Gross salary for the current year
    pub salary: f64,
    /// Gross salary recorded for the previous year
    pub prev_salary: Option<f64>,
    pub corpus: f64,
    pub foreign: ForeignCorpus,
    /// One-way latch, set in the purchase year
    pub owns_home: bool,
    pub expenses: ExpenseBases,
}

impl AccumulationState {
    #[must_use]
    pub fn new(initial_salary: f64, expenses: &LivingExpenseProfile) -> Self {
        Self {
            salary: initial_salary,
            prev_salary: None,
            corpus: 0.0,
            foreign: ForeignCorpus::default(),
            owns_home: false,
            expenses: ExpenseBases::new(expenses),
        }
    }

    /// Change against last year's recorded salary as `(value, rate)`
    #[must_use]
    pub fn salary_change(&self) -> (f64, f64) {
        match self.prev_salary {
            Some(prev) if prev != 0.0 => (self.salary - prev, (self.salary - prev) / prev),
            Some(prev) => (self.salary - prev, 0.0),
            None => (0.0, 0.0),
        }
    }

    /// Cap a requested withdrawal at the available corpus, deduct it, and
    /// return `(applied, shortfall)`. A non-positive corpus pays nothing.
    pub fn withdraw(&mut self, requested: f64) -> (f64, f64) {
        let applied = requested.min(self.corpus).max(0.0);
        self.corpus -= applied;
        (applied, requested - applied)
    }
}
