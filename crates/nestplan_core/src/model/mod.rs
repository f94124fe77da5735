mod allocation;
mod contribution;
mod events;
mod expenses;
mod market;
mod records;
mod results;

pub use allocation::{AllocationBlock, AllocationSchedule, Weights, default_allocation, resolve_allocation};
pub use contribution::{ContributionSchedule, EMPLOYER_MATCH_CEILING, Step, StepSchedule};
pub use events::{LifeEventAssumptions, LifeEventConfig, LifeEventMode, WithdrawalRequest};
pub use expenses::{ExpenseBases, LivingExpenseProfile, LivingExpenses};
pub use market::{
    DEFAULT_FOREIGN_FUND, ForeignEquityModel, FundSpec, ReturnProfile, ReturnSampler,
    default_funds,
};
pub use records::{AccumulationRecord, DrawdownRecord, FundFlow, corpus_ratio};
pub use results::{LifecycleResult, MonteCarloConfig, MonteCarloProgress, MonteCarloResult};
