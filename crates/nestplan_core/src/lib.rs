//! Retirement savings simulation library
//!
//! This crate projects a savings plan through two linked stochastic
//! simulations:
//! - Accumulation over the working years: salary, New Zealand style income
//!   tax and levy, stepped contributions with an employer match, life events,
//!   per-fund growth and foreign investment fund (FIF) tax
//! - Drawdown over the retirement years: an inflation-indexed lifestyle
//!   target net of government support, paid from a corpus earning one
//!   aggregate return
//!
//! Every run takes an injected random source, so a seed reproduces it
//! exactly. Monte Carlo batches fan independent trials out over rayon.
//!
//! ```ignore
//! use nestplan_core::config::LifecycleParameters;
//! use nestplan_core::simulation::simulate_lifecycle;
//!
//! let result = simulate_lifecycle(&LifecycleParameters::default(), 42)?;
//! println!("corpus at retirement: {:.0}", result.retirement_corpus());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod accumulation;
pub mod drawdown;
pub mod error;
pub mod growth;
pub mod life_events;
pub mod simulation;
pub mod simulation_state;
pub mod taxes;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use accumulation::{AccumulationSimulator, simulate_accumulation};
pub use config::{
    AccumulationParameters, DrawdownParameters, LifecycleParameters, RetirementAssumptions,
};
pub use drawdown::{DrawdownSimulator, simulate_drawdown};
pub use error::{ConfigError, MarketError, SimulationError};
pub use simulation::{LifecycleSimulator, monte_carlo_simulate, simulate_lifecycle};
