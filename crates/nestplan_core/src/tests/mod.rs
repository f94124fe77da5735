//! Integration tests for the nestplan simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - End-to-end accumulation and drawdown scenarios
//! - `invariants` - Properties that must hold across seeds and schedules
//! - `lifecycle` - Chaining accumulation into drawdown
//! - `monte_carlo` - Seeded fan-out, progress and cancellation

mod invariants;
mod scenarios;
