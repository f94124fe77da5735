//! Command line front end for the nestplan retirement simulator
//!
//! Scenarios are YAML files; results are written as JSON or YAML. The
//! simulation itself lives in `nestplan_core`.

pub mod logging;
pub mod output;
pub mod report;
pub mod runner;
pub mod scenario;

pub use logging::init_logging;
pub use output::{OutputFormat, write_output};
pub use report::{MonteCarloReport, PercentileSummary};
pub use runner::run_monte_carlo;
pub use scenario::{PersonData, Scenario};
