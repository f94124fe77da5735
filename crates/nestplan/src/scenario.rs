//! Scenario files
//!
//! A scenario is a YAML document with four optional sections:
//!
//! ```yaml
//! person:
//!   birth_date: 1995-03-14
//!   as_of: 2025-07-01
//! accumulation:
//!   initial_salary: 85000.0
//!   years: 30
//! retirement:
//!   years: 25
//! monte_carlo:
//!   iterations: 2000
//!   seed: 42
//! ```
//!
//! Anything left out takes the engine defaults. When `person.birth_date` is
//! set it overrides `accumulation.start_age`.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, eyre};
use jiff::civil::Date;
use nestplan_core::config::{AccumulationParameters, LifecycleParameters, RetirementAssumptions};
use nestplan_core::model::MonteCarloConfig;
use serde::{Deserialize, Serialize};

/// Who the plan is for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    /// Date the plan starts; defaults to today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<Date>,
}

impl PersonData {
    /// Completed years between `birth_date` and `as_of` (or `today`)
    #[must_use]
    pub fn age(&self, today: Date) -> Option<u32> {
        let birth = self.birth_date?;
        let start = self.as_of.unwrap_or(today);
        let years = i32::from(start.year()) - i32::from(birth.year());

        let age = if start.month() < birth.month()
            || (start.month() == birth.month() && start.day() < birth.day())
        {
            years - 1
        } else {
            years
        };
        u32::try_from(age).ok()
    }
}

/// A complete scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub person: PersonData,
    pub accumulation: AccumulationParameters,
    pub retirement: RetirementAssumptions,
    pub monte_carlo: MonteCarloConfig,
}

impl Scenario {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read scenario {}", path.display()))?;
        let scenario = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse scenario {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded scenario");
        Ok(scenario)
    }

    pub fn save(&self, path: &Path) -> color_eyre::Result<()> {
        let yaml = self.to_yaml().wrap_err("Failed to serialize scenario")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, yaml)
            .wrap_err_with(|| format!("Failed to write scenario {}", path.display()))?;
        Ok(())
    }

    /// Engine parameters, with the start age taken from the birth date when given
    pub fn to_parameters(&self, today: Date) -> color_eyre::Result<LifecycleParameters> {
        let mut accumulation = self.accumulation.clone();
        if self.person.birth_date.is_some() {
            accumulation.start_age = self
                .person
                .age(today)
                .ok_or_else(|| eyre!("birth_date is after the plan start date"))?;
        }

        let params = LifecycleParameters {
            accumulation,
            retirement: self.retirement.clone(),
        };
        params.validate().wrap_err("Invalid scenario")?;
        Ok(params)
    }
}
