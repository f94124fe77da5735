use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Statutory ceiling on the employer's matching contribution rate
pub const EMPLOYER_MATCH_CEILING: f64 = 0.03;

/// One entry of a [`StepSchedule`]: `value` applies from `from_year` onwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub from_year: u32,
    pub value: f64,
}

/// Piecewise-constant lookup table over simulation years.
///
/// Steps are sorted by `from_year`; a year before the first step resolves to
/// the first step's value.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSchedule {
    steps: Vec<Step>,
}

impl StepSchedule {
    #[must_use]
    pub fn new(mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.from_year);
        Self { steps }
    }

    #[must_use]
    pub fn value_at(&self, year: u32) -> f64 {
        let idx = self.steps.partition_point(|s| s.from_year <= year);
        self.steps
            .get(idx.saturating_sub(1))
            .map_or(0.0, |s| s.value)
    }
}

/// Employee contribution rate that steps up on a fixed interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionSchedule {
    pub start_rate: f64,
    pub increase_step: f64,
    pub increase_interval_years: u32,
    pub max_rate: f64,
    pub employer_match_cap: f64,
}

impl Default for ContributionSchedule {
    fn default() -> Self {
        Self {
            start_rate: 0.06,
            increase_step: 0.01,
            increase_interval_years: 3,
            max_rate: 0.15,
            employer_match_cap: EMPLOYER_MATCH_CEILING,
        }
    }
}

impl ContributionSchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.increase_interval_years == 0 {
            return Err(ConfigError::ZeroContributionInterval);
        }
        if self.max_rate < self.start_rate {
            return Err(ConfigError::ContributionCapBelowStart {
                start_rate: self.start_rate,
                max_rate: self.max_rate,
            });
        }
        Ok(())
    }

    /// Employee rate in `year` before compiling: `min(start + k * step, max)`
    /// with `k = (year - 1) / interval`
    #[must_use]
    pub fn rate_for(&self, year: u32) -> f64 {
        let interval = self.increase_interval_years.max(1);
        let steps_taken = year.saturating_sub(1) / interval;
        (self.start_rate + f64::from(steps_taken) * self.increase_step).min(self.max_rate)
    }

    /// Employer match for a given employee rate
    #[must_use]
    pub fn employer_rate(&self, employee_rate: f64) -> f64 {
        self.employer_match_cap
            .min(EMPLOYER_MATCH_CEILING)
            .min(employee_rate)
    }

    /// Lookup table of the employee rate for years `1..=years`
    #[must_use]
    pub fn compile(&self, years: u32) -> StepSchedule {
        let interval = self.increase_interval_years.max(1);
        let steps = (1..=years.max(1))
            .step_by(interval as usize)
            .map(|from_year| Step {
                from_year,
                value: self.rate_for(from_year),
            })
            .collect();
        StepSchedule::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_steps_every_three_years() {
        let table = ContributionSchedule::default().compile(35);
        assert!((table.value_at(1) - 0.06).abs() < 1e-12);
        assert!((table.value_at(3) - 0.06).abs() < 1e-12);
        assert!((table.value_at(4) - 0.07).abs() < 1e-12);
        assert!((table.value_at(10) - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_rate_is_monotone_and_capped() {
        let schedule = ContributionSchedule {
            start_rate: 0.04,
            increase_step: 0.02,
            increase_interval_years: 1,
            max_rate: 0.10,
            ..Default::default()
        };
        let table = schedule.compile(60);
        let mut previous = 0.0;
        for year in 1..=60 {
            let rate = table.value_at(year);
            assert!(rate >= previous);
            assert!(rate <= 0.10 + 1e-12);
            previous = rate;
        }
        assert!((table.value_at(60) - 0.10).abs() < 1e-12);
        // Years past the compiled horizon keep the last step
        assert!((table.value_at(500) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_table_matches_closed_form() {
        let schedule = ContributionSchedule::default();
        let table = schedule.compile(40);
        for year in 1..=40 {
            assert_eq!(table.value_at(year), schedule.rate_for(year));
        }
    }

    #[test]
    fn test_employer_match_is_capped_at_three_percent() {
        let schedule = ContributionSchedule::default();
        assert_eq!(schedule.employer_rate(0.02), 0.02);
        assert_eq!(schedule.employer_rate(0.06), 0.03);
        assert_eq!(schedule.employer_rate(0.15), 0.03);

        let generous = ContributionSchedule {
            employer_match_cap: 0.08,
            ..Default::default()
        };
        assert_eq!(generous.employer_rate(0.15), 0.03);
    }

    #[test]
    fn test_validate() {
        let zero = ContributionSchedule {
            increase_interval_years: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroContributionInterval));

        let inverted = ContributionSchedule {
            start_rate: 0.2,
            max_rate: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::ContributionCapBelowStart { .. })
        ));
    }

    #[test]
    fn test_year_before_first_step() {
        let table = StepSchedule::new(vec![Step {
            from_year: 3,
            value: 0.5,
        }]);
        assert_eq!(table.value_at(1), 0.5);
        assert_eq!(StepSchedule::new(vec![]).value_at(1), 0.0);
    }
}
