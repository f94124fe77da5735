//! Income tax, levy and foreign-investment tax calculations
//!
//! Bracket bounds are expressed in year-1 money and indexed forward by
//! inflation before comparison, so the same ladder can be reused for every
//! simulated year.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Foreign corpus value above which the deemed-rate FIF tax applies
pub const FIF_THRESHOLD: f64 = 50_000.0;

/// Deemed annual return taxed under the FIF rules
pub const FIF_DEEMED_RATE: f64 = 0.05;

/// One income band, bounds in year-1 money.
///
/// `upper: None` marks the open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl TaxBracket {
    #[must_use]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    #[must_use]
    pub const fn open(lower: f64) -> Self {
        Self { lower, upper: None }
    }
}

/// Bracket ladder plus the marginal rate paired with each bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    pub brackets: Vec<TaxBracket>,
    pub rates: Vec<f64>,
}

impl Default for TaxConfig {
    /// New Zealand individual income tax ladder
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::new(0.0, 15_600.0),
                TaxBracket::new(15_601.0, 53_500.0),
                TaxBracket::new(53_501.0, 78_100.0),
                TaxBracket::new(78_101.0, 180_000.0),
                TaxBracket::open(180_001.0),
            ],
            rates: vec![0.105, 0.175, 0.30, 0.33, 0.39],
        }
    }
}

impl TaxConfig {
    /// Tax owed on `salary` in simulation `year`
    #[must_use]
    pub fn income_tax(&self, salary: f64, year: u32, inflation: f64) -> f64 {
        calculate_income_tax(salary, &self.brackets, &self.rates, year, inflation)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brackets.len() != self.rates.len() {
            return Err(ConfigError::BracketRateMismatch {
                brackets: self.brackets.len(),
                rates: self.rates.len(),
            });
        }
        for (index, pair) in self.brackets.windows(2).enumerate() {
            if pair[1].lower < pair[0].lower {
                return Err(ConfigError::UnsortedBrackets { index: index + 1 });
            }
        }
        Ok(())
    }
}

/// Multiplier applied to year-1 bracket bounds in `year`
#[must_use]
#[inline]
pub fn bracket_index_factor(year: u32, inflation: f64) -> f64 {
    (1.0 + inflation).powi(year.saturating_sub(1) as i32)
}

/// Calculate income tax using inflation-indexed progressive brackets.
///
/// Brackets are visited in ascending order. A bracket contributes
/// `(min(salary, upper) - lower) * rate` when the salary exceeds its indexed
/// lower bound; the scan stops at the first bracket whose lower bound is not
/// exceeded. Rates beyond the shorter of the two slices are ignored.
#[must_use]
pub fn calculate_income_tax(
    salary: f64,
    brackets: &[TaxBracket],
    rates: &[f64],
    year: u32,
    inflation: f64,
) -> f64 {
    let factor = bracket_index_factor(year, inflation);
    let mut tax = 0.0;

    for (bracket, rate) in brackets.iter().zip(rates) {
        let lower = bracket.lower * factor;
        if salary <= lower {
            break;
        }
        let upper = bracket.upper.map_or(f64::INFINITY, |u| u * factor);
        tax += (salary.min(upper) - lower) * rate;
    }

    tax
}

/// Earner levy charged on gross salary
#[must_use]
#[inline]
pub fn calculate_levy(salary: f64, levy_rate: f64) -> f64 {
    salary * levy_rate
}

/// Foreign-investment-fund tax for one year
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FifTax {
    pub amount: f64,
    /// `amount / foreign_corpus`, zero when the foreign corpus is not positive
    pub rate: f64,
}

/// Deemed-rate tax on the foreign corpus.
///
/// Step function: nothing at or below [`FIF_THRESHOLD`], otherwise
/// `foreign_corpus * FIF_DEEMED_RATE * marginal_rate` on the whole value.
#[must_use]
pub fn calculate_fif_tax(foreign_corpus: f64, marginal_rate: f64) -> FifTax {
    let amount = if foreign_corpus > FIF_THRESHOLD {
        foreign_corpus * FIF_DEEMED_RATE * marginal_rate
    } else {
        0.0
    };
    let rate = if foreign_corpus > 0.0 {
        amount / foreign_corpus
    } else {
        0.0
    };
    FifTax { amount, rate }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz() -> TaxConfig {
        TaxConfig::default()
    }

    #[test]
    fn test_zero_salary_pays_no_tax() {
        assert_eq!(nz().income_tax(0.0, 1, 0.025), 0.0);
    }

    #[test]
    fn test_first_bracket_only() {
        let tax = nz().income_tax(10_000.0, 1, 0.025);
        assert!((tax - 1_050.0).abs() < 1e-9, "Expected 1050, got {tax}");
    }

    #[test]
    fn test_multiple_brackets_year_one() {
        // 15,600 at 10.5% + (53,500 - 15,601) at 17.5% + (70,000 - 53,501) at 30%
        let expected = 15_600.0 * 0.105 + 37_899.0 * 0.175 + 16_499.0 * 0.30;
        let tax = nz().income_tax(70_000.0, 1, 0.025);
        assert!(
            (tax - expected).abs() < 1e-6,
            "Expected {expected}, got {tax}"
        );
    }

    #[test]
    fn test_top_bracket_is_open_ended() {
        let config = nz();
        let a = config.income_tax(1_000_000.0, 1, 0.0);
        let b = config.income_tax(1_000_100.0, 1, 0.0);
        assert!((b - a - 39.0).abs() < 1e-6);
    }

    #[test]
    fn test_tax_is_monotone_in_salary() {
        let config = nz();
        for year in [1, 5, 20] {
            let mut previous = 0.0;
            for step in 0..=400 {
                let salary = f64::from(step) * 1_000.0;
                let tax = config.income_tax(salary, year, 0.025);
                assert!(
                    tax + 1e-9 >= previous,
                    "tax decreased at salary {salary} in year {year}"
                );
                previous = tax;
            }
        }
    }

    #[test]
    fn test_bracket_indexing_is_scale_invariant() {
        let config = nz();
        let inflation = 0.03;
        for year in [2, 10, 30] {
            let factor = bracket_index_factor(year, inflation);
            for salary in [12_000.0, 48_000.0, 95_000.0, 250_000.0] {
                let indexed = config.income_tax(salary, year, inflation);
                let deflated = config.income_tax(salary / factor, 1, inflation) * factor;
                assert!(
                    (indexed - deflated).abs() < 1e-6,
                    "year {year} salary {salary}: {indexed} vs {deflated}"
                );
            }
        }
    }

    #[test]
    fn test_short_circuit_skips_later_brackets() {
        // A later bracket with a lower bound below the salary is never reached
        // once an earlier bound is not exceeded.
        let brackets = [
            TaxBracket::new(0.0, 10_000.0),
            TaxBracket::new(50_000.0, 60_000.0),
            TaxBracket::new(5_000.0, 8_000.0),
        ];
        let rates = [0.1, 0.2, 0.9];
        let tax = calculate_income_tax(20_000.0, &brackets, &rates, 1, 0.0);
        assert!((tax - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_rate_mismatch() {
        let mut config = nz();
        config.rates.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::BracketRateMismatch {
                brackets: 5,
                rates: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_unsorted_brackets() {
        let mut config = nz();
        config.brackets.swap(1, 2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsortedBrackets { index: 2 })
        );
    }

    #[test]
    fn test_fif_tax_threshold() {
        assert_eq!(calculate_fif_tax(50_000.0, 0.30).amount, 0.0);
        assert_eq!(calculate_fif_tax(10_000.0, 0.30).rate, 0.0);
        assert_eq!(calculate_fif_tax(-5_000.0, 0.30), FifTax::default());

        let fif = calculate_fif_tax(100_000.0, 0.30);
        assert!((fif.amount - 1_500.0).abs() < 1e-9);
        assert!((fif.rate - 0.015).abs() < 1e-12);

        let double = calculate_fif_tax(200_000.0, 0.30);
        assert!((double.amount - 2.0 * fif.amount).abs() < 1e-9);
    }

    #[test]
    fn test_levy() {
        assert!((calculate_levy(70_000.0, 0.0167) - 1_169.0).abs() < 1e-9);
    }
}
