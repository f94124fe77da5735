use rand::{Rng, distr::Distribution};
use rand_distr::{LogNormal, Normal};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// Annual rate distribution for a fund, a salary hike or a portfolio.
///
/// Profiles are plain data; call [`ReturnProfile::sampler`] once before a run
/// so bad parameters are reported up front rather than mid-simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReturnProfile {
    #[default]
    None,
    Fixed { rate: f64 },
    Normal { mean: f64, std_dev: f64 },
    LogNormal { mean: f64, std_dev: f64 },
}

impl ReturnProfile {
    #[must_use]
    pub const fn normal(mean: f64, std_dev: f64) -> Self {
        ReturnProfile::Normal { mean, std_dev }
    }

    /// Build a validated sampler for this profile
    pub fn sampler(&self, profile_type: &'static str) -> Result<ReturnSampler, MarketError> {
        match *self {
            ReturnProfile::None => Ok(ReturnSampler::Fixed(0.0)),
            ReturnProfile::Fixed { rate } => Ok(ReturnSampler::Fixed(rate)),
            ReturnProfile::Normal { mean, std_dev } => {
                check_std_dev(profile_type, mean, std_dev)?;
                Normal::new(mean, std_dev)
                    .map(ReturnSampler::Normal)
                    .map_err(|_| invalid_parameters(profile_type, mean, std_dev))
            }
            ReturnProfile::LogNormal { mean, std_dev } => {
                check_std_dev(profile_type, mean, std_dev)?;
                LogNormal::new(mean, std_dev)
                    .map(ReturnSampler::LogNormal)
                    .map_err(|_| invalid_parameters(profile_type, mean, std_dev))
            }
        }
    }
}

/// rand_distr only rejects a non-finite std_dev, so the sign is checked here
fn check_std_dev(profile_type: &'static str, mean: f64, std_dev: f64) -> Result<(), MarketError> {
    if std_dev >= 0.0 && std_dev.is_finite() {
        Ok(())
    } else {
        Err(invalid_parameters(profile_type, mean, std_dev))
    }
}

fn invalid_parameters(profile_type: &'static str, mean: f64, std_dev: f64) -> MarketError {
    MarketError::InvalidDistributionParameters {
        profile_type,
        mean,
        std_dev,
        reason: "std_dev must be non-negative and finite",
    }
}

/// Prebuilt distribution for a [`ReturnProfile`]
#[derive(Debug, Clone)]
pub enum ReturnSampler {
    Fixed(f64),
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
}

impl ReturnSampler {
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ReturnSampler::Fixed(rate) => *rate,
            ReturnSampler::Normal(d) => d.sample(rng),
            ReturnSampler::LogNormal(d) => d.sample(rng) - 1.0,
        }
    }
}

/// An investable fund and its annual return distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSpec {
    pub name: String,
    pub returns: ReturnProfile,
}

impl FundSpec {
    pub fn normal(name: impl Into<String>, mean: f64, std_dev: f64) -> Self {
        Self {
            name: name.into(),
            returns: ReturnProfile::normal(mean, std_dev),
        }
    }
}

/// Default fund line-up: three domestic multi-asset funds, foreign equities
/// and a crypto sleeve
#[must_use]
pub fn default_funds() -> Vec<FundSpec> {
    vec![
        FundSpec::normal("Harboursafe", 0.0375, 0.05),
        FundSpec::normal("Horizon", 0.065, 0.105),
        FundSpec::normal("SkyHigh", 0.1025, 0.2075),
        FundSpec::normal(
            DEFAULT_FOREIGN_FUND,
            0.15,
            (0.15_f64.powi(2) + 0.02_f64.powi(2)).sqrt(),
        ),
        FundSpec::normal("Bitcoin", 0.20, 0.60),
    ]
}

pub const DEFAULT_FOREIGN_FUND: &str = "Foreign_Equities";

/// Compound return model for the foreign-equities fund.
///
/// Each year the fund's realised rate is `(1 + base) * (1 + currency) - 1`,
/// replacing whatever its own [`FundSpec`] profile would have produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignEquityModel {
    pub fund: String,
    pub base: ReturnProfile,
    pub currency: ReturnProfile,
}

impl Default for ForeignEquityModel {
    fn default() -> Self {
        Self {
            fund: DEFAULT_FOREIGN_FUND.to_string(),
            base: ReturnProfile::normal(0.12, 0.15),
            currency: ReturnProfile::normal(0.03, 0.02),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_negative_std_dev_is_rejected() {
        let err = ReturnProfile::normal(0.05, -0.1)
            .sampler("fund return")
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::InvalidDistributionParameters {
                profile_type: "fund return",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_and_nan_std_dev_rejected_for_lognormal() {
        for std_dev in [-0.01, f64::NAN, f64::INFINITY] {
            let profile = ReturnProfile::LogNormal {
                mean: 0.05,
                std_dev,
            };
            assert!(profile.sampler("fund return").is_err());
        }
        assert!(ReturnProfile::normal(0.05, f64::NAN).sampler("fund return").is_err());
    }

    #[test]
    fn test_zero_std_dev_is_deterministic() {
        let sampler = ReturnProfile::normal(0.07, 0.0).sampler("test").unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sampler.sample(&mut rng), 0.07);
        }
    }

    #[test]
    fn test_fixed_and_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        let fixed = ReturnProfile::Fixed { rate: 0.04 }.sampler("test").unwrap();
        let none = ReturnProfile::None.sampler("test").unwrap();
        assert_eq!(fixed.sample(&mut rng), 0.04);
        assert_eq!(none.sample(&mut rng), 0.0);
    }

    #[test]
    fn test_profile_serde_is_tagged() {
        let json = serde_json::to_string(&ReturnProfile::normal(0.1, 0.2)).unwrap();
        assert_eq!(json, r#"{"type":"Normal","mean":0.1,"std_dev":0.2}"#);
        let back: ReturnProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReturnProfile::normal(0.1, 0.2));
    }
}
