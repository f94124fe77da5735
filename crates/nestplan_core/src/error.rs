use std::fmt;

/// Errors raised while building random samplers from distribution parameters
#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    InvalidDistributionParameters {
        profile_type: &'static str,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
    InvalidProbability {
        label: &'static str,
        probability: f64,
    },
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::InvalidDistributionParameters {
                profile_type,
                mean,
                std_dev,
                reason,
            } => {
                write!(
                    f,
                    "invalid {profile_type} parameters (mean={mean}, std_dev={std_dev}): {reason}"
                )
            }
            MarketError::InvalidProbability { label, probability } => {
                write!(
                    f,
                    "invalid {label} probability {probability}: must be within [0, 1]"
                )
            }
        }
    }
}

impl std::error::Error for MarketError {}

/// Structural problems with a parameter set, detected before a run starts
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroHorizon,
    EmptyAllocation,
    UnsortedAllocation {
        index: usize,
        until_year: u32,
        previous: u32,
    },
    UnknownFund {
        fund: String,
        until_year: u32,
    },
    BracketRateMismatch {
        brackets: usize,
        rates: usize,
    },
    UnsortedBrackets {
        index: usize,
    },
    ZeroLumpSumFrequency,
    ZeroContributionInterval,
    ContributionCapBelowStart {
        start_rate: f64,
        max_rate: f64,
    },
    WithdrawalOutsideHorizon {
        year: u32,
        years: u32,
    },
    PromotionOutsideHorizon {
        year: u32,
        years: u32,
    },
    InvalidWithdrawalRange {
        min: u32,
        max: u32,
    },
    InvalidHomeYearRange {
        first: u32,
        last: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroHorizon => write!(f, "simulation horizon must be at least one year"),
            ConfigError::EmptyAllocation => write!(f, "at least one allocation block is required"),
            ConfigError::UnsortedAllocation {
                index,
                until_year,
                previous,
            } => write!(
                f,
                "allocation block {index} ends in year {until_year}, before the previous block's year {previous}"
            ),
            ConfigError::UnknownFund { fund, until_year } => write!(
                f,
                "allocation block ending in year {until_year} references unknown fund {fund:?}"
            ),
            ConfigError::BracketRateMismatch { brackets, rates } => write!(
                f,
                "{brackets} tax brackets but {rates} marginal rates were supplied"
            ),
            ConfigError::UnsortedBrackets { index } => {
                write!(f, "tax bracket {index} is not in ascending order")
            }
            ConfigError::ZeroLumpSumFrequency => {
                write!(f, "lump-sum frequency must be at least one year")
            }
            ConfigError::ZeroContributionInterval => {
                write!(f, "contribution increase interval must be at least one year")
            }
            ConfigError::ContributionCapBelowStart {
                start_rate,
                max_rate,
            } => write!(
                f,
                "contribution cap {max_rate} is below the starting rate {start_rate}"
            ),
            ConfigError::WithdrawalOutsideHorizon { year, years } => write!(
                f,
                "unforeseen withdrawal in year {year} is outside the {years}-year horizon"
            ),
            ConfigError::PromotionOutsideHorizon { year, years } => write!(
                f,
                "promotion year {year} is outside the {years}-year horizon"
            ),
            ConfigError::InvalidWithdrawalRange { min, max } => {
                write!(f, "random withdrawal range [{min}, {max}) is empty")
            }
            ConfigError::InvalidHomeYearRange { first, last } => {
                write!(f, "home purchase range {first}..={last} is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error returned by the simulation entry points
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Market(MarketError),
    /// Monte Carlo batch was cancelled between trials
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Market(e) => write!(f, "{e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Market(e) => Some(e),
            SimulationError::Cancelled => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

impl From<MarketError> for SimulationError {
    fn from(err: MarketError) -> Self {
        SimulationError::Market(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
