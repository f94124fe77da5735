//! Life-event configuration: partner, children, home purchase, promotion and
//! unplanned withdrawals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a life event's onset is decided.
///
/// `Auto` draws the onset year at random when a run starts; `Forced` pins
/// the event on (`true`) or off (`false`). Serialised as `auto`, `yes`, `no`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LifeEventMode {
    #[default]
    Auto,
    Forced(bool),
}

impl LifeEventMode {
    pub const YES: LifeEventMode = LifeEventMode::Forced(true);
    pub const NO: LifeEventMode = LifeEventMode::Forced(false);
}

impl fmt::Display for LifeEventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeEventMode::Auto => write!(f, "auto"),
            LifeEventMode::Forced(true) => write!(f, "yes"),
            LifeEventMode::Forced(false) => write!(f, "no"),
        }
    }
}

impl FromStr for LifeEventMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(LifeEventMode::Auto),
            "yes" | "true" => Ok(LifeEventMode::YES),
            "no" | "false" => Ok(LifeEventMode::NO),
            other => Err(format!(
                "unknown life event mode {other:?}, expected auto, yes or no"
            )),
        }
    }
}

impl TryFrom<String> for LifeEventMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LifeEventMode> for String {
    fn from(mode: LifeEventMode) -> Self {
        mode.to_string()
    }
}

/// An unplanned withdrawal from the corpus.
///
/// `amount: None` draws a random amount from
/// [`LifeEventAssumptions::random_withdrawal_range`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl WithdrawalRequest {
    #[must_use]
    pub const fn fixed(year: u32, amount: f64) -> Self {
        Self {
            year,
            amount: Some(amount),
        }
    }

    #[must_use]
    pub const fn random(year: u32) -> Self {
        Self { year, amount: None }
    }
}

/// Constants governing the stochastic life-event model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeEventAssumptions {
    /// Per-year probability of meeting a partner during the auto window
    pub partner_probability: f64,
    /// Number of leading years in which a partner may appear
    pub partner_window_years: u32,
    pub home_auto_first_year: u32,
    pub home_auto_last_year: u32,
    pub home_forced_year: u32,
    pub home_down_payment: f64,
    pub child_duration_years: u32,
    pub child_base_cost: f64,
    /// Mean of the Poisson-distributed extra cost charged each year with children
    pub child_extra_cost_mean: f64,
    /// Share of the extra child cost taken out of the year's contribution
    pub child_contribution_offset: f64,
    pub promotion_bonus: f64,
    /// Half-open `[min, max)` range for withdrawals without an explicit amount
    pub random_withdrawal_range: (u32, u32),
}

impl Default for LifeEventAssumptions {
    fn default() -> Self {
        Self {
            partner_probability: 0.4,
            partner_window_years: 5,
            home_auto_first_year: 6,
            home_auto_last_year: 11,
            home_forced_year: 10,
            home_down_payment: 60_000.0,
            child_duration_years: 18,
            child_base_cost: 12_000.0,
            child_extra_cost_mean: 1_500.0,
            child_contribution_offset: 0.10,
            promotion_bonus: 10_000.0,
            random_withdrawal_range: (10_000, 20_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeEventConfig {
    pub partner: LifeEventMode,
    pub children: LifeEventMode,
    pub home: LifeEventMode,
    /// Share of the earner's gross salary the partner adds to contributions
    pub partner_contribution_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_year: Option<u32>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub assumptions: LifeEventAssumptions,
}

impl Default for LifeEventConfig {
    fn default() -> Self {
        Self {
            partner: LifeEventMode::Auto,
            children: LifeEventMode::Auto,
            home: LifeEventMode::Auto,
            partner_contribution_rate: 0.03,
            promotion_year: None,
            withdrawals: vec![],
            assumptions: LifeEventAssumptions::default(),
        }
    }
}

impl LifeEventConfig {
    /// Every event forced off, no promotion, no withdrawals
    #[must_use]
    pub fn none() -> Self {
        Self {
            partner: LifeEventMode::NO,
            children: LifeEventMode::NO,
            home: LifeEventMode::NO,
            ..Default::default()
        }
    }
}
