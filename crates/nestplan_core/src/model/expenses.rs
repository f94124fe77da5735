//! Category-wise living expenses during the working years.
//!
//! Each category is a fraction of net salary. The fractions ("bases") escalate
//! on fixed cadences and compound; the resulting amount is further indexed by
//! general inflation.

use serde::{Deserialize, Serialize};

/// Starting fractions of net salary and their escalation steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivingExpenseProfile {
    pub housing: f64,
    pub groceries: f64,
    pub travel: f64,
    pub utilities: f64,
    pub insurance: f64,
    pub leisure: f64,
    pub misc: f64,
    /// Housing step applied every second year while renting
    pub housing_step_2y: f64,
    /// Housing step applied every fifth year while renting
    pub housing_step_5y: f64,
    /// Step applied to every non-housing category every fifth year
    pub lifestyle_step_5y: f64,
}

impl Default for LivingExpenseProfile {
    fn default() -> Self {
        Self {
            housing: 0.25,
            groceries: 0.15,
            travel: 0.10,
            utilities: 0.05,
            insurance: 0.05,
            leisure: 0.10,
            misc: 0.05,
            housing_step_2y: 0.10,
            housing_step_5y: 0.15,
            lifestyle_step_5y: 0.12,
        }
    }
}

/// One year's spending, split by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LivingExpenses {
    pub housing: f64,
    pub groceries: f64,
    pub travel: f64,
    pub utilities: f64,
    pub insurance: f64,
    pub leisure: f64,
    pub misc: f64,
    pub dependents: f64,
}

impl LivingExpenses {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.housing
            + self.groceries
            + self.travel
            + self.utilities
            + self.insurance
            + self.leisure
            + self.misc
            + self.dependents
    }
}

/// Running expense fractions for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBases {
    housing: f64,
    groceries: f64,
    travel: f64,
    utilities: f64,
    insurance: f64,
    leisure: f64,
    misc: f64,
    housing_step_2y: f64,
    housing_step_5y: f64,
    lifestyle_step_5y: f64,
}

impl ExpenseBases {
    #[must_use]
    pub fn new(profile: &LivingExpenseProfile) -> Self {
        Self {
            housing: profile.housing,
            groceries: profile.groceries,
            travel: profile.travel,
            utilities: profile.utilities,
            insurance: profile.insurance,
            leisure: profile.leisure,
            misc: profile.misc,
            housing_step_2y: profile.housing_step_2y,
            housing_step_5y: profile.housing_step_5y,
            lifestyle_step_5y: profile.lifestyle_step_5y,
        }
    }

    /// Apply this year's escalations. Housing only escalates while renting.
    pub fn escalate(&mut self, year: u32, owns_home: bool) {
        if !owns_home {
            if year % 2 == 0 {
                self.housing *= 1.0 + self.housing_step_2y;
            }
            if year % 5 == 0 {
                self.housing *= 1.0 + self.housing_step_5y;
            }
        }

        if year % 5 == 0 {
            let step = 1.0 + self.lifestyle_step_5y;
            self.groceries *= step;
            self.travel *= step;
            self.utilities *= step;
            self.insurance *= step;
            self.leisure *= step;
            self.misc *= step;
        }
    }

    /// Amounts for the year from the current bases
    #[must_use]
    pub fn amounts(
        &self,
        net_salary: f64,
        inflation_index: f64,
        owns_home: bool,
        dependents: f64,
    ) -> LivingExpenses {
        let scale = net_salary * inflation_index;
        LivingExpenses {
            housing: if owns_home { 0.0 } else { scale * self.housing },
            groceries: scale * self.groceries,
            travel: scale * self.travel,
            utilities: scale * self.utilities,
            insurance: scale * self.insurance,
            leisure: scale * self.leisure,
            misc: scale * self.misc,
            dependents,
        }
    }
}
