//! Compound-growth projection.
//!
//! Accrues a starting deposit plus periodic contributions year by year and
//! records the running principal and balance after each year.

use crate::domain::error::CompounderError;
use crate::domain::frequency::Frequency;
use chrono::Datelike;

/// Label of the point recorded before any accrual.
pub const NOW_LABEL: &str = "Now";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParameters {
    pub initial_deposit: f64,
    pub years: u32,
    pub annual_rate_percent: f64,
    pub compound_frequency: Frequency,
    pub contribution_amount: f64,
    pub contribution_frequency: Frequency,
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        Self {
            initial_deposit: 5000.0,
            years: 10,
            annual_rate_percent: 10.0,
            compound_frequency: Frequency::Monthly,
            contribution_amount: 100.0,
            contribution_frequency: Frequency::Monthly,
        }
    }
}

impl ProjectionParameters {
    /// Reject amounts outside the calculator's domain.
    pub fn validate(&self) -> Result<(), CompounderError> {
        if !self.initial_deposit.is_finite() || self.initial_deposit < 0.0 {
            return Err(CompounderError::invalid_input(
                "initial_deposit",
                "initial deposit must be a non-negative number",
            ));
        }
        if !self.contribution_amount.is_finite() || self.contribution_amount < 0.0 {
            return Err(CompounderError::invalid_input(
                "contribution_amount",
                "contribution amount must be a non-negative number",
            ));
        }
        if !self.annual_rate_percent.is_finite() {
            return Err(CompounderError::invalid_input(
                "annual_rate_percent",
                "rate of return must be a finite number",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPoint {
    pub year_index: u32,
    pub label: String,
    pub principal_contributed: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub points: Vec<ProjectionPoint>,
    pub final_balance: f64,
}

impl ProjectionResult {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn principal_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.principal_contributed).collect()
    }

    pub fn balance_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.total_balance).collect()
    }

    pub fn final_principal(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.principal_contributed)
            .unwrap_or(0.0)
    }

    /// Growth beyond what was paid in. Negative when the rate is.
    pub fn interest_earned(&self) -> f64 {
        self.final_balance - self.final_principal()
    }
}

/// The local calendar year, for front ends that label from today.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Project `params.years` years of growth. Point `n` (n > 0) is labelled
/// `base_year + n`.
pub fn project(params: &ProjectionParameters, base_year: i32) -> ProjectionResult {
    let mut balance = params.initial_deposit;
    let mut principal = params.initial_deposit;

    let monthly_rate = params.annual_rate_percent / 100.0 / 12.0;
    let annual_rate = params.annual_rate_percent / 100.0;
    let contribution = params.contribution_amount;

    let mut points = Vec::with_capacity(params.years as usize + 1);
    points.push(ProjectionPoint {
        year_index: 0,
        label: NOW_LABEL.to_string(),
        principal_contributed: principal,
        total_balance: balance,
    });

    for year_index in 1..=params.years {
        match params.compound_frequency {
            Frequency::Monthly => {
                for _month in 0..12 {
                    balance *= 1.0 + monthly_rate;
                    if params.contribution_frequency == Frequency::Monthly {
                        balance += contribution;
                        principal += contribution;
                    }
                }
                if params.contribution_frequency == Frequency::Annually {
                    balance += contribution;
                    principal += contribution;
                }
            }
            Frequency::Annually => {
                balance *= 1.0 + annual_rate;
                // Monthly contributions are batched into one yearly deposit.
                let yearly = contribution * params.contribution_frequency.periods_per_year() as f64;
                balance += yearly;
                principal += yearly;
            }
        }

        points.push(ProjectionPoint {
            year_index,
            label: (base_year + year_index as i32).to_string(),
            principal_contributed: principal,
            total_balance: balance,
        });
    }

    ProjectionResult {
        points,
        final_balance: balance,
    }
}
