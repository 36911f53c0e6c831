//! flows.rs
//! Cash-flow kernels: one-off transfers, compound growth and salary net pay.
//!
//! Every kernel returns a curve in local time (days since its occurrence); the
//! caller places it on the plan timeline with `shift` or `repeat`.

use super::error::{ensure_finite, KernelError};
use super::DAYS_PER_YEAR;
use crate::curve::{step, Curve};
use crate::params::Amend;

/// `amount * step(t)`
pub fn inflow(amount: f64) -> Result<Curve, KernelError> {
    let amount = ensure_finite(amount, "inflow amount")?;
    Ok(Curve::new(move |t| amount * step(t)))
}

/// `-amount * step(t)`
pub fn outflow(amount: f64) -> Result<Curve, KernelError> {
    let amount = ensure_finite(amount, "outflow amount")?;
    Ok(Curve::new(move |t| -amount * step(t)))
}

/// Annual-equivalent growth factor after `t` days: `(1 + r)^(t / 365)`.
#[inline(always)]
pub fn growth_factor(annual_rate: f64, t: f64) -> f64 {
    (1.0 + annual_rate).powf(t / DAYS_PER_YEAR)
}

/// `principal * (1 + annual_rate)^(t / 365)` for `t >= 0`.
pub fn compound(principal: f64, annual_rate: f64) -> Result<Curve, KernelError> {
    let principal = ensure_finite(principal, "principal")?;
    let annual_rate = ensure_finite(annual_rate, "annual rate")?;
    if annual_rate <= -1.0 {
        return Err(KernelError::NonFinite { what: "growth rate at or below -100%" });
    }
    Ok(Curve::new(move |t| principal * growth_factor(annual_rate, t) * step(t)))
}

/// Frozen salary terms for a single paycheck.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryParams {
    pub salary: f64,
    /// Paychecks per year.
    pub periods: f64,
    pub federal_rate: f64,
    pub state_rate: f64,
    pub social_security_rate: f64,
    pub medicare_rate: f64,
    pub retirement_rate: f64,
}

/// A raise or a contribution change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryPatch {
    pub salary: Option<f64>,
    pub retirement_rate: Option<f64>,
}

impl Amend for SalaryParams {
    type Patch = SalaryPatch;

    fn amend(&mut self, patch: &SalaryPatch) {
        if let Some(s) = patch.salary {
            self.salary = s;
        }
        if let Some(r) = patch.retirement_rate {
            self.retirement_rate = r;
        }
    }
}

impl SalaryParams {
    pub fn gross_pay(&self) -> f64 {
        self.salary / self.periods
    }

    /// `(salary / periods) * (1 - (federal + state + ss + medicare + 401k))`
    pub fn net_pay(&self) -> f64 {
        let deductions = self.federal_rate
            + self.state_rate
            + self.social_security_rate
            + self.medicare_rate
            + self.retirement_rate;
        self.gross_pay() * (1.0 - deductions)
    }

    /// The retirement share withheld from one paycheck.
    pub fn retirement_deposit(&self) -> f64 {
        self.gross_pay() * self.retirement_rate
    }

    /// Pay interval in days.
    pub fn interval_days(&self) -> f64 {
        DAYS_PER_YEAR / self.periods
    }

    pub fn check(&self) -> Result<(), KernelError> {
        ensure_finite(self.salary, "salary")?;
        for (v, what) in [
            (self.federal_rate, "federal income tax"),
            (self.state_rate, "state income tax"),
            (self.social_security_rate, "social security tax"),
            (self.medicare_rate, "medicare tax"),
            (self.retirement_rate, "401k contribution"),
        ] {
            ensure_finite(v, what)?;
        }
        if !self.periods.is_finite() || self.periods <= 0.0 {
            return Err(KernelError::InvalidInterval { interval: DAYS_PER_YEAR / self.periods });
        }
        Ok(())
    }
}

/// One paycheck of net pay, deposited on the pay day.
pub fn net_paycheck(params: &SalaryParams) -> Result<Curve, KernelError> {
    params.check()?;
    inflow(params.net_pay())
}
