//! valuation.rs
//! Asset valuation (appreciation / depreciation) and loan-backed equity.

use super::error::{ensure_finite, KernelError};
use super::flows::growth_factor;
use super::loan::LoanTerms;
use super::DAYS_PER_MONTH;
use crate::curve::{Curve, Day};
use crate::params::{Amend, ParamFn};

/// Value of an asset on the plan timeline: `value * (1 + g)^((t - anchor) / 365)`.
///
/// `g` is positive for appreciation and negative for depreciation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetValuation {
    pub value: f64,
    pub annual_growth: f64,
    pub anchor: Day,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValuationPatch {
    /// Re-anchors the curve at an appraised value.
    Appraisal { value: f64, at: Day },
    /// New growth rate from `at` on. The value is continuous at `at`.
    RateChange { annual_growth: f64, at: Day },
    /// Tracked value drops to 0.
    Sold,
}

impl Amend for AssetValuation {
    type Patch = ValuationPatch;

    fn amend(&mut self, patch: &ValuationPatch) {
        match *patch {
            ValuationPatch::Appraisal { value, at } => {
                self.value = value;
                self.anchor = at;
            }
            ValuationPatch::RateChange { annual_growth, at } => {
                self.value = self.value_at(at);
                self.anchor = at;
                self.annual_growth = annual_growth;
            }
            ValuationPatch::Sold => self.value = 0.0,
        }
    }
}

impl AssetValuation {
    pub fn appreciating(value: f64, rate: f64, anchor: Day) -> Result<Self, KernelError> {
        Self::checked(value, rate, anchor)
    }

    pub fn depreciating(value: f64, rate: f64, anchor: Day) -> Result<Self, KernelError> {
        Self::checked(value, -rate, anchor)
    }

    fn checked(value: f64, annual_growth: f64, anchor: Day) -> Result<Self, KernelError> {
        ensure_finite(value, "asset value")?;
        ensure_finite(annual_growth, "asset growth rate")?;
        ensure_finite(anchor, "valuation day")?;
        if annual_growth <= -1.0 {
            return Err(KernelError::NonFinite { what: "depreciation rate at or above 100%" });
        }
        Ok(Self { value, annual_growth, anchor })
    }

    #[inline]
    pub fn value_at(&self, t: Day) -> f64 {
        if self.value == 0.0 {
            return 0.0;
        }
        self.value * growth_factor(self.annual_growth, t - self.anchor)
    }
}

/// Asset value minus the outstanding loan, from the purchase day on.
#[derive(Debug, Clone)]
pub struct Equity {
    purchase_day: Day,
    valuation: ParamFn<AssetValuation>,
    loan: LoanTerms,
    /// (day, amount), ascending by day.
    prepayments: Vec<(Day, f64)>,
}

impl Equity {
    pub fn new(purchase_day: Day, valuation: ParamFn<AssetValuation>, loan: LoanTerms) -> Self {
        Self { purchase_day, valuation, loan, prepayments: Vec::new() }
    }

    pub fn valuation(&self) -> &ParamFn<AssetValuation> {
        &self.valuation
    }

    pub fn valuation_mut(&mut self) -> &mut ParamFn<AssetValuation> {
        &mut self.valuation
    }

    pub fn loan(&self) -> &LoanTerms {
        &self.loan
    }

    pub fn purchase_day(&self) -> Day {
        self.purchase_day
    }

    pub fn add_prepayment(&mut self, day: Day, amount: f64) -> Result<(), KernelError> {
        let amount = ensure_finite(amount, "prepayment amount")?;
        let idx = self.prepayments.partition_point(|(d, _)| *d <= day);
        self.prepayments.insert(idx, (day, amount));
        Ok(())
    }

    /// Outstanding loan balance at absolute day `t`.
    pub fn loan_balance(&self, t: Day) -> f64 {
        if t < self.purchase_day {
            return 0.0;
        }
        let k = self.loan.payments_made_by(t - self.purchase_day);
        if k >= self.loan.payments() {
            return 0.0;
        }
        let prepaid: f64 = self
            .prepayments
            .iter()
            .take_while(|(d, _)| *d <= t)
            .map(|(_, a)| a)
            .sum();
        (self.loan.remaining_balance(k) - prepaid).max(0.0)
    }

    /// Scheduled payments actually made. Prepayments can retire the loan early;
    /// the payment that brings the balance to 0 is the last one.
    pub fn payments_due(&self) -> usize {
        if self.prepayments.is_empty() {
            return self.loan.payments();
        }
        (1..=self.loan.payments())
            .find(|&k| self.loan_balance(self.purchase_day + k as f64 * DAYS_PER_MONTH) <= 0.0)
            .unwrap_or(self.loan.payments())
    }

    pub fn asset_value(&self, t: Day) -> f64 {
        if t < self.purchase_day {
            return 0.0;
        }
        self.valuation.at(t).value_at(t)
    }

    pub fn at(&self, t: Day) -> f64 {
        let value = self.asset_value(t);
        if value == 0.0 {
            return 0.0;
        }
        value - self.loan_balance(t)
    }

    /// The equity curve on the plan timeline. Valuation is re-evaluated per
    /// sample so appraisals and a sale are picked up at their own days.
    pub fn into_curve(self) -> Curve {
        Curve::new(move |t| self.at(t))
    }
}
