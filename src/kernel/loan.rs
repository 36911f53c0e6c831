//! loan.rs
//! Fixed-rate amortization: payment, principal paid, remaining balance and the
//! full schedule.

use super::error::{ensure_finite, KernelError};
use super::DAYS_PER_MONTH;
use crate::curve::{Day, Schedule};
use serde::Serialize;

/// Validated loan terms. Monthly compounding, `N = round(years * 12)` payments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    principal: f64,
    annual_rate: f64,
    payments: usize,
}

/// One row of an amortization schedule. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationEntry {
    pub month: usize,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, years: f64) -> Result<Self, KernelError> {
        let principal = ensure_finite(principal, "loan principal")?;
        let annual_rate = ensure_finite(annual_rate, "loan rate")?;
        let years = ensure_finite(years, "loan term")?;
        if principal < 0.0 {
            return Err(KernelError::NegativePrincipal { principal });
        }
        let payments = (years * 12.0).round();
        if payments < 1.0 {
            return Err(KernelError::NonPositiveTerm { years });
        }
        if annual_rate <= -12.0 {
            return Err(KernelError::NonFinite { what: "loan rate at or below -1200%" });
        }
        Ok(Self { principal, annual_rate, payments: payments as usize })
    }

    pub fn principal(&self) -> f64 { self.principal }
    pub fn annual_rate(&self) -> f64 { self.annual_rate }
    pub fn payments(&self) -> usize { self.payments }

    #[inline(always)]
    fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    /// `L * i(1+i)^N / ((1+i)^N - 1)`, or `L / N` when `i = 0`.
    pub fn monthly_payment(&self) -> f64 {
        let i = self.monthly_rate();
        let n = self.payments as f64;
        if i == 0.0 {
            return self.principal / n;
        }
        let growth = (1.0 + i).powf(n);
        self.principal * i * growth / (growth - 1.0)
    }

    /// `L * ((1+i)^k - 1) / ((1+i)^N - 1)`, `k` clamped to `[0, N]`.
    /// Exactly `L` once `k >= N`.
    pub fn principal_paid_through(&self, k: usize) -> f64 {
        if k == 0 {
            return 0.0;
        }
        if k >= self.payments {
            return self.principal;
        }
        let i = self.monthly_rate();
        if i == 0.0 {
            return self.principal * k as f64 / self.payments as f64;
        }
        let n = self.payments as f64;
        self.principal * ((1.0 + i).powf(k as f64) - 1.0) / ((1.0 + i).powf(n) - 1.0)
    }

    /// Balance after `k` payments, floored at 0.
    pub fn remaining_balance(&self, k: usize) -> f64 {
        (self.principal - self.principal_paid_through(k)).max(0.0)
    }

    /// Payment days in local time: one month after origination, then monthly.
    pub fn payment_schedule(&self) -> Result<Schedule, KernelError> {
        Schedule::with_count(DAYS_PER_MONTH, DAYS_PER_MONTH, self.payments)
    }

    /// Number of payments made by local day `t`.
    pub fn payments_made_by(&self, t: Day) -> usize {
        // `t / month` counts the payment falling exactly on `t`.
        if t < DAYS_PER_MONTH {
            return 0;
        }
        ((t / DAYS_PER_MONTH + 1e-9).floor() as usize).min(self.payments)
    }

    pub fn schedule(&self) -> Vec<AmortizationEntry> {
        let payment = self.monthly_payment();
        let mut entries = Vec::with_capacity(self.payments);
        let mut paid_before = 0.0;

        for month in 1..=self.payments {
            let paid = self.principal_paid_through(month);
            let principal = paid - paid_before;
            entries.push(AmortizationEntry {
                month,
                payment,
                principal,
                interest: payment - principal,
                remaining_balance: self.remaining_balance(month),
            });
            paid_before = paid;
        }
        entries
    }
}

/// Convenience wrapper over [`LoanTerms::monthly_payment`].
pub fn monthly_payment(principal: f64, annual_rate: f64, years: f64) -> Result<f64, KernelError> {
    Ok(LoanTerms::new(principal, annual_rate, years)?.monthly_payment())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_standard_thirty_year_mortgage() {
        let loan = LoanTerms::new(240_000.0, 0.04, 30.0).unwrap();
        let i: f64 = 0.04 / 12.0;
        let g = (1.0 + i).powi(360);
        let annuity = 240_000.0 * i * g / (g - 1.0);

        assert_eq!(loan.payments(), 360);
        assert!((loan.monthly_payment() - annuity).abs() < 0.01);
        assert!((loan.monthly_payment() - 1145.80).abs() < 0.01);
        assert_eq!(loan.remaining_balance(360), 0.0);
    }

    #[rstest]
    #[case(0.05)]
    #[case(0.0)]
    fn test_principal_paid_bounds(#[case] rate: f64) {
        let loan = LoanTerms::new(30_000.0, rate, 5.0).unwrap();
        assert_eq!(loan.principal_paid_through(0), 0.0);
        assert_eq!(loan.principal_paid_through(60), 30_000.0);
        assert_eq!(loan.principal_paid_through(600), 30_000.0);
        assert!(loan.principal_paid_through(30) > 0.0 && loan.principal_paid_through(30) < 30_000.0);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let loan = LoanTerms::new(12_000.0, 0.0, 1.0).unwrap();
        assert_eq!(loan.monthly_payment(), 1000.0);
        assert_eq!(loan.remaining_balance(3), 9000.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.0)]
    #[case(0.01)]
    fn test_rejects_empty_term(#[case] years: f64) {
        assert!(matches!(LoanTerms::new(1000.0, 0.05, years), Err(KernelError::NonPositiveTerm { .. })));
    }

    #[test]
    fn test_rejects_negative_principal() {
        assert!(matches!(LoanTerms::new(-1.0, 0.05, 10.0), Err(KernelError::NegativePrincipal { .. })));
    }

    #[test]
    fn test_schedule_sums_to_principal() {
        let loan = LoanTerms::new(50_000.0, 0.06, 10.0).unwrap();
        let schedule = loan.schedule();
        assert_eq!(schedule.len(), 120);

        let total_principal: f64 = schedule.iter().map(|e| e.principal).sum();
        assert!((total_principal - 50_000.0).abs() < 1e-6);

        let first = schedule[0];
        assert!((first.interest - 50_000.0 * 0.005).abs() < 1e-9);
        assert_eq!(schedule[119].remaining_balance, 0.0);
        // Interest share shrinks over the life of the loan.
        assert!(schedule[100].interest < first.interest);
    }

    #[test]
    fn test_payments_made_by() {
        let loan = LoanTerms::new(1000.0, 0.05, 1.0).unwrap();
        assert_eq!(loan.payments_made_by(0.0), 0);
        assert_eq!(loan.payments_made_by(DAYS_PER_MONTH - 0.1), 0);
        assert_eq!(loan.payments_made_by(DAYS_PER_MONTH), 1);
        assert_eq!(loan.payments_made_by(12.0 * DAYS_PER_MONTH), 12);
        assert_eq!(loan.payments_made_by(10_000.0), 12);
        assert_eq!(loan.payment_schedule().unwrap().count(), 12);
    }
}
