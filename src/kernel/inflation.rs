//! inflation.rs
//! Exponential inflation scaling relative to a reference day.

use super::error::{ensure_finite, KernelError};
use super::DAYS_PER_YEAR;
use crate::curve::Day;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflationAdjustment {
    reference_day: Day,
    daily_rate: f64,
}

impl InflationAdjustment {
    pub fn new(reference_day: Day, annual_rate: f64) -> Result<Self, KernelError> {
        let reference_day = ensure_finite(reference_day, "inflation reference day")?;
        let annual_rate = ensure_finite(annual_rate, "inflation rate")?;
        if annual_rate <= -1.0 {
            return Err(KernelError::NonFinite { what: "inflation rate at or below -100%" });
        }
        Ok(Self { reference_day, daily_rate: Self::daily_rate(annual_rate) })
    }

    /// `(1 + r)^(1/365) - 1`
    pub fn daily_rate(annual_rate: f64) -> f64 {
        (1.0 + annual_rate).powf(1.0 / DAYS_PER_YEAR) - 1.0
    }

    pub fn reference_day(&self) -> Day {
        self.reference_day
    }

    /// `exp(-d * (reference_day - t))`
    #[inline(always)]
    pub fn factor(&self, t: Day) -> f64 {
        (-self.daily_rate * (self.reference_day - t)).exp()
    }

    /// Multiplies each sample by the factor for its grid day.
    pub fn apply(&self, days: &[Day], series: &mut [f64]) {
        for (v, &t) in series.iter_mut().zip(days) {
            *v *= self.factor(t);
        }
    }

    pub fn revert(&self, days: &[Day], series: &mut [f64]) {
        for (v, &t) in series.iter_mut().zip(days) {
            *v /= self.factor(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_is_one_at_reference() {
        let adj = InflationAdjustment::new(730.0, 0.03).unwrap();
        assert_eq!(adj.factor(730.0), 1.0);
        assert!(adj.factor(0.0) < 1.0);
        assert!(adj.factor(2000.0) > 1.0);
    }

    #[test]
    fn test_factor_grows_one_year_past_reference() {
        let adj = InflationAdjustment::new(0.0, 0.05).unwrap();
        assert!((adj.factor(365.0) - 1.05).abs() < 1e-9);
        assert!((adj.factor(-365.0) - 1.0 / 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_apply_then_revert_round_trips() {
        let adj = InflationAdjustment::new(365.0, 0.025).unwrap();
        let days: Vec<f64> = (0..50).map(|i| i as f64 * 30.0).collect();
        let original: Vec<f64> = days.iter().map(|t| 1000.0 + t * 3.5).collect();

        let mut series = original.clone();
        adj.apply(&days, &mut series);
        assert_ne!(series, original);
        adj.revert(&days, &mut series);

        for (a, b) in series.iter().zip(&original) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_daily_rate_compounds_to_annual() {
        let d = InflationAdjustment::daily_rate(0.03);
        assert!(((1.0 + d).powf(365.0) - 1.03).abs() < 1e-12);
    }
}
