//! Defines the error type for the financial kernels.
use thiserror::Error;

/// A domain violation detected while building a kernel.
///
/// Kernels check their inputs once, at construction, so evaluating a curve
/// never has to fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Loan term must be positive, got {years} years")]
    NonPositiveTerm { years: f64 },
    #[error("Loan principal cannot be negative, got {principal}")]
    NegativePrincipal { principal: f64 },
    #[error("Repeat interval must be a positive number of days, got {interval}")]
    InvalidInterval { interval: f64 },
    #[error("Non-finite value for {what}")]
    NonFinite { what: &'static str },
    #[error("Schedule would produce {requested} occurrences (limit {limit})")]
    TooManyOccurrences { requested: f64, limit: usize },
}

/// Rejects NaN and infinities with a label for the offending input.
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> Result<f64, KernelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KernelError::NonFinite { what })
    }
}
