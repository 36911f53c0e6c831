//! Closed-form financial kernels. Pure functions: inputs are frozen parameters,
//! outputs are curves or scalars. Inputs are validated once, at construction.
pub mod error;
pub mod flows;
pub mod inflation;
pub mod loan;
pub mod valuation;

pub use error::KernelError;
pub use flows::{compound, growth_factor, inflow, net_paycheck, outflow, SalaryParams, SalaryPatch};
pub use inflation::InflationAdjustment;
pub use loan::{monthly_payment, AmortizationEntry, LoanTerms};
pub use valuation::{AssetValuation, Equity, ValuationPatch};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const DAYS_PER_MONTH: f64 = DAYS_PER_YEAR / 12.0;
