//! Time-varying parameter functions.
//!
//! A `ParamFn<P>` is `θ: Day -> P`: a base value plus an ordered chain of
//! point-in-time amendments. Evaluating at `t` starts from the base and applies
//! every amendment whose change day is `<= t`, in ascending change-day order.
//! Amendments are never removed, so a later amendment can revert an earlier one.
pub mod set;

pub use set::{ParamValue, ParameterSet};

use crate::curve::Day;
use smallvec::SmallVec;
use std::fmt::Debug;

/// How a patch merges into a parameter value.
pub trait Amend: Clone + Debug + Send + Sync + 'static {
    type Patch: Clone + Debug + Send + Sync + 'static;

    fn amend(&mut self, patch: &Self::Patch);
}

impl Amend for f64 {
    type Patch = f64;

    fn amend(&mut self, patch: &f64) {
        *self = *patch;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Amendment<Patch> {
    pub at: Day,
    pub patch: Patch,
}

#[derive(Debug, Clone)]
pub struct ParamFn<P: Amend> {
    base: P,
    // Sorted by `at`; equal days keep declaration order.
    amendments: SmallVec<[Amendment<P::Patch>; 4]>,
}

impl<P: Amend> ParamFn<P> {
    pub fn constant(base: P) -> Self {
        Self { base, amendments: SmallVec::new() }
    }

    /// `θ'(t) = θ(t)` for `t < at`, else `θ(t)` merged with `patch`.
    pub fn amended(mut self, patch: P::Patch, at: Day) -> Self {
        self.amend_at(patch, at);
        self
    }

    pub fn amend_at(&mut self, patch: P::Patch, at: Day) {
        let idx = self.amendments.partition_point(|a| a.at <= at);
        self.amendments.insert(idx, Amendment { at, patch });
    }

    /// Evaluates the parameter function once, producing a frozen value.
    pub fn at(&self, t: Day) -> P {
        let mut value = self.base.clone();
        for a in self.amendments.iter().take_while(|a| a.at <= t) {
            value.amend(&a.patch);
        }
        value
    }

    pub fn base(&self) -> &P {
        &self.base
    }

    pub fn amendments(&self) -> &[Amendment<P::Patch>] {
        &self.amendments
    }

    /// Change days in ascending order.
    pub fn change_days(&self) -> impl Iterator<Item = Day> + '_ {
        self.amendments.iter().map(|a| a.at)
    }
}

/// Time-invariant parameter function.
pub fn constant<P: Amend>(base: P) -> ParamFn<P> {
    ParamFn::constant(base)
}

/// Point-in-time override of an existing parameter function.
pub fn override_at<P: Amend>(theta: ParamFn<P>, patch: P::Patch, at: Day) -> ParamFn<P> {
    theta.amended(patch, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 100.0)]
    #[case(1094.9, 100.0)]
    #[case(1095.0, 120.0)]
    #[case(2000.0, 150.0)]
    fn test_successive_overrides(#[case] t: f64, #[case] expected: f64) {
        let theta = override_at(override_at(constant(100.0), 120.0, 1095.0), 150.0, 1825.0);
        assert_eq!(theta.at(t), expected);
    }

    #[test]
    fn test_declaration_order_does_not_matter_across_days() {
        // Declared out of time order; later-in-time still wins.
        let theta = constant(1.0).amended(3.0, 200.0).amended(2.0, 100.0);
        assert_eq!(theta.at(150.0), 2.0);
        assert_eq!(theta.at(250.0), 3.0);
        assert_eq!(theta.change_days().collect::<Vec<_>>(), vec![100.0, 200.0]);
    }

    #[test]
    fn test_same_day_amendments_apply_in_declaration_order() {
        let theta = constant(1.0).amended(5.0, 10.0).amended(7.0, 10.0);
        assert_eq!(theta.at(10.0), 7.0);
    }

    #[test]
    fn test_reverting_by_reamending() {
        let theta = constant(0.2).amended(0.3, 10.0).amended(0.2, 20.0);
        assert_eq!(theta.at(15.0), 0.3);
        assert_eq!(theta.at(25.0), 0.2);
        assert_eq!(theta.amendments().len(), 2);
    }
}
