//! grid.rs
//! The sampling grid a projection is evaluated on.

use super::ledger::ComputationError;
use crate::curve::Day;

/// Grid points cap, matching the occurrence cap of schedules.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Days `start + i * step` for every `i` with the day strictly below `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    days: Vec<Day>,
    step: Day,
}

impl TimeGrid {
    pub fn new(start: Day, end: Day, step: Day) -> Result<Self, ComputationError> {
        let invalid = |reason: &str| ComputationError::InvalidGrid {
            start,
            end,
            step,
            reason: reason.to_string(),
        };
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(invalid("bounds and step must be finite"));
        }
        if step <= 0.0 {
            return Err(invalid("step must be positive"));
        }
        if end < start {
            return Err(invalid("end precedes start"));
        }
        let span = ((end - start) / step).ceil();
        if span > MAX_GRID_POINTS as f64 {
            return Err(invalid("too many grid points"));
        }

        // Multiply instead of accumulating so drift never adds a point.
        let days = (0..span as usize)
            .map(|i| start + i as f64 * step)
            .take_while(|&t| t < end)
            .collect();
        Ok(Self { days, step })
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn step(&self) -> Day {
        self.step
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }
}
