//! schedule.rs
//! Occurrence days of a periodic event.

use super::Day;
use crate::kernel::KernelError;

/// Absorbs floating-point error when `(end - start)` is an exact multiple of
/// the interval (e.g. 26 pay periods of `365/26` days).
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Upper bound on materialised occurrences for a single schedule.
pub const MAX_OCCURRENCES: usize = 1_000_000;

/// A finite arithmetic sequence of occurrence days.
///
/// Occurrences are `start + i * interval` for `i = 0..count`, where
/// `count = floor((end - start) / interval + ε) + 1` when `end >= start` and
/// 0 otherwise. The last occurrence is therefore the last one `<= end`, and an
/// `end` landing exactly on a multiple of the interval is included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    start: Day,
    end: Day,
    interval: Day,
    count: usize,
}

impl Schedule {
    pub fn new(start: Day, end: Day, interval: Day) -> Result<Self, KernelError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(KernelError::InvalidInterval { interval });
        }
        if !start.is_finite() {
            return Err(KernelError::NonFinite { what: "schedule start" });
        }
        if !end.is_finite() {
            return Err(KernelError::NonFinite { what: "schedule end" });
        }

        let count = if end < start {
            0
        } else {
            let steps = ((end - start) / interval + BOUNDARY_EPSILON).floor();
            if steps >= MAX_OCCURRENCES as f64 {
                return Err(KernelError::TooManyOccurrences { requested: steps + 1.0, limit: MAX_OCCURRENCES });
            }
            steps as usize + 1
        };

        Ok(Self { start, end, interval, count })
    }

    /// A single occurrence at `day`.
    pub fn once(day: Day) -> Result<Self, KernelError> {
        Self::new(day, day, 1.0)
    }

    /// `count` occurrences starting at `start`, `interval` days apart.
    pub fn with_count(start: Day, interval: Day, count: usize) -> Result<Self, KernelError> {
        if count == 0 {
            return Self::new(start, start - 1.0, interval);
        }
        let mut schedule = Self::new(start, start + (count - 1) as f64 * interval, interval)?;
        // Pin the count; the end bound was derived from it.
        schedule.count = count;
        Ok(schedule)
    }

    pub fn start(&self) -> Day { self.start }
    pub fn end(&self) -> Day { self.end }
    pub fn interval(&self) -> Day { self.interval }
    pub fn count(&self) -> usize { self.count }
    pub fn is_empty(&self) -> bool { self.count == 0 }

    #[inline(always)]
    pub fn occurrence(&self, i: usize) -> Day {
        self.start + i as f64 * self.interval
    }

    pub fn occurrences(&self) -> impl Iterator<Item = Day> + '_ {
        (0..self.count).map(move |i| self.occurrence(i))
    }

    /// Number of occurrences at or before `t`.
    pub fn occurred_by(&self, t: Day) -> usize {
        if t < self.start {
            return 0;
        }
        let steps = ((t - self.start) / self.interval + BOUNDARY_EPSILON).floor() as usize;
        (steps + 1).min(self.count)
    }

    /// The same schedule with every occurrence at or after `cutoff` dropped.
    pub fn truncated_before(&self, cutoff: Day) -> Self {
        let kept = if cutoff <= self.start {
            0
        } else {
            let steps = ((cutoff - self.start) / self.interval - BOUNDARY_EPSILON).ceil() as usize;
            steps.min(self.count)
        };
        Self { count: kept, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 10.0, 5.0, 3)] // exact multiple includes the end
    #[case(0.0, 11.0, 5.0, 3)]
    #[case(0.0, 14.999, 5.0, 3)]
    #[case(0.0, 15.0, 5.0, 4)]
    #[case(3.0, 3.0, 5.0, 1)]
    #[case(3.0, 2.0, 5.0, 0)]
    #[case(0.0, 365.0, 365.0 / 26.0, 27)]
    fn test_occurrence_count(#[case] start: f64, #[case] end: f64, #[case] dt: f64, #[case] expected: usize) {
        let s = Schedule::new(start, end, dt).unwrap();
        assert_eq!(s.count(), expected);
        assert_eq!(s.occurrences().count(), expected);
        assert!(s.occurrences().all(|ti| ti <= end + 1e-6));
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(matches!(Schedule::new(0.0, 10.0, 0.0), Err(KernelError::InvalidInterval { .. })));
        assert!(matches!(Schedule::new(0.0, 10.0, -1.0), Err(KernelError::InvalidInterval { .. })));
        assert!(matches!(Schedule::new(0.0, f64::INFINITY, 1.0), Err(KernelError::NonFinite { .. })));
    }

    #[test]
    fn test_rejects_runaway_schedule() {
        let err = Schedule::new(0.0, 1e9, 0.5).unwrap_err();
        assert!(matches!(err, KernelError::TooManyOccurrences { .. }));
    }

    #[test]
    fn test_occurred_by_counts_boundary_as_on() {
        let s = Schedule::new(10.0, 40.0, 10.0).unwrap();
        assert_eq!(s.occurred_by(9.999), 0);
        assert_eq!(s.occurred_by(10.0), 1);
        assert_eq!(s.occurred_by(29.0), 2);
        assert_eq!(s.occurred_by(40.0), 4);
        assert_eq!(s.occurred_by(1000.0), 4);
    }

    #[test]
    fn test_with_count_and_truncation() {
        let s = Schedule::with_count(0.0, 30.0, 12).unwrap();
        assert_eq!(s.count(), 12);
        assert_eq!(s.occurrence(11), 330.0);

        let cut = s.truncated_before(90.0);
        assert_eq!(cut.occurrences().collect::<Vec<_>>(), vec![0.0, 30.0, 60.0]);
        assert_eq!(s.truncated_before(91.0).count(), 4);
        assert_eq!(s.truncated_before(0.0).count(), 0);
    }
}
