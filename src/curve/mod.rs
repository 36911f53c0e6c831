//! Functions of time and the combinators that compose them.
pub mod primitives;
pub mod schedule;

pub use primitives::{delta_correction, repeat, repeat_with, shift, step, switch, try_repeat_with};
pub use schedule::Schedule;

use std::fmt;
use std::sync::Arc;

/// Days since the plan epoch (t = 0).
pub type Day = f64;

/// A pure, shareable function of time.
///
/// Curves capture everything they need by value at construction, so cloning
/// one is a reference-count bump and evaluating it never observes later changes
/// to the values it was built from.
#[derive(Clone)]
pub struct Curve(Arc<dyn Fn(Day) -> f64 + Send + Sync>);

impl Curve {
    pub fn new(f: impl Fn(Day) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The curve that is 0 everywhere.
    pub fn zero() -> Self {
        Self::new(|_| 0.0)
    }

    /// A constant level, defined for all t (no causal gating).
    pub fn constant(level: f64) -> Self {
        Self::new(move |_| level)
    }

    #[inline(always)]
    pub fn eval(&self, t: Day) -> f64 {
        (self.0)(t)
    }

    /// Pointwise sum of the given curves.
    pub fn sum(curves: Vec<Curve>) -> Self {
        match curves.len() {
            0 => Self::zero(),
            1 => curves.into_iter().next().unwrap_or_else(Self::zero),
            _ => Self::new(move |t| curves.iter().map(|c| c.eval(t)).sum()),
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(move |t| factor * self.eval(t))
    }

    pub fn negated(self) -> Self {
        self.scaled(-1.0)
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Curve(..)")
    }
}
