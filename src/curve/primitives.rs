//! primitives.rs
//! The combinator language: step, shift, repeat, switch and delta correction.

use super::{Curve, Day, Schedule};
use std::convert::Infallible;

/// Unit step. The boundary sample at exactly `x == 0` counts as "on".
#[inline(always)]
pub fn step(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { 0.0 }
}

/// Time-shift with causal gating: `g(t) = f(t - tk) * step(t - tk)`.
///
/// `f` is evaluated in local time (days since `tk`) and never before `tk`,
/// so a base function that is undefined for negative local time stays silent.
pub fn shift(f: Curve, tk: Day) -> Curve {
    Curve::new(move |t| {
        let local = t - tk;
        if local >= 0.0 { f.eval(local) } else { 0.0 }
    })
}

/// Sum of `shift(f, ti)` over every occurrence `ti` of the schedule.
pub fn repeat(f: Curve, schedule: &Schedule) -> Curve {
    repeat_with(schedule, |_| f.clone())
}

/// Like [`repeat`], but each occurrence gets its own local-time curve built from
/// the occurrence day. This is how per-occurrence parameters get frozen: the
/// factory runs once per occurrence, at construction.
///
/// **Optimization:**
/// Occurrences are stored in ascending order and evaluation stops at the first
/// occurrence after `t`, since every later one is still gated off.
pub fn repeat_with(schedule: &Schedule, mut instance: impl FnMut(Day) -> Curve) -> Curve {
    match try_repeat_with(schedule, |ti| Ok::<_, Infallible>(instance(ti))) {
        Ok(curve) => curve,
        Err(never) => match never {},
    }
}

/// [`repeat_with`] for factories that can reject an occurrence. The first
/// error aborts construction.
pub fn try_repeat_with<E>(
    schedule: &Schedule,
    mut instance: impl FnMut(Day) -> Result<Curve, E>,
) -> Result<Curve, E> {
    let instances: Vec<(Day, Curve)> = schedule
        .occurrences()
        .map(|ti| instance(ti).map(|f| (ti, f)))
        .collect::<Result<_, E>>()?;

    if instances.is_empty() {
        return Ok(Curve::zero());
    }

    Ok(Curve::new(move |t| {
        let mut total = 0.0;
        for (ti, f) in &instances {
            let local = t - ti;
            if local < 0.0 {
                break;
            }
            total += f.eval(local);
        }
        total
    }))
}

/// Piecewise switch: `before(t)` for `t < t_delta`, else `after(t)`.
/// The discontinuity at `t_delta` is intentional.
pub fn switch(t_delta: Day, before: Curve, after: Curve) -> Curve {
    Curve::new(move |t| if t < t_delta { before.eval(t) } else { after.eval(t) })
}

/// Delta-correction operator: `(actual - Σ prior(tx)) * step(t - tx)`.
///
/// `prior` must be the complete set of curves the correction reconciles; the
/// delta is computed here, once, from their value at `tx`.
pub fn delta_correction(prior: &[Curve], tx: Day, actual: f64) -> Curve {
    let current: f64 = prior.iter().map(|c| c.eval(tx)).sum();
    let delta = actual - current;
    Curve::new(move |t| delta * step(t - tx))
}
