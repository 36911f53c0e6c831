//! engine.rs
//! Samples envelope curves on a grid and assembles the projection.
use super::grid::TimeGrid;
use super::kernel;
use super::ledger::{ComputationError, Projection};
use crate::config::SimulationConfig;
use crate::curve::{Curve, Day};
use crate::events::{compile, CompileReport, Plan};
use crate::kernel::InflationAdjustment;
use crate::store::EnvelopeSet;
use rayon::prelude::*;
use tracing::info;

pub struct Evaluator<'a> {
    set: &'a EnvelopeSet,
    grid: TimeGrid,
    inflation: Option<InflationAdjustment>,
}

impl<'a> Evaluator<'a> {
    pub fn new(set: &'a EnvelopeSet, grid: TimeGrid) -> Self {
        Self { set, grid, inflation: None }
    }

    pub fn with_inflation(mut self, adjustment: InflationAdjustment) -> Self {
        self.inflation = Some(adjustment);
        self
    }

    /// Grid and inflation from `config`; `current_day` is the fallback
    /// inflation reference day.
    pub fn from_config(
        set: &'a EnvelopeSet,
        config: &SimulationConfig,
        current_day: Option<Day>,
    ) -> Result<Self, ComputationError> {
        let grid = TimeGrid::new(config.start_day, config.end_day, config.step_days)?;
        let inflation = config.inflation_adjustment(current_day)?;
        Ok(Self { set, grid, inflation })
    }

    /// Evaluates every envelope on the grid.
    ///
    /// **Optimization:** Grid points are sampled in parallel. Each point sums
    /// its curves in insertion order, so results do not depend on scheduling.
    pub fn run(&self) -> Result<Projection, ComputationError> {
        let days = self.grid.days();
        let factors: Option<Vec<f64>> = self.inflation.map(|adj| days.iter().map(|&t| adj.factor(t)).collect());

        let mut names = Vec::with_capacity(self.set.count());
        let mut values = Vec::with_capacity(self.set.count());
        for id in self.set.ids() {
            let name = self.set.name(id);
            let curves = self.set.snapshot(id);

            // 1. Sample
            let mut series = sample(&curves, days);

            // 2. Reject non-finite samples
            if let Some(i) = series.iter().position(|v| !v.is_finite()) {
                return Err(ComputationError::NonFinite { envelope: name.to_string(), day: days[i] });
            }

            // 3. Inflation
            if let Some(factors) = &factors {
                kernel::mul_assign(&mut series, factors);
            }

            names.push(name.to_string());
            values.push(series);
        }

        info!(
            grid_points = days.len(),
            envelopes = names.len(),
            inflation = self.inflation.is_some(),
            "projection evaluated"
        );
        Ok(Projection { days: days.to_vec(), names, values })
    }
}

fn sample(curves: &[Curve], days: &[Day]) -> Vec<f64> {
    days.par_iter()
        .map(|&t| curves.iter().fold(0.0, |acc, c| acc + c.eval(t)))
        .collect()
}

/// Compiles `plan` and evaluates it under `config`.
pub fn project(plan: &Plan, config: &SimulationConfig) -> Result<(Projection, CompileReport), ComputationError> {
    let (set, report) = compile(plan);
    let projection = Evaluator::from_config(&set, config, plan.current_time_days)?.run()?;
    Ok((projection, report))
}
