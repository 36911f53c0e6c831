//! config.rs
//! Simulation settings: the evaluation grid and optional inflation.

use crate::compute::ComputationError;
use crate::curve::Day;
use crate::events::PlanError;
use crate::kernel::{InflationAdjustment, DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_day: Day,
    /// Exclusive.
    pub end_day: Day,
    pub step_days: Day,
    pub inflation: Option<InflationConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { start_day: 0.0, end_day: 20.0 * DAYS_PER_YEAR, step_days: 30.0, inflation: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationConfig {
    /// Day whose money values are the unit. Falls back to the plan's
    /// current day, then to the grid start.
    #[serde(default)]
    pub reference_day: Option<Day>,
    pub annual_rate: f64,
}

impl SimulationConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PlanError::io(path))?;
        text.parse()
    }

    pub fn with_inflation(mut self, annual_rate: f64, reference_day: Option<Day>) -> Self {
        self.inflation = Some(InflationConfig { reference_day, annual_rate });
        self
    }

    /// Resolves the inflation section, if any, into an adjustment.
    pub fn inflation_adjustment(
        &self,
        current_day: Option<Day>,
    ) -> Result<Option<InflationAdjustment>, ComputationError> {
        let Some(cfg) = &self.inflation else {
            return Ok(None);
        };
        let reference = cfg.reference_day.or(current_day).unwrap_or(self.start_day);
        Ok(Some(InflationAdjustment::new(reference, cfg.annual_rate)?))
    }
}

impl FromStr for SimulationConfig {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
