//! ledger.rs
//! Evaluated series and evaluation errors.
use super::kernel;
use crate::curve::Day;
use crate::kernel::KernelError;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Invalid grid [{start}, {end}) step {step}: {reason}")]
    InvalidGrid { start: f64, end: f64, step: f64, reason: String },
    #[error("Envelope '{envelope}' is not finite at day {day}")]
    NonFinite { envelope: String, day: Day },
    #[error("Unknown envelope '{0}'")]
    UnknownEnvelope(String),
    #[error("Invalid inflation settings: {0}")]
    Inflation(#[from] KernelError),
}

/// Grid days plus one series per envelope, in envelope creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub days: Vec<Day>,
    pub names: Vec<String>,
    /// `values[i]` is the series of `names[i]`, one sample per grid day.
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct ProjectionJson<'a> {
    days: &'a [Day],
    envelopes: BTreeMap<&'a str, &'a [f64]>,
    total: Vec<f64>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.values[idx])
    }

    pub fn series(&self, name: &str) -> Result<&[f64], ComputationError> {
        self.get(name).ok_or_else(|| ComputationError::UnknownEnvelope(name.to_string()))
    }

    /// Net worth: elementwise sum over all envelopes.
    pub fn total(&self) -> Vec<f64> {
        kernel::sum_series(self.values.iter().map(Vec::as_slice), self.days.len())
    }

    /// Sample index of the last grid day at or before `t`.
    pub fn index_at(&self, t: Day) -> Option<usize> {
        self.days.partition_point(|&d| d <= t).checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names.iter().map(String::as_str).zip(self.values.iter().map(Vec::as_slice))
    }

    /// `{days, envelopes: {name: series}, total}`
    pub fn to_json(&self) -> serde_json::Value {
        let doc = ProjectionJson {
            days: &self.days,
            envelopes: self.iter().collect(),
            total: self.total(),
        };
        serde_json::to_value(doc).unwrap_or(serde_json::Value::Null)
    }
}
