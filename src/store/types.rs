//! types.rs
//! Ids and entries shared by the envelope store.
use crate::curve::{Curve, Day};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EnvelopeId(pub u32);

impl EnvelopeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Plan event ids may be numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(n: i64) -> Self { EventId::Number(n) }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self { EventId::Text(s.to_string()) }
}

/// A curve plus where it came from.
#[derive(Debug, Clone)]
pub struct EnvelopeEntry {
    pub source: EventId,
    /// What the curve represents, e.g. "paycheck" or "mortgage payment".
    pub label: String,
    /// First day the curve can be non-zero.
    pub active_from: Day,
    pub curve: Curve,
}
