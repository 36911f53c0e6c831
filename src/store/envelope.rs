//! envelope.rs
//! The envelope set: named, ordered lists of curves.
use super::types::*;
use crate::curve::{Curve, Day};
use std::collections::HashMap;

/// Named buckets of curves, kept in creation order.
///
/// Storage is columnar: envelope `i` has its name in `names[i]` and its
/// entries in `entries[i]`. Entries are append-only.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeSet {
    pub names: Vec<String>,
    pub entries: Vec<Vec<EnvelopeEntry>>,
    /// Latest correction day per envelope.
    pub corrected_at: Vec<Option<Day>>,

    index: HashMap<String, EnvelopeId>,
}

impl EnvelopeSet {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.names.len() }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.ensure(name.as_ref());
        }
        set
    }

    pub fn id(&self, name: &str) -> Option<EnvelopeId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: EnvelopeId) -> &str {
        &self.names[id.index()]
    }

    /// Returns the envelope with this name, creating an empty one if needed.
    pub fn ensure(&mut self, name: &str) -> EnvelopeId {
        if let Some(id) = self.id(name) {
            return id;
        }
        let id = EnvelopeId::new(self.names.len());
        self.names.push(name.to_string());
        self.entries.push(Vec::new());
        self.corrected_at.push(None);
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn append(&mut self, name: &str, entry: EnvelopeEntry) -> EnvelopeId {
        let id = self.ensure(name);
        self.entries[id.index()].push(entry);
        id
    }

    #[inline]
    pub fn entries(&self, id: EnvelopeId) -> &[EnvelopeEntry] {
        &self.entries[id.index()]
    }

    /// Clones of the envelope's curves as they stand now.
    pub fn snapshot(&self, id: EnvelopeId) -> Vec<Curve> {
        self.entries(id).iter().map(|e| e.curve.clone()).collect()
    }

    pub fn balance_at(&self, id: EnvelopeId, t: Day) -> f64 {
        self.entries(id).iter().fold(0.0, |acc, e| acc + e.curve.eval(t))
    }

    /// Net worth at `t`: the sum of every envelope balance.
    pub fn total_at(&self, t: Day) -> f64 {
        self.ids().fold(0.0, |acc, id| acc + self.balance_at(id, t))
    }

    pub fn mark_correction(&mut self, id: EnvelopeId, day: Day) {
        let slot = &mut self.corrected_at[id.index()];
        *slot = Some(slot.map_or(day, |d| d.max(day)));
    }

    pub fn correction_day(&self, id: EnvelopeId) -> Option<Day> {
        self.corrected_at.get(id.index()).copied().flatten()
    }

    pub fn ids(&self) -> impl Iterator<Item = EnvelopeId> {
        (0..self.count()).map(EnvelopeId::new)
    }
}
