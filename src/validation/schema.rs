//! schema.rs
//! The schema a plan is validated against: allowed event types, their
//! parameters, and the updating events allowed under each.

use crate::events::catalog::{self, EventSpec, UpdateSpec};
use crate::events::PlanError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSchema {
    #[serde(rename = "type")]
    pub update_type: String,
    #[serde(default)]
    pub parameters: Vec<ParamSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSchema {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parameters: Vec<ParamSchema>,
    #[serde(default)]
    pub updating_events: Vec<UpdateSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub events: Vec<EventSchema>,
}

/// Required and allowed parameter names for one (updating) event type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamRules {
    pub required: BTreeSet<String>,
    pub allowed: BTreeSet<String>,
}

impl ParamRules {
    fn from_params(params: &[ParamSchema]) -> Self {
        let mut rules = Self::default();
        for p in params {
            if !p.optional {
                rules.required.insert(p.param_type.clone());
            }
            rules.allowed.insert(p.param_type.clone());
        }
        rules
    }
}

/// Schema flattened into lookup tables.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    pub events: HashMap<String, (ParamRules, HashMap<String, ParamRules>)>,
}

fn params_of(required: &[&str], optional: &[&str]) -> Vec<ParamSchema> {
    let req = required.iter().map(|p| ParamSchema { param_type: p.to_string(), optional: false });
    let opt = optional.iter().map(|p| ParamSchema { param_type: p.to_string(), optional: true });
    req.chain(opt).collect()
}

impl From<&UpdateSpec> for UpdateSchema {
    fn from(u: &UpdateSpec) -> Self {
        Self { update_type: u.update_type.to_string(), parameters: params_of(u.required, u.optional) }
    }
}

impl From<&EventSpec> for EventSchema {
    fn from(spec: &EventSpec) -> Self {
        Self {
            event_type: spec.event_type.to_string(),
            parameters: params_of(spec.required, spec.optional),
            updating_events: spec.updates.iter().map(UpdateSchema::from).collect(),
        }
    }
}

impl Schema {
    /// The schema of every event type the compiler understands.
    pub fn builtin() -> Self {
        Self { events: catalog::CATALOG.iter().map(EventSchema::from).collect() }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PlanError::io(path))?;
        text.parse()
    }

    /// Flattens the schema. A repeated type keeps its last definition.
    pub fn extract(&self) -> SchemaMap {
        let events = self
            .events
            .iter()
            .map(|e| {
                let updates = e
                    .updating_events
                    .iter()
                    .map(|u| (u.update_type.clone(), ParamRules::from_params(&u.parameters)))
                    .collect();
                (e.event_type.clone(), (ParamRules::from_params(&e.parameters), updates))
            })
            .collect();
        SchemaMap { events }
    }
}

impl FromStr for Schema {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_catalog() {
        let map = Schema::builtin().extract();
        assert_eq!(map.events.len(), catalog::CATALOG.len());

        let (job, updates) = &map.events["get_job"];
        assert!(job.required.contains("salary"));
        assert!(!job.required.contains("retirement_key"));
        assert!(job.allowed.contains("retirement_key"));
        assert!(updates["get_a_raise"].allowed.contains("to_key"));
    }

    #[test]
    fn test_parses_external_schema() {
        let schema: Schema = r#"{"events": [{
            "type": "gift",
            "parameters": [{"type": "start_time"}, {"type": "money"}, {"type": "note", "optional": true}],
            "updating_events": [{"type": "regift", "parameters": [{"type": "start_time"}]}]
        }]}"#
            .parse()
            .unwrap();
        let map = schema.extract();
        let (gift, updates) = &map.events["gift"];
        assert_eq!(gift.required.len(), 2);
        assert_eq!(gift.allowed.len(), 3);
        assert!(updates.contains_key("regift"));
    }
}
