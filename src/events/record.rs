//! record.rs
//! The JSON shape of a plan, as written by the planner front end.

use super::error::{EventError, PlanError};
use crate::params::{ParamValue, ParameterSet};
use crate::store::EventId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub events: Vec<EventRecord>,
    /// "Today" on the plan timeline; default inflation reference day.
    #[serde(default)]
    pub current_time_days: Option<f64>,
    /// Envelopes to create up front, in this order.
    #[serde(default)]
    pub envelopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(default)]
    pub updating_events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(default)]
    pub id: Option<EventId>,
    #[serde(rename = "type")]
    pub param_type: String,
    pub value: serde_json::Value,
}

impl FromStr for Plan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Plan {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(PlanError::io(path))?;
        text.parse()
    }
}

impl EventRecord {
    /// Parameters keyed by type. A repeated type keeps its last value.
    pub fn parameter_set(&self) -> Result<ParameterSet, EventError> {
        let mut set = ParameterSet::new();
        for p in &self.parameters {
            let value: ParamValue = serde_json::from_value(p.value.clone()).map_err(|e| EventError::InvalidParameter {
                event_id: self.id.clone(),
                parameter: p.param_type.clone(),
                reason: e.to_string(),
            })?;
            set.insert(p.param_type.clone(), value);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PLAN: &str = r#"{
        "current_time_days": 400,
        "events": [{
            "id": 1,
            "type": "gift",
            "description": "Birthday",
            "parameters": [
                {"id": 10, "type": "start_time", "value": 365},
                {"id": 11, "type": "money", "value": "10"},
                {"id": 12, "type": "to_key", "value": "cash"}
            ],
            "updating_events": []
        }, {
            "id": "job-2",
            "type": "purchase",
            "parameters": [{"id": 1, "type": "start_time", "value": 0}]
        }]
    }"#;

    #[test]
    fn test_parses_mixed_ids_and_defaults() {
        let plan: Plan = PLAN.parse().unwrap();
        assert_eq!(plan.events.len(), 2);
        assert_eq!(plan.events[0].id, EventId::Number(1));
        assert_eq!(plan.events[1].id, EventId::Text("job-2".into()));
        assert_eq!(plan.events[1].description, "");
        assert!(plan.envelopes.is_empty());
        assert_eq!(plan.current_time_days, Some(400.0));
    }

    #[test]
    fn test_parameter_set_by_type() {
        let plan: Plan = PLAN.parse().unwrap();
        let set = plan.events[0].parameter_set().unwrap();
        assert_eq!(set.get("start_time").and_then(ParamValue::as_number), Some(365.0));
        assert_eq!(set.get("money").and_then(ParamValue::as_number), Some(10.0));
        assert_eq!(set.get("to_key").and_then(ParamValue::as_text), Some("cash"));
    }

    #[test]
    fn test_rejects_boolean_value() {
        let record: EventRecord = serde_json::from_str(
            r#"{"id": 3, "type": "gift", "parameters": [{"id": 1, "type": "money", "value": true}]}"#,
        )
        .unwrap();
        assert!(matches!(record.parameter_set(), Err(EventError::InvalidParameter { .. })));
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PLAN.as_bytes()).unwrap();
        let plan = Plan::from_path(file.path()).unwrap();
        assert_eq!(plan.events[0].event_type, "gift");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Plan::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
