//! validator.rs
//! Checks a plan against a schema before compilation.
use super::error::{IssueKind, ValidationIssue};
use super::schema::{ParamRules, Schema, SchemaMap};
use crate::events::{EventRecord, ParameterRecord, Plan};
use crate::store::EventId;
use std::collections::{BTreeSet, HashSet};

/// Plan linter. Collects every issue instead of stopping at the first.
pub struct Validator {
    schema: SchemaMap,
}

/// Renders a set as `{'a', 'b'}`, sorted.
fn set_repr<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let sorted: BTreeSet<&str> = items.into_iter().collect();
    let parts: Vec<String> = sorted.iter().map(|s| format!("'{}'", s)).collect();
    format!("{{{}}}", parts.join(", "))
}

impl Validator {
    pub fn new(schema: &Schema) -> Self {
        Self { schema: schema.extract() }
    }

    /// Runs every check over the plan.
    pub fn validate(&self, plan: &Plan) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen_events: HashSet<&EventId> = HashSet::new();

        for event in &plan.events {
            let Some((rules, updates)) = self.schema.events.get(&event.event_type) else {
                issues.push(ValidationIssue {
                    event_id: Some(event.id.clone()),
                    kind: IssueKind::UnknownEventType,
                    message: format!("Unknown event type: {}", event.event_type),
                });
                continue;
            };

            // 1. The event's own parameters.
            let desc = format!("event {} ({})", event.id, event.event_type);
            check_parameters(&mut issues, &event.id, &event.event_type, &desc, rules, &event.parameters);

            // 2. Top-level id uniqueness.
            if !seen_events.insert(&event.id) {
                issues.push(ValidationIssue {
                    event_id: Some(event.id.clone()),
                    kind: IssueKind::DuplicateEventId,
                    message: format!("Duplicate event id: {}", event.id),
                });
            }

            // 3. Updating events, reported against the parent.
            for update in &event.updating_events {
                let Some(update_rules) = updates.get(&update.event_type) else {
                    issues.push(ValidationIssue {
                        event_id: Some(event.id.clone()),
                        kind: IssueKind::UnknownUpdateType,
                        message: format!(
                            "Unknown updating event type: {} under {}",
                            update.event_type, event.event_type
                        ),
                    });
                    continue;
                };
                let missing_desc = format!("{} under {}", update.event_type, event.id);
                let desc = format!("updating event {}, parent event {}", update.event_type, event.id);
                check_parameters(&mut issues, &event.id, &missing_desc, &desc, update_rules, &update.parameters);
            }
            check_update_ids(&mut issues, event);
        }
        issues
    }
}

fn check_parameters(
    issues: &mut Vec<ValidationIssue>,
    event_id: &EventId,
    missing_desc: &str,
    desc: &str,
    rules: &ParamRules,
    params: &[ParameterRecord],
) {
    let provided: BTreeSet<&str> = params.iter().map(|p| p.param_type.as_str()).collect();

    let missing: Vec<&str> = rules.required.iter().map(String::as_str).filter(|r| !provided.contains(r)).collect();
    if !missing.is_empty() {
        issues.push(ValidationIssue {
            event_id: Some(event_id.clone()),
            kind: IssueKind::MissingParameter,
            message: format!("Missing in {}: {}", missing_desc, set_repr(missing)),
        });
    }

    let extra: Vec<&str> = provided.iter().copied().filter(|p| !rules.allowed.contains(*p)).collect();
    if !extra.is_empty() {
        issues.push(ValidationIssue {
            event_id: Some(event_id.clone()),
            kind: IssueKind::UnexpectedParameter,
            message: format!("Unexpected parameters in {}: {}", desc, set_repr(extra)),
        });
    }

    // Parameters without an id are not compared.
    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for id in params.iter().filter_map(|p| p.id.as_ref()) {
        if !seen.insert(id) {
            duplicates.insert(id.to_string());
        }
    }
    if !duplicates.is_empty() {
        issues.push(ValidationIssue {
            event_id: Some(event_id.clone()),
            kind: IssueKind::DuplicateParameterId,
            message: format!(
                "Duplicate parameter ids in {}: {}",
                desc,
                set_repr(duplicates.iter().map(String::as_str))
            ),
        });
    }
}

fn check_update_ids(issues: &mut Vec<ValidationIssue>, event: &EventRecord) {
    let mut seen = HashSet::new();
    for update in &event.updating_events {
        if !seen.insert(&update.id) {
            issues.push(ValidationIssue {
                event_id: Some(event.id.clone()),
                kind: IssueKind::DuplicateEventId,
                message: format!("Duplicate updating event id in event {}: {}", event.id, update.id),
            });
        }
    }
}

/// Validates `plan` against `schema`, returning every issue found.
pub fn validate(plan: &Plan, schema: &Schema) -> Vec<ValidationIssue> {
    Validator::new(schema).validate(plan)
}
