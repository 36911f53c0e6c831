//! Defines the issue types reported by plan validation.
use crate::store::EventId;
use std::fmt;

/// The specific category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// The event type is not in the schema.
    UnknownEventType,
    /// The updating event type is not allowed under its parent's type.
    UnknownUpdateType,
    MissingParameter,
    UnexpectedParameter,
    DuplicateParameterId,
    /// Two top-level events, or two updates of one parent, share an id.
    DuplicateEventId,
}

/// One problem found in a plan. Validation collects all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The event (or, for updates, the parent event) the issue belongs to.
    pub event_id: Option<EventId>,
    /// The category of the issue.
    pub kind: IssueKind,
    /// A human-readable message explaining the issue.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
