//! Defines the error types for plan loading and event compilation.
use crate::kernel::KernelError;
use crate::store::EventId;
use thiserror::Error;

/// Why a single event contributed nothing to the envelope set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("Unknown event type '{event_type}' (event {event_id})")]
    UnknownEventType { event_id: EventId, event_type: String },
    #[error("Unknown updating event type '{update_type}' under {event_type} (event {event_id})")]
    UnknownUpdateType { event_id: EventId, event_type: String, update_type: String },
    #[error("Event {event_id} is missing parameter '{parameter}'")]
    MissingParameter { event_id: EventId, parameter: String },
    #[error("Event {event_id} has invalid parameter '{parameter}': {reason}")]
    InvalidParameter { event_id: EventId, parameter: String, reason: String },
    #[error("Event {event_id} sells at day {sale_day}, before the purchase at day {purchase_day}")]
    SaleBeforePurchase { event_id: EventId, sale_day: f64, purchase_day: f64 },
    #[error("Event {event_id}, parameter '{parameter}': {source}")]
    Kernel {
        event_id: EventId,
        parameter: &'static str,
        #[source]
        source: KernelError,
    },
}

impl EventError {
    pub fn event_id(&self) -> &EventId {
        match self {
            EventError::UnknownEventType { event_id, .. }
            | EventError::UnknownUpdateType { event_id, .. }
            | EventError::MissingParameter { event_id, .. }
            | EventError::InvalidParameter { event_id, .. }
            | EventError::SaleBeforePurchase { event_id, .. }
            | EventError::Kernel { event_id, .. } => event_id,
        }
    }

    /// Adapter for `map_err` on kernel results.
    pub(crate) fn kernel<'a>(event_id: &'a EventId, parameter: &'static str) -> impl FnOnce(KernelError) -> Self + 'a {
        move |source| EventError::Kernel { event_id: event_id.clone(), parameter, source }
    }
}

/// Failures while reading a plan, schema or config document.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PlanError::Io { path: path.display().to_string(), source }
    }
}
