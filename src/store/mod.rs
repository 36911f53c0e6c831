pub mod envelope;
pub mod types;

pub use envelope::EnvelopeSet;
pub use types::{EnvelopeEntry, EnvelopeId, EventId};
