//! Plan records, typed events and the compiler that turns them into curves.
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod model;
pub mod record;

pub use compiler::{compile, CompileReport, CompileWarning, Compiler, Posting};
pub use error::{EventError, PlanError};
pub use model::{Event, EventKind};
pub use record::{EventRecord, ParameterRecord, Plan};
