//! Schema validation of plans, run before compilation.
pub mod error;
pub mod schema;
pub mod validator;

pub use error::{IssueKind, ValidationIssue};
pub use schema::{EventSchema, ParamSchema, Schema, UpdateSchema};
pub use validator::{validate, Validator};
