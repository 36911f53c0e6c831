//! Evaluation of compiled envelopes into projections.
pub mod engine;
pub mod grid;
pub mod kernel;
pub mod ledger;

pub use engine::{project, Evaluator};
pub use grid::TimeGrid;
pub use ledger::{ComputationError, Projection};
