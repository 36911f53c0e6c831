pub mod trace;

pub use trace::{format_all, format_breakdown};
