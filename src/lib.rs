//! Net-worth projection core.
//!
//! Plans of life events compile into per-envelope curves (`events`), built
//! from temporal primitives (`curve`) and financial kernels (`kernel`), then
//! sampled on a grid (`compute`).

pub mod compute;
pub mod config;
pub mod curve;
pub mod display;
pub mod events;
pub mod kernel;
pub mod params;
pub mod store;
pub mod validation;

#[cfg(feature = "python")]
pub mod bindings;

pub use compute::{project, ComputationError, Evaluator, Projection, TimeGrid};
pub use config::{InflationConfig, SimulationConfig};
pub use events::{compile, CompileReport, EventError, Plan, PlanError};
pub use store::EnvelopeSet;
pub use validation::{validate, Schema, ValidationIssue};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `_core` Python module. The name marks it as the compiled half of the
/// Python package.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use bindings::python;
    m.add_class::<python::PyCompiledPlan>()?;
    m.add_function(wrap_pyfunction!(python::simulate, m)?)?;
    m.add_function(wrap_pyfunction!(python::validate_plan, m)?)?;
    m.add_function(wrap_pyfunction!(python::core_version, m)?)?;
    Ok(())
}
