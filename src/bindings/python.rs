//! python.rs
//! PyO3 facade over plan compilation and projection.
use crate::compute::{Evaluator, Projection};
use crate::config::SimulationConfig;
use crate::display::trace;
use crate::events::{compile, CompileReport, Plan, PlanError};
use crate::store::EnvelopeSet;
use crate::validation::{self, Schema};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

fn value_err(e: PlanError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_config(config_json: Option<&str>) -> PyResult<SimulationConfig> {
    match config_json {
        Some(text) => text.parse().map_err(value_err),
        None => Ok(SimulationConfig::default()),
    }
}

fn parse_plan(plan_json: &str) -> PyResult<Plan> {
    plan_json.parse().map_err(value_err)
}

fn projection_dict<'py>(py: Python<'py>, projection: &Projection) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for (name, series) in projection.iter() {
        dict.set_item(name, series.to_vec())?;
    }
    dict.set_item("days", projection.days.clone())?;
    dict.set_item("total", projection.total())?;
    Ok(dict)
}

/// A compiled plan: envelopes are built once and can be evaluated or
/// audited repeatedly.
#[pyclass(name = "_CompiledPlan")]
pub struct PyCompiledPlan {
    set: EnvelopeSet,
    report: CompileReport,
    current_time_days: Option<f64>,
}

#[pymethods]
impl PyCompiledPlan {
    #[new]
    pub fn new(plan_json: &str) -> PyResult<Self> {
        let plan = parse_plan(plan_json)?;
        let (set, report) = compile(&plan);
        Ok(Self { set, report, current_time_days: plan.current_time_days })
    }

    pub fn envelopes(&self) -> Vec<String> {
        self.set.names.clone()
    }

    /// Messages of events that were skipped.
    pub fn failures(&self) -> Vec<String> {
        self.report.failures.iter().map(|e| e.to_string()).collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.report.warnings.iter().map(|w| w.to_string()).collect()
    }

    pub fn balance_at(&self, envelope: &str, day: f64) -> PyResult<f64> {
        let id = self
            .set
            .id(envelope)
            .ok_or_else(|| PyValueError::new_err(format!("Unknown envelope '{}'", envelope)))?;
        Ok(self.set.balance_at(id, day))
    }

    pub fn net_worth_at(&self, day: f64) -> f64 {
        self.set.total_at(day)
    }

    #[pyo3(signature = (config_json=None))]
    pub fn evaluate<'py>(&self, py: Python<'py>, config_json: Option<&str>) -> PyResult<Bound<'py, PyDict>> {
        let config = parse_config(config_json)?;
        let projection = Evaluator::from_config(&self.set, &config, self.current_time_days)
            .and_then(|evaluator| evaluator.run())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        projection_dict(py, &projection)
    }

    pub fn breakdown(&self, envelope: &str, day: f64) -> String {
        trace::format_breakdown(&self.set, envelope, day)
    }
}

/// Compiles and evaluates a plan in one call.
#[pyfunction]
#[pyo3(signature = (plan_json, config_json=None))]
pub fn simulate<'py>(py: Python<'py>, plan_json: &str, config_json: Option<&str>) -> PyResult<Bound<'py, PyDict>> {
    PyCompiledPlan::new(plan_json)?.evaluate(py, config_json)
}

/// Schema issues as messages. Uses the built-in schema unless one is given.
#[pyfunction]
#[pyo3(signature = (plan_json, schema_json=None))]
pub fn validate_plan(plan_json: &str, schema_json: Option<&str>) -> PyResult<Vec<String>> {
    let plan = parse_plan(plan_json)?;
    let schema = match schema_json {
        Some(text) => text.parse::<Schema>().map_err(value_err)?,
        None => Schema::builtin(),
    };
    Ok(validation::validate(&plan, &schema).iter().map(|issue| issue.to_string()).collect())
}

#[pyfunction]
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
