//! The calculator contract and schema-checked input access.

use netlab_types::{CalculatorResult, CalculatorSpec, InputSpec, InputValue, InputValues};

use crate::error::CalculatorError;

/// Outcome of one calculator evaluation.
pub type CalculationResult = Result<CalculatorResult, CalculatorError>;

/// A trait for calculator plugins.
/// Calculators are stateless and thread-safe; `compute` must be a pure function of its inputs.
pub trait Calculator: Send + Sync {
    /// Stable identifier, e.g. `fiber_loss`.
    fn id(&self) -> &str;

    /// Human readable name.
    fn title(&self) -> &str;

    /// Field schemas in display order.
    fn inputs(&self) -> &[InputSpec];

    /// Performs the calculation.
    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult;

    /// Serializable descriptor for form rendering.
    fn spec(&self) -> CalculatorSpec {
        CalculatorSpec {
            id: self.id().to_string(),
            title: self.title().to_string(),
            inputs: self.inputs().to_vec(),
        }
    }
}

/// Schema-checked access to the raw values of one widget.
#[derive(Debug, Clone, Copy)]
pub struct CalculatorInputs<'a> {
    values: &'a InputValues,
}

impl<'a> CalculatorInputs<'a> {
    /// Wraps the raw values of one widget.
    pub fn new(values: &'a InputValues) -> Self {
        Self { values }
    }

    fn require(&self, spec: &InputSpec) -> Result<&'a InputValue, CalculatorError> {
        self.values
            .get(&spec.key)
            .ok_or_else(|| CalculatorError::invalid(&spec.key, "provided"))
    }

    /// Reads a real value and checks it against the declared bounds.
    pub fn number(&self, spec: &InputSpec) -> Result<f64, CalculatorError> {
        let value = self
            .require(spec)?
            .as_number()
            .ok_or_else(|| CalculatorError::invalid(&spec.key, "a number"))?;
        check_range(spec, value)?;
        Ok(value)
    }

    /// Reads a whole value and checks it against the declared bounds.
    pub fn integer(&self, spec: &InputSpec) -> Result<i64, CalculatorError> {
        let value = self
            .require(spec)?
            .as_integer()
            .ok_or_else(|| CalculatorError::invalid(&spec.key, "an integer"))?;
        check_range(spec, value as f64)?;
        Ok(value)
    }

    /// Reads a text value; an absent field reads as empty, the state of an untouched widget.
    pub fn text(&self, spec: &InputSpec) -> Result<&'a str, CalculatorError> {
        match self.values.get(&spec.key) {
            None => Ok(""),
            Some(value) => {
                value.as_text().ok_or_else(|| CalculatorError::invalid(&spec.key, "text"))
            }
        }
    }
}

/// Passes `value` through, or names `field` when the result overflowed to a non-finite number.
pub fn finite_result(field: &str, value: f64) -> Result<f64, CalculatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, "within the representable range"))
    }
}

fn check_range(spec: &InputSpec, value: f64) -> Result<(), CalculatorError> {
    if spec.admits(value) {
        return Ok(());
    }
    let constraint = spec.range_constraint().unwrap_or_else(|| "in range".to_string());
    Err(CalculatorError::invalid(&spec.key, constraint))
}
