//! Power Converter: mW = 10^(dBm / 10). Defined for every real input.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs, finite_result};

/// Decibels per decade of power ratio.
pub const DECIBELS_PER_DECADE: f64 = 10.0;

/// Milliwatts for a power level in dBm.
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10f64.powf(dbm / DECIBELS_PER_DECADE)
}

/// [`dbm_to_mw`], rejecting levels too large to express in milliwatts.
pub fn checked_dbm_to_mw(dbm: f64) -> Result<f64, CalculatorError> {
    finite_result("dBm", dbm_to_mw(dbm))
}

/// Inverse of [`dbm_to_mw`].
pub fn mw_to_dbm(mw: f64) -> f64 {
    DECIBELS_PER_DECADE * mw.log10()
}

/// dBm to milliwatt conversion of `dBm`.
pub struct PowerCalculator {
    inputs: [InputSpec; 1],
}

impl Default for PowerCalculator {
    fn default() -> Self {
        Self { inputs: [InputSpec::number("dBm", "Power (dBm)", 0.0)] }
    }
}

impl Calculator for PowerCalculator {
    fn id(&self) -> &str {
        "power_dbm"
    }

    fn title(&self) -> &str {
        "dBm to mW Converter"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [dbm] = &self.inputs;
        let mw = checked_dbm_to_mw(inputs.number(dbm)?)?;
        Ok(CalculatorResult::new(ResultValue::Number(mw), "mW", format!("{} mW", format::fixed(mw, 4))))
    }
}
