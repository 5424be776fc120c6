//! Data Unit Converter
//!
//! Binary units: megabytes = gigabytes * 1024, megabits = megabytes * 8.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs, finite_result};

/// Binary megabytes per gigabyte.
pub const MEGABYTES_PER_GIGABYTE: f64 = 1024.0;
/// Bits per byte.
pub const BITS_PER_BYTE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Conversion factors.
pub struct UnitConstants {
    /// Megabytes in one gigabyte
    pub megabytes_per_gigabyte: f64,
    /// Bits in one byte
    pub bits_per_byte: f64,
}

impl Default for UnitConstants {
    fn default() -> Self {
        Self { megabytes_per_gigabyte: MEGABYTES_PER_GIGABYTE, bits_per_byte: BITS_PER_BYTE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// One size expressed in both derived units.
pub struct DataUnits {
    /// Size in megabytes
    pub megabytes: f64,
    /// Size in megabits
    pub megabits: f64,
}

/// Converts gigabytes to megabytes and megabits.
pub fn convert_data_units(gigabytes: f64, constants: &UnitConstants) -> Result<DataUnits, CalculatorError> {
    if gigabytes.is_nan() || gigabytes < 0.0 {
        return Err(CalculatorError::invalid("gigabytes", ">= 0"));
    }
    let megabytes = gigabytes * constants.megabytes_per_gigabyte;
    let megabits = finite_result("gigabytes", megabytes * constants.bits_per_byte)?;
    Ok(DataUnits { megabytes, megabits })
}

/// Data unit conversion of `gigabytes`.
pub struct DataUnitsCalculator {
    constants: UnitConstants,
    inputs: [InputSpec; 1],
}

impl Default for DataUnitsCalculator {
    fn default() -> Self {
        Self::new(UnitConstants::default())
    }
}

impl DataUnitsCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: UnitConstants) -> Self {
        Self {
            constants,
            inputs: [InputSpec::number("gigabytes", "Gigabytes", 1.0).at_least(0.0)],
        }
    }
}

impl Calculator for DataUnitsCalculator {
    fn id(&self) -> &str {
        "data_units"
    }

    fn title(&self) -> &str {
        "Data Unit Converter"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [gigabytes] = &self.inputs;
        let units = convert_data_units(inputs.number(gigabytes)?, &self.constants)?;
        let display = format!(
            "{} MB / {} Mb",
            format::grouped(units.megabytes, decimals_for(units.megabytes)),
            format::grouped(units.megabits, decimals_for(units.megabits)),
        );
        Ok(CalculatorResult::new(ResultValue::Number(units.megabytes), "MB", display)
            .with_detail("megabits", ResultValue::Number(units.megabits)))
    }
}

// Whole values read better without a trailing ".00".
fn decimals_for(value: f64) -> usize {
    if value.fract() == 0.0 { 0 } else { 2 }
}
