//! SLA Downtime Estimator
//!
//! downtime_minutes = minutes_per_year * (100 - sla_percent) / 100
//!
//! `sla_percent` must lie in (0, 100]; an SLA of zero promises nothing and is rejected.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs};

/// 365 * 24 * 60, a non-leap year.
pub const MINUTES_PER_YEAR: f64 = 365.0 * 24.0 * 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Length of the accounting year.
pub struct SlaConstants {
    /// Minutes the SLA is measured over
    pub minutes_per_year: f64,
}

impl Default for SlaConstants {
    fn default() -> Self {
        Self { minutes_per_year: MINUTES_PER_YEAR }
    }
}

/// Permitted downtime per year in minutes.
pub fn sla_downtime_minutes(sla_percent: f64, constants: &SlaConstants) -> Result<f64, CalculatorError> {
    if sla_percent.is_nan() || sla_percent <= 0.0 || sla_percent > 100.0 {
        return Err(CalculatorError::invalid("slaPercent", "in (0,100]"));
    }
    Ok(constants.minutes_per_year * (100.0 - sla_percent) / 100.0)
}

/// Yearly downtime allowed by `slaPercent`.
pub struct SlaDowntimeCalculator {
    constants: SlaConstants,
    inputs: [InputSpec; 1],
}

impl Default for SlaDowntimeCalculator {
    fn default() -> Self {
        Self::new(SlaConstants::default())
    }
}

impl SlaDowntimeCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: SlaConstants) -> Self {
        Self {
            constants,
            inputs: [InputSpec::number("slaPercent", "SLA (%)", 99.9).above(0.0).at_most(100.0)],
        }
    }
}

impl Calculator for SlaDowntimeCalculator {
    fn id(&self) -> &str {
        "sla_downtime"
    }

    fn title(&self) -> &str {
        "SLA Downtime Estimator"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [sla] = &self.inputs;
        let minutes = sla_downtime_minutes(inputs.number(sla)?, &self.constants)?;
        Ok(CalculatorResult::new(
            ResultValue::Number(minutes),
            "min/year",
            format!("{} min/year", format::fixed(minutes, 1)),
        ))
    }
}
