//! Fiber Optic Loss Budget
//!
//! loss_dB = distance_km * attenuation + splices * splice_loss + connector_loss
//!
//! The connector term is two mated connectors at 0.5 dB each, i.e. a flat 1.0 dB.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs, finite_result};

/// Attenuation of single-mode fiber at 1310 nm, dB per km.
pub const ATTENUATION_DB_PER_KM: f64 = 0.35;
/// Loss per fusion splice, dB.
pub const SPLICE_LOSS_DB: f64 = 0.10;
/// Connectors counted in every link budget.
pub const CONNECTOR_COUNT: u32 = 2;
/// Loss per mated connector, dB.
pub const LOSS_PER_CONNECTOR_DB: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Constants of the loss budget.
pub struct FiberConstants {
    /// Fiber attenuation, dB per km
    pub attenuation_db_per_km: f64,
    /// Loss per splice, dB
    pub splice_loss_db: f64,
    /// Mated connectors in the link
    pub connector_count: u32,
    /// Loss per connector, dB
    pub loss_per_connector_db: f64,
}

impl Default for FiberConstants {
    fn default() -> Self {
        Self {
            attenuation_db_per_km: ATTENUATION_DB_PER_KM,
            splice_loss_db: SPLICE_LOSS_DB,
            connector_count: CONNECTOR_COUNT,
            loss_per_connector_db: LOSS_PER_CONNECTOR_DB,
        }
    }
}

impl FiberConstants {
    /// Fixed connector term of the budget, 1.0 dB with the defaults.
    pub fn connector_loss_db(&self) -> f64 {
        f64::from(self.connector_count) * self.loss_per_connector_db
    }
}

/// Total link loss in dB.
pub fn fiber_loss_db(
    distance_km: f64,
    splices: i64,
    constants: &FiberConstants,
) -> Result<f64, CalculatorError> {
    if distance_km.is_nan() || distance_km < 0.0 {
        return Err(CalculatorError::invalid("distanceKm", ">= 0"));
    }
    if splices < 0 {
        return Err(CalculatorError::invalid("splices", ">= 0"));
    }
    let loss = distance_km * constants.attenuation_db_per_km
        + splices as f64 * constants.splice_loss_db
        + constants.connector_loss_db();
    finite_result("distanceKm", loss)
}

/// Loss budget over `distanceKm` and `splices`.
pub struct FiberLossCalculator {
    constants: FiberConstants,
    inputs: [InputSpec; 2],
}

impl Default for FiberLossCalculator {
    fn default() -> Self {
        Self::new(FiberConstants::default())
    }
}

impl FiberLossCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: FiberConstants) -> Self {
        Self {
            constants,
            inputs: [
                InputSpec::number("distanceKm", "Distance (km)", 10.0).at_least(0.0),
                InputSpec::integer("splices", "Splices", 4).at_least(0.0),
            ],
        }
    }
}

impl Calculator for FiberLossCalculator {
    fn id(&self) -> &str {
        "fiber_loss"
    }

    fn title(&self) -> &str {
        "Fiber Optic Loss Budget"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [distance, splices] = &self.inputs;
        let loss = fiber_loss_db(inputs.number(distance)?, inputs.integer(splices)?, &self.constants)?;
        Ok(CalculatorResult::new(
            ResultValue::Number(loss),
            "dB",
            format!("{} dB", format::fixed(loss, 2)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_term_is_one_db() {
        assert_eq!(FiberConstants::default().connector_loss_db(), 1.0);
    }

    #[test]
    fn zero_length_link_is_connector_loss_only() {
        assert_eq!(fiber_loss_db(0.0, 0, &FiberConstants::default()).unwrap(), 1.0);
    }

    #[test]
    fn rejects_negative_inputs() {
        let c = FiberConstants::default();
        assert_eq!(
            fiber_loss_db(-1.0, 0, &c).unwrap_err().to_string(),
            "distanceKm must be >= 0"
        );
        assert_eq!(fiber_loss_db(1.0, -1, &c).unwrap_err().to_string(), "splices must be >= 0");
        assert!(fiber_loss_db(f64::NAN, 0, &c).is_err());
    }

    #[test]
    fn overflowing_budget_is_rejected() {
        let c = FiberConstants { attenuation_db_per_km: 10.0, ..FiberConstants::default() };
        assert_eq!(
            fiber_loss_db(f64::MAX, 0, &c).unwrap_err(),
            CalculatorError::invalid("distanceKm", "within the representable range")
        );
    }

    #[test]
    fn overridden_constants_flow_through() {
        let c = FiberConstants {
            attenuation_db_per_km: 0.25,
            splice_loss_db: 0.05,
            connector_count: 4,
            loss_per_connector_db: 0.75,
        };
        let loss = fiber_loss_db(20.0, 10, &c).unwrap();
        assert!((loss - (5.0 + 0.5 + 3.0)).abs() < 1e-9);
    }
}
