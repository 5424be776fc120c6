//! Lookup and dispatch of calculators by id.

use std::collections::HashMap;

use netlab_types::{CalculatorSpec, InputValues};
use tracing::{debug, warn};

use crate::built_in::{
    data_units::DataUnitsCalculator, download_time::DownloadTimeCalculator,
    fiber_loss::FiberLossCalculator, mac_address::MacAddressCalculator, power::PowerCalculator,
    raid_capacity::RaidCapacityCalculator, sla_downtime::SlaDowntimeCalculator,
    subnet_hosts::SubnetHostsCalculator,
};
use crate::config::LabConfig;
use crate::error::{CalculatorError, ConfigError};
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs};

/// Calculators keyed by id, kept in registration order for form rendering.
pub struct CalculatorRegistry {
    calculators: Vec<Box<dyn Calculator>>,
    index: HashMap<String, usize>,
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::built_in(&LabConfig::default())
    }
}

impl CalculatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { calculators: Vec::new(), index: HashMap::new() }
    }

    /// All built-in calculators, wired with the constants from `config`.
    ///
    /// `config` is validated first, so hand-built tables get the same checks as loaded ones.
    pub fn with_config(config: &LabConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::built_in(config))
    }

    fn built_in(config: &LabConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(FiberLossCalculator::new(config.fiber.clone())));
        registry.register(Box::new(DownloadTimeCalculator::new(config.download.clone())));
        registry.register(Box::new(SubnetHostsCalculator::new(config.subnet.clone())));
        registry.register(Box::new(RaidCapacityCalculator::new(config.raid.clone())));
        registry.register(Box::new(SlaDowntimeCalculator::new(config.sla.clone())));
        registry.register(Box::new(DataUnitsCalculator::new(config.units.clone())));
        registry.register(Box::new(PowerCalculator::default()));
        registry.register(Box::new(MacAddressCalculator::default()));
        registry
    }

    /// Adds a calculator. Re-registering an id replaces it in place.
    pub fn register(&mut self, calculator: Box<dyn Calculator>) {
        match self.index.get(calculator.id()) {
            Some(&slot) => self.calculators[slot] = calculator,
            None => {
                self.index.insert(calculator.id().to_string(), self.calculators.len());
                self.calculators.push(calculator);
            }
        }
    }

    /// The calculator registered under `id`.
    pub fn get(&self, id: &str) -> Option<&dyn Calculator> {
        self.index.get(id).map(|&slot| self.calculators[slot].as_ref())
    }

    /// Number of registered calculators
    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Descriptors of every calculator, in registration order.
    pub fn list_calculators(&self) -> Vec<CalculatorSpec> {
        self.calculators.iter().map(|c| c.spec()).collect()
    }

    /// Evaluates calculator `calculator_id` against `values`.
    pub fn compute(&self, calculator_id: &str, values: &InputValues) -> CalculationResult {
        let Some(calculator) = self.get(calculator_id) else {
            warn!(calculator = calculator_id, "unknown calculator requested");
            return Err(CalculatorError::UnknownCalculator(calculator_id.to_string()));
        };

        let result = calculator.compute(&CalculatorInputs::new(values));
        match &result {
            Ok(r) => debug!(calculator = calculator_id, display = %r.display, "computed"),
            Err(e) => debug!(calculator = calculator_id, error = %e, "inputs rejected"),
        }
        result
    }

    /// JSON in, JSON out, for presentation layers that speak JSON natively.
    pub fn compute_json(
        &self,
        calculator_id: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, CalculatorError> {
        let values = InputValues::from_json(payload)
            .map_err(|e| CalculatorError::MalformedPayload(e.to_string()))?;
        let result = self.compute(calculator_id, &values)?;
        serde_json::to_value(result).map_err(|e| CalculatorError::Encoding(e.to_string()))
    }
}
