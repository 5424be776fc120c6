//! Network engineering calculators for the netlab toolbox.
//!
//! Each calculator is a pure function of its raw form inputs: fiber loss budgets,
//! download times, subnet sizes, RAID-5 capacity, SLA downtime, data unit and power
//! conversions, and MAC address classification. They share one contract, the
//! [`Calculator`] trait, and are looked up by id through a [`CalculatorRegistry`].
//!
//! The simulated ping in [`probe`] is the one stateful capability and is kept apart
//! from the pure calculators.
//!
//! ```
//! use netlab_calculator::{InputValues, compute};
//!
//! let values = InputValues::new().with("prefixLength", 24);
//! let result = compute("subnet_hosts", &values).unwrap();
//! assert_eq!(result.display, "254 hosts");
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]

use std::sync::LazyLock;

pub mod built_in;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod plugin;
pub mod probe;
pub mod registry;

pub use config::LabConfig;
pub use error::{CalculatorError, ConfigError, ErrorCode};
pub use logging::{LoggingConfig, init_logging};
pub use netlab_types::{
    CalculatorResult, CalculatorSpec, InputKind, InputSpec, InputValue, InputValues, Limit,
    MacStatus, ResultValue,
};
pub use plugin::{CalculationResult, Calculator, CalculatorInputs};
pub use probe::{LatencyProbe, LatencySample, LatencySource, ProbeHandle, ProbeState};
pub use registry::CalculatorRegistry;

/// Global calculator registry with default constants - populated on first use
static DEFAULT_REGISTRY: LazyLock<CalculatorRegistry> = LazyLock::new(CalculatorRegistry::default);

/// The registry behind [`list_calculators`] and [`compute`].
pub fn default_registry() -> &'static CalculatorRegistry {
    &DEFAULT_REGISTRY
}

/// Every available calculator with its input schema.
pub fn list_calculators() -> Vec<CalculatorSpec> {
    DEFAULT_REGISTRY.list_calculators()
}

/// Evaluates calculator `calculator_id` against `values` using the default constants.
pub fn compute(calculator_id: &str, values: &InputValues) -> CalculationResult {
    DEFAULT_REGISTRY.compute(calculator_id, values)
}

/// JSON form of [`compute`]: a JSON object of field values in, the serialized result out.
pub fn compute_json(
    calculator_id: &str,
    payload: &serde_json::Value,
) -> Result<serde_json::Value, CalculatorError> {
    DEFAULT_REGISTRY.compute_json(calculator_id, payload)
}
