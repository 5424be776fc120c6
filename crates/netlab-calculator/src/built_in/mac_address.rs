//! MAC Address Validator
//!
//! Six colon- or hyphen-delimited octets of two hex digits each. The separator must be
//! the same throughout, so `AA:BB-CC:DD:EE:FF` is invalid. Only the exact empty string
//! is the awaiting state; surrounding whitespace makes an address invalid.

use std::sync::LazyLock;

use netlab_types::{CalculatorResult, InputSpec, MacStatus};
use regex::Regex;

use crate::plugin::{CalculationResult, Calculator, CalculatorInputs};

/// Canonical six-octet notation with a uniform separator.
pub const MAC_PATTERN: &str =
    r"^(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$|^(?:[0-9A-Fa-f]{2}-){5}[0-9A-Fa-f]{2}$";

static MAC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MAC_PATTERN).expect("MAC_PATTERN is a valid regex"));

/// Classifies one candidate string.
pub fn classify_mac(candidate: &str) -> MacStatus {
    if candidate.is_empty() {
        MacStatus::Awaiting
    } else if MAC_REGEX.is_match(candidate) {
        MacStatus::Valid
    } else {
        MacStatus::Invalid
    }
}

/// Classification of `macString`.
pub struct MacAddressCalculator {
    inputs: [InputSpec; 1],
}

impl Default for MacAddressCalculator {
    fn default() -> Self {
        Self { inputs: [InputSpec::text("macString", "MAC address", "").with_pattern(MAC_PATTERN)] }
    }
}

impl Calculator for MacAddressCalculator {
    fn id(&self) -> &str {
        "mac_address"
    }

    fn title(&self) -> &str {
        "MAC Address Validator"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [mac] = &self.inputs;
        Ok(CalculatorResult::classification(classify_mac(inputs.text(mac)?)))
    }
}
