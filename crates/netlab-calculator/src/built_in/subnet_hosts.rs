//! IPv4 Subnet Host Count
//!
//! usable_hosts = 2^(32 - prefix) - 2, reserving the network and broadcast addresses.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs};

/// Width of an IPv4 address.
pub const IPV4_ADDRESS_BITS: u32 = 32;
/// Addresses of a subnet that cannot be assigned to hosts.
pub const RESERVED_ADDRESSES: u64 = 2;
/// Smallest prefix offered by the calculator.
pub const MIN_PREFIX: u8 = 16;
/// Largest prefix offered; /31 and /32 are outside the two-reserved-address formula.
pub const MAX_PREFIX: u8 = 30;
/// Longest prefix that still leaves a host address after the reserved ones.
pub const LONGEST_USABLE_PREFIX: u8 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Prefix window accepted by the calculator.
pub struct SubnetConstants {
    /// Shortest accepted prefix
    pub min_prefix: u8,
    /// Longest accepted prefix, capped at [`LONGEST_USABLE_PREFIX`]
    pub max_prefix: u8,
}

impl Default for SubnetConstants {
    fn default() -> Self {
        Self { min_prefix: MIN_PREFIX, max_prefix: MAX_PREFIX }
    }
}

impl SubnetConstants {
    /// Longest prefix actually accepted.
    pub fn effective_max_prefix(&self) -> u8 {
        self.max_prefix.min(LONGEST_USABLE_PREFIX)
    }

    fn constraint(&self) -> String {
        format!("in [{},{}]", self.min_prefix, self.effective_max_prefix())
    }
}

/// Usable host addresses in a subnet with the given prefix length.
pub fn subnet_usable_hosts(prefix: i64, constants: &SubnetConstants) -> Result<u64, CalculatorError> {
    if prefix < i64::from(constants.min_prefix)
        || prefix > i64::from(constants.effective_max_prefix())
    {
        return Err(CalculatorError::invalid("prefixLength", constants.constraint()));
    }
    // prefix is within 0..=30 here
    let host_bits = IPV4_ADDRESS_BITS - prefix as u32;
    Ok((1u64 << host_bits) - RESERVED_ADDRESSES)
}

/// Usable hosts for `prefixLength`.
pub struct SubnetHostsCalculator {
    constants: SubnetConstants,
    inputs: [InputSpec; 1],
}

impl Default for SubnetHostsCalculator {
    fn default() -> Self {
        Self::new(SubnetConstants::default())
    }
}

impl SubnetHostsCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: SubnetConstants) -> Self {
        let prefix = InputSpec::integer("prefixLength", "CIDR prefix", 24)
            .at_least(f64::from(constants.min_prefix))
            .at_most(f64::from(constants.effective_max_prefix()));
        Self { constants, inputs: [prefix] }
    }
}

impl Calculator for SubnetHostsCalculator {
    fn id(&self) -> &str {
        "subnet_hosts"
    }

    fn title(&self) -> &str {
        "IPv4 Subnet Hosts"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [prefix] = &self.inputs;
        let hosts = subnet_usable_hosts(inputs.integer(prefix)?, &self.constants)?;
        Ok(CalculatorResult::new(
            // at most 2^32 - 2
            ResultValue::Integer(hosts as i64),
            "hosts",
            format!("{} hosts", format::grouped_integer(hosts)),
        ))
    }
}
