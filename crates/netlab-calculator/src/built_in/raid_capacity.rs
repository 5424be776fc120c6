//! RAID-5 Usable Capacity
//!
//! usable_tb = (disk_count - parity_disks) * disk_size_tb, one disk's worth of parity.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs, finite_result};

/// Capacity given up to parity in a RAID-5 array, in disks.
pub const RAID5_PARITY_DISKS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Parity overhead of the array.
pub struct RaidConstants {
    /// Disks' worth of capacity spent on parity
    pub parity_disks: u32,
}

impl Default for RaidConstants {
    fn default() -> Self {
        Self { parity_disks: RAID5_PARITY_DISKS }
    }
}

impl RaidConstants {
    /// Smallest array that still stores data.
    pub fn min_disks(&self) -> u32 {
        self.parity_disks.saturating_add(1)
    }
}

/// Usable capacity in TB.
pub fn raid5_usable_tb(
    disk_count: i64,
    disk_size_tb: f64,
    constants: &RaidConstants,
) -> Result<f64, CalculatorError> {
    if disk_count < i64::from(constants.min_disks()) {
        return Err(CalculatorError::invalid(
            "diskCount",
            format!(">= {}", constants.min_disks()),
        ));
    }
    if disk_size_tb.is_nan() || disk_size_tb <= 0.0 {
        return Err(CalculatorError::invalid("diskSizeTB", "> 0"));
    }
    let data_disks = disk_count - i64::from(constants.parity_disks);
    finite_result("diskSizeTB", data_disks as f64 * disk_size_tb)
}

/// RAID-5 capacity over `diskCount` and `diskSizeTB`.
pub struct RaidCapacityCalculator {
    constants: RaidConstants,
    inputs: [InputSpec; 2],
}

impl Default for RaidCapacityCalculator {
    fn default() -> Self {
        Self::new(RaidConstants::default())
    }
}

impl RaidCapacityCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: RaidConstants) -> Self {
        let min_disks = f64::from(constants.min_disks());
        Self {
            constants,
            inputs: [
                InputSpec::integer("diskCount", "Disks", 4).at_least(min_disks),
                InputSpec::number("diskSizeTB", "Disk size (TB)", 2.0).above(0.0),
            ],
        }
    }
}

impl Calculator for RaidCapacityCalculator {
    fn id(&self) -> &str {
        "raid5_capacity"
    }

    fn title(&self) -> &str {
        "RAID-5 Usable Capacity"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [count, size] = &self.inputs;
        let usable = raid5_usable_tb(inputs.integer(count)?, inputs.number(size)?, &self.constants)?;
        Ok(CalculatorResult::new(
            ResultValue::Number(usable),
            "TB",
            format!("{} TB", format::compact(usable, 2)),
        ))
    }
}
