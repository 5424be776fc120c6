//! Download Time Estimator
//!
//! seconds = size_gb * 8000 / speed_mbps, with 1 GB = 1000 MB = 8000 Mb.
//! Displayed in seconds below one minute, minutes below one hour, hours otherwise.

use netlab_types::{CalculatorResult, InputSpec, ResultValue};
use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;
use crate::format;
use crate::plugin::{CalculationResult, Calculator, CalculatorInputs, finite_result};

/// Decimal gigabyte expressed in megabits.
pub const MEGABITS_PER_GIGABYTE: f64 = 8000.0;
/// Below this many seconds the estimate is shown in seconds.
pub const MINUTE_BREAKPOINT_S: f64 = 60.0;
/// Below this many seconds the estimate is shown in minutes.
pub const HOUR_BREAKPOINT_S: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Unit factor and display breakpoints.
pub struct DownloadConstants {
    /// Megabits in one gigabyte
    pub megabits_per_gigabyte: f64,
    /// Seconds from which minutes are shown
    pub minute_breakpoint_s: f64,
    /// Seconds from which hours are shown
    pub hour_breakpoint_s: f64,
}

impl Default for DownloadConstants {
    fn default() -> Self {
        Self {
            megabits_per_gigabyte: MEGABITS_PER_GIGABYTE,
            minute_breakpoint_s: MINUTE_BREAKPOINT_S,
            hour_breakpoint_s: HOUR_BREAKPOINT_S,
        }
    }
}

/// Transfer time in seconds.
pub fn download_seconds(
    size_gb: f64,
    speed_mbps: f64,
    constants: &DownloadConstants,
) -> Result<f64, CalculatorError> {
    if size_gb.is_nan() || size_gb <= 0.0 {
        return Err(CalculatorError::invalid("sizeGB", "> 0"));
    }
    if speed_mbps.is_nan() || speed_mbps <= 0.0 {
        return Err(CalculatorError::invalid("speedMbps", "> 0"));
    }
    finite_result("sizeGB", size_gb * constants.megabits_per_gigabyte / speed_mbps)
}

/// `42s`, `22.2m` or `1.5h`.
pub fn format_duration(seconds: f64, constants: &DownloadConstants) -> String {
    if seconds < constants.minute_breakpoint_s {
        format!("{}s", format::fixed(seconds.round(), 0))
    } else if seconds < constants.hour_breakpoint_s {
        format!("{}m", format::fixed(seconds / 60.0, 1))
    } else {
        format!("{}h", format::fixed(seconds / 3600.0, 1))
    }
}

/// Transfer time of `sizeGB` over a `speedMbps` link.
pub struct DownloadTimeCalculator {
    constants: DownloadConstants,
    inputs: [InputSpec; 2],
}

impl Default for DownloadTimeCalculator {
    fn default() -> Self {
        Self::new(DownloadConstants::default())
    }
}

impl DownloadTimeCalculator {
    /// Builds the calculator around `constants`.
    pub fn new(constants: DownloadConstants) -> Self {
        Self {
            constants,
            inputs: [
                InputSpec::number("sizeGB", "File size (GB)", 50.0).above(0.0),
                InputSpec::number("speedMbps", "Link speed (Mbps)", 300.0).above(0.0),
            ],
        }
    }
}

impl Calculator for DownloadTimeCalculator {
    fn id(&self) -> &str {
        "download_time"
    }

    fn title(&self) -> &str {
        "Download Time Estimator"
    }

    fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    fn compute(&self, inputs: &CalculatorInputs<'_>) -> CalculationResult {
        let [size, speed] = &self.inputs;
        let size_gb = inputs.number(size)?;
        let seconds = download_seconds(size_gb, inputs.number(speed)?, &self.constants)?;
        Ok(
            CalculatorResult::new(
                ResultValue::Number(seconds),
                "s",
                format_duration(seconds, &self.constants),
            )
            .with_detail(
                "megabits",
                ResultValue::Number(size_gb * self.constants.megabits_per_gigabyte),
            ),
        )
    }
}
