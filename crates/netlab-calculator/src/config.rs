//! Constants tables for every calculator, loadable from TOML.
//!
//! ```toml
//! [fiber]
//! attenuation_db_per_km = 0.25
//!
//! [probe]
//! delay_ms = 500
//! ```
//!
//! Missing sections and keys keep their defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::built_in::data_units::UnitConstants;
use crate::built_in::download_time::DownloadConstants;
use crate::built_in::fiber_loss::FiberConstants;
use crate::built_in::raid_capacity::RaidConstants;
use crate::built_in::sla_downtime::SlaConstants;
use crate::built_in::subnet_hosts::{LONGEST_USABLE_PREFIX, SubnetConstants};
use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::probe::ProbeConstants;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "NETLAB_CONFIG_PATH";
/// Configuration file read when `NETLAB_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "netlab.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Every tunable of the library, one section per calculator.
pub struct LabConfig {
    /// `[fiber]`
    pub fiber: FiberConstants,
    /// `[download]`
    pub download: DownloadConstants,
    /// `[subnet]`
    pub subnet: SubnetConstants,
    /// `[raid]`
    pub raid: RaidConstants,
    /// `[sla]`
    pub sla: SlaConstants,
    /// `[units]`
    pub units: UnitConstants,
    /// `[probe]`
    pub probe: ProbeConstants,
    /// `[logging]`
    pub logging: LoggingConfig,
}

impl LabConfig {
    /// Loads the file named by `NETLAB_CONFIG_PATH`, or `netlab.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// A missing file yields the defaults; unreadable or invalid files are errors.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_toml_str(&contents)?;
                info!(path = %path.display(), "loaded calculator configuration");
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io { path: path.display().to_string(), source }),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every constant against the range its formula needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fiber = &self.fiber;
        non_negative("fiber.attenuation_db_per_km", fiber.attenuation_db_per_km)?;
        non_negative("fiber.splice_loss_db", fiber.splice_loss_db)?;
        non_negative("fiber.loss_per_connector_db", fiber.loss_per_connector_db)?;

        let download = &self.download;
        positive("download.megabits_per_gigabyte", download.megabits_per_gigabyte)?;
        positive("download.minute_breakpoint_s", download.minute_breakpoint_s)?;
        if download.hour_breakpoint_s.is_nan()
            || download.hour_breakpoint_s <= download.minute_breakpoint_s
        {
            return Err(ConfigError::invalid(
                "download.hour_breakpoint_s",
                "a value above download.minute_breakpoint_s",
                download.hour_breakpoint_s,
            ));
        }

        let subnet = &self.subnet;
        if subnet.min_prefix == 0
            || subnet.min_prefix > subnet.max_prefix
            || subnet.max_prefix > LONGEST_USABLE_PREFIX
        {
            return Err(ConfigError::invalid(
                "subnet",
                "1 <= min_prefix <= max_prefix <= 30",
                format!("{}..={}", subnet.min_prefix, subnet.max_prefix),
            ));
        }

        if self.raid.parity_disks == 0 {
            return Err(ConfigError::invalid("raid.parity_disks", "at least 1", 0));
        }

        positive("sla.minutes_per_year", self.sla.minutes_per_year)?;
        positive("units.megabytes_per_gigabyte", self.units.megabytes_per_gigabyte)?;
        positive("units.bits_per_byte", self.units.bits_per_byte)?;

        let probe = &self.probe;
        if probe.min_latency_ms > probe.max_latency_ms {
            return Err(ConfigError::invalid(
                "probe.max_latency_ms",
                "a value >= probe.min_latency_ms",
                probe.max_latency_ms,
            ));
        }
        Ok(())
    }
}

fn non_negative(setting: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(setting, "a finite value >= 0", value))
    }
}

fn positive(setting: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(setting, "a finite value > 0", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(LabConfig::from_toml_str("").unwrap(), LabConfig::default());
        assert!(LabConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = LabConfig::from_toml_str(
            r#"
            [fiber]
            attenuation_db_per_km = 0.25

            [probe]
            delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.fiber.attenuation_db_per_km, 0.25);
        assert_eq!(config.fiber.splice_loss_db, 0.10);
        assert_eq!(config.probe.delay_ms, 250);
        assert_eq!(config.probe.max_latency_ms, 80);
        assert_eq!(config.subnet, SubnetConstants::default());
    }

    #[test]
    fn rejects_nonsense() {
        let err = LabConfig::from_toml_str("[fiber]\nsplice_loss_db = -0.1\n").unwrap_err();
        assert!(err.to_string().contains("fiber.splice_loss_db"));

        assert!(LabConfig::from_toml_str("[subnet]\nmax_prefix = 31\n").is_err());
        assert!(LabConfig::from_toml_str("[subnet]\nmin_prefix = 28\nmax_prefix = 24\n").is_err());
        assert!(LabConfig::from_toml_str("[raid]\nparity_disks = 0\n").is_err());
        assert!(LabConfig::from_toml_str("[download]\nhour_breakpoint_s = 30.0\n").is_err());
        assert!(
            LabConfig::from_toml_str("[probe]\nmin_latency_ms = 90\nmax_latency_ms = 80\n").is_err()
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(LabConfig::from_toml_str("[fiber"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let path = std::env::temp_dir().join(format!("netlab-config-{}.toml", std::process::id()));
        fs::write(&path, "[sla]\nminutes_per_year = 527040.0\n").unwrap();
        let config = LabConfig::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.sla.minutes_per_year, 527_040.0);

        let missing = LabConfig::load_from(&path).unwrap();
        assert_eq!(missing, LabConfig::default());
    }
}
