//! Error types for calculator evaluation and configuration loading.

use thiserror::Error;

/// Error returned by calculator evaluation.
///
/// Every validation failure is an `InvalidInput`, naming the field and the
/// constraint it broke so the message reads like `prefixLength must be in [16,30]`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    /// A field is missing, malformed or out of range.
    #[error("{field} must be {constraint}")]
    InvalidInput {
        /// Input key, e.g. `prefixLength`
        field: String,
        /// What the value must be, e.g. `in [16,30]`
        constraint: String,
    },

    /// No calculator is registered under the id.
    #[error("calculator '{0}' not found")]
    UnknownCalculator(String),

    /// A JSON payload could not be read as input values.
    #[error("malformed calculator payload: {0}")]
    MalformedPayload(String),

    /// A result could not be serialized.
    #[error("failed to encode calculator result: {0}")]
    Encoding(String),

    /// The runtime tore down the probe task before it resolved.
    #[error("latency probe task stopped before resolving")]
    ProbeInterrupted,
}

/// Machine readable kind of a [`CalculatorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// See [`CalculatorError::InvalidInput`]
    InvalidInput,
    /// See [`CalculatorError::UnknownCalculator`]
    UnknownCalculator,
    /// See [`CalculatorError::MalformedPayload`]
    MalformedPayload,
    /// See [`CalculatorError::Encoding`]
    Encoding,
    /// See [`CalculatorError::ProbeInterrupted`]
    ProbeInterrupted,
}

impl CalculatorError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(field: &str, constraint: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.to_string(), constraint: constraint.into() }
    }

    /// Kind of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::UnknownCalculator(_) => ErrorCode::UnknownCalculator,
            Self::MalformedPayload(_) => ErrorCode::MalformedPayload,
            Self::Encoding(_) => ErrorCode::Encoding,
            Self::ProbeInterrupted => ErrorCode::ProbeInterrupted,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } | Self::MalformedPayload(_) => "input",
            Self::UnknownCalculator(_) => "registry",
            Self::Encoding(_) => "serialization",
            Self::ProbeInterrupted => "probe",
        }
    }

    /// The offending field, for input errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Error raised while loading or validating a `LabConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a `LabConfig`.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is outside the range its formula needs.
    #[error("invalid configuration for '{setting}': expected {expected}, got {actual}")]
    Invalid {
        /// Dotted setting path, e.g. `fiber.splice_loss_db`
        setting: String,
        /// Accepted values
        expected: String,
        /// Offending value
        actual: String,
    },

    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}

impl ConfigError {
    /// Shorthand for an `Invalid` error.
    pub fn invalid(setting: &str, expected: &str, actual: impl std::fmt::Display) -> Self {
        Self::Invalid {
            setting: setting.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
