//! # Error Types
//!
//! Structured error types for calc_core. Errors carry enough context to be
//! rendered to a user, logged, or handled programmatically by the
//! presentation layer, and they serialize cleanly to JSON.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_age(age: f64) -> CalcResult<()> {
//!     if !(2.0..=120.0).contains(&age) {
//!         return Err(CalcError::invalid_input(
//!             "age",
//!             age.to_string(),
//!             "Age must be between 2 and 120",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine and function operations.
///
/// Each variant provides specific context about what went wrong. The engine
/// itself never propagates these to its caller; they surface through
/// `tracing` events and through the strict config check.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A function entry names a function not present in the registry
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Formula expression failed to parse or evaluate
    #[error("Formula '{output_key}' failed: {reason}")]
    FormulaFailed { output_key: String, reason: String },

    /// A registered function raised during execution
    #[error("Function '{function}' failed: {reason}")]
    FunctionFailed { function: String, reason: String },

    /// Configuration is malformed (duplicate keys, bad references)
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        CalcError::UnknownFunction { name: name.into() }
    }

    /// Create a FormulaFailed error
    pub fn formula_failed(output_key: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FormulaFailed {
            output_key: output_key.into(),
            reason: reason.into(),
        }
    }

    /// Create a FunctionFailed error
    pub fn function_failed(function: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FunctionFailed {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        CalcError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownFunction { .. } => "UNKNOWN_FUNCTION",
            CalcError::FormulaFailed { .. } => "FORMULA_FAILED",
            CalcError::FunctionFailed { .. } => "FUNCTION_FAILED",
            CalcError::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }
}
