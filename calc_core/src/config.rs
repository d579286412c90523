//! # Tool Configuration
//!
//! Declarative configuration for one calculator/converter tool. Configs are
//! authored once (in a content store, out of scope here) and arrive as
//! opaque JSON; they are loaded once per tool definition and reused across
//! many [`calculate`](crate::engine::calculate) invocations.
//!
//! A config declares named inputs (with optional defaults), algebraic
//! formulas over those inputs, references to registered functions with a
//! parameter-renaming map, and advisory output descriptors consumed by the
//! presentation layer.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "inputs": [
//!     { "key": "amount", "default": 1000 },
//!     { "key": "rate", "default": 5 }
//!   ],
//!   "formulas": {
//!     "interest": "amount * rate / 100"
//!   },
//!   "functions": {
//!     "amount_words": {
//!       "function": "number_to_words",
//!       "params": { "value": "amount", "mode": "words_mode" }
//!     }
//!   },
//!   "outputs": [
//!     { "key": "interest", "precision": 2 },
//!     { "key": "text_result" }
//!   ],
//!   "language": "en"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{CalcError, CalcResult};
use crate::registry::ToolFunction;
use crate::value::CalcValue;

/// One declared input field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSpec {
    /// Scope key, unique within the config
    pub key: String,

    /// Value used when the caller supplies nothing usable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<CalcValue>,
}

/// One declared output field.
///
/// Advisory only: the engine does not filter the result map by this list.
/// The presentation layer uses it for ordering and display precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Result map key this descriptor refers to
    pub key: String,

    /// Display precision hint (decimal places)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

/// A reference to a registered function with its parameter mapping.
///
/// `params` maps the function's parameter name to the scope key supplying
/// it, so configs can rename inputs freely (e.g. a tool input `height_cm`
/// feeding the BMI parameter `height`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Registry name of the function to invoke
    pub function: String,

    /// Parameter name → scope key
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Full configuration for one tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Ordered input declarations
    #[serde(default)]
    pub inputs: Vec<InputSpec>,

    /// Output key → algebraic expression over input keys
    #[serde(default)]
    pub formulas: BTreeMap<String, String>,

    /// Output key → registered function reference
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionSpec>,

    /// Ordered output descriptors (advisory)
    #[serde(default)]
    pub outputs: Vec<OutputSpec>,

    /// Locale tag threaded into functions that produce localized text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ToolConfig {
    /// Strict config-load-time check, for callers that want authoring
    /// errors surfaced instead of silently tolerated at runtime.
    ///
    /// Reports duplicate input keys and function entries naming functions
    /// absent from the registry. [`calculate`](crate::engine::calculate)
    /// itself stays permissive and skips such entries.
    pub fn check_definition(&self) -> CalcResult<()> {
        let mut seen = BTreeSet::new();
        for input in &self.inputs {
            if !seen.insert(input.key.as_str()) {
                return Err(CalcError::invalid_config(format!(
                    "duplicate input key '{}'",
                    input.key
                )));
            }
        }
        for spec in self.functions.values() {
            if ToolFunction::from_name(&spec.function).is_none() {
                return Err(CalcError::unknown_function(&spec.function));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_deserializes() {
        // Content-store JSON routinely omits formulas/functions entirely
        let config: ToolConfig = serde_json::from_str(
            r#"{ "inputs": [{ "key": "x" }], "outputs": [{ "key": "y" }] }"#,
        )
        .unwrap();
        assert!(config.formulas.is_empty());
        assert!(config.functions.is_empty());
        assert!(config.language.is_none());
    }

    #[test]
    fn test_full_config_roundtrip() {
        let config: ToolConfig = serde_json::from_str(
            r#"{
                "inputs": [
                    { "key": "amount", "default": 1000 },
                    { "key": "label", "default": "total" }
                ],
                "formulas": { "double": "amount * 2" },
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": { "value": "amount" }
                    }
                },
                "outputs": [{ "key": "double", "precision": 2 }],
                "language": "en"
            }"#,
        )
        .unwrap();
        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.inputs[0].default, Some(CalcValue::Number(1000.0)));
        assert_eq!(config.inputs[1].default, Some(CalcValue::Text("total".into())));
        assert_eq!(config.outputs[0].precision, Some(2));

        let json = serde_json::to_string(&config).unwrap();
        let roundtrip: ToolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.formulas["double"], "amount * 2");
    }

    #[test]
    fn test_check_definition_duplicate_key() {
        let config: ToolConfig = serde_json::from_str(
            r#"{ "inputs": [{ "key": "x" }, { "key": "x" }] }"#,
        )
        .unwrap();
        let err = config.check_definition().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_check_definition_unknown_function() {
        let config: ToolConfig = serde_json::from_str(
            r#"{
                "inputs": [],
                "functions": {
                    "out": { "function": "no_such_function", "params": {} }
                }
            }"#,
        )
        .unwrap();
        let err = config.check_definition().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FUNCTION");
    }

    #[test]
    fn test_check_definition_accepts_registered() {
        let config: ToolConfig = serde_json::from_str(
            r#"{
                "inputs": [{ "key": "text" }],
                "functions": {
                    "out": {
                        "function": "text_case_converter",
                        "params": { "text": "text" }
                    }
                }
            }"#,
        )
        .unwrap();
        assert!(config.check_definition().is_ok());
    }
}
