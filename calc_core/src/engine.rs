//! # Calculation Engine
//!
//! The orchestrator: given a [`ToolConfig`] and raw input values, builds a
//! computation scope (defaulting, empty-value handling), evaluates the
//! config's algebraic formulas, invokes its registered functions, and
//! merges everything into one flat result map.
//!
//! The same `calculate` runs on the server (worked examples for static
//! pages) and behind interactive widgets, which is the whole point: both
//! must see bit-identical results for identical inputs.
//!
//! ## Failure isolation
//!
//! `calculate` never propagates per-entry failures. A broken formula logs
//! and yields `0`; a failing function logs and contributes no fields;
//! sibling entries keep computing. One broken formula must not blank an
//! entire page of worked examples.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

use crate::config::ToolConfig;
use crate::expression;
use crate::registry::{ParamMap, ToolFunction};
use crate::value::CalcValue;

/// Raw caller-supplied input values, keyed by input key.
pub type InputValues = BTreeMap<String, CalcValue>;

/// Flat output of one `calculate` call, keyed by output field name.
pub type ResultMap = BTreeMap<String, CalcValue>;

/// Build the computation scope for one call: the supplied value if present
/// and non-empty, otherwise the declared default, otherwise absent.
///
/// Keys with neither stay out of the scope entirely (not zero-filled);
/// formulas and functions must tolerate their absence.
pub fn build_scope(config: &ToolConfig, inputs: &InputValues) -> BTreeMap<String, CalcValue> {
    let mut scope = BTreeMap::new();
    for spec in &config.inputs {
        match inputs.get(&spec.key) {
            Some(value) if !value.is_empty() => {
                scope.insert(spec.key.clone(), value.clone());
            }
            _ => {
                if let Some(default) = &spec.default {
                    scope.insert(spec.key.clone(), default.clone());
                }
            }
        }
    }
    scope
}

/// Run one calculation: formulas first scope-wise, then function entries,
/// all merged into a flat result map.
///
/// # Example
/// ```rust
/// use std::collections::BTreeMap;
/// use calc_core::config::ToolConfig;
/// use calc_core::engine::calculate;
/// use calc_core::value::CalcValue;
///
/// let config: ToolConfig = serde_json::from_str(r#"{
///     "inputs": [
///         { "key": "amount", "default": 1000 },
///         { "key": "rate", "default": 5 }
///     ],
///     "formulas": { "interest": "amount * rate / 100" },
///     "outputs": [{ "key": "interest", "precision": 2 }]
/// }"#).unwrap();
///
/// let result = calculate(&config, &BTreeMap::new());
/// assert_eq!(result["interest"], CalcValue::Number(50.0));
/// ```
pub fn calculate(config: &ToolConfig, inputs: &InputValues) -> ResultMap {
    let scope = build_scope(config, inputs);
    let mut result = ResultMap::new();

    if !config.formulas.is_empty() {
        // Formulas see a numeric-only view of the scope; values that fail
        // to coerce read as zero
        let numeric_scope: BTreeMap<String, f64> = scope
            .iter()
            .map(|(key, value)| (key.clone(), value.as_f64_lenient().unwrap_or(0.0)))
            .collect();

        for (output_key, formula) in &config.formulas {
            let value = match expression::evaluate(formula, &numeric_scope) {
                Ok(v) if v.is_finite() => v,
                Ok(v) => {
                    error!(
                        output_key = %output_key,
                        formula = %formula,
                        value = v,
                        "formula produced a non-finite result"
                    );
                    0.0
                }
                Err(e) => {
                    error!(
                        output_key = %output_key,
                        formula = %formula,
                        error = %e,
                        "formula evaluation failed"
                    );
                    0.0
                }
            };
            result.insert(output_key.clone(), CalcValue::Number(value));
        }
    }

    for (output_key, spec) in &config.functions {
        // Config-authoring errors, not runtime errors: skip quietly
        let Some(function) = ToolFunction::from_name(&spec.function) else {
            continue;
        };

        let mut params = ParamMap::new();
        if let Some(language) = &config.language {
            params.insert("language", CalcValue::Text(language.clone()));
        }
        for (param_name, input_key) in &spec.params {
            let Some(value) = scope.get(input_key) else {
                continue;
            };
            // The VAT rate is the one declared-numeric parameter; everything
            // else passes through for the callee to interpret
            let value = if param_name == "vat_rate" {
                CalcValue::Number(value.as_f64_lenient().unwrap_or(0.0))
            } else {
                value.clone()
            };
            params.insert(param_name.clone(), value);
        }

        match function.invoke(&params) {
            Ok(output) => {
                for (field, value) in output.into_fields() {
                    result.insert(field, value);
                }
            }
            Err(e) => {
                error!(
                    output_key = %output_key,
                    function = function.name(),
                    error = %e,
                    "function invocation failed"
                );
            }
        }
    }

    result
}

// ============================================================================
// Pre-flight validation
// ============================================================================

/// Machine-readable classification of one validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    /// No usable value supplied and the config declares no default
    MissingRequired,
    /// A value is present but does not coerce to a finite number
    InvalidNumber,
}

/// One pre-flight issue for one input key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub key: String,
    pub code: ValidationCode,
    pub message: String,
}

/// Outcome of [`validate`], serializing as `{ "valid": ..., "errors": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Pre-flight input check, independent of [`calculate`] (which stays
/// permissive regardless).
///
/// Emits exactly one issue per offending input, in declaration order.
/// Note the numeric check applies to every declared input, including ones
/// that are semantically text (mode selectors, free text for the case
/// converter); callers with such configs should skip this check for those
/// tools.
pub fn validate(config: &ToolConfig, inputs: &InputValues) -> ValidationReport {
    let mut errors = Vec::new();

    for spec in &config.inputs {
        let supplied = inputs.get(&spec.key).filter(|v| !v.is_empty());
        let effective = supplied.or(spec.default.as_ref());

        match effective {
            None => errors.push(ValidationIssue {
                key: spec.key.clone(),
                code: ValidationCode::MissingRequired,
                message: format!("missing required input '{}'", spec.key),
            }),
            Some(value) => {
                if !value.as_f64_lenient().is_some_and(f64::is_finite) {
                    errors.push(ValidationIssue {
                        key: spec.key.clone(),
                        code: ValidationCode::InvalidNumber,
                        message: format!("input '{}' is not a valid number", spec.key),
                    });
                }
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> ToolConfig {
        serde_json::from_str(json).unwrap()
    }

    fn inputs(pairs: &[(&str, CalcValue)]) -> InputValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_formula_with_defaults() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "amount", "default": 1000 },
                    { "key": "rate", "default": 5 }
                ],
                "formulas": { "interest": "amount * rate / 100" }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["interest"], CalcValue::Number(50.0));
    }

    #[test]
    fn test_supplied_value_overrides_default() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 1 }],
                "formulas": { "y": "x * 10" }
            }"#,
        );
        let result = calculate(&config, &inputs(&[("x", CalcValue::Text("4".into()))]));
        assert_eq!(result["y"], CalcValue::Number(40.0));
    }

    #[test]
    fn test_empty_string_falls_back_to_default() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 7 }],
                "formulas": { "y": "x" }
            }"#,
        );
        let result = calculate(&config, &inputs(&[("x", CalcValue::Text("  ".into()))]));
        assert_eq!(result["y"], CalcValue::Number(7.0));
    }

    #[test]
    fn test_broken_formula_yields_zero_and_siblings_survive() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 3 }],
                "formulas": {
                    "bad": "x +* 2",
                    "good": "x * 2"
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["bad"], CalcValue::Number(0.0));
        assert_eq!(result["good"], CalcValue::Number(6.0));
    }

    #[test]
    fn test_non_finite_formula_yields_zero() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 1 }],
                "formulas": { "y": "x / 0.0" }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["y"], CalcValue::Number(0.0));
    }

    #[test]
    fn test_wrong_arity_helper_call_yields_zero() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 5 }],
                "formulas": {
                    "clamped": "clamp(x, 0)",
                    "good": "x + 1"
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["clamped"], CalcValue::Number(0.0));
        assert_eq!(result["good"], CalcValue::Number(6.0));
    }

    #[test]
    fn test_out_of_scope_variable_reads_zero() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": 5 }],
                "formulas": { "y": "x + never_declared" }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["y"], CalcValue::Number(5.0));
    }

    #[test]
    fn test_non_numeric_scope_value_coerces_to_zero() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x", "default": "hello" }],
                "formulas": { "y": "x + 1" }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["y"], CalcValue::Number(1.0));
    }

    #[test]
    fn test_unknown_function_silently_skipped() {
        let config = config(
            r#"{
                "inputs": [],
                "functions": {
                    "out": { "function": "definitely_not_registered", "params": {} }
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_function_with_renamed_params() {
        // The config input "raw_number" feeds the function parameter "value"
        let config = config(
            r#"{
                "inputs": [{ "key": "raw_number", "default": 21 }],
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": { "value": "raw_number" }
                    }
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["text_result"], CalcValue::Text("twenty-one".into()));
    }

    #[test]
    fn test_function_failure_contributes_nothing_but_formulas_run() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "age", "default": 999 },
                    { "key": "h", "default": 1.8 },
                    { "key": "w", "default": 72.9 }
                ],
                "formulas": { "doubled": "w * 2" },
                "functions": {
                    "bmi": {
                        "function": "bmi_calculator",
                        "params": { "age": "age", "height": "h", "weight": "w" }
                    }
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert!(!result.contains_key("bmi"));
        assert!(!result.contains_key("bmi_status"));
        assert_eq!(result["doubled"], CalcValue::Number(145.8));
    }

    #[test]
    fn test_multi_field_function_merge() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "age", "default": 30 },
                    { "key": "height", "default": 1.8 },
                    { "key": "weight", "default": 72.9 },
                    { "key": "height_unit", "default": "m" },
                    { "key": "weight_unit", "default": "kg" }
                ],
                "functions": {
                    "bmi": {
                        "function": "bmi_calculator",
                        "params": {
                            "age": "age",
                            "height": "height",
                            "weight": "weight",
                            "height_unit": "height_unit",
                            "weight_unit": "weight_unit"
                        }
                    }
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["bmi"], CalcValue::Number(22.5));
        assert_eq!(result["bmi_status"], CalcValue::Text("normal".into()));
        assert_eq!(result["healthy_weight_max"], CalcValue::Number(81.0));
    }

    #[test]
    fn test_language_injection_localizes_vat_clause() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "amount", "default": 100 },
                    { "key": "mode", "default": "currency_vat" },
                    { "key": "cur", "default": "RUB" },
                    { "key": "vat", "default": 20 }
                ],
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": {
                            "value": "amount",
                            "mode": "mode",
                            "currency": "cur",
                            "vat_rate": "vat"
                        }
                    }
                },
                "language": "ru"
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        let text = result["text_result"].to_text();
        assert!(text.contains("в том числе ндс"), "got: {text}");
    }

    #[test]
    fn test_undeclared_inputs_never_reach_scope() {
        let config = config(
            r#"{
                "inputs": [{ "key": "amount", "default": 21 }],
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": { "value": "amount", "mode": "mode" }
                    }
                }
            }"#,
        );
        // "mode" arrives in the raw inputs but is not a declared input key,
        // so the parameter stays absent and the default words mode applies
        let mut values = InputValues::new();
        values.insert("mode".to_string(), CalcValue::Text("currency".into()));
        let result = calculate(&config, &values);
        assert_eq!(result["text_result"], CalcValue::Text("twenty-one".into()));
    }

    #[test]
    fn test_ruble_declension_through_engine() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "amount", "default": 21 },
                    { "key": "mode", "default": "currency" },
                    { "key": "cur", "default": "RUB" }
                ],
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": {
                            "value": "amount",
                            "mode": "mode",
                            "currency": "cur"
                        }
                    }
                },
                "language": "ru"
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        let text = result["text_result"].to_text();
        assert!(text.contains("рубль"), "got: {text}");
    }

    #[test]
    fn test_vat_rate_coercion() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "amount", "default": 100 },
                    { "key": "mode", "default": "currency_vat" },
                    { "key": "vat", "default": "20%" }
                ],
                "functions": {
                    "words": {
                        "function": "number_to_words",
                        "params": {
                            "value": "amount",
                            "mode": "mode",
                            "vat_rate": "vat"
                        }
                    }
                }
            }"#,
        );
        // "20%" coerces to 20.0 through the vat_rate special case
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["vat_amount"], CalcValue::Number(20.0));
        assert_eq!(result["calculated_total"], CalcValue::Number(120.0));
    }

    #[test]
    fn test_idempotence() {
        let config = config(
            r#"{
                "inputs": [
                    { "key": "x", "default": 12 },
                    { "key": "text", "default": "hello world" },
                    { "key": "mode", "default": "Title Case" }
                ],
                "formulas": { "squared": "x * x" },
                "functions": {
                    "cased": {
                        "function": "text_case_converter",
                        "params": { "text": "text", "mode": "mode" }
                    }
                }
            }"#,
        );
        let first = calculate(&config, &BTreeMap::new());
        let second = calculate(&config, &BTreeMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_calculate_never_panics_on_hostile_config() {
        let config = config(
            r#"{
                "inputs": [{ "key": "x" }],
                "formulas": {
                    "a": "",
                    "b": ")))(((",
                    "c": "x / 0"
                },
                "functions": {
                    "f": { "function": "bmi_calculator", "params": {} },
                    "g": { "function": "ghost", "params": { "p": "x" } }
                }
            }"#,
        );
        let result = calculate(&config, &BTreeMap::new());
        assert_eq!(result["a"], CalcValue::Number(0.0));
        assert_eq!(result["b"], CalcValue::Number(0.0));
        assert_eq!(result["c"], CalcValue::Number(0.0));
    }

    // ------------------------------------------------------------------
    // validate
    // ------------------------------------------------------------------

    #[test]
    fn test_validate_all_supplied() {
        let config = config(r#"{ "inputs": [{ "key": "x" }, { "key": "y" }] }"#);
        let report = validate(
            &config,
            &inputs(&[
                ("x", CalcValue::Number(1.0)),
                ("y", CalcValue::Text("2.5".into())),
            ]),
        );
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_validate_missing_required() {
        let config = config(
            r#"{ "inputs": [{ "key": "x" }, { "key": "y", "default": 3 }] }"#,
        );
        let report = validate(&config, &BTreeMap::new());
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].key, "x");
        assert_eq!(report.errors[0].code, ValidationCode::MissingRequired);
    }

    #[test]
    fn test_validate_invalid_number() {
        let config = config(r#"{ "inputs": [{ "key": "x" }] }"#);
        let report = validate(&config, &inputs(&[("x", CalcValue::Text("abc".into()))]));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, ValidationCode::InvalidNumber);
    }

    #[test]
    fn test_validate_one_error_per_input_no_duplicates() {
        let config = config(
            r#"{ "inputs": [{ "key": "a" }, { "key": "b" }, { "key": "c" }] }"#,
        );
        let report = validate(
            &config,
            &inputs(&[
                ("a", CalcValue::Text("oops".into())),
                ("c", CalcValue::Number(1.0)),
            ]),
        );
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].key, "a");
        assert_eq!(report.errors[1].key, "b");
        assert_eq!(report.errors[1].code, ValidationCode::MissingRequired);
    }

    #[test]
    fn test_validate_flags_semantically_textual_inputs() {
        // Deliberate quirk: the numeric check applies even to text inputs
        let config = config(r#"{ "inputs": [{ "key": "text" }] }"#);
        let report = validate(
            &config,
            &inputs(&[("text", CalcValue::Text("hello world".into()))]),
        );
        assert!(!report.valid);
        assert_eq!(report.errors[0].code, ValidationCode::InvalidNumber);
    }

    #[test]
    fn test_validate_report_json_shape() {
        let config = config(r#"{ "inputs": [{ "key": "x" }] }"#);
        let report = validate(&config, &BTreeMap::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], serde_json::json!(false));
        assert_eq!(json["errors"][0]["code"], serde_json::json!("missing_required"));
    }
}
