//! # Function Registry
//!
//! Static mapping from the symbolic function names used in tool configs to
//! the pure function implementations, plus the parameter-coercion glue
//! between the engine's scope values and each function's typed input.
//!
//! The registry is a compile-time enum rather than a runtime plugin table:
//! unknown names resolve to `None` at lookup and the engine skips them.
//! Each function declares a fixed typed output struct; [`FunctionOutput`]
//! flattens those into named result fields.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CalcError, CalcResult};
use crate::functions::bmi::{bmi_calculator, BmiInput, BmiResult, HeightUnit, WeightUnit};
use crate::functions::number_to_words::{
    number_to_words, Currency, NumberToWordsOptions, NumberToWordsResult, WordsMode,
};
use crate::functions::text_case::{text_case_converter, CaseMode, TextCaseResult};
use crate::value::CalcValue;

/// Identifier of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFunction {
    NumberToWords,
    TextCaseConverter,
    BmiCalculator,
}

static REGISTRY: Lazy<BTreeMap<&'static str, ToolFunction>> = Lazy::new(|| {
    BTreeMap::from([
        ("number_to_words", ToolFunction::NumberToWords),
        ("text_case_converter", ToolFunction::TextCaseConverter),
        ("bmi_calculator", ToolFunction::BmiCalculator),
    ])
});

impl ToolFunction {
    /// Resolve a config-supplied function name. Unknown names yield `None`;
    /// the engine skips such entries without surfacing an error.
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.get(name).copied()
    }

    /// Registry name of this function.
    pub fn name(&self) -> &'static str {
        match self {
            ToolFunction::NumberToWords => "number_to_words",
            ToolFunction::TextCaseConverter => "text_case_converter",
            ToolFunction::BmiCalculator => "bmi_calculator",
        }
    }

    /// Invoke the implementation with an engine-built parameter map.
    pub fn invoke(&self, params: &ParamMap) -> CalcResult<FunctionOutput> {
        match self {
            ToolFunction::NumberToWords => invoke_number_to_words(params),
            ToolFunction::TextCaseConverter => invoke_text_case(params),
            ToolFunction::BmiCalculator => invoke_bmi(params),
        }
    }
}

/// Parameter map handed to a function: named scope values plus typed
/// accessors doing the string/number coercion the implementations expect.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    values: BTreeMap<String, CalcValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: CalcValue) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CalcValue> {
        self.values.get(name)
    }

    /// Text rendering of a parameter (numbers formatted on the fly).
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.values.get(name).map(CalcValue::to_text)
    }

    /// Lenient float coercion of a parameter.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(CalcValue::as_f64_lenient)
    }
}

/// Typed union of all registered function outputs.
///
/// Replaces the untyped "spread the returned object into the result"
/// behavior with a fixed per-function field schema.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FunctionOutput {
    NumberToWords(NumberToWordsResult),
    TextCase(TextCaseResult),
    Bmi(BmiResult),
}

impl FunctionOutput {
    /// Flatten into named result-map fields. One invocation can report
    /// several related quantities (the BMI calculator emits nine).
    pub fn into_fields(self) -> Vec<(String, CalcValue)> {
        match self {
            FunctionOutput::NumberToWords(r) => {
                let mut fields = vec![("text_result".to_string(), CalcValue::Text(r.text_result))];
                if let Some(total) = r.calculated_total {
                    fields.push(("calculated_total".to_string(), CalcValue::Number(total)));
                }
                if let Some(vat) = r.vat_amount {
                    fields.push(("vat_amount".to_string(), CalcValue::Number(vat)));
                }
                if let Some(principal) = r.principal_amount {
                    fields.push(("principal_amount".to_string(), CalcValue::Number(principal)));
                }
                fields
            }
            FunctionOutput::TextCase(r) => {
                vec![("text_result".to_string(), CalcValue::Text(r.text_result))]
            }
            FunctionOutput::Bmi(r) => vec![
                ("bmi".to_string(), CalcValue::Number(r.bmi)),
                (
                    "bmi_status".to_string(),
                    CalcValue::Text(r.bmi_status.as_str().to_string()),
                ),
                ("bmi_prime".to_string(), CalcValue::Number(r.bmi_prime)),
                (
                    "ponderal_index".to_string(),
                    CalcValue::Number(r.ponderal_index),
                ),
                (
                    "healthy_weight_min".to_string(),
                    CalcValue::Number(r.healthy_weight_min),
                ),
                (
                    "healthy_weight_max".to_string(),
                    CalcValue::Number(r.healthy_weight_max),
                ),
                (
                    "weight_to_target".to_string(),
                    CalcValue::Number(r.weight_to_target),
                ),
                ("height_m".to_string(), CalcValue::Number(r.height_m)),
                ("weight_kg".to_string(), CalcValue::Number(r.weight_kg)),
            ],
        }
    }
}

// ============================================================================
// Parameter glue
// ============================================================================

fn invoke_number_to_words(params: &ParamMap) -> CalcResult<FunctionOutput> {
    let value = params
        .get_text("value")
        .ok_or_else(|| CalcError::missing_field("value"))?;

    let options = NumberToWordsOptions {
        mode: params
            .get_text("mode")
            .map(|m| WordsMode::from_selector(&m))
            .unwrap_or_default(),
        currency: params
            .get_text("currency")
            .map(|c| Currency::from_code(&c))
            .unwrap_or_default(),
        vat_rate: params.get_f64("vat_rate").unwrap_or(0.0),
        text_case: params
            .get_text("text_case")
            .map(|c| CaseMode::from_selector(&c))
            .unwrap_or_default(),
        language: params.get_text("language"),
    };

    number_to_words(&value, &options).map(FunctionOutput::NumberToWords)
}

fn invoke_text_case(params: &ParamMap) -> CalcResult<FunctionOutput> {
    let text = params.get_text("text").unwrap_or_default();
    let mode = params
        .get_text("mode")
        .map(|m| CaseMode::from_selector(&m))
        .unwrap_or_default();

    text_case_converter(&text, mode).map(FunctionOutput::TextCase)
}

fn invoke_bmi(params: &ParamMap) -> CalcResult<FunctionOutput> {
    let input = BmiInput {
        age: params.get_f64("age").unwrap_or(0.0),
        height_unit: params
            .get_text("height_unit")
            .map(|u| HeightUnit::from_selector(&u))
            .unwrap_or_default(),
        weight_unit: params
            .get_text("weight_unit")
            .map(|u| WeightUnit::from_selector(&u))
            .unwrap_or_default(),
        height: params.get_f64("height"),
        height_secondary: params.get_f64("height_secondary"),
        weight: params.get_f64("weight"),
    };

    bmi_calculator(&input).map(FunctionOutput::Bmi)
}
