//! # Scope Values
//!
//! [`CalcValue`] is the value type flowing through the engine: inputs arrive
//! from forms or URL parameters as strings or numbers, and results leave as
//! numbers or localized text. The untagged serde representation keeps the
//! JSON clean (`42.5` or `"forty-two"`), matching how configurations and
//! results travel to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scope or result value: a number or a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalcValue {
    /// Numeric value
    Number(f64),
    /// Textual value
    Text(String),
}

impl CalcValue {
    /// True for text values that are empty or whitespace-only.
    ///
    /// Empty form fields must not shadow a configured default, so the
    /// engine treats them as "not supplied".
    pub fn is_empty(&self) -> bool {
        match self {
            CalcValue::Number(_) => false,
            CalcValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Coerce to f64 with parseFloat semantics: the longest numeric prefix
    /// (sign, digits, decimal point, scientific exponent) is parsed and the
    /// rest ignored. Returns `None` if no numeric prefix exists.
    ///
    /// ```rust
    /// use calc_core::value::CalcValue;
    ///
    /// assert_eq!(CalcValue::Text("12.5kg".into()).as_f64_lenient(), Some(12.5));
    /// assert_eq!(CalcValue::Text("abc".into()).as_f64_lenient(), None);
    /// ```
    pub fn as_f64_lenient(&self) -> Option<f64> {
        match self {
            CalcValue::Number(n) => Some(*n),
            CalcValue::Text(s) => parse_float_prefix(s.trim()),
        }
    }

    /// Borrow the text content, rendering numbers on the fly.
    pub fn to_text(&self) -> String {
        match self {
            CalcValue::Number(n) => format_number(*n),
            CalcValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CalcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcValue::Number(n) => write!(f, "{}", format_number(*n)),
            CalcValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for CalcValue {
    fn from(n: f64) -> Self {
        CalcValue::Number(n)
    }
}

impl From<&str> for CalcValue {
    fn from(s: &str) -> Self {
        CalcValue::Text(s.to_string())
    }
}

impl From<String> for CalcValue {
    fn from(s: String) -> Self {
        CalcValue::Text(s)
    }
}

/// Render a number without a trailing `.0` for whole values.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Parse the longest float prefix of `s`, parseFloat-style.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only consumed if complete
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
