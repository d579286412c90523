//! # Registered Pure Functions
//!
//! The function library behind the registry. Each module follows the same
//! pattern:
//!
//! - typed options/input struct (JSON-serializable)
//! - typed result struct (JSON-serializable)
//! - a pure function `f(input) -> CalcResult<Result>`
//!
//! ## Available Functions
//!
//! - [`number_to_words`] - decimal numbers to words/check/currency phrasing
//! - [`text_case`] - six string case transforms
//! - [`bmi`] - BMI and derived health metrics

pub mod bmi;
pub mod number_to_words;
pub mod text_case;

// Re-export commonly used types
pub use bmi::{bmi_calculator, BmiInput, BmiResult, BmiStatus};
pub use number_to_words::{number_to_words, NumberToWordsOptions, NumberToWordsResult};
pub use text_case::{text_case_converter, CaseMode, TextCaseResult};
