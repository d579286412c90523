//! # Text-Case Converter
//!
//! Applies one of six case transforms to a string. Locale-agnostic: the
//! transforms operate on Unicode letters via the standard case mappings.
//!
//! `Random case` is intentionally non-deterministic per call; everything
//! else is a pure function of its input.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// Case transform selector.
///
/// The serde names match the selector values the widget configs use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseMode {
    #[default]
    #[serde(rename = "lowercase")]
    Lowercase,
    #[serde(rename = "UPPERCASE")]
    Uppercase,
    #[serde(rename = "Title Case")]
    TitleCase,
    #[serde(rename = "Sentence case")]
    SentenceCase,
    #[serde(rename = "Alternating case")]
    AlternatingCase,
    #[serde(rename = "Random case")]
    RandomCase,
}

impl CaseMode {
    /// Parse a selector string; unknown selectors fall back to lowercase,
    /// matching the permissive handling of config-authored values.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "UPPERCASE" => CaseMode::Uppercase,
            "Title Case" => CaseMode::TitleCase,
            "Sentence case" => CaseMode::SentenceCase,
            "Alternating case" => CaseMode::AlternatingCase,
            "Random case" => CaseMode::RandomCase,
            _ => CaseMode::Lowercase,
        }
    }
}

/// Output of the text-case converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCaseResult {
    /// The transformed text
    pub text_result: String,
}

/// Apply a case transform to `text`.
///
/// Empty or whitespace-only input returns an empty result without error.
pub fn text_case_converter(text: &str, mode: CaseMode) -> CalcResult<TextCaseResult> {
    if text.trim().is_empty() {
        return Ok(TextCaseResult {
            text_result: String::new(),
        });
    }
    Ok(TextCaseResult {
        text_result: apply_case(text, mode),
    })
}

/// The raw transform, shared with number-to-words post-processing.
pub fn apply_case(text: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Lowercase => text.to_lowercase(),
        CaseMode::Uppercase => text.to_uppercase(),
        CaseMode::TitleCase => title_case(text),
        CaseMode::SentenceCase => sentence_case(text),
        CaseMode::AlternatingCase => alternating_case(text),
        CaseMode::RandomCase => random_case(text),
    }
}

/// First letter of each whitespace-delimited token capitalized, rest lowered.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            word_start = true;
            out.push(c);
        } else if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
                word_start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowered text with the first letter after each `.` `!` `?` capitalized.
/// The very first letter is always capitalized, so text without any
/// sentence-ending punctuation gets exactly one capital.
fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    for c in text.chars() {
        if matches!(c, '.' | '!' | '?') {
            capitalize_next = true;
            out.push(c);
        } else if c.is_alphabetic() {
            if capitalize_next {
                out.extend(c.to_uppercase());
                capitalize_next = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Alternate lower/upper per letter, starting lowercase. Non-letters pass
/// through without consuming an alternation slot.
fn alternating_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut index = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            if index % 2 == 0 {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            index += 1;
        } else {
            out.push(c);
        }
    }
    out
}

/// Each letter independently and uniformly upper/lowered. Non-deterministic.
fn random_case(text: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphabetic() {
            if rng.gen::<bool>() {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_uppercase() {
        assert_eq!(apply_case("HeLLo", CaseMode::Lowercase), "hello");
        assert_eq!(apply_case("hello", CaseMode::Uppercase), "HELLO");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(apply_case("hello world", CaseMode::TitleCase), "Hello World");
        assert_eq!(
            apply_case("MIXED case INPUT", CaseMode::TitleCase),
            "Mixed Case Input"
        );
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(
            apply_case("HELLO. world.", CaseMode::SentenceCase),
            "Hello. World."
        );
        assert_eq!(
            apply_case("one! two? three.", CaseMode::SentenceCase),
            "One! Two? Three."
        );
    }

    #[test]
    fn test_sentence_case_without_punctuation() {
        // Only the very first character is capitalized
        assert_eq!(
            apply_case("no punctuation HERE", CaseMode::SentenceCase),
            "No punctuation here"
        );
    }

    #[test]
    fn test_alternating_case() {
        assert_eq!(apply_case("hello", CaseMode::AlternatingCase), "hElLo");
        // Non-letters do not consume an alternation slot
        assert_eq!(apply_case("a-b-c-d", CaseMode::AlternatingCase), "a-B-c-D");
    }

    #[test]
    fn test_random_case_preserves_letters() {
        // Non-deterministic by design: assert only case-insensitive identity
        let result = apply_case("hello world", CaseMode::RandomCase);
        assert_eq!(result.to_lowercase(), "hello world");
    }

    #[test]
    fn test_empty_input() {
        let result = text_case_converter("   ", CaseMode::TitleCase).unwrap();
        assert_eq!(result.text_result, "");
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(CaseMode::from_selector("Title Case"), CaseMode::TitleCase);
        assert_eq!(CaseMode::from_selector("unknown"), CaseMode::Lowercase);
    }
}
