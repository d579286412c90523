//! # Number-to-Words
//!
//! Converts a decimal number into natural-language words, check-writing
//! format, or currency phrasing, with optional VAT breakdown.
//!
//! The integer part is handled as an arbitrary-length digit string, so
//! inputs far beyond f64 precision (including scientific notation such as
//! `1e100`) spell out correctly. Group scale words are named up to
//! "nonillion"; beyond that magnitude the scale word is simply omitted
//! rather than erroring.
//!
//! The phrase is assembled fully lowercase; the requested case transform is
//! applied as a cosmetic post-processing step and never alters wording.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::functions::text_case::{apply_case, CaseMode};

/// Output mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordsMode {
    /// Plain words, e.g. "one hundred twenty-three point four five"
    #[default]
    Words,
    /// Check-writing, e.g. "one hundred and 45/100 dollars"
    CheckWriting,
    /// Currency phrasing, e.g. "one dollar and zero cents"
    Currency,
    /// Currency phrasing of the VAT-inclusive total plus a VAT clause
    CurrencyVat,
}

impl WordsMode {
    /// Parse a selector string; unknown selectors fall back to plain words.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "check_writing" => WordsMode::CheckWriting,
            "currency" => WordsMode::Currency,
            "currency_vat" => WordsMode::CurrencyVat,
            _ => WordsMode::Words,
        }
    }
}

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "PLN")]
    Pln,
    #[serde(rename = "RUB")]
    Rub,
}

impl Currency {
    /// Parse a currency code; unknown codes fall back to USD.
    pub fn from_code(code: &str) -> Self {
        match code {
            "GBP" => Currency::Gbp,
            "EUR" => Currency::Eur,
            "PLN" => Currency::Pln,
            "RUB" => Currency::Rub,
            _ => Currency::Usd,
        }
    }
}

/// Options for [`number_to_words`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumberToWordsOptions {
    #[serde(default)]
    pub mode: WordsMode,
    #[serde(default)]
    pub currency: Currency,
    /// VAT percentage, consulted only in `currency_vat` mode
    #[serde(default)]
    pub vat_rate: f64,
    #[serde(default)]
    pub text_case: CaseMode,
    /// Locale tag; `ru` switches the VAT clause phrasing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Output of [`number_to_words`]. The VAT fields are present only in
/// `currency_vat` mode with a positive rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberToWordsResult {
    pub text_result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_amount: Option<f64>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Sign, integer digits, and fraction digits of a parsed decimal.
#[derive(Debug, Clone, PartialEq)]
struct ParsedNumber {
    negative: bool,
    /// Integer digits without leading zeros ("0" for zero)
    integer: String,
    /// Fraction digits as written (may carry trailing zeros, may be empty)
    fraction: String,
}

impl ParsedNumber {
    fn is_one(&self) -> bool {
        !self.negative && self.integer == "1"
    }

    /// Fraction as a two-digit quantity (first two digits, right-padded)
    fn fraction_hundredths(&self) -> u32 {
        let mut digits: String = self.fraction.chars().take(2).collect();
        while digits.len() < 2 {
            digits.push('0');
        }
        digits.parse().unwrap_or(0)
    }

    fn has_nonzero_fraction(&self) -> bool {
        self.fraction.chars().any(|c| c != '0')
    }

    /// Approximate f64 value, used by the VAT path
    fn to_f64(&self) -> f64 {
        let text = format!(
            "{}{}.{}",
            if self.negative { "-" } else { "" },
            self.integer,
            if self.fraction.is_empty() { "0" } else { &self.fraction }
        );
        text.parse().unwrap_or(0.0)
    }
}

/// Largest scientific-notation exponent magnitude accepted by the parser.
const MAX_EXPONENT: u32 = 10_000;

/// Parse a raw decimal string: strips thousands separators, expands
/// scientific notation by shifting the decimal point through the digit
/// string, splits sign/integer/fraction. Exponents beyond [`MAX_EXPONENT`]
/// in magnitude are rejected as invalid input.
fn parse_decimal(raw: &str) -> CalcResult<ParsedNumber> {
    let invalid = || CalcError::invalid_input("value", raw, "not a decimal number");

    // Thousands separators arrive as commas or spaces from form fields
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != ' ').collect();
    let mut rest = cleaned.as_str();

    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(pos) => {
            let exp: i32 = rest[pos + 1..].parse().map_err(|_| invalid())?;
            // Point shifting allocates one digit per exponent step, so a
            // runaway exponent must be rejected before it allocates
            if exp.unsigned_abs() > MAX_EXPONENT {
                return Err(invalid());
            }
            (&rest[..pos], exp)
        }
        None => (rest, 0),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    // Shift the decimal point by the exponent through the combined digits
    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent as i64;

    let (integer, fraction) = if point <= 0 {
        let pad = "0".repeat((-point) as usize);
        ("0".to_string(), format!("{pad}{digits}"))
    } else if point as usize >= digits.len() {
        let pad = "0".repeat(point as usize - digits.len());
        (format!("{digits}{pad}"), String::new())
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    };

    let integer = integer.trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };

    // All-zero is never negative
    let is_zero = integer == "0" && fraction.chars().all(|c| c == '0');

    Ok(ParsedNumber {
        negative: negative && !is_zero,
        integer: integer.to_string(),
        fraction,
    })
}

// ============================================================================
// Integer and fraction wording
// ============================================================================

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Group scale words, rightmost group first. Groups beyond nonillion carry
/// no scale word.
const SCALES: [&str; 11] = [
    "", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion",
    "sextillion", "septillion", "octillion", "nonillion",
];

/// Words for 1..=999.
fn three_digits_to_words(n: u32) -> String {
    debug_assert!((1..=999).contains(&n));
    let mut parts = Vec::new();
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        if rest < 20 {
            parts.push(ONES[rest as usize].to_string());
        } else {
            let tens = TENS[(rest / 10) as usize];
            let ones = rest % 10;
            if ones > 0 {
                parts.push(format!("{}-{}", tens, ONES[ones as usize]));
            } else {
                parts.push(tens.to_string());
            }
        }
    }
    parts.join(" ")
}

/// Words for an arbitrary-length digit string.
fn integer_to_words(digits: &str) -> String {
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return "zero".to_string();
    }

    // Split into three-digit groups from the right
    let bytes = digits.as_bytes();
    let group_count = bytes.len().div_ceil(3);
    let mut parts = Vec::with_capacity(group_count);
    for group_index in (0..group_count).rev() {
        let end = bytes.len() - group_index * 3;
        let start = end.saturating_sub(3);
        let value: u32 = digits[start..end].parse().unwrap_or(0);
        if value == 0 {
            continue;
        }
        let words = three_digits_to_words(value);
        if group_index > 0 && group_index < SCALES.len() {
            parts.push(format!("{} {}", words, SCALES[group_index]));
        } else {
            parts.push(words);
        }
    }
    parts.join(" ")
}

/// Per-digit reading of a fraction, e.g. "25" -> "two five".
fn fraction_digit_words(fraction: &str) -> String {
    fraction
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| ONES[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Currency wording
// ============================================================================

struct CurrencyNouns {
    singular: &'static str,
    plural: &'static str,
    frac_singular: &'static str,
    frac_plural: &'static str,
}

fn currency_nouns(currency: Currency) -> CurrencyNouns {
    match currency {
        Currency::Usd => CurrencyNouns {
            singular: "dollar",
            plural: "dollars",
            frac_singular: "cent",
            frac_plural: "cents",
        },
        Currency::Gbp => CurrencyNouns {
            singular: "pound",
            plural: "pounds",
            frac_singular: "penny",
            frac_plural: "pence",
        },
        Currency::Eur => CurrencyNouns {
            singular: "euro",
            plural: "euros",
            frac_singular: "cent",
            frac_plural: "cents",
        },
        Currency::Pln => CurrencyNouns {
            singular: "zloty",
            plural: "zlotys",
            frac_singular: "grosz",
            frac_plural: "groszy",
        },
        Currency::Rub => CurrencyNouns {
            singular: "ruble",
            plural: "rubles",
            frac_singular: "kopek",
            frac_plural: "kopeks",
        },
    }
}

/// Russian three-form declension keyed by the last digits of the count:
/// ...11-19 take the many-form, ...1 the one-form, ...2-4 the few-form,
/// everything else the many-form.
fn russian_declension<'a>(last_two: u32, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let mod100 = last_two % 100;
    let mod10 = last_two % 10;
    if (11..=19).contains(&mod100) {
        many
    } else {
        match mod10 {
            1 => one,
            2..=4 => few,
            _ => many,
        }
    }
}

/// Last two digits of a digit string as a number.
fn last_two_digits(digits: &str) -> u32 {
    let start = digits.len().saturating_sub(2);
    digits[start..].parse().unwrap_or(0)
}

/// Main currency noun for an integer amount. Rubles decline by Russian
/// grammar; every other currency pluralizes English-style on exactly one.
fn main_unit_noun(currency: Currency, integer_digits: &str) -> &'static str {
    if currency == Currency::Rub {
        return russian_declension(
            last_two_digits(integer_digits),
            "рубль",
            "рубля",
            "рублей",
        );
    }
    let nouns = currency_nouns(currency);
    if integer_digits == "1" {
        nouns.singular
    } else {
        nouns.plural
    }
}

/// Fractional-unit noun for a 0..=99 amount.
fn fractional_unit_noun(currency: Currency, hundredths: u32) -> &'static str {
    if currency == Currency::Rub {
        return russian_declension(hundredths, "копейка", "копейки", "копеек");
    }
    let nouns = currency_nouns(currency);
    if hundredths == 1 {
        nouns.frac_singular
    } else {
        nouns.frac_plural
    }
}

// ============================================================================
// Phrase assembly
// ============================================================================

/// Convert a decimal string to words.
///
/// # Example
/// ```rust
/// use calc_core::functions::number_to_words::{
///     number_to_words, NumberToWordsOptions, WordsMode, Currency,
/// };
///
/// let options = NumberToWordsOptions {
///     mode: WordsMode::Currency,
///     currency: Currency::Usd,
///     ..Default::default()
/// };
/// let result = number_to_words("1", &options).unwrap();
/// assert_eq!(result.text_result, "one dollar and zero cents");
/// ```
pub fn number_to_words(
    value: &str,
    options: &NumberToWordsOptions,
) -> CalcResult<NumberToWordsResult> {
    let mut parsed = parse_decimal(value)?;

    let mut calculated_total = None;
    let mut vat_amount = None;
    let mut principal_amount = None;

    // VAT mode spells out the VAT-inclusive total, not the original input
    if options.mode == WordsMode::CurrencyVat && options.vat_rate > 0.0 {
        let principal = parsed.to_f64();
        let vat = principal * options.vat_rate / 100.0;
        let total = principal + vat;
        principal_amount = Some(round2(principal));
        vat_amount = Some(round2(vat));
        calculated_total = Some(round2(total));
        parsed = parse_decimal(&format!("{total:.2}"))?;
    }

    let mut phrase = String::new();
    if parsed.negative {
        phrase.push_str("minus ");
    }
    phrase.push_str(&integer_to_words(&parsed.integer));

    match options.mode {
        WordsMode::Words => {
            if parsed.has_nonzero_fraction() {
                phrase.push_str(" point ");
                phrase.push_str(&fraction_digit_words(&parsed.fraction));
            }
        }
        WordsMode::CheckWriting => {
            let noun = main_unit_noun(options.currency, &parsed.integer);
            if parsed.has_nonzero_fraction() {
                phrase.push_str(&format!(
                    " and {:02}/100 {}",
                    parsed.fraction_hundredths(),
                    noun
                ));
            } else {
                phrase.push(' ');
                phrase.push_str(noun);
            }
        }
        WordsMode::Currency | WordsMode::CurrencyVat => {
            phrase.push(' ');
            phrase.push_str(main_unit_noun(options.currency, &parsed.integer));
            let hundredths = parsed.fraction_hundredths();
            phrase.push_str(" and ");
            phrase.push_str(&integer_to_words(&hundredths.to_string()));
            phrase.push(' ');
            phrase.push_str(fractional_unit_noun(options.currency, hundredths));

            if let Some(vat) = vat_amount {
                phrase.push_str(&vat_clause(vat, options));
            }
        }
    }

    Ok(NumberToWordsResult {
        text_result: apply_case(&phrase, options.text_case),
        calculated_total,
        vat_amount,
        principal_amount,
    })
}

/// Trailing clause spelling out the VAT amount and rate, localized.
fn vat_clause(vat: f64, options: &NumberToWordsOptions) -> String {
    let parsed = match parse_decimal(&format!("{vat:.2}")) {
        Ok(p) => p,
        Err(_) => return String::new(),
    };
    let hundredths = parsed.fraction_hundredths();
    let amount_words = format!(
        "{} {} and {} {}",
        integer_to_words(&parsed.integer),
        main_unit_noun(options.currency, &parsed.integer),
        integer_to_words(&hundredths.to_string()),
        fractional_unit_noun(options.currency, hundredths),
    );
    let rate = format_rate(options.vat_rate);
    if options.language.as_deref() == Some("ru") {
        format!(", в том числе ндс ({rate}%) - {amount_words}")
    } else {
        format!(", including vat ({rate}%) - {amount_words}")
    }
}

/// Render the rate without a trailing `.0` for whole percentages.
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{}", rate as i64)
    } else {
        format!("{rate}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
