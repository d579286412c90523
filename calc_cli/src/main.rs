//! # calc_cli
//!
//! Terminal demo driving the calc_core engine: builds a small loan-style
//! tool configuration with a formula and a number-to-words function entry,
//! runs the pre-flight validator and `calculate`, and prints both a
//! human-readable summary and the JSON result map.

use std::io::{self, BufRead, Write};

use calc_core::engine::{calculate, validate, InputValues};
use calc_core::value::CalcValue;
use calc_core::ToolConfig;

fn prompt(text: &str, default: &str) -> String {
    print!("{}", text);
    if io::stdout().flush().is_err() {
        return default.to_string();
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default.to_string();
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn demo_config() -> ToolConfig {
    serde_json::from_str(
        r#"{
            "inputs": [
                { "key": "amount", "default": 1000 },
                { "key": "rate", "default": 5 },
                { "key": "years", "default": 1 },
                { "key": "words_mode", "default": "currency" },
                { "key": "currency_code", "default": "USD" }
            ],
            "formulas": {
                "interest": "amount * rate / 100 * years",
                "total": "amount * (1 + rate / 100 * years)"
            },
            "functions": {
                "amount_words": {
                    "function": "number_to_words",
                    "params": {
                        "value": "amount",
                        "mode": "words_mode",
                        "currency": "currency_code"
                    }
                }
            },
            "outputs": [
                { "key": "interest", "precision": 2 },
                { "key": "total", "precision": 2 },
                { "key": "text_result" }
            ],
            "language": "en"
        }"#,
    )
    .expect("demo config is valid JSON")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("calc_cli - Generic Calculation Engine Demo");
    println!("==========================================");
    println!();

    let amount = prompt("Loan amount [1000]: ", "1000");
    let rate = prompt("Interest rate % [5]: ", "5");
    let years = prompt("Term in years [1]: ", "1");

    let config = demo_config();
    let mut values = InputValues::new();
    values.insert("amount".to_string(), CalcValue::Text(amount));
    values.insert("rate".to_string(), CalcValue::Text(rate));
    values.insert("years".to_string(), CalcValue::Text(years));

    let report = validate(&config, &values);
    if !report.valid {
        println!();
        println!("Input problems:");
        for issue in &report.errors {
            println!("  - {}", issue.message);
        }
    }

    let result = calculate(&config, &values);

    println!();
    println!("═══════════════════════════════════════");
    println!("  CALCULATION RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    for output in &config.outputs {
        if let Some(value) = result.get(&output.key) {
            match (value, output.precision) {
                (CalcValue::Number(n), Some(p)) => {
                    println!("  {:<14} {:.*}", output.key, p as usize, n);
                }
                _ => println!("  {:<14} {}", output.key, value),
            }
        }
    }
    println!();
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Output (for the presentation layer):");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }
}
