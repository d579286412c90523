//! # calc_core - Generic Calculation Engine
//!
//! `calc_core` powers calculator/converter widgets from declarative JSON
//! configurations: named inputs with defaults, algebraic formulas, and
//! references to registered pure functions. The same engine runs on the
//! server (worked examples for static pages) and behind interactive
//! widgets, guaranteeing identical output in both places.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: one `calculate` call is a pure, synchronous computation
//! - **JSON-First**: configs and results serialize cleanly for the content
//!   store and the presentation layer
//! - **Degrade per field**: a broken formula or failing function logs and
//!   yields a default instead of blanking the whole result
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use calc_core::config::ToolConfig;
//! use calc_core::engine::calculate;
//!
//! let config: ToolConfig = serde_json::from_str(r#"{
//!     "inputs": [{ "key": "amount", "default": 42 }],
//!     "functions": {
//!         "words": {
//!             "function": "number_to_words",
//!             "params": { "value": "amount" }
//!         }
//!     },
//!     "outputs": [{ "key": "text_result" }]
//! }"#).unwrap();
//!
//! let result = calculate(&config, &BTreeMap::new());
//! assert_eq!(result["text_result"].to_text(), "forty-two");
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Declarative tool configuration (content-store JSON)
//! - [`engine`] - `calculate` / `validate` orchestration
//! - [`expression`] - Algebraic formula evaluation
//! - [`registry`] - Name-to-function dispatch and parameter glue
//! - [`functions`] - The pure function library
//! - [`units`] - Body-measurement unit newtypes
//! - [`value`] - The string-or-number scope value type
//! - [`errors`] - Structured error types

pub mod config;
pub mod engine;
pub mod errors;
pub mod expression;
pub mod functions;
pub mod registry;
pub mod units;
pub mod value;

// Re-export commonly used types at crate root for convenience
pub use config::{FunctionSpec, InputSpec, OutputSpec, ToolConfig};
pub use engine::{calculate, validate, InputValues, ResultMap, ValidationReport};
pub use errors::{CalcError, CalcResult};
pub use value::CalcValue;
