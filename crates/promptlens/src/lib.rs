//! Reverse-engineer a website into the prompts that most likely produced it.
//!
//! Given a website URL or a free-text description, `promptlens` builds a
//! deterministic instruction pair, calls the Anthropic Messages API exactly
//! once, and coerces the model's free text into a fixed
//! [`AnalysisResult`](analysis::AnalysisResult): a core intent prompt, a UI
//! system prompt, five per-component prompts, style DNA descriptors,
//! assumptions, and a confidence label.
//!
//! # Getting started
//!
//! ```ignore
//! use promptlens::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|e| e.to_string())?;
//!     let client = AnthropicClient::new(api_key).map_err(|e| e.to_string())?;
//!
//!     let handler = AnalysisHandler::new(Arc::new(client), AnalysisConfig::default());
//!     let result = handler
//!         .analyze(AnalysisInput::new("url", "https://linear.app"))
//!         .await
//!         .map_err(|e| e.to_string())?;
//!
//!     println!("{}", serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?);
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Run an analysis:** [`AnalysisHandler`](analysis::AnalysisHandler) with
//!   an [`AnalysisConfig`](analysis::AnalysisConfig).
//! - **Swap the model backend:** implement [`TextModel`](model::TextModel).
//!   [`AnthropicClient`](anthropic::AnthropicClient) is the production one.
//! - **Observe a run:** implement
//!   [`EventHandler`](analysis::events::EventHandler), or compose the
//!   provided ones with
//!   [`CompositeEventHandler`](analysis::events::CompositeEventHandler).
//! - **Map failures to a boundary:** every error is an
//!   [`AnalysisError`](error::AnalysisError) with an
//!   [`ErrorClass`](error::ErrorClass) carrying its HTTP status and exit code.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | Validation, prompt composition, normalization, the handler |
//! | [`model`] | [`TextModel`](model::TextModel) seam, reply blocks, [`ModelError`](model::ModelError) |
//! | [`anthropic`] | Messages API client |
//! | [`error`] | [`AnalysisError`](error::AnalysisError), [`ErrorClass`](error::ErrorClass), [`ParseError`](error::ParseError) |
//! | [`trace`] | Request ids and cost estimates |
//! | [`logging`] | Subscriber setup for the binaries |

pub mod analysis;
pub mod anthropic;
pub mod error;
pub mod logging;
pub mod model;
pub mod prelude;
pub mod trace;

use schemars::JsonSchema;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

/// Default model for analyses.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default output token bound for the single model call.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// # Example
///
/// ```
/// use promptlens::json_schema_for;
/// use promptlens::analysis::AnalysisResult;
///
/// let schema = json_schema_for::<AnalysisResult>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"styleDna".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;

    #[test]
    fn result_schema_requires_all_fields() {
        let schema = json_schema_for::<AnalysisResult>();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in [
            "coreIntentPrompt",
            "uiSystemPrompt",
            "componentPrompts",
            "styleDna",
            "assumptions",
            "confidenceLevel",
        ] {
            assert!(required.contains(&field), "missing {field}");
        }
    }
}
