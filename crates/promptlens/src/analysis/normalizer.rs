//! Turning the model's free text into an [`AnalysisResult`].
//!
//! Models sometimes wrap JSON in markdown fences despite being told not to.
//! Cleanup is an ordered table of [`FenceRule`]s applied once each, followed
//! by strict JSON parsing, JSON Schema validation, and typed deserialization.
//! Any failure is a [`ParseError`]; there is no partial recovery.

use tracing::warn;

use super::result::AnalysisResult;
use crate::error::ParseError;
use crate::json_schema_for;

/// One fence-stripping step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceRule {
    /// Remove this marker if the text starts with it.
    Prefix(&'static str),
    /// Remove this marker if the text ends with it.
    Suffix(&'static str),
}

impl FenceRule {
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            FenceRule::Prefix(marker) => text.strip_prefix(marker).unwrap_or(text),
            FenceRule::Suffix(marker) => text.strip_suffix(marker).unwrap_or(text),
        }
    }
}

/// Applied in order: JSON-tagged opening fence, bare opening fence, closing fence.
pub const FENCE_RULES: &[FenceRule] = &[
    FenceRule::Prefix("```json"),
    FenceRule::Prefix("```"),
    FenceRule::Suffix("```"),
];

/// Trim, apply [`FENCE_RULES`], trim again.
pub fn strip_fences(raw: &str) -> &str {
    FENCE_RULES
        .iter()
        .fold(raw.trim(), |text, rule| rule.apply(text))
        .trim()
}

/// Parses and validates model output against the [`AnalysisResult`] schema.
///
/// Holds a compiled validator, so build one and reuse it across requests.
pub struct ResponseNormalizer {
    validator: Option<jsonschema::Validator>,
}

impl ResponseNormalizer {
    pub fn new() -> Self {
        let schema = json_schema_for::<AnalysisResult>();
        let validator = match jsonschema::validator_for(&schema) {
            Ok(v) => Some(v),
            Err(e) => {
                // Typed deserialization still enforces the shape.
                warn!("AnalysisResult schema failed to compile, skipping schema validation: {e}");
                None
            }
        };
        Self { validator }
    }

    /// Normalize the raw text of a model reply.
    pub fn normalize(&self, raw: &str) -> Result<AnalysisResult, ParseError> {
        let cleaned = strip_fences(raw);

        let value: serde_json::Value = serde_json::from_str(cleaned)
            .map_err(|e| ParseError::new(format!("invalid JSON: {e}"), raw))?;

        if let Some(validator) = &self.validator {
            let violations: Vec<String> = validator
                .iter_errors(&value)
                .map(|e| format!("  - {}: {e}", e.instance_path()))
                .collect();
            if !violations.is_empty() {
                return Err(ParseError::new(
                    format!("schema validation failed:\n{}", violations.join("\n")),
                    raw,
                ));
            }
        }

        serde_json::from_value(value)
            .map_err(|e| ParseError::new(format!("shape mismatch: {e}"), raw))
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::sample_result;

    const CANONICAL: &str = r#"{"coreIntentPrompt":"A","uiSystemPrompt":"B","componentPrompts":{"navigation":"n","hero":"h","content_sections":"c","cards_or_data":"d","footer_or_cta":"f"},"styleDna":["Minimal"],"assumptions":"none","confidenceLevel":"High confidence"}"#;

    #[test]
    fn strip_fences_rules() {
        assert_eq!(strip_fences("  {}  "), "{}");
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_fences("```json{}```"), "{}");
        assert_eq!(strip_fences("{}\n```"), "{}");
        assert_eq!(strip_fences("\n\n```json\n{\"a\":1}\n```\n\n"), "{\"a\":1}");
    }

    #[test]
    fn strip_fences_only_touches_edges() {
        let inner = "{\"code\":\"```rust\\nfn main() {}\\n```\"}";
        assert_eq!(strip_fences(inner), inner);
    }

    #[test]
    fn fence_rule_apply() {
        assert_eq!(FenceRule::Prefix("```").apply("```x"), "x");
        assert_eq!(FenceRule::Prefix("```").apply("x```"), "x```");
        assert_eq!(FenceRule::Suffix("```").apply("x```"), "x");
        assert_eq!(FenceRule::Suffix("```").apply("```x"), "```x");
    }

    #[test]
    fn plain_json_parses() {
        let normalizer = ResponseNormalizer::new();
        assert_eq!(normalizer.normalize(CANONICAL).unwrap(), sample_result());
    }

    #[test]
    fn json_fenced_round_trip() {
        let normalizer = ResponseNormalizer::new();
        let original = sample_result();
        let encoded = serde_json::to_string_pretty(&original).unwrap();
        let wrapped = format!("```json\n{encoded}\n```");
        assert_eq!(normalizer.normalize(&wrapped).unwrap(), original);
    }

    #[test]
    fn bare_fence_equivalent_to_json_fence() {
        let normalizer = ResponseNormalizer::new();
        let json_fenced = normalizer
            .normalize(&format!("```json\n{CANONICAL}\n```"))
            .unwrap();
        let bare_fenced = normalizer
            .normalize(&format!("```\n{CANONICAL}\n```"))
            .unwrap();
        assert_eq!(json_fenced, bare_fenced);
    }

    #[test]
    fn prose_is_unparsable() {
        let err = ResponseNormalizer::new().normalize("hello world").unwrap_err();
        assert_eq!(err.raw(), "hello world");
        assert!(err.reason().starts_with("invalid JSON"));
    }

    #[test]
    fn missing_fields_rejected() {
        let err = ResponseNormalizer::new()
            .normalize(r#"{"coreIntentPrompt":"x"}"#)
            .unwrap_err();
        assert!(err.reason().contains("schema validation failed"));
        assert_eq!(err.raw(), r#"{"coreIntentPrompt":"x"}"#);
    }

    #[test]
    fn missing_component_key_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(CANONICAL).unwrap();
        value["componentPrompts"]
            .as_object_mut()
            .unwrap()
            .remove("cards_or_data");
        let err = ResponseNormalizer::new()
            .normalize(&value.to_string())
            .unwrap_err();
        assert!(err.reason().contains("cards_or_data"));
    }

    #[test]
    fn wrong_types_rejected() {
        let normalizer = ResponseNormalizer::new();
        let mut value: serde_json::Value = serde_json::from_str(CANONICAL).unwrap();
        value["styleDna"] = serde_json::json!("Minimal");
        assert!(normalizer.normalize(&value.to_string()).is_err());

        let mut value: serde_json::Value = serde_json::from_str(CANONICAL).unwrap();
        value["assumptions"] = serde_json::Value::Null;
        assert!(normalizer.normalize(&value.to_string()).is_err());

        let mut value: serde_json::Value = serde_json::from_str(CANONICAL).unwrap();
        value["styleDna"] = serde_json::json!(["Minimal", 3]);
        assert!(normalizer.normalize(&value.to_string()).is_err());
    }

    #[test]
    fn strict_syntax() {
        let normalizer = ResponseNormalizer::new();
        let trailing_comma = CANONICAL.replacen("}", ",}", 1);
        assert!(normalizer.normalize(&trailing_comma).is_err());
        let commented = format!("// analysis\n{CANONICAL}");
        assert!(normalizer.normalize(&commented).is_err());
    }

    #[test]
    fn surrounding_prose_is_not_recovered() {
        let text = format!("Here is the analysis:\n{CANONICAL}");
        assert!(ResponseNormalizer::new().normalize(&text).is_err());
    }

    #[test]
    fn extra_keys_tolerated() {
        let mut value: serde_json::Value = serde_json::from_str(CANONICAL).unwrap();
        value["notes"] = serde_json::json!("extra");
        value["componentPrompts"]["sidebar"] = serde_json::json!("s");
        assert_eq!(
            ResponseNormalizer::new()
                .normalize(&value.to_string())
                .unwrap(),
            sample_result()
        );
    }
}
