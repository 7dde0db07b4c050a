//! The model collaborator: the one outbound call an analysis makes.
//!
//! [`TextModel`] is the seam between the analysis pipeline and whatever
//! produces text. [`AnthropicClient`](crate::anthropic::AnthropicClient) is
//! the production implementation; tests substitute stubs that record calls
//! and return canned replies.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Boxed future returned by [`TextModel::complete`].
///
/// Type alias to keep trait signatures and implementations readable.
pub type ModelFuture<'a> = Pin<Box<dyn Future<Output = Result<ModelReply, ModelError>> + Send + 'a>>;

/// A text-generation backend invoked once per analysis.
///
/// Uses a boxed future so that the trait is dyn-compatible and can be held
/// as `Arc<dyn TextModel>` by the [`AnalysisHandler`](crate::analysis::AnalysisHandler).
///
/// # Example
///
/// ```ignore
/// struct CannedModel(String);
///
/// impl TextModel for CannedModel {
///     fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> ModelFuture<'a> {
///         Box::pin(async move { Ok(ModelReply::text(self.0.clone())) })
///     }
/// }
/// ```
pub trait TextModel: Send + Sync {
    /// Send one completion request and return the model's reply.
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> ModelFuture<'a>;
}

/// Everything the collaborator needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

// ── Reply ──────────────────────────────────────────────────────────

/// A typed content block in a model reply.
///
/// Only `text` blocks are consumed by the analysis pipeline. Block types
/// this crate does not know about deserialize as [`ContentBlock::Other`].
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// Convenience constructor for a text block.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Token usage reported by the model.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// The model's reply: an ordered sequence of content blocks.
///
/// `content` is required; a body without it is not a reply.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ModelReply {
    /// A reply consisting of a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            ..Default::default()
        }
    }

    /// The first `text` block, if any. Later text blocks are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }

    /// Number of `text` blocks in the reply.
    pub fn text_block_count(&self) -> usize {
        self.content
            .iter()
            .filter(|b| matches!(b, ContentBlock::Text { .. }))
            .count()
    }
}

// ── Errors ─────────────────────────────────────────────────────────

/// Failure of the model call itself, as opposed to a successful call whose
/// text cannot be parsed.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request never completed (DNS, connect, TLS, body read).
    #[error("request failed: {0}")]
    Transport(String),
    /// The call exceeded the configured deadline.
    #[error("model call timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    /// The API rejected the credential (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The API rejected the call for quota or rate reasons (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The call succeeded at the HTTP level but the body was not a reply.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ModelError {
    /// The HTTP status associated with this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ModelError::Auth(_) => Some(401),
            ModelError::RateLimited(_) => Some(429),
            ModelError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_deserializes_known_and_unknown_blocks() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "abc"},
                {"type": "server_tool_use", "id": "x", "name": "web_search"},
                {"type": "text", "text": "{}"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 34}
        }"#;
        let reply: ModelReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.content.len(), 3);
        assert_eq!(reply.content[1], ContentBlock::Other);
        assert_eq!(reply.first_text(), Some("{}"));
        assert_eq!(reply.usage.unwrap().total(), 46);
        assert_eq!(reply.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn reply_requires_content() {
        assert!(serde_json::from_str::<ModelReply>("{}").is_err());
        assert!(serde_json::from_str::<ModelReply>(r#"{"id":"x","type":"message"}"#).is_err());
        let empty: ModelReply = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(empty.content.is_empty());
    }

    #[test]
    fn usage_total_saturates() {
        let usage = Usage {
            input_tokens: u32::MAX,
            output_tokens: 10,
        };
        assert_eq!(usage.total(), u32::MAX);
    }

    #[test]
    fn first_text_skips_non_text_blocks() {
        let reply = ModelReply {
            content: vec![
                ContentBlock::Thinking {
                    thinking: "plan".into(),
                },
                ContentBlock::text("first"),
                ContentBlock::text("second"),
            ],
            ..Default::default()
        };
        assert_eq!(reply.first_text(), Some("first"));
        assert_eq!(reply.text_block_count(), 2);
    }

    #[test]
    fn first_text_none_without_text_blocks() {
        let reply = ModelReply {
            content: vec![ContentBlock::Other],
            ..Default::default()
        };
        assert!(reply.first_text().is_none());
        assert!(ModelReply::default().first_text().is_none());
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(ModelError::Auth("bad key".into()).status(), Some(401));
        assert_eq!(ModelError::RateLimited("slow down".into()).status(), Some(429));
        assert_eq!(
            ModelError::Status {
                status: 529,
                message: "overloaded".into()
            }
            .status(),
            Some(529)
        );
        assert_eq!(ModelError::Transport("reset".into()).status(), None);
    }

    #[test]
    fn timeout_display_reports_seconds() {
        let err = ModelError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "model call timed out after 1.5s");
    }
}
