//! Convenience re-exports for common `promptlens` types.
//!
//! ```ignore
//! use promptlens::prelude::*;
//! ```

// ── Core types ──────────────────────────────────────────────────────
pub use crate::anthropic::{AnthropicClient, ClientConfig};
pub use crate::error::{AnalysisError, ErrorClass, ParseError};
pub use crate::model::{CompletionRequest, ModelError, ModelFuture, ModelReply, TextModel};
pub use crate::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, json_schema_for};

// ── Analysis ────────────────────────────────────────────────────────
pub use crate::analysis::{
    AnalysisConfig, AnalysisHandler, AnalysisInput, AnalysisRequest, AnalysisResult,
    ComponentPrompts, Confidence, InputKind,
};

// ── Events ──────────────────────────────────────────────────────────
pub use crate::analysis::{
    AnalysisEvent, CompositeEventHandler, EventHandler, FnEventHandler, LoggingHandler,
    NoopHandler,
};
