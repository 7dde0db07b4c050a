//! Per-handler analysis settings.

use std::time::Duration;

use crate::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Settings for an [`AnalysisHandler`](super::AnalysisHandler).
///
/// # Example
///
/// ```
/// use promptlens::analysis::AnalysisConfig;
/// use std::time::Duration;
///
/// let config = AnalysisConfig::default()
///     .with_model("claude-opus-4-20250514")
///     .with_max_tokens(8192)
///     .with_timeout(Duration::from_secs(90));
///
/// assert_eq!(config.max_tokens, 8192);
/// assert_eq!(config.timeout, Some(Duration::from_secs(90)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Upper bound on output tokens for the single model call. Default: 4096.
    pub max_tokens: u32,
    /// Deadline for the model call only. `None` leaves it to the client.
    pub timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set or clear the model-call deadline.
    pub fn with_timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
