//! Error taxonomy for an analysis request.
//!
//! Every failure an [`AnalysisHandler`](crate::analysis::AnalysisHandler)
//! can return is an [`AnalysisError`], and every `AnalysisError` belongs to
//! exactly one [`ErrorClass`]. Boundaries (HTTP, CLI) map the class to a
//! status code or exit code and show the `Display` text to the caller.

use thiserror::Error;

use crate::model::ModelError;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: type and value";
pub const INVALID_KIND_MESSAGE: &str = r#"Invalid type. Must be "url" or "description""#;

/// Who is at fault for a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent something unusable. The model was not called.
    InvalidInput,
    /// The model call itself failed.
    Upstream,
    /// The model answered but the answer was unusable.
    Internal,
}

impl ErrorClass {
    /// HTTP status code for this class.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorClass::InvalidInput => 400,
            ErrorClass::Upstream => 502,
            ErrorClass::Internal => 500,
        }
    }

    /// Process exit code for this class.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorClass::InvalidInput => 2,
            ErrorClass::Upstream => 3,
            ErrorClass::Internal => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::InvalidInput => "invalid_input",
            ErrorClass::Upstream => "upstream",
            ErrorClass::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The model's text could not be turned into an
/// [`AnalysisResult`](crate::analysis::AnalysisResult).
///
/// The `Display` output is fixed; the underlying reason and the raw text are
/// kept for diagnostic logging only.
#[derive(Debug, Error)]
#[error("unparsable model response")]
pub struct ParseError {
    reason: String,
    raw: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Why parsing failed (parser message or schema violations).
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The model text exactly as received, before fence stripping.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A failed analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("API Error: {0}")]
    Upstream(#[from] ModelError),
    #[error("No text content in response")]
    MissingText,
    #[error("Failed to parse analysis response")]
    UnparsableResponse(#[from] ParseError),
}

impl AnalysisError {
    pub fn missing_fields() -> Self {
        AnalysisError::InvalidInput(MISSING_FIELDS_MESSAGE.to_string())
    }

    pub fn invalid_kind() -> Self {
        AnalysisError::InvalidInput(INVALID_KIND_MESSAGE.to_string())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            AnalysisError::InvalidInput(_) => ErrorClass::InvalidInput,
            AnalysisError::Upstream(_) => ErrorClass::Upstream,
            AnalysisError::MissingText | AnalysisError::UnparsableResponse(_) => {
                ErrorClass::Internal
            }
        }
    }
}
