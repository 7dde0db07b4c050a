//! Inbound request types and validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// What the analysis subject is.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Description,
}

impl InputKind {
    /// Wire form: `"url"` or `"description"`.
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Url => "url",
            InputKind::Description => "description",
        }
    }

    /// Human-readable label substituted into the analysis prompt.
    pub fn label(self) -> &'static str {
        match self {
            InputKind::Url => "Website URL",
            InputKind::Description => "Website Description",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = AnalysisError;

    /// Exact, case-sensitive match on the wire form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(InputKind::Url),
            "description" => Ok(InputKind::Description),
            _ => Err(AnalysisError::invalid_kind()),
        }
    }
}

/// Raw, unvalidated request as it arrives on the wire.
///
/// `type` is the wire name of the kind field; `kind` is accepted as an
/// alias. Both fields are optional here so that absence is reported as an
/// [`AnalysisError::InvalidInput`] rather than a decoding failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisInput {
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl AnalysisInput {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            value: Some(value.into()),
        }
    }

    /// Validate into an [`AnalysisRequest`].
    ///
    /// Missing fields (or a blank value) are checked before the kind, so a
    /// request with both problems reports the missing-fields message.
    pub fn validate(self) -> Result<AnalysisRequest, AnalysisError> {
        let (kind, value) = match (self.kind, self.value) {
            (Some(kind), Some(value)) if !kind.is_empty() && !value.trim().is_empty() => {
                (kind, value)
            }
            _ => return Err(AnalysisError::missing_fields()),
        };
        let kind: InputKind = kind.parse()?;
        AnalysisRequest::new(kind, value)
    }
}

/// A validated analysis request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    kind: InputKind,
    value: String,
}

impl AnalysisRequest {
    /// Build a request, rejecting a value that is empty after trimming.
    ///
    /// The value is stored as given; trimming is only used for the check.
    pub fn new(kind: InputKind, value: impl Into<String>) -> Result<Self, AnalysisError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AnalysisError::missing_fields());
        }
        Ok(Self { kind, value })
    }

    pub fn url(value: impl Into<String>) -> Result<Self, AnalysisError> {
        Self::new(InputKind::Url, value)
    }

    pub fn description(value: impl Into<String>) -> Result<Self, AnalysisError> {
        Self::new(InputKind::Description, value)
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
