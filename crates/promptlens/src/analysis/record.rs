//! Storage shape for a completed analysis.
//!
//! Nothing in this crate persists records; the type fixes the row layout a
//! storage backend is expected to use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::{AnalysisRequest, InputKind};
use super::result::AnalysisResult;

/// A stored analysis: the request, the result, and bookkeeping columns.
///
/// Bookkeeping columns are snake_case; the flattened result keeps its
/// camelCase field names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input_type: InputKind,
    pub input_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl AnalysisRecord {
    /// A fresh, private record with a new id and zero views.
    pub fn new(request: &AnalysisRequest, analysis: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            input_type: request.kind(),
            input_value: request.value().to_string(),
            user_id: None,
            is_public: false,
            view_count: 0,
            analysis,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}
