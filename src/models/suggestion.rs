//! AI-generated content ideas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One idea as produced by the content generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub title: String,
    pub content: String,
    pub category: String,
    pub estimated_engagement: String,
}

/// A stored idea owned by an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSuggestion {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub estimated_engagement: String,
    pub is_saved: bool,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /api/content-suggestions/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionChanges {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,
    pub category: Option<String>,
    pub estimated_engagement: Option<String>,
    pub is_saved: Option<bool>,
    pub is_used: Option<bool>,
}

impl SuggestionChanges {
    pub(crate) fn apply(self, suggestion: &mut ContentSuggestion) {
        if let Some(v) = self.title {
            suggestion.title = v;
        }
        if let Some(v) = self.content {
            suggestion.content = v;
        }
        if let Some(v) = self.category {
            suggestion.category = v;
        }
        if let Some(v) = self.estimated_engagement {
            suggestion.estimated_engagement = v;
        }
        if let Some(v) = self.is_saved {
            suggestion.is_saved = v;
        }
        if let Some(v) = self.is_used {
            suggestion.is_used = v;
        }
    }
}
