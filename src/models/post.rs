//! LinkedIn posts drafted, scheduled or published through the app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementData {
    pub impressions: u64,
    pub engagement_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub content: String,
    pub post_type: String,
    pub hashtags: Vec<String>,
    pub media_urls: Vec<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: PostStatus,
    pub engagement_data: Option<EngagementData>,
    pub linkedin_post_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[validate(length(min = 1, max = 3000, message = "must be 1-3000 characters"))]
    pub content: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub post_type: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub status: PostStatus,
    #[serde(default)]
    pub engagement_data: Option<EngagementData>,
    #[serde(default)]
    pub linkedin_post_id: Option<String>,
}

/// Body of `PUT /api/posts/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostChanges {
    #[validate(length(min = 1, max = 3000, message = "must be 1-3000 characters"))]
    pub content: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub post_type: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub media_urls: Option<Vec<String>>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
    pub engagement_data: Option<EngagementData>,
}

impl PostChanges {
    pub(crate) fn apply(self, post: &mut Post) {
        if let Some(v) = self.content {
            post.content = v;
        }
        if let Some(v) = self.post_type {
            post.post_type = v;
        }
        if let Some(v) = self.hashtags {
            post.hashtags = v;
        }
        if let Some(v) = self.media_urls {
            post.media_urls = v;
        }
        if let Some(v) = self.scheduled_for {
            post.scheduled_for = Some(v);
        }
        if let Some(v) = self.published_at {
            post.published_at = Some(v);
        }
        if let Some(v) = self.status {
            post.status = v;
        }
        if let Some(v) = self.engagement_data {
            post.engagement_data = Some(v);
        }
    }
}

/// Body of `POST /api/posts/optimize`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OptimizeRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub goal: Option<String>,
}
