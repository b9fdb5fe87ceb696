//! Per-account profile metrics shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Engagement counters for the activity widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    pub profile_views: u64,
    pub post_impressions: u64,
    pub new_connections: u64,
    pub engagement_rate: f64,
}

/// One profile improvement tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSuggestion {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub impact: String,
    pub description: String,
}

/// Summary row for a recently published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub id: u32,
    pub preview: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_count: u32,
    pub date: String,
    pub impressions: u64,
    pub impression_change: i64,
    pub engagement: f64,
    pub engagement_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub score: u32,
    pub activity: ActivityMetrics,
    pub suggestions: Vec<ProfileSuggestion>,
    pub recent_posts: Vec<RecentPost>,
}

impl ProfileData {
    /// Empty metrics seeded for a freshly connected account.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixed sample dataset for the demo account and dashboard fallback.
    pub fn mock() -> Self {
        let suggestion = |id, kind: &str, title: &str, impact: &str, description: &str| {
            ProfileSuggestion {
                id,
                kind: kind.to_string(),
                title: title.to_string(),
                impact: impact.to_string(),
                description: description.to_string(),
            }
        };
        let recent = |id, preview: &str, image_count, date: &str, impressions, ic, eng, ec| {
            RecentPost {
                id,
                preview: preview.to_string(),
                kind: "Text post".to_string(),
                image_count,
                date: date.to_string(),
                impressions,
                impression_change: ic,
                engagement: eng,
                engagement_change: ec,
            }
        };

        Self {
            score: 76,
            activity: ActivityMetrics {
                profile_views: 127,
                post_impressions: 4300,
                new_connections: 28,
                engagement_rate: 3.7,
            },
            suggestions: vec![
                suggestion(
                    1,
                    "headline",
                    "Enhance Your Headline",
                    "High impact, low effort",
                    "Your headline is missing keywords that recruiters search for. Add 2-3 industry-specific terms.",
                ),
                suggestion(
                    2,
                    "projects",
                    "Add Featured Projects",
                    "Medium impact, medium effort",
                    "Showcase your work by adding 2-3 featured projects with visual content to increase profile visits.",
                ),
                suggestion(
                    3,
                    "engagement",
                    "Engage with Industry Posts",
                    "Medium impact, low effort",
                    "Your comment engagement is lower than average. Comment on 3-5 trending posts in your industry this week.",
                ),
            ],
            recent_posts: vec![
                recent(
                    1,
                    "5 Key Marketing Trends for Q3 2023 - What Every CMO Needs...",
                    1,
                    "2023-06-24",
                    2452,
                    18,
                    4.2,
                    0.8,
                ),
                recent(
                    2,
                    "Excited to announce my latest project with @TechInnovators...",
                    0,
                    "2023-06-18",
                    1821,
                    -5,
                    3.1,
                    -0.4,
                ),
                recent(
                    3,
                    "Professional development tip: The one networking mistake...",
                    1,
                    "2023-06-12",
                    3677,
                    42,
                    5.8,
                    2.1,
                ),
            ],
        }
    }
}

/// Stored profile record (one per account).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: u64,
    pub user_id: u64,
    pub profile_data: ProfileData,
    pub profile_score: u32,
    pub last_updated: DateTime<Utc>,
}

/// Body of `PUT /api/profile`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    pub profile_data: Option<ProfileData>,
    #[validate(range(max = 100, message = "must be between 0 and 100"))]
    pub profile_score: Option<u32>,
}
