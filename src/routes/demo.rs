// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo bootstrap for an empty store.

use crate::error::{Result, StoreError};
use crate::models::post::EngagementData;
use crate::models::{NewAccount, NewGoal, NewPost, PostStatus, ProfileData};
use crate::services::content::fallback_ideas;
use crate::services::password::hash_password;
use crate::time_utils::parse_calendar_date;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/init-demo", get(init_demo))
}

#[derive(Debug, Serialize)]
pub struct DemoLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct InitDemoResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<DemoLogin>,
}

impl InitDemoResponse {
    fn skipped() -> Self {
        Self {
            message: "Users already exist, skipping demo initialization".to_string(),
            login: None,
        }
    }
}

/// Seed a demo account with sample data, only if no account exists yet.
async fn init_demo(State(state): State<Arc<AppState>>) -> Result<Json<InitDemoResponse>> {
    if state.store.account_count().await > 0 {
        return Ok(Json(InitDemoResponse::skipped()));
    }

    let new_account = NewAccount {
        username: DEMO_USERNAME.to_string(),
        password_hash: hash_password(DEMO_PASSWORD)?,
        external_id: Some("demo123".to_string()),
        access_token: Some("demo-token".to_string()),
        refresh_token: Some("demo-refresh".to_string()),
        email: Some("demo@example.com".to_string()),
        full_name: Some("Sarah Johnson".to_string()),
        profile_image: Some(
            "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&w=256&q=80"
                .to_string(),
        ),
        headline: Some("Marketing Director | Brand Strategist".to_string()),
        is_connected: true,
    };

    // A concurrent request may have seeded it first.
    let account = match state.store.create_account(new_account).await {
        Ok(account) => account,
        Err(StoreError::UniqueViolation(_)) => return Ok(Json(InitDemoResponse::skipped())),
        Err(e) => return Err(e.into()),
    };
    let user_id = account.id;

    let profile_data = ProfileData::mock();
    state
        .store
        .create_profile(user_id, profile_data.clone())
        .await?;

    let goals = [
        ("Grow network by 200", 200, 130, "connections", 60),
        ("Post 4x weekly", 16, 6, "posts", 30),
    ];
    for (title, target_value, current_value, goal_type, days) in goals {
        state
            .store
            .create_goal(
                user_id,
                NewGoal {
                    title: title.to_string(),
                    target_value,
                    current_value,
                    goal_type: goal_type.to_string(),
                    end_date: Some(Utc::now() + Duration::days(days)),
                },
            )
            .await?;
    }

    state
        .store
        .create_suggestions(user_id, fallback_ideas())
        .await?;

    for recent in &profile_data.recent_posts {
        let published_at = parse_calendar_date(&recent.date);
        let media_urls = if recent.image_count > 0 {
            vec!["https://example.com/placeholder.jpg".to_string()]
        } else {
            Vec::new()
        };

        state
            .store
            .create_post(
                user_id,
                NewPost {
                    content: recent.preview.clone(),
                    post_type: "text".to_string(),
                    hashtags: ["marketing", "leadership", "branding"]
                        .iter()
                        .map(|t| t.to_string())
                        .collect(),
                    media_urls,
                    scheduled_for: None,
                    published_at,
                    status: PostStatus::Published,
                    engagement_data: Some(EngagementData {
                        impressions: recent.impressions,
                        engagement_rate: recent.engagement,
                        likes: None,
                        comments: None,
                        shares: None,
                    }),
                    linkedin_post_id: Some(format!("post-{}", recent.id)),
                },
            )
            .await?;
    }

    tracing::info!(account_id = user_id, "Demo data initialized");

    Ok(Json(InitDemoResponse {
        message: "Demo data initialized".to_string(),
        login: Some(DemoLogin {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }),
    }))
}
