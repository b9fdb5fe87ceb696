// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.
//!
//! Every record is owned by one account. Handlers load the record first,
//! answer 404 if it is missing and 403 if it belongs to someone else.

use crate::error::{AppError, ProviderError, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::models::profile::ActivityMetrics;
use crate::models::{
    ContentSuggestion, Goal, GoalChanges, NewGoal, NewPost, OptimizeRequest, Post, PostChanges,
    Profile, ProfileChanges, ProfileData, SuggestionChanges,
};
use crate::routes::MessageResponse;
use crate::services::{normalize, NormalizedProfile, OptimizedPost};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;

/// API routes (require an authenticated session).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/{provider}/profile", get(get_provider_profile))
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/scheduled", get(list_scheduled_posts))
        .route("/api/posts/optimize", post(optimize_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}", put(update_goal).delete(delete_goal))
        .route(
            "/api/content-suggestions",
            get(list_suggestions),
        )
        .route(
            "/api/content-suggestions/generate",
            post(generate_suggestions),
        )
        .route("/api/content-suggestions/{id}", put(update_suggestion))
        .route("/api/analytics/overview", get(analytics_overview))
}

/// Parse a numeric path id.
fn parse_id(raw: &str, what: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}

/// Reject access to another account's record.
fn ensure_owner(owner_id: u64, user: &AuthUser) -> Result<()> {
    if owner_id == user.id() {
        Ok(())
    } else {
        tracing::warn!(
            account_id = user.id(),
            owner_id,
            "Access to another account's record denied"
        );
        Err(AppError::Forbidden)
    }
}

// ─── Provider Profile ────────────────────────────────────────

/// Live profile from the identity provider, fetched with the stored token.
async fn get_provider_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(provider_name): Path<String>,
) -> Result<Json<NormalizedProfile>> {
    let provider = state
        .provider(&provider_name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider {}", provider_name)))?;

    let access_token = user
        .account
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("No provider access token found".to_string()))?;

    let raw = provider.fetch_profile(access_token).await?;
    let profile = normalize(&raw).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    Ok(Json(profile))
}

// ─── Profile ─────────────────────────────────────────────────

/// Profile metrics, seeded with the sample dataset on first view.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    let profile = match state.store.get_profile(user.id()).await? {
        Some(profile) => profile,
        None => {
            tracing::debug!(account_id = user.id(), "Seeding sample profile metrics");
            state
                .store
                .create_profile(user.id(), ProfileData::mock())
                .await?
        }
    };

    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(changes): ValidJson<ProfileChanges>,
) -> Result<Json<Profile>> {
    // Returns the existing record when there is one.
    state
        .store
        .create_profile(user.id(), ProfileData::empty())
        .await?;
    let profile = state.store.update_profile(user.id(), changes).await?;

    Ok(Json(profile))
}

// ─── Posts ───────────────────────────────────────────────────

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Post>>> {
    Ok(Json(state.store.list_posts(user.id()).await?))
}

async fn list_scheduled_posts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Post>>> {
    Ok(Json(state.store.list_scheduled_posts(user.id()).await?))
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(new_post): ValidJson<NewPost>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = state.store.create_post(user.id(), new_post).await?;
    tracing::info!(account_id = user.id(), post_id = post.id, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn load_post(state: &AppState, user: &AuthUser, raw_id: &str) -> Result<Post> {
    let id = parse_id(raw_id, "post")?;
    let post = state
        .store
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    ensure_owner(post.user_id, user)?;
    Ok(post)
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    Ok(Json(load_post(&state, &user, &id).await?))
}

async fn update_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<PostChanges>,
) -> Result<Json<Post>> {
    let post = load_post(&state, &user, &id).await?;
    Ok(Json(state.store.update_post(post.id, changes).await?))
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let post = load_post(&state, &user, &id).await?;
    state.store.delete_post(post.id).await?;
    tracing::info!(account_id = user.id(), post_id = post.id, "Post deleted");
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// Rewrite a draft for a goal (`engagement` by default).
async fn optimize_post(
    State(state): State<Arc<AppState>>,
    ValidJson(request): ValidJson<OptimizeRequest>,
) -> Json<OptimizedPost> {
    Json(
        state
            .content
            .optimize_post(&request.content, request.goal.as_deref())
            .await,
    )
}

// ─── Goals ───────────────────────────────────────────────────

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Goal>>> {
    Ok(Json(state.store.list_goals(user.id()).await?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(new_goal): ValidJson<NewGoal>,
) -> Result<(StatusCode, Json<Goal>)> {
    let goal = state.store.create_goal(user.id(), new_goal).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn load_goal(state: &AppState, user: &AuthUser, raw_id: &str) -> Result<Goal> {
    let id = parse_id(raw_id, "goal")?;
    let goal = state
        .store
        .get_goal(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;
    ensure_owner(goal.user_id, user)?;
    Ok(goal)
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<GoalChanges>,
) -> Result<Json<Goal>> {
    let goal = load_goal(&state, &user, &id).await?;
    Ok(Json(state.store.update_goal(goal.id, changes).await?))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let goal = load_goal(&state, &user, &id).await?;
    state.store.delete_goal(goal.id).await?;
    Ok(Json(MessageResponse::new("Goal deleted successfully")))
}

// ─── Content Suggestions ─────────────────────────────────────

/// Generate ideas from the account's profile metrics and store them.
async fn generate_for(state: &AppState, user: &AuthUser) -> Result<Vec<ContentSuggestion>> {
    let profile_data = state
        .store
        .get_profile(user.id())
        .await?
        .map(|p| p.profile_data)
        .unwrap_or_default();

    let ideas = state.content.generate_ideas(&profile_data).await;
    let created = state.store.create_suggestions(user.id(), ideas).await?;

    tracing::info!(
        account_id = user.id(),
        count = created.len(),
        "Content suggestions generated"
    );
    Ok(created)
}

/// Stored suggestions; a first batch is generated when there are none.
async fn list_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ContentSuggestion>>> {
    let suggestions = state.store.list_suggestions(user.id()).await?;
    if !suggestions.is_empty() {
        return Ok(Json(suggestions));
    }

    generate_for(&state, &user).await?;
    Ok(Json(state.store.list_suggestions(user.id()).await?))
}

async fn generate_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Vec<ContentSuggestion>>)> {
    let created = generate_for(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Mark a suggestion saved/used or edit it.
async fn update_suggestion(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<SuggestionChanges>,
) -> Result<Json<ContentSuggestion>> {
    let id = parse_id(&id, "suggestion")?;
    let suggestion = state
        .store
        .get_suggestion(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;
    ensure_owner(suggestion.user_id, &user)?;

    Ok(Json(state.store.update_suggestion(id, changes).await?))
}

// ─── Analytics ───────────────────────────────────────────────

/// Headline activity numbers from the profile metrics.
async fn analytics_overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ActivityMetrics>> {
    let profile = state
        .store
        .get_profile(user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Profile data not found".to_string()))?;

    Ok(Json(profile.profile_data.activity))
}
