// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login routes: provider OAuth flow, local credentials, session lifecycle.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::config::{Config, DEFAULT_LANDING_PATH, LOGIN_FAILURE_PATH, SESSION_COOKIE};
use crate::error::{AppError, ProviderError, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::current_account;
use crate::models::{AccountResponse, LoginRequest, RegisterRequest};
use crate::routes::MessageResponse;
use crate::services::{normalize, IssuedSession};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Oldest `state` accepted on the callback.
const STATE_MAX_AGE_SECS: i64 = 10 * 60;

/// Error code put on the login page after any failed provider login.
const LOGIN_FAILED_CODE: &str = "authentication_failed";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/user", get(get_user))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/{provider}", get(auth_start))
        .route("/api/auth/{provider}/callback", get(auth_callback))
}

// ─── Provider OAuth ──────────────────────────────────────────

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// App path to land on after login.
    #[serde(rename = "returnTo", default)]
    return_to: Option<String>,
}

/// Start OAuth flow - redirect to the provider's authorization page.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Path(provider_name): Path<String>,
    Query(params): Query<AuthStartParams>,
) -> Result<Redirect> {
    let provider = state
        .provider(&provider_name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider {}", provider_name)))?;

    let return_to = params
        .return_to
        .as_deref()
        .and_then(sanitize_return_path)
        .unwrap_or(DEFAULT_LANDING_PATH);

    let oauth_state = sign_state(return_to, &state.config.oauth_state_key, Utc::now())?;

    tracing::info!(
        provider = provider.name(),
        return_to,
        "Starting OAuth flow, redirecting to provider"
    );

    Ok(Redirect::temporary(&provider.authorization_url(&oauth_state)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth callback - exchange code, resolve account, establish session.
///
/// Always answers with a redirect. Failures land on the login page with a
/// generic error code; provider detail only goes to the log.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider_name): Path<String>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let failure = Redirect::temporary(&format!(
        "{}{}?error={}",
        state.config.frontend_url, LOGIN_FAILURE_PATH, LOGIN_FAILED_CODE
    ));

    if let Some(error) = params.error {
        tracing::warn!(
            provider = %provider_name,
            error = %error,
            description = params.error_description.as_deref().unwrap_or(""),
            "OAuth error from provider"
        );
        return (jar, failure);
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!(provider = %provider_name, "OAuth callback without code");
        return (jar, failure);
    };

    let landing = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key, Utc::now()))
        .unwrap_or_else(|| {
            tracing::warn!("Invalid or missing state parameter, using default landing page");
            DEFAULT_LANDING_PATH.to_string()
        });

    match complete_login(&state, &provider_name, &code).await {
        Ok(issued) => {
            let jar = jar.add(session_cookie(&state, issued));
            let target = format!("{}{}", state.config.frontend_url, landing);
            (jar, Redirect::temporary(&target))
        }
        Err(AppError::Provider(err)) => {
            tracing::error!(
                provider = %provider_name,
                kind = err.kind(),
                error = %err,
                "Provider login failed"
            );
            (jar, failure)
        }
        Err(err) => {
            tracing::error!(provider = %provider_name, error = %err, "Login failed");
            (jar, failure)
        }
    }
}

/// Token exchange, profile fetch, account upsert and session, in order.
async fn complete_login(
    state: &AppState,
    provider_name: &str,
    code: &str,
) -> Result<IssuedSession> {
    let provider = state
        .provider(provider_name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider {}", provider_name)))?;

    let tokens = provider.exchange_code(code).await?;
    let raw = provider.fetch_profile(&tokens.access_token).await?;
    let profile = normalize(&raw).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    let account = state.accounts.upsert_from_provider(&profile, &tokens).await?;
    let issued = state.sessions.establish(&account)?;

    tracing::info!(
        provider = provider.name(),
        account_id = account.id,
        "OAuth login successful"
    );

    Ok(issued)
}

// ─── OAuth state ─────────────────────────────────────────────

/// Sign `return_to` into an opaque `state` value.
///
/// Format before encoding: `return_to|issued_at_hex|signature_hex`.
pub fn sign_state(return_to: &str, secret: &[u8], issued_at: DateTime<Utc>) -> Result<String> {
    let payload = format!("{}|{:x}", return_to, issued_at.timestamp());

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify the signature and age of a `state` value and return its path.
pub fn verify_and_decode_state(state: &str, secret: &[u8], now: DateTime<Utc>) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // The path may itself contain '|', so split from the right.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let return_to = parts.next()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(format!("{}|{}", return_to, timestamp_hex).as_bytes());
    let expected = mac.finalize().into_bytes();
    let provided = hex::decode(signature_hex).ok()?;

    if !bool::from(expected.as_slice().ct_eq(&provided)) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_at = i64::from_str_radix(timestamp_hex, 16).ok()?;
    let age = now.timestamp() - issued_at;
    if !(0..=STATE_MAX_AGE_SECS).contains(&age) {
        tracing::warn!(age_secs = age, "OAuth state expired");
        return None;
    }

    sanitize_return_path(return_to).map(str::to_string)
}

/// Accept only same-origin relative paths.
pub fn sanitize_return_path(path: &str) -> Option<&str> {
    let ok = path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(|c| c.is_control());
    ok.then_some(path)
}

// ─── Sessions ────────────────────────────────────────────────

fn session_cookie(state: &AppState, issued: IssuedSession) -> Cookie<'static> {
    build_session_cookie(&state.config, issued.session_id, state.sessions.ttl())
}

fn build_session_cookie(config: &Config, value: String, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub user: AccountResponse,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AccountResponse,
}

/// Current session's account.
async fn get_user(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Json<UserEnvelope>> {
    let account = current_account(&state, &jar)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserEnvelope {
        user: AccountResponse::from(&account),
    }))
}

/// Destroy the session and expire the cookie. Succeeds without a session.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }

    let removal = build_session_cookie(&state.config, String::new(), chrono::Duration::zero());
    (
        jar.remove(removal),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Local username/password login.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let account = state
        .accounts
        .authenticate_local(&request.username, &request.password)
        .await?;
    let issued = state.sessions.establish(&account)?;

    tracing::info!(account_id = account.id, "Local login successful");

    Ok((
        jar.add(session_cookie(&state, issued)),
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            user: AccountResponse::from(&account),
        }),
    ))
}

async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state.accounts.register_local(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}
