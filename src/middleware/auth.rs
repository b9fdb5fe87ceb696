// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use crate::config::SESSION_COOKIE;
use crate::error::AppError;
use crate::models::Account;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Authenticated account attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account: Account,
}

impl AuthUser {
    pub fn id(&self) -> u64 {
        self.account.id
    }
}

/// Middleware that requires a live session cookie.
///
/// Rejects with 401 before the protected handler runs; the response never
/// says whether the requested resource exists.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account = current_account(&state, &jar)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser { account });

    Ok(next.run(request).await)
}

/// Resolve the account behind the request's session cookie, if any.
pub async fn current_account(state: &AppState, jar: &CookieJar) -> Result<Option<Account>, AppError> {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.resolve(cookie.value()).await,
        None => Ok(None),
    }
}
