//! Account model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local user, linked to at most one external identity.
///
/// `id`, `username` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: u64,
    /// Equals `external_id` for provider-created accounts
    pub username: String,
    /// Argon2id PHC string; empty for provider-created accounts
    pub password_hash: String,
    /// Provider's stable subject identifier
    pub external_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub headline: Option<String>,
    /// True once a provider login has succeeded at least once
    pub is_connected: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may authenticate with a local password.
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

/// Fields for a new account; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub external_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub headline: Option<String>,
    pub is_connected: bool,
}

/// Partial update of the mutable account fields. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_connected: Option<bool>,
    pub profile_image: Option<String>,
    pub headline: Option<String>,
}

impl AccountUpdate {
    pub(crate) fn apply(self, account: &mut Account) {
        if let Some(v) = self.access_token {
            account.access_token = Some(v);
        }
        if let Some(v) = self.refresh_token {
            account.refresh_token = Some(v);
        }
        if let Some(v) = self.is_connected {
            account.is_connected = v;
        }
        if let Some(v) = self.profile_image {
            account.profile_image = Some(v);
        }
        if let Some(v) = self.headline {
            account.headline = Some(v);
        }
    }
}

/// Account as exposed over the API. Credentials never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: u64,
    pub username: String,
    pub linkedin_id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub headline: Option<String>,
    pub is_connected: bool,
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            linkedin_id: account.external_id.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            profile_image: account.profile_image.clone(),
            headline: account.headline.clone(),
            is_connected: account.is_connected,
            created_at: crate::time_utils::format_utc_rfc3339(account.created_at),
        }
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(email(message = "must be a valid email address"))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}
