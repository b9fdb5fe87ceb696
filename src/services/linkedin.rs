// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth identity providers.
//!
//! Handles:
//! - Authorization URL construction
//! - Authorization code exchange (`grant_type=authorization_code`)
//! - Profile fetch from the OpenID Connect userinfo endpoint
//!
//! Providers are constructed once at startup and shared through
//! [`AppState`](crate::AppState), so tests can swap in a scripted double.

use crate::config::{Config, LINKEDIN_SCOPES};
use crate::error::ProviderError;
use crate::services::profile::RawProfile;
use async_trait::async_trait;
use serde::Deserialize;

const LINKEDIN_AUTHORIZE_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const LINKEDIN_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const LINKEDIN_USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";

/// Credentials returned by a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(rename = "expires_in", default)]
    pub expires_in_seconds: u64,
}

/// An external OAuth identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Path segment identifying the provider (`/api/auth/{name}`).
    fn name(&self) -> &'static str;

    /// Provider authorization URL carrying the opaque `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange a single-use authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, ProviderError>;

    /// Fetch the raw profile of the token's owner.
    async fn fetch_profile(&self, access_token: &str) -> Result<RawProfile, ProviderError>;
}

/// LinkedIn OAuth 2.0 / OpenID Connect client.
#[derive(Clone)]
pub struct LinkedInProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: String,
    token_url: String,
    userinfo_url: String,
}

impl LinkedInProvider {
    /// Create a LinkedIn client whose calls are bounded by the configured timeout.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        Ok(Self {
            http,
            client_id: config.linkedin_client_id.clone(),
            client_secret: config.linkedin_client_secret.clone(),
            redirect_uri: config.linkedin_redirect_uri.clone(),
            authorize_url: LINKEDIN_AUTHORIZE_URL.to_string(),
            token_url: LINKEDIN_TOKEN_URL.to_string(),
            userinfo_url: LINKEDIN_USERINFO_URL.to_string(),
        })
    }

    /// Point the token and userinfo calls at another host (local mocks).
    pub fn with_api_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.token_url = format!("{}/oauth/v2/accessToken", base);
        self.userinfo_url = format!("{}/v2/userinfo", base);
        self
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl AuthProvider for LinkedInProvider {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&LINKEDIN_SCOPES.join(" ")),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, ProviderError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let tokens: TokenSet = Self::check_response_json(response).await?;
        if tokens.access_token.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "token response has empty access_token".to_string(),
            ));
        }
        Ok(tokens)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<RawProfile, ProviderError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        Self::check_response_json(response).await
    }
}
