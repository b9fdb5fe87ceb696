// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Default LinkedIn scopes: OpenID Connect profile data plus posting rights.
pub const LINKEDIN_SCOPES: &[&str] = &["openid", "profile", "email", "w_member_social"];

/// Where the browser lands after login when no usable return path was given.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Login page that receives `?error=` after a failed provider login.
pub const LOGIN_FAILURE_PATH: &str = "/auth";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "auth-session";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// LinkedIn OAuth client ID (public)
    pub linkedin_client_id: String,
    /// Redirect URI registered with LinkedIn; must match exactly
    pub linkedin_redirect_uri: String,
    /// Frontend origin for redirects and CORS (empty = same origin)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Mark cookies `Secure` and send HSTS (serving over TLS)
    pub secure_cookies: bool,
    /// Lifetime of a login session
    pub session_ttl: chrono::Duration,
    /// Upper bound on each call to the identity provider
    pub provider_timeout: Duration,
    /// Chat-completions model used for content generation
    pub openai_model: String,

    // --- Secrets ---
    /// LinkedIn OAuth client secret
    pub linkedin_client_secret: String,
    /// HMAC key for signing the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
    /// LLM API key; content falls back to static suggestions when absent
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Deterministic offline config for tests.
    pub fn test_default() -> Self {
        Self {
            linkedin_client_id: "test_client_id".to_string(),
            linkedin_redirect_uri: "http://localhost:8080/api/auth/linkedin/callback".to_string(),
            frontend_url: String::new(),
            port: 8080,
            secure_cookies: false,
            session_ttl: chrono::Duration::hours(24),
            provider_timeout: Duration::from_secs(10),
            openai_model: "gpt-4o".to_string(),
            linkedin_client_secret: "test_secret".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            openai_api_key: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let production = env::var("APP_ENV").map(|v| v == "production").unwrap_or(false);

        Ok(Self {
            linkedin_client_id: env::var("LINKEDIN_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LINKEDIN_CLIENT_ID"))?,
            linkedin_redirect_uri: env::var("LINKEDIN_REDIRECT_URI").unwrap_or_else(|_| {
                "http://localhost:8080/api/auth/linkedin/callback".to_string()
            }),
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(production),
            session_ttl: chrono::Duration::hours(parse_or("SESSION_TTL_HOURS", 24)?),
            provider_timeout: Duration::from_secs(parse_or("PROVIDER_TIMEOUT_SECS", 10)?),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),

            linkedin_client_secret: env::var("LINKEDIN_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LINKEDIN_CLIENT_SECRET"))?,
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
