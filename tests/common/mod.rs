// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use growth_coach::config::{Config, SESSION_COOKIE};
use growth_coach::db::MemoryStore;
use growth_coach::error::ProviderError;
use growth_coach::routes::create_router;
use growth_coach::services::{AuthProvider, RawProfile, TokenSet};
use growth_coach::AppState;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// How the fake provider answers the next code exchange.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeScript {
    Succeed,
    Reject(u16),
    Timeout,
}

/// Scripted identity provider. No network.
pub struct FakeProvider {
    exchange: Mutex<ExchangeScript>,
    profile: Mutex<Value>,
    exchange_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new() -> Self {
        Self {
            exchange: Mutex::new(ExchangeScript::Succeed),
            profile: Mutex::new(json!({
                "sub": "li-123",
                "name": "Jane Doe",
                "email": "jane@example.com",
                "picture": "https://media.example.com/jane.jpg"
            })),
            exchange_calls: AtomicUsize::new(0),
        }
    }

    pub fn script_exchange(&self, script: ExchangeScript) {
        *self.exchange.lock().unwrap() = script;
    }

    /// Raw userinfo document returned by the next profile fetch.
    pub fn set_profile(&self, profile: Value) {
        *self.profile.lock().unwrap() = profile;
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn authorization_url(&self, state: &str) -> String {
        format!(
            "https://provider.test/oauth/authorize?client_id=test_client_id&state={}",
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, ProviderError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        let script = *self.exchange.lock().unwrap();
        match script {
            ExchangeScript::Succeed => Ok(TokenSet {
                access_token: format!("access-{}", code),
                refresh_token: None,
                expires_in_seconds: 3600,
            }),
            ExchangeScript::Reject(status) => Err(ProviderError::Rejected {
                status,
                body: r#"{"error":"invalid_grant","error_description":"code reused"}"#.to_string(),
            }),
            ExchangeScript::Timeout => Err(ProviderError::Unreachable(
                "operation timed out".to_string(),
            )),
        }
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<RawProfile, ProviderError> {
        let profile = self.profile.lock().unwrap().clone();
        serde_json::from_value(profile).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

/// Test harness: router, shared state and the provider double.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub provider: Arc<FakeProvider>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.request(build_request("GET", uri, cookie, None)).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Value,
    ) -> Response {
        self.request(build_request(method, uri, cookie, Some(body)))
            .await
    }

    /// Run the provider flow end to end; returns the `name=value` cookie pair.
    pub async fn login_via_provider(&self) -> String {
        let start = self.get("/api/auth/linkedin?returnTo=/dashboard", None).await;
        let state = state_param(&location(&start));

        let callback = self
            .get(
                &format!("/api/auth/linkedin/callback?code=good-code&state={}", state),
                None,
            )
            .await;
        assert_eq!(callback.status(), StatusCode::TEMPORARY_REDIRECT);
        session_cookie(&callback).expect("provider login should set a session cookie")
    }

    /// Register a local account and log in; returns the cookie pair.
    pub async fn login_local(&self, username: &str) -> String {
        let register = self
            .send_json(
                "POST",
                "/api/auth/register",
                None,
                json!({"username": username, "password": "correct-horse"}),
            )
            .await;
        assert_eq!(register.status(), StatusCode::CREATED);

        let login = self
            .send_json(
                "POST",
                "/api/auth/login",
                None,
                json!({"username": username, "password": "correct-horse"}),
            )
            .await;
        assert_eq!(login.status(), StatusCode::OK);
        session_cookie(&login).expect("local login should set a session cookie")
    }
}

/// Create a test app with offline dependencies and default config.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> TestApp {
    let provider = Arc::new(FakeProvider::new());
    let state = Arc::new(
        AppState::new(
            config,
            MemoryStore::new(),
            vec![provider.clone() as Arc<dyn AuthProvider>],
        )
        .unwrap(),
    );

    TestApp {
        router: create_router(state.clone()),
        state,
        provider,
    }
}

#[allow(dead_code)]
pub fn build_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Raw (still URL-encoded) `state` query value of a provider redirect.
#[allow(dead_code)]
pub fn state_param(url: &str) -> String {
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("state="))
        .expect("authorization URL should carry state")
        .to_string()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// `auth-session=<id>` from a response's Set-Cookie headers, if a live one was set.
#[allow(dead_code)]
pub fn session_cookie(response: &Response) -> Option<String> {
    set_cookie_headers(response)
        .into_iter()
        .filter(|value| value.starts_with(&format!("{}=", SESSION_COOKIE)))
        .map(|value| value.split(';').next().unwrap_or_default().to_string())
        .find(|pair| pair.len() > SESSION_COOKIE.len() + 1)
}
