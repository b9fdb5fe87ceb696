// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local username/password registration and login.

use axum::http::StatusCode;
use common::{body_json, session_cookie, set_cookie_headers};
use growth_coach::config::Config;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_register_then_login() {
    let app = common::create_test_app();

    let register = app
        .send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "username": "alice",
                "password": "correct-horse",
                "email": "alice@example.com",
                "fullName": "Alice Example"
            }),
        )
        .await;
    assert_eq!(register.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(register).await,
        json!({"message": "User created successfully"})
    );

    let login = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "alice", "password": "correct-horse"}),
        )
        .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login).unwrap();

    let body = body_json(login).await;
    assert_eq!(body["message"], "Logged in successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["fullName"], "Alice Example");
    assert_eq!(body["user"]["isConnected"], false);
    assert!(body["user"].get("passwordHash").is_none());

    let me = body_json(app.get("/api/auth/user", Some(&cookie)).await).await;
    assert_eq!(me["user"]["username"], "alice");
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = common::create_test_app();
    app.login_local("alice").await;

    let login = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "alice", "password": "correct-horse"}),
        )
        .await;

    let cookie = set_cookie_headers(&login)
        .into_iter()
        .find(|c| c.starts_with("auth-session="))
        .unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_session_cookie_secure_in_production() {
    let app = common::create_test_app_with_config(Config {
        secure_cookies: true,
        ..Config::test_default()
    });

    let cookie = app.login_via_provider().await;
    assert!(cookie.starts_with("auth-session="));

    let callback = app.get("/api/auth/linkedin/callback?code=abc", None).await;
    let header = set_cookie_headers(&callback)
        .into_iter()
        .find(|c| c.starts_with("auth-session="))
        .unwrap();
    assert!(header.contains("Secure"));
    assert!(callback
        .headers()
        .contains_key("Strict-Transport-Security"));
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let app = common::create_test_app();
    app.login_local("alice").await;

    let response = app
        .send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "alice", "password": "another-password"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"], "Username already exists");
    assert_eq!(app.state.store.account_count().await, 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = common::create_test_app();

    let response = app
        .send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "al", "password": "short"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("username"));
    assert!(details.contains("password"));
    assert_eq!(app.state.store.account_count().await, 0);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let app = common::create_test_app();
    app.login_local("alice").await;

    let wrong = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "alice", "password": "not-the-password"}),
        )
        .await;
    let unknown = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "mallory", "password": "not-the-password"}),
        )
        .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&wrong).is_none());
    assert_eq!(body_json(wrong).await, body_json(unknown).await);
}

#[tokio::test]
async fn test_provider_account_cannot_use_password_login() {
    let app = common::create_test_app();
    app.login_via_provider().await;

    // Provider accounts use the subject as username and have no password.
    let response = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "li-123", "password": "anything-at-all"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = common::create_test_app();

    let response = app
        .send_json("POST", "/api/auth/login", None, json!({"username": "alice"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");
}
