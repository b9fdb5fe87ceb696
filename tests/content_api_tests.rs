// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, posts, goals, suggestions and analytics endpoints.

use axum::http::StatusCode;
use common::{body_json, build_request};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_profile_seeded_on_first_view() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let first = body_json(app.get("/api/profile", Some(&cookie)).await).await;
    assert_eq!(first["profileScore"], 76);
    assert_eq!(first["profileData"]["activity"]["profileViews"], 127);
    assert_eq!(first["profileData"]["suggestions"][0]["type"], "headline");
    assert_eq!(first["profileData"]["recentPosts"].as_array().unwrap().len(), 3);

    let second = body_json(app.get("/api/profile", Some(&cookie)).await).await;
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_provider_account_starts_with_empty_metrics() {
    let app = common::create_test_app();
    let cookie = app.login_via_provider().await;

    let profile = body_json(app.get("/api/profile", Some(&cookie)).await).await;
    assert_eq!(profile["profileScore"], 0);

    let response = app.get("/api/analytics/overview", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"profileViews": 0, "postImpressions": 0, "newConnections": 0, "engagementRate": 0.0})
    );
}

#[tokio::test]
async fn test_update_profile_score() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let response = app
        .send_json("PUT", "/api/profile", Some(&cookie), json!({"profileScore": 150}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");

    let response = app
        .send_json("PUT", "/api/profile", Some(&cookie), json!({"profileScore": 80}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["profileScore"], 80);
}

#[tokio::test]
async fn test_analytics_without_profile_is_not_found() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let response = app.get("/api/analytics/overview", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let created = app
        .send_json(
            "POST",
            "/api/posts",
            Some(&cookie),
            json!({
                "content": "Three lessons from shipping a side project",
                "postType": "text",
                "hashtags": ["buildinpublic"],
                "status": "draft"
            }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let post = body_json(created).await;
    assert_eq!(post["status"], "draft");
    assert_eq!(post["hashtags"], json!(["buildinpublic"]));
    let uri = format!("/api/posts/{}", post["id"]);

    let updated = app
        .send_json(
            "PUT",
            &uri,
            Some(&cookie),
            json!({"status": "scheduled", "scheduledFor": "2030-01-01T09:00:00Z"}),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["status"], "scheduled");
    assert_eq!(updated["content"], post["content"]);

    let listing = body_json(app.get("/api/posts", Some(&cookie)).await).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let deleted = app
        .request(build_request("DELETE", &uri, Some(&cookie), None))
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(
        body_json(deleted).await,
        json!({"message": "Post deleted successfully"})
    );
    assert_eq!(
        app.get(&uri, Some(&cookie)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_scheduled_posts_in_time_order() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    for (content, status, when) in [
        ("later", "scheduled", Some("2030-03-01T09:00:00Z")),
        ("draft", "draft", None),
        ("sooner", "scheduled", Some("2030-02-01T09:00:00Z")),
    ] {
        let response = app
            .send_json(
                "POST",
                "/api/posts",
                Some(&cookie),
                json!({"content": content, "postType": "text", "status": status, "scheduledFor": when}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let scheduled = body_json(app.get("/api/posts/scheduled", Some(&cookie)).await).await;
    let contents: Vec<&str> = scheduled
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["sooner", "later"]);
}

#[tokio::test]
async fn test_post_body_validation() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    // Schema mismatch
    let response = app
        .send_json(
            "POST",
            "/api/posts",
            Some(&cookie),
            json!({"content": "hi", "postType": "text", "status": "viral"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");

    // Failed field rule
    let response = app
        .send_json(
            "POST",
            "/api/posts",
            Some(&cookie),
            json!({"content": "", "postType": "text", "status": "draft"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert!(body["details"].as_str().unwrap().starts_with("content:"));

    let listing = body_json(app.get("/api/posts", Some(&cookie)).await).await;
    assert_eq!(listing, json!([]));
}

#[tokio::test]
async fn test_optimize_falls_back_without_llm() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let response = app
        .send_json(
            "POST",
            "/api/posts/optimize",
            Some(&cookie),
            json!({"content": "Hello network"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["optimizedContent"], "Hello network");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    assert_eq!(body["estimatedImprovement"], "15-20%");

    let response = app
        .send_json("POST", "/api/posts/optimize", Some(&cookie), json!({"content": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["details"],
        "content: Content is required"
    );
}

#[tokio::test]
async fn test_goal_lifecycle() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let created = app
        .send_json(
            "POST",
            "/api/goals",
            Some(&cookie),
            json!({"title": "Post 4x weekly", "targetValue": 16, "goalType": "posts"}),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let goal = body_json(created).await;
    assert_eq!(goal["currentValue"], 0);
    assert_eq!(goal["isCompleted"], false);
    let uri = format!("/api/goals/{}", goal["id"]);

    let updated = body_json(
        app.send_json(
            "PUT",
            &uri,
            Some(&cookie),
            json!({"currentValue": 16, "isCompleted": true}),
        )
        .await,
    )
    .await;
    assert_eq!(updated["currentValue"], 16);
    assert_eq!(updated["isCompleted"], true);
    assert_eq!(updated["title"], "Post 4x weekly");

    let response = app
        .send_json("PUT", &uri, Some(&cookie), json!({"targetValue": 0}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let deleted = app
        .request(build_request("DELETE", &uri, Some(&cookie), None))
        .await;
    assert_eq!(
        body_json(deleted).await,
        json!({"message": "Goal deleted successfully"})
    );
    let goals = body_json(app.get("/api/goals", Some(&cookie)).await).await;
    assert_eq!(goals, json!([]));
}

#[tokio::test]
async fn test_suggestions_generated_once_then_on_demand() {
    let app = common::create_test_app();
    let cookie = app.login_local("alice").await;

    let first = body_json(app.get("/api/content-suggestions", Some(&cookie)).await).await;
    assert_eq!(first.as_array().unwrap().len(), 4);
    assert_eq!(first[0]["isSaved"], false);

    let again = body_json(app.get("/api/content-suggestions", Some(&cookie)).await).await;
    assert_eq!(again, first);

    let generated = app
        .request(build_request(
            "POST",
            "/api/content-suggestions/generate",
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(generated.status(), StatusCode::CREATED);
    assert_eq!(body_json(generated).await.as_array().unwrap().len(), 4);

    let all = body_json(app.get("/api/content-suggestions", Some(&cookie)).await).await;
    assert_eq!(all.as_array().unwrap().len(), 8);

    let uri = format!("/api/content-suggestions/{}", first[0]["id"]);
    let saved = body_json(
        app.send_json("PUT", &uri, Some(&cookie), json!({"isSaved": true, "isUsed": true}))
            .await,
    )
    .await;
    assert_eq!(saved["isSaved"], true);
    assert_eq!(saved["isUsed"], true);
    assert_eq!(saved["title"], first[0]["title"]);
}

#[tokio::test]
async fn test_init_demo_seeds_once() {
    let app = common::create_test_app();

    let response = app.get("/api/init-demo", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Demo data initialized");
    assert_eq!(body["login"]["username"], "demo");

    let login = app
        .send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({"username": "demo", "password": "password"}),
        )
        .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = common::session_cookie(&login).unwrap();

    let posts = body_json(app.get("/api/posts", Some(&cookie)).await).await;
    assert_eq!(posts.as_array().unwrap().len(), 3);
    assert!(posts
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["status"] == "published"));

    let goals = body_json(app.get("/api/goals", Some(&cookie)).await).await;
    assert_eq!(goals.as_array().unwrap().len(), 2);

    let suggestions = body_json(app.get("/api/content-suggestions", Some(&cookie)).await).await;
    assert_eq!(suggestions.as_array().unwrap().len(), 4);

    let overview = body_json(app.get("/api/analytics/overview", Some(&cookie)).await).await;
    assert_eq!(overview["postImpressions"], 4300);

    let again = body_json(app.get("/api/init-demo", None).await).await;
    assert_eq!(
        again,
        json!({"message": "Users already exist, skipping demo initialization"})
    );
    assert_eq!(app.state.store.account_count().await, 1);
}
