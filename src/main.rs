// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Growth Coach API Server
//!
//! Backend for a LinkedIn personal-branding dashboard: provider login,
//! server-side sessions, and per-account posts, goals and content ideas.

use growth_coach::{
    config::Config,
    db::MemoryStore,
    services::{AuthProvider, LinkedInProvider},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are swept from memory.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        secure_cookies = config.secure_cookies,
        llm_enabled = config.openai_api_key.is_some(),
        "Starting Growth Coach API"
    );

    let store = MemoryStore::new();

    let linkedin: Arc<dyn AuthProvider> = Arc::new(LinkedInProvider::new(&config)?);
    tracing::info!(
        redirect_uri = %config.linkedin_redirect_uri,
        "LinkedIn provider initialized"
    );

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, vec![linkedin])?);

    // Expiry is enforced on lookup; this only bounds memory.
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
        }
    });

    // Build router
    let app = growth_coach::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("growth_coach=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .try_init()?;
    Ok(())
}
