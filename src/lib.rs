// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Growth Coach: LinkedIn personal-branding backend
//!
//! This crate provides the REST API behind the dashboard: LinkedIn OAuth
//! login with server-side sessions, plus posts, goals, content suggestions
//! and analytics scoped to the signed-in account.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryStore;
use services::{AccountService, AuthProvider, ContentGenerator, SessionManager};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: MemoryStore,
    pub accounts: AccountService,
    pub sessions: SessionManager,
    pub content: ContentGenerator,
    providers: HashMap<&'static str, Arc<dyn AuthProvider>>,
}

impl AppState {
    /// Wire the services around one store. Each provider is reachable at
    /// `/api/auth/{provider.name()}`.
    pub fn new(
        config: Config,
        store: MemoryStore,
        providers: Vec<Arc<dyn AuthProvider>>,
    ) -> anyhow::Result<Self> {
        let content = ContentGenerator::new(&config)?;
        let sessions = SessionManager::new(store.clone(), config.session_ttl);
        let accounts = AccountService::new(store.clone());
        let providers = providers.into_iter().map(|p| (p.name(), p)).collect();

        Ok(Self {
            config,
            store,
            accounts,
            sessions,
            content,
            providers,
        })
    }

    /// Look up a configured identity provider by path name.
    pub fn provider(&self, name: &str) -> Option<Arc<dyn AuthProvider>> {
        self.providers.get(name).cloned()
    }
}
