// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side login sessions.
//!
//! A session binds an opaque, unguessable identifier (delivered to the
//! browser in the `auth-session` cookie) to an account ID with an absolute
//! expiry. Expiry is checked lazily on [`SessionManager::resolve`]; expired
//! entries found there are dropped.

use crate::db::MemoryStore;
use crate::error::AppError;
use crate::models::Account;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;

/// Bytes of entropy in a session identifier.
const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct SessionEntry {
    principal_id: u64,
    expires_at: DateTime<Utc>,
}

/// A freshly issued session, for the transport to place in a cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Establishes, resolves and destroys login sessions.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, SessionEntry>>,
    store: MemoryStore,
    ttl: Duration,
    rng: SystemRandom,
}

impl SessionManager {
    pub fn new(store: MemoryStore, ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            store,
            ttl,
            rng: SystemRandom::new(),
        }
    }

    /// Session lifetime; also used as the cookie max-age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new session authenticating as `account`.
    pub fn establish(&self, account: &Account) -> Result<IssuedSession, AppError> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
        let session_id = URL_SAFE_NO_PAD.encode(bytes);
        let expires_at = Utc::now() + self.ttl;

        self.sessions.insert(
            session_id.clone(),
            SessionEntry {
                principal_id: account.id,
                expires_at,
            },
        );

        tracing::debug!(account_id = account.id, "Session established");
        Ok(IssuedSession {
            session_id,
            expires_at,
        })
    }

    /// Account for `session_id`, or `None` if unknown, expired, or the
    /// account no longer exists.
    pub async fn resolve(&self, session_id: &str) -> Result<Option<Account>, AppError> {
        let principal_id = match self.principal(session_id) {
            Some(id) => id,
            None => return Ok(None),
        };
        Ok(self.store.get_account(principal_id).await?)
    }

    fn principal(&self, session_id: &str) -> Option<u64> {
        let entry = self.sessions.get(session_id)?.clone();
        if Utc::now() >= entry.expires_at {
            self.sessions.remove(session_id);
            tracing::debug!(account_id = entry.principal_id, "Session expired");
            return None;
        }
        Some(entry.principal_id)
    }

    /// Remove a session. Destroying an absent session is not an error.
    pub fn destroy(&self, session_id: &str) {
        if let Some((_, entry)) = self.sessions.remove(session_id) {
            tracing::debug!(account_id = entry.principal_id, "Session destroyed");
        }
    }

    /// Drop every expired entry. Correctness does not depend on this.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        before - self.sessions.len()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
