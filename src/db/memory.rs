// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process relational store with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (unique on username and external provider ID)
//! - Profiles (one metrics record per account)
//! - Posts, goals and content suggestions (owned by an account)
//!
//! Every table lives behind a single lock so uniqueness checks and inserts
//! happen atomically.

use crate::db::columns;
use crate::error::StoreError;
use crate::models::{
    Account, AccountUpdate, ContentIdea, ContentSuggestion, Goal, GoalChanges, NewAccount,
    NewGoal, NewPost, Post, PostChanges, PostStatus, Profile, ProfileChanges, ProfileData,
    SuggestionChanges,
};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
struct Tables {
    accounts: Table<Account>,
    username_index: HashMap<String, u64>,
    external_id_index: HashMap<String, u64>,
    profiles: Table<Profile>,
    posts: Table<Post>,
    goals: Table<Goal>,
    suggestions: Table<ContentSuggestion>,
}

/// Shared handle to the store. Cloning is cheap.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Account Operations ──────────────────────────────────────

    pub async fn get_account(&self, id: u64) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.rows.get(&id).cloned())
    }

    pub async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .username_index
            .get(username)
            .and_then(|id| tables.accounts.rows.get(id))
            .cloned())
    }

    pub async fn get_account_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .external_id_index
            .get(external_id)
            .and_then(|id| tables.accounts.rows.get(id))
            .cloned())
    }

    /// Insert a new account.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the username or the
    /// external ID is already taken; nothing is written in that case.
    pub async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.inner.write().await;

        if tables.username_index.contains_key(&new.username) {
            return Err(StoreError::UniqueViolation(columns::USERNAME));
        }
        if let Some(external_id) = &new.external_id {
            if tables.external_id_index.contains_key(external_id) {
                return Err(StoreError::UniqueViolation(columns::EXTERNAL_ID));
            }
        }

        let id = tables.accounts.allocate_id();
        let account = Account {
            id,
            username: new.username,
            password_hash: new.password_hash,
            external_id: new.external_id,
            access_token: new.access_token,
            refresh_token: new.refresh_token,
            email: new.email,
            full_name: new.full_name,
            profile_image: new.profile_image,
            headline: new.headline,
            is_connected: new.is_connected,
            created_at: Utc::now(),
        };

        tables.username_index.insert(account.username.clone(), id);
        if let Some(external_id) = &account.external_id {
            tables.external_id_index.insert(external_id.clone(), id);
        }
        tables.accounts.rows.insert(id, account.clone());
        Ok(account)
    }

    /// Apply a partial update; identity fields are not reachable from here.
    pub async fn update_account(
        &self,
        id: u64,
        update: AccountUpdate,
    ) -> Result<Account, StoreError> {
        let mut tables = self.inner.write().await;
        let account = tables
            .accounts
            .rows
            .get_mut(&id)
            .ok_or(StoreError::Missing("account"))?;
        update.apply(account);
        Ok(account.clone())
    }

    pub async fn account_count(&self) -> usize {
        self.inner.read().await.accounts.rows.len()
    }

    // ─── Profile Operations ──────────────────────────────────────

    pub async fn get_profile(&self, user_id: u64) -> Result<Option<Profile>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .profiles
            .rows
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    /// Create the profile record for `user_id`, or return the existing one.
    pub async fn create_profile(
        &self,
        user_id: u64,
        profile_data: ProfileData,
    ) -> Result<Profile, StoreError> {
        let mut tables = self.inner.write().await;
        if let Some(existing) = tables.profiles.rows.values().find(|p| p.user_id == user_id) {
            return Ok(existing.clone());
        }
        let id = tables.profiles.allocate_id();
        let profile = Profile {
            id,
            user_id,
            profile_score: profile_data.score,
            profile_data,
            last_updated: Utc::now(),
        };
        tables.profiles.rows.insert(id, profile.clone());
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        user_id: u64,
        changes: ProfileChanges,
    ) -> Result<Profile, StoreError> {
        let mut tables = self.inner.write().await;
        let profile = tables
            .profiles
            .rows
            .values_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(StoreError::Missing("profile"))?;
        if let Some(data) = changes.profile_data {
            profile.profile_data = data;
        }
        if let Some(score) = changes.profile_score {
            profile.profile_score = score;
        }
        profile.last_updated = Utc::now();
        Ok(profile.clone())
    }

    // ─── Post Operations ─────────────────────────────────────────

    pub async fn list_posts(&self, user_id: u64) -> Result<Vec<Post>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .posts
            .rows
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    pub async fn list_scheduled_posts(&self, user_id: u64) -> Result<Vec<Post>, StoreError> {
        let tables = self.inner.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .rows
            .values()
            .filter(|p| p.user_id == user_id && p.status == PostStatus::Scheduled)
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.scheduled_for);
        Ok(posts)
    }

    pub async fn get_post(&self, id: u64) -> Result<Option<Post>, StoreError> {
        Ok(self.inner.read().await.posts.rows.get(&id).cloned())
    }

    pub async fn create_post(&self, user_id: u64, new: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.posts.allocate_id();
        let post = Post {
            id,
            user_id,
            content: new.content,
            post_type: new.post_type,
            hashtags: new.hashtags,
            media_urls: new.media_urls,
            scheduled_for: new.scheduled_for,
            published_at: new.published_at,
            status: new.status,
            engagement_data: new.engagement_data,
            linkedin_post_id: new.linkedin_post_id,
            created_at: Utc::now(),
        };
        tables.posts.rows.insert(id, post.clone());
        Ok(post)
    }

    pub async fn update_post(&self, id: u64, changes: PostChanges) -> Result<Post, StoreError> {
        let mut tables = self.inner.write().await;
        let post = tables
            .posts
            .rows
            .get_mut(&id)
            .ok_or(StoreError::Missing("post"))?;
        changes.apply(post);
        Ok(post.clone())
    }

    pub async fn delete_post(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.posts.rows.remove(&id).is_some())
    }

    // ─── Goal Operations ─────────────────────────────────────────

    pub async fn list_goals(&self, user_id: u64) -> Result<Vec<Goal>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .goals
            .rows
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    pub async fn get_goal(&self, id: u64) -> Result<Option<Goal>, StoreError> {
        Ok(self.inner.read().await.goals.rows.get(&id).cloned())
    }

    pub async fn create_goal(&self, user_id: u64, new: NewGoal) -> Result<Goal, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.goals.allocate_id();
        let now = Utc::now();
        let goal = Goal {
            id,
            user_id,
            title: new.title,
            target_value: new.target_value,
            current_value: new.current_value,
            goal_type: new.goal_type,
            start_date: now,
            end_date: new.end_date,
            is_completed: false,
            created_at: now,
        };
        tables.goals.rows.insert(id, goal.clone());
        Ok(goal)
    }

    pub async fn update_goal(&self, id: u64, changes: GoalChanges) -> Result<Goal, StoreError> {
        let mut tables = self.inner.write().await;
        let goal = tables
            .goals
            .rows
            .get_mut(&id)
            .ok_or(StoreError::Missing("goal"))?;
        changes.apply(goal);
        Ok(goal.clone())
    }

    pub async fn delete_goal(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.goals.rows.remove(&id).is_some())
    }

    // ─── Content Suggestion Operations ───────────────────────────

    pub async fn list_suggestions(
        &self,
        user_id: u64,
    ) -> Result<Vec<ContentSuggestion>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .suggestions
            .rows
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    pub async fn get_suggestion(&self, id: u64) -> Result<Option<ContentSuggestion>, StoreError> {
        Ok(self.inner.read().await.suggestions.rows.get(&id).cloned())
    }

    /// Store a batch of generated ideas for `user_id`, preserving order.
    pub async fn create_suggestions(
        &self,
        user_id: u64,
        ideas: Vec<ContentIdea>,
    ) -> Result<Vec<ContentSuggestion>, StoreError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let mut created = Vec::with_capacity(ideas.len());
        for idea in ideas {
            let id = tables.suggestions.allocate_id();
            let suggestion = ContentSuggestion {
                id,
                user_id,
                title: idea.title,
                content: idea.content,
                category: idea.category,
                estimated_engagement: idea.estimated_engagement,
                is_saved: false,
                is_used: false,
                created_at: now,
            };
            tables.suggestions.rows.insert(id, suggestion.clone());
            created.push(suggestion);
        }
        Ok(created)
    }

    pub async fn update_suggestion(
        &self,
        id: u64,
        changes: SuggestionChanges,
    ) -> Result<ContentSuggestion, StoreError> {
        let mut tables = self.inner.write().await;
        let suggestion = tables
            .suggestions
            .rows
            .get_mut(&id)
            .ok_or(StoreError::Missing("suggestion"))?;
        changes.apply(suggestion);
        Ok(suggestion.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_account(external_id: &str) -> NewAccount {
        NewAccount {
            username: external_id.to_string(),
            external_id: Some(external_id.to_string()),
            is_connected: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_account_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create_account(provider_account("sub-a")).await.unwrap();
        let b = store.create_account(provider_account("sub-b")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.account_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_external_id_rejected() {
        let store = MemoryStore::new();
        store.create_account(provider_account("sub-a")).await.unwrap();

        let mut dup = provider_account("sub-a");
        dup.username = "someone-else".to_string();
        let err = store.create_account(dup).await.unwrap_err();

        assert_eq!(err, StoreError::UniqueViolation(columns::EXTERNAL_ID));
        assert_eq!(store.account_count().await, 1);
        assert!(store.get_account_by_username("someone-else").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        let local = NewAccount {
            username: "demo".to_string(),
            password_hash: "hash".to_string(),
            ..Default::default()
        };
        store.create_account(local.clone()).await.unwrap();

        let err = store.create_account(local).await.unwrap_err();
        assert_eq!(err, StoreError::UniqueViolation(columns::USERNAME));
    }

    #[tokio::test]
    async fn test_update_account_leaves_identity_fields() {
        let store = MemoryStore::new();
        let created = store.create_account(provider_account("sub-a")).await.unwrap();

        let updated = store
            .update_account(
                created.id,
                AccountUpdate {
                    access_token: Some("new-token".to_string()),
                    headline: Some("CTO".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, created.username);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.access_token.as_deref(), Some("new-token"));
        assert_eq!(updated.headline.as_deref(), Some("CTO"));
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let store = MemoryStore::new();
        let err = store
            .update_account(42, AccountUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Missing("account"));
    }

    #[tokio::test]
    async fn test_create_profile_is_idempotent_per_user() {
        let store = MemoryStore::new();
        let first = store.create_profile(7, ProfileData::mock()).await.unwrap();
        let second = store.create_profile(7, ProfileData::empty()).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.profile_score, 76);
    }
}
