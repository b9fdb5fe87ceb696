// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account resolution: provider upsert and local credentials.

use crate::db::MemoryStore;
use crate::error::{AppError, StoreError};
use crate::models::{Account, AccountUpdate, NewAccount, ProfileData, RegisterRequest};
use crate::services::linkedin::TokenSet;
use crate::services::password;
use crate::services::profile::NormalizedProfile;

/// Finds or creates local accounts.
#[derive(Clone)]
pub struct AccountService {
    store: MemoryStore,
}

impl AccountService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Find-or-create the account linked to `profile.external_id`.
    ///
    /// On first sight the account is created with `username = external_id`
    /// and an empty password, and a zeroed profile-metrics record is seeded.
    /// On later logins only tokens, `is_connected`, avatar and headline
    /// change. If a concurrent login wins the insert, the uniqueness
    /// violation is retried once as lookup-then-update.
    pub async fn upsert_from_provider(
        &self,
        profile: &NormalizedProfile,
        tokens: &TokenSet,
    ) -> Result<Account, AppError> {
        if profile.is_incomplete() {
            tracing::warn!(
                external_id = %profile.external_id,
                "Provider profile missing email or name, using placeholders"
            );
        }

        if let Some(existing) = self
            .store
            .get_account_by_external_id(&profile.external_id)
            .await?
        {
            return self.refresh_linked(existing.id, profile, tokens).await;
        }

        let full_name = profile.full_name();
        let new_account = NewAccount {
            username: profile.external_id.clone(),
            password_hash: String::new(),
            external_id: Some(profile.external_id.clone()),
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone().unwrap_or_default()),
            email: Some(profile.email.clone()),
            full_name: Some(full_name),
            profile_image: profile.profile_image.clone(),
            headline: profile.headline.clone(),
            is_connected: true,
        };

        match self.store.create_account(new_account).await {
            Ok(account) => {
                self.store
                    .create_profile(account.id, ProfileData::empty())
                    .await?;
                tracing::info!(
                    account_id = account.id,
                    external_id = %profile.external_id,
                    "Created account from provider login"
                );
                Ok(account)
            }
            Err(StoreError::UniqueViolation(column)) => {
                tracing::info!(
                    external_id = %profile.external_id,
                    column,
                    "Concurrent account creation detected, retrying as update"
                );
                let winner = self
                    .store
                    .get_account_by_external_id(&profile.external_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "account creation conflicted on {} but no account is linked",
                            column
                        ))
                    })?;
                self.refresh_linked(winner.id, profile, tokens).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn refresh_linked(
        &self,
        account_id: u64,
        profile: &NormalizedProfile,
        tokens: &TokenSet,
    ) -> Result<Account, AppError> {
        let update = AccountUpdate {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone().unwrap_or_default()),
            is_connected: Some(true),
            profile_image: profile.profile_image.clone(),
            headline: profile.headline.clone(),
        };
        let account = self.store.update_account(account_id, update).await?;
        tracing::info!(account_id, "Refreshed tokens for linked account");
        Ok(account)
    }

    /// Register a local (username/password) account.
    pub async fn register_local(&self, request: RegisterRequest) -> Result<Account, AppError> {
        let password_hash = password::hash_password(&request.password)?;

        let new_account = NewAccount {
            username: request.username,
            password_hash,
            email: request.email,
            full_name: request.full_name,
            ..Default::default()
        };

        match self.store.create_account(new_account).await {
            Ok(account) => {
                tracing::info!(account_id = account.id, "Registered local account");
                Ok(account)
            }
            Err(StoreError::UniqueViolation(_)) => {
                Err(AppError::BadRequest("Username already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify local credentials.
    ///
    /// Provider-created accounts have no password and can never log in here.
    /// Unknown user and wrong password are indistinguishable to the caller.
    pub async fn authenticate_local(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let account = self.store.get_account_by_username(username).await?;
        match account {
            Some(account)
                if account.has_password()
                    && password::verify_password(password, &account.password_hash) =>
            {
                Ok(account)
            }
            _ => {
                tracing::info!(username, "Local login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
