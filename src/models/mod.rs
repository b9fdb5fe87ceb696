// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod account;
pub mod goal;
pub mod post;
pub mod profile;
pub mod suggestion;

pub use account::{
    Account, AccountResponse, AccountUpdate, LoginRequest, NewAccount, RegisterRequest,
};
pub use goal::{Goal, GoalChanges, NewGoal};
pub use post::{NewPost, OptimizeRequest, Post, PostChanges, PostStatus};
pub use profile::{Profile, ProfileChanges, ProfileData};
pub use suggestion::{ContentIdea, ContentSuggestion, SuggestionChanges};
