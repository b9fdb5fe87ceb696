// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod content;
pub mod linkedin;
pub mod password;
pub mod profile;
pub mod session;

pub use accounts::AccountService;
pub use content::{ContentGenerator, OptimizedPost};
pub use linkedin::{AuthProvider, LinkedInProvider, TokenSet};
pub use profile::{normalize, NormalizedProfile, RawProfile};
pub use session::{IssuedSession, SessionManager};
