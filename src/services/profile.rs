// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider profile normalization.
//!
//! LinkedIn has answered in two shapes over time: the OpenID Connect
//! `userinfo` document (`sub`, `name`, `email`, `picture`) and the legacy
//! passport-style profile (`id`, `displayName`, `emails[]`, `photos[]`).
//! [`normalize`] folds either into one [`NormalizedProfile`].

use serde::{Deserialize, Serialize};

/// `{ "value": ... }` entries used by the legacy `emails` and `photos` arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValueEntry {
    #[serde(default)]
    pub value: Option<String>,
}

/// `name` is a plain string in OpenID Connect and an object in the legacy shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NameField {
    Full(String),
    Parts {
        #[serde(rename = "givenName", default)]
        given_name: Option<String>,
        #[serde(rename = "familyName", default)]
        family_name: Option<String>,
    },
}

/// Profile payload exactly as the provider sent it. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<NameField>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub emails: Vec<ValueEntry>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub photos: Vec<ValueEntry>,
    #[serde(default)]
    pub headline: Option<String>,
}

/// Canonical profile shape. Missing text fields are empty strings and
/// missing links are `None`, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub headline: Option<String>,
}

impl NormalizedProfile {
    /// `first last`, or whichever half is present.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// True when the provider withheld email or name. Never blocks login.
    pub fn is_incomplete(&self) -> bool {
        self.email.is_empty() || self.first_name.is_empty()
    }
}

/// Profile cannot be linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("profile has no subject identifier")]
pub struct MissingSubject;

/// Fold a raw provider payload into the canonical shape.
///
/// The subject identifier is `sub`, falling back to `id`; without either
/// the profile cannot be linked and an error is returned.
pub fn normalize(raw: &RawProfile) -> Result<NormalizedProfile, MissingSubject> {
    let external_id = non_empty(raw.sub.as_deref())
        .or_else(|| non_empty(raw.id.as_deref()))
        .ok_or(MissingSubject)?
        .to_string();

    let (first_name, last_name) = match &raw.name {
        Some(NameField::Full(full)) if !full.trim().is_empty() => split_name(full),
        Some(NameField::Parts {
            given_name,
            family_name,
        }) if given_name.is_some() || family_name.is_some() => (
            given_name.as_deref().unwrap_or_default().trim().to_string(),
            family_name.as_deref().unwrap_or_default().trim().to_string(),
        ),
        _ => match non_empty(raw.display_name.as_deref()) {
            Some(display) => split_name(display),
            None => (
                raw.given_name.as_deref().unwrap_or_default().trim().to_string(),
                raw.family_name.as_deref().unwrap_or_default().trim().to_string(),
            ),
        },
    };

    let email = non_empty(raw.email.as_deref())
        .or_else(|| first_value(&raw.emails))
        .unwrap_or_default()
        .to_string();

    let profile_image = non_empty(raw.picture.as_deref())
        .or_else(|| first_value(&raw.photos))
        .map(str::to_string);

    Ok(NormalizedProfile {
        external_id,
        first_name,
        last_name,
        email,
        profile_image,
        headline: non_empty(raw.headline.as_deref()).map(str::to_string),
    })
}

/// Split on the first whitespace run: first token, then the remaining
/// tokens joined by single spaces.
pub fn split_name(full: &str) -> (String, String) {
    let mut tokens = full.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    (first, rest)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_value(entries: &[ValueEntry]) -> Option<&str> {
    entries.first().and_then(|e| non_empty(e.value.as_deref()))
}
