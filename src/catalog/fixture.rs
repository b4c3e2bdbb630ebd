// Fixture-backed catalog — canned users loaded from a JSON file.
//
// File format:
//
//   { "users": [ { "profile": {...}, "top_artists": [...], "top_tracks": [...] } ] }
//
// Artists and tracks use the same JSON shape as the comparison output, and
// tracks may carry an `audio_features` object. A user marked
// `"unavailable": true` makes every call for that user fail as if the
// catalog were down, which is handy for exercising error paths.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{Artist, Track, UserProfile};

use super::traits::{CatalogProvider, Deadline};

/// One canned user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureUser {
    pub profile: UserProfile,
    #[serde(default)]
    pub top_artists: Vec<Artist>,
    #[serde(default)]
    pub top_tracks: Vec<Track>,
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    users: Vec<FixtureUser>,
}

/// A catalog that answers from memory.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    users: HashMap<String, FixtureUser>,
}

impl FixtureCatalog {
    pub fn from_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = FixtureUser>,
    {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.profile.id.clone(), u))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json).context("Invalid fixture JSON")?;
        Ok(Self::from_users(file.users))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    fn user(&self, user_id: &str, deadline: Deadline) -> Result<&FixtureUser, CatalogError> {
        if tokio::time::Instant::now() >= deadline {
            return Err(CatalogError::Unavailable("deadline exceeded".to_string()));
        }
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| CatalogError::UserNotFound(user_id.to_string()))?;
        if user.unavailable {
            return Err(CatalogError::Unavailable(format!(
                "fixture user {user_id} is marked unavailable"
            )));
        }
        Ok(user)
    }
}

#[async_trait]
impl CatalogProvider for FixtureCatalog {
    async fn get_profile(
        &self,
        user_id: &str,
        deadline: Deadline,
    ) -> Result<UserProfile, CatalogError> {
        debug!(user = user_id, "Fixture profile lookup");
        Ok(self.user(user_id, deadline)?.profile.clone())
    }

    async fn get_top_artists(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Artist>, CatalogError> {
        let user = self.user(user_id, deadline)?;
        Ok(user.top_artists.iter().take(limit).cloned().collect())
    }

    async fn get_top_tracks(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Track>, CatalogError> {
        let user = self.user(user_id, deadline)?;
        Ok(user.top_tracks.iter().take(limit).cloned().collect())
    }
}
