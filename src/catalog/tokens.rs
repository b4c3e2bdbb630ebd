// Access tokens for per-user catalog calls.
//
// Obtaining tokens (the OAuth dance) happens elsewhere; this module only
// looks them up. StaticTokenSource reads a JSON object of
// `{ "user_id": "access_token", ... }` written by whatever did the auth.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::CatalogError;

#[async_trait]
pub trait TokenSource: Send + Sync {
    /// The current access token for a user, or `None` if the user is unknown.
    async fn access_token(&self, user_id: &str) -> Result<Option<String>, CatalogError>;
}

/// Tokens held in memory, loaded once.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource {
    tokens: HashMap<String, String>,
}

impl StaticTokenSource {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Parse a JSON object mapping user ids to access tokens.
    pub fn from_json(json: &str) -> Result<Self> {
        let tokens: HashMap<String, String> =
            serde_json::from_str(json).context("Token file must be a JSON object of strings")?;
        Ok(Self::new(tokens))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self, user_id: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.tokens.get(user_id).cloned())
    }
}
