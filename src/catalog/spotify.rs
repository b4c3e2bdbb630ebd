// Spotify Web API catalog provider.
//
// Thin reqwest wrapper with a generic authenticated GET helper. Each user's
// calls go out with that user's access token, looked up through a
// TokenSource. Every request (send and body decode) is bounded by the
// caller's deadline.
//
// Endpoints used:
//   GET /v1/me                      profile
//   GET /v1/me/top/artists          top artists
//   GET /v1/me/top/tracks           top tracks
//   GET /v1/audio-features?ids=...  per-track audio features (best effort)

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::features::vector::RawAudioFeatures;
use crate::models::{Artist, Image, Track, UserProfile};

use super::tokens::TokenSource;
use super::traits::{CatalogProvider, Deadline};

/// Default Spotify Web API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Largest page the top-items endpoints accept.
pub const MAX_TOP_LIMIT: usize = 50;

/// Largest id batch the audio-features endpoint accepts.
pub const MAX_FEATURE_IDS: usize = 100;

/// The listening window top items are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// Roughly the last four weeks
    ShortTerm,
    /// Roughly the last six months
    #[default]
    MediumTerm,
    /// Several years
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => anyhow::bail!(
                "Unknown time range '{other}' (expected short_term, medium_term or long_term)"
            ),
        }
    }
}

/// Catalog provider backed by the Spotify Web API.
pub struct SpotifyCatalog {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    time_range: TimeRange,
}

impl SpotifyCatalog {
    /// Create a client pointing at the given base URL.
    ///
    /// Pass a different URL for testing against a local stub.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>, time_range: TimeRange) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tastematch/0.1 (taste-comparison)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            time_range,
        })
    }

    /// Authenticated GET against a Web API path, deserializing the JSON body.
    ///
    /// 404 always means the user can't be resolved. 401 does too when
    /// `identity_call` is set (an unusable token leaves us no way to know who
    /// the user is); elsewhere it is reported as the catalog being unavailable.
    async fn get_json<T: DeserializeOwned>(
        &self,
        user_id: &str,
        path: &str,
        params: &[(&str, &str)],
        deadline: Deadline,
        identity_call: bool,
    ) -> Result<T, CatalogError> {
        let token = self
            .tokens
            .access_token(user_id)
            .await?
            .ok_or_else(|| CatalogError::UserNotFound(user_id.to_string()))?;

        let url = format!("{}{}", self.base_url, path);
        debug!(user = user_id, path = path, "Catalog GET request");

        let request = self.client.get(&url).bearer_auth(token).query(params).send();
        let response = tokio::time::timeout_at(deadline, request)
            .await
            .map_err(|_| timed_out(path))?
            .map_err(|e| CatalogError::Unavailable(format!("{path} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = tokio::time::timeout_at(deadline, response.text())
                .await
                .ok()
                .and_then(|r| r.ok())
                .unwrap_or_default();
            return Err(classify_status(status, user_id, path, &body, identity_call));
        }

        tokio::time::timeout_at(deadline, response.json::<T>())
            .await
            .map_err(|_| timed_out(path))?
            .map_err(|e| CatalogError::Unavailable(format!("Failed to decode {path} response: {e}")))
    }

    /// Attach audio features to tracks. Failures are logged and tolerated:
    /// tracks without features fall back to neutral values downstream.
    async fn attach_audio_features(&self, user_id: &str, tracks: &mut [Track], deadline: Deadline) {
        let ids: Vec<&str> = tracks
            .iter()
            .take(MAX_FEATURE_IDS)
            .map(|t| t.id.as_str())
            .collect();
        if ids.is_empty() {
            return;
        }
        let joined = ids.join(",");

        let response: AudioFeaturesResponse = match self
            .get_json(user_id, "/v1/audio-features", &[("ids", joined.as_str())], deadline, false)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(user = user_id, error = %e, "Audio features unavailable, using neutral values");
                return;
            }
        };

        let mut by_id: std::collections::HashMap<String, RawAudioFeatures> = response
            .audio_features
            .into_iter()
            .flatten()
            .map(|f| (f.id, f.features))
            .collect();

        for track in tracks.iter_mut() {
            if let Some(features) = by_id.remove(&track.id) {
                track.audio_features = Some(features);
            }
        }
    }
}

fn timed_out(path: &str) -> CatalogError {
    CatalogError::Unavailable(format!("{path} timed out"))
}

/// Map a non-success HTTP status to the error taxonomy.
pub fn classify_status(
    status: StatusCode,
    user_id: &str,
    path: &str,
    body: &str,
    identity_call: bool,
) -> CatalogError {
    match status {
        StatusCode::NOT_FOUND => CatalogError::UserNotFound(user_id.to_string()),
        StatusCode::UNAUTHORIZED if identity_call => CatalogError::UserNotFound(user_id.to_string()),
        _ => CatalogError::Unavailable(format!("{path} returned {status}: {body}")),
    }
}

/// Clamp a requested top-N into what the endpoints accept.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_TOP_LIMIT)
}

#[async_trait]
impl CatalogProvider for SpotifyCatalog {
    async fn get_profile(
        &self,
        user_id: &str,
        deadline: Deadline,
    ) -> Result<UserProfile, CatalogError> {
        let me: SpotifyProfile = self.get_json(user_id, "/v1/me", &[], deadline, true).await?;
        Ok(me.into_profile(user_id))
    }

    async fn get_top_artists(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Artist>, CatalogError> {
        let limit = clamp_limit(limit).to_string();
        let page: Paging<Artist> = self
            .get_json(
                user_id,
                "/v1/me/top/artists",
                &[("limit", limit.as_str()), ("time_range", self.time_range.as_str())],
                deadline,
                false,
            )
            .await?;
        Ok(page.items)
    }

    async fn get_top_tracks(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Track>, CatalogError> {
        let limit = clamp_limit(limit).to_string();
        let page: Paging<Track> = self
            .get_json(
                user_id,
                "/v1/me/top/tracks",
                &[("limit", limit.as_str()), ("time_range", self.time_range.as_str())],
                deadline,
                false,
            )
            .await?;

        let mut tracks = page.items;
        self.attach_audio_features(user_id, &mut tracks, deadline).await;
        Ok(tracks)
    }
}

// -- Serde types for Web API responses --

/// Response from `GET /v1/me`.
#[derive(Debug, Deserialize)]
pub struct SpotifyProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl SpotifyProfile {
    /// Convert to our profile, keyed by our own user id. Falls back to the
    /// catalog account id when the account has no display name.
    pub fn into_profile(self, user_id: &str) -> UserProfile {
        UserProfile {
            id: user_id.to_string(),
            display_name: self
                .display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(self.id),
            profile_image: self.images.into_iter().next().map(|i| i.url),
        }
    }
}

/// A page of items from the top-items endpoints.
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Response from `GET /v1/audio-features`. Unknown ids come back as `null`.
#[derive(Debug, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<TrackAudioFeatures>>,
}

#[derive(Debug, Deserialize)]
pub struct TrackAudioFeatures {
    pub id: String,
    #[serde(flatten)]
    pub features: RawAudioFeatures,
}
