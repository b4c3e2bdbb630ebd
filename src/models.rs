// Data models — the types that flow through a comparison.
//
// Field names follow the catalog's JSON payloads so artists and tracks can be
// deserialized straight from provider responses, and serialize into the shape
// the comparison UI reads (`artist.images[0].url`, `track.album.images`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::vector::{AudioFeature, AudioFeatureVector, RawAudioFeatures};

/// A connected user, as resolved by the catalog provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// An image reference (artist photo, album cover).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// One of a user's top artists. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    /// Genre tags in the order the catalog reports them
    #[serde(default)]
    pub genres: Vec<String>,
    /// Catalog popularity, 0-100
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// The short artist reference embedded in a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// One of a user's top tracks. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Album,
    /// Per-track audio attributes. `None` when the catalog had nothing for
    /// this track; the extractor then falls back to neutral values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_features: Option<RawAudioFeatures>,
}

impl Track {
    /// Name of the first credited artist, if any.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }
}

/// Both users' values for one audio feature and how close they are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureComparison {
    pub user1: f64,
    pub user2: f64,
    /// `1 - |user1 - user2|`, in [0, 1]
    pub similarity: f64,
}

/// The full result of comparing two users. Built once per request and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub user1: UserProfile,
    pub user2: UserProfile,
    /// Composite score, 0-100
    pub similarity_score: u8,
    pub shared_artists: Vec<Artist>,
    pub shared_tracks: Vec<Track>,
    pub shared_genres: Vec<String>,
    pub audio_features_comparison: BTreeMap<AudioFeature, FeatureComparison>,
    pub recommendations: Vec<String>,
}

/// A single user's listening profile: who they are, what they play, and the
/// aggregate sound of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub top_artists: Vec<Artist>,
    pub top_tracks: Vec<Track>,
    /// Genres aggregated from the top artists, most frequent first
    pub genres: Vec<String>,
    pub audio_features: AudioFeatureVector,
}
