// Feature vector extraction — one aggregate sound profile per user.
//
// The aggregate is the arithmetic mean of each feature across the user's top
// tracks. Tracks without catalog features contribute the midpoint for every
// feature, so every track counts equally. An empty track list yields the
// neutral vector and is reported through `FeatureProfile::has_data`.

use crate::models::Track;

use super::vector::{AudioFeature, AudioFeatureVector};

/// A user's aggregate audio features plus how much evidence backs them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureProfile {
    pub vector: AudioFeatureVector,
    /// Number of tracks averaged (including ones filled with midpoints)
    pub tracks_used: usize,
    /// Number of those tracks that actually carried catalog features
    pub tracks_measured: usize,
}

impl FeatureProfile {
    /// False when the vector is purely midpoint defaults.
    pub fn has_data(&self) -> bool {
        self.tracks_measured > 0
    }
}

/// Average the audio features of a user's top tracks.
pub fn extract_profile(tracks: &[Track]) -> FeatureProfile {
    if tracks.is_empty() {
        return FeatureProfile {
            vector: AudioFeatureVector::neutral(),
            tracks_used: 0,
            tracks_measured: 0,
        };
    }

    let per_track: Vec<AudioFeatureVector> = tracks
        .iter()
        .map(|t| t.audio_features.clone().unwrap_or_default().to_vector())
        .collect();

    let count = per_track.len() as f64;
    let vector = AudioFeatureVector::from_pairs(AudioFeature::ALL.iter().map(|&feature| {
        let sum: f64 = per_track
            .iter()
            .map(|v| v.value_or_midpoint(feature))
            .sum();
        (feature, sum / count)
    }));

    FeatureProfile {
        vector,
        tracks_used: tracks.len(),
        tracks_measured: tracks.iter().filter(|t| t.audio_features.is_some()).count(),
    }
}
