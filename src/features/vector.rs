// Audio feature vectors — the fixed set of sonic attributes we compare on.
//
// Every value in an AudioFeatureVector lives in [0, 1]. Tempo arrives from the
// catalog in BPM and is min-max normalized before it gets here; the other
// attributes are already unit-scaled and only clamped.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Neutral value used wherever a feature is missing.
pub const MIDPOINT: f64 = 0.5;

/// Lower bound of the tempo normalization range (BPM).
pub const TEMPO_MIN_BPM: f64 = 60.0;

/// Upper bound of the tempo normalization range (BPM).
pub const TEMPO_MAX_BPM: f64 = 200.0;

/// The enumerated audio features. Declaration order is the canonical order
/// used for iteration, serialization and tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Danceability,
    Energy,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
}

impl AudioFeature {
    pub const ALL: [AudioFeature; 8] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Speechiness,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Liveness,
        AudioFeature::Valence,
        AudioFeature::Tempo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
        }
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rescale a tempo in BPM into [0, 1] over [TEMPO_MIN_BPM, TEMPO_MAX_BPM].
pub fn normalize_tempo(bpm: f64) -> f64 {
    unit_clamp((bpm - TEMPO_MIN_BPM) / (TEMPO_MAX_BPM - TEMPO_MIN_BPM))
}

/// Clamp to [0, 1]. Non-finite input maps to the midpoint.
pub fn unit_clamp(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        MIDPOINT
    }
}

/// Per-track audio attributes exactly as the catalog reports them.
///
/// Each field is optional because the catalog can omit any of them (or the
/// whole object). Tempo is in BPM; everything else is already 0.0-1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAudioFeatures {
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub speechiness: Option<f64>,
    #[serde(default)]
    pub acousticness: Option<f64>,
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    #[serde(default)]
    pub liveness: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub tempo: Option<f64>,
}

impl RawAudioFeatures {
    /// The raw reported value for a feature.
    pub fn get(&self, feature: AudioFeature) -> Option<f64> {
        match feature {
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Energy => self.energy,
            AudioFeature::Speechiness => self.speechiness,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
            AudioFeature::Liveness => self.liveness,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
        }
    }

    /// Convert to a complete, unit-scaled vector. Missing values become the midpoint.
    pub fn to_vector(&self) -> AudioFeatureVector {
        let mut vector = AudioFeatureVector::new();
        for feature in AudioFeature::ALL {
            let value = match (feature, self.get(feature)) {
                (_, None) => MIDPOINT,
                (AudioFeature::Tempo, Some(bpm)) => normalize_tempo(bpm),
                (_, Some(v)) => v,
            };
            vector.set(feature, value);
        }
        vector
    }
}

/// A mapping from audio feature to a value in [0, 1].
///
/// Backed by a BTreeMap so iteration is always in canonical feature order,
/// which keeps downstream sums bit-for-bit reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioFeatureVector(BTreeMap<AudioFeature, f64>);

impl AudioFeatureVector {
    /// An empty vector (no features present).
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Every enumerated feature at the midpoint.
    pub fn neutral() -> Self {
        Self::from_pairs(AudioFeature::ALL.iter().map(|f| (*f, MIDPOINT)))
    }

    /// Build from (feature, value) pairs; values are clamped into [0, 1].
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (AudioFeature, f64)>,
    {
        let mut vector = Self::new();
        for (feature, value) in pairs {
            vector.set(feature, value);
        }
        vector
    }

    pub fn set(&mut self, feature: AudioFeature, value: f64) {
        self.0.insert(feature, unit_clamp(value));
    }

    pub fn get(&self, feature: AudioFeature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    /// The value for a feature, or the midpoint if it is absent.
    pub fn value_or_midpoint(&self, feature: AudioFeature) -> f64 {
        self.get(feature).unwrap_or(MIDPOINT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AudioFeature, f64)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    pub fn features(&self) -> impl Iterator<Item = AudioFeature> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The feature with the highest value. Ties go to the earlier feature in
    /// canonical order.
    pub fn dominant(&self) -> Option<(AudioFeature, f64)> {
        self.iter().fold(None, |best, (feature, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((feature, value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_normalization_bounds() {
        assert_eq!(normalize_tempo(TEMPO_MIN_BPM), 0.0);
        assert_eq!(normalize_tempo(TEMPO_MAX_BPM), 1.0);
        assert!((normalize_tempo(130.0) - 0.5).abs() < 1e-9);
        assert_eq!(normalize_tempo(20.0), 0.0);
        assert_eq!(normalize_tempo(260.0), 1.0);
    }

    #[test]
    fn non_finite_values_become_midpoint() {
        assert_eq!(unit_clamp(f64::NAN), MIDPOINT);
        assert_eq!(unit_clamp(f64::INFINITY), MIDPOINT);
        assert_eq!(normalize_tempo(f64::NAN), MIDPOINT);
    }

    #[test]
    fn raw_features_fill_missing_with_midpoint() {
        let raw = RawAudioFeatures {
            danceability: Some(0.552),
            tempo: Some(169.994),
            ..Default::default()
        };
        let vector = raw.to_vector();
        assert_eq!(vector.len(), AudioFeature::ALL.len());
        assert_eq!(vector.get(AudioFeature::Danceability), Some(0.552));
        assert_eq!(vector.get(AudioFeature::Energy), Some(MIDPOINT));
        let tempo = vector.get(AudioFeature::Tempo).unwrap();
        assert!((tempo - (169.994 - 60.0) / 140.0).abs() < 1e-9);
    }

    #[test]
    fn dominant_prefers_earlier_feature_on_tie() {
        let vector = AudioFeatureVector::from_pairs([
            (AudioFeature::Valence, 0.9),
            (AudioFeature::Energy, 0.9),
            (AudioFeature::Danceability, 0.2),
        ]);
        assert_eq!(vector.dominant(), Some((AudioFeature::Energy, 0.9)));
        assert_eq!(AudioFeatureVector::new().dominant(), None);
    }

    #[test]
    fn serializes_with_lowercase_keys() {
        let vector = AudioFeatureVector::from_pairs([(AudioFeature::Energy, 0.25)]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"{"energy":0.25}"#);
    }
}
