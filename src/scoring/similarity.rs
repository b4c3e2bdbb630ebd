// Composite similarity score.
//
// Four sub-scores, each in [0, 1]:
//   - artist, track and genre overlap: |A ∩ B| / |A ∪ B| (0 when both empty)
//   - feature similarity: mean over features of 1 - |a - b|
//
// The composite is their weighted average scaled to 0-100, rounded half up
// and clamped. Everything here is a pure function of its inputs; iteration
// happens in canonical feature order so the same inputs give the same bits.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::features::vector::{AudioFeature, AudioFeatureVector};
use crate::models::FeatureComparison;

use super::intersect::{normalize_genre, TopItems};

/// Weights for the composite score.
///
/// The composite divides by the weight total, so custom weights need not sum
/// to 1.0. Defaults: artists 0.30, tracks 0.25, genres 0.20, features 0.25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub artists: f64,
    pub tracks: f64,
    pub genres: f64,
    pub features: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            artists: 0.30,
            tracks: 0.25,
            genres: 0.20,
            features: 0.25,
        }
    }
}

impl SimilarityWeights {
    pub fn total(&self) -> f64 {
        self.artists + self.tracks + self.genres + self.features
    }

    /// All weights finite and non-negative, with a positive total.
    pub fn is_valid(&self) -> bool {
        let all = [self.artists, self.tracks, self.genres, self.features];
        all.iter().all(|w| w.is_finite() && *w >= 0.0) && self.total() > 0.0
    }
}

/// Jaccard-style overlap ratios for the three item kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlapRatios {
    pub artists: f64,
    pub tracks: f64,
    pub genres: f64,
}

/// Everything the scorer produced, kept for the insight generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityBreakdown {
    pub overlap: OverlapRatios,
    pub features: BTreeMap<AudioFeature, FeatureComparison>,
    /// Mean of the per-feature similarities
    pub feature_similarity: f64,
    /// Composite score, 0-100
    pub score: u8,
}

/// |A ∩ B| / |A ∪ B| over distinct keys. Zero when both sides are empty.
pub fn jaccard<T, K>(a: &[T], b: &[T], key: K) -> f64
where
    K: Fn(&T) -> String,
{
    let set_a: HashSet<String> = a.iter().map(&key).collect();
    let set_b: HashSet<String> = b.iter().map(&key).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Overlap ratios between two users' top lists.
pub fn overlap_ratios(a: &TopItems, b: &TopItems) -> OverlapRatios {
    OverlapRatios {
        artists: jaccard(&a.artists, &b.artists, |x| x.id.clone()),
        tracks: jaccard(&a.tracks, &b.tracks, |x| x.id.clone()),
        genres: jaccard(&a.genres, &b.genres, |g| normalize_genre(g)),
    }
}

/// Similarity of two unit-scaled values: 1 - |a - b|, clamped to [0, 1].
pub fn feature_similarity(a: f64, b: f64) -> f64 {
    let similarity = 1.0 - (a - b).abs();
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Per-feature comparison over every feature present in either vector.
/// A feature missing on one side is compared against the midpoint.
pub fn compare_features(
    a: &AudioFeatureVector,
    b: &AudioFeatureVector,
) -> BTreeMap<AudioFeature, FeatureComparison> {
    let features: BTreeSet<AudioFeature> = a.features().chain(b.features()).collect();

    features
        .into_iter()
        .map(|feature| {
            let user1 = a.value_or_midpoint(feature);
            let user2 = b.value_or_midpoint(feature);
            (
                feature,
                FeatureComparison {
                    user1,
                    user2,
                    similarity: feature_similarity(user1, user2),
                },
            )
        })
        .collect()
}

/// Mean per-feature similarity. Zero when there are no features to compare.
pub fn aggregate_feature_similarity(comparison: &BTreeMap<AudioFeature, FeatureComparison>) -> f64 {
    if comparison.is_empty() {
        return 0.0;
    }
    let sum: f64 = comparison.values().map(|c| c.similarity).sum();
    sum / comparison.len() as f64
}

/// Decimal places kept before rounding. Weighted sums of exact ratios drift
/// by a few ulps (0.75 * 0.30 comes out as 22.499999...), so the scaled score
/// is snapped to this precision first.
const ROUNDING_PRECISION: f64 = 1e9;

/// Round to the nearest integer, ties away from zero for positive values.
pub fn round_half_up(value: f64) -> f64 {
    let snapped = (value * ROUNDING_PRECISION).round() / ROUNDING_PRECISION;
    (snapped + 0.5).floor()
}

/// Blend the sub-scores into the 0-100 composite.
pub fn composite_score(
    overlap: &OverlapRatios,
    feature_similarity: f64,
    weights: &SimilarityWeights,
) -> u8 {
    let total = weights.total();
    if !(total > 0.0) {
        return 0;
    }

    let blended = (overlap.artists * weights.artists
        + overlap.tracks * weights.tracks
        + overlap.genres * weights.genres
        + feature_similarity * weights.features)
        / total;

    if !blended.is_finite() {
        return 0;
    }

    round_half_up(blended * 100.0).clamp(0.0, 100.0) as u8
}

/// Run the full scorer for one pair of users.
pub fn score(
    items_a: &TopItems,
    features_a: &AudioFeatureVector,
    items_b: &TopItems,
    features_b: &AudioFeatureVector,
    weights: &SimilarityWeights,
) -> SimilarityBreakdown {
    let overlap = overlap_ratios(items_a, items_b);
    let features = compare_features(features_a, features_b);
    let feature_similarity = aggregate_feature_similarity(&features);
    let score = composite_score(&overlap, feature_similarity, weights);

    SimilarityBreakdown {
        overlap,
        features,
        feature_similarity,
        score,
    }
}
