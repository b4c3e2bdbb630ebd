// Unit tests for the rule-based insight generator.

use std::collections::BTreeMap;

use tastematch::features::vector::AudioFeature;
use tastematch::models::{Artist, FeatureComparison, UserProfile};
use tastematch::scoring::insights::{generate, DataCoverage, InsightContext, InsightRule};
use tastematch::scoring::intersect::SharedItems;
use tastematch::scoring::similarity::{OverlapRatios, SimilarityBreakdown};

fn user(id: &str, name: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        display_name: name.to_string(),
        profile_image: None,
    }
}

fn full_coverage() -> DataCoverage {
    DataCoverage {
        artists: 20,
        tracks: 20,
        measured_tracks: 20,
    }
}

fn breakdown(score: u8, features: &[(AudioFeature, f64, f64)]) -> SimilarityBreakdown {
    let features: BTreeMap<AudioFeature, FeatureComparison> = features
        .iter()
        .map(|&(feature, user1, user2)| {
            (
                feature,
                FeatureComparison {
                    user1,
                    user2,
                    similarity: 1.0 - (user1 - user2).abs(),
                },
            )
        })
        .collect();
    SimilarityBreakdown {
        overlap: OverlapRatios::default(),
        features,
        feature_similarity: 0.0,
        score,
    }
}

fn named_artist(name: &str) -> Artist {
    Artist {
        id: name.to_lowercase(),
        name: name.to_string(),
        genres: vec![],
        popularity: 0,
        images: vec![],
    }
}

#[test]
fn rule_table_starts_with_history_check() {
    assert_eq!(InsightRule::TABLE[0], InsightRule::InsufficientHistory);
    assert_eq!(InsightRule::TABLE[1], InsightRule::ScoreBand);
}

#[test]
fn missing_history_suppresses_taste_insights() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems {
        genres: vec!["pop".to_string()],
        ..Default::default()
    };
    let scored = breakdown(25, &[]);

    let insights = generate(&InsightContext {
        user1: &alice,
        user2: &bob,
        coverage1: DataCoverage::default(),
        coverage2: DataCoverage::default(),
        shared: &shared,
        breakdown: &scored,
    });

    assert_eq!(insights.len(), 1, "got {insights:?}");
    assert!(insights[0].starts_with("Insufficient data"));
    assert!(insights[0].contains("Alice and Bob"));
}

#[test]
fn one_sided_missing_history_names_that_user() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems::default();
    let scored = breakdown(0, &[]);

    let insights = generate(&InsightContext {
        user1: &alice,
        user2: &bob,
        coverage1: full_coverage(),
        coverage2: DataCoverage::default(),
        shared: &shared,
        breakdown: &scored,
    });

    assert_eq!(insights.len(), 1);
    assert!(insights[0].contains("Bob doesn't have enough listening history"));
    assert!(!insights[0].contains("Alice"));
}

#[test]
fn full_data_produces_band_genres_and_artists() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems {
        artists: vec![named_artist("Björk"), named_artist("Low")],
        tracks: vec![],
        genres: vec!["art pop".into(), "slowcore".into()],
    };
    let scored = breakdown(72, &[(AudioFeature::Energy, 0.6, 0.55)]);

    let insights = generate(&InsightContext {
        user1: &alice,
        user2: &bob,
        coverage1: full_coverage(),
        coverage2: full_coverage(),
        shared: &shared,
        breakdown: &scored,
    });

    assert_eq!(
        insights,
        vec![
            "You have very similar music tastes and are highly compatible! You'd probably enjoy each other's playlists.".to_string(),
            "You both love art pop, slowcore music.".to_string(),
            "You share 2 top artists, led by Björk.".to_string(),
        ]
    );
}

#[test]
fn moderate_and_low_bands() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems::default();

    for (score, phrase) in [(40, "moderately similar"), (39, "quite different tastes")] {
        let scored = breakdown(score, &[]);
        let insights = generate(&InsightContext {
            user1: &alice,
            user2: &bob,
            coverage1: full_coverage(),
            coverage2: full_coverage(),
            shared: &shared,
            breakdown: &scored,
        });
        assert!(insights[0].contains(phrase), "score {score}: {insights:?}");
    }
}

#[test]
fn band_messages_keep_the_app_copy() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems::default();

    for (score, copy) in [
        (85, "You have very similar music tastes"),
        (55, "some great overlaps in your music taste with room to discover new favorites."),
        (10, "perfect for discovering new music together!"),
    ] {
        let scored = breakdown(score, &[]);
        let insights = generate(&InsightContext {
            user1: &alice,
            user2: &bob,
            coverage1: full_coverage(),
            coverage2: full_coverage(),
            shared: &shared,
            breakdown: &scored,
        });
        assert!(insights[0].contains(copy), "score {score}: {insights:?}");
    }
}

#[test]
fn strong_feature_contrast_is_called_out() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems::default();
    let scored = breakdown(
        30,
        &[
            (AudioFeature::Energy, 0.9, 0.2),
            (AudioFeature::Valence, 0.3, 0.35),
        ],
    );

    let insights = generate(&InsightContext {
        user1: &alice,
        user2: &bob,
        coverage1: full_coverage(),
        coverage2: full_coverage(),
        shared: &shared,
        breakdown: &scored,
    });

    assert!(insights
        .iter()
        .any(|i| i == "Alice leans into energy (90%) while Bob sits at 20%."));
}

#[test]
fn unmeasured_tracks_are_flagged() {
    let alice = user("alice", "Alice");
    let bob = user("bob", "Bob");
    let shared = SharedItems::default();
    let scored = breakdown(50, &[(AudioFeature::Energy, 0.9, 0.5)]);
    let unmeasured = DataCoverage {
        measured_tracks: 0,
        ..full_coverage()
    };

    let insights = generate(&InsightContext {
        user1: &alice,
        user2: &bob,
        coverage1: full_coverage(),
        coverage2: unmeasured,
        shared: &shared,
        breakdown: &scored,
    });

    // No contrast claim without real features on both sides
    assert!(!insights.iter().any(|i| i.contains("leans into")));
    assert_eq!(
        insights.last().map(String::as_str),
        Some("Insufficient data: no audio features for Bob's top tracks, so neutral values were used.")
    );
}
