// Comparison pipeline: fetch both users -> extract -> intersect -> score -> insights.
//
// Fetching is a fan-out/fan-in join. The three provider calls per user, for
// both users, run concurrently; the first failure cancels the rest and the
// whole comparison fails. The caller's deadline bounds the join and is handed
// down unchanged to every provider call.
//
// Everything after the fetch is pure and lives in `assemble`.

use std::sync::Arc;

use futures::future::try_join;
use tracing::{debug, info};

use crate::catalog::traits::{CatalogProvider, Deadline};
use crate::error::{CatalogError, CompareError};
use crate::features::extract::{extract_profile, FeatureProfile};
use crate::models::{Artist, ComparisonResult, TasteProfile, Track, UserProfile};
use crate::scoring::insights::{self, DataCoverage, InsightContext};
use crate::scoring::intersect::{intersect, TopItems};
use crate::scoring::similarity::{self, SimilarityWeights};

/// Default number of top artists and tracks requested per user.
pub const DEFAULT_TOP_LIMIT: usize = 20;

/// Everything fetched for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListening {
    pub profile: UserProfile,
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
}

/// Runs comparisons against a catalog provider.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent comparisons.
pub struct Comparator {
    provider: Arc<dyn CatalogProvider>,
    weights: SimilarityWeights,
    top_limit: usize,
}

impl Comparator {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            weights: SimilarityWeights::default(),
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_top_limit(mut self, top_limit: usize) -> Self {
        self.top_limit = top_limit;
        self
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    /// Compare two users' tastes.
    ///
    /// Fails with `UserNotFound` if either user can't be resolved and with
    /// `ProviderUnavailable` if any provider call fails or the deadline
    /// passes. No partial result is ever returned.
    pub async fn compare(
        &self,
        user1_id: &str,
        user2_id: &str,
        deadline: Deadline,
    ) -> Result<ComparisonResult, CompareError> {
        let fetch = try_join(
            self.fetch_user(user1_id, deadline),
            self.fetch_user(user2_id, deadline),
        );

        let (user1, user2) = tokio::time::timeout_at(deadline, fetch)
            .await
            .map_err(|_| CompareError::deadline_exceeded())??;

        let result = assemble(user1, user2, &self.weights);

        info!(
            user1 = user1_id,
            user2 = user2_id,
            score = result.similarity_score,
            shared_artists = result.shared_artists.len(),
            shared_tracks = result.shared_tracks.len(),
            shared_genres = result.shared_genres.len(),
            "Compared users"
        );

        Ok(result)
    }

    /// Build one user's full taste profile.
    pub async fn profile(&self, user_id: &str, deadline: Deadline) -> Result<TasteProfile, CompareError> {
        let listening = tokio::time::timeout_at(deadline, self.fetch_user(user_id, deadline))
            .await
            .map_err(|_| CompareError::deadline_exceeded())??;

        Ok(taste_profile(listening))
    }

    /// Fetch profile, top artists and top tracks for one user concurrently.
    async fn fetch_user(&self, user_id: &str, deadline: Deadline) -> Result<UserListening, CatalogError> {
        let (profile, artists, tracks) = futures::try_join!(
            self.provider.get_profile(user_id, deadline),
            self.provider.get_top_artists(user_id, self.top_limit, deadline),
            self.provider.get_top_tracks(user_id, self.top_limit, deadline)
        )?;

        debug!(
            user = user_id,
            artists = artists.len(),
            tracks = tracks.len(),
            "Fetched listening data"
        );

        Ok(UserListening {
            profile,
            artists,
            tracks,
        })
    }
}

/// Run the pure stages on two users' fetched data and build the result.
pub fn assemble(
    user1: UserListening,
    user2: UserListening,
    weights: &SimilarityWeights,
) -> ComparisonResult {
    let features1 = extract_profile(&user1.tracks);
    let features2 = extract_profile(&user2.tracks);

    let items1 = TopItems::new(user1.artists, user1.tracks);
    let items2 = TopItems::new(user2.artists, user2.tracks);

    let shared = intersect(&items1, &items2);
    let breakdown = similarity::score(
        &items1,
        &features1.vector,
        &items2,
        &features2.vector,
        weights,
    );

    let recommendations = insights::generate(&InsightContext {
        user1: &user1.profile,
        user2: &user2.profile,
        coverage1: coverage(&items1, &features1),
        coverage2: coverage(&items2, &features2),
        shared: &shared,
        breakdown: &breakdown,
    });

    ComparisonResult {
        user1: user1.profile,
        user2: user2.profile,
        similarity_score: breakdown.score,
        shared_artists: shared.artists,
        shared_tracks: shared.tracks,
        shared_genres: shared.genres,
        audio_features_comparison: breakdown.features,
        recommendations,
    }
}

/// Summarize one user's fetched data as a taste profile.
pub fn taste_profile(listening: UserListening) -> TasteProfile {
    let features = extract_profile(&listening.tracks);
    let items = TopItems::new(listening.artists, listening.tracks);

    TasteProfile {
        profile: listening.profile,
        top_artists: items.artists,
        top_tracks: items.tracks,
        genres: items.genres,
        audio_features: features.vector,
    }
}

fn coverage(items: &TopItems, features: &FeatureProfile) -> DataCoverage {
    DataCoverage {
        artists: items.artists.len(),
        tracks: items.tracks.len(),
        measured_tracks: features.tracks_measured,
    }
}
