// Catalog provider trait — swap-ready abstraction over the music catalog.
//
// Every call receives the caller's deadline. Implementations must give up
// once it passes and report `CatalogError::Unavailable`; they never derive
// their own per-call timeouts. Retries, if any, belong to the implementation.

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::{Artist, Track, UserProfile};

/// A fixed point in time by which a request must complete.
pub type Deadline = tokio::time::Instant;

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Resolve a user. Fails with `UserNotFound` for unknown identifiers.
    async fn get_profile(&self, user_id: &str, deadline: Deadline)
        -> Result<UserProfile, CatalogError>;

    /// The user's top artists, most played first, at most `limit` of them.
    async fn get_top_artists(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Artist>, CatalogError>;

    /// The user's top tracks, most played first, at most `limit` of them.
    /// Tracks carry audio features when the catalog has them.
    async fn get_top_tracks(
        &self,
        user_id: &str,
        limit: usize,
        deadline: Deadline,
    ) -> Result<Vec<Track>, CatalogError>;
}
