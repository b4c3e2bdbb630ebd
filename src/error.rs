// Error taxonomy for catalog access and comparisons.
//
// Only two things can go wrong: a user the catalog can't resolve, or a
// catalog that can't answer (network, bad status, undecodable payload,
// deadline). Empty listening history is not an error.

use thiserror::Error;

/// Failure reported by a catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("catalog provider unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a whole comparison. No partial result accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("catalog provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl CompareError {
    /// The deadline passed before every provider call finished.
    pub fn deadline_exceeded() -> Self {
        CompareError::ProviderUnavailable("deadline exceeded".to_string())
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompareError::ProviderUnavailable(_))
    }
}

impl From<CatalogError> for CompareError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UserNotFound(user) => CompareError::UserNotFound(user),
            CatalogError::Unavailable(reason) => CompareError::ProviderUnavailable(reason),
        }
    }
}
