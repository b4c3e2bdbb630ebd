use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::catalog::spotify::{TimeRange, DEFAULT_API_URL};
use crate::pipeline::compare::DEFAULT_TOP_LIMIT;
use crate::scoring::similarity::SimilarityWeights;

/// Default comparison deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Central configuration loaded from environment variables.
///
/// Access tokens live in a separate file (never in env or code). The .env
/// file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify Web API base URL (defaults to https://api.spotify.com)
    pub spotify_api_url: String,
    /// JSON file mapping user ids to access tokens
    pub tokens_path: PathBuf,
    /// When set, serve users from this fixture file instead of Spotify
    pub fixtures_path: Option<PathBuf>,
    /// Number of top artists / tracks requested per user
    pub top_limit: usize,
    /// Listening window for top items
    pub time_range: TimeRange,
    /// Deadline for a whole comparison
    pub timeout: Duration,
    /// Composite score weights
    pub weights: SimilarityWeights,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset keys take their defaults; set-but-invalid values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SimilarityWeights::default();
        let weights = SimilarityWeights {
            artists: parse_or(&lookup, "TASTEMATCH_WEIGHT_ARTISTS", defaults.artists)?,
            tracks: parse_or(&lookup, "TASTEMATCH_WEIGHT_TRACKS", defaults.tracks)?,
            genres: parse_or(&lookup, "TASTEMATCH_WEIGHT_GENRES", defaults.genres)?,
            features: parse_or(&lookup, "TASTEMATCH_WEIGHT_FEATURES", defaults.features)?,
        };
        if !weights.is_valid() {
            anyhow::bail!(
                "Scorer weights must be non-negative with a positive total, got {:?}",
                weights
            );
        }

        let top_limit: usize = parse_or(&lookup, "TASTEMATCH_TOP_LIMIT", DEFAULT_TOP_LIMIT)?;
        if top_limit == 0 {
            anyhow::bail!("TASTEMATCH_TOP_LIMIT must be at least 1");
        }

        let timeout_secs: u64 = parse_or(&lookup, "TASTEMATCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            anyhow::bail!("TASTEMATCH_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            spotify_api_url: lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            tokens_path: lookup("TASTEMATCH_TOKENS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./tokens.json")),
            fixtures_path: lookup("TASTEMATCH_FIXTURES_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            top_limit,
            time_range: parse_or(&lookup, "TASTEMATCH_TIME_RANGE", TimeRange::default())?,
            timeout: Duration::from_secs(timeout_secs),
            weights,
        })
    }

    /// Check that the chosen catalog backend has what it needs.
    /// Fixtures: the fixture file must exist. Spotify: the token file must exist.
    pub fn require_catalog(&self) -> Result<()> {
        match &self.fixtures_path {
            Some(path) if !path.exists() => anyhow::bail!(
                "Fixture file not found: {}\n\
                 Unset TASTEMATCH_FIXTURES_PATH to use the Spotify catalog instead.",
                path.display()
            ),
            Some(_) => Ok(()),
            None if !self.tokens_path.exists() => anyhow::bail!(
                "Token file not found: {}\n\
                 Set TASTEMATCH_TOKENS_PATH to a JSON object of user id -> access token.\n\
                 See .env.example for the required variables.",
                self.tokens_path.display()
            ),
            None => Ok(()),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value for {key}: '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.spotify_api_url, DEFAULT_API_URL);
        assert_eq!(config.top_limit, 20);
        assert_eq!(config.time_range, TimeRange::MediumTerm);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.weights, SimilarityWeights::default());
        assert!(config.fixtures_path.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("TASTEMATCH_TOP_LIMIT", "50"),
            ("TASTEMATCH_TIME_RANGE", "short_term"),
            ("TASTEMATCH_WEIGHT_FEATURES", "0.5"),
            ("TASTEMATCH_FIXTURES_PATH", "./users.json"),
        ])
        .unwrap();
        assert_eq!(config.top_limit, 50);
        assert_eq!(config.time_range, TimeRange::ShortTerm);
        assert_eq!(config.weights.features, 0.5);
        assert_eq!(config.fixtures_path, Some(PathBuf::from("./users.json")));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config_from(&[("TASTEMATCH_TOP_LIMIT", "many")]).is_err());
        assert!(config_from(&[("TASTEMATCH_TOP_LIMIT", "0")]).is_err());
        assert!(config_from(&[("TASTEMATCH_WEIGHT_ARTISTS", "-1")]).is_err());
        assert!(config_from(&[("TASTEMATCH_TIME_RANGE", "forever")]).is_err());
    }
}
