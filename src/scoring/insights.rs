// Insight generation — short observations about a comparison.
//
// Insights come from an ordered rule table. Each rule is one category and
// contributes at most one line; rules are evaluated in table order. When
// either user has no top artists and no top tracks, only the
// insufficient-history rule runs: we don't describe tastes we can't see.

use crate::features::vector::AudioFeature;
use crate::models::{FeatureComparison, UserProfile};

use super::intersect::SharedItems;
use super::similarity::SimilarityBreakdown;

/// Score at or above which two users count as highly compatible.
pub const HIGH_COMPATIBILITY: u8 = 70;

/// Score at or above which two users count as moderately similar.
pub const MODERATE_COMPATIBILITY: u8 = 40;

/// Minimum gap on a user's dominant feature that earns a contrast insight.
pub const CONTRAST_THRESHOLD: f64 = 0.4;

/// Maximum number of genres named in the shared-genre insight.
pub const MAX_NAMED_GENRES: usize = 3;

/// How much listening data backs one side of the comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DataCoverage {
    pub artists: usize,
    pub tracks: usize,
    /// Tracks that carried catalog audio features
    pub measured_tracks: usize,
}

impl DataCoverage {
    pub fn has_history(&self) -> bool {
        self.artists > 0 || self.tracks > 0
    }

    pub fn has_features(&self) -> bool {
        self.measured_tracks > 0
    }
}

/// Everything the rules can look at.
pub struct InsightContext<'a> {
    pub user1: &'a UserProfile,
    pub user2: &'a UserProfile,
    pub coverage1: DataCoverage,
    pub coverage2: DataCoverage,
    pub shared: &'a SharedItems,
    pub breakdown: &'a SimilarityBreakdown,
}

impl InsightContext<'_> {
    fn history_missing(&self) -> bool {
        !self.coverage1.has_history() || !self.coverage2.has_history()
    }
}

/// One insight category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightRule {
    InsufficientHistory,
    ScoreBand,
    SharedGenres,
    SharedArtists,
    FeatureContrast,
    NeutralFeatures,
}

impl InsightRule {
    /// The rule table, in evaluation order.
    pub const TABLE: [InsightRule; 6] = [
        InsightRule::InsufficientHistory,
        InsightRule::ScoreBand,
        InsightRule::SharedGenres,
        InsightRule::SharedArtists,
        InsightRule::FeatureContrast,
        InsightRule::NeutralFeatures,
    ];

    /// Whether this rule only makes sense when both users have history.
    pub fn needs_history(&self) -> bool {
        !matches!(self, InsightRule::InsufficientHistory)
    }

    /// Evaluate the rule, returning its insight if it applies.
    pub fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<String> {
        match self {
            InsightRule::InsufficientHistory => insufficient_history(ctx),
            InsightRule::ScoreBand => Some(score_band(ctx.breakdown.score).to_string()),
            InsightRule::SharedGenres => shared_genres(ctx.shared),
            InsightRule::SharedArtists => shared_artists(ctx.shared),
            InsightRule::FeatureContrast => feature_contrast(ctx),
            InsightRule::NeutralFeatures => neutral_features(ctx),
        }
    }
}

/// Run the rule table and collect the insights in order.
pub fn generate(ctx: &InsightContext<'_>) -> Vec<String> {
    let history_missing = ctx.history_missing();
    InsightRule::TABLE
        .iter()
        .filter(|rule| !(history_missing && rule.needs_history()))
        .filter_map(|rule| rule.evaluate(ctx))
        .collect()
}

/// The score-band message for a composite score.
pub fn score_band(score: u8) -> &'static str {
    if score >= HIGH_COMPATIBILITY {
        "You have very similar music tastes and are highly compatible! You'd probably enjoy each other's playlists."
    } else if score >= MODERATE_COMPATIBILITY {
        "You're moderately similar: you have some great overlaps in your music taste with room to discover new favorites."
    } else {
        "You have quite different tastes in music - perfect for discovering new music together!"
    }
}

fn insufficient_history(ctx: &InsightContext<'_>) -> Option<String> {
    let missing: Vec<&str> = [(ctx.user1, ctx.coverage1), (ctx.user2, ctx.coverage2)]
        .into_iter()
        .filter(|(_, coverage)| !coverage.has_history())
        .map(|(user, _)| user.display_name.as_str())
        .collect();

    match missing.as_slice() {
        [] => None,
        [one] => Some(format!(
            "Insufficient data: {one} doesn't have enough listening history to compare yet."
        )),
        [first, second, ..] => Some(format!(
            "Insufficient data: {first} and {second} don't have enough listening history to compare yet."
        )),
    }
}

fn shared_genres(shared: &SharedItems) -> Option<String> {
    if shared.genres.is_empty() {
        return None;
    }
    let named: Vec<&str> = shared
        .genres
        .iter()
        .take(MAX_NAMED_GENRES)
        .map(String::as_str)
        .collect();
    Some(format!("You both love {} music.", named.join(", ")))
}

fn shared_artists(shared: &SharedItems) -> Option<String> {
    let top = shared.artists.first()?;
    match shared.artists.len() {
        1 => Some(format!("You share 1 top artist: {}.", top.name)),
        n => Some(format!("You share {n} top artists, led by {}.", top.name)),
    }
}

fn feature_contrast(ctx: &InsightContext<'_>) -> Option<String> {
    if !ctx.coverage1.has_features() || !ctx.coverage2.has_features() {
        return None;
    }

    // (leader, other, (leader's value, other's value))
    let sides: [(&UserProfile, &UserProfile, fn(&FeatureComparison) -> (f64, f64)); 2] = [
        (ctx.user1, ctx.user2, |c| (c.user1, c.user2)),
        (ctx.user2, ctx.user1, |c| (c.user2, c.user1)),
    ];

    sides.into_iter().find_map(|(leader, other, values)| {
        let (feature, (lead, trail)) = ctx
            .breakdown
            .features
            .iter()
            .map(|(f, c)| (*f, values(c)))
            .fold(None, |best: Option<(AudioFeature, (f64, f64))>, (f, v)| match best {
                Some((_, (best_lead, _))) if best_lead >= v.0 => best,
                _ => Some((f, v)),
            })?;

        ((lead - trail).abs() > CONTRAST_THRESHOLD).then(|| {
            format!(
                "{} leans into {} ({:.0}%) while {} sits at {:.0}%.",
                leader.display_name,
                feature,
                lead * 100.0,
                other.display_name,
                trail * 100.0
            )
        })
    })
}

fn neutral_features(ctx: &InsightContext<'_>) -> Option<String> {
    let missing: Vec<&str> = [(ctx.user1, ctx.coverage1), (ctx.user2, ctx.coverage2)]
        .into_iter()
        .filter(|(_, coverage)| !coverage.has_features())
        .map(|(user, _)| user.display_name.as_str())
        .collect();

    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "Insufficient data: no audio features for {}'s top tracks, so neutral values were used.",
        missing.join(" and ")
    ))
}
