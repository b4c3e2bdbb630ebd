// Set intersection — what two users' top lists have in common.
//
// Shared items are ranked by mutual prominence: each list contributes a
// reciprocal-rank weight 1 / (position + 1), and an item's rank is the sum of
// its weights in both lists. Higher sums come first; ties go to the smaller
// identifier. Because the sum is commutative, intersect(A, B) and
// intersect(B, A) produce the same order.
//
// Artists and tracks match by identifier. Genres match by exact string after
// trimming and lowercasing (no fuzzy matching).

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::{Artist, Track};

/// A user's top lists, ready for pairwise comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopItems {
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
    /// Aggregated from the artists' genre tags, most frequent first
    pub genres: Vec<String>,
}

impl TopItems {
    /// Build from top artists and tracks, deriving the genre list.
    pub fn new(artists: Vec<Artist>, tracks: Vec<Track>) -> Self {
        let genres = aggregate_genres(&artists);
        Self {
            artists,
            tracks,
            genres,
        }
    }

    /// True when the user has neither top artists nor top tracks.
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.tracks.is_empty()
    }
}

/// The items both users have in common, most mutually prominent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedItems {
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
    pub genres: Vec<String>,
}

/// Weight of the item at `position` (0-based) in a ranked list.
pub fn rank_weight(position: usize) -> f64 {
    1.0 / (position as f64 + 1.0)
}

/// Canonical form used for genre matching.
pub fn normalize_genre(genre: &str) -> String {
    genre.trim().to_lowercase()
}

/// Collect the genres of a user's top artists.
///
/// Genres are normalized and deduplicated, then ordered by how many of the
/// artists carry them (descending), with first appearance breaking ties.
pub fn aggregate_genres(artists: &[Artist]) -> Vec<String> {
    // genre -> (artist count, first-seen index)
    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next_index = 0;

    for artist in artists {
        let mut per_artist = HashSet::new();
        for genre in &artist.genres {
            let genre = normalize_genre(genre);
            if genre.is_empty() || !per_artist.insert(genre.clone()) {
                continue;
            }
            let entry = seen.entry(genre).or_insert_with(|| {
                next_index += 1;
                (0, next_index)
            });
            entry.0 += 1;
        }
    }

    let mut genres: Vec<(String, usize, usize)> = seen
        .into_iter()
        .map(|(genre, (count, first))| (genre, count, first))
        .collect();
    genres.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    genres.into_iter().map(|(genre, _, _)| genre).collect()
}

/// Compute shared artists, tracks and genres between two users.
///
/// Returned artists and tracks are the first user's copies; identity is
/// the same on both sides.
pub fn intersect(a: &TopItems, b: &TopItems) -> SharedItems {
    SharedItems {
        artists: rank_shared(&a.artists, &b.artists, |x| x.id.clone())
            .into_iter()
            .cloned()
            .collect(),
        tracks: rank_shared(&a.tracks, &b.tracks, |x| x.id.clone())
            .into_iter()
            .cloned()
            .collect(),
        genres: rank_shared(&a.genres, &b.genres, |g| normalize_genre(g))
            .into_iter()
            .map(|g| normalize_genre(g))
            .collect(),
    }
}

/// Items present (by key) in both lists, ordered by summed rank weight.
///
/// Only the first occurrence of a key in each list counts.
pub fn rank_shared<'a, T, K>(a: &'a [T], b: &[T], key: K) -> Vec<&'a T>
where
    K: Fn(&T) -> String,
{
    let positions_b = first_positions(b, &key);

    let mut seen = HashSet::new();
    let mut shared: Vec<(f64, String, &'a T)> = Vec::new();
    for (pos_a, item) in a.iter().enumerate() {
        let k = key(item);
        if !seen.insert(k.clone()) {
            continue;
        }
        if let Some(&pos_b) = positions_b.get(&k) {
            shared.push((rank_weight(pos_a) + rank_weight(pos_b), k, item));
        }
    }

    shared.sort_by(|x, y| {
        y.0.partial_cmp(&x.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.1.cmp(&y.1))
    });
    shared.into_iter().map(|(_, _, item)| item).collect()
}

/// Map each distinct key to the position of its first occurrence.
pub(crate) fn first_positions<T, K>(items: &[T], key: K) -> HashMap<String, usize>
where
    K: Fn(&T) -> String,
{
    let mut positions = HashMap::new();
    for (pos, item) in items.iter().enumerate() {
        positions.entry(key(item)).or_insert(pos);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: &str, genres: &[&str]) -> Artist {
        Artist {
            id: id.to_string(),
            name: id.to_uppercase(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            popularity: 50,
            images: vec![],
        }
    }

    #[test]
    fn genres_aggregate_by_frequency() {
        let artists = vec![
            artist("a", &["Indie", "rock"]),
            artist("b", &["pop", "rock"]),
            artist("c", &["ROCK ", "pop"]),
        ];
        assert_eq!(aggregate_genres(&artists), vec!["rock", "pop", "indie"]);
    }

    #[test]
    fn duplicate_tags_on_one_artist_count_once() {
        let artists = vec![artist("a", &["pop", "Pop"]), artist("b", &["jazz"])];
        assert_eq!(aggregate_genres(&artists), vec!["pop", "jazz"]);
    }

    #[test]
    fn shared_artists_ranked_by_mutual_prominence() {
        let a = TopItems::new(
            vec![artist("x", &[]), artist("y", &[]), artist("z", &[])],
            vec![],
        );
        let b = TopItems::new(
            vec![artist("z", &[]), artist("q", &[]), artist("y", &[])],
            vec![],
        );
        // y: 1/2 + 1/3, z: 1/3 + 1 -> z first
        let shared = intersect(&a, &b);
        let ids: Vec<&str> = shared.artists.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y"]);
    }

    #[test]
    fn ties_break_by_identifier() {
        let a = TopItems::new(vec![artist("m", &[]), artist("b", &[])], vec![]);
        let b = TopItems::new(vec![artist("b", &[]), artist("m", &[])], vec![]);
        let shared = intersect(&a, &b);
        let ids: Vec<&str> = shared.artists.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "m"]);
    }

    #[test]
    fn genre_matching_is_case_insensitive() {
        let a = TopItems {
            genres: vec!["Pop".to_string(), "Rock".to_string()],
            ..Default::default()
        };
        let b = TopItems {
            genres: vec!["rock".to_string(), "jazz".to_string()],
            ..Default::default()
        };
        assert_eq!(intersect(&a, &b).genres, vec!["rock"]);
    }

    #[test]
    fn empty_lists_share_nothing() {
        let shared = intersect(&TopItems::default(), &TopItems::default());
        assert_eq!(shared, SharedItems::default());
    }
}
