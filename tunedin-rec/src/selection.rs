//! Artist-diverse candidate pools and random selection
//!
//! Pool construction keeps the ranking bias (callers pass candidates best
//! first) while spreading the pool across artists; the final pick is uniform
//! over the pool so the top-ranked track is not recommended every time.

use crate::types::{ScoredCandidate, Track};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Anything that can be grouped by artist for pooling
pub trait PoolEntry {
    /// Grouping key: the primary artist id, or the track id for tracks
    /// without artist credits
    fn artist_key(&self) -> &str;
}

impl PoolEntry for Track {
    fn artist_key(&self) -> &str {
        self.primary_artist_id().unwrap_or(&self.id)
    }
}

impl PoolEntry for ScoredCandidate {
    fn artist_key(&self) -> &str {
        self.track.artist_key()
    }
}

/// Build an artist-diverse pool from ranked candidates
///
/// Pass 1 takes the best candidate of each artist, in order of first
/// appearance, until `max_per_artist_pass` artists are represented or the pool
/// is full. Pass 2 fills the remaining slots with the highest-ranked leftovers
/// regardless of artist.
///
/// The result never exceeds `max_pool_size`, never contains an input entry
/// twice, and is empty only when the input is (or `max_pool_size` is zero).
pub fn build_pool<T: PoolEntry + Clone>(
    candidates: &[T],
    max_per_artist_pass: usize,
    max_pool_size: usize,
) -> Vec<T> {
    let capacity = max_pool_size.min(candidates.len());
    let mut taken = vec![false; candidates.len()];
    let mut pool: Vec<T> = Vec::with_capacity(capacity);

    // Pass 1: one per artist
    let mut seen_artists: HashSet<&str> = HashSet::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        if pool.len() >= max_pool_size || seen_artists.len() >= max_per_artist_pass {
            break;
        }
        if seen_artists.insert(candidate.artist_key()) {
            taken[idx] = true;
            pool.push(candidate.clone());
        }
    }

    // Pass 2: fill by rank
    for (idx, candidate) in candidates.iter().enumerate() {
        if pool.len() >= max_pool_size {
            break;
        }
        if !taken[idx] {
            taken[idx] = true;
            pool.push(candidate.clone());
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        artists = seen_artists.len(),
        pool = pool.len(),
        "Built diversity pool"
    );

    pool
}

/// Uniform random pick from a pool
pub fn pick<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Option<&'a T> {
    pool.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Artist;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn track(id: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Song {}", id),
            artists: vec![Artist {
                id: artist.to_string(),
                name: format!("Artist {}", artist),
            }],
            popularity: 50,
            album_art_url: None,
            external_url: None,
        }
    }

    fn ids(pool: &[Track]) -> Vec<&str> {
        pool.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_first_pass_one_per_artist_then_fill() {
        let input = vec![
            track("1", "a"),
            track("2", "a"),
            track("3", "b"),
            track("4", "a"),
            track("5", "c"),
        ];
        let pool = build_pool(&input, 20, 4);
        // 1, 3, 5 are the best of a, b, c; 2 is the best leftover
        assert_eq!(ids(&pool), vec!["1", "3", "5", "2"]);
    }

    #[test]
    fn test_artist_cap_limits_first_pass() {
        let input = vec![
            track("1", "a"),
            track("2", "b"),
            track("3", "c"),
            track("4", "a"),
        ];
        let pool = build_pool(&input, 2, 10);
        assert_eq!(ids(&pool), vec!["1", "2", "3", "4"]);
        let first_pass: HashSet<_> = pool[..2].iter().map(|t| t.artist_key()).collect();
        assert_eq!(first_pass.len(), 2);
    }

    #[test]
    fn test_pool_size_cap_and_no_duplicates() {
        let input: Vec<Track> = (0..100)
            .map(|i| track(&i.to_string(), &(i % 7).to_string()))
            .collect();
        let pool = build_pool(&input, 20, 30);
        assert_eq!(pool.len(), 30);
        let unique: HashSet<_> = pool.iter().map(|t| t.id.clone()).collect();
        assert_eq!(unique.len(), 30);
        // 7 artists, all represented first
        let first: HashSet<_> = pool[..7].iter().map(|t| t.artist_key()).collect();
        assert_eq!(first.len(), 7);
    }

    #[test]
    fn test_first_pass_artists_distinct_with_many_artists() {
        let input: Vec<Track> = (0..60)
            .map(|i| track(&i.to_string(), &(i % 25).to_string()))
            .collect();
        let pool = build_pool(&input, 20, 30);
        let first: HashSet<_> = pool[..20].iter().map(|t| t.artist_key()).collect();
        assert_eq!(first.len(), 20);
        assert_eq!(pool.len(), 30);
    }

    #[test]
    fn test_empty_input() {
        let pool = build_pool::<Track>(&[], 20, 30);
        assert!(pool.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick(&pool, &mut rng).is_none());
    }

    #[test]
    fn test_small_input_is_fully_used() {
        let input = vec![track("1", "a"), track("2", "a")];
        let pool = build_pool(&input, 20, 30);
        assert_eq!(ids(&pool), vec!["1", "2"]);
    }

    #[test]
    fn test_tracks_without_artists_group_by_track() {
        let mut lone = track("x", "ignored");
        lone.artists.clear();
        let input = vec![lone.clone(), track("y", "a")];
        let pool = build_pool(&input, 1, 2);
        assert_eq!(pool[0].artist_key(), "x");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_scored_candidates_pool_by_track_artist() {
        let input = vec![
            ScoredCandidate { track: track("1", "a"), score: 0.9 },
            ScoredCandidate { track: track("2", "a"), score: 0.8 },
            ScoredCandidate { track: track("3", "b"), score: 0.1 },
        ];
        let pool = build_pool(&input, 20, 2);
        assert_eq!(pool[0].track.id, "1");
        assert_eq!(pool[1].track.id, "3");
    }

    #[test]
    fn test_pick_covers_whole_pool() {
        let pool: Vec<Track> = (0..5).map(|i| track(&i.to_string(), "a")).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(pick(&pool, &mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), 5);
    }
}
