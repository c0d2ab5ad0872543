//! Heuristic track relevance scoring
//!
//! The catalog exposes neither audio features nor per-track genres, so the
//! score is built from what search results do carry: popularity and the words
//! in the track and artist names.
//!
//! | Signal              | Weight | Value                                   |
//! |---------------------|--------|-----------------------------------------|
//! | Popularity          | 0.075  | `popularity / 100`                      |
//! | Genre text match    | 0.85   | fraction of target genres found in text |
//! | Tempo text match    | 0.075  | 0, 0.5 (mood keyword) or 1.0 (BPM)      |
//!
//! The tempo signal is a bonus: absence contributes 0, never a penalty.

use crate::genres::keywords;
use crate::tempo;
use crate::types::{ScoredCandidate, Tempo, Track};
use regex::Regex;

pub const POPULARITY_WEIGHT: f64 = 0.075;
pub const GENRE_WEIGHT: f64 = 0.85;
pub const TEMPO_WEIGHT: f64 = 0.075;

/// Scorer bound to one request's target genres and tempo
#[derive(Debug, Clone)]
pub struct TrackScorer {
    /// Per target genre: the spellings that count as a match
    genre_variants: Vec<Vec<String>>,
    mood_keywords: &'static [&'static str],
    bpm_literal: Option<Regex>,
}

impl TrackScorer {
    pub fn new<S: AsRef<str>>(target_tempo: Tempo, target_genres: &[S]) -> Self {
        let genre_variants = target_genres
            .iter()
            .map(|g| keywords::title_variants(g.as_ref()))
            .filter(|variants| !variants.is_empty())
            .collect();

        // Target tempo or its nearest multiple of ten, as a standalone number
        // optionally followed by "bpm"
        let bpm = target_tempo.bpm();
        let rounded = target_tempo.rounded_to_ten();
        let bpm_literal = Regex::new(&format!(r"\b(?:{}|{})(?:\s*bpm)?\b", bpm, rounded)).ok();

        Self {
            genre_variants,
            mood_keywords: tempo::top_keywords(target_tempo),
            bpm_literal,
        }
    }

    /// Relevance in [0, 1]
    pub fn score(&self, track: &Track) -> f64 {
        let text = track.search_text();
        let total = POPULARITY_WEIGHT * popularity_signal(track)
            + GENRE_WEIGHT * self.genre_signal(&text)
            + TEMPO_WEIGHT * self.tempo_signal(&text);
        total.clamp(0.0, 1.0)
    }

    pub fn score_candidate(&self, track: Track) -> ScoredCandidate {
        let score = self.score(&track);
        ScoredCandidate { track, score }
    }

    /// Fraction of target genres mentioned in the track text
    fn genre_signal(&self, text: &str) -> f64 {
        if self.genre_variants.is_empty() {
            return 0.0;
        }
        let matched = self
            .genre_variants
            .iter()
            .filter(|variants| variants.iter().any(|v| text.contains(v.as_str())))
            .count();
        matched as f64 / self.genre_variants.len() as f64
    }

    fn tempo_signal(&self, text: &str) -> f64 {
        if self
            .bpm_literal
            .as_ref()
            .is_some_and(|re| re.is_match(text))
        {
            return 1.0;
        }
        if self.mood_keywords.iter().any(|kw| text.contains(kw)) {
            return 0.5;
        }
        0.0
    }
}

fn popularity_signal(track: &Track) -> f64 {
    f64::from(track.popularity.min(100)) / 100.0
}

/// One-off score of `track` against a target tempo and genres
pub fn score<S: AsRef<str>>(track: &Track, target_tempo: Tempo, target_genres: &[S]) -> f64 {
    TrackScorer::new(target_tempo, target_genres).score(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Artist;

    fn track(name: &str, artist: &str, popularity: u8) -> Track {
        Track {
            id: format!("id-{}", name),
            name: name.to_string(),
            artists: vec![Artist {
                id: format!("artist-{}", artist),
                name: artist.to_string(),
            }],
            popularity,
            album_art_url: None,
            external_url: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!(approx(POPULARITY_WEIGHT + GENRE_WEIGHT + TEMPO_WEIGHT, 1.0));
    }

    #[test]
    fn test_popularity_only() {
        let s = score(&track("Untitled", "Nobody", 100), Tempo::new(100), &["jazz"]);
        assert!(approx(s, 0.075));
    }

    #[test]
    fn test_zero_relevance_scores_zero() {
        let s = score(&track("Untitled", "Nobody", 0), Tempo::new(100), &["jazz"]);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_genre_fraction() {
        let t = track("Ambient Dreams", "Someone", 0);
        let s = score(&t, Tempo::new(100), &["ambient", "electronic"]);
        assert!(approx(s, 0.85 * 0.5));
    }

    #[test]
    fn test_hyphenated_genre_matches_spaced_text() {
        let t = track("Late Night Hip Hop", "Crew", 0);
        let s = score(&t, Tempo::new(100), &["hip-hop"]);
        assert!(approx(s, 0.85));
    }

    #[test]
    fn test_genre_matches_catalog_title_spellings() {
        let cases = [
            ("Smooth R&B Nights", "r-n-b"),
            ("HipHop Beats", "hip-hop"),
            ("Workout Mix", "work-out"),
            ("Lo-Fi Study", "chill"),
            ("Synthpop Forever", "synth-pop"),
        ];
        for (name, genre) in cases {
            let s = score(&track(name, "Someone", 0), Tempo::new(100), &[genre]);
            assert!(s >= 0.85 - 1e-9, "{} vs {} scored {}", name, genre, s);
        }
    }

    #[test]
    fn test_full_match_with_bpm_scores_at_least_0_925() {
        for popularity in [0u8, 37, 100] {
            let t = track("Jazz Rain 120 BPM", "Lounge Trio", popularity);
            let s = score(&t, Tempo::new(120), &["jazz"]);
            assert!(s >= 0.925 - 1e-9, "popularity {} scored {}", popularity, s);
        }
    }

    #[test]
    fn test_bpm_literal_overrides_keyword_bonus() {
        // "Slow" is a top-3 keyword for 65 bpm, but the literal wins
        let t = track("Slow Ballad 65 BPM", "Quiet Hours", 40);
        let s = score(&t, Tempo::new(65), &["ambient"]);
        assert!(approx(s, 0.075 * 0.4 + 0.075 * 1.0));
    }

    #[test]
    fn test_bpm_literal_accepts_rounded_tempo_and_suffix() {
        let t = track("Runner 130bpm", "Pace", 0);
        let s = score(&t, Tempo::new(128), &["techno"]);
        assert!(approx(s, 0.075));
    }

    #[test]
    fn test_bpm_literal_requires_standalone_number() {
        let t = track("Route 170", "Highway", 0);
        let s = score(&t, Tempo::new(70), &["rock"]);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_mood_keyword_half_bonus() {
        let t = track("Upbeat Morning", "Sunrise", 0);
        let s = score(&t, Tempo::new(120), &["pop"]);
        assert!(approx(s, 0.075 * 0.5));
    }

    #[test]
    fn test_keyword_outside_top_three_earns_nothing() {
        // "lively" is fourth for the upbeat band
        let t = track("Lively", "Band", 0);
        let s = score(&t, Tempo::new(120), &["pop"]);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_artist_name_counts_as_text() {
        let t = track("Untitled", "The Jazz Messengers", 0);
        let s = score(&t, Tempo::new(100), &["jazz"]);
        assert!(approx(s, 0.85));
    }

    #[test]
    fn test_score_always_in_unit_range() {
        let names = ["", "pop rock jazz 100 bpm upbeat", "x", "120 120 120"];
        for name in names {
            for popularity in [0u8, 50, 100, 255] {
                for bpm in [60, 100, 120, 180] {
                    let t = track(name, name, popularity);
                    let s = score(&t, Tempo::new(bpm), &["pop", "rock", "jazz"]);
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_no_target_genres() {
        let s = score::<&str>(&track("Pop", "Pop", 0), Tempo::new(100), &[]);
        assert_eq!(s, 0.0);
    }
}
