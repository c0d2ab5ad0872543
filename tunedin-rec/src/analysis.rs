//! Mood analysis reply parsing
//!
//! The upstream summarizer is asked to answer in the form
//!
//! ```text
//! genres: ["genre1", "genre2", "genre3"]
//! bpm: 95
//! ```
//!
//! but replies are free text and often decorated with markdown. Parsing is
//! lenient: anything missing falls back to defaults, never to an error.

use crate::types::Tempo;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Genres assumed when the reply names none
pub const DEFAULT_ANALYSIS_GENRES: [&str; 2] = ["ambient", "electronic"];

/// At most this many genres are kept from a reply
pub const MAX_ANALYSIS_GENRES: usize = 3;

/// Raw genre tags and tempo extracted from a summarizer reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    /// Free-form tags, not yet normalized to the catalog vocabulary
    pub genres: Vec<String>,
    pub tempo: Tempo,
}

impl Default for MoodAnalysis {
    fn default() -> Self {
        Self {
            genres: DEFAULT_ANALYSIS_GENRES.iter().map(|g| g.to_string()).collect(),
            tempo: Tempo::default(),
        }
    }
}

static GENRES_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)genres:\s*\[([^\]]+)\]").ok());

static BPM_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)bpm:\s*(\d+)").ok());

/// Parse a summarizer reply
pub fn parse_analysis(reply: &str) -> MoodAnalysis {
    let clean = reply.replace('*', "");
    let clean = clean.trim();

    let mut genres: Vec<String> = Vec::new();
    if let Some(list) = GENRES_PATTERN
        .as_ref()
        .and_then(|re| re.captures(clean))
        .and_then(|c| c.get(1))
    {
        for raw in list.as_str().split(',') {
            let genre = raw
                .trim()
                .replace(['\'', '"'], "")
                .to_lowercase();
            if !genre.is_empty() && !genres.contains(&genre) {
                genres.push(genre);
            }
        }
    }
    genres.truncate(MAX_ANALYSIS_GENRES);

    if genres.is_empty() {
        genres = DEFAULT_ANALYSIS_GENRES.iter().map(|g| g.to_string()).collect();
    }

    // Digits only, so the parse can fail only on overflow
    let tempo = BPM_PATTERN
        .as_ref()
        .and_then(|re| re.captures(clean))
        .and_then(|c| c.get(1))
        .map(|m| Tempo::new(m.as_str().parse::<i64>().unwrap_or(i64::MAX)))
        .unwrap_or_default();

    let analysis = MoodAnalysis { genres, tempo };
    tracing::debug!(genres = ?analysis.genres, bpm = analysis.tempo.bpm(), "Parsed mood analysis");
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_reply() {
        let analysis = parse_analysis("genres: [\"lo-fi\", \"jazz\", \"ambient\"]\nbpm: 85");
        assert_eq!(analysis.genres, vec!["lo-fi", "jazz", "ambient"]);
        assert_eq!(analysis.tempo.bpm(), 85);
    }

    #[test]
    fn test_markdown_and_case_are_ignored() {
        let analysis = parse_analysis("**Genres:** ['Synthwave', 'Techno']\n**BPM:** 128\n");
        assert_eq!(analysis.genres, vec!["synthwave", "techno"]);
        assert_eq!(analysis.tempo.bpm(), 128);
    }

    #[test]
    fn test_bpm_is_clamped() {
        assert_eq!(parse_analysis("genres: [rock]\nbpm: 240").tempo.bpm(), 180);
        assert_eq!(parse_analysis("genres: [rock]\nbpm: 20").tempo.bpm(), 60);
        assert_eq!(parse_analysis("bpm: 99999999999999999999999").tempo.bpm(), 180);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let analysis = parse_analysis("I could not decide.");
        assert_eq!(analysis, MoodAnalysis::default());
        assert_eq!(analysis.tempo.bpm(), 100);
    }

    #[test]
    fn test_genres_deduplicated_and_truncated() {
        let analysis = parse_analysis("genres: [pop, pop, rock, jazz, blues]\nbpm: 100");
        assert_eq!(analysis.genres, vec!["pop", "rock", "jazz"]);
    }

    #[test]
    fn test_blank_entries_dropped() {
        let analysis = parse_analysis("genres: [ , \"\", folk ]");
        assert_eq!(analysis.genres, vec!["folk"]);
    }
}
