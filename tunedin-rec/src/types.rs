//! Core domain types
//!
//! Tracks are supplied by the catalog and never mutated afterwards. Scores,
//! strategies and pools are derived per request and discarded with it.

use serde::{Deserialize, Serialize};

// ============================================================================
// Tempo
// ============================================================================

/// Target tempo in beats per minute, clamped to [`Tempo::MIN`, `Tempo::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u16")]
pub struct Tempo(u16);

impl Tempo {
    pub const MIN: u16 = 60;
    pub const MAX: u16 = 180;

    /// Clamp an arbitrary BPM value into the supported range
    pub fn new(bpm: i64) -> Self {
        Self(bpm.clamp(Self::MIN as i64, Self::MAX as i64) as u16)
    }

    pub fn bpm(self) -> u16 {
        self.0
    }

    /// Nearest multiple of ten (ties round up)
    pub fn rounded_to_ten(self) -> u16 {
        (self.0 + 5) / 10 * 10
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(100)
    }
}

impl From<i64> for Tempo {
    fn from(bpm: i64) -> Self {
        Self::new(bpm)
    }
}

impl From<Tempo> for u16 {
    fn from(tempo: Tempo) -> Self {
        tempo.0
    }
}

impl std::fmt::Display for Tempo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bpm", self.0)
    }
}

// ============================================================================
// Catalog entities
// ============================================================================

/// Track artist credit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// Catalog track as consumed by scoring and selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    /// Catalog popularity, 0-100
    pub popularity: u8,
    pub album_art_url: Option<String>,
    pub external_url: Option<String>,
}

impl Track {
    /// Identifier of the first credited artist
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().map(|a| a.id.as_str())
    }

    /// Artist names joined for display ("A, B")
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Lowercased track name followed by all artist names
    ///
    /// This is the only text the scorer can match against; the catalog
    /// exposes no structured genre data per track.
    pub fn search_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        for artist in &self.artists {
            text.push(' ');
            text.push_str(&artist.name.to_lowercase());
        }
        text
    }

    /// Web player link (falls back to the canonical open URL)
    pub fn open_url(&self) -> String {
        self.external_url
            .clone()
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", self.id))
    }

    /// Embeddable player URL
    pub fn embed_url(&self) -> String {
        format!("https://open.spotify.com/embed/track/{}", self.id)
    }

    /// Artist page links, in credit order
    pub fn artist_links(&self) -> Vec<ArtistLink> {
        self.artists
            .iter()
            .map(|a| ArtistLink {
                name: a.name.clone(),
                url: format!("https://open.spotify.com/artist/{}", a.id),
            })
            .collect()
    }
}

/// Artist name with its catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistLink {
    pub name: String,
    pub url: String,
}

/// Playlist search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

/// Track paired with its relevance score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub track: Track,
    pub score: f64,
}

// ============================================================================
// Pipeline output
// ============================================================================

/// Fallback tier that produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    GenreFiltered,
    Keyword,
    Playlist,
    Minimal,
}

impl TierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TierKind::GenreFiltered => "genre_filtered",
            TierKind::Keyword => "keyword",
            TierKind::Playlist => "playlist",
            TierKind::Minimal => "minimal",
        }
    }
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chosen track and the context that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub track: Track,
    pub tier: TierKind,
    /// Normalized catalog genres used for the search
    pub genres: Vec<String>,
    pub tempo: Tempo,
}
