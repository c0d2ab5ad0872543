//! Tempo → mood keywords
//!
//! Audio-feature endpoints are unavailable, so tempo can only influence
//! results through words: as a soft bonus in scoring and as an extra term in
//! low-priority queries. Never a hard filter.

use crate::types::Tempo;

/// Tempo band, ordered slowest to fastest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TempoBand {
    Slow,
    Relaxed,
    Moderate,
    Upbeat,
    Intense,
}

/// Exclusive upper edge of each band: a tempo on an edge belongs to the band
/// above. Tempos past the last edge stay in the top band.
const BAND_EDGES: [(u16, TempoBand); 5] = [
    (70, TempoBand::Slow),
    (90, TempoBand::Relaxed),
    (110, TempoBand::Moderate),
    (130, TempoBand::Upbeat),
    (150, TempoBand::Intense),
];

impl TempoBand {
    pub fn for_tempo(tempo: Tempo) -> Self {
        BAND_EDGES
            .iter()
            .find(|(edge, _)| tempo.bpm() < *edge)
            .map(|(_, band)| *band)
            .unwrap_or(TempoBand::Intense)
    }

    /// Mood adjectives, most characteristic first
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            TempoBand::Slow => &["slow", "ballad", "melancholic", "sad", "emotional"],
            TempoBand::Relaxed => &["chill", "relaxing", "mellow", "downtempo", "laid-back"],
            TempoBand::Moderate => &["groovy", "smooth", "steady", "moderate"],
            TempoBand::Upbeat => &["upbeat", "energetic", "driving", "lively"],
            TempoBand::Intense => &["fast", "intense", "high-energy", "powerful", "aggressive"],
        }
    }
}

/// Mood keywords for a tempo, most characteristic first (never empty)
pub fn keywords_for(tempo: Tempo) -> &'static [&'static str] {
    TempoBand::for_tempo(tempo).keywords()
}

/// The keywords strong enough to earn the scorer's keyword bonus
pub fn top_keywords(tempo: Tempo) -> &'static [&'static str] {
    let all = keywords_for(tempo);
    &all[..all.len().min(3)]
}
