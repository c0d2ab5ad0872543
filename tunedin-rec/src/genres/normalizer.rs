//! Genre normalization
//!
//! Maps free-form genre and mood words produced by text analysis onto the
//! catalog vocabulary. Unknown words are dropped rather than guessed.

use super::vocabulary::CATALOG_VOCABULARY;

/// Catalog genre-filter limit per search
pub const MAX_NORMALIZED_GENRES: usize = 5;

/// Returned when nothing in the input maps to the vocabulary
pub const DEFAULT_GENRES: [&str; 2] = ["pop", "indie"];

/// Informal spelling → catalog vocabulary entry (many-to-one)
///
/// Keys are already in normalized form (lowercase, hyphen-separated).
const GENRE_MAP: &[(&str, &str)] = &[
    // Moods
    ("aggressive", "metal"),
    ("angry", "metal"),
    ("calm", "chill"),
    ("chillout", "chill"),
    ("chill-out", "chill"),
    ("relaxing", "chill"),
    ("relaxed", "chill"),
    ("mellow", "chill"),
    ("peaceful", "sleep"),
    ("dreamy", "ambient"),
    ("atmospheric", "ambient"),
    ("mysterious", "ambient"),
    ("meditative", "ambient"),
    ("melancholic", "sad"),
    ("melancholy", "sad"),
    ("emotional", "sad"),
    ("romantic", "romance"),
    ("love", "romance"),
    ("upbeat", "happy"),
    ("cheerful", "happy"),
    ("joyful", "happy"),
    ("energetic", "work-out"),
    ("workout", "work-out"),
    ("motivational", "work-out"),
    ("focus", "study"),
    ("focused", "study"),
    ("dark", "goth"),
    ("epic", "soundtracks"),
    ("cinematic", "soundtracks"),
    ("soundtrack", "soundtracks"),
    ("film-score", "soundtracks"),
    ("christmas", "holidays"),
    // Hip-hop and R&B spellings
    ("rap", "hip-hop"),
    ("hiphop", "hip-hop"),
    ("trap", "hip-hop"),
    ("boom-bap", "hip-hop"),
    ("rnb", "r-n-b"),
    ("r&b", "r-n-b"),
    ("r-and-b", "r-n-b"),
    ("rhythm-and-blues", "r-n-b"),
    ("neo-soul", "soul"),
    ("motown", "soul"),
    // Electronic sub-genres
    ("lo-fi", "chill"),
    ("lofi", "chill"),
    ("lo-fi-hip-hop", "chill"),
    ("chillhop", "chill"),
    ("synthwave", "synth-pop"),
    ("retrowave", "synth-pop"),
    ("new-wave", "synth-pop"),
    ("vaporwave", "electronic"),
    ("electronica", "electronic"),
    ("downtempo", "trip-hop"),
    ("drum-n-bass", "drum-and-bass"),
    ("dnb", "drum-and-bass"),
    ("jungle", "drum-and-bass"),
    ("dance-pop", "dance"),
    ("eurodance", "dance"),
    ("tech-house", "house"),
    ("minimal", "minimal-techno"),
    // Rock family
    ("classic-rock", "rock"),
    ("soft-rock", "rock"),
    ("alternative-rock", "alt-rock"),
    ("indie-rock", "indie"),
    ("shoegaze", "indie"),
    ("dream-pop", "indie-pop"),
    ("post-rock", "alternative"),
    ("rock-and-roll", "rock-n-roll"),
    ("nu-metal", "metal"),
    ("thrash-metal", "heavy-metal"),
    ("pop-punk", "punk-rock"),
    ("post-punk", "punk"),
    // Acoustic, folk, roots
    ("folk-rock", "folk"),
    ("indie-folk", "folk"),
    ("americana", "country"),
    ("bossa-nova", "bossanova"),
    ("orchestral", "classical"),
    ("instrumental", "piano"),
    ("world", "world-music"),
    ("latin-pop", "latin"),
    ("kpop", "k-pop"),
    ("jpop", "j-pop"),
    ("musical", "show-tunes"),
];

/// Canonical spelling used for lookups: trimmed, lowercased, and with runs of
/// whitespace or underscores collapsed into single hyphens
pub fn canonical_spelling(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Resolve one tag to a vocabulary entry, if possible
pub fn map_genre(raw: &str) -> Option<&'static str> {
    let key = canonical_spelling(raw);
    if let Some((_, mapped)) = GENRE_MAP.iter().find(|(k, _)| *k == key) {
        return Some(*mapped);
    }
    let idx = CATALOG_VOCABULARY.binary_search(&key.as_str()).ok()?;
    Some(CATALOG_VOCABULARY[idx])
}

/// Normalize raw genre tags to catalog vocabulary entries
///
/// Preserves input order, removes duplicates, caps at
/// [`MAX_NORMALIZED_GENRES`] and never returns an empty list.
pub fn normalize<S: AsRef<str>>(raw_genres: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(raw_genres.len());

    for raw in raw_genres {
        let raw = raw.as_ref();
        match map_genre(raw) {
            Some(genre) => {
                if !normalized.iter().any(|g| g == genre) {
                    normalized.push(genre.to_string());
                }
            }
            None => tracing::debug!(genre = %raw, "Dropping genre outside catalog vocabulary"),
        }
        if normalized.len() == MAX_NORMALIZED_GENRES {
            break;
        }
    }

    if normalized.is_empty() {
        tracing::debug!("No usable genres, falling back to defaults");
        return DEFAULT_GENRES.iter().map(|g| g.to_string()).collect();
    }

    normalized
}
