//! Free-text search terms per genre
//!
//! Keyword search cannot use `genre:` filters, so each genre is expanded to
//! plain words the catalog's text index matches well. The first term is the
//! most representative.

const GENRE_TERMS: &[(&str, &[&str])] = &[
    ("pop", &["pop", "catchy", "upbeat"]),
    ("rock", &["rock", "guitar", "alternative"]),
    ("hip-hop", &["hip hop", "rap", "beats"]),
    ("electronic", &["electronic", "synth", "edm"]),
    ("indie", &["indie", "alternative", "folk"]),
    ("jazz", &["jazz", "smooth", "instrumental"]),
    ("classical", &["classical", "piano", "orchestra"]),
    ("ambient", &["ambient", "chill", "atmospheric"]),
    ("metal", &["metal", "heavy", "hard rock"]),
    ("folk", &["folk", "acoustic", "singer-songwriter"]),
    ("r-n-b", &["r&b", "soul", "smooth"]),
    ("country", &["country", "americana", "folk"]),
    ("reggae", &["reggae", "ska", "dub"]),
    ("blues", &["blues", "soul", "rhythm"]),
    ("soul", &["soul", "motown", "r&b"]),
    ("punk", &["punk", "rock", "alternative"]),
    ("disco", &["disco", "funk", "dance"]),
    ("house", &["house", "electronic", "dance"]),
    ("techno", &["techno", "electronic", "edm"]),
    ("trance", &["trance", "electronic", "progressive"]),
    ("dubstep", &["dubstep", "bass", "electronic"]),
    ("chill", &["chill", "lofi", "relax"]),
    ("synth-pop", &["synthwave", "synth", "retro"]),
    ("trip-hop", &["trip hop", "downtempo", "chill"]),
    ("work-out", &["workout", "energy", "gym"]),
    ("soundtracks", &["soundtrack", "cinematic", "score"]),
];

/// Title spellings that are neither the genre name nor a search term
const TITLE_ALIASES: &[(&str, &[&str])] = &[
    ("chill", &["lo-fi", "lofi"]),
    ("r-n-b", &["rnb", "r and b"]),
    ("synth-pop", &["synthpop"]),
];

/// Primary search term for a catalog genre
///
/// Genres without a dedicated entry use their own name with hyphens read as
/// spaces ("alt-rock" → "alt rock").
pub fn primary_term(genre: &str) -> String {
    GENRE_TERMS
        .iter()
        .find(|(g, _)| *g == genre)
        .map(|(_, terms)| terms[0].to_string())
        .unwrap_or_else(|| genre.replace('-', " "))
}

/// Lowercase spellings of a genre as it shows up in track and artist names
///
/// The genre itself with hyphens kept, spaced and dropped, the primary search
/// term with spaces dropped, and any known aliases. No duplicates.
pub fn title_variants(genre: &str) -> Vec<String> {
    let genre = genre.trim().to_lowercase();
    if genre.is_empty() {
        return Vec::new();
    }
    let term = primary_term(&genre);

    let mut variants: Vec<String> = Vec::new();
    let candidates = [
        genre.clone(),
        genre.replace('-', " "),
        genre.replace('-', ""),
        term.replace([' ', '-'], ""),
        term,
    ];
    let aliases = TITLE_ALIASES
        .iter()
        .find(|(g, _)| *g == genre)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[]);

    for variant in candidates
        .into_iter()
        .chain(aliases.iter().map(|a| a.to_string()))
    {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}
