//! Search strategy planning
//!
//! Builds the per-request list of catalog queries. Genre-filter variants are
//! high priority; a random subset of them is kept and shuffled so identical
//! input does not always produce the same queries. Tempo-augmented variants
//! are low priority and always appended last.

use crate::genres::keywords::primary_term;
use crate::tempo;
use crate::types::Tempo;
use rand::seq::SliceRandom;
use rand::Rng;

/// Execution priority of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Low,
}

/// One planned catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    /// Free-text query including `genre:` filter tokens
    pub query: String,
    /// Human-readable description for logs
    pub label: String,
    pub priority: Priority,
    /// Number of genre filters in the query
    pub genre_count: usize,
}

/// Which high-priority variants survive for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetPolicy {
    /// Keep every variant (40%)
    All,
    /// One single-genre and one multi-genre variant (30%)
    SingleAndMulti,
    /// Exactly one variant chosen at random (30%)
    One,
}

impl SubsetPolicy {
    /// Draw a policy with the 40/30/30 split
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.4 {
            SubsetPolicy::All
        } else if roll < 0.7 {
            SubsetPolicy::SingleAndMulti
        } else {
            SubsetPolicy::One
        }
    }
}

fn genre_filter(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| format!("genre:{}", g))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Genre-filter variants over the first one, two and three genres
fn genre_variants(genres: &[String]) -> Vec<SearchStrategy> {
    (1..=genres.len().min(3))
        .map(|n| {
            let used = &genres[..n];
            SearchStrategy {
                query: genre_filter(used),
                label: format!("genre filter ({})", used.join(" + ")),
                priority: Priority::High,
                genre_count: n,
            }
        })
        .collect()
}

fn select_subset<R: Rng + ?Sized>(
    mut variants: Vec<SearchStrategy>,
    policy: SubsetPolicy,
    rng: &mut R,
) -> Vec<SearchStrategy> {
    match policy {
        SubsetPolicy::All => variants,
        SubsetPolicy::SingleAndMulti => {
            let (singles, multis): (Vec<_>, Vec<_>) =
                variants.drain(..).partition(|s| s.genre_count == 1);
            singles
                .choose(rng)
                .into_iter()
                .chain(multis.choose(rng))
                .cloned()
                .collect()
        }
        SubsetPolicy::One => variants.choose(rng).cloned().into_iter().collect(),
    }
}

/// Tempo-augmented variants: first genre + mood word, first two genres + mood word
fn tempo_variants<R: Rng + ?Sized>(
    genres: &[String],
    tempo: Tempo,
    rng: &mut R,
) -> Vec<SearchStrategy> {
    let Some(keyword) = tempo::top_keywords(tempo).choose(rng) else {
        return Vec::new();
    };

    (1..=genres.len().min(2))
        .map(|n| {
            let used = &genres[..n];
            SearchStrategy {
                query: format!("{} {}", genre_filter(used), keyword),
                label: format!("genre filter ({}) + \"{}\"", used.join(" + "), keyword),
                priority: Priority::Low,
                genre_count: n,
            }
        })
        .collect()
}

/// Plan strategies with a randomly drawn subset policy
pub fn plan<R: Rng + ?Sized>(genres: &[String], tempo: Tempo, rng: &mut R) -> Vec<SearchStrategy> {
    let policy = SubsetPolicy::draw(rng);
    plan_with_policy(genres, tempo, policy, rng)
}

/// Plan strategies with a fixed subset policy
///
/// High-priority strategies come first, in shuffled order; low-priority
/// strategies follow.
pub fn plan_with_policy<R: Rng + ?Sized>(
    genres: &[String],
    tempo: Tempo,
    policy: SubsetPolicy,
    rng: &mut R,
) -> Vec<SearchStrategy> {
    let mut strategies = select_subset(genre_variants(genres), policy, rng);
    strategies.shuffle(rng);
    strategies.extend(tempo_variants(genres, tempo, rng));

    tracing::debug!(
        ?policy,
        strategies = strategies.len(),
        "Planned search strategies"
    );

    strategies
}

/// Plain keyword query for the keyword fallback tier
///
/// Primary search terms of the first two genres plus one mood word for the
/// tempo band.
pub fn keyword_query<R: Rng + ?Sized>(genres: &[String], tempo: Tempo, rng: &mut R) -> String {
    let mut parts: Vec<String> = genres.iter().take(2).map(|g| primary_term(g)).collect();
    if let Some(mood) = tempo::keywords_for(tempo).choose(rng) {
        parts.push((*mood).to_string());
    }
    parts.join(" ")
}

/// Playlist search query for the playlist fallback tier
pub fn playlist_query(genres: &[String], tempo: Tempo) -> String {
    let mood = if tempo.bpm() < 100 { "chill" } else { "energetic" };
    match genres.first() {
        Some(genre) => format!("{} {}", primary_term(genre), mood),
        None => mood.to_string(),
    }
}
