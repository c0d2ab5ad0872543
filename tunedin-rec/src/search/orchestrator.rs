//! Candidate search orchestration
//!
//! Runs planned strategies against the catalog, accumulates a deduplicated
//! candidate set, then narrows it to one track:
//!
//! 1. popularity window, widened step by step until something survives
//! 2. relevance scoring of the most popular survivors
//! 3. artist-diverse pool of the best candidates
//! 4. uniform random pick from the pool

use crate::catalog::{CatalogClient, CatalogError};
use crate::error::RecommendError;
use crate::scoring::TrackScorer;
use crate::search::planner::{self, SearchStrategy};
use crate::selection::{build_pool, pick};
use crate::types::{ScoredCandidate, Tempo, Track};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use tunedin_common::config::SearchConfig;

/// Executes search strategies and selects a track from the results
pub struct CandidateSearchOrchestrator<'a> {
    catalog: &'a dyn CatalogClient,
    config: &'a SearchConfig,
}

impl<'a> CandidateSearchOrchestrator<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, config: &'a SearchConfig) -> Self {
        Self { catalog, config }
    }

    /// Genre-filtered multi-strategy search
    ///
    /// `Ok(None)` when no strategy returned anything usable.
    pub async fn search(
        &self,
        genres: &[String],
        tempo: Tempo,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError> {
        let strategies = planner::plan(genres, tempo, rng);
        let candidates = self.gather_candidates(&strategies).await?;

        if candidates.is_empty() {
            info!("Genre-filtered search found no candidates");
            return Ok(None);
        }

        Ok(select_track(candidates, genres, tempo, self.config, rng))
    }

    /// Run strategies in order, deduplicating by track id
    ///
    /// Stops before the next strategy once the candidate cap is reached.
    /// Failed strategies count as empty, except authorization failures.
    pub async fn gather_candidates(
        &self,
        strategies: &[SearchStrategy],
    ) -> Result<Vec<Track>, RecommendError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<Track> = Vec::new();

        for strategy in strategies {
            if candidates.len() >= self.config.candidate_cap {
                debug!(cap = self.config.candidate_cap, "Candidate cap reached");
                break;
            }

            match self
                .catalog
                .search_tracks(&strategy.query, self.config.per_strategy_limit)
                .await
            {
                Ok(tracks) => {
                    let before = candidates.len();
                    for track in tracks {
                        if seen.insert(track.id.clone()) {
                            candidates.push(track);
                        }
                    }
                    debug!(
                        strategy = %strategy.label,
                        priority = ?strategy.priority,
                        new = candidates.len() - before,
                        total = candidates.len(),
                        "Strategy complete"
                    );
                }
                Err(CatalogError::Auth(msg)) => return Err(RecommendError::Auth(msg)),
                Err(e) => {
                    warn!(strategy = %strategy.label, error = %e, "Search strategy failed");
                }
            }
        }

        Ok(candidates)
    }
}

/// Successive popularity windows, from the configured one to [0, 100]
///
/// Each step widens both sides by `popularity_step`, clamped to [0, 100].
pub fn popularity_windows(config: &SearchConfig) -> Vec<(u8, u8)> {
    let step = config.popularity_step.max(1);
    let (mut min, mut max) = (config.popularity_min.min(100), config.popularity_max.min(100));
    let mut windows = vec![(min, max)];

    while min > 0 || max < 100 {
        min = min.saturating_sub(step);
        max = max.saturating_add(step).min(100);
        windows.push((min, max));
    }

    windows
}

/// Candidates inside the narrowest popularity window that keeps any
///
/// Falls back to the full set when even the widest window is empty.
pub fn filter_by_popularity(candidates: &[Track], config: &SearchConfig) -> Vec<Track> {
    for (min, max) in popularity_windows(config) {
        let survivors: Vec<Track> = candidates
            .iter()
            .filter(|t| (min..=max).contains(&t.popularity))
            .cloned()
            .collect();
        if !survivors.is_empty() {
            debug!(min, max, survivors = survivors.len(), "Popularity window");
            return survivors;
        }
    }
    candidates.to_vec()
}

/// Filter, score, pool and pick
///
/// Shared by every tier that has a candidate list to choose from. Returns
/// `None` only for an empty candidate list.
pub fn select_track<R: Rng + ?Sized>(
    candidates: Vec<Track>,
    genres: &[String],
    tempo: Tempo,
    config: &SearchConfig,
    rng: &mut R,
) -> Option<Track> {
    if candidates.is_empty() {
        return None;
    }

    let mut survivors = filter_by_popularity(&candidates, config);
    survivors.sort_by(|a, b| b.popularity.cmp(&a.popularity));

    let scorer = TrackScorer::new(tempo, genres);
    let mut scored: Vec<ScoredCandidate> = survivors
        .iter()
        .take(config.score_top_n)
        .cloned()
        .map(|t| scorer.score_candidate(t))
        .filter(|c| c.score > 0.0)
        .collect();

    if !scored.is_empty() {
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        let pool = build_pool(&scored, config.pool_artist_cap, config.pool_size);
        let chosen = pick(&pool, rng)?;
        info!(
            track = %chosen.track.name,
            artist = %chosen.track.artist_names(),
            score = chosen.score,
            pool = pool.len(),
            "Selected scored track"
        );
        return Some(chosen.track.clone());
    }

    let pool = build_pool(&survivors, config.pool_artist_cap, config.pool_size);
    let chosen = pick(&pool, rng)?;
    info!(
        track = %chosen.name,
        artist = %chosen.artist_names(),
        pool = pool.len(),
        "Selected track by popularity"
    );
    Some(chosen.clone())
}
