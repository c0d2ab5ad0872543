//! Fallback tier ladder
//!
//! Each tier is a progressively looser way of finding *some* track for the
//! request. The pipeline runs them in order and stops at the first one that
//! returns a track. Authorization failures abort the ladder; any other
//! catalog failure just makes the tier come up empty.

use crate::catalog::{CatalogClient, CatalogError, CatalogResult};
use crate::error::RecommendError;
use crate::search::orchestrator::{select_track, CandidateSearchOrchestrator};
use crate::search::planner;
use crate::types::{Tempo, TierKind, Track};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};
use tunedin_common::config::SearchConfig;

/// Playlists considered by the playlist tier
pub const PLAYLIST_SEARCH_LIMIT: u32 = 10;

/// Tracks requested by the minimal tier
pub const MINIMAL_SEARCH_LIMIT: u32 = 20;

/// Everything a tier needs for one request
pub struct TierContext<'a> {
    pub catalog: &'a dyn CatalogClient,
    /// Normalized catalog genres, never empty
    pub genres: &'a [String],
    pub tempo: Tempo,
    pub config: &'a SearchConfig,
}

/// One rung of the fallback ladder
#[async_trait]
pub trait FallbackTier: Send + Sync {
    fn kind(&self) -> TierKind;

    /// `Ok(None)` passes the request on to the next tier
    async fn attempt(
        &self,
        ctx: &TierContext<'_>,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError>;
}

/// Swallow recoverable catalog failures as "nothing found"
fn recover<T: Default>(tier: TierKind, result: CatalogResult<T>) -> Result<T, RecommendError> {
    match result {
        Ok(value) => Ok(value),
        Err(CatalogError::Auth(msg)) => Err(RecommendError::Auth(msg)),
        Err(e) => {
            warn!(%tier, error = %e, "Fallback tier search failed");
            Ok(T::default())
        }
    }
}

/// Tier 1: genre-filtered multi-strategy search
pub struct GenreFilteredTier;

#[async_trait]
impl FallbackTier for GenreFilteredTier {
    fn kind(&self) -> TierKind {
        TierKind::GenreFiltered
    }

    async fn attempt(
        &self,
        ctx: &TierContext<'_>,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError> {
        CandidateSearchOrchestrator::new(ctx.catalog, ctx.config)
            .search(ctx.genres, ctx.tempo, rng)
            .await
    }
}

/// Tier 2: plain keyword search
pub struct KeywordTier;

#[async_trait]
impl FallbackTier for KeywordTier {
    fn kind(&self) -> TierKind {
        TierKind::Keyword
    }

    async fn attempt(
        &self,
        ctx: &TierContext<'_>,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError> {
        let query = planner::keyword_query(ctx.genres, ctx.tempo, rng);
        info!(query = %query, "Trying keyword search");

        let tracks = recover(
            self.kind(),
            ctx.catalog
                .search_tracks(&query, ctx.config.per_strategy_limit)
                .await,
        )?;

        Ok(select_track(tracks, ctx.genres, ctx.tempo, ctx.config, rng))
    }
}

/// Tier 3: tracks from a random matching playlist
pub struct PlaylistTier;

#[async_trait]
impl FallbackTier for PlaylistTier {
    fn kind(&self) -> TierKind {
        TierKind::Playlist
    }

    async fn attempt(
        &self,
        ctx: &TierContext<'_>,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError> {
        let query = planner::playlist_query(ctx.genres, ctx.tempo);
        info!(query = %query, "Trying playlist search");

        let playlists = recover(
            self.kind(),
            ctx.catalog
                .search_playlists(&query, PLAYLIST_SEARCH_LIMIT)
                .await,
        )?;

        let Some(playlist) = playlists.choose(rng) else {
            return Ok(None);
        };
        info!(playlist = %playlist.name, "Using playlist");

        let tracks = recover(
            self.kind(),
            ctx.catalog
                .playlist_tracks(&playlist.id, ctx.config.per_strategy_limit)
                .await,
        )?;
        let tracks: Vec<Track> = tracks.into_iter().filter(|t| !t.id.is_empty()).collect();

        Ok(select_track(tracks, ctx.genres, ctx.tempo, ctx.config, rng))
    }
}

/// Tier 4: first genre as a bare keyword, uniform pick, no scoring
pub struct MinimalTier;

#[async_trait]
impl FallbackTier for MinimalTier {
    fn kind(&self) -> TierKind {
        TierKind::Minimal
    }

    async fn attempt(
        &self,
        ctx: &TierContext<'_>,
        rng: &mut StdRng,
    ) -> Result<Option<Track>, RecommendError> {
        let Some(genre) = ctx.genres.first() else {
            return Ok(None);
        };
        info!(query = %genre, "Trying minimal search");

        let tracks = recover(
            self.kind(),
            ctx.catalog.search_tracks(genre, MINIMAL_SEARCH_LIMIT).await,
        )?;

        Ok(tracks.choose(rng).cloned())
    }
}

/// The full ladder, in order
pub fn default_tiers() -> Vec<Box<dyn FallbackTier>> {
    vec![
        Box::new(GenreFilteredTier),
        Box::new(KeywordTier),
        Box::new(PlaylistTier),
        Box::new(MinimalTier),
    ]
}
