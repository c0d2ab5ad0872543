//! Recommendation pipeline
//!
//! Normalizes the requested genres, then walks the fallback ladder until a
//! tier produces a track. Every run gets its own random source and request
//! id; nothing but the catalog's token cache outlives a request.

use crate::catalog::CatalogClient;
use crate::error::RecommendError;
use crate::genres;
use crate::search::fallback::{default_tiers, FallbackTier, TierContext};
use crate::types::{Recommendation, Tempo};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use tunedin_common::config::SearchConfig;
use tunedin_common::uuid_utils::new_request_id;

/// (genres, tempo) → one track, via the fallback ladder
pub struct RecommendationPipeline {
    catalog: Arc<dyn CatalogClient>,
    config: SearchConfig,
    tiers: Vec<Box<dyn FallbackTier>>,
}

impl RecommendationPipeline {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: SearchConfig) -> Self {
        Self::with_tiers(catalog, config, default_tiers())
    }

    pub fn with_tiers(
        catalog: Arc<dyn CatalogClient>,
        config: SearchConfig,
        tiers: Vec<Box<dyn FallbackTier>>,
    ) -> Self {
        Self {
            catalog,
            config,
            tiers,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Recommend with a fresh entropy-seeded random source
    pub async fn recommend(
        &self,
        raw_genres: &[String],
        tempo: Tempo,
    ) -> Result<Option<Recommendation>, RecommendError> {
        let mut rng = StdRng::from_entropy();
        self.recommend_with_rng(raw_genres, tempo, &mut rng).await
    }

    /// Recommend with a reproducible random source
    pub async fn recommend_seeded(
        &self,
        raw_genres: &[String],
        tempo: Tempo,
        seed: u64,
    ) -> Result<Option<Recommendation>, RecommendError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.recommend_with_rng(raw_genres, tempo, &mut rng).await
    }

    /// Run the ladder
    ///
    /// `Ok(None)` when every tier came up empty. Fails only on empty input or
    /// a catalog authorization failure.
    pub async fn recommend_with_rng(
        &self,
        raw_genres: &[String],
        tempo: Tempo,
        rng: &mut StdRng,
    ) -> Result<Option<Recommendation>, RecommendError> {
        if raw_genres.iter().all(|g| g.trim().is_empty()) {
            return Err(RecommendError::InvalidInput(
                "at least one genre is required".to_string(),
            ));
        }

        let request_id = new_request_id();
        let span = info_span!("recommend", request_id = %request_id, bpm = tempo.bpm());

        async move {
            let genres = genres::normalize(raw_genres);
            info!(raw = ?raw_genres, normalized = ?genres, "Starting recommendation");

            let ctx = TierContext {
                catalog: self.catalog.as_ref(),
                genres: &genres,
                tempo,
                config: &self.config,
            };

            for tier in &self.tiers {
                let kind = tier.kind();
                if let Some(track) = tier.attempt(&ctx, rng).await? {
                    info!(
                        tier = %kind,
                        track_id = %track.id,
                        track = %track.name,
                        "Recommendation found"
                    );
                    return Ok(Some(Recommendation {
                        track,
                        tier: kind,
                        genres: genres.clone(),
                        tempo,
                    }));
                }
                info!(tier = %kind, "Tier found nothing, falling back");
            }

            info!("All fallback tiers exhausted");
            Ok(None)
        }
        .instrument(span)
        .await
    }
}
