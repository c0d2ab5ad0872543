//! tunedin-rec library interface
//!
//! Turns a mood (free-form genre tags plus a target tempo) into one track
//! from the music catalog. Exposed as a library for the HTTP service, the CLI
//! and integration tests.

pub mod analysis;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod genres;
pub mod history;
pub mod pipeline;
pub mod scoring;
pub mod search;
pub mod selection;
pub mod tempo;
pub mod types;

pub use crate::error::{ApiError, ApiResult, RecommendError};
pub use crate::history::{HistoryEntry, RecommendationHistory};
pub use crate::pipeline::RecommendationPipeline;
pub use crate::types::{Recommendation, Tempo, TierKind, Track};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecommendationPipeline>,
    /// Deadline for one whole recommendation
    pub request_timeout: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream failure for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
    /// Recent successful recommendations
    pub history: Arc<RecommendationHistory>,
}

impl AppState {
    pub fn new(pipeline: Arc<RecommendationPipeline>, request_timeout: Duration) -> Self {
        Self {
            pipeline,
            request_timeout,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            history: Arc::new(RecommendationHistory::default()),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recommend_routes())
        .merge(api::history_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // Browser extensions call from their own origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
