//! Recommendation endpoint
//!
//! POST /recommend accepts either explicit genres and tempo or a raw mood
//! analysis reply to parse first.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::parse_analysis;
use crate::catalog::web_search_url;
use crate::error::{ApiError, ApiResult, RecommendError};
use crate::history::HistoryEntry;
use crate::types::{ArtistLink, Recommendation, Tempo, TierKind, Track};
use crate::AppState;

/// Request body
#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    /// Free-form genre tags
    #[serde(default)]
    pub genres: Vec<String>,
    /// Target tempo; clamped, defaults to 100
    pub bpm: Option<i64>,
    /// Summarizer reply to parse instead of `genres`/`bpm`
    pub analysis: Option<String>,
    /// Fixed random seed for reproducible picks
    pub seed: Option<u64>,
}

/// Response body
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub track: Track,
    pub tier: TierKind,
    /// Normalized genres used for the search
    pub genres: Vec<String>,
    pub bpm: u16,
    pub open_url: String,
    pub embed_url: String,
    pub artists: Vec<ArtistLink>,
}

impl From<Recommendation> for RecommendResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            open_url: rec.track.open_url(),
            embed_url: rec.track.embed_url(),
            artists: rec.track.artist_links(),
            bpm: rec.tempo.bpm(),
            genres: rec.genres,
            tier: rec.tier,
            track: rec.track,
        }
    }
}

/// Resolve request input into (genres, tempo)
fn resolve_input(req: RecommendRequest) -> ApiResult<(Vec<String>, Tempo)> {
    if let Some(reply) = req.analysis.filter(|a| !a.trim().is_empty()) {
        let analysis = parse_analysis(&reply);
        return Ok((analysis.genres, analysis.tempo));
    }

    if req.genres.iter().all(|g| g.trim().is_empty()) {
        return Err(ApiError::BadRequest(
            "Provide `genres` (non-empty) or `analysis`".to_string(),
        ));
    }

    let tempo = req.bpm.map(Tempo::new).unwrap_or_default();
    Ok((req.genres, tempo))
}

/// POST /recommend
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let seed = req.seed;
    let (genres, tempo) = resolve_input(req)?;

    let run = async {
        match seed {
            Some(seed) => state.pipeline.recommend_seeded(&genres, tempo, seed).await,
            None => state.pipeline.recommend(&genres, tempo).await,
        }
    };

    let result = match tokio::time::timeout(state.request_timeout, run).await {
        Ok(result) => result,
        Err(_) => Err(RecommendError::Timeout(state.request_timeout.as_secs())),
    };

    match result {
        Ok(Some(rec)) => {
            state.history.record(HistoryEntry::from(&rec)).await;
            Ok(Json(rec.into()))
        }
        Ok(None) => Err(ApiError::NotFound {
            message: "No track matched the requested mood".to_string(),
            search_url: web_search_url(&genres),
        }),
        Err(e) => {
            warn!(error = %e, "Recommendation failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

/// Build recommendation routes
pub fn recommend_routes() -> Router<AppState> {
    Router::new().route("/recommend", post(recommend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_takes_precedence() {
        let req = RecommendRequest {
            genres: vec!["rock".into()],
            bpm: Some(150),
            analysis: Some("genres: [jazz]\nbpm: 80".into()),
            seed: None,
        };
        let (genres, tempo) = resolve_input(req).unwrap();
        assert_eq!(genres, vec!["jazz"]);
        assert_eq!(tempo.bpm(), 80);
    }

    #[test]
    fn test_explicit_genres_with_default_tempo() {
        let req = RecommendRequest {
            genres: vec!["rock".into()],
            ..Default::default()
        };
        let (genres, tempo) = resolve_input(req).unwrap();
        assert_eq!(genres, vec!["rock"]);
        assert_eq!(tempo.bpm(), 100);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            resolve_input(RecommendRequest::default()),
            Err(ApiError::BadRequest(_))
        ));
        let blank = RecommendRequest {
            genres: vec!["  ".into()],
            analysis: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(resolve_input(blank), Err(ApiError::BadRequest(_))));
    }
}
