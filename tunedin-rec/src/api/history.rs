//! Recommendation history endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::history::HistoryEntry;
use crate::AppState;

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Maximum number of entries kept
    pub capacity: usize,
    /// Most recent first
    pub entries: Vec<HistoryEntry>,
}

/// GET /history
pub async fn list_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        capacity: state.history.capacity(),
        entries: state.history.recent().await,
    })
}

/// Build history routes
pub fn history_routes() -> Router<AppState> {
    Router::new().route("/history", get(list_history))
}
