//! Music catalog access
//!
//! The recommendation core only needs three read operations from the catalog;
//! they sit behind [`CatalogClient`] so the search pipeline can run against
//! the real web API or an in-memory catalog in tests.

pub mod auth;
pub mod spotify;

pub use auth::{AccessToken, ClientCredentials, HttpTokenProvider, SessionContext, TokenProvider};
pub use spotify::{web_search_url, SpotifyCatalog};

use crate::types::{PlaylistSummary, Track};
use async_trait::async_trait;
use thiserror::Error;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection, TLS or timeout failure before a response arrived
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// No usable access token; the only catalog failure that aborts a request
    #[error("Authorization failed: {0}")]
    Auth(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only catalog search operations
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text track search (supports `genre:` filter tokens)
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<Track>>;

    /// Free-text playlist search
    async fn search_playlists(&self, query: &str, limit: u32)
        -> CatalogResult<Vec<PlaylistSummary>>;

    /// First `limit` tracks of a playlist
    async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> CatalogResult<Vec<Track>>;
}
