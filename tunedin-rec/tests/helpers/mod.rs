//! Test helpers shared across integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use tunedin_rec::catalog::{CatalogClient, CatalogError, CatalogResult};
use tunedin_rec::types::{Artist, PlaylistSummary, Track};

type TrackResponder = Box<dyn Fn(&str, u32) -> CatalogResult<Vec<Track>> + Send + Sync>;
type PlaylistResponder =
    Box<dyn Fn(&str, u32) -> CatalogResult<Vec<PlaylistSummary>> + Send + Sync>;

/// Catalog call as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SearchTracks { query: String, limit: u32 },
    SearchPlaylists { query: String, limit: u32 },
    PlaylistTracks { playlist_id: String, limit: u32 },
}

/// In-memory catalog answering from closures and recording every call
pub struct ScriptedCatalog {
    tracks: TrackResponder,
    playlists: PlaylistResponder,
    playlist_tracks: TrackResponder,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedCatalog {
    /// Catalog that finds nothing anywhere
    pub fn empty() -> Self {
        Self {
            tracks: Box::new(|_, _| Ok(Vec::new())),
            playlists: Box::new(|_, _| Ok(Vec::new())),
            playlist_tracks: Box::new(|_, _| Ok(Vec::new())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_tracks<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str, u32) -> CatalogResult<Vec<Track>> + Send + Sync + 'static,
    {
        self.tracks = Box::new(responder);
        self
    }

    pub fn with_playlists<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str, u32) -> CatalogResult<Vec<PlaylistSummary>> + Send + Sync + 'static,
    {
        self.playlists = Box::new(responder);
        self
    }

    pub fn with_playlist_tracks<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str, u32) -> CatalogResult<Vec<Track>> + Send + Sync + 'static,
    {
        self.playlist_tracks = Box::new(responder);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Queries sent to track search, in order
    pub fn track_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SearchTracks { query, .. } => Some(query),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<Track>> {
        self.calls.lock().unwrap().push(Call::SearchTracks {
            query: query.to_string(),
            limit,
        });
        (self.tracks)(query, limit)
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<PlaylistSummary>> {
        self.calls.lock().unwrap().push(Call::SearchPlaylists {
            query: query.to_string(),
            limit,
        });
        (self.playlists)(query, limit)
    }

    async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> CatalogResult<Vec<Track>> {
        self.calls.lock().unwrap().push(Call::PlaylistTracks {
            playlist_id: playlist_id.to_string(),
            limit,
        });
        (self.playlist_tracks)(playlist_id, limit)
    }
}

/// Track with one artist
pub fn track(id: &str, name: &str, artist_id: &str, popularity: u8) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![Artist {
            id: artist_id.to_string(),
            name: format!("Artist {}", artist_id),
        }],
        popularity,
        album_art_url: None,
        external_url: None,
    }
}

/// `count` tracks with ids `{prefix}-{n}`, spread over ten artists
pub fn tracks(prefix: &str, count: usize, popularity: u8) -> Vec<Track> {
    (0..count)
        .map(|n| {
            track(
                &format!("{}-{}", prefix, n),
                &format!("{} song {}", prefix, n),
                &format!("{}-artist-{}", prefix, n % 10),
                popularity,
            )
        })
        .collect()
}

pub fn transport_error() -> CatalogError {
    CatalogError::Transport("connection reset".to_string())
}
