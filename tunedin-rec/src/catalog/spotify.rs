//! Spotify Web API catalog client
//!
//! Uses `/search` for tracks and playlists and `/playlists/{id}/tracks` for
//! playlist contents. Requests are rate limited and carry a bearer token from
//! the shared [`SessionContext`]. An expired token (401) is dropped from the
//! cache and the request retried once with a fresh one.

use super::{CatalogClient, CatalogError, CatalogResult, SessionContext};
use crate::types::{Artist, PlaylistSummary, Track};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("tunedin/", env!("CARGO_PKG_VERSION"));

const WEB_SEARCH_BASE: &str = "https://open.spotify.com/search";

/// Web player search page for free-text terms, for listeners to search by hand
///
/// `None` when no term is left after trimming.
pub fn web_search_url<S: AsRef<str>>(terms: &[S]) -> Option<String> {
    let query = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if query.is_empty() {
        return None;
    }

    let mut url = reqwest::Url::parse(WEB_SEARCH_BASE).ok()?;
    url.path_segments_mut().ok()?.push(&query);
    Some(url.to_string())
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchTracksResponse {
    tracks: Paging<Option<TrackObject>>,
}

#[derive(Debug, Deserialize)]
struct SearchPlaylistsResponse {
    playlists: Paging<Option<PlaylistObject>>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    /// Absent for local files in playlists
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    #[serde(default)]
    popularity: u8,
    album: Option<AlbumObject>,
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    id: Option<String>,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumObject {
    #[serde(default)]
    images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistObject {
    id: String,
    #[serde(default)]
    name: String,
}

impl TrackObject {
    fn into_track(self) -> Option<Track> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Track {
            id,
            name: self.name,
            artists: self
                .artists
                .into_iter()
                .filter_map(|a| {
                    Some(Artist {
                        id: a.id?,
                        name: a.name,
                    })
                })
                .collect(),
            popularity: self.popularity.min(100),
            album_art_url: self
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            external_url: self.external_urls.and_then(|urls| urls.spotify),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Catalog client for the Spotify Web API
pub struct SpotifyCatalog {
    http_client: reqwest::Client,
    api_base_url: String,
    session: SessionContext,
    rate_limiter: DefaultDirectRateLimiter,
}

impl SpotifyCatalog {
    pub fn new(
        api_base_url: impl Into<String>,
        session: SessionContext,
        requests_per_second: u32,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            session,
            rate_limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    /// Authorized GET with one retry after a 401
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> CatalogResult<T> {
        let url = format!("{}{}", self.api_base_url, path);

        for attempt in 0..2 {
            let token = self.session.access_token().await?;
            self.rate_limiter.until_ready().await;

            debug!(url = %url, ?query, attempt, "Catalog request");

            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&token)
                .query(query)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                self.session.invalidate().await;
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            return response
                .json::<T>()
                .await
                .map_err(|e| CatalogError::Parse(e.to_string()));
        }

        Err(CatalogError::Auth(
            "catalog rejected a freshly issued token".to_string(),
        ))
    }
}

#[async_trait]
impl CatalogClient for SpotifyCatalog {
    async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<Track>> {
        let response: SearchTracksResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .tracks
            .items
            .into_iter()
            .flatten()
            .filter_map(TrackObject::into_track)
            .collect())
    }

    async fn search_playlists(
        &self,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<PlaylistSummary>> {
        let response: SearchPlaylistsResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "playlist".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .playlists
            .items
            .into_iter()
            .flatten()
            .map(|p| PlaylistSummary { id: p.id, name: p.name })
            .collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str, limit: u32) -> CatalogResult<Vec<Track>> {
        let response: Paging<PlaylistItem> = self
            .get_json(
                &format!("/playlists/{}/tracks", playlist_id),
                &[("limit", limit.to_string())],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(TrackObject::into_track)
            .collect())
    }
}
