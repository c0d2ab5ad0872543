//! Recent recommendations
//!
//! Kept in memory for the life of the process. Entries carry only what is
//! needed to find a track again: its ids and names plus the genres and tempo
//! it was chosen for.

use crate::types::Recommendation;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Entries kept before the oldest is dropped
pub const HISTORY_CAPACITY: usize = 20;

/// One past recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub track_id: String,
    pub track_name: String,
    /// Comma-separated artist names
    pub artist_names: String,
    pub artist_ids: Vec<String>,
    pub genres: Vec<String>,
    pub bpm: u16,
}

impl From<&Recommendation> for HistoryEntry {
    fn from(rec: &Recommendation) -> Self {
        Self {
            track_id: rec.track.id.clone(),
            track_name: rec.track.name.clone(),
            artist_names: rec.track.artist_names(),
            artist_ids: rec.track.artists.iter().map(|a| a.id.clone()).collect(),
            genres: rec.genres.clone(),
            bpm: rec.tempo.bpm(),
        }
    }
}

/// Bounded newest-first recommendation log
#[derive(Debug)]
pub struct RecommendationHistory {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl RecommendationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add an entry, evicting the oldest once full
    pub async fn record(&self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Snapshot, newest first
    pub async fn recent(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.iter().cloned().collect()
    }
}

impl Default for RecommendationHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
