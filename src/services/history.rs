// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::store::{KeyValueStore, StoreError};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode search history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Recent searches, most recent first, without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Build from previously persisted entries, restoring the invariants
    pub fn from_entries(entries: Vec<String>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        // Oldest first so the persisted head ends up at index 0
        for entry in entries.into_iter().rev() {
            history.add(&entry);
        }
        history
    }

    /// Move `query` to the front, dropping any existing equal entry and the overflow
    pub fn add(&mut self, query: &str) {
        self.entries.retain(|e| e != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persists a [`SearchHistory`] as a JSON array under a single store key
pub struct HistoryStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Load the persisted history.
    ///
    /// A missing key yields an empty history. A value that is not a JSON array
    /// of strings is discarded with a warning; store failures propagate.
    pub fn load(&self, limit: usize) -> Result<SearchHistory, HistoryError> {
        let Some(raw) = self.store.read(&self.key)? else {
            return Ok(SearchHistory::new(limit));
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => Ok(SearchHistory::from_entries(entries, limit)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable search history");
                Ok(SearchHistory::new(limit))
            }
        }
    }

    /// Drop the persisted history entirely
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.store.remove(&self.key)?;
        Ok(())
    }

    /// Write the whole history back to the store
    pub fn save(&self, history: &SearchHistory) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(history.entries())?;
        self.store.write(&self.key, &encoded)?;
        Ok(())
    }
}
