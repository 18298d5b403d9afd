//! Bounded history management for Studio
//!
//! A [`HistoryStore`] keeps the most recent records of one tool, newest
//! first, capped at `max_items`. Records are keyed by id: adding a record
//! whose id already exists replaces it and moves it to the front. The
//! collection is mirrored into a [`KeyValueStore`] under its
//! [`StorageKey`] after every mutation, once the initial hydration has run.
//!
//! Payloads are flattened next to `id` and `timestamp`, so `T` must
//! serialize to a JSON object. [`HistoryStore::add`] rejects anything else.
//!
//! The in-memory collection is authoritative. Failures of the persistence
//! surface are logged and swallowed; the mirror catches up on the next
//! successful write.

use crate::error::{Error, Result};
use crate::export::{DownloadSink, export_file_name};
use crate::storage::KeyValueStore;
use crate::types::{IdGenerator, RecordId, StorageKey};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// One stored entry: the store-managed fields plus the tool payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Unique within the collection
    pub id: RecordId,
    /// Last time the record was added or updated
    pub timestamp: DateTime<Utc>,
    /// Tool-specific fields
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Record<T> {
    /// Get formatted timestamp
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Size-capped, recency-ordered, id-unique collection of records
pub struct HistoryStore<T> {
    key: StorageKey,
    max_items: usize,
    entries: Vec<Record<T>>,
    loaded: bool,
    storage: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
}

impl<T> HistoryStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create an empty, not yet hydrated store
    ///
    /// Mutations before [`hydrate`](Self::hydrate) only affect memory so the
    /// persisted state is never clobbered by an unread empty list.
    pub fn new(
        key: StorageKey,
        max_items: usize,
        storage: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            key,
            max_items: max_items.max(1),
            entries: Vec::new(),
            loaded: false,
            storage,
            ids,
        }
    }

    /// Create a store and hydrate it from the persistence surface
    pub fn open(
        key: StorageKey,
        max_items: usize,
        storage: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let mut store = Self::new(key, max_items, storage, ids);
        store.hydrate();
        store
    }

    /// Load prior state once
    ///
    /// Missing or malformed data leaves the collection empty. Records added
    /// before hydration are kept in front of the loaded ones.
    pub fn hydrate(&mut self) {
        if self.loaded {
            return;
        }

        let loaded = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Record<T>>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "discarding malformed history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read history");
                Vec::new()
            }
        };

        debug!(key = %self.key, count = loaded.len(), "hydrated history");

        let pending = !self.entries.is_empty();
        self.entries.extend(loaded);
        self.normalize();
        self.loaded = true;

        if pending {
            self.persist();
        }
    }

    /// Whether the initial load attempt has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Insert a record, or update and promote the one with the same id
    ///
    /// The timestamp is always set to now. Promotion happens before the
    /// collection is cut back to `max_items`, so updating the oldest record
    /// rescues it from eviction.
    ///
    /// Fails with [`Error::InvalidInput`] when the payload does not
    /// serialize to a JSON object, since it could never be persisted.
    pub fn add(&mut self, payload: T, id: Option<RecordId>) -> Result<RecordId> {
        if !serde_json::to_value(&payload)?.is_object() {
            return Err(Error::invalid_input(
                "payload",
                "must serialize to a JSON object",
            ));
        }

        let id = id.unwrap_or_else(|| self.ids.next_id());
        let record = Record {
            id: id.clone(),
            timestamp: Utc::now(),
            payload,
        };

        if let Some(index) = self.position(&id) {
            self.entries.remove(index);
        }
        self.entries.insert(0, record);
        self.entries.truncate(self.max_items);

        self.persist();
        Ok(id)
    }

    /// Delete the record with `id`; returns whether anything was removed
    pub fn remove(&mut self, id: &RecordId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Empty the collection and drop the persisted entry entirely
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.delete(&self.key) {
            warn!(key = %self.key, error = %e, "failed to delete persisted history");
        }
    }

    /// Offer the collection as a pretty-printed JSON download
    ///
    /// Returns the file name handed to the sink. Failures are logged, not
    /// reported.
    pub fn export(&self, sink: &dyn DownloadSink) -> String {
        let file_name = export_file_name(&self.key, Utc::now().date_naive());
        let contents = match serde_json::to_string_pretty(&self.entries) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to serialize history for export");
                return file_name;
            }
        };

        if let Err(e) = sink.save(&file_name, &contents) {
            warn!(key = %self.key, file = %file_name, error = %e, "history export failed");
        }
        file_name
    }

    /// Records, most recent first
    pub fn entries(&self) -> &[Record<T>] {
        &self.entries
    }

    /// Look up a record by id
    pub fn get(&self, id: &RecordId) -> Option<&Record<T>> {
        self.entries.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn storage_key(&self) -> &StorageKey {
        &self.key
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries.iter().position(|record| &record.id == id)
    }

    /// Keep the first occurrence of every id and cap the length
    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.entries.retain(|record| seen.insert(record.id.clone()));
        self.entries.truncate(self.max_items);
    }

    /// Mirror the full collection into the persistence surface
    fn persist(&self) {
        if !self.loaded {
            debug!(key = %self.key, "skipping persist before hydration");
            return;
        }

        let serialized = match serde_json::to_string(&self.entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to serialize history");
                return;
            }
        };

        match self.storage.set(&self.key, &serialized) {
            Ok(()) => debug!(key = %self.key, count = self.entries.len(), "persisted history"),
            Err(e) => warn!(key = %self.key, error = %e, "failed to persist history"),
        }
    }
}
