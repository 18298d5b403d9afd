//! Studio - AI content tools with bounded local history
//!
//! This library provides functionality for:
//! - Bounded, most-recent-first histories persisted in a key-value store
//! - Summaries, content ideas, refinements and chat through a content service
//! - Deterministic local fallbacks when the service is unreachable
//! - Sign-in gating and JSON export of every history
//!
//! # Examples
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//! use studio::storage::MemoryStore;
//! use studio::types::TimestampIds;
//! use studio::{HistoryStore, StorageKey};
//!
//! // Payloads are flattened into each record, so they must be structs or maps
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Note {
//!     text: String,
//! }
//!
//! let store = Arc::new(MemoryStore::new());
//! let ids = Arc::new(TimestampIds::new());
//! let mut notes: HistoryStore<Note> =
//!     HistoryStore::open(StorageKey::new("notes")?, 3, store.clone(), ids.clone());
//! let id = notes.add(Note { text: "first".to_string() }, None)?;
//!
//! let reopened: HistoryStore<Note> =
//!     HistoryStore::open(StorageKey::new("notes")?, 3, store, ids);
//! assert_eq!(reopened.len(), 1);
//! assert_eq!(reopened.get(&id).map(|r| r.payload.text.as_str()), Some("first"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod history;
pub mod prelude;
pub mod storage;
pub mod studio;
pub mod tools;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use history::{HistoryStore, Record};
pub use storage::KeyValueStore;
pub use studio::Studio;
pub use types::{RecordId, StorageKey};

/// Initialize a studio with the configuration from the default location
pub fn init() -> Result<Studio> {
    Studio::new(Config::load()?)
}

/// Initialize a studio with a custom configuration
pub fn init_with_config(config: Config) -> Result<Studio> {
    Studio::new(config)
}
