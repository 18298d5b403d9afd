//! Prelude module for Studio
//!
//! This module re-exports commonly used types and traits to reduce
//! boilerplate imports throughout the codebase.
//!
//! # Usage
//!
//! ```rust
//! use studio::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::export::DownloadSink;
pub use crate::history::{HistoryStore, Record};
pub use crate::storage::KeyValueStore;
pub use crate::studio::Studio;
pub use crate::tools::{Provenance, ToolKind, ToolOutput};
pub use crate::types::{IdGenerator, RecordId, StorageKey};

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
