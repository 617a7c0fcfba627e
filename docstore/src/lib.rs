//! DocStore - hierarchical JSON document store
//!
//! Documents are JSON objects addressed by slash-separated paths that
//! alternate collection and document segments, e.g.
//! `users/{uid}/studyPlans/plan-3`. The store supports point reads,
//! full-document writes, shallow merge writes and collection listing.
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! └── docstore.db      # SQLite: documents(path, collection, data, updated_at)
//! ```
//!
//! The store is synchronous. Async callers wrap it in an actor that owns
//! the `Store` and serializes access.

pub mod cli;
mod error;
mod path;
mod store;

pub use error::StoreError;
pub use path::DocPath;
pub use store::{Document, Store};

use std::path::PathBuf;

/// File name of the SQLite database inside a store directory
pub const DB_FILE_NAME: &str = "docstore.db";

/// Current time as Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Default store directory (`~/.local/share/studyplanner` on Linux)
pub fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplanner")
}
