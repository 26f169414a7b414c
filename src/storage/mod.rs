//! Storage module for persisting scraped movies
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Atomic replacement of the stored data after a crawl
//! - Accent-insensitive search over titles and names
//! - Lookups used by the read-only web view

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteMovieStore;
pub use traits::{MovieStorage, StorageError, StorageResult};

use serde::Serialize;

/// A stored movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
}

/// A stored actor, unique by profile URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
}
