//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::MoviePage;
use crate::storage::{ActorRecord, MovieRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes happen once per successful crawl through `replace_all`; every
/// other operation is a read used by the presentation layer.
pub trait MovieStorage {
    // ===== Bulk Write =====

    /// Replaces all stored movies and actors with `movies`
    ///
    /// All or nothing: if any step fails the previous contents remain.
    /// Actors are identified by URL and created on first appearance.
    fn replace_all(&mut self, movies: &[MoviePage]) -> StorageResult<()>;

    // ===== Search =====

    /// Movies whose normalized title contains the normalized query
    fn search_movies(&self, query: &str) -> StorageResult<Vec<MovieRecord>>;

    /// Actors whose normalized name contains the normalized query
    fn search_actors(&self, query: &str) -> StorageResult<Vec<ActorRecord>>;

    // ===== Lookup =====

    fn get_movie(&self, movie_id: i64) -> StorageResult<Option<MovieRecord>>;

    /// Cast of a movie in page order; empty for an unknown movie
    fn get_actors_for_movie(&self, movie_id: i64) -> StorageResult<Vec<ActorRecord>>;

    fn get_actor(&self, actor_id: i64) -> StorageResult<Option<ActorRecord>>;

    /// Movies an actor appears in; empty for an unknown actor
    fn get_movies_for_actor(&self, actor_id: i64) -> StorageResult<Vec<MovieRecord>>;

    // ===== Statistics =====

    fn count_movies(&self) -> StorageResult<u64>;

    fn count_actors(&self) -> StorageResult<u64>;

    /// RFC 3339 time of the last successful `replace_all`
    fn scraped_at(&self) -> StorageResult<Option<String>>;
}
