//! Statistics generation from the movie database
//!
//! This module provides functionality for extracting and displaying
//! store statistics from the storage layer.

use crate::storage::{MovieStorage, StorageResult};
use serde::Serialize;

/// Store statistics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    /// Number of stored movies
    pub movies: u64,

    /// Number of distinct actors
    pub actors: u64,

    /// RFC 3339 time of the last successful scrape
    pub scraped_at: Option<String>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn MovieStorage) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        movies: storage.count_movies()?,
        actors: storage.count_actors()?,
        scraped_at: storage.scraped_at()?,
    })
}

/// Renders statistics as the text printed by `print_statistics`
pub fn format_statistics(stats: &StoreStatistics) -> String {
    let mut out = String::from("=== Store Statistics ===\n\n");

    out.push_str(&format!("  Movies: {}\n", stats.movies));
    out.push_str(&format!("  Actors: {}\n", stats.actors));

    match &stats.scraped_at {
        Some(at) => out.push_str(&format!("  Last scrape: {}\n", at)),
        None => out.push_str("  Last scrape: never\n"),
    }

    if stats.movies > 0 {
        let ratio = stats.actors as f64 / stats.movies as f64;
        out.push_str(&format!("  Distinct actors per movie: {:.1}\n", ratio));
    }

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    print!("{}", format_statistics(stats));
}
