//! Crawler module for fetching and parsing the movie ranking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind a connection limiter
//! - HTML parsing of ranking pages and movie pages
//! - Progress reporting hooks
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod progress;

pub use coordinator::{movie_url, parse_top_pages, Scraper};
pub use fetcher::{build_http_client, HttpFetcher, PageSource};
pub use parser::{parse_movie_page, parse_top_list};
pub use progress::{FetchProgress, LogProgress, NoopProgress};

use crate::config::{validate, Config};
use crate::storage::{MovieStorage, SqliteMovieStore};
use crate::ReelError;
use std::path::Path;

/// One cast member as listed on a movie page
///
/// `url` identifies the person across movies; the crawler itself emits one
/// record per appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub url: String,
}

/// Title and cast parsed from a movie page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePagePartial {
    pub title: String,
    pub actors: Vec<Actor>,
}

/// A fully scraped movie, keyed by its relative link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePage {
    pub url: String,
    pub title: String,
    pub actors: Vec<Actor>,
}

/// Counts reported after a successful scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub movies: usize,
    pub actor_appearances: usize,
}

/// Runs a complete crawl and replaces the stored data with its result
///
/// The configuration is validated first. The store is opened only after
/// every page has been fetched and parsed, so a failed crawl leaves the
/// previous database untouched.
///
/// # Example
///
/// ```no_run
/// use top_reel::config::Config;
/// use top_reel::crawler::{scrape_and_save, NoopProgress};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = scrape_and_save(&Config::default(), &NoopProgress).await?;
/// println!("{} movies saved", summary.movies);
/// # Ok(())
/// # }
/// ```
pub async fn scrape_and_save(
    config: &Config,
    progress: &dyn FetchProgress,
) -> Result<ScrapeSummary, ReelError> {
    validate(config)?;

    let scraper = Scraper::from_config(config.scraper.clone())?;
    let movies = scraper.scrape(progress).await?;

    let mut store = SqliteMovieStore::open(Path::new(&config.output.database_path))?;
    store.replace_all(&movies)?;

    let summary = ScrapeSummary {
        movies: movies.len(),
        actor_appearances: movies.iter().map(|m| m.actors.len()).sum(),
    };

    tracing::info!(
        "Saved {} movies ({} cast entries) to {}",
        summary.movies,
        summary.actor_appearances,
        config.output.database_path
    );

    Ok(summary)
}
