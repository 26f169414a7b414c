//! Crawler coordinator - main crawl orchestration logic
//!
//! A run moves through fixed stages and never re-enters one:
//!
//! 1. Fetch every top-list page concurrently
//! 2. Parse them into one movie-link work list, in request order
//! 3. Fetch and parse every movie page concurrently
//!
//! Each fetch stage gets its own connection limiter sized to
//! `max_connections`. A limiter permit covers the HTTP request only; parsing
//! happens after it is released.
//!
//! The first fetch or parse error aborts the run. Sibling fetches still in
//! flight are dropped and no partial result is returned.

use crate::config::{validate_scraper_config, ScraperConfig};
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::crawler::parser::{parse_movie_page, parse_top_list};
use crate::crawler::progress::FetchProgress;
use crate::crawler::MoviePage;
use crate::{ConfigError, ReelError, TransportError};
use futures::future::try_join_all;
use tokio::sync::Semaphore;
use url::Url;

/// Drives a crawl run over a [`PageSource`]
pub struct Scraper<S = HttpFetcher> {
    source: S,
    config: ScraperConfig,
}

impl Scraper<HttpFetcher> {
    /// Creates a scraper that fetches over HTTP
    pub fn from_config(config: ScraperConfig) -> Result<Self, ReelError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S, config: ScraperConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Runs a complete crawl
    ///
    /// The configuration is validated before any request is made.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<MoviePage>)` - One page per movie link, in dispatch order
    /// * `Err(ReelError)` - An invalid configuration, or the first transport,
    ///   link or parsing failure naming its URL
    pub async fn scrape(&self, progress: &dyn FetchProgress) -> Result<Vec<MoviePage>, ReelError> {
        validate_scraper_config(&self.config)?;

        progress.on_top_pages_start();

        let top_pages = self.fetch_top_pages().await?;
        let links = parse_top_pages(&top_pages);

        tracing::info!(
            "Parsed {} movie links from {} top pages",
            links.len(),
            top_pages.len()
        );
        progress.on_top_pages_done(links.len());

        progress.on_movies_start(links.len());
        let movies = self.fetch_movies(&links, progress).await?;
        progress.on_movies_done();

        tracing::info!("Fetched {} movie pages", movies.len());
        Ok(movies)
    }

    /// Fetches every configured top-list page, bodies in request order
    pub async fn fetch_top_pages(&self) -> Result<Vec<String>, ReelError> {
        let limiter = self.limiter()?;

        try_join_all(
            self.config
                .top_list_urls
                .iter()
                .map(|url| self.fetch_limited(url, &limiter)),
        )
        .await
    }

    /// Fetches and parses one movie page per link, results in link order
    pub async fn fetch_movies(
        &self,
        links: &[String],
        progress: &dyn FetchProgress,
    ) -> Result<Vec<MoviePage>, ReelError> {
        let limiter = self.limiter()?;

        try_join_all(
            links
                .iter()
                .map(|link| self.fetch_movie(link, &limiter, progress)),
        )
        .await
    }

    /// A fresh limiter for one phase; a zero-permit limiter would never admit a request
    fn limiter(&self) -> Result<Semaphore, ReelError> {
        if self.config.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be at least 1".to_string(),
            )
            .into());
        }
        Ok(Semaphore::new(self.config.max_connections))
    }

    async fn fetch_movie(
        &self,
        link: &str,
        limiter: &Semaphore,
        progress: &dyn FetchProgress,
    ) -> Result<MoviePage, ReelError> {
        let url = movie_url(&self.config.site_base_url, link)?;
        let html = self.fetch_limited(url.as_str(), limiter).await?;

        let movie = parse_movie_page(&html).map_err(|source| {
            tracing::error!("Error parsing movie page {}: {}", url, source);
            ReelError::Parse {
                url: url.to_string(),
                source,
            }
        })?;

        progress.on_movie_done();

        Ok(MoviePage {
            url: link.to_string(),
            title: movie.title,
            actors: movie.actors,
        })
    }

    /// Holds a limiter permit for the duration of one request
    async fn fetch_limited(&self, url: &str, limiter: &Semaphore) -> Result<String, ReelError> {
        let _permit = limiter.acquire().await.map_err(|_| ReelError::Transport {
            url: url.to_string(),
            source: TransportError::LimiterClosed,
        })?;

        self.source
            .fetch(url)
            .await
            .map_err(|source| ReelError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

/// Concatenates the links of each top-list page, keeping page order
pub fn parse_top_pages(pages: &[String]) -> Vec<String> {
    pages.iter().flat_map(|html| parse_top_list(html)).collect()
}

/// Resolves a relative movie link against the site base URL
///
/// A link that cannot be resolved fails with [`ReelError::InvalidLink`]
/// carrying the link as found on the ranking page.
pub fn movie_url(base: &str, link: &str) -> Result<Url, ReelError> {
    Url::parse(base)?
        .join(link)
        .map_err(|source| ReelError::InvalidLink {
            url: link.to_string(),
            source,
        })
}
