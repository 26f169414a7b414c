//! Progress reporting hooks for a crawl run
//!
//! The orchestrator calls these at fixed lifecycle points. Every hook has a
//! no-op default, so a sink implements only what it displays.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives lifecycle events from a crawl run
///
/// `on_movie_done` fires from concurrently running fetches, in completion
/// order, once per successfully parsed movie.
pub trait FetchProgress: Send + Sync {
    fn on_top_pages_start(&self) {}

    fn on_top_pages_done(&self, _link_count: usize) {}

    fn on_movies_start(&self, _total: usize) {}

    fn on_movie_done(&self) {}

    fn on_movies_done(&self) {}
}

/// Progress sink that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl FetchProgress for NoopProgress {}

/// Progress sink that reports through `tracing`
///
/// Movie completions are logged every `every` movies.
#[derive(Debug)]
pub struct LogProgress {
    every: usize,
    total: AtomicUsize,
    done: AtomicUsize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            total: Default::default(),
            done: Default::default(),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(25)
    }
}

impl FetchProgress for LogProgress {
    fn on_top_pages_start(&self) {
        tracing::info!("Fetching top pages");
    }

    fn on_top_pages_done(&self, link_count: usize) {
        tracing::info!("Fetched top pages ({} links)", link_count);
    }

    fn on_movies_start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
    }

    fn on_movie_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.every == 0 {
            tracing::info!(
                "Progress: {}/{} movies fetched",
                done,
                self.total.load(Ordering::Relaxed)
            );
        }
    }

    fn on_movies_done(&self) {
        tracing::info!("All movies fetched");
    }
}
