//! Terminal progress bar for interactive crawls

use crate::crawler::FetchProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress sink that draws an indicatif bar on stderr
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] {pos}/{len} movies ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_draw_target(target);
        Self { bar }
    }

    /// Stops the bar where it is, for a crawl that aborted
    pub fn abandon(&self) {
        self.bar.abandon_with_message("aborted");
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchProgress for TerminalProgress {
    fn on_top_pages_start(&self) {
        self.bar.set_message("fetching top pages");
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    fn on_top_pages_done(&self, link_count: usize) {
        self.bar
            .set_message(format!("found {} movie links", link_count));
    }

    fn on_movies_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("fetching movies");
    }

    fn on_movie_done(&self) {
        self.bar.inc(1);
    }

    fn on_movies_done(&self) {
        self.bar.finish_with_message("done");
    }
}
