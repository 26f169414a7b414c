//! Output module for terminal reporting
//!
//! This module handles:
//! - Drawing crawl progress on the terminal
//! - Loading and printing store statistics

mod progress;
pub mod stats;

pub use progress::TerminalProgress;
pub use stats::{format_statistics, load_statistics, print_statistics, StoreStatistics};
