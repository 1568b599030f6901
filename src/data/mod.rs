//! Core data models for dptn
//!
//! Holds the news item type shared by the fetcher, the cache and the searcher,
//! plus the submodules that talk to the package tracker.

pub mod parse;
pub mod tracker;

pub use parse::{extract_news_entries, NewsEntry};
pub use tracker::{FetchError, HttpPageSource, Page, PageSource, TrackerClient};

use serde::{Deserialize, Serialize};

/// A single news entry published on the tracker for a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Publication date as shown by the tracker (e.g. "2024-01-01")
    pub date: String,
    /// Headline of the news entry
    pub title: String,
    /// Absolute link to the full news entry
    pub url: String,
}

impl NewsItem {
    /// Formats the item as one line of the plain-text cache, without the newline
    pub fn to_cache_line(&self) -> String {
        format!("{};;{};;{}", self.date, self.title, self.url)
    }
}
