//! Debian Package Tracker client
//!
//! Walks the paginated news listing of a package until the tracker answers
//! "not found", collecting every news item along the way.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::parse::{extract_news_entries, NewsEntry};
use super::NewsItem;

/// Base URL of the public Debian Package Tracker
pub const DEFAULT_BASE_URL: &str = "https://tracker.debian.org";

/// Pause after each listing page, to go easy on the tracker
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Per-request timeout for the HTTP client
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching news from the tracker
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (timeout, too many redirects, connection error...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcome of requesting one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// The page exists; holds its markup
    Found(String),
    /// The tracker answered 404: past the last page
    NotFound,
}

/// Something that can retrieve a listing page by URL
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Requests `url` and classifies the response
    async fn get_page(&self, url: &str) -> Result<Page, FetchError>;
}

/// `PageSource` backed by a reqwest HTTP client
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Creates a page source with the default request timeout
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dptn/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Creates a page source with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource for HttpPageSource {
    async fn get_page(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Page::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(%url, %status, "unexpected status, scanning page anyway");
        }
        Ok(Page::Found(response.text().await?))
    }
}

/// Client for the news listings of the package tracker
#[derive(Debug, Clone)]
pub struct TrackerClient<S = HttpPageSource> {
    source: S,
    base_url: String,
    page_delay: Duration,
}

impl TrackerClient<HttpPageSource> {
    /// Creates a client talking HTTP to the given tracker base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::with_source(HttpPageSource::new()?, base_url))
    }
}

impl<S: PageSource> TrackerClient<S> {
    /// Creates a client on top of an arbitrary page source
    pub fn with_source(source: S, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_delay: PAGE_DELAY,
        }
    }

    /// Overrides the pause taken after each listing page
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Returns the underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Builds the listing URL for a package and a 1-based page number
    pub fn news_page_url(&self, package: &str, page: u32) -> String {
        format!("{}/pkg/{}/news/?page={}", self.base_url, package, page)
    }

    /// Turns a link from the listing into an absolute URL
    pub fn absolute_url(&self, relative_url: &str) -> String {
        let relative_url = relative_url.trim();
        if relative_url.starts_with("http://") || relative_url.starts_with("https://") {
            return relative_url.to_string();
        }
        format!("{}/{}", self.base_url, relative_url.trim_start_matches('/'))
    }

    /// Fetches every news item of a package, newest first as listed.
    ///
    /// Starts at page 1 and keeps going until the tracker answers 404. Each
    /// page that was found is followed by the configured delay. Transport
    /// errors abort the walk and are returned as is; nothing is retried.
    ///
    /// # Arguments
    /// * `package` - Name of the package on the tracker
    ///
    /// # Returns
    /// * `Ok(Vec<NewsItem>)` - All items in listing order (may be empty)
    /// * `Err(FetchError)` - If a request fails
    pub async fn fetch_news(&self, package: &str) -> Result<Vec<NewsItem>, FetchError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = self.news_page_url(package, page);
            tracing::debug!(%package, page, %url, "requesting news page");

            let markup = match self.source.get_page(&url).await? {
                Page::NotFound => break,
                Page::Found(markup) => markup,
            };

            let entries = extract_news_entries(&markup);
            tracing::debug!(%package, page, count = entries.len(), "parsed news page");
            items.extend(entries.into_iter().map(|entry| self.to_item(entry)));

            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        tracing::info!(%package, pages = page - 1, items = items.len(), "fetched news");
        Ok(items)
    }

    fn to_item(&self, entry: NewsEntry) -> NewsItem {
        NewsItem {
            url: self.absolute_url(&entry.relative_url),
            title: entry.title,
            date: entry.date,
        }
    }
}
