//! Run orchestration for dptn
//!
//! Ties the tracker client, the news cache and the renderer together: for each
//! package an optional fetch, then a search over the cached news.

use std::io::{self, Write};

use thiserror::Error;

use crate::cache::{CacheError, NewsCache};
use crate::cli::{unique_packages, RunConfig};
use crate::data::{FetchError, HttpPageSource, PageSource, TrackerClient};
use crate::search::Renderer;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum AppError {
    /// Fetching from the tracker failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The cache could not be read or written
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Writing to the output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// True when the output was closed early, e.g. when piped into `head`
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, AppError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

/// State of a package's news after a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The tracker had no news; the cache files are absent
    Empty,
    /// News were found and written to the cache
    Stored(usize),
}

/// One dptn run over a list of packages
pub struct App<S = HttpPageSource> {
    /// Packages to process, in order
    packages: Vec<String>,
    /// Whether to refetch before searching
    fetch: bool,
    /// Search strings, all of which must match
    predicates: Vec<String>,
    /// On-disk news cache
    cache: NewsCache,
    /// Tracker client used when fetching
    tracker: TrackerClient<S>,
    /// Output style
    renderer: Renderer,
}

impl App<HttpPageSource> {
    /// Creates an App talking HTTP to the tracker configured in `config`
    pub fn new(config: RunConfig) -> Result<Self, AppError> {
        let tracker = TrackerClient::new(config.base_url.clone())?;
        Ok(Self::with_tracker(config, tracker))
    }
}

impl<S: PageSource> App<S> {
    /// Creates an App with a custom tracker client (for testing)
    pub fn with_tracker(config: RunConfig, tracker: TrackerClient<S>) -> Self {
        Self {
            packages: unique_packages(&config.packages),
            fetch: config.fetch,
            predicates: config.predicates,
            cache: NewsCache::with_dir(config.cache_dir),
            tracker,
            renderer: Renderer::new(config.color),
        }
    }

    /// Runs the optional fetch and then the search for every package
    ///
    /// All fetches happen before any search output. A transport error stops
    /// the run right away.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        self.cache.ensure_dir()?;
        tracing::debug!(cache_dir = %self.cache.dir().display(), "using cache directory");

        if self.fetch {
            for package in &self.packages {
                if self.fetch_package(package).await? == FetchOutcome::Empty {
                    writeln!(out, "\nThere are no news for the package {}.", package)?;
                }
            }
        }

        writeln!(out)?;
        for package in &self.packages {
            self.search_package(out, package)?;
        }
        Ok(())
    }

    /// Refetches a package's news and replaces its cache
    ///
    /// The old cache files are removed first, so a package that no longer has
    /// news ends up without cache files. Nothing is written unless the whole
    /// walk succeeded.
    pub async fn fetch_package(&self, package: &str) -> Result<FetchOutcome, AppError> {
        self.cache.clear(package)?;

        let items = self.tracker.fetch_news(package).await?;
        if items.is_empty() {
            return Ok(FetchOutcome::Empty);
        }

        self.cache.store(package, &items)?;
        Ok(FetchOutcome::Stored(items.len()))
    }

    /// Prints the cached news of a package that match the search strings
    ///
    /// A package that was never fetched, or whose cache is unreadable, gets a
    /// notice instead of results.
    pub fn search_package<W: Write>(&self, out: &mut W, package: &str) -> Result<(), AppError> {
        let items = match self.cache.load(package) {
            Ok(Some(items)) => items,
            Ok(None) => {
                self.renderer.write_header(out, package)?;
                writeln!(out, "Fetch the news for the package {} first.\n", package)?;
                return Ok(());
            }
            Err(e @ CacheError::Corrupt { .. }) => {
                tracing::warn!(%package, error = %e, "unreadable news cache");
                self.renderer.write_header(out, package)?;
                writeln!(
                    out,
                    "The cached news for the package {} are unreadable; fetch them again.\n",
                    package
                )?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let count = self
            .renderer
            .write_matches(out, package, &items, &self.predicates)?;
        tracing::debug!(%package, matched = count, total = items.len(), "searched news");
        Ok(())
    }
}
