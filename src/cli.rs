//! Command-line interface parsing for dptn
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `RunConfig` with every default resolved.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::cache::NewsCache;
use crate::data::tracker::DEFAULT_BASE_URL;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The package name is not a valid Debian package name
    #[error("Invalid package name: '{0}'. Use lowercase letters, digits, '+', '-' and '.', starting with a letter or digit")]
    InvalidPackage(String),

    /// No cache directory was given and the home directory is unknown
    #[error("Cannot determine the home directory; pass --cache-dir")]
    NoCacheDir,
}

/// dptn - Fetch and search news from the Debian Package Tracker
#[derive(Parser, Debug)]
#[command(name = "dptn")]
#[command(about = "Fetch and search news from the Debian Package Tracker")]
#[command(version)]
pub struct Cli {
    /// Names of the selected packages
    #[arg(required = true, value_name = "PACKAGES", value_parser = parse_package_arg)]
    pub packages: Vec<String>,

    /// Fetch the selected packages' news before searching
    #[arg(short, long)]
    pub fetch: bool,

    /// Search string; repeat to require several (all must match)
    ///
    /// Each string must appear in the title or the date of a news item.
    #[arg(short, long, value_name = "TEXT")]
    pub search: Vec<String>,

    /// Suppress all escape sequences in the output
    #[arg(short = 'C', long)]
    pub no_color: bool,

    /// Directory holding the news cache [default: ~/.dptn]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Base URL of the package tracker
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Packages to process, in command-line order
    pub packages: Vec<String>,
    /// Whether to refetch news before searching
    pub fetch: bool,
    /// Search strings; `[""]` when none were given
    pub predicates: Vec<String>,
    /// Whether to style output with ANSI escape codes
    pub color: bool,
    /// Directory holding the news cache
    pub cache_dir: PathBuf,
    /// Base URL of the package tracker
    pub base_url: String,
}

/// Checks a package name against the Debian naming rules.
///
/// # Arguments
/// * `s` - The package name from the CLI
///
/// # Returns
/// * `Ok(String)` if the name is valid
/// * `Err(CliError::InvalidPackage)` otherwise
pub fn parse_package_arg(s: &str) -> Result<String, CliError> {
    let valid_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-.".contains(c);
    let starts_alnum = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

    if s.len() >= 2 && starts_alnum && s.chars().all(valid_char) {
        Ok(s.to_string())
    } else {
        Err(CliError::InvalidPackage(s.to_string()))
    }
}

/// Drops repeated package names, keeping the first occurrence of each
pub fn unique_packages(packages: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    packages
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with defaults filled in
    /// * `Err(CliError::NoCacheDir)` if no cache directory can be found
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => NewsCache::default_dir().ok_or(CliError::NoCacheDir)?,
        };

        let predicates = if cli.search.is_empty() {
            vec![String::new()]
        } else {
            cli.search.clone()
        };

        Ok(RunConfig {
            packages: unique_packages(&cli.packages),
            fetch: cli.fetch,
            predicates,
            color: !cli.no_color,
            cache_dir,
            base_url: cli.base_url.clone(),
        })
    }
}
