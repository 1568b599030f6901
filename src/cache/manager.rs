//! News cache for persisting fetched items to disk
//!
//! Provides a `NewsCache` that keeps, per package, a plain-text listing for
//! humans and a JSON file that is read back when searching.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

use crate::data::NewsItem;

/// Name of the cache directory inside the user's home directory
const CACHE_DIR_NAME: &str = ".dptn";

/// Extension of the structured cache file
const JSON_EXTENSION: &str = "json";

/// Errors that can occur when reading or writing the news cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("Cache I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The structured cache file exists but cannot be parsed
    #[error("Corrupt cache file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Manages the on-disk news files of each package
///
/// For a package `curl` the cache holds two files in the cache directory:
/// `curl` with one `date;;title;;url` line per item, and `curl.json` with the
/// serialized list of items.
#[derive(Debug, Clone)]
pub struct NewsCache {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl NewsCache {
    /// Creates a NewsCache rooted at the given directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the default cache directory (`~/.dptn`)
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn default_dir() -> Option<PathBuf> {
        let base_dirs = BaseDirs::new()?;
        Some(base_dirs.home_dir().join(CACHE_DIR_NAME))
    }

    /// Returns the directory this cache writes to
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the plain-text cache file of a package
    pub fn text_path(&self, package: &str) -> PathBuf {
        self.cache_dir.join(package)
    }

    /// Path of the structured cache file of a package
    pub fn json_path(&self, package: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", package, JSON_EXTENSION))
    }

    /// Ensures the cache directory exists
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::io(&self.cache_dir, e))
    }

    /// Removes both cache files of a package
    ///
    /// Missing files are not an error, so clearing twice is fine.
    pub fn clear(&self, package: &str) -> Result<(), CacheError> {
        for path in [self.text_path(package), self.json_path(package)] {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed cache file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(&path, e)),
            }
        }
        Ok(())
    }

    /// Writes both cache files of a package, replacing any previous content
    ///
    /// # Arguments
    /// * `package` - Package the items belong to
    /// * `items` - Items in listing order
    pub fn store(&self, package: &str, items: &[NewsItem]) -> Result<(), CacheError> {
        let text: String = items
            .iter()
            .map(|item| format!("{}\n", item.to_cache_line()))
            .collect();
        let text_path = self.text_path(package);
        fs::write(&text_path, text).map_err(|e| CacheError::io(&text_path, e))?;

        let json_path = self.json_path(package);
        let json = serde_json::to_string(items)
            .map_err(|e| CacheError::io(&json_path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&json_path, json).map_err(|e| CacheError::io(&json_path, e))?;

        tracing::debug!(%package, items = items.len(), "stored news cache");
        Ok(())
    }

    /// Reads the cached items of a package
    ///
    /// # Returns
    /// * `Ok(Some(items))` if the package has been fetched
    /// * `Ok(None)` if there is no structured cache file yet
    /// * `Err(CacheError)` if the file cannot be read or parsed
    pub fn load(&self, package: &str) -> Result<Option<Vec<NewsItem>>, CacheError> {
        let path = self.json_path(package);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(&path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CacheError::Corrupt { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (NewsCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = NewsCache::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn sample_items() -> Vec<NewsItem> {
        vec![
            NewsItem {
                date: "2024-03-05".to_string(),
                title: "Accepted curl 8.6.0-1 (source) into unstable".to_string(),
                url: "https://tracker.debian.org/news/1503210/".to_string(),
            },
            NewsItem {
                date: "2024-02-01".to_string(),
                title: "curl 8.5.0-2 MIGRATED to testing".to_string(),
                url: "https://tracker.debian.org/news/1490000/".to_string(),
            },
        ]
    }

    #[test]
    fn test_store_writes_both_files() {
        let (cache, temp_dir) = create_test_cache();

        cache.store("curl", &sample_items()).expect("Store should succeed");

        assert!(temp_dir.path().join("curl").exists(), "Text cache should exist");
        assert!(temp_dir.path().join("curl.json").exists(), "JSON cache should exist");
    }

    #[test]
    fn test_text_cache_has_one_line_per_item() {
        let (cache, temp_dir) = create_test_cache();

        cache.store("curl", &sample_items()).expect("Store should succeed");

        let content = fs::read_to_string(temp_dir.path().join("curl")).expect("Should read file");
        assert_eq!(
            content,
            "2024-03-05;;Accepted curl 8.6.0-1 (source) into unstable;;https://tracker.debian.org/news/1503210/\n\
             2024-02-01;;curl 8.5.0-2 MIGRATED to testing;;https://tracker.debian.org/news/1490000/\n"
        );
    }

    #[test]
    fn test_store_then_load_roundtrip() {
        let (cache, _temp_dir) = create_test_cache();
        let items = sample_items();

        cache.store("curl", &items).expect("Store should succeed");
        let loaded = cache.load("curl").expect("Load should succeed");

        assert_eq!(loaded, Some(items));
    }

    #[test]
    fn test_load_returns_none_for_unfetched_package() {
        let (cache, _temp_dir) = create_test_cache();

        let loaded = cache.load("never-fetched").expect("Load should succeed");

        assert!(loaded.is_none(), "Should return None for missing cache");
    }

    #[test]
    fn test_load_reports_corrupt_json() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("broken.json"), "[{\"date\":").expect("Should write file");

        let result = cache.load("broken");

        assert!(matches!(result, Err(CacheError::Corrupt { .. })));
    }

    #[test]
    fn test_clear_removes_both_files() {
        let (cache, temp_dir) = create_test_cache();
        cache.store("curl", &sample_items()).expect("Store should succeed");

        cache.clear("curl").expect("Clear should succeed");

        assert!(!temp_dir.path().join("curl").exists());
        assert!(!temp_dir.path().join("curl.json").exists());
        assert!(cache.load("curl").expect("Load should succeed").is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (cache, temp_dir) = create_test_cache();
        cache.store("curl", &sample_items()).expect("Store should succeed");

        cache.clear("curl").expect("First clear should succeed");
        cache.clear("curl").expect("Second clear should succeed");

        assert!(!temp_dir.path().join("curl").exists());
        assert!(!temp_dir.path().join("curl.json").exists());
    }

    #[test]
    fn test_clear_leaves_other_packages_alone() {
        let (cache, _temp_dir) = create_test_cache();
        cache.store("curl", &sample_items()).expect("Store should succeed");
        cache.store("wget", &sample_items()).expect("Store should succeed");

        cache.clear("curl").expect("Clear should succeed");

        assert!(cache.load("wget").expect("Load should succeed").is_some());
    }

    #[test]
    fn test_overwrite_replaces_previous_items() {
        let (cache, _temp_dir) = create_test_cache();
        let items = sample_items();

        cache.store("curl", &items).expect("First store should succeed");
        cache.store("curl", &items[..1]).expect("Second store should succeed");

        let loaded = cache.load("curl").expect("Load should succeed");
        assert_eq!(loaded, Some(items[..1].to_vec()), "Cache should contain latest data");
    }

    #[test]
    fn test_ensure_dir_creates_nested_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = NewsCache::with_dir(nested_path.clone());

        cache.ensure_dir().expect("ensure_dir should succeed");
        cache.ensure_dir().expect("ensure_dir should be repeatable");

        assert!(nested_path.is_dir(), "Nested directory should be created");
    }

    #[test]
    fn test_default_dir_ends_with_dptn() {
        if let Some(dir) = NewsCache::default_dir() {
            assert!(dir.ends_with(".dptn"), "Cache path should end with .dptn");
        }
        // Test passes if default_dir() returns None (e.g., no home directory in CI)
    }
}
