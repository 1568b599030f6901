//! Cache module for storing fetched news on disk
//!
//! Each package gets a human-readable text file and a JSON file. The JSON file
//! is the only one read back, when searching.

mod manager;

pub use manager::{CacheError, NewsCache};
