//! dptn library
//!
//! Fetches package news from the Debian Package Tracker, caches them per
//! package and searches the cache. Exposed as a library for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod search;
