//! Snapshot caching module.
//!
//! This module provides persistent storage for scan snapshots so repeated
//! invocations against the same root can skip the filesystem walk.
//!
//! # Architecture
//!
//! The caching system is split into two components:
//!
//! * [`record`]: The versioned JSON shape an entry is stored as.
//! * [`store`]: Key derivation, save/load, freshness, and clearing.
//!
//! # Cache Invalidation
//!
//! An entry is usable only when all of the following hold:
//! * its format version matches the current [`record::CACHE_VERSION`]
//! * its stored root path string equals the requested root verbatim
//! * (for freshness checks) its file modification time is within the
//!   caller's maximum age
//!
//! Anything else reads as "no cached snapshot" and the caller rescans.

pub mod record;
pub mod store;

use std::path::PathBuf;

pub use record::{CacheRecord, CachedFile, CACHE_VERSION};
pub use store::{SnapshotCache, DEFAULT_MAX_AGE};

/// Errors that can occur while writing or clearing the cache.
///
/// Loading never produces these; unusable entries read as absent.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// No platform cache directory could be determined.
    #[error("Cache directory unavailable")]
    NoCacheDir,

    /// An entry could not be serialized.
    #[error("Cache serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An I/O error occurred on the cache directory or an entry file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
