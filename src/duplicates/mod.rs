//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based candidate grouping (no file I/O)
//! - Hardlink collapse via on-disk identity
//! - Streaming BLAKE3 content hashing
//! - Duplicate group management
//!
//! # Example
//!
//! ```no_run
//! use dustat::duplicates;
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("/data"), &platform)?;
//! for group in duplicates::find_duplicates(&snapshot, 1024, &platform)? {
//!     println!(
//!         "{} copies of {} bytes, {} wasted",
//!         group.len(),
//!         group.size,
//!         group.wasted_space()
//!     );
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod detector;
pub mod hasher;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::platform::Platform;
use crate::scanner::Snapshot;

// Re-export main types
pub use detector::{DetectorStats, DuplicateDetector, MIN_DUPLICATE_SIZE};
pub use hasher::{hash_to_hex, Hash, Hasher, HASH_BUFFER_SIZE};

/// Confirmed duplicate group of files.
///
/// Derived from one detection run and discarded after presentation; never
/// persisted. Every member has identical content, so all members share one
/// size and one hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// BLAKE3 hash of the shared content
    pub hash: Hash,
    /// Size in bytes of each member
    pub size: u64,
    /// Member paths in discovery order; always two or more
    pub members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, members: Vec<PathBuf>) -> Self {
        Self {
            hash,
            size,
            members,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.members.len() as u64
    }

    /// Bytes recoverable by keeping one copy (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * (self.members.len() as u64).saturating_sub(1)
    }

    /// Number of duplicate copies (total minus one original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Hash as a hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Detect duplicates and rank the groups for presentation.
///
/// Groups are ordered by wasted space descending, then size descending,
/// then first member path, so output is stable across runs.
///
/// # Errors
///
/// Returns [`DetectorError::Interrupted`] on a shutdown request.
pub fn find_duplicates(
    snapshot: &Snapshot,
    min_size: u64,
    platform: &Platform,
) -> Result<Vec<DuplicateGroup>, DetectorError> {
    let groups = DuplicateDetector::new(platform)
        .with_min_size(min_size)
        .detect(snapshot)?;
    Ok(rank_groups(groups))
}

/// Order groups by wasted space descending with deterministic tie-breaks.
#[must_use]
pub fn rank_groups(groups: HashMap<Hash, DuplicateGroup>) -> Vec<DuplicateGroup> {
    let mut ranked: Vec<DuplicateGroup> = groups.into_values().collect();
    ranked.sort_by(|a, b| {
        b.wasted_space()
            .cmp(&a.wasted_space())
            .then_with(|| b.size.cmp(&a.size))
            .then_with(|| a.members.first().cmp(&b.members.first()))
    });
    ranked
}

/// Errors that can occur during duplicate detection.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    /// Detection was stopped by a shutdown request.
    #[error("Duplicate detection interrupted")]
    Interrupted,
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
