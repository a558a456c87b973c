//! Scanner module: subtree traversal and aggregation.
//!
//! This module provides functionality for:
//! - Single-pass directory walking using walkdir
//! - Aggregation into a [`Snapshot`] (totals, per-directory sizes,
//!   extension histogram, large files, full file list)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: The traversal loop that feeds the aggregate
//! - [`snapshot`]: The aggregate itself plus its derived queries
//!
//! # Example
//!
//! ```no_run
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("."), &platform)?;
//! for (path, size) in snapshot.top_folders(10) {
//!     println!("{:>12}  {}", size, path.display());
//! }
//! # Ok::<(), dustat::scanner::ScanError>(())
//! ```

pub mod snapshot;
pub mod walker;

use std::path::{Path, PathBuf};

use crate::platform::Platform;

// Re-export main types
pub use snapshot::{
    extension_label, Snapshot, LARGE_FILE_THRESHOLD, NO_EXTENSION_LABEL,
};
pub use walker::{ScanStats, Scanner};

/// Scan the subtree rooted at `root` with a default-configured [`Scanner`].
///
/// # Errors
///
/// Returns [`ScanError::NotFound`] if `root` does not exist. Per-entry
/// failures are absorbed into the snapshot.
pub fn scan(root: &Path, platform: &Platform) -> Result<Snapshot, ScanError> {
    Scanner::new(platform).scan(root)
}

/// Errors that can occur during a scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan was stopped by a shutdown request.
    #[error("Scan interrupted")]
    Interrupted,

    /// An I/O error occurred while resolving the scan root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
