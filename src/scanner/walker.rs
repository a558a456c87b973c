//! Single-pass directory traversal that builds a [`Snapshot`].
//!
//! # Overview
//!
//! This module provides the [`Scanner`] struct, which walks one subtree
//! top-down with [`walkdir`] and folds every visited directory and probed
//! file into a [`Snapshot`]. The walk is synchronous and single-threaded;
//! ordering comes from walkdir's name-sorted traversal, so two scans of an
//! unchanged tree produce identical snapshots.
//!
//! Per-entry failures never abort the walk. Unreadable directories are
//! treated as empty, files that cannot be probed are skipped, and both are
//! tallied in [`ScanStats`]. Only a missing root or a shutdown request ends
//! the scan with an error.
//!
//! # Example
//!
//! ```no_run
//! use dustat::platform::Platform;
//! use dustat::scanner::Scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = Scanner::new(&platform).scan(Path::new("/home/user"))?;
//! println!("{} files, {} bytes", snapshot.file_count, snapshot.total_size);
//! # Ok::<(), dustat::scanner::ScanError>(())
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use walkdir::WalkDir;

use crate::platform::Platform;
use crate::progress::ProgressCallback;

use super::{ScanError, Snapshot};

/// Progress callbacks fire once per this many visited directories.
const PROGRESS_INTERVAL: u64 = 100;

/// Counters for non-fatal events observed during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files probed successfully and folded into the snapshot
    pub files_probed: u64,
    /// Files whose metadata probe failed (vanished, permission, I/O)
    pub probe_failures: u64,
    /// Directories whose listing failed and were treated as empty
    pub unreadable_dirs: u64,
}

/// Walks a subtree and aggregates it into a [`Snapshot`].
///
/// The platform handle supplies both the directory exclusion rules and the
/// metadata probe, so a scanner configured with a test filter sees exactly
/// the tree the test built.
pub struct Scanner<'a> {
    platform: &'a Platform,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner using the given platform's filter and probe.
    #[must_use]
    pub fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            shutdown_flag: None,
            progress: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag becomes `true`, the walk stops at the next entry and
    /// [`ScanError::Interrupted`] is returned.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set a progress callback, invoked every [`PROGRESS_INTERVAL`] directories.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Scan the subtree rooted at `root` and return the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if `root` does not exist and
    /// [`ScanError::Interrupted`] on a shutdown request. Everything else is
    /// absorbed into the snapshot and the (discarded) stats.
    pub fn scan(&self, root: &Path) -> Result<Snapshot, ScanError> {
        self.scan_with_stats(root).map(|(snapshot, _)| snapshot)
    }

    /// Scan the subtree rooted at `root`, returning the aggregate together
    /// with the non-fatal event counters.
    pub fn scan_with_stats(&self, root: &Path) -> Result<(Snapshot, ScanStats), ScanError> {
        let canonical = fs::canonicalize(root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
            _ => ScanError::Io {
                path: root.to_path_buf(),
                source: e,
            },
        })?;

        let mut snapshot = Snapshot::new(canonical.clone());
        let mut stats = ScanStats::default();

        // A non-directory root walks as an empty tree.
        if !canonical.is_dir() {
            log::warn!("Not a directory, nothing to scan: {}", canonical.display());
            snapshot.scan_time = Some(Utc::now());
            return Ok((snapshot, stats));
        }

        if let Some(progress) = &self.progress {
            progress.on_phase_start("scan", 0);
        }

        log::info!("Scanning {}", canonical.display());

        let platform = self.platform;
        let walker = WalkDir::new(&canonical)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.file_type().is_dir() && platform.should_skip(entry.path()) {
                    log::debug!("Skipping excluded directory: {}", entry.path().display());
                    false
                } else {
                    true
                }
            });

        for entry_result in walker {
            if self.is_shutdown_requested() {
                log::info!("Scan interrupted at {} directories", snapshot.dir_count);
                return Err(ScanError::Interrupted);
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    // Typically a directory listing we lack permission for;
                    // count it and keep walking.
                    stats.unreadable_dirs += 1;
                    match e.path() {
                        Some(path) => log::warn!("Cannot read {}: {}", path.display(), e),
                        None => log::warn!("Cannot read entry: {}", e),
                    }
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                snapshot.add_directory(entry.path());
                if snapshot.dir_count % PROGRESS_INTERVAL == 0 {
                    if let Some(progress) = &self.progress {
                        progress.on_message(&format!(
                            "{} directories, {} files",
                            snapshot.dir_count, snapshot.file_count
                        ));
                        progress.on_progress(
                            snapshot.dir_count as usize,
                            &entry.path().display().to_string(),
                        );
                    }
                }
                continue;
            }

            // Symlinks pointing at directories are recorded nowhere; following
            // them would double-count or loop.
            if file_type.is_symlink() && points_at_directory(entry.path()) {
                log::trace!("Skipping directory symlink: {}", entry.path().display());
                continue;
            }

            match platform.probe(entry.path()) {
                Ok(record) => {
                    stats.files_probed += 1;
                    if let Some(progress) = &self.progress {
                        progress.on_item_completed(record.size);
                    }
                    snapshot.add_file(record);
                }
                Err(e) => {
                    stats.probe_failures += 1;
                    log::debug!("Skipping file: {}", e);
                }
            }
        }

        snapshot.scan_time = Some(Utc::now());

        if let Some(progress) = &self.progress {
            progress.on_phase_end("scan");
        }

        log::info!(
            "Scan complete: {} files ({} bytes) in {} directories, {} probe failures, {} unreadable directories",
            snapshot.file_count,
            snapshot.total_size,
            snapshot.dir_count,
            stats.probe_failures,
            stats.unreadable_dirs
        );

        Ok((snapshot, stats))
    }
}

/// Whether a symlink's target resolves to a directory.
///
/// A broken link resolves to nothing and is treated as a file so the probe
/// can classify it.
fn points_at_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
