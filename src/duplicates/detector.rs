//! Content-equality detection over a completed snapshot.
//!
//! # Overview
//!
//! This module provides the [`DuplicateDetector`], which narrows a
//! snapshot's file list down to groups of files with identical content:
//!
//! 1. Filter to candidates at or above the minimum size and group them by
//!    exact size; files with different sizes cannot be duplicates, so
//!    singleton sizes are discarded without any file I/O.
//! 2. On platforms with on-disk identity, collapse hardlinked paths to a
//!    single representative so the same bytes are neither hashed twice nor
//!    reported as duplicates of themselves.
//! 3. Hash the remaining candidates with streaming BLAKE3 and keep digest
//!    groups of two or more files.
//!
//! Read failures drop the affected file and are tallied; only a shutdown
//! request aborts detection.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::platform::{FileIdentity, FileRecord, Platform};
use crate::progress::ProgressCallback;
use crate::scanner::Snapshot;

use super::hasher::{Hash, Hasher};
use super::{DetectorError, DuplicateGroup};

/// Default minimum candidate size in bytes. Excludes empty files, whose
/// shared digest would group them all.
pub const MIN_DUPLICATE_SIZE: u64 = 1;

/// Counters describing one detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorStats {
    /// Files at or above the minimum size
    pub candidates: usize,
    /// Size groups holding two or more candidates
    pub size_groups: usize,
    /// Content hashes actually computed
    pub hashes_computed: usize,
    /// Candidates collapsed into an already-seen on-disk identity
    pub hardlink_skips: usize,
    /// Candidates dropped because their content could not be read
    pub read_failures: usize,
}

/// Finds files with identical content in a [`Snapshot`].
///
/// # Example
///
/// ```no_run
/// use dustat::duplicates::DuplicateDetector;
/// use dustat::platform::Platform;
/// use dustat::scanner;
/// use std::path::Path;
///
/// let platform = Platform::detect();
/// let snapshot = scanner::scan(Path::new("/data"), &platform)?;
/// let groups = DuplicateDetector::new(&platform)
///     .with_min_size(1024 * 1024)
///     .detect(&snapshot)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct DuplicateDetector<'a> {
    platform: &'a Platform,
    hasher: Hasher,
    min_size: u64,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl<'a> DuplicateDetector<'a> {
    /// Create a detector with the default minimum size.
    #[must_use]
    pub fn new(platform: &'a Platform) -> Self {
        Self {
            platform,
            hasher: Hasher::new(),
            min_size: MIN_DUPLICATE_SIZE,
            shutdown_flag: None,
            progress: None,
        }
    }

    /// Set the minimum size a file must have to be considered.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set a progress callback for the hashing phase.
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

    /// Detect duplicate groups, keyed by content hash.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::Interrupted`] on a shutdown request.
    pub fn detect(&self, snapshot: &Snapshot) -> Result<HashMap<Hash, DuplicateGroup>, DetectorError> {
        self.detect_with_stats(snapshot).map(|(groups, _)| groups)
    }

    /// Detect duplicate groups together with the run's counters.
    pub fn detect_with_stats(
        &self,
        snapshot: &Snapshot,
    ) -> Result<(HashMap<Hash, DuplicateGroup>, DetectorStats), DetectorError> {
        let mut stats = DetectorStats::default();

        // Phase 1: size grouping. An ordered map keeps candidate order
        // reproducible across runs.
        let mut by_size: BTreeMap<u64, Vec<&FileRecord>> = BTreeMap::new();
        for record in &snapshot.all_files {
            if record.size < self.min_size {
                continue;
            }
            stats.candidates += 1;
            by_size.entry(record.size).or_default().push(record);
        }
        by_size.retain(|_, members| members.len() > 1);
        stats.size_groups = by_size.len();

        // Phase 2: hardlink collapse. The first path of each identity is
        // the representative; later paths are the same bytes on disk.
        let identity_capable = self.platform.supports_identity();
        let mut seen_identities: HashSet<FileIdentity> = HashSet::new();
        let mut to_hash: Vec<&FileRecord> = Vec::new();
        for members in by_size.values() {
            for record in members {
                match record.identity {
                    Some(identity) if identity_capable && !seen_identities.insert(identity) => {
                        stats.hardlink_skips += 1;
                        log::debug!(
                            "Hardlink of an already considered file: {}",
                            record.path.display()
                        );
                    }
                    _ => to_hash.push(record),
                }
            }
        }

        log::info!(
            "Duplicate detection: {} candidates in {} size groups, {} to hash ({} hardlink skips)",
            stats.candidates,
            stats.size_groups,
            to_hash.len(),
            stats.hardlink_skips
        );

        // Phase 3: content hashing.
        if let Some(progress) = &self.progress {
            progress.on_phase_start("hash", to_hash.len());
        }

        let mut by_hash: HashMap<Hash, Vec<&FileRecord>> = HashMap::new();
        for (index, record) in to_hash.iter().enumerate() {
            if self.is_shutdown_requested() {
                log::info!("Duplicate detection interrupted after {} hashes", index);
                return Err(DetectorError::Interrupted);
            }

            match self.hasher.hash_file(&record.path) {
                Ok(hash) => {
                    stats.hashes_computed += 1;
                    by_hash.entry(hash).or_default().push(record);
                }
                Err(e) => {
                    stats.read_failures += 1;
                    log::warn!("Cannot hash {}: {}", record.path.display(), e);
                }
            }

            if let Some(progress) = &self.progress {
                progress.on_progress(index + 1, &record.path.display().to_string());
                progress.on_item_completed(record.size);
            }
        }

        if let Some(progress) = &self.progress {
            progress.on_phase_end("hash");
        }

        let mut groups: HashMap<Hash, DuplicateGroup> = HashMap::new();
        for (hash, records) in by_hash {
            if records.len() < 2 {
                continue;
            }
            let size = records[0].size;
            debug_assert!(records.iter().all(|r| r.size == size));
            let members: Vec<PathBuf> = records.iter().map(|r| r.path.clone()).collect();
            groups.insert(hash, DuplicateGroup::new(hash, size, members));
        }

        log::info!(
            "Duplicate detection complete: {} groups from {} hashes, {} read failures",
            groups.len(),
            stats.hashes_computed,
            stats.read_failures
        );

        Ok((groups, stats))
    }
}
