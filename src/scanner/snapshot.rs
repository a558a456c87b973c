//! The aggregated result of one scan.
//!
//! # Overview
//!
//! A [`Snapshot`] is everything one traversal learned about a subtree:
//! scalar counters, the per-directory immediate-size map, the per-extension
//! size histogram, the large-file list, and the full list of probed file
//! records. It is built incrementally by the scanner, frozen when the
//! traversal returns, and read-only for every consumer after that
//! (duplicate detection, caching, reports).
//!
//! Directory sizes are deliberately *immediate*: `folder_sizes[d]` sums the
//! files directly inside `d`, never the contents of its subdirectories.
//! Downstream presentation carries this through unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::platform::FileRecord;

/// Files strictly larger than this land in [`Snapshot::large_files`].
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Histogram key for files whose name has no suffix.
pub const NO_EXTENSION_LABEL: &str = "(no extension)";

/// Complete aggregated result of one subtree traversal.
///
/// The two size maps are ordered maps keyed by path/extension. With the
/// scanner's name-sorted traversal, map iteration order matches the order
/// directories were visited, which keeps top-N tie-breaking stable.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Canonicalized scan root
    pub root_path: PathBuf,
    /// Sum of all probed file sizes in bytes
    pub total_size: u64,
    /// Number of files probed successfully
    pub file_count: u64,
    /// Number of directories visited (the root included)
    pub dir_count: u64,
    /// Number of probed files that were symlinks
    pub symlink_count: u64,
    /// Immediate size per visited directory (files directly inside it)
    pub folder_sizes: BTreeMap<PathBuf, u64>,
    /// Bytes per lower-cased extension label
    pub extension_sizes: BTreeMap<String, u64>,
    /// Files above [`LARGE_FILE_THRESHOLD`], in discovery order
    pub large_files: Vec<(PathBuf, u64)>,
    /// Every probed file record, in discovery order
    pub all_files: Vec<FileRecord>,
    /// Set when the traversal completes; absent while scanning
    pub scan_time: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Create an empty snapshot for a scan that is about to start.
    #[must_use]
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            total_size: 0,
            file_count: 0,
            dir_count: 0,
            symlink_count: 0,
            folder_sizes: BTreeMap::new(),
            extension_sizes: BTreeMap::new(),
            large_files: Vec::new(),
            all_files: Vec::new(),
            scan_time: None,
        }
    }

    /// Record a visited directory: counted once, given a zero-size bucket.
    pub(crate) fn add_directory(&mut self, path: &Path) {
        self.dir_count += 1;
        self.folder_sizes.entry(path.to_path_buf()).or_insert(0);
    }

    /// Fold one probed file into every aggregate.
    pub(crate) fn add_file(&mut self, record: FileRecord) {
        self.file_count += 1;
        self.total_size += record.size;

        if let Some(parent) = record.path.parent() {
            *self.folder_sizes.entry(parent.to_path_buf()).or_insert(0) += record.size;
        }

        let label = extension_label(&record.path);
        *self.extension_sizes.entry(label).or_insert(0) += record.size;

        if record.size > LARGE_FILE_THRESHOLD {
            self.large_files.push((record.path.clone(), record.size));
        }

        if record.is_symlink {
            self.symlink_count += 1;
        }

        self.all_files.push(record);
    }

    /// The `n` largest directories by immediate size, descending.
    ///
    /// The sort is stable, so equal sizes keep their traversal order.
    #[must_use]
    pub fn top_folders(&self, n: usize) -> Vec<(&Path, u64)> {
        let mut entries: Vec<(&Path, u64)> = self
            .folder_sizes
            .iter()
            .map(|(path, &size)| (path.as_path(), size))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }

    /// The `n` largest files from the large-file list, descending.
    #[must_use]
    pub fn top_files(&self, n: usize) -> Vec<(&Path, u64)> {
        let mut entries: Vec<(&Path, u64)> = self
            .large_files
            .iter()
            .map(|(path, size)| (path.as_path(), *size))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }

    /// Every extension with its byte total, largest first.
    #[must_use]
    pub fn extensions_by_size(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .extension_sizes
            .iter()
            .map(|(label, &size)| (label.as_str(), size))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Histogram key for a file name: lower-cased dotted suffix, or the
/// no-extension label.
///
/// `Makefile` and `.bashrc` have no suffix; `photo.JPG` maps to `.jpg`;
/// `archive.tar.gz` maps to `.gz`. A trailing dot counts as no suffix.
#[must_use]
pub fn extension_label(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => NO_EXTENSION_LABEL.to_string(),
    }
}
