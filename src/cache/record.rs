//! On-disk representation of a snapshot.
//!
//! A [`CacheRecord`] is the serialized form of one [`Snapshot`]: a
//! versioned JSON document with every path stored as a portable string.
//! File entries keep only path, size, and modification time, so a snapshot
//! rebuilt from cache carries no symlink or on-disk identity information.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::FileRecord;
use crate::scanner::Snapshot;

/// Current version of the cache entry format.
pub const CACHE_VERSION: u32 = 1;

/// Serialized form of one scan snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Format version.
    pub version: u32,
    /// When this entry was written.
    pub saved_at: DateTime<Utc>,
    /// Canonicalized scan root, compared verbatim on load.
    pub root_path: String,
    /// Sum of all file sizes in bytes.
    pub total_size: u64,
    /// Number of files.
    pub file_count: u64,
    /// Number of directories.
    pub dir_count: u64,
    /// Number of symlinked files.
    pub symlink_count: u64,
    /// Immediate size per directory.
    pub folder_sizes: BTreeMap<String, u64>,
    /// Bytes per extension label.
    pub extension_sizes: BTreeMap<String, u64>,
    /// Files above the large-file threshold.
    pub large_files: Vec<(String, u64)>,
    /// Every file as a (path, size, modified) triple.
    pub files: Vec<CachedFile>,
    /// When the underlying scan completed.
    pub scan_time: Option<DateTime<Utc>>,
}

/// One file inside a [`CacheRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFile {
    /// Path as a portable string.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

impl CacheRecord {
    /// Serialize a snapshot into the current record format.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            version: CACHE_VERSION,
            saved_at: Utc::now(),
            root_path: snapshot.root_path.to_string_lossy().into_owned(),
            total_size: snapshot.total_size,
            file_count: snapshot.file_count,
            dir_count: snapshot.dir_count,
            symlink_count: snapshot.symlink_count,
            folder_sizes: snapshot
                .folder_sizes
                .iter()
                .map(|(path, &size)| (path.to_string_lossy().into_owned(), size))
                .collect(),
            extension_sizes: snapshot.extension_sizes.clone(),
            large_files: snapshot
                .large_files
                .iter()
                .map(|(path, size)| (path.to_string_lossy().into_owned(), *size))
                .collect(),
            files: snapshot
                .all_files
                .iter()
                .map(|record| CachedFile {
                    path: record.path.to_string_lossy().into_owned(),
                    size: record.size,
                    modified: record.modified.into(),
                })
                .collect(),
            scan_time: snapshot.scan_time,
        }
    }

    /// Rebuild a snapshot from this record.
    ///
    /// Rebuilt file records are plain: no symlink flag, no identity, no
    /// link target. The scalar counters are restored verbatim.
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            root_path: PathBuf::from(self.root_path),
            total_size: self.total_size,
            file_count: self.file_count,
            dir_count: self.dir_count,
            symlink_count: self.symlink_count,
            folder_sizes: self
                .folder_sizes
                .into_iter()
                .map(|(path, size)| (PathBuf::from(path), size))
                .collect(),
            extension_sizes: self.extension_sizes,
            large_files: self
                .large_files
                .into_iter()
                .map(|(path, size)| (PathBuf::from(path), size))
                .collect(),
            all_files: self
                .files
                .into_iter()
                .map(|f| FileRecord::new(PathBuf::from(f.path), f.size, f.modified.into()))
                .collect(),
            scan_time: self.scan_time,
        }
    }
}
