//! Filesystem-backed snapshot store.
//!
//! # Overview
//!
//! [`SnapshotCache`] persists one JSON entry per scan root inside a cache
//! directory. Entries are addressed by the SHA-256 hex digest of the root
//! path string, which keeps storage names free of path separators and
//! other illegal characters.
//!
//! Loading is fail-safe by design: a missing entry, a version mismatch, a
//! root path mismatch, or any parse failure all read as "no cached
//! snapshot", never as an error. The worst outcome of a broken cache is a
//! rescan.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};

use crate::scanner::Snapshot;

use super::record::{CacheRecord, CACHE_VERSION};
use super::CacheError;

/// Entries older than this are stale by default.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Stores and retrieves snapshots keyed by scan root.
///
/// Callers are expected to pass canonicalized roots; the scanner produces
/// them, so saving its snapshot and loading with the same canonical path
/// always agree on the key.
///
/// # Example
///
/// ```no_run
/// use dustat::cache::{SnapshotCache, DEFAULT_MAX_AGE};
/// use std::path::Path;
///
/// let cache = SnapshotCache::open_default()?;
/// let root = Path::new("/home/user/projects");
/// if cache.is_valid(root, DEFAULT_MAX_AGE) {
///     if let Some(snapshot) = cache.load(root) {
///         println!("cached: {} files", snapshot.file_count);
///     }
/// }
/// # Ok::<(), dustat::cache::CacheError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Create a cache rooted at the given directory.
    ///
    /// The directory is created lazily on first save.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open the cache in the platform cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoCacheDir`] when the platform provides no
    /// cache location.
    pub fn open_default() -> Result<Self, CacheError> {
        let project_dirs =
            ProjectDirs::from("com", "dustat", "dustat").ok_or(CacheError::NoCacheDir)?;
        Ok(Self::new(project_dirs.cache_dir().to_path_buf()))
    }

    /// The directory entries are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Storage key for a root path: SHA-256 hex of its string form.
    #[must_use]
    pub fn entry_key(root: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(root.to_string_lossy().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Location of the entry file for a root path.
    #[must_use]
    pub fn entry_path(&self, root: &Path) -> PathBuf {
        self.dir.join(format!("{}.json", Self::entry_key(root)))
    }

    /// Persist a snapshot, replacing any prior entry for the same root.
    ///
    /// Returns the storage key.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be serialized or written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<String, CacheError> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let key = Self::entry_key(&snapshot.root_path);
        let path = self.dir.join(format!("{key}.json"));
        let record = CacheRecord::from_snapshot(snapshot);
        let json = serde_json::to_string_pretty(&record)?;

        fs::write(&path, json).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;

        log::debug!(
            "Cached snapshot of {} at {}",
            snapshot.root_path.display(),
            path.display()
        );
        Ok(key)
    }

    /// Load the cached snapshot for a root path, if one is usable.
    ///
    /// Returns `None` for a missing entry, an unreadable or unparsable
    /// entry, a version mismatch, or a root path mismatch. Never errors.
    #[must_use]
    pub fn load(&self, root: &Path) -> Option<Snapshot> {
        let path = self.entry_path(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No cache entry at {}: {}", path.display(), e);
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Unparsable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if record.version != CACHE_VERSION {
            log::debug!(
                "Cache entry {} has version {}, want {}",
                path.display(),
                record.version,
                CACHE_VERSION
            );
            return None;
        }

        if record.root_path != root.to_string_lossy() {
            log::debug!(
                "Cache entry {} is for root {:?}, not {}",
                path.display(),
                record.root_path,
                root.display()
            );
            return None;
        }

        log::debug!("Loaded cached snapshot for {}", root.display());
        Some(record.into_snapshot())
    }

    /// Whether a fresh-enough entry exists for a root path.
    ///
    /// True only if the entry file exists and was modified within
    /// `max_age`. Does not read or validate the entry's content.
    #[must_use]
    pub fn is_valid(&self, root: &Path, max_age: Duration) -> bool {
        let path = self.entry_path(root);
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };

        match SystemTime::now().duration_since(modified) {
            Ok(age) => age <= max_age,
            // Future mtimes count as fresh rather than expired.
            Err(_) => true,
        }
    }

    /// Delete every entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory listing or a removal
    /// fails. A missing cache directory clears zero entries.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(CacheError::Io {
                    path: self.dir.clone(),
                    source: e,
                })
            }
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|e| CacheError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }

        log::debug!("Cleared {} cache entries from {}", removed, self.dir.display());
        Ok(removed)
    }
}
