//! JSON output formatter for scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "scan_info": {
//!     "root": "/home/user/projects",
//!     "timestamp": "2024-05-01T12:34:56+00:00",
//!     "total_size": 1048576,
//!     "total_size_human": "1.0 MB",
//!     "file_count": 100,
//!     "dir_count": 10,
//!     "symlink_count": 2
//!   },
//!   "top_folders": [
//!     {"path": "/home/user/projects/src", "size_bytes": 524288, "size_human": "512.0 KB", "percent": 50.0}
//!   ],
//!   "top_files": [
//!     {"path": "/home/user/projects/big.bin", "size_bytes": 209715200, "size_human": "200.0 MB"}
//!   ],
//!   "file_types": [
//!     {"extension": ".rs", "size_bytes": 262144, "size_human": "256.0 KB", "percent": 25.0}
//!   ],
//!   "duplicates": [
//!     {"hash": "abc123...", "size": 1024, "wasted_space": 1024, "files": ["/a.txt", "/b.txt"]}
//!   ]
//! }
//! ```
//!
//! The `duplicates` section is only present when duplicate groups were
//! attached via [`JsonReport::with_duplicates`].
//!
//! # Example
//!
//! ```no_run
//! use dustat::output::json::JsonReport;
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("."), &platform).unwrap();
//!
//! // Compact JSON
//! let report = JsonReport::new(&snapshot, 10);
//! println!("{}", report.to_json().unwrap());
//!
//! // Pretty-printed JSON
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::DuplicateGroup;
use crate::output::{format_size, percent_of};
use crate::scanner::Snapshot;

/// Scan-wide metadata in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonScanInfo {
    /// Canonicalized root path of the scan
    pub root: String,
    /// Scan completion time (RFC 3339), absent for unfinished snapshots
    pub timestamp: Option<String>,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Total size as a human-readable string
    pub total_size_human: String,
    /// Number of files scanned
    pub file_count: u64,
    /// Number of directories visited
    pub dir_count: u64,
    /// Number of symlinked files counted
    pub symlink_count: u64,
}

/// A ranked directory entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFolderEntry {
    /// Directory path
    pub path: String,
    /// Immediate size in bytes (direct children only)
    pub size_bytes: u64,
    /// Immediate size as a human-readable string
    pub size_human: String,
    /// Share of the total size, one decimal place
    pub percent: f64,
}

/// A ranked large-file entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileEntry {
    /// File path
    pub path: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// File size as a human-readable string
    pub size_human: String,
}

/// A per-extension histogram entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonTypeEntry {
    /// Lower-cased extension label, e.g. `.rs` or `(no extension)`
    pub extension: String,
    /// Accumulated size in bytes
    pub size_bytes: u64,
    /// Accumulated size as a human-readable string
    pub size_human: String,
    /// Share of the total size, one decimal place
    pub percent: f64,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 content hash as hexadecimal string (64 characters)
    pub hash: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Bytes reclaimable by keeping a single member
    pub wasted_space: u64,
    /// Paths of all members
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a [`DuplicateGroup`].
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            wasted_space: group.wasted_space(),
            files: group.members.iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Scan-wide metadata
    pub scan_info: JsonScanInfo,
    /// Top directories by immediate size, descending
    pub top_folders: Vec<JsonFolderEntry>,
    /// Files over the large-file threshold by size, descending
    pub top_files: Vec<JsonFileEntry>,
    /// Full per-extension histogram by size, descending
    pub file_types: Vec<JsonTypeEntry>,
    /// Duplicate groups, present only when attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<JsonDuplicateGroup>>,
}

impl JsonReport {
    /// Create a JSON report from a snapshot.
    ///
    /// `top_n` bounds the `top_folders` and `top_files` sections; the
    /// extension histogram is always emitted in full.
    ///
    /// # Example
    ///
    /// ```
    /// use dustat::output::json::JsonReport;
    /// use dustat::scanner::Snapshot;
    /// use std::path::PathBuf;
    ///
    /// let snapshot = Snapshot::new(PathBuf::from("/scan"));
    /// let report = JsonReport::new(&snapshot, 10);
    /// assert_eq!(report.scan_info.file_count, 0);
    /// ```
    #[must_use]
    pub fn new(snapshot: &Snapshot, top_n: usize) -> Self {
        let total = snapshot.total_size;

        let top_folders = snapshot
            .top_folders(top_n)
            .into_iter()
            .map(|(path, size)| JsonFolderEntry {
                path: path_string(path),
                size_bytes: size,
                size_human: format_size(size),
                percent: percent_of(size, total),
            })
            .collect();

        let top_files = snapshot
            .top_files(top_n)
            .into_iter()
            .map(|(path, size)| JsonFileEntry {
                path: path_string(path),
                size_bytes: size,
                size_human: format_size(size),
            })
            .collect();

        let file_types = snapshot
            .extensions_by_size()
            .into_iter()
            .map(|(extension, size)| JsonTypeEntry {
                extension: extension.to_string(),
                size_bytes: size,
                size_human: format_size(size),
                percent: percent_of(size, total),
            })
            .collect();

        Self {
            scan_info: JsonScanInfo {
                root: path_string(&snapshot.root_path),
                timestamp: snapshot.scan_time.map(|t| t.to_rfc3339()),
                total_size: total,
                total_size_human: format_size(total),
                file_count: snapshot.file_count,
                dir_count: snapshot.dir_count,
                symlink_count: snapshot.symlink_count,
            },
            top_folders,
            top_files,
            file_types,
            duplicates: None,
        }
    }

    /// Attach duplicate groups to the report.
    ///
    /// Groups are emitted in the order given, so callers should rank them
    /// first (see [`crate::duplicates::rank_groups`]).
    #[must_use]
    pub fn with_duplicates(mut self, groups: &[DuplicateGroup]) -> Self {
        self.duplicates = Some(
            groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
        );
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a trailing newline.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
