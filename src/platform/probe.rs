//! Converting filesystem entries into normalized file records.
//!
//! # Overview
//!
//! [`FileProbe`] turns a path into a [`FileRecord`]: size, modification
//! time, symlink status, and (on unix-likes) the on-disk identity later
//! used for hardlink detection. Probing never panics and never aborts a
//! scan; every failure mode is classified into a [`ProbeError`] the caller
//! can log, count, and skip.
//!
//! The unix-like probe uses the link-aware stat form, so a symlink reports
//! its own size and identity rather than its target's, and the link target
//! is captured when it can be read. The Windows probe follows links and
//! never reports an identity.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::PlatformKind;

/// Identity of a file on disk as a (device, inode) pair.
///
/// Two paths with the same identity are hardlinks to one underlying file.
/// The device id disambiguates inodes across mounted filesystems.
pub type FileIdentity = (u64, u64);

/// Metadata for one successfully probed file.
///
/// Immutable once produced; the snapshot that collected it owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Path as encountered during traversal
    pub path: PathBuf,
    /// File size in bytes (a symlink's own size on unix-likes)
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Whether this entry is a symbolic link
    pub is_symlink: bool,
    /// On-disk (device, inode) identity, absent where the platform has none
    pub identity: Option<FileIdentity>,
    /// Resolved link target for symlinks, when readable
    pub link_target: Option<PathBuf>,
}

impl FileRecord {
    /// Create a plain record with no link or identity information.
    ///
    /// Used when rebuilding records from the snapshot cache, which persists
    /// only path, size, and modification time.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
            is_symlink: false,
            identity: None,
            link_target: None,
        }
    }
}

/// Errors from probing a single filesystem entry.
///
/// All of these are recoverable at the scan level: the entry is dropped
/// and traversal continues.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    /// Permission was denied when stat'ing the entry.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between listing and stat.
    #[error("Entry vanished: {0}")]
    Vanished(PathBuf),

    /// Any other I/O failure while stat'ing the entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    /// The path the failed probe was aimed at.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(path) | Self::Vanished(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}

/// Platform-aware file prober.
#[derive(Debug, Clone, Copy)]
pub struct FileProbe {
    kind: PlatformKind,
}

impl FileProbe {
    /// Create a probe for the given platform kind.
    #[must_use]
    pub fn new(kind: PlatformKind) -> Self {
        Self { kind }
    }

    /// Whether records from this probe carry on-disk identity.
    #[must_use]
    pub fn supports_identity(&self) -> bool {
        self.kind.supports_identity()
    }

    /// Probe one entry into a [`FileRecord`].
    ///
    /// # Errors
    ///
    /// Classified per [`ProbeError`]; the caller is expected to treat all
    /// variants as skip-and-continue.
    pub fn probe(&self, path: &Path) -> Result<FileRecord, ProbeError> {
        match self.kind {
            PlatformKind::Unix | PlatformKind::MacOs => self.probe_link_aware(path),
            PlatformKind::Windows => self.probe_following(path),
        }
    }

    /// lstat semantics: the symlink itself is described, never its target.
    fn probe_link_aware(&self, path: &Path) -> Result<FileRecord, ProbeError> {
        let metadata = std::fs::symlink_metadata(path).map_err(|e| classify(path, e))?;
        let is_symlink = metadata.file_type().is_symlink();

        // Target resolution failure is tolerated; the record just has none.
        let link_target = if is_symlink {
            std::fs::read_link(path).ok()
        } else {
            None
        };

        Ok(FileRecord {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_symlink,
            identity: identity_of(&metadata),
            link_target,
        })
    }

    /// Following stat: sizes reflect targets, identity is unavailable.
    fn probe_following(&self, path: &Path) -> Result<FileRecord, ProbeError> {
        let metadata = std::fs::metadata(path).map_err(|e| classify(path, e))?;
        let is_symlink = std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);

        Ok(FileRecord {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_symlink,
            identity: None,
            link_target: None,
        })
    }
}

fn classify(path: &Path, error: std::io::Error) -> ProbeError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => {
            log::debug!("Permission denied probing {}", path.display());
            ProbeError::PermissionDenied(path.to_path_buf())
        }
        ErrorKind::NotFound => {
            log::debug!("Entry vanished before probe: {}", path.display());
            ProbeError::Vanished(path.to_path_buf())
        }
        _ => {
            log::debug!("Probe I/O error for {}: {}", path.display(), error);
            ProbeError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

#[cfg(unix)]
fn identity_of(metadata: &Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn identity_of(_metadata: &Metadata) -> Option<FileIdentity> {
    None
}
