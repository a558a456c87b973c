//! Platform-specific filesystem behavior.
//!
//! # Overview
//!
//! Scanning behaves differently per operating system: which directories are
//! virtual or reserved and must never be descended into, whether `stat`
//! should follow symlinks, and whether inode identity exists for hardlink
//! detection. This module captures those differences behind a single
//! [`Platform`] value built once at startup and passed by reference into the
//! scanner and the duplicate detector. There is no process-global handler;
//! everything the engines need travels through the handle.
//!
//! # Architecture
//!
//! - [`PlatformKind`]: closed enum of supported platform families.
//! - [`PathFilter`]: per-kind skip rules for directories (virtual mounts,
//!   reserved paths, system directories).
//! - [`FileProbe`]: per-kind conversion of a path into a [`FileRecord`],
//!   with classified access failures.
//!
//! # Example
//!
//! ```no_run
//! use dustat::platform::Platform;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! if !platform.should_skip(Path::new("/var/log")) {
//!     let record = platform.probe(Path::new("/var/log/syslog")).unwrap();
//!     println!("{}: {} bytes", record.path.display(), record.size);
//! }
//! ```

pub mod filter;
pub mod probe;

// Re-export main types
pub use filter::PathFilter;
pub use probe::{FileIdentity, FileProbe, FileRecord, ProbeError};

use std::path::Path;

/// The platform families the scanner distinguishes.
///
/// Detection happens once; everything downstream branches on the value
/// rather than re-querying the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    /// Linux and other unix-likes: virtual filesystems, lstat, inodes.
    Unix,
    /// macOS: unix rules plus reserved volume/index/trash paths.
    MacOs,
    /// Windows: system directory names, following stat, no inode identity.
    Windows,
}

impl PlatformKind {
    /// Detect the kind for the running process.
    ///
    /// Unknown unixes fall back to [`PlatformKind::Unix`], which is the
    /// safest set of rules for anything POSIX-shaped.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }

    /// Whether inode identity is meaningful for this kind on this build.
    ///
    /// True only for unix-like kinds compiled on a unix target; a
    /// [`PlatformKind::Unix`] value constructed in a test on Windows still
    /// reports `false` because the metadata extension is unavailable.
    #[must_use]
    pub fn supports_identity(self) -> bool {
        match self {
            Self::Unix | Self::MacOs => cfg!(unix),
            Self::Windows => false,
        }
    }

    /// Human-readable name used in logs and the scan report header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unix => "unix",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }
}

/// Platform handle bundling the skip rules and the probe.
///
/// Constructed once by the entry point ([`Platform::detect`]) and passed by
/// reference wherever platform behavior is needed. Tests construct handles
/// for specific kinds, usually with an empty mount set so temp directories
/// are not filtered away.
#[derive(Debug)]
pub struct Platform {
    kind: PlatformKind,
    filter: PathFilter,
    probe: FileProbe,
}

impl Platform {
    /// Build the handle for the detected platform, reading the mount table
    /// where the kind calls for it.
    #[must_use]
    pub fn detect() -> Self {
        Self::with_kind(PlatformKind::detect())
    }

    /// Build the handle for an explicit kind with that kind's default rules.
    #[must_use]
    pub fn with_kind(kind: PlatformKind) -> Self {
        Self {
            kind,
            filter: PathFilter::for_kind(kind),
            probe: FileProbe::new(kind),
        }
    }

    /// Build the handle around a pre-built filter.
    ///
    /// The kind is taken from the filter, so a detection-free filter made
    /// with [`PathFilter::with_mounts`] yields a fully detection-free handle.
    #[must_use]
    pub fn with_filter(filter: PathFilter) -> Self {
        let kind = filter.kind();
        Self {
            kind,
            filter,
            probe: FileProbe::new(kind),
        }
    }

    /// The platform family this handle was built for.
    #[must_use]
    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    /// Whether traversal must not descend into `path`.
    #[must_use]
    pub fn should_skip(&self, path: &Path) -> bool {
        self.filter.should_skip(path)
    }

    /// Probe a single filesystem entry. See [`FileProbe::probe`].
    ///
    /// # Errors
    ///
    /// Returns a classified [`ProbeError`] when the entry cannot be
    /// stat'ed; callers skip the entry and continue.
    pub fn probe(&self, path: &Path) -> Result<FileRecord, ProbeError> {
        self.probe.probe(path)
    }

    /// Whether inode identity is available. See
    /// [`PlatformKind::supports_identity`].
    #[must_use]
    pub fn supports_identity(&self) -> bool {
        self.probe.supports_identity()
    }
}
