//! Directory skip rules per platform.
//!
//! # Overview
//!
//! A scan must not wander into virtual filesystems (`/proc`, `/sys`),
//! runtime mounts, OS-reserved index/trash trees, or Windows system
//! directories. [`PathFilter`] answers one question, "must traversal skip
//! this directory?", for the platform kind it was built for.
//!
//! On unix-like kinds the skip set is partly dynamic: the mount table is
//! read once at construction and every mount whose filesystem type is
//! virtual (proc, sysfs, tmpfs, ...) joins the set. When the table cannot
//! be read, a static fallback list covers the usual suspects. The macOS
//! rule checks its reserved paths first and then delegates to the shared
//! unix rule; Windows matches on leaf names only.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::PlatformKind;

/// Mount points that are always treated as virtual on unix-likes, and the
/// full fallback set when the mount table is unreadable.
const UNIX_SPECIAL_FILESYSTEMS: &[&str] = &[
    "/proc",
    "/sys",
    "/dev",
    "/run",
    "/tmp",
    "/var/tmp",
    "/var/run",
    "/proc/sys/fs/binfmt_misc",
];

/// Device files that must never be probed.
const UNIX_SPECIAL_DEVICES: &[&str] = &[
    "/dev/null",
    "/dev/zero",
    "/dev/full",
    "/dev/random",
    "/dev/urandom",
];

/// Filesystem types that mark a mount as virtual in the mount table.
const VIRTUAL_FS_TYPES: &[&str] = &[
    "proc", "sysfs", "devtmpfs", "tmpfs", "debugfs", "tracefs", "cgroup", "configfs", "fusectl",
];

/// macOS-reserved paths checked before the shared unix rule.
const MACOS_RESERVED_PATHS: &[&str] =
    &["/Volumes", "/.Spotlight-V100", "/.fseventsd", "/.Trashes"];

/// Windows system directories matched by leaf name.
const WINDOWS_SYSTEM_DIRS: &[&str] = &[
    "$RECYCLE.BIN",
    "System Volume Information",
    "Config.Msi",
    "Windows",
];

/// Platform-aware skip predicate for directories.
///
/// The mount set is fixed at construction; [`PathFilter::should_skip`] is a
/// pure function of the path afterwards, so the filter can be shared freely
/// by reference for the life of the process.
#[derive(Debug, Clone)]
pub struct PathFilter {
    kind: PlatformKind,
    /// Virtual-filesystem mount points. Empty for the Windows kind.
    special_mounts: BTreeSet<PathBuf>,
}

impl PathFilter {
    /// Build the filter for a platform kind with that kind's default rules.
    ///
    /// Unix-like kinds read the mount table here, once; the result is
    /// cached in the returned value. Failure to read the table falls back
    /// to the static list (macOS has no readable table, so it always takes
    /// the fallback).
    #[must_use]
    pub fn for_kind(kind: PlatformKind) -> Self {
        let special_mounts = match kind {
            PlatformKind::Unix | PlatformKind::MacOs => {
                let mut mounts: BTreeSet<PathBuf> = UNIX_SPECIAL_FILESYSTEMS
                    .iter()
                    .map(PathBuf::from)
                    .collect();
                match detect_mounts() {
                    Some(detected) => {
                        log::debug!("Detected {} virtual mount points", detected.len());
                        mounts.extend(detected);
                    }
                    None => {
                        log::debug!("Mount table unreadable, using static skip list");
                    }
                }
                mounts
            }
            PlatformKind::Windows => BTreeSet::new(),
        };

        Self {
            kind,
            special_mounts,
        }
    }

    /// Build a filter with an explicit mount set and no detection.
    ///
    /// An empty set yields a filter that only applies the fixed rules of
    /// its kind (reserved paths, device files, leaf names), which is what
    /// tests scanning temp directories want.
    #[must_use]
    pub fn with_mounts<I>(kind: PlatformKind, mounts: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            kind,
            special_mounts: mounts.into_iter().collect(),
        }
    }

    /// The kind this filter was built for.
    #[must_use]
    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    /// Number of configured virtual mount points.
    #[must_use]
    pub fn mount_count(&self) -> usize {
        self.special_mounts.len()
    }

    /// Whether traversal must not descend into `path`.
    ///
    /// Evaluated once per directory, before any of its children are
    /// listed or probed.
    #[must_use]
    pub fn should_skip(&self, path: &Path) -> bool {
        match self.kind {
            PlatformKind::Unix => self.skip_unix(path),
            PlatformKind::MacOs => {
                // Reserved paths first, then the shared unix rule.
                if MACOS_RESERVED_PATHS.iter().any(|p| Path::new(p) == path) {
                    return true;
                }
                self.skip_unix(path)
            }
            PlatformKind::Windows => skip_windows(path),
        }
    }

    fn skip_unix(&self, path: &Path) -> bool {
        if UNIX_SPECIAL_DEVICES.iter().any(|d| Path::new(d) == path) {
            return true;
        }
        // Component-wise: a path equal to or below a virtual mount is out.
        self.special_mounts.iter().any(|m| path.starts_with(m))
    }
}

fn skip_windows(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if WINDOWS_SYSTEM_DIRS.contains(&name) {
        return true;
    }
    name.starts_with('.')
}

/// Parse mount-table text into the set of virtual mount points.
///
/// Expects the `/proc/mounts` line format: `device mountpoint fstype
/// options ...`. Lines with fewer than three fields are ignored.
fn parse_mount_table(text: &str) -> BTreeSet<PathBuf> {
    let mut mounts = BTreeSet::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let _device = fields.next();
        let (Some(mount_point), Some(fs_type)) = (fields.next(), fields.next()) else {
            continue;
        };
        if VIRTUAL_FS_TYPES.contains(&fs_type) {
            mounts.insert(PathBuf::from(mount_point));
        }
    }
    mounts
}

/// Read and parse the platform mount table, `None` if unavailable.
#[cfg(unix)]
fn detect_mounts() -> Option<BTreeSet<PathBuf>> {
    match std::fs::read_to_string("/proc/mounts") {
        Ok(text) => Some(parse_mount_table(&text)),
        Err(e) => {
            log::debug!("Cannot read /proc/mounts: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn detect_mounts() -> Option<BTreeSet<PathBuf>> {
    None
}
