use dustat::platform::{PathFilter, Platform, PlatformKind};
use dustat::scanner::{self, ScanError, Scanner, NO_EXTENSION_LABEL};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Platform whose filter has no detected mounts, so temp directories
/// (often on tmpfs) are walked like any other tree.
fn test_platform() -> Platform {
    Platform::with_filter(PathFilter::with_mounts(PlatformKind::Unix, []))
}

fn write_file(path: &Path, len: usize) {
    File::create(path)
        .unwrap()
        .write_all(&vec![b'x'; len])
        .unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let platform = test_platform();

    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    assert_eq!(snapshot.file_count, 0);
    assert_eq!(snapshot.total_size, 0);
    assert_eq!(snapshot.dir_count, 1);
    assert!(snapshot.all_files.is_empty());
    assert!(snapshot.large_files.is_empty());
    assert!(snapshot.scan_time.is_some());

    // The root itself gets a zero-size bucket
    let root = fs::canonicalize(dir.path()).unwrap();
    assert_eq!(snapshot.folder_sizes.get(&root), Some(&0));
}

#[test]
fn test_scan_counts_and_total_size() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = a.join("b");
    fs::create_dir_all(&b).unwrap();

    write_file(&a.join("x.txt"), 10);
    write_file(&a.join("y.txt"), 20);
    write_file(&b.join("z.txt"), 30);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    assert_eq!(snapshot.file_count, 3);
    assert_eq!(snapshot.total_size, 60);
    assert_eq!(snapshot.dir_count, 3);
    assert_eq!(snapshot.symlink_count, 0);

    // The total is exactly the sum over the file list
    let sum: u64 = snapshot.all_files.iter().map(|f| f.size).sum();
    assert_eq!(snapshot.total_size, sum);
}

#[test]
fn test_folder_sizes_count_immediate_children_only() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = a.join("b");
    fs::create_dir_all(&b).unwrap();

    write_file(&a.join("x.txt"), 10);
    write_file(&a.join("y.txt"), 20);
    write_file(&b.join("z.txt"), 30);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let root = fs::canonicalize(dir.path()).unwrap();
    assert_eq!(snapshot.folder_sizes.get(&root), Some(&0));
    assert_eq!(snapshot.folder_sizes.get(&root.join("a")), Some(&30));
    assert_eq!(snapshot.folder_sizes.get(&root.join("a/b")), Some(&30));
}

#[test]
fn test_top_folders_ordering() {
    let dir = tempdir().unwrap();
    let big = dir.path().join("big");
    let small = dir.path().join("small");
    fs::create_dir(&big).unwrap();
    fs::create_dir(&small).unwrap();

    write_file(&big.join("data.bin"), 100);
    write_file(&small.join("note.txt"), 10);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let root = fs::canonicalize(dir.path()).unwrap();
    let top = snapshot.top_folders(10);
    assert_eq!(top[0], (root.join("big").as_path(), 100));
    assert_eq!(top[1], (root.join("small").as_path(), 10));
    assert_eq!(snapshot.top_folders(1).len(), 1);
}

#[test]
fn test_extension_histogram_lowercases_and_labels() {
    let dir = tempdir().unwrap();

    write_file(&dir.path().join("photo.JPG"), 4);
    write_file(&dir.path().join("copy.jpg"), 6);
    write_file(&dir.path().join("notes.txt"), 2);
    write_file(&dir.path().join("Makefile"), 8);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    assert_eq!(snapshot.extension_sizes.get(".jpg"), Some(&10));
    assert_eq!(snapshot.extension_sizes.get(".txt"), Some(&2));
    assert_eq!(snapshot.extension_sizes.get(NO_EXTENSION_LABEL), Some(&8));

    let ranked = snapshot.extensions_by_size();
    assert_eq!(ranked[0], (".jpg", 10));
}

#[test]
fn test_missing_root_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let platform = test_platform();

    let result = scanner::scan(&missing, &platform);

    assert!(matches!(result, Err(ScanError::NotFound(_))));
}

#[test]
fn test_file_root_scans_as_empty_tree() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("only.txt");
    write_file(&file_path, 12);

    let platform = test_platform();
    let snapshot = scanner::scan(&file_path, &platform).unwrap();

    assert_eq!(snapshot.file_count, 0);
    assert_eq!(snapshot.dir_count, 0);
    assert_eq!(snapshot.total_size, 0);
    assert!(snapshot.scan_time.is_some());
}

#[cfg(unix)]
#[test]
fn test_file_symlink_recorded_without_following() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    write_file(&target, 5);
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    // The link is a file record of its own, flagged as a symlink
    assert_eq!(snapshot.file_count, 2);
    assert_eq!(snapshot.symlink_count, 1);

    let link = snapshot
        .all_files
        .iter()
        .find(|f| f.path.file_name().is_some_and(|n| n == "link.txt"))
        .unwrap();
    assert!(link.is_symlink);
    assert_eq!(link.link_target.as_deref(), Some(target.as_path()));
}

#[cfg(unix)]
#[test]
fn test_directory_symlink_not_followed() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&sub.join("inner.txt"), 7);
    std::os::unix::fs::symlink(&sub, dir.path().join("alias")).unwrap();

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    // inner.txt is counted once; the alias contributes nothing
    assert_eq!(snapshot.file_count, 1);
    assert_eq!(snapshot.total_size, 7);
    assert_eq!(snapshot.symlink_count, 0);
}

#[test]
fn test_excluded_subtree_contributes_nothing() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("keep");
    let skip = dir.path().join("skip");
    fs::create_dir(&keep).unwrap();
    fs::create_dir(&skip).unwrap();

    write_file(&keep.join("a.txt"), 10);
    write_file(&skip.join("b.txt"), 20);

    let root = fs::canonicalize(dir.path()).unwrap();
    let filter = PathFilter::with_mounts(PlatformKind::Unix, [root.join("skip")]);
    let platform = Platform::with_filter(filter);

    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    assert_eq!(snapshot.file_count, 1);
    assert_eq!(snapshot.total_size, 10);
    assert!(!snapshot.folder_sizes.contains_key(&root.join("skip")));
}

#[test]
fn test_interrupted_scan_returns_error() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), 10);

    let platform = test_platform();
    let flag = Arc::new(AtomicBool::new(false));
    flag.store(true, Ordering::SeqCst);

    let scanner = Scanner::new(&platform).with_shutdown_flag(flag);
    let result = scanner.scan(dir.path());

    assert!(matches!(result, Err(ScanError::Interrupted)));
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&dir.path().join("c.txt"), 3);
    write_file(&dir.path().join("a.txt"), 1);
    write_file(&sub.join("b.txt"), 2);

    let platform = test_platform();
    let first = scanner::scan(dir.path(), &platform).unwrap();
    let second = scanner::scan(dir.path(), &platform).unwrap();

    let paths = |s: &dustat::scanner::Snapshot| -> Vec<PathBuf> {
        s.all_files.iter().map(|f| f.path.clone()).collect()
    };
    assert_eq!(paths(&first), paths(&second));
    assert_eq!(first.folder_sizes, second.folder_sizes);
    assert_eq!(first.total_size, second.total_size);
}
