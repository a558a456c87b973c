use dustat::cache::{SnapshotCache, CACHE_VERSION};
use dustat::platform::{PathFilter, Platform, PlatformKind};
use dustat::scanner::{self, Snapshot};
use filetime::FileTime;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn test_platform() -> Platform {
    Platform::with_filter(PathFilter::with_mounts(PlatformKind::Unix, []))
}

fn write_file(path: &Path, len: usize) {
    File::create(path)
        .unwrap()
        .write_all(&vec![b'x'; len])
        .unwrap();
}

/// Scan a small fixture tree and return its snapshot.
fn scanned_fixture(root: &Path) -> Snapshot {
    let sub = root.join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&root.join("a.txt"), 10);
    write_file(&sub.join("b.log"), 20);
    scanner::scan(root, &test_platform()).unwrap()
}

#[test]
fn test_save_and_load_round_trip() {
    let tree = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let snapshot = scanned_fixture(tree.path());
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());

    let key = cache.save(&snapshot).unwrap();
    assert_eq!(key.len(), 64);

    let loaded = cache.load(&snapshot.root_path).unwrap();
    assert_eq!(loaded.root_path, snapshot.root_path);
    assert_eq!(loaded.total_size, 30);
    assert_eq!(loaded.file_count, 2);
    assert_eq!(loaded.dir_count, 2);
    assert_eq!(loaded.folder_sizes, snapshot.folder_sizes);
    assert_eq!(loaded.extension_sizes, snapshot.extension_sizes);
    assert_eq!(loaded.all_files.len(), 2);
    assert!(loaded.scan_time.is_some());
}

#[test]
fn test_load_missing_entry_is_none() {
    let cache_dir = tempdir().unwrap();
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());

    assert!(cache.load(Path::new("/no/such/root")).is_none());
}

#[test]
fn test_corrupted_entry_is_none() {
    let tree = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let snapshot = scanned_fixture(tree.path());
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());
    cache.save(&snapshot).unwrap();

    let entry = cache.entry_path(&snapshot.root_path);
    fs::write(&entry, b"{ not json").unwrap();

    assert!(cache.load(&snapshot.root_path).is_none());
}

#[test]
fn test_version_mismatch_is_none() {
    let tree = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let snapshot = scanned_fixture(tree.path());
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());
    cache.save(&snapshot).unwrap();

    let entry = cache.entry_path(&snapshot.root_path);
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&entry).unwrap()).unwrap();
    value["version"] = serde_json::json!(CACHE_VERSION + 1);
    fs::write(&entry, serde_json::to_string(&value).unwrap()).unwrap();

    assert!(cache.load(&snapshot.root_path).is_none());
}

#[test]
fn test_entry_copied_to_other_key_is_rejected() {
    let tree = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let snapshot = scanned_fixture(tree.path());
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());
    cache.save(&snapshot).unwrap();

    // Place the entry under the key of a different root
    let other_root = Path::new("/somewhere/else");
    let source = cache.entry_path(&snapshot.root_path);
    fs::copy(&source, cache.entry_path(other_root)).unwrap();

    assert!(cache.load(other_root).is_none());
}

#[test]
fn test_is_valid_respects_max_age() {
    let tree = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let snapshot = scanned_fixture(tree.path());
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());
    cache.save(&snapshot).unwrap();

    let day = Duration::from_secs(24 * 60 * 60);
    assert!(cache.is_valid(&snapshot.root_path, day));

    // Backdate the entry two hours
    let entry = cache.entry_path(&snapshot.root_path);
    let two_hours_ago = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
    filetime::set_file_mtime(&entry, FileTime::from_system_time(two_hours_ago)).unwrap();

    assert!(!cache.is_valid(&snapshot.root_path, Duration::from_secs(60 * 60)));
    assert!(cache.is_valid(&snapshot.root_path, Duration::from_secs(3 * 60 * 60)));
}

#[test]
fn test_is_valid_without_entry() {
    let cache_dir = tempdir().unwrap();
    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());

    assert!(!cache.is_valid(Path::new("/no/such/root"), Duration::from_secs(60)));
}

#[test]
fn test_clear_removes_all_entries() {
    let tree_one = tempdir().unwrap();
    let tree_two = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();

    let cache = SnapshotCache::new(cache_dir.path().to_path_buf());
    let first = scanned_fixture(tree_one.path());
    let second = scanned_fixture(tree_two.path());
    cache.save(&first).unwrap();
    cache.save(&second).unwrap();

    assert_eq!(cache.clear().unwrap(), 2);
    assert!(cache.load(&first.root_path).is_none());
    assert_eq!(cache.clear().unwrap(), 0);
}

#[test]
fn test_clear_on_missing_directory() {
    let cache_dir = tempdir().unwrap();
    let missing = cache_dir.path().join("never-created");
    let cache = SnapshotCache::new(missing);

    assert_eq!(cache.clear().unwrap(), 0);
}

#[test]
fn test_distinct_roots_have_distinct_keys() {
    let tree_one = tempdir().unwrap();
    let tree_two = tempdir().unwrap();

    let key_one = SnapshotCache::entry_key(tree_one.path());
    let key_two = SnapshotCache::entry_key(tree_two.path());

    assert_ne!(key_one, key_two);
    assert!(key_one.chars().all(|c| c.is_ascii_hexdigit()));
}
