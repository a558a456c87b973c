use dustat::duplicates::{self, DetectorError, DuplicateDetector};
use dustat::platform::{PathFilter, Platform, PlatformKind};
use dustat::scanner;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn test_platform() -> Platform {
    Platform::with_filter(PathFilter::with_mounts(PlatformKind::Unix, []))
}

fn write_bytes(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_unique_files_produce_no_groups() {
    let dir = tempdir().unwrap();
    write_bytes(&dir.path().join("a.txt"), b"content a");
    write_bytes(&dir.path().join("b.txt"), b"content b");
    write_bytes(&dir.path().join("c.txt"), b"unrelated");

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_identical_pair_forms_one_group() {
    let dir = tempdir().unwrap();
    let content = b"duplicate content";
    write_bytes(&dir.path().join("a.txt"), content);
    write_bytes(&dir.path().join("b.txt"), content);
    write_bytes(&dir.path().join("c.txt"), b"something else!!!");

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.len(), 2);
    assert_eq!(group.size, content.len() as u64);
    assert_eq!(group.wasted_space(), content.len() as u64);
    assert_eq!(group.duplicate_count(), 1);

    let names: Vec<_> = group
        .members
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_same_size_different_content_is_not_grouped() {
    let dir = tempdir().unwrap();
    write_bytes(&dir.path().join("a.bin"), b"aaaaaaaa");
    write_bytes(&dir.path().join("b.bin"), b"bbbbbbbb");

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let detector = DuplicateDetector::new(&platform);
    let (groups, stats) = detector.detect_with_stats(&snapshot).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.candidates, 2);
    assert_eq!(stats.size_groups, 1);
    assert_eq!(stats.hashes_computed, 2);
}

#[test]
fn test_min_size_threshold_filters_candidates() {
    let dir = tempdir().unwrap();
    let content = vec![0xAB; 5 * 1024 * 1024];
    write_bytes(&dir.path().join("one.dat"), &content);
    write_bytes(&dir.path().join("two.dat"), &content);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    // 5 MiB twins clear a 1 MiB floor
    let groups = duplicates::find_duplicates(&snapshot, 1024 * 1024, &platform).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);

    // And fall below a 10 MiB one
    let groups = duplicates::find_duplicates(&snapshot, 10 * 1024 * 1024, &platform).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_three_way_group_wasted_space() {
    let dir = tempdir().unwrap();
    let content = vec![b'z'; 64];
    write_bytes(&dir.path().join("1.log"), &content);
    write_bytes(&dir.path().join("2.log"), &content);
    write_bytes(&dir.path().join("3.log"), &content);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].total_size(), 192);
    assert_eq!(groups[0].wasted_space(), 128);
    assert_eq!(groups[0].duplicate_count(), 2);
}

#[cfg(unix)]
#[test]
fn test_hardlink_pair_is_not_a_duplicate() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a.txt");
    write_bytes(&original, b"same bytes on disk");
    std::fs::hard_link(&original, dir.path().join("b.txt")).unwrap();

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let detector = DuplicateDetector::new(&platform);
    let (groups, stats) = detector.detect_with_stats(&snapshot).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.hardlink_skips, 1);
    assert_eq!(stats.hashes_computed, 1);
}

#[cfg(unix)]
#[test]
fn test_hardlink_representative_still_groups_with_real_copy() {
    let dir = tempdir().unwrap();
    let content = b"shared bytes here";
    let original = dir.path().join("a.txt");
    write_bytes(&original, content);
    std::fs::hard_link(&original, dir.path().join("b.txt")).unwrap();
    write_bytes(&dir.path().join("c.txt"), content);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let detector = DuplicateDetector::new(&platform);
    let (groups, stats) = detector.detect_with_stats(&snapshot).unwrap();

    assert_eq!(stats.hardlink_skips, 1);
    assert_eq!(groups.len(), 1);

    // One representative of the linked pair plus the independent copy
    let group = groups.values().next().unwrap();
    assert_eq!(group.len(), 2);
    let names: Vec<_> = group
        .members
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt", "c.txt"]);
}

#[test]
fn test_empty_snapshot_detects_nothing() {
    let dir = tempdir().unwrap();
    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_groups_ranked_by_wasted_space() {
    let dir = tempdir().unwrap();

    // Pair wasting 100 bytes
    let pair = vec![b'p'; 100];
    write_bytes(&dir.path().join("pair1.dat"), &pair);
    write_bytes(&dir.path().join("pair2.dat"), &pair);

    // Triple wasting 120 bytes
    let triple = vec![b't'; 60];
    write_bytes(&dir.path().join("trip1.dat"), &triple);
    write_bytes(&dir.path().join("trip2.dat"), &triple);
    write_bytes(&dir.path().join("trip3.dat"), &triple);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].wasted_space(), 120);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[1].wasted_space(), 100);
}

#[test]
fn test_zero_byte_files_are_never_grouped() {
    let dir = tempdir().unwrap();
    write_bytes(&dir.path().join("empty1"), b"");
    write_bytes(&dir.path().join("empty2"), b"");

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let detector = DuplicateDetector::new(&platform);
    let (groups, stats) = detector.detect_with_stats(&snapshot).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.candidates, 0);
}

#[test]
fn test_interrupted_detection_returns_error() {
    let dir = tempdir().unwrap();
    let content = b"interruptible";
    write_bytes(&dir.path().join("a.dat"), content);
    write_bytes(&dir.path().join("b.dat"), content);

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    flag.store(true, Ordering::SeqCst);
    let detector = DuplicateDetector::new(&platform).with_shutdown_flag(flag);

    let result = detector.detect(&snapshot);
    assert!(matches!(result, Err(DetectorError::Interrupted)));
}
