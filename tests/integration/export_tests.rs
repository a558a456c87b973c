use dustat::duplicates;
use dustat::output::{CsvOutput, CsvReport, JsonReport, TerminalReport};
use dustat::platform::{PathFilter, Platform, PlatformKind};
use dustat::scanner;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
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

/// Tree with 60 bytes in three files: src/ holds 30, docs/ holds 20,
/// and 10 sit at the root.
fn build_fixture(root: &Path) {
    let src = root.join("src");
    let docs = root.join("docs");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&docs).unwrap();
    write_file(&src.join("main.rs"), 18);
    write_file(&src.join("lib.rs"), 12);
    write_file(&docs.join("guide.md"), 20);
    write_file(&root.join("README"), 10);
}

#[test]
fn test_json_export_structure() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();

    let json = JsonReport::new(&snapshot, 10).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["scan_info"]["total_size"], 60);
    assert_eq!(value["scan_info"]["file_count"], 4);
    assert_eq!(value["scan_info"]["dir_count"], 3);
    assert!(value["scan_info"]["timestamp"].is_string());

    let folders = value["top_folders"].as_array().unwrap();
    assert_eq!(folders.len(), 3);
    assert_eq!(folders[0]["size_bytes"], 30);
    assert_eq!(folders[0]["percent"], 50.0);

    let types = value["file_types"].as_array().unwrap();
    assert_eq!(types[0]["extension"], ".rs");
    assert_eq!(types[0]["size_bytes"], 30);

    // No duplicates were attached
    assert!(value.get("duplicates").is_none());
}

#[test]
fn test_json_export_with_duplicates() {
    let dir = tempdir().unwrap();
    let content = b"twin content";
    File::create(dir.path().join("a.dat"))
        .unwrap()
        .write_all(content)
        .unwrap();
    File::create(dir.path().join("b.dat"))
        .unwrap()
        .write_all(content)
        .unwrap();

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();

    let json = JsonReport::new(&snapshot, 10)
        .with_duplicates(&groups)
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let dupes = value["duplicates"].as_array().unwrap();
    assert_eq!(dupes.len(), 1);
    assert_eq!(dupes[0]["size"], content.len() as u64);
    assert_eq!(dupes[0]["wasted_space"], content.len() as u64);
    assert_eq!(dupes[0]["hash"].as_str().unwrap().len(), 64);
    assert_eq!(dupes[0]["files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_json_writer_pretty_and_compact() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();
    let report = JsonReport::new(&snapshot, 5);

    let mut pretty = Vec::new();
    report.write_to(&mut pretty, true).unwrap();
    let pretty = String::from_utf8(pretty).unwrap();
    assert!(pretty.starts_with("{\n"));
    assert!(pretty.ends_with('\n'));

    let mut compact = Vec::new();
    report.write_to(&mut compact, false).unwrap();
    let compact = String::from_utf8(compact).unwrap();
    assert!(compact.starts_with("{\"scan_info\""));
}

#[test]
fn test_csv_directories_report() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();

    let text = CsvOutput::new(&snapshot, CsvReport::Directories)
        .to_string()
        .unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // Header plus one row per visited directory
    assert_eq!(lines[0], "path,size_bytes,size_human,percent");
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().any(|l| l.contains("/src,30,30.0 B,50.0")));
}

#[test]
fn test_csv_extensions_report() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();

    let text = CsvOutput::new(&snapshot, CsvReport::Extensions)
        .to_string()
        .unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "extension,size_bytes,size_human,percent");
    assert_eq!(lines[1], ".rs,30,30.0 B,50.0");
    assert!(lines.iter().any(|l| l.starts_with("(no extension),10,")));
}

#[test]
fn test_csv_large_files_report_empty_without_large_files() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();

    let text = CsvOutput::new(&snapshot, CsvReport::LargeFiles)
        .to_string()
        .unwrap();

    assert!(text.is_empty());
}

#[test]
fn test_terminal_report_renders_sections() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let snapshot = scanner::scan(dir.path(), &test_platform()).unwrap();

    let mut out = Vec::new();
    TerminalReport::new(&snapshot).write_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Disk usage report - "));
    assert!(text.contains("Total size: 60.0 B"));
    assert!(text.contains("Files: 4"));
    assert!(text.contains("Largest folders (top 10):"));
    assert!(text.contains("src"));
    assert!(text.contains("(no files larger than 100 MB)"));
    assert!(text.contains("File types (top 10):"));
    assert!(text.contains(".rs"));
}

#[test]
fn test_terminal_report_duplicates_section() {
    let dir = tempdir().unwrap();
    let content = vec![b'd'; 512];
    write_file(&dir.path().join("one.bin"), 512);
    File::create(dir.path().join("two.bin"))
        .unwrap()
        .write_all(&content)
        .unwrap();

    let platform = test_platform();
    let snapshot = scanner::scan(dir.path(), &platform).unwrap();
    let groups = duplicates::find_duplicates(&snapshot, 1, &platform).unwrap();
    assert_eq!(groups.len(), 1);

    let mut out = Vec::new();
    TerminalReport::new(&snapshot)
        .with_duplicates(&groups)
        .write_to(&mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Duplicate files:"));
    assert!(text.contains("reclaimable"));
    assert!(text.contains("one.bin"));
    assert!(text.contains("two.bin"));
}
