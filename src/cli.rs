//! Command-line interface definitions for dustat.
//!
//! This module defines all CLI arguments, subcommands, and options using the
//! clap derive API. Global options (verbosity, color) sit on the top-level
//! parser; each operation is a subcommand.
//!
//! # Example
//!
//! ```bash
//! # Report on the current directory
//! dustat scan
//!
//! # Top 20 folders and files under ~/Downloads, always rescanning
//! dustat scan ~/Downloads -n 20 --refresh
//!
//! # List duplicate files of at least 1 MiB
//! dustat duplicates ~/Downloads --min-size 1MiB
//!
//! # Machine-readable exports
//! dustat export ~/Downloads --format json --pretty
//! dustat export ~/Downloads --format csv --report large-files --out large.csv
//!
//! # Cache maintenance
//! dustat cache info ~/Downloads
//! dustat cache clear
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::CsvReport;

/// Disk usage inventory with duplicate detection.
///
/// dustat walks a subtree once and reports where the space went: largest
/// folders by immediate size, files over 100 MB, per-extension totals, and
/// optionally groups of files with identical content.
#[derive(Debug, Parser)]
#[command(name = "dustat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dustat.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and print the usage report
    Scan(ScanArgs),
    /// Scan a directory and list files with identical content
    Duplicates(DuplicatesArgs),
    /// Scan a directory and export the results as JSON or CSV
    Export(ExportArgs),
    /// Inspect or clear the snapshot cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Show the top N folders and files (default from config, normally 10)
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Do not show scan progress
    #[arg(long)]
    pub no_progress: bool,

    /// Ignore the snapshot cache entirely (no load, no save)
    #[arg(long)]
    pub no_cache: bool,

    /// Rescan even when a fresh cached snapshot exists
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Maximum cached-snapshot age in hours (default from config, normally 24)
    #[arg(long, value_name = "HOURS")]
    pub max_cache_age: Option<u64>,

    /// Also detect duplicate files and append them to the report
    #[arg(long)]
    pub duplicates: bool,

    /// Minimum file size for duplicate detection (e.g., 1KB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,
}

/// Arguments for the duplicates subcommand.
#[derive(Debug, Args)]
pub struct DuplicatesArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Minimum file size to consider (e.g., 1KB, 1MiB, 2GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Do not show progress
    #[arg(long)]
    pub no_progress: bool,

    /// Ignore the snapshot cache entirely (no load, no save)
    #[arg(long)]
    pub no_cache: bool,

    /// Rescan even when a fresh cached snapshot exists
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,
}

/// Arguments for the export subcommand.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Which CSV report to export (ignored for JSON)
    #[arg(long, value_enum, default_value = "directories")]
    pub report: ReportKind,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Limit the top-folders and top-files sections (JSON only)
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Include duplicate groups in the export (JSON only)
    #[arg(long)]
    pub duplicates: bool,

    /// Minimum file size for duplicate detection (e.g., 1KB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Do not show progress
    #[arg(long)]
    pub no_progress: bool,

    /// Ignore the snapshot cache entirely (no load, no save)
    #[arg(long)]
    pub no_cache: bool,

    /// Rescan even when a fresh cached snapshot exists
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,
}

/// Cache maintenance subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print the cache location and, optionally, one root's entry
    Info(CacheInfoArgs),
    /// Delete all cached snapshots
    Clear,
}

/// Arguments for `cache info`.
#[derive(Debug, Args)]
pub struct CacheInfoArgs {
    /// Show the cache entry for this root
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Export format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON document for scripting
    Json,
    /// CSV report for spreadsheets
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Which CSV report kind to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// One row per visited directory
    Directories,
    /// One row per extension label
    Extensions,
    /// One row per file over the large-file threshold
    LargeFiles,
}

impl ReportKind {
    /// Map onto the output layer's report selector.
    #[must_use]
    pub fn as_csv_report(self) -> CsvReport {
        match self {
            ReportKind::Directories => CsvReport::Directories,
            ReportKind::Extensions => CsvReport::Extensions,
            ReportKind::LargeFiles => CsvReport::LargeFiles,
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dustat::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1_000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1_024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_500_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid or
/// negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Split at the first character that cannot belong to the number
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
