//! dustat - Disk Usage Inventory
//!
//! A cross-platform CLI tool that walks a subtree once and reports where
//! the space went: largest folders by immediate size, files over 100 MB,
//! per-extension totals, and optional duplicate detection via content
//! hashing (BLAKE3). Snapshots can be cached and reused between runs.

pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod platform;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::SnapshotCache;
use crate::cli::{
    CacheCommand, Cli, Commands, DuplicatesArgs, ExportArgs, ExportFormat, ScanArgs,
};
use crate::config::Config;
use crate::duplicates::{rank_groups, DuplicateDetector, DuplicateGroup};
use crate::error::ExitCode;
use crate::output::{format_size, CsvOutput, JsonReport, TerminalReport};
use crate::platform::Platform;
use crate::progress::Progress;
use crate::scanner::{Scanner, Snapshot};

/// How a snapshot should be obtained for one invocation.
struct SnapshotOptions {
    no_cache: bool,
    refresh: bool,
    max_age: Duration,
    show_progress: bool,
}

/// Run the application logic for parsed CLI arguments.
///
/// Returns the exit code for clean completions. Failures surface as
/// errors; [`ExitCode::from_error`] classifies them for the process exit.
///
/// # Errors
///
/// Returns an error when the scan root does not exist, when an export
/// target cannot be written, or when the user interrupts a scan.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load();
    let platform = Platform::detect();
    log::debug!("Platform: {}", platform.kind().label());

    match &cli.command {
        Commands::Scan(args) => run_scan(args, &config, &platform, cli.quiet),
        Commands::Duplicates(args) => run_duplicates(args, &config, &platform, cli.quiet),
        Commands::Export(args) => run_export(args, &config, &platform, cli.quiet),
        Commands::Cache(command) => run_cache(command),
    }
}

fn run_scan(
    args: &ScanArgs,
    config: &Config,
    platform: &Platform,
    quiet: bool,
) -> Result<ExitCode> {
    let options = SnapshotOptions {
        no_cache: args.no_cache,
        refresh: args.refresh,
        max_age: max_age_from(args.max_cache_age, config),
        show_progress: !args.no_progress && !quiet,
    };
    let snapshot = obtain_snapshot(&args.path, platform, &options, quiet)?;
    let top_n = args.top.unwrap_or(config.top_count);

    let groups = if args.duplicates {
        let min_size = args.min_size.unwrap_or(config.min_duplicate_size);
        Some(detect_duplicates(
            &snapshot,
            min_size,
            platform,
            options.show_progress,
            quiet,
        )?)
    } else {
        None
    };

    let mut report = TerminalReport::new(&snapshot).with_top_n(top_n);
    if let Some(groups) = &groups {
        report = report.with_duplicates(groups);
    }
    report.print().context("Failed to write report")?;

    Ok(ExitCode::Success)
}

fn run_duplicates(
    args: &DuplicatesArgs,
    config: &Config,
    platform: &Platform,
    quiet: bool,
) -> Result<ExitCode> {
    let options = SnapshotOptions {
        no_cache: args.no_cache,
        refresh: args.refresh,
        max_age: max_age_from(None, config),
        show_progress: !args.no_progress && !quiet,
    };
    let snapshot = obtain_snapshot(&args.path, platform, &options, quiet)?;

    let min_size = args.min_size.unwrap_or(config.min_duplicate_size);
    let groups = detect_duplicates(&snapshot, min_size, platform, options.show_progress, quiet)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    TerminalReport::new(&snapshot)
        .with_duplicates(&groups)
        .write_duplicates_to(&mut handle)
        .context("Failed to write report")?;

    Ok(ExitCode::Success)
}

fn run_export(
    args: &ExportArgs,
    config: &Config,
    platform: &Platform,
    quiet: bool,
) -> Result<ExitCode> {
    let options = SnapshotOptions {
        no_cache: args.no_cache,
        refresh: args.refresh,
        max_age: max_age_from(None, config),
        show_progress: !args.no_progress && !quiet,
    };
    let snapshot = obtain_snapshot(&args.path, platform, &options, quiet)?;
    let top_n = args.top.unwrap_or(config.top_count);

    let mut writer: Box<dyn io::Write> = match &args.out {
        Some(path) => Box::new(fs::File::create(path).with_context(|| {
            format!("Failed to create export file {}", path.display())
        })?),
        None => Box::new(io::stdout()),
    };

    match args.format {
        ExportFormat::Json => {
            let mut report = JsonReport::new(&snapshot, top_n);
            if args.duplicates {
                let min_size = args.min_size.unwrap_or(config.min_duplicate_size);
                let groups = detect_duplicates(
                    &snapshot,
                    min_size,
                    platform,
                    options.show_progress,
                    quiet,
                )?;
                report = report.with_duplicates(&groups);
            }
            report
                .write_to(&mut writer, args.pretty)
                .context("Failed to write JSON export")?;
        }
        ExportFormat::Csv => {
            CsvOutput::new(&snapshot, args.report.as_csv_report())
                .write_to(&mut writer)
                .context("Failed to write CSV export")?;
        }
    }

    if let Some(path) = &args.out {
        log::info!("Export written to {}", path.display());
    }

    Ok(ExitCode::Success)
}

fn run_cache(command: &CacheCommand) -> Result<ExitCode> {
    let cache = SnapshotCache::open_default().context("Snapshot cache unavailable")?;

    match command {
        CacheCommand::Info(args) => {
            println!("Cache directory: {}", cache.dir().display());
            if let Some(path) = &args.path {
                let root = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                let entry = cache.entry_path(&root);
                if !entry.exists() {
                    println!("No cache entry for {}", root.display());
                } else if let Some(snapshot) = cache.load(&root) {
                    println!("Entry for {}: {}", root.display(), entry.display());
                    println!(
                        "  {} files, {} directories, {}",
                        snapshot.file_count,
                        snapshot.dir_count,
                        format_size(snapshot.total_size)
                    );
                    if let Some(time) = snapshot.scan_time {
                        println!("  scanned at {}", time.to_rfc3339());
                    }
                } else {
                    println!(
                        "Entry for {} exists but is unreadable or stale: {}",
                        root.display(),
                        entry.display()
                    );
                }
            }
        }
        CacheCommand::Clear => {
            let removed = cache.clear().context("Failed to clear snapshot cache")?;
            println!("Removed {} cache entries", removed);
        }
    }

    Ok(ExitCode::Success)
}

/// Produce a snapshot for `root`, from cache when allowed and fresh,
/// otherwise by scanning (and saving the result back to the cache).
fn obtain_snapshot(
    root: &Path,
    platform: &Platform,
    options: &SnapshotOptions,
    quiet: bool,
) -> Result<Snapshot> {
    let cache = if options.no_cache { None } else { open_cache() };

    if !options.refresh {
        if let (Some(cache), Ok(canonical)) = (&cache, fs::canonicalize(root)) {
            if cache.is_valid(&canonical, options.max_age) {
                if let Some(snapshot) = cache.load(&canonical) {
                    log::info!("Using cached snapshot for {}", canonical.display());
                    return Ok(snapshot);
                }
            }
        }
    }

    let handler = signal::install_handler()?;
    let mut scanner = Scanner::new(platform).with_shutdown_flag(handler.get_flag());
    if options.show_progress {
        scanner = scanner.with_progress(Arc::new(Progress::new(quiet)));
    }

    let snapshot = scanner.scan(root)?;

    if let Some(cache) = &cache {
        match cache.save(&snapshot) {
            Ok(key) => log::debug!("Saved snapshot under cache key {}", key),
            Err(e) => log::warn!("Could not save snapshot to cache: {}", e),
        }
    }

    Ok(snapshot)
}

/// Rank all duplicate groups in a snapshot, worst waste first.
fn detect_duplicates(
    snapshot: &Snapshot,
    min_size: u64,
    platform: &Platform,
    show_progress: bool,
    quiet: bool,
) -> Result<Vec<DuplicateGroup>> {
    let handler = signal::install_handler()?;
    let mut detector = DuplicateDetector::new(platform)
        .with_min_size(min_size)
        .with_shutdown_flag(handler.get_flag());
    if show_progress {
        detector = detector.with_progress(Arc::new(Progress::new(quiet)));
    }

    let groups = detector.detect(snapshot)?;
    Ok(rank_groups(groups))
}

fn open_cache() -> Option<SnapshotCache> {
    match SnapshotCache::open_default() {
        Ok(cache) => Some(cache),
        Err(e) => {
            log::debug!("Snapshot cache unavailable: {}", e);
            None
        }
    }
}

fn max_age_from(hours_flag: Option<u64>, config: &Config) -> Duration {
    let hours = hours_flag.unwrap_or(config.cache_max_age_hours);
    Duration::from_secs(hours * 60 * 60)
}
