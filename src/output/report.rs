//! Styled terminal report for scan results.
//!
//! Renders an overview block, ranked folder and large-file tables, the
//! per-extension histogram and (optionally) duplicate groups. Paths are
//! shown relative to the scan root where possible, and each ranked row
//! carries a 20-cell usage bar.
//!
//! Styling uses `yansi` and honors the global enable/disable switch, so
//! `--no-color` and `NO_COLOR` turn every escape sequence off.
//!
//! # Example
//!
//! ```no_run
//! use dustat::output::TerminalReport;
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("."), &platform).unwrap();
//!
//! TerminalReport::new(&snapshot).with_top_n(20).print().unwrap();
//! ```

use std::io::{self, Write};
use std::path::Path;

use indicatif::HumanCount;
use yansi::Paint;

use crate::duplicates::DuplicateGroup;
use crate::output::{format_size, percent_of};
use crate::scanner::Snapshot;

/// Width of the `=`/`-` separator rules.
const RULE_WIDTH: usize = 70;

/// Number of cells in a usage bar.
const BAR_WIDTH: usize = 20;

/// Terminal report renderer.
pub struct TerminalReport<'a> {
    snapshot: &'a Snapshot,
    top_n: usize,
    duplicates: Option<&'a [DuplicateGroup]>,
}

impl<'a> TerminalReport<'a> {
    /// Create a report for a snapshot with the default top-10 tables.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            top_n: 10,
            duplicates: None,
        }
    }

    /// Set how many rows the folder and file tables show.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Append a duplicate-groups section to the report.
    ///
    /// Groups are rendered in the order given, so callers should rank them
    /// first (see [`crate::duplicates::rank_groups`]).
    #[must_use]
    pub fn with_duplicates(mut self, groups: &'a [DuplicateGroup]) -> Self {
        self.duplicates = Some(groups);
        self
    }

    /// Write the full report to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_title(writer, "Disk usage report")?;
        self.write_overview(writer)?;
        self.write_folders(writer)?;
        self.write_files(writer)?;
        self.write_types(writer)?;
        if let Some(groups) = self.duplicates {
            writeln!(writer)?;
            writeln!(writer, "{}", "Duplicate files:".bold())?;
            writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
            self.write_group_rows(writer, groups)?;
        }
        writeln!(writer)?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    /// Write a standalone duplicate listing to a writer.
    ///
    /// Used by the `duplicates` subcommand, which has no use for the size
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_duplicates_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_title(writer, "Duplicate files")?;
        writeln!(writer)?;
        self.write_group_rows(writer, self.duplicates.unwrap_or(&[]))?;
        writeln!(writer)?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    /// Write the full report to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle)
    }

    fn write_title<W: Write>(&self, writer: &mut W, heading: &str) -> io::Result<()> {
        let title = format!("{} - {}", heading, self.snapshot.root_path.display());
        writeln!(writer)?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(writer, "{}", title.bold())?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    fn write_overview<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "Overview:".bold())?;
        writeln!(writer, "  Total size: {}", format_size(self.snapshot.total_size))?;
        writeln!(writer, "  Files: {}", HumanCount(self.snapshot.file_count))?;
        writeln!(writer, "  Directories: {}", HumanCount(self.snapshot.dir_count))?;
        if self.snapshot.symlink_count > 0 {
            writeln!(writer, "  Symlinks: {}", HumanCount(self.snapshot.symlink_count))?;
        }
        Ok(())
    }

    fn write_folders<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let header = format!("Largest folders (top {}):", self.top_n);
        writeln!(writer)?;
        writeln!(writer, "{}", header.bold())?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        let total = self.snapshot.total_size;
        for (i, (path, size)) in self.snapshot.top_folders(self.top_n).into_iter().enumerate() {
            let rel = relative_to_root(path, &self.snapshot.root_path);
            let percent = percent_of(size, total);
            writeln!(
                writer,
                "  {:2}. {:50} {:>8} {:5.1}% {}",
                i + 1,
                rel,
                format_size(size),
                percent,
                usage_bar(percent)
            )?;
        }
        Ok(())
    }

    fn write_files<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let header = format!("Largest files (top {}):", self.top_n);
        writeln!(writer)?;
        writeln!(writer, "{}", header.bold())?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        let top_files = self.snapshot.top_files(self.top_n);
        if top_files.is_empty() {
            writeln!(writer, "  (no files larger than 100 MB)")?;
            return Ok(());
        }
        for (i, (path, size)) in top_files.into_iter().enumerate() {
            let rel = relative_to_root(path, &self.snapshot.root_path);
            writeln!(writer, "  {:2}. {:60} {:>8}", i + 1, rel, format_size(size))?;
        }
        Ok(())
    }

    fn write_types<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "File types (top 10):".bold())?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        let total = self.snapshot.total_size;
        for (i, (extension, size)) in self
            .snapshot
            .extensions_by_size()
            .into_iter()
            .take(10)
            .enumerate()
        {
            let percent = percent_of(size, total);
            writeln!(
                writer,
                "  {:2}. {:15} {:>8} {:5.1}% {}",
                i + 1,
                extension,
                format_size(size),
                percent,
                usage_bar(percent)
            )?;
        }
        Ok(())
    }

    fn write_group_rows<W: Write>(
        &self,
        writer: &mut W,
        groups: &[DuplicateGroup],
    ) -> io::Result<()> {
        if groups.is_empty() {
            writeln!(writer, "  (no duplicate files found)")?;
            return Ok(());
        }
        let wasted: u64 = groups.iter().map(DuplicateGroup::wasted_space).sum();
        let label = if groups.len() == 1 { "group" } else { "groups" };
        writeln!(
            writer,
            "  {} {}, {} reclaimable",
            groups.len(),
            label,
            format_size(wasted)
        )?;
        writeln!(writer)?;
        for (i, group) in groups.iter().enumerate() {
            writeln!(
                writer,
                "  {:2}. {} x {}  ({} wasted)  [{}]",
                i + 1,
                group.len(),
                format_size(group.size),
                format_size(group.wasted_space()),
                &group.hash_hex()[..8]
            )?;
            for member in &group.members {
                let rel = relative_to_root(member, &self.snapshot.root_path);
                writeln!(writer, "      {}", rel)?;
            }
        }
        Ok(())
    }
}

/// Render a 20-cell usage bar for a percentage.
fn usage_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64) as usize;
    let filled = filled.min(BAR_WIDTH);
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(BAR_WIDTH - filled));
    bar
}

/// Display a path relative to the scan root, `.` for the root itself.
fn relative_to_root(path: &Path, root: &Path) -> String {
    if path == root {
        return ".".to_string();
    }
    match path.strip_prefix(root) {
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
