//! CSV output formatter for scan results.
//!
//! Provides machine-readable CSV output for spreadsheets and data analysis.
//! Three report kinds are available, one row per entry:
//!
//! # Columns
//!
//! - [`CsvReport::Directories`]: `path`, `size_bytes`, `size_human`,
//!   `percent` (immediate size, ranked descending)
//! - [`CsvReport::Extensions`]: `extension`, `size_bytes`, `size_human`,
//!   `percent` (ranked descending)
//! - [`CsvReport::LargeFiles`]: `path`, `size_bytes`, `size_human` (files
//!   over the large-file threshold, ranked descending)
//!
//! `percent` is the share of the scan's total size with one decimal place,
//! `0.0` when the total is zero.
//!
//! # Example
//!
//! ```no_run
//! use dustat::output::csv::{CsvOutput, CsvReport};
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("."), &platform).unwrap();
//!
//! let output = CsvOutput::new(&snapshot, CsvReport::Directories);
//! output.write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::output::{format_size, percent_of};
use crate::scanner::Snapshot;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Which CSV report to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvReport {
    /// One row per visited directory, immediate sizes, descending.
    Directories,
    /// One row per extension label, descending.
    Extensions,
    /// One row per file over the large-file threshold, descending.
    LargeFiles,
}

/// A directory row in the CSV output.
#[derive(Debug, Serialize)]
struct DirectoryRow {
    /// Directory path
    path: String,
    /// Immediate size in bytes
    size_bytes: u64,
    /// Immediate size as a human-readable string
    size_human: String,
    /// Share of the total size
    percent: f64,
}

/// An extension row in the CSV output.
#[derive(Debug, Serialize)]
struct ExtensionRow {
    /// Lower-cased extension label
    extension: String,
    /// Accumulated size in bytes
    size_bytes: u64,
    /// Accumulated size as a human-readable string
    size_human: String,
    /// Share of the total size
    percent: f64,
}

/// A large-file row in the CSV output.
#[derive(Debug, Serialize)]
struct LargeFileRow {
    /// File path
    path: String,
    /// File size in bytes
    size_bytes: u64,
    /// File size as a human-readable string
    size_human: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    snapshot: &'a Snapshot,
    report: CsvReport,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter for one report kind.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, report: CsvReport) -> Self {
        Self { snapshot, report }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        match self.report {
            CsvReport::Directories => self.write_directories(&mut csv_writer)?,
            CsvReport::Extensions => self.write_extensions(&mut csv_writer)?,
            CsvReport::LargeFiles => self.write_large_files(&mut csv_writer)?,
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }

    fn write_directories<W: io::Write>(
        &self,
        csv_writer: &mut csv::Writer<W>,
    ) -> Result<(), CsvOutputError> {
        let total = self.snapshot.total_size;
        for (path, size) in self.snapshot.top_folders(self.snapshot.folder_sizes.len()) {
            csv_writer.serialize(DirectoryRow {
                path: path.to_string_lossy().to_string(),
                size_bytes: size,
                size_human: format_size(size),
                percent: percent_of(size, total),
            })?;
        }
        Ok(())
    }

    fn write_extensions<W: io::Write>(
        &self,
        csv_writer: &mut csv::Writer<W>,
    ) -> Result<(), CsvOutputError> {
        let total = self.snapshot.total_size;
        for (extension, size) in self.snapshot.extensions_by_size() {
            csv_writer.serialize(ExtensionRow {
                extension: extension.to_string(),
                size_bytes: size,
                size_human: format_size(size),
                percent: percent_of(size, total),
            })?;
        }
        Ok(())
    }

    fn write_large_files<W: io::Write>(
        &self,
        csv_writer: &mut csv::Writer<W>,
    ) -> Result<(), CsvOutputError> {
        for (path, size) in self.snapshot.top_files(self.snapshot.large_files.len()) {
            csv_writer.serialize(LargeFileRow {
                path: path.to_string_lossy().to_string(),
                size_bytes: size,
                size_human: format_size(size),
            })?;
        }
        Ok(())
    }
}
