//! Output formatters for scan results.
//!
//! This module renders a frozen [`Snapshot`](crate::scanner::Snapshot) (and
//! optionally duplicate groups) in different formats:
//! - Terminal report with ranked tables and usage bars
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dustat::output::json::JsonReport;
//! use dustat::platform::Platform;
//! use dustat::scanner;
//! use std::path::Path;
//!
//! let platform = Platform::detect();
//! let snapshot = scanner::scan(Path::new("."), &platform).unwrap();
//!
//! // Output as JSON to stdout
//! let report = JsonReport::new(&snapshot, 10);
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod report;

// Re-export main types
pub use csv::{CsvOutput, CsvReport};
pub use json::JsonReport;
pub use report::TerminalReport;

/// Format a byte count as a human-readable size string.
///
/// Divides by 1024 through `B`, `KB`, `MB`, `GB` and `TB`, keeping one
/// decimal place; anything larger is reported in `PB`.
///
/// # Example
///
/// ```
/// use dustat::output::format_size;
///
/// assert_eq!(format_size(0), "0.0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(100 * 1024 * 1024), "100.0 MB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} PB", value)
}

/// Percentage of `part` within `total`, rounded to one decimal place.
///
/// Returns `0.0` when `total` is zero so callers never divide by zero.
#[must_use]
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
