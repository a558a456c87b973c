//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner while the tree is walked and a
//! progress bar while duplicate candidates are hashed.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for the scan and hash phases.
///
/// Implement this trait to receive progress updates while a subtree is
/// walked and while candidate files are hashed.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (`"scan"` or `"hash"`)
    /// * `total` - Total number of items to process, `0` when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each batch of processed items.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    ///
    /// This can be used to track byte-based throughput.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
///
/// Manages one bar per pipeline phase: a spinner for the scan (whose total
/// is unknown up front) and a bounded bar for hashing.
pub struct Progress {
    multi: MultiProgress,
    scan: Mutex<Option<ProgressBar>>,
    hash: Mutex<Option<ProgressBar>>,
    prefix: Mutex<String>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dustat::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            scan: Mutex::new(None),
            hash: Mutex::new(None),
            prefix: Mutex::new(String::new()),
            quiet,
        }
    }

    /// Create a style for the scan phase (spinner).
    fn scan_style(&self) -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Create a style for the hash phase (progress bar).
    fn hash_style(&self) -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "scan" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(self.scan_style());
                pb.set_message("Scanning");
                pb.enable_steady_tick(Duration::from_millis(100));
                let mut scan = self.scan.lock().unwrap();
                *scan = Some(pb);
            }
            "hash" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(self.hash_style());
                pb.set_message("Hashing candidates");
                let mut hash = self.hash.lock().unwrap();
                *hash = Some(pb);
            }
            _ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(self.hash_style());
                pb.set_message(phase.to_string());
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let prefix = self.prefix.lock().unwrap();
        let display_msg = if prefix.is_empty() {
            truncate_path(path, 30)
        } else {
            format!("{}: {}", *prefix, truncate_path(path, 30))
        };

        if let Some(ref pb) = *self.hash.lock().unwrap() {
            pb.set_position(current as u64);
            pb.set_message(display_msg);
        } else if let Some(ref pb) = *self.scan.lock().unwrap() {
            pb.set_position(current as u64);
            pb.set_message(display_msg);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            "scan" => {
                if let Some(pb) = self.scan.lock().unwrap().take() {
                    pb.finish_with_message("Scan complete");
                }
            }
            "hash" => {
                if let Some(pb) = self.hash.lock().unwrap().take() {
                    pb.finish_with_message("Hashing complete");
                }
            }
            _ => {}
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        *self.prefix.lock().unwrap() = message.to_string();

        if let Some(ref pb) = *self.hash.lock().unwrap() {
            pb.set_message(message.to_string());
        } else if let Some(ref pb) = *self.scan.lock().unwrap() {
            pb.set_message(message.to_string());
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let path_buf = std::path::Path::new(path);
    let file_name = path_buf
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        let mut start = file_name.len() - max_len + 3;
        while !file_name.is_char_boundary(start) {
            start += 1;
        }
        return format!("...{}", &file_name[start..]);
    }

    format!(".../{}", file_name)
}
