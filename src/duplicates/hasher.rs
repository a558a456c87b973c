//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 hashes
//! of file contents. Files are read through a fixed-size buffer, so memory
//! use stays flat no matter how large the file is.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::HashError;

/// A BLAKE3 content hash (32 bytes).
pub type Hash = [u8; 32];

/// Chunk size for streaming reads.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming BLAKE3 file hasher.
///
/// # Example
///
/// ```no_run
/// use dustat::duplicates::{hash_to_hex, Hasher};
/// use std::path::Path;
///
/// let hasher = Hasher::new();
/// let hash = hasher.hash_file(Path::new("/data/archive.zip"))?;
/// println!("{}", hash_to_hex(&hash));
/// # Ok::<(), dustat::duplicates::HashError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    buffer_size: usize,
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: HASH_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Hash the entire content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a classified [`HashError`] if the file cannot be opened or
    /// read.
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| classify(path, e))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = reader.read(&mut buffer).map_err(|e| classify(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a hash as a lowercase hex string.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Map an I/O error to a [`HashError`], keeping the path.
fn classify(path: &Path, error: std::io::Error) -> HashError {
    match error.kind() {
        std::io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
