//! Exit codes and error classification.

use crate::duplicates::DetectorError;
use crate::scanner::ScanError;

/// Exit codes for the dustat application.
///
/// - 0: Success (scan completed normally)
/// - 1: General error (root missing, export failure, unexpected error)
/// - 130: Interrupted by user (Ctrl+C, 128 + SIGINT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the requested operation completed normally.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Interrupted: the operation was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DU000",
            Self::GeneralError => "DU001",
            Self::Interrupted => "DU130",
        }
    }

    /// Classify an application error into an exit code.
    ///
    /// Interruption errors from the scanner or the duplicate detector map
    /// to [`ExitCode::Interrupted`]; everything else is a general error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if matches!(err.downcast_ref::<ScanError>(), Some(ScanError::Interrupted))
            || matches!(
                err.downcast_ref::<DetectorError>(),
                Some(DetectorError::Interrupted)
            )
        {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}
