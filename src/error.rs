//! Error types for the scan engine.
//!
//! Per-file failures (stat, open, read, classify) are never propagated as
//! `Result::Err` — they are folded into [`crate::model::ScanResult`] and
//! emitted as [`crate::model::ScanEvent::Error`] so that one bad file never
//! aborts a scan. [`ScanError`] covers the handful of failures that *do*
//! abort a scan outright: an unreadable root, or user-requested cancellation.

use crate::model::ScanResult;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors that can terminate [`crate::scanner::Scanner::scan`] outright.
///
/// Every other failure mode (a single file that can't be read, a directory
/// entry that can't be stat'd) is non-fatal and surfaces through
/// [`crate::model::ScanEvent::Error`] instead.
#[derive(Debug)]
pub enum ScanError {
    /// The scan root does not exist.
    RootNotFound { path: PathBuf },
    /// The scan root exists but is not a directory.
    NotADirectory { path: PathBuf },
    /// The scan was cancelled before completion.
    ///
    /// Callers can `matches!(result, Err(ScanError::Cancelled { .. }))` to
    /// tell a cancelled scan apart from a genuine failure. The partial
    /// result — findings emitted before cancellation — is preserved.
    Cancelled { partial: Arc<ScanResult> },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "scan root not found: {}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "scan root is not a directory: {}", path.display())
            }
            Self::Cancelled { .. } => write!(f, "scan was cancelled"),
        }
    }
}

impl std::error::Error for ScanError {}

/// Error returned by a [`crate::extract::TextExtractor`] implementation.
#[derive(Debug)]
pub struct ExtractError {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to extract text from '{}': {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for ExtractError {}
