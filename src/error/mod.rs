//! # Error Module
//!
//! Error types for the fingerprinting pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Degrade per file** - a bad image yields empty hashes, not an aborted run
//! - **Fail fast per folder** - an unlistable folder stops the whole run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum FingerprinterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while enumerating a folder.
///
/// These are fatal for the run: without the folder's contents there is
/// nothing partial worth salvaging.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    #[error("Not a folder: {path}")]
    NotAFolder { path: PathBuf },

    #[error("Failed to read folder {path}: {source}")]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while hashing a single image.
///
/// These are isolated per file and per algorithm: the affected entry in the
/// result set becomes an empty string and the batch continues.
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Precondition violations in the statistics kit.
///
/// Reported to the caller, never silently coerced into a wrong answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Sequence must not be empty")]
    EmptyInput,

    #[error("Sequence lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("At least {required} samples required, got {actual}")]
    TooFewSamples { required: usize, actual: usize },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, FingerprinterError>;
