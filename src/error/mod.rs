//! # Error Module
//!
//! Error types for the duplicate resolution engine.
//!
//! ## Severity
//! - Decode and per-file relocation errors are reported and the run continues
//! - Failing to create the quarantine directory aborts the run
//! - Undo errors are reported per file; undo carries on with the rest

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Relocation error: {0}")]
    Relocate(#[from] RelocateError),

    #[error("Undo error: {0}")]
    Undo(#[from] UndoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Errors that occur while enumerating candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding or fingerprinting an image
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Unsupported image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while moving a resolved pair into quarantine
#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Could not create quarantine directory {path}: {source}")]
    QuarantineUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy kept file {from} to {to}: {source}")]
    CopyKeeper {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move discarded file {from} to {to}: {source}")]
    MoveDiscarded {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot copy non-regular file: {path}")]
    NotARegularFile { path: PathBuf },

    #[error("Quarantine entry already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Path has no file name: {path}")]
    MissingFileName { path: PathBuf },
}

impl RelocateError {
    /// Whether no further relocations are possible in this run
    pub fn is_fatal(&self) -> bool {
        matches!(self, RelocateError::QuarantineUnavailable { .. })
    }
}

/// Errors that occur while restoring a quarantine
#[derive(Error, Debug)]
pub enum UndoError {
    #[error("Quarantine directory not found: {path}")]
    QuarantineMissing { path: PathBuf },

    #[error("Failed to read quarantine directory {path}: {source}")]
    ReadQuarantine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove kept copy {path}: {source}")]
    RemoveKept {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restore {from} to {to}: {source}")]
    Restore {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite existing file {path}")]
    RestoreTargetExists { path: PathBuf },

    #[error("Not a quarantine entry, left in place: {path}")]
    UnrecognizedEntry { path: PathBuf },

    #[error("Could not remove quarantine directory {path}: {source}")]
    RemoveQuarantine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;
