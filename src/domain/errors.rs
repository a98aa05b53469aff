//! Domain error types
//!
//! This module defines the error hierarchy for the export job.
//! Errors carry rendered messages and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main export error type
///
/// This is the primary error type used throughout the crate. Inside the job
/// these errors are caught per process or per phase and end up in the log,
/// the notifier and the [`ExportSummary`](crate::core::export::ExportSummary).
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The process has no directory registered for the requested image folder
    #[error("Process '{process}' has no image folder '{variant}' configured")]
    ImageFolderNotConfigured { process: String, variant: String },

    /// Storage errors with the path that failed
    #[error("Storage error at {}: {message}", path.display())]
    Storage { path: PathBuf, message: String },

    /// Archive (zip) errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// The predecessor job could not be awaited
    #[error("Interrupted while waiting for predecessor: {0}")]
    Interrupted(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ExportError {
    /// Creates a storage error for `path` from any displayable cause
    pub fn storage(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        ExportError::Storage {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<walkdir::Error> for ExportError {
    fn from(err: walkdir::Error) -> Self {
        match err.path() {
            Some(path) => ExportError::storage(path, &err),
            None => ExportError::Io(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Archive(err.to_string())
    }
}
