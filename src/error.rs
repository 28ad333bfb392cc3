//! Unified error types for planboard.
//!
//! The stage registry, progress calculator and transition rule never fail;
//! these errors belong to the collaborators around them.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project document invariant violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Project name must not be empty")]
    EmptyName,

    #[error("Status '{status}' is not a stage of development type '{development_type}'")]
    InvalidStatus {
        status: String,
        development_type: String,
    },

    #[error("Due date {due} is before start date {start}")]
    DatesOutOfOrder { start: NaiveDate, due: NaiveDate },
}

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found in {collection}: {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("Document already exists in {collection}: {id}")]
    AlreadyExists { collection: &'static str, id: String },

    #[error("Deleting from {0} requires a justification")]
    MissingJustification(&'static str),

    #[error("Invalid document: {0}")]
    Invalid(#[from] ProjectError),

    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Notification delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Project {0} has no recipient email")]
    NoRecipient(String),

    #[error("Failed to serialize notification: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write outbox: {0}")]
    Io(#[from] std::io::Error),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for notification delivery
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

/// Result type alias for exports
pub type ExportResult<T> = std::result::Result<T, ExportError>;
