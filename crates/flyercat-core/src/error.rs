//! Error types for the flyercat catalog pipeline.
//!
//! Errors are split by blast radius: [`CatalogError`] aborts a whole run,
//! while [`PipelineError`] describes a single file and is recovered by the
//! batch scheduler (logged, counted, skipped).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a catalog run.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input directory could not be listed
    #[error("Cannot list directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog or summary could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An output artifact could not be persisted
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file errors. None of these abort a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File is missing or cannot be opened
    #[error("Cannot open {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// Content is not a decodable image
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Inspection did not finish within the per-file deadline
    #[error("Inspection of {path} timed out after {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },
}

impl PipelineError {
    /// Path of the file this error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. }
            | Self::Decode { path, .. }
            | Self::FileTooLarge { path, .. }
            | Self::Timeout { path, .. } => path,
        }
    }
}

/// Convenience type alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Convenience type alias for per-file results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
