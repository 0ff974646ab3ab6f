//! # Error Module
//!
//! Error types for the photo dumper.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - every error names the path it is about
//! - **Only configuration is fatal** - per-file failures are recovered by the pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// `HashError` and `CopyError` never reach this level: the pipeline turns
/// them into per-file outcomes.
#[derive(Error, Debug)]
pub enum DumperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid source or target root. Reported once, before any file is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path} is not a valid source directory.")]
    SourceNotDirectory { path: PathBuf },

    #[error("{path} is not a valid target directory.")]
    TargetNotDirectory { path: PathBuf },
}

/// Failure while computing a content digest
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {path} for hashing: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while copying a new photo into the target tree
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {source_path} to {target_path}: {source}")]
    Copy {
        source_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite {path}: the file appeared before the copy started")]
    TargetExists { path: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DumperError>;
