//! Event type definitions for decision logging and progress reporting.

use crate::core::stats::StatsSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the copy pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Run-level events
    Run(RunEvent),
    /// Per source directory events
    Directory(DirectoryEvent),
    /// One decision about one source file
    File(FileEvent),
    /// Progress inside the current directory
    Progress(DirectoryProgress),
}

/// Events that bracket a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The run has started
    Started {
        source: PathBuf,
        target: PathBuf,
        dry_run: bool,
    },
    /// The run finished; totals across all directories
    Completed { summary: StatsSummary },
}

/// Events about a source directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DirectoryEvent {
    /// Processing of a directory's files has started
    Started { path: PathBuf, total_files: usize },
    /// A hidden directory and its subtree were skipped
    SkippedHidden { path: PathBuf },
    /// All files of the directory were processed
    Completed { path: PathBuf, summary: StatsSummary },
}

/// What happened to a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    /// Copied to the target (or would have been, in a dry run)
    Copied,
    /// Same content already present at the target
    Duplicate,
    /// Different content already present at the target
    Conflict,
    /// Not a supported photo type
    Unsupported,
    /// An I/O failure prevented the copy
    Error,
}

impl std::fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOutcome::Copied => write!(f, "copied"),
            FileOutcome::Duplicate => write!(f, "duplicate"),
            FileOutcome::Conflict => write!(f, "conflict"),
            FileOutcome::Unsupported => write!(f, "unsupported"),
            FileOutcome::Error => write!(f, "error"),
        }
    }
}

/// A single per-file decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvent {
    /// Source file the decision is about
    pub source: PathBuf,
    /// The decision
    pub outcome: FileOutcome,
    /// Resolved target path, when one was computed
    pub target: Option<PathBuf>,
    /// Human readable reason
    pub reason: String,
}

/// Progress information inside one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryProgress {
    /// Directory being processed
    pub directory: PathBuf,
    /// Files processed so far in this directory
    pub processed: usize,
    /// Total files in this directory
    pub total: usize,
    /// Files skipped so far in this directory
    pub skipped: usize,
}
