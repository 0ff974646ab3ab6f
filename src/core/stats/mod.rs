//! # Stats Module
//!
//! Counters collected while dumping photos.
//!
//! Every processed file ends up either copied or skipped. Skipped files are
//! further split by reason, so `skipped` always equals
//! `duplicates + conflicts + unsupported + errors` and `total` equals
//! `copied + skipped`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable per-directory (or per-run) counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStats {
    copied: usize,
    skipped: usize,
    duplicates: usize,
    conflicts: usize,
    unsupported: usize,
    errors: usize,
}

impl FileStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file was copied (or would have been, in a dry run)
    pub fn report_copied(&mut self) {
        self.copied += 1;
    }

    /// Same content already at the target
    pub fn report_duplicate(&mut self) {
        self.duplicates += 1;
        self.skipped += 1;
    }

    /// Same name, different content at the target
    pub fn report_conflict(&mut self) {
        self.conflicts += 1;
        self.skipped += 1;
    }

    /// Not a supported photo type
    pub fn report_unsupported(&mut self) {
        self.unsupported += 1;
        self.skipped += 1;
    }

    /// The copy failed with an I/O error
    pub fn report_error(&mut self) {
        self.errors += 1;
        self.skipped += 1;
    }

    pub fn copied(&self) -> usize {
        self.copied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    pub fn unsupported(&self) -> usize {
        self.unsupported
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn total(&self) -> usize {
        self.copied + self.skipped
    }

    /// Fold another set of counters into this one
    pub fn absorb(&mut self, other: &FileStats) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.duplicates += other.duplicates;
        self.conflicts += other.conflicts;
        self.unsupported += other.unsupported;
        self.errors += other.errors;
    }

    /// Snapshot of the counters
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            copied: self.copied,
            duplicates: self.duplicates,
            conflicts: self.conflicts,
            errors: self.errors,
            unsupported: self.unsupported,
            skipped: self.skipped,
            total: self.total(),
        }
    }
}

/// Read-only view of [`FileStats`], safe to ship in events and reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub copied: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub errors: usize,
    pub unsupported: usize,
    pub skipped: usize,
    pub total: usize,
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "COPIED: {}", self.copied)?;
        writeln!(f, "DUPLICATES: {}", self.duplicates)?;
        writeln!(f, "CONFLICTS: {}", self.conflicts)?;
        writeln!(f, "ERRORS: {}", self.errors)?;
        writeln!(f, "UNSUPPORTED: {}", self.unsupported)?;
        writeln!(f, "SKIPPED: {}", self.skipped)?;
        write!(f, "TOTAL: {}", self.total)
    }
}
