//! # Naming Module
//!
//! Derives where a photo goes in the target tree.
//!
//! Layout: `{target_root}/{YYYY}/{MM}/IMG_{YYYYMMDD}_{HHMMSS}_{size:08}.JPG`.
//!
//! Sizes of 10^8 bytes or more simply print with more than eight digits;
//! names stay unique, they just lose the fixed width.

use chrono::{Datelike, NaiveDateTime};
use std::path::PathBuf;

/// File name prefix of every dumped photo
pub const PREFIX: &str = "IMG";

/// File extension of every dumped photo
pub const EXTENSION: &str = "JPG";

/// Folder and file name a photo resolves to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetLocation {
    /// `{target_root}/{YYYY}/{MM}`
    pub folder: PathBuf,
    /// `IMG_{YYYYMMDD}_{HHMMSS}_{size:08}.JPG`
    pub file_name: String,
}

impl TargetLocation {
    /// Full target path
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

/// Resolves target locations under one target root
#[derive(Debug, Clone)]
pub struct NameResolver {
    target_root: PathBuf,
}

impl NameResolver {
    pub fn new(target_root: impl Into<PathBuf>) -> Self {
        Self {
            target_root: target_root.into(),
        }
    }

    /// Target location for a photo taken at `timestamp` with `size` bytes
    pub fn resolve(&self, timestamp: NaiveDateTime, size: u64) -> TargetLocation {
        let folder = self
            .target_root
            .join(format!("{:04}", timestamp.year()))
            .join(format!("{:02}", timestamp.month()));

        TargetLocation {
            folder,
            file_name: file_name(timestamp, size),
        }
    }
}

fn file_name(timestamp: NaiveDateTime, size: u64) -> String {
    format!(
        "{}_{}_{}_{:08}.{}",
        PREFIX,
        timestamp.format("%Y%m%d"),
        timestamp.format("%H%M%S"),
        size,
        EXTENSION
    )
}
