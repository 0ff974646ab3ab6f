//! # Scanner Module
//!
//! Walks the source tree and describes the photos found in it.
//!
//! ## Rules
//! - Only `.jpg` / `.jpeg` files (any case) are photos
//! - A directory whose name starts with `.` is skipped with its whole subtree
//! - Every other regular file is visited exactly once
//!
//! ## Example
//! ```rust,ignore
//! use photo_dumper::core::scanner::{SourceWalker, WalkItem};
//!
//! for item in SourceWalker::new(Path::new("/Users/me/Pictures")) {
//!     if let WalkItem::Directory(dir) = item {
//!         println!("{}: {} files", dir.path.display(), dir.files.len());
//!     }
//! }
//! ```

mod filter;
mod walker;

pub use filter::{is_hidden_dir, PhotoFilter, HIDDEN_MARKER};
pub use walker::{SourceDirectory, SourceWalker, WalkItem};

use crate::core::hasher::{ContentDigest, ContentHasher};
use crate::core::metadata::resolve_creation_time;
use crate::error::HashError;
use chrono::NaiveDateTime;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

/// A supported source photo, described once per run
#[derive(Debug, Clone)]
pub struct PhotoFile {
    /// Path to the photo file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// When the photo was taken (EXIF, or modification time)
    pub created: NaiveDateTime,
    digest: OnceCell<ContentDigest>,
}

impl PhotoFile {
    /// Stat the file and resolve its creation time
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let size = fs::metadata(path)?.len();
        Ok(Self::new(path.to_path_buf(), size, resolve_creation_time(path)))
    }

    pub fn new(path: PathBuf, size: u64, created: NaiveDateTime) -> Self {
        Self {
            path,
            size,
            created,
            digest: OnceCell::new(),
        }
    }

    /// Content digest, computed on first use and remembered afterwards.
    ///
    /// Failures are not remembered.
    pub fn digest(&self, hasher: &dyn ContentHasher) -> Result<ContentDigest, HashError> {
        if let Some(digest) = self.digest.get() {
            return Ok(*digest);
        }
        let digest = hasher.digest(&self.path)?;
        Ok(*self.digest.get_or_init(|| digest))
    }
}
