//! # Classifier Module
//!
//! Decides whether a photo is new, already present, or clashing with a
//! different file at its target location.
//!
//! Files that are not supported photos are classified `Unsupported` from
//! their name alone, before anything is read.
//!
//! Name equality is never enough: whenever something already sits at the
//! target path both files are digested. If either digest cannot be computed
//! the photo is treated as a conflict so nothing gets overwritten.

use crate::core::hasher::ContentHasher;
use crate::core::naming::TargetLocation;
use crate::core::scanner::{PhotoFile, PhotoFilter};
use std::fmt;
use std::path::Path;

/// Outcome of classifying one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Nothing exists at the target location
    New,
    /// The target holds identical content
    Duplicate,
    /// The target holds something we must not replace
    Conflict(ConflictReason),
    /// Not a supported photo type
    Unsupported,
}

/// Why a photo was classified as a conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// Same name, different content
    ContentDiffers,
    /// One of the two files could not be digested
    Unverifiable(String),
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::ContentDiffers => {
                write!(f, "a file with this name but different content already exists")
            }
            ConflictReason::Unverifiable(message) => {
                write!(f, "could not compare with the existing file: {}", message)
            }
        }
    }
}

/// Compares source photos with whatever sits at their target location
pub struct UniquenessClassifier<'a> {
    hasher: &'a dyn ContentHasher,
    filter: PhotoFilter,
}

impl<'a> UniquenessClassifier<'a> {
    pub fn new(hasher: &'a dyn ContentHasher) -> Self {
        Self {
            hasher,
            filter: PhotoFilter::default(),
        }
    }

    /// Use `filter` to decide which files are photos
    pub fn with_filter(mut self, filter: PhotoFilter) -> Self {
        self.filter = filter;
        self
    }

    /// `Some(Unsupported)` if `path` is not a supported photo.
    ///
    /// Needs nothing but the file name.
    pub fn screen(&self, path: &Path) -> Option<Classification> {
        if self.filter.is_supported(path) {
            None
        } else {
            Some(Classification::Unsupported)
        }
    }

    /// Classify `photo` against the file on disk at `location`
    pub fn classify(&self, photo: &PhotoFile, location: &TargetLocation) -> Classification {
        let target = location.path();
        if target.exists() {
            self.classify_against(photo, Some(&target))
        } else {
            self.classify_against(photo, None)
        }
    }

    /// Classify `photo` against an explicit existing file, if any
    pub fn classify_against(&self, photo: &PhotoFile, existing: Option<&Path>) -> Classification {
        if let Some(screened) = self.screen(&photo.path) {
            return screened;
        }

        let Some(existing) = existing else {
            return Classification::New;
        };

        let existing_digest = match self.hasher.digest(existing) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(source = %photo.path.display(), error = %e, "cannot digest existing file");
                return Classification::Conflict(ConflictReason::Unverifiable(e.to_string()));
            }
        };

        let source_digest = match photo.digest(self.hasher) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(source = %photo.path.display(), error = %e, "cannot digest source file");
                return Classification::Conflict(ConflictReason::Unverifiable(e.to_string()));
            }
        };

        if existing_digest == source_digest {
            Classification::Duplicate
        } else {
            Classification::Conflict(ConflictReason::ContentDiffers)
        }
    }
}
