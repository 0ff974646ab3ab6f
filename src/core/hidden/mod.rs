//! # Hidden Module
//!
//! Finds photos that live inside hidden folders of a photo library.
//!
//! Such folders (thumbnail caches, `.trash`, sync leftovers) are skipped by
//! the dump, so this listing shows what a dump would never pick up. It only
//! reports; nothing is moved or deleted.

use crate::core::scanner::{is_hidden_dir, PhotoFilter};
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every supported photo below `root` with a hidden folder on its path.
///
/// Sorted by path. The root itself never counts as hidden.
pub fn find_hidden_photos(root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::SourceNotDirectory {
            path: root.to_path_buf(),
        });
    }

    let filter = PhotoFilter::new();
    let mut photos = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() || !filter.is_supported(entry.path()) {
            continue;
        }

        let inside_hidden = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(Path::parent)
            .map(|relative| {
                relative
                    .ancestors()
                    .any(|dir| !dir.as_os_str().is_empty() && is_hidden_dir(dir))
            })
            .unwrap_or(false);

        if inside_hidden {
            tracing::debug!(path = %entry.path().display(), "photo in hidden folder");
            photos.push(entry.into_path());
        }
    }

    Ok(photos)
}
