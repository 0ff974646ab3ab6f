//! File and directory filtering rules.

use std::collections::HashSet;
use std::path::Path;

/// Marker that makes a directory hidden when it starts its name
pub const HIDDEN_MARKER: char = '.';

/// Decides which files are photos we dump and which directories we skip
#[derive(Debug, Clone)]
pub struct PhotoFilter {
    /// Lowercase file extensions to accept
    extensions: HashSet<String>,
}

impl PhotoFilter {
    /// Create a filter accepting `.jpg` and `.jpeg` in any case
    pub fn new() -> Self {
        Self {
            extensions: ["jpg", "jpeg"].iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Check if a file is a supported photo
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for PhotoFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the last segment of `path` marks a hidden directory
pub fn is_hidden_dir(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with(HIDDEN_MARKER))
        .unwrap_or(false)
}
