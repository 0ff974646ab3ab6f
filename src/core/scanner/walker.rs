//! Lazy directory walking using walkdir.

use super::filter::is_hidden_dir;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A non-hidden source directory and the regular files directly inside it
#[derive(Debug, Clone)]
pub struct SourceDirectory {
    pub path: PathBuf,
    /// Sorted by file name
    pub files: Vec<PathBuf>,
}

/// One step of a source walk
#[derive(Debug)]
pub enum WalkItem {
    /// A directory whose files should be processed
    Directory(SourceDirectory),
    /// A hidden directory; its whole subtree was skipped
    Hidden(PathBuf),
    /// The excluded directory (the target tree); its whole subtree was skipped
    Excluded(PathBuf),
    /// Something could not be read; the walk continues
    Error { path: PathBuf, message: String },
}

/// Iterator over the directories of a source tree.
///
/// Every regular file under a non-hidden directory shows up exactly once.
/// Symbolic links are not followed. The root itself is never treated as
/// hidden. A directory that cannot be read is reported once and not
/// descended into.
pub struct SourceWalker {
    root: PathBuf,
    inner: walkdir::IntoIter,
    excluded: Option<PathBuf>,
}

impl SourceWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            inner: WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter(),
            excluded: None,
        }
    }

    /// Skip `dir` and its subtree if it lies strictly inside the root.
    ///
    /// Both paths are canonicalized, so `dir` may be spelled differently
    /// from the root. Paths that do not exist exclude nothing.
    pub fn excluding(mut self, dir: &Path) -> Self {
        self.excluded = nested_under(&self.root, dir);
        self
    }

    fn list_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl Iterator for SourceWalker {
    type Item = WalkItem;

    fn next(&mut self) -> Option<WalkItem> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    return Some(WalkItem::Error {
                        path,
                        message: e.to_string(),
                    });
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if entry.depth() > 0 && is_hidden_dir(entry.path()) {
                self.inner.skip_current_dir();
                return Some(WalkItem::Hidden(entry.into_path()));
            }

            if self.excluded.as_deref() == Some(entry.path()) {
                self.inner.skip_current_dir();
                return Some(WalkItem::Excluded(entry.into_path()));
            }

            let path = entry.into_path();
            return Some(match Self::list_files(&path) {
                Ok(files) => WalkItem::Directory(SourceDirectory { path, files }),
                Err(e) => {
                    // walkdir would fail on the same directory again
                    self.inner.skip_current_dir();
                    WalkItem::Error {
                        message: e.to_string(),
                        path,
                    }
                }
            });
        }
    }
}

/// `dir` spelled relative to `root`, if it is a strict descendant of it
fn nested_under(root: &Path, dir: &Path) -> Option<PathBuf> {
    let real_root = fs::canonicalize(root).ok()?;
    let real_dir = fs::canonicalize(dir).ok()?;
    let relative = real_dir.strip_prefix(&real_root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(relative))
}
