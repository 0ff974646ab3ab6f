//! Pipeline execution implementation.

use crate::core::classifier::{Classification, UniquenessClassifier};
use crate::core::hasher::{ContentHasher, Sha256Hasher};
use crate::core::naming::{NameResolver, TargetLocation};
use crate::core::scanner::{PhotoFile, PhotoFilter, SourceDirectory, SourceWalker, WalkItem};
use crate::core::stats::{FileStats, StatsSummary};
use crate::error::{ConfigError, CopyError, DumperError};
use crate::events::{
    null_sender, DirectoryEvent, DirectoryProgress, Event, EventSink, FileEvent, FileOutcome,
    RunEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Counters of one processed source directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub path: PathBuf,
    pub summary: StatsSummary,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Counters summed over every directory
    pub totals: StatsSummary,
    /// Per-directory counters, in walk order
    pub directories: Vec<DirectoryReport>,
    /// Hidden directories that were skipped with their subtree
    pub hidden_directories: Vec<PathBuf>,
    /// Directories that could not be read (non-fatal)
    pub errors: Vec<String>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct DumpConfig {
    /// Root of the tree to read photos from
    pub source: PathBuf,
    /// Root of the date-structured tree to copy into
    pub target: PathBuf,
    /// Decide and report everything, write nothing
    pub dry_run: bool,
    /// Which files count as photos
    pub filter: PhotoFilter,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: DumpConfig,
    hasher: Option<Box<dyn ContentHasher>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: DumpConfig::default(),
            hasher: None,
        }
    }

    /// Set the source root
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    /// Set the target root
    pub fn target(mut self, target: impl Into<PathBuf>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Enable or disable dry run
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set the photo filter
    pub fn filter(mut self, filter: PhotoFilter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Set the content hasher
    pub fn hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> CopyPipeline {
        CopyPipeline {
            config: self.config,
            hasher: self.hasher.unwrap_or_else(|| Box::new(Sha256Hasher::new())),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorts one source tree into the target tree
pub struct CopyPipeline {
    config: DumpConfig,
    hasher: Box<dyn ContentHasher>,
}

/// Mutable state shared by all directories of one run
struct RunState<'a> {
    classifier: UniquenessClassifier<'a>,
    resolver: NameResolver,
    /// Dry run only: target path -> source file that would have been copied there
    planned: HashMap<PathBuf, PathBuf>,
}

impl CopyPipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<RunReport, DumperError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline, recording every decision into `events`
    pub fn run_with_events(&self, events: &dyn EventSink) -> Result<RunReport, DumperError> {
        self.validate()?;

        let start_time = Instant::now();
        let config = &self.config;

        info!(
            source = %config.source.display(),
            target = %config.target.display(),
            dry_run = config.dry_run,
            "starting photo dump"
        );
        if config.dry_run {
            warn!("Dry run is enabled. Nothing will be written to the target location.");
        }

        events.record(Event::Run(RunEvent::Started {
            source: config.source.clone(),
            target: config.target.clone(),
            dry_run: config.dry_run,
        }));

        let mut state = RunState {
            classifier: UniquenessClassifier::new(self.hasher.as_ref())
                .with_filter(config.filter.clone()),
            resolver: NameResolver::new(&config.target),
            planned: HashMap::new(),
        };

        let mut totals = FileStats::new();
        let mut directories = Vec::new();
        let mut hidden_directories = Vec::new();
        let mut errors = Vec::new();

        for item in SourceWalker::new(&config.source).excluding(&config.target) {
            match item {
                WalkItem::Excluded(path) => {
                    info!(path = %path.display(), "skipped (target folder)");
                }
                WalkItem::Hidden(path) => {
                    info!(path = %path.display(), "skipped (hidden folder)");
                    events.record(Event::Directory(DirectoryEvent::SkippedHidden {
                        path: path.clone(),
                    }));
                    hidden_directories.push(path);
                }
                WalkItem::Error { path, message } => {
                    warn!(path = %path.display(), error = %message, "cannot read directory");
                    errors.push(format!("{}: {}", path.display(), message));
                }
                WalkItem::Directory(directory) => {
                    if directory.files.is_empty() {
                        continue;
                    }
                    let stats = self.process_directory(&directory, &mut state, events);
                    totals.absorb(&stats);
                    directories.push(DirectoryReport {
                        path: directory.path,
                        summary: stats.summary(),
                    });
                }
            }
        }

        let summary = totals.summary();
        info!("Operation summary for {}:\n{}", config.source.display(), summary);
        events.record(Event::Run(RunEvent::Completed { summary }));

        Ok(RunReport {
            totals: summary,
            directories,
            hidden_directories,
            errors,
            dry_run: config.dry_run,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.config.source.is_dir() {
            return Err(ConfigError::SourceNotDirectory {
                path: self.config.source.clone(),
            });
        }
        if !self.config.target.is_dir() {
            return Err(ConfigError::TargetNotDirectory {
                path: self.config.target.clone(),
            });
        }
        Ok(())
    }

    fn process_directory(
        &self,
        directory: &SourceDirectory,
        state: &mut RunState<'_>,
        events: &dyn EventSink,
    ) -> FileStats {
        let total = directory.files.len();
        let mut stats = FileStats::new();

        events.record(Event::Directory(DirectoryEvent::Started {
            path: directory.path.clone(),
            total_files: total,
        }));

        for (i, path) in directory.files.iter().enumerate() {
            let event = self.process_file(path, state, &mut stats);
            events.record(Event::File(event));
            events.record(Event::Progress(DirectoryProgress {
                directory: directory.path.clone(),
                processed: i + 1,
                total,
                skipped: stats.skipped(),
            }));
        }

        let summary = stats.summary();
        info!("Operation summary for {}:\n{}", directory.path.display(), summary);
        events.record(Event::Directory(DirectoryEvent::Completed {
            path: directory.path.clone(),
            summary,
        }));

        stats
    }

    fn process_file(
        &self,
        path: &Path,
        state: &mut RunState<'_>,
        stats: &mut FileStats,
    ) -> FileEvent {
        if let Some(Classification::Unsupported) = state.classifier.screen(path) {
            return skip_unsupported(path, stats);
        }

        let photo = match PhotoFile::load(path) {
            Ok(photo) => photo,
            Err(e) => {
                stats.report_error();
                error!(source = %path.display(), error = %e, "cannot read file");
                return FileEvent {
                    source: path.to_path_buf(),
                    outcome: FileOutcome::Error,
                    target: None,
                    reason: format!("cannot read file: {}", e),
                };
            }
        };

        let location = state.resolver.resolve(photo.created, photo.size);
        let target = location.path();

        let earlier = if target.exists() {
            None
        } else {
            state.planned.get(&target)
        };
        let classification = match earlier {
            Some(earlier) => state
                .classifier
                .classify_against(&photo, Some(earlier.as_path())),
            None => state.classifier.classify(&photo, &location),
        };

        match classification {
            Classification::New => self.copy_new(&photo, &location, state, stats),
            Classification::Duplicate => {
                stats.report_duplicate();
                info!(source = %photo.path.display(), target = %target.display(), "skipped (duplicate)");
                FileEvent {
                    source: photo.path,
                    outcome: FileOutcome::Duplicate,
                    target: Some(target),
                    reason: "identical file already exists".to_string(),
                }
            }
            Classification::Conflict(reason) => {
                stats.report_conflict();
                warn!(
                    source = %photo.path.display(),
                    target = %target.display(),
                    "skipped ({})",
                    reason
                );
                FileEvent {
                    source: photo.path,
                    outcome: FileOutcome::Conflict,
                    target: Some(target),
                    reason: reason.to_string(),
                }
            }
            Classification::Unsupported => skip_unsupported(path, stats),
        }
    }

    fn copy_new(
        &self,
        photo: &PhotoFile,
        location: &TargetLocation,
        state: &mut RunState<'_>,
        stats: &mut FileStats,
    ) -> FileEvent {
        let target = location.path();

        if self.config.dry_run {
            stats.report_copied();
            info!(source = %photo.path.display(), target = %target.display(), "would be copied (dry run)");
            state.planned.insert(target.clone(), photo.path.clone());
            return FileEvent {
                source: photo.path.clone(),
                outcome: FileOutcome::Copied,
                target: Some(target),
                reason: "dry run: would copy".to_string(),
            };
        }

        match copy_file(&photo.path, location) {
            Ok(()) => {
                stats.report_copied();
                info!(source = %photo.path.display(), target = %target.display(), "copied");
                FileEvent {
                    source: photo.path.clone(),
                    outcome: FileOutcome::Copied,
                    target: Some(target),
                    reason: "copied".to_string(),
                }
            }
            Err(e) => {
                stats.report_error();
                error!(source = %photo.path.display(), error = %e, "copy failed");
                FileEvent {
                    source: photo.path.clone(),
                    outcome: FileOutcome::Error,
                    target: Some(target),
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn skip_unsupported(path: &Path, stats: &mut FileStats) -> FileEvent {
    stats.report_unsupported();
    info!(source = %path.display(), "skipped (unsupported file type)");
    FileEvent {
        source: path.to_path_buf(),
        outcome: FileOutcome::Unsupported,
        target: None,
        reason: "unsupported file type".to_string(),
    }
}

/// Copy `source` to `location` byte for byte.
///
/// The target is opened with create-new semantics, so an existing file is
/// never replaced. A partially written target is removed.
fn copy_file(source: &Path, location: &TargetLocation) -> Result<(), CopyError> {
    fs::create_dir_all(&location.folder).map_err(|e| CopyError::CreateFolder {
        path: location.folder.clone(),
        source: e,
    })?;

    let target = location.path();
    let copy_error = |e: io::Error| CopyError::Copy {
        source_path: source.to_path_buf(),
        target_path: target.clone(),
        source: e,
    };

    let input = File::open(source).map_err(copy_error)?;
    let output = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(CopyError::TargetExists {
                path: location.path(),
            });
        }
        Err(e) => return Err(copy_error(e)),
    };

    fill_new_file(input, output, &target).map_err(copy_error)
}

/// Stream `input` into the freshly created `output` at `target`.
///
/// On failure the partial file is removed.
fn fill_new_file(mut input: impl Read, mut output: File, target: &Path) -> io::Result<()> {
    if let Err(e) = io::copy(&mut input, &mut output).and_then(|_| output.sync_all()) {
        drop(output);
        if let Err(remove_error) = fs::remove_file(target) {
            warn!(target = %target.display(), error = %remove_error, "cannot remove partial copy");
        }
        return Err(e);
    }
    Ok(())
}
