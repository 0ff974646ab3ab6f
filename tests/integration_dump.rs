//! Integration tests for the copy pipeline.
//!
//! These tests drive whole runs against temporary source and target trees:
//! - Counter invariants and per-directory summaries
//! - Idempotence of repeated runs
//! - Duplicate and conflict handling
//! - Hidden folder exclusion
//! - Dry run behaviour
//! - Error recovery

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::{at, exif_jpeg, plain_jpeg, set_mtime, snapshot, write};
use photo_dumper::core::hasher::{ContentDigest, ContentHasher, Sha256Hasher};
use photo_dumper::core::pipeline::{CopyPipeline, RunReport};
use photo_dumper::core::StatsSummary;
use photo_dumper::error::{ConfigError, DumperError, HashError};
use photo_dumper::events::{Event, EventChannel, FileEvent, FileOutcome};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const JUNE_FIRST: &str = "2023:06:01 10:00:00";
const JUNE_FIRST_NAME: &str = "2023/06/IMG_20230601_100000_00001000.JPG";

fn dump(source: &Path, target: &Path, dry_run: bool) -> RunReport {
    CopyPipeline::builder()
        .source(source)
        .target(target)
        .dry_run(dry_run)
        .build()
        .run()
        .unwrap()
}

fn dump_with_events(source: &Path, target: &Path, dry_run: bool) -> (RunReport, Vec<FileEvent>) {
    let (sender, receiver) = EventChannel::new();
    let report = CopyPipeline::builder()
        .source(source)
        .target(target)
        .dry_run(dry_run)
        .build()
        .run_with_events(&sender)
        .unwrap();

    let files = receiver
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            Event::File(f) => Some(f),
            _ => None,
        })
        .collect();
    (report, files)
}

fn assert_invariants(summary: &StatsSummary) {
    assert_eq!(
        summary.skipped,
        summary.duplicates + summary.conflicts + summary.unsupported + summary.errors
    );
    assert_eq!(summary.total, summary.copied + summary.skipped);
}

/// Counts digests so tests can prove a file was never hashed
struct CountingHasher {
    calls: Arc<AtomicUsize>,
}

impl ContentHasher for CountingHasher {
    fn digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Sha256Hasher.digest(path)
    }
}

struct BrokenHasher;

impl ContentHasher for BrokenHasher {
    fn digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        Err(HashError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "device went away"),
        })
    }
}

#[test]
fn exif_photo_is_copied_and_identical_copy_is_duplicate() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    let bytes = exif_jpeg(JUNE_FIRST, 1000, 0x42);
    source.child("a.jpg").write_binary(&bytes).unwrap();
    source.child("b.jpg").write_binary(&bytes).unwrap();
    set_mtime(source.child("b.jpg").path(), at(2023, 6, 1, 10, 0, 0));

    let (report, files) = dump_with_events(source.path(), target.path(), false);

    target.child(JUNE_FIRST_NAME).assert(predicate::path::is_file());
    assert_eq!(fs::read(target.child(JUNE_FIRST_NAME).path()).unwrap(), bytes);

    assert_eq!(report.totals.copied, 1);
    assert_eq!(report.totals.duplicates, 1);
    assert_eq!(files[0].outcome, FileOutcome::Copied);
    assert!(files[0].source.ends_with("a.jpg"));
    assert_eq!(files[1].outcome, FileOutcome::Duplicate);
    assert!(files[1].source.ends_with("b.jpg"));
    assert_eq!(files[1].target, Some(target.path().join(JUNE_FIRST_NAME)));
    assert_invariants(&report.totals);
}

#[test]
fn photo_without_exif_falls_back_to_modification_time() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    source.child("b.jpg").write_binary(&plain_jpeg(1000, 0x11)).unwrap();
    set_mtime(source.child("b.jpg").path(), at(2023, 6, 1, 10, 0, 0));

    let report = dump(source.path(), target.path(), false);

    assert_eq!(report.totals.copied, 1);
    target.child(JUNE_FIRST_NAME).assert(predicate::path::is_file());
}

#[test]
fn same_content_under_different_names_is_duplicate_not_conflict() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    let bytes = exif_jpeg("2022:08:15 18:30:00", 4096, 0x07);
    write(&source.path().join("phone/IMG_0001.JPG"), &bytes);
    write(&source.path().join("backup/copy of IMG_0001.jpeg"), &bytes);

    let report = dump(source.path(), target.path(), false);

    assert_eq!(report.totals.copied, 1);
    assert_eq!(report.totals.duplicates, 1);
    assert_eq!(report.totals.conflicts, 0);
    target
        .child("2022/08/IMG_20220815_183000_00004096.JPG")
        .assert(predicate::path::is_file());
}

#[test]
fn conflicting_content_never_overwrites_target() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    let original = exif_jpeg(JUNE_FIRST, 1000, 0xAA);
    write(&target.path().join(JUNE_FIRST_NAME), &original);
    source
        .child("c.jpg")
        .write_binary(&exif_jpeg(JUNE_FIRST, 1000, 0xBB))
        .unwrap();

    let (report, files) = dump_with_events(source.path(), target.path(), false);

    assert_eq!(report.totals.conflicts, 1);
    assert_eq!(report.totals.copied, 0);
    assert_eq!(files[0].outcome, FileOutcome::Conflict);
    assert_eq!(fs::read(target.child(JUNE_FIRST_NAME).path()).unwrap(), original);
    assert_eq!(fs::read_dir(target.path().join("2023/06")).unwrap().count(), 1);
    assert_invariants(&report.totals);
}

#[test]
fn unsupported_file_is_never_hashed() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    source.child("notes.txt").write_str("shopping list").unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let report = CopyPipeline::builder()
        .source(source.path())
        .target(target.path())
        .hasher(Box::new(CountingHasher {
            calls: Arc::clone(&calls),
        }))
        .build()
        .run()
        .unwrap();

    assert_eq!(report.totals.unsupported, 1);
    assert_eq!(report.totals.skipped, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(snapshot(target.path()).is_empty());
}

#[test]
fn second_run_copies_nothing_and_finds_every_duplicate() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    write(&source.path().join("a.jpg"), &exif_jpeg("2021:01:01 00:00:01", 500, 1));
    write(&source.path().join("x/b.JPG"), &exif_jpeg("2021:02:03 04:05:06", 600, 2));
    write(&source.path().join("x/y/c.jpeg"), &exif_jpeg("2020:12:31 23:59:59", 700, 3));
    write(&source.path().join("x/readme.txt"), b"not a photo");

    let first = dump(source.path(), target.path(), false);
    let after_first = snapshot(target.path());
    let second = dump(source.path(), target.path(), false);

    assert_eq!(first.totals.copied, 3);
    assert_eq!(second.totals.copied, 0);
    assert_eq!(second.totals.duplicates, first.totals.copied);
    assert_eq!(second.totals.unsupported, 1);
    assert_eq!(snapshot(target.path()), after_first);
    assert_invariants(&first.totals);
    assert_invariants(&second.totals);
}

#[test]
fn target_inside_source_is_not_walked() {
    let source = TempDir::new().unwrap();
    let library = source.child("library");
    library.create_dir_all().unwrap();
    source
        .child("a.jpg")
        .write_binary(&exif_jpeg(JUNE_FIRST, 1000, 0x42))
        .unwrap();

    let (first, files) = dump_with_events(source.path(), library.path(), false);
    let second = dump(source.path(), library.path(), false);

    library.child(JUNE_FIRST_NAME).assert(predicate::path::is_file());
    assert_eq!(first.totals.total, 1);
    assert_eq!(first.totals.copied, 1);
    assert_eq!(first.totals.duplicates, 0);
    assert!(files.iter().all(|f| !f.source.starts_with(library.path())));
    assert_eq!(second.totals.total, 1);
    assert_eq!(second.totals.duplicates, first.totals.copied);
    assert!(first
        .directories
        .iter()
        .all(|d| !d.path.starts_with(library.path())));
    assert_invariants(&first.totals);
    assert_invariants(&second.totals);
}

#[test]
fn hidden_directories_contribute_nothing() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    write(&source.path().join("visible.jpg"), &exif_jpeg(JUNE_FIRST, 1000, 1));
    write(&source.path().join(".thumbnails/a.jpg"), &exif_jpeg(JUNE_FIRST, 1100, 2));
    write(&source.path().join(".thumbnails/deep/b.jpg"), &exif_jpeg(JUNE_FIRST, 1200, 3));
    write(&source.path().join("album/.trash/c.jpg"), &exif_jpeg(JUNE_FIRST, 1300, 4));
    write(&source.path().join(".thumbnails/notes.txt"), b"hidden text");

    let (report, files) = dump_with_events(source.path(), target.path(), false);

    assert_eq!(report.totals.total, 1);
    assert_eq!(report.totals.copied, 1);
    assert_eq!(report.hidden_directories.len(), 2);
    assert!(files
        .iter()
        .all(|f| f.source == source.path().join("visible.jpg")));
    assert_eq!(snapshot(target.path()).len(), 1);
}

#[test]
fn dry_run_writes_nothing_and_matches_real_statistics() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    // new, duplicate-of-new, duplicate-of-existing, conflict, unsupported
    let fresh = exif_jpeg("2019:05:05 05:05:05", 2000, 9);
    write(&source.path().join("1_new.jpg"), &fresh);
    write(&source.path().join("2_same_as_new.jpg"), &fresh);
    let existing = exif_jpeg(JUNE_FIRST, 1000, 5);
    write(&target.path().join(JUNE_FIRST_NAME), &existing);
    write(&source.path().join("3_existing.jpg"), &existing);
    write(&source.path().join("4_clash.jpg"), &exif_jpeg(JUNE_FIRST, 1000, 6));
    write(&source.path().join("5_doc.pdf"), b"%PDF");

    let before = snapshot(target.path());
    let (dry, files) = dump_with_events(source.path(), target.path(), true);
    assert_eq!(snapshot(target.path()), before);
    target.child("2019").assert(predicate::path::missing());

    assert_eq!(files[0].reason, "dry run: would copy");
    assert_eq!(files[0].outcome, FileOutcome::Copied);

    let real = dump(source.path(), target.path(), false);
    assert_eq!(dry.totals, real.totals);
    assert_eq!(
        real.totals,
        StatsSummary {
            copied: 1,
            duplicates: 2,
            conflicts: 1,
            errors: 0,
            unsupported: 1,
            skipped: 4,
            total: 5,
        }
    );
}

#[test]
fn copy_failure_is_counted_and_run_continues() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    // a plain file where the year folder should go makes folder creation fail
    write(&target.path().join("2023"), b"in the way");
    write(&source.path().join("a.jpg"), &exif_jpeg(JUNE_FIRST, 1000, 1));
    write(&source.path().join("b.jpg"), &exif_jpeg("2024:03:03 03:03:03", 1000, 2));

    let (report, files) = dump_with_events(source.path(), target.path(), false);

    assert_eq!(report.totals.errors, 1);
    assert_eq!(report.totals.copied, 1);
    assert_eq!(report.totals.skipped, 1);
    assert_eq!(files[0].outcome, FileOutcome::Error);
    assert_eq!(files[1].outcome, FileOutcome::Copied);
    target
        .child("2024/03/IMG_20240303_030303_00001000.JPG")
        .assert(predicate::path::is_file());
    assert_invariants(&report.totals);
}

#[test]
fn unreadable_digest_is_a_conflict() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    let bytes = exif_jpeg(JUNE_FIRST, 1000, 1);
    write(&target.path().join(JUNE_FIRST_NAME), &bytes);
    write(&source.path().join("a.jpg"), &bytes);

    let report = CopyPipeline::builder()
        .source(source.path())
        .target(target.path())
        .hasher(Box::new(BrokenHasher))
        .build()
        .run()
        .unwrap();

    assert_eq!(report.totals.conflicts, 1);
    assert_eq!(report.totals.duplicates, 0);
    assert_eq!(fs::read(target.child(JUNE_FIRST_NAME).path()).unwrap(), bytes);
}

#[test]
fn missing_source_is_a_configuration_error() {
    let target = TempDir::new().unwrap();
    let result = CopyPipeline::builder()
        .source("/nonexistent/photos")
        .target(target.path())
        .build()
        .run();

    assert!(matches!(
        result,
        Err(DumperError::Config(ConfigError::SourceNotDirectory { .. }))
    ));
    assert!(snapshot(target.path()).is_empty());
}

#[test]
fn report_lists_each_directory_with_files() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();

    write(&source.path().join("2019/a.jpg"), &exif_jpeg("2019:01:01 01:01:01", 300, 1));
    write(&source.path().join("2020/b.jpg"), &exif_jpeg("2020:01:01 01:01:01", 300, 2));
    fs::create_dir_all(source.path().join("empty")).unwrap();

    let report = dump(source.path(), target.path(), false);

    let paths: Vec<_> = report.directories.iter().map(|d| d.path.clone()).collect();
    assert_eq!(
        paths,
        vec![source.path().join("2019"), source.path().join("2020")]
    );
    for directory in &report.directories {
        assert_eq!(directory.summary.copied, 1);
    }

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"copied\":2"));
}
