//! # Metadata Module
//!
//! Resolves the moment a photo was taken.
//!
//! The EXIF `DateTimeOriginal` tag wins when it is present and well formed
//! (`YYYY:MM:DD HH:MM:SS`). Anything else (no EXIF container, no tag, a
//! garbled value, an unreadable file) falls back to the filesystem
//! modification time, converted to local time. Nothing in here fails.

use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

/// EXIF date/time layout
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Canonical creation time of a photo file
pub fn resolve_creation_time(path: &Path) -> NaiveDateTime {
    if let Some(taken) = read_date_taken(path) {
        return taken;
    }

    tracing::debug!(path = %path.display(), "no usable DateTimeOriginal, using modification time");
    modified_time(path)
}

/// Read `DateTimeOriginal` from the file's EXIF container
pub fn read_date_taken(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = Reader::new().read_from_container(&mut bufreader).ok()?;

    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref vec) => {
            let bytes = vec.first()?;
            let s = std::str::from_utf8(bytes).ok()?;
            parse_exif_datetime(s)
        }
        _ => None,
    }
}

/// Parse an EXIF ASCII date/time value
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT).ok()
}

/// Filesystem modification time as local wall-clock time.
///
/// Falls back to the Unix epoch if even the filesystem has no answer.
fn modified_time(path: &Path) -> NaiveDateTime {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    DateTime::<Local>::from(modified).naive_local()
}
