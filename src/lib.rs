//! # Photo Dumper
//!
//! Copies photos from a messy source tree into a tidy, date-structured
//! target tree.
//!
//! ## Core Philosophy
//! - **Never overwrite** - a clashing file is reported, not replaced
//! - **Content decides** - duplicates are detected by SHA-256, not by name or size
//! - **Dry run is honest** - same decisions and counters, zero writes
//!
//! ## Architecture
//! - `core` - The dumping engine
//! - `events` - Structured per-file decisions and progress
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DumperError, Result};

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Without a log file
/// output goes to stderr. The level defaults to `debug` and can be overridden
/// with `RUST_LOG`.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Err(e) = installed {
        tracing::warn!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}
