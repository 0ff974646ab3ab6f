//! # Pipeline Module
//!
//! Orchestrates one dump from a source tree into a target tree.
//!
//! ## Per-file stages
//! 1. **Filter** - Non-JPEG files are skipped as unsupported
//! 2. **Date** - Resolve when the photo was taken
//! 3. **Name** - Compute the dated target folder and file name
//! 4. **Classify** - New, duplicate or conflict against the target
//! 5. **Copy** - New photos only, never in a dry run
//!
//! Files are processed strictly one at a time, directory by directory, so
//! log order and progress are deterministic.

mod executor;

pub use executor::{CopyPipeline, DirectoryReport, DumpConfig, PipelineBuilder, RunReport};
