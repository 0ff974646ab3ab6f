//! # Core Module
//!
//! The UI-agnostic photo dumping engine.
//!
//! ## Modules
//! - `metadata` - Resolves when a photo was taken
//! - `hasher` - Computes content digests
//! - `naming` - Derives the dated target location
//! - `classifier` - New / duplicate / conflict decisions
//! - `stats` - Per-directory and per-run counters
//! - `scanner` - Walks the source tree
//! - `pipeline` - Orchestrates the full workflow
//! - `hidden` - Lists photos inside hidden folders

pub mod classifier;
pub mod hasher;
pub mod hidden;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod scanner;
pub mod stats;

// Re-export commonly used types
pub use classifier::{Classification, ConflictReason, UniquenessClassifier};
pub use hasher::{ContentDigest, ContentHasher, Sha256Hasher};
pub use naming::{NameResolver, TargetLocation};
pub use pipeline::{CopyPipeline, RunReport};
pub use scanner::PhotoFile;
pub use stats::{FileStats, StatsSummary};
