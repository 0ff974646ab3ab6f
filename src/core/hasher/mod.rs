//! # Hasher Module
//!
//! Content digests used to tell true duplicates from name collisions.
//!
//! A digest is a pure function of the file bytes: SHA-256 over the whole
//! file, read once in fixed-size chunks.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// A 256-bit content fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes content digests of files.
///
/// Implement this trait to plug in another digest (e.g. for testing).
pub trait ContentHasher: Send + Sync {
    /// Digest the full content of `path`
    fn digest(&self, path: &Path) -> Result<ContentDigest, HashError>;
}

/// SHA-256 over the file's bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Sha256Hasher {
    fn digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let io_error = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let count = file.read(&mut buffer).map_err(io_error)?;
            if count == 0 {
                break;
            }
            hasher.update(&buffer[..count]);
        }

        Ok(ContentDigest(hasher.finalize().into()))
    }
}
