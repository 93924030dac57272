//! Construction and persistence errors.
//!
//! The tick loop itself never fails; everything here happens while building a
//! machine or moving its state in and out of bytes.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{rom} ROM must be {expected} bytes, got {actual}")]
    RomSize {
        rom: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snapshot magic {found:?} does not match {expected:?}")]
    SnapshotMagic { found: String, expected: &'static str },

    #[error("snapshot version {found} is not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("invalid machine configuration: {0}")]
    Config(#[source] serde_json::Error),
}
