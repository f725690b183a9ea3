//! Error types surfaced by resolution.

use std::io;
use std::path::PathBuf;

/// A discovered config file could not be read.
///
/// Never fatal: the file is treated as absent and the error is reported next
/// to the resolved properties.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {}: {source}", .path.display())]
pub struct ReadError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Reasons a resolution produced no result at all.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("target path must be absolute: {}", .0.display())]
    RelativePath(PathBuf),

    #[error("resolution was cancelled")]
    Cancelled,
}
