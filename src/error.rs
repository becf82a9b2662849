//! Error types for the walk and for size-threshold parsing.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A filesystem error met while walking one entry. Never fatal: the walk
/// reports it and carries on with whatever it already collected.
#[derive(Debug, Error)]
pub enum WalkError {
    /// `lstat` on an entry (or the root) failed.
    #[error("error while getting information about {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The directory could not be opened for listing.
    #[error("unable to open {}: {source}", path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Listing started but a later read failed.
    #[error("error while reading {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Path of the entry the error is about.
    pub fn path(&self) -> &Path {
        match self {
            WalkError::Metadata { path, .. }
            | WalkError::OpenDir { path, .. }
            | WalkError::ReadDir { path, .. } => path,
        }
    }
}

/// Rejection from [`crate::size::parse_size`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSizeError {
    #[error("empty size")]
    Empty,
    #[error("\"{0}\" is not a valid number")]
    Invalid(String),
    #[error("\"{0}\" is too large")]
    Overflow(String),
}
