//! Error types shared across the crate

use std::io;
use std::path::PathBuf;

/// Errors raised by the store and its documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The content root is missing or not a directory
    #[error("{} does not exist or is not a directory: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// A filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Walking the content tree failed
    #[error("failed to walk content tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The metadata header could not be decoded
    #[error("failed to decode metadata: {0}")]
    Decode(String),

    /// The metadata could not be encoded
    #[error("failed to encode metadata: {0}")]
    Encode(String),

    /// A metadata key was looked up but is not present
    #[error("missing metadata key: {0}")]
    MissingKey(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is an I/O error of kind `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
