//! Error types for notebook reading, fixing and merging

use std::path::PathBuf;
use thiserror::Error;

/// Error type for notebook operations
#[derive(Error, Debug)]
pub enum NotebookError {
    /// I/O error when reading or writing a notebook file
    #[error("Failed to access notebook file {}: {source}", .path.display())]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Notebook text is not valid JSON or does not match the notebook structure
    #[error("Failed to parse notebook {}: {source}", .path.display())]
    Parse {
        /// File the text came from (empty for in-memory input)
        path: PathBuf,
        /// Underlying JSON error, carrying line and column
        #[source]
        source: serde_json::Error,
    },

    /// Notebook version not supported
    #[error("Unsupported notebook version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version number
        major: u32,
        /// Minor version number
        minor: u32,
    },

    /// Serializing the in-memory notebook failed
    #[error("Failed to serialize notebook: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl NotebookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for malformed or non-conforming notebook content
    #[inline]
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::UnsupportedVersion { .. })
    }
}

/// Result type alias for notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;
