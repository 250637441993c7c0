use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing index files.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bincode error for {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn codec(path: impl Into<PathBuf>, source: bincode::Error) -> Self {
        Self::Codec { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

/// Failures that abort a whole query. Partial rankings are never returned.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("posting list for {term:?} is unavailable: {source}")]
    Postings {
        term: String,
        #[source]
        source: IndexError,
    },

    #[error("query deadline exceeded")]
    DeadlineExceeded,
}
