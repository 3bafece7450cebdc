use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a ranking pass as a whole.
#[derive(Debug, Error)]
pub enum RankError {
    #[error("`{field}` is required and must not be empty")]
    Validation { field: &'static str },
    #[error("candidate store unavailable")]
    UpstreamUnavailable(#[from] StoreError),
    #[error("ranking pass was cancelled")]
    Cancelled,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RankError {
    /// HTTP-style status a caller can surface for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RankError::Validation { .. } => 400,
            RankError::UpstreamUnavailable(_) => 503,
            RankError::Cancelled => 499,
            RankError::InvalidConfig(_) => 500,
        }
    }
}

/// Failure of a single candidate comparison. The pass skips the
/// candidate and continues.
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("both paragraph sequences are empty")]
    EmptyInput,
    #[error("failed to start comparison worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("comparison worker i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("comparison worker exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("comparison worker timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed comparison result: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid corpus: {0}")]
    Corpus(String),
}
