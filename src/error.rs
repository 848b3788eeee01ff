use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PulseError>;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Input file '{}' not found", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input file '{}' is malformed: {reason}", path.display())]
    ConfigMalformed { path: PathBuf, reason: String },
    #[error("Failed to write '{}'", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure of a single page request. Only `RateLimited` is recovered from;
/// every other variant ends the fetch for that repository.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("rate limited until {reset}")]
    RateLimited { reset: i64 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode commit page: {0}")]
    Decode(#[from] serde_json::Error),
}
