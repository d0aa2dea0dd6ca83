//! Error taxonomy for GNU Time log conversion
//!
//! Every variant is fatal for a single-shot run; the binary reports the
//! chain and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a GNU Time log into a Process record
#[derive(Error, Debug)]
pub enum GnuTimeError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required key missing from GNU Time log: {0:?}")]
    MissingKey(String),

    #[error("Exit status is not an integer: {0:?}")]
    InvalidExitStatus(String),

    #[error("Malformed elapsed wall clock time {value:?}: {reason}")]
    MalformedElapsed { value: String, reason: String },

    #[error("Not an ISO-8601 timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid namespace IRI {value:?}: {reason}")]
    InvalidNamespace { value: String, reason: String },

    #[error("Process field {0} is write-once and already set")]
    AlreadySet(&'static str),

    #[error("Cannot determine RDF output format for {0:?}; pass --output-format")]
    UnknownFormat(String),
}

impl GnuTimeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, GnuTimeError>;
