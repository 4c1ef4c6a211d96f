//! Error types for catalogue loading.
//!
//! Only fetching and configuration can fail. Normalization, classification,
//! filtering and the URL codec degrade to defaults instead of erroring.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating and reading a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// A candidate location could not be read.
    #[error("failed to read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A candidate location was read but did not contain valid JSON.
    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// A source answered with a non-success status.
    #[error("HTTP {status} for {location}")]
    Status { location: String, status: u16 },

    /// The candidate list was empty.
    #[error("no catalogue locations configured")]
    NoCandidates,

    /// The explorer configuration file is unusable.
    #[error("invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// A JSON Schema used for diagnostics failed to compile.
    #[error("schema compilation error: {reason}")]
    Schema { reason: String },
}

impl CatalogueError {
    /// Location the error refers to, when there is one.
    pub fn location(&self) -> Option<&str> {
        match self {
            CatalogueError::Read { location, .. }
            | CatalogueError::Parse { location, .. }
            | CatalogueError::Status { location, .. } => Some(location),
            _ => None,
        }
    }
}
