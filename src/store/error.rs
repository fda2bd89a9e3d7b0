// Store error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a whole-collection load or save
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file missing or unreadable
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Backing file content is not a JSON array of objects
    #[error("failed to parse {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize collection: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backing file unwritable
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
