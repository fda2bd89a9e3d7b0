//! Collection store module
//!
//! Whole-collection persistence against a single JSON file. Every load reads
//! the full file; every save rewrites it. Nothing is cached between calls.

mod error;
mod record;

pub use error::StoreError;
pub use record::{position_of, Collection, UserRecord};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Whole-collection load/save contract.
///
/// There is no partial access: `load` returns every record and `save`
/// replaces every record.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn load(&self) -> Result<Collection, StoreError>;

    async fn save(&self, collection: &[UserRecord]) -> Result<(), StoreError>;

    /// Where the collection lives, for log messages
    fn location(&self) -> &Path;
}

/// Flat-file backing store for the user collection
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    /// Read and parse the whole collection.
    ///
    /// The file is read completely before parsing starts.
    async fn load(&self) -> Result<Collection, StoreError> {
        let data = fs::read(&self.path).await.map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_slice(&data).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file content with the serialized collection.
    ///
    /// A single truncating write; a failure part way through can leave the
    /// file truncated.
    async fn save(&self, collection: &[UserRecord]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(collection).map_err(StoreError::Encode)?;

        fs::write(&self.path, data)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
