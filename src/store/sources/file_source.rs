//! Generic async file-based route source with SHA256 change detection.
//!
//! [`FileSource`] implements [`RouteSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the file asynchronously via Tokio and computes a SHA256 hash of the raw
//! content for version tracking. Validation happens when the route table
//! is built, not here.

use std::path::PathBuf;

use async_trait::async_trait;

use super::sha256_hex;
use crate::error::SignpostError;
use crate::store::model::RouteSet;
use crate::store::{RouteSource, SnapshotVersion};

type Deserialize = fn(&str) -> Result<RouteSet, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserialize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserialize) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, SignpostError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SignpostError::RouteFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                SignpostError::Io(e)
            }
        })
    }
}

#[async_trait]
impl RouteSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<(RouteSet, SnapshotVersion), SignpostError> {
        let content = self.read_content().await?;

        let set = (self.deserialize)(&content).map_err(|e| SignpostError::SnapshotParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let hash = sha256_hex(content.as_bytes());
        Ok((set, SnapshotVersion::Hash(hash)))
    }

    async fn has_changed(&self, current: &SnapshotVersion) -> Result<bool, SignpostError> {
        let content = self.read_content().await?;
        let hash = sha256_hex(content.as_bytes());
        Ok(*current != SnapshotVersion::Hash(hash))
    }
}
