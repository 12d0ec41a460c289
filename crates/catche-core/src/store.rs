use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Source of the files to import
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket the store reads from
    fn bucket(&self) -> &str;

    /// Write the object stored under `key` to `destination`, returning its size
    /// in bytes. Every failure is reported as [`crate::Error::Download`].
    async fn download(&self, key: &str, destination: &Path) -> Result<u64>;
}
