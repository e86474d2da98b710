pub mod azure_blob;

pub use azure_blob::AzureBlobStore;

use async_trait::async_trait;

use crate::database::StoreResult;

/// Blob storage for uploaded images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `name` and returns a URL the object can be fetched from.
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<String>;
}
