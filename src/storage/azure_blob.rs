use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};

use super::ObjectStore;
use crate::database::{StoreError, StoreResult};

const BLOB_TYPE_HEADER: &str = "x-ms-blob-type";
const API_VERSION_HEADER: &str = "x-ms-version";
const API_VERSION: &str = "2021-08-06";

/// Azure Blob Storage container reached through its REST API.
///
/// `container_url` is the container endpoint, optionally followed by a SAS query string
/// (`https://account.blob.core.windows.net/uploads?sv=...&sig=...`). The SAS is sent with
/// every request but never appears in returned blob URLs.
#[derive(Clone)]
pub struct AzureBlobStore {
    client: reqwest::Client,
    base_url: String,
    sas: Option<String>,
}

impl AzureBlobStore {
    pub fn new(container_url: &str) -> Self {
        let (base_url, sas) = split_sas(container_url);
        Self {
            client: reqwest::Client::new(),
            base_url,
            sas,
        }
    }

    /// Public URL of a blob (no credentials)
    pub fn blob_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    fn signed(&self, url: String, extra_query: Option<&str>) -> String {
        let query: Vec<&str> = extra_query
            .into_iter()
            .chain(self.sas.as_deref())
            .collect();

        if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, query.join("&"))
        }
    }

    /// Creates the container if it does not exist yet. Best-effort: the container usually
    /// exists already and a SAS scoped to blobs cannot create it anyway.
    pub async fn ensure_container(&self) {
        let url = self.signed(self.base_url.clone(), Some("restype=container"));

        match self
            .client
            .put(url)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                log::info!("   ✅ Blob container created: {}", self.base_url)
            }
            Ok(response) => log::debug!(
                "   ℹ️  Blob container not created ({}), assuming it exists",
                response.status()
            ),
            Err(e) => log::warn!("   ⚠️  Blob container check failed: {}", e),
        }
    }
}

fn split_sas(container_url: &str) -> (String, Option<String>) {
    match container_url.split_once('?') {
        Some((base, sas)) if !sas.is_empty() => {
            (base.trim_end_matches('/').to_string(), Some(sas.to_string()))
        }
        Some((base, _)) => (base.trim_end_matches('/').to_string(), None),
        None => (container_url.trim_end_matches('/').to_string(), None),
    }
}

#[async_trait]
impl ObjectStore for AzureBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<String> {
        let blob_url = self.blob_url(name);
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| StoreError::Transient(format!("Invalid content type: {}", e)))?;

        let response = self
            .client
            .put(self.signed(blob_url.clone(), None))
            .header(BLOB_TYPE_HEADER, "BlockBlob")
            .header(API_VERSION_HEADER, API_VERSION)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Transient(format!("Blob upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(StoreError::Transient(format!(
                "Blob upload failed with status {}",
                response.status()
            )));
        }

        Ok(blob_url)
    }
}
