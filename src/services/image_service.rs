use base64::Engine;
use uuid::Uuid;

use crate::storage::ObjectStore;
use crate::utils::AppError;

const DEFAULT_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub content_type: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Decodes `data:<mime>;base64,<payload>`.
///
/// The mime type falls back to `image/png` when the header is not of that form.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, AppError> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| AppError::InvalidRequest("imageUrl must be a data URL string".to_string()))?;

    let content_type = match (header.strip_prefix("data:"), header.find(";base64")) {
        (Some(_), Some(end)) => header["data:".len()..end].to_string(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::InvalidRequest(format!("Invalid base64 image payload: {}", e)))?;

    let extension = if content_type.contains("jpeg") || content_type.contains("jpg") {
        "jpg"
    } else {
        "png"
    };

    Ok(DecodedImage {
        content_type,
        extension,
        bytes,
    })
}

/// Uploads a data-URL image and returns the blob URL.
pub async fn upload_data_url_image(
    store: &dyn ObjectStore,
    data_url: &str,
) -> Result<String, AppError> {
    let image = decode_data_url(data_url)?;
    let blob_name = format!("{}.{}", Uuid::new_v4().simple(), image.extension);

    log::info!("🖼️  Uploading {} ({} bytes)", blob_name, image.bytes.len());

    Ok(store
        .put(&blob_name, image.bytes, &image.content_type)
        .await?)
}

/// Resolves the `imageUrl` of a new recipe: data-URL images are uploaded, http(s) URLs are
/// kept, anything else is dropped.
pub async fn resolve_image_url(
    store: &dyn ObjectStore,
    image_url: Option<&str>,
) -> Result<String, AppError> {
    match image_url {
        Some(url) if url.starts_with("data:image/") => upload_data_url_image(store, url).await,
        Some(url) if url.starts_with("http") => Ok(url.to_string()),
        _ => Ok(String::new()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::{StoreError, StoreResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Object store keeping uploads in memory.
    #[derive(Default)]
    pub struct MemoryObjectStore {
        pub uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl ObjectStore for MemoryObjectStore {
        async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<String> {
            if self.fail {
                return Err(StoreError::Transient("blob service unavailable".to_string()));
            }
            self.uploads
                .lock()
                .unwrap()
                .push((name.to_string(), bytes, content_type.to_string()));
            Ok(format!("https://blobs.test/uploads/{}", name))
        }
    }

    #[test]
    fn test_decode_png_data_url() {
        let image = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes, b"hello");
    }

    #[test]
    fn test_decode_jpeg_gets_jpg_extension() {
        let image = decode_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.extension, "jpg");
    }

    #[test]
    fn test_decode_without_base64_marker_defaults_to_png() {
        let image = decode_data_url("data:image/gif,aGVsbG8=").unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.extension, "png");
    }

    #[test]
    fn test_decode_rejects_missing_comma_and_bad_payload() {
        assert!(matches!(
            decode_data_url("data:image/png;base64"),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_image_url_variants() {
        let store = MemoryObjectStore::default();

        let uploaded = resolve_image_url(&store, Some("data:image/jpeg;base64,aGVsbG8="))
            .await
            .unwrap();
        assert!(uploaded.starts_with("https://blobs.test/uploads/"));
        assert!(uploaded.ends_with(".jpg"));

        let kept = resolve_image_url(&store, Some("https://example.com/a.png")).await.unwrap();
        assert_eq!(kept, "https://example.com/a.png");

        assert_eq!(resolve_image_url(&store, Some("ftp://x")).await.unwrap(), "");
        assert_eq!(resolve_image_url(&store, None).await.unwrap(), "");

        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].1, b"hello");
        assert_eq!(uploads[0].2, "image/jpeg");
        // 32 hex chars + ".jpg"
        assert_eq!(uploads[0].0.len(), 36);
    }

    #[tokio::test]
    async fn test_upload_failure_is_store_error() {
        let store = MemoryObjectStore {
            fail: true,
            ..Default::default()
        };

        let result = resolve_image_url(&store, Some("data:image/png;base64,aGVsbG8=")).await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }
}
