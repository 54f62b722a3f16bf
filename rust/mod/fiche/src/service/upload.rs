use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use radfiche_blob::BlobStore;
use radfiche_core::ServiceError;

use crate::model::Image;

/// Content type recorded when the client sent none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One uploaded image file, as received in a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Object key for an upload: `{unixMillis}-{originalFilename}`.
pub fn storage_key(millis: i64, file_name: &str) -> String {
    format!("{}-{}", millis, file_name)
}

/// Upload every file concurrently and return the images in submission order.
///
/// The first failed upload fails the whole batch. Uploads still in flight are
/// aborted; objects already written stay in the bucket.
pub async fn upload_images(
    blob: &Arc<dyn BlobStore>,
    files: Vec<ImageUpload>,
) -> Result<Vec<Image>, ServiceError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let total = files.len();
    let mut set = JoinSet::new();
    for (idx, file) in files.into_iter().enumerate() {
        let blob = Arc::clone(blob);
        set.spawn(async move {
            let key = storage_key(chrono::Utc::now().timestamp_millis(), &file.file_name);
            let content_type = file
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            let result = blob.put(&key, file.data, &content_type).await;
            let image = result.map(|()| Image {
                url: blob.public_url(&key),
                caption: file.file_name,
            });
            (idx, image)
        });
    }

    let mut slots: Vec<Option<Image>> = vec![None; total];
    while let Some(joined) = set.join_next().await {
        let (idx, result) =
            joined.map_err(|e| ServiceError::Internal(format!("upload task failed: {}", e)))?;
        let image = result.map_err(|e| {
            warn!("image upload failed, aborting request: {}", e);
            ServiceError::Upload(e.to_string())
        })?;
        slots[idx] = Some(image);
    }

    info!("uploaded {} image(s)", total);
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use radfiche_blob::{BlobError, FileStore};

    use super::*;

    fn upload(name: &str, data: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            data: data.to_vec(),
        }
    }

    /// Accepts every key except those containing "bad".
    struct Picky;

    #[async_trait]
    impl BlobStore for Picky {
        async fn put(&self, key: &str, _data: Vec<u8>, _ct: &str) -> Result<(), BlobError> {
            if key.contains("bad") {
                Err(BlobError::Rejected { key: key.to_string(), status: 403 })
            } else {
                Ok(())
            }
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, BlobError> {
            Ok(None)
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://bucket.example/{}", key)
        }
    }

    #[test]
    fn key_is_timestamp_dash_filename() {
        assert_eq!(storage_key(1717171717171, "coupe axiale.png"), "1717171717171-coupe axiale.png");
    }

    #[tokio::test]
    async fn keeps_submission_order_and_captions() {
        let dir = tempfile::tempdir().unwrap();
        let blob: Arc<dyn BlobStore> =
            Arc::new(FileStore::open(dir.path(), "/uploads").unwrap());

        let files = vec![
            upload("a.png", b"a"),
            upload("b.png", b"bb"),
            upload("c.png", b"ccc"),
        ];
        let images = upload_images(&blob, files).await.unwrap();

        let captions: Vec<&str> = images.iter().map(|i| i.caption.as_str()).collect();
        assert_eq!(captions, vec!["a.png", "b.png", "c.png"]);
        for image in &images {
            assert!(image.url.starts_with("/uploads/"));
            assert!(image.url.ends_with(&format!("-{}", image.caption)));
            let key = image.url.trim_start_matches("/uploads/");
            assert!(blob.get(key).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn empty_batch_uploads_nothing() {
        let blob: Arc<dyn BlobStore> = Arc::new(Picky);
        assert!(upload_images(&blob, Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let blob: Arc<dyn BlobStore> = Arc::new(Picky);
        let files = vec![upload("ok.png", b"1"), upload("bad.png", b"2")];
        let err = upload_images(&blob, files).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upload(_)));
    }
}
