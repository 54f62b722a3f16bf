use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::BlobError;
use crate::traits::BlobStore;

/// FileStore is a BlobStore implementation backed by the local filesystem.
///
/// Keys are mapped to paths under `base_dir`:
///   key "1717171717171-thorax.png" → `{base_dir}/1717171717171-thorax.png`
///
/// Public URLs are `{public_base}/{key}`; the server mounts `base_dir` at that
/// prefix. Parent directories are created automatically on `put`.
pub struct FileStore {
    base_dir: PathBuf,
    public_base: String,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path, public_base: &str) -> Result<Self, BlobError> {
        std::fs::create_dir_all(base_dir).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a key to a filesystem path. Rejects keys that escape base_dir.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.starts_with('/') || key.starts_with('\\') {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        }

        let path = self.base_dir.join(key);

        let canonical_base = self
            .base_dir
            .canonicalize()
            .map_err(|e| BlobError::Io(e.to_string()))?;

        // For non-existent paths, check the parent.
        let check_path = if path.exists() {
            path.canonicalize()
                .map_err(|e| BlobError::Io(e.to_string()))?
        } else if let Some(parent) = path.parent() {
            if parent.exists() {
                let canonical_parent = parent
                    .canonicalize()
                    .map_err(|e| BlobError::Io(e.to_string()))?;
                canonical_parent.join(path.file_name().unwrap_or_default())
            } else {
                // Parent is created on put; only a component check is possible.
                if key.split(['/', '\\']).any(|c| c == "..") {
                    return Err(BlobError::InvalidKey(format!(
                        "path traversal in {:?}",
                        key
                    )));
                }
                return Ok(path);
            }
        } else {
            return Err(BlobError::InvalidKey(format!("{:?}", key)));
        };

        if !check_path.starts_with(&canonical_base) {
            return Err(BlobError::InvalidKey(format!(
                "path traversal in {:?}",
                key
            )));
        }

        Ok(path)
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Io(e.to_string()))?;
        }
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))?;
        debug!("stored blob {} ({} bytes)", key, data.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Some(data))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (FileStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("uploads"), "/uploads/").unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn put_then_get() {
        let (store, _dir) = store();
        store.put("1-coupe.png", b"png".to_vec(), "image/png").await.unwrap();
        assert_eq!(store.get("1-coupe.png").await.unwrap(), Some(b"png".to_vec()));
        assert!(store.base_dir().join("1-coupe.png").is_file());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let (store, _dir) = store();
        assert_eq!(store.get("nope.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_creates_parent_dirs() {
        let (store, _dir) = store();
        store.put("thorax/1-face.jpg", vec![1, 2, 3], "image/jpeg").await.unwrap();
        assert_eq!(store.get("thorax/1-face.jpg").await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn rejects_traversal_and_absolute_keys() {
        let (store, _dir) = store();
        assert!(store.put("../escape.png", vec![], "image/png").await.is_err());
        assert!(store.put("a/../../escape.png", vec![], "image/png").await.is_err());
        assert!(store.put("/etc/passwd", vec![], "text/plain").await.is_err());
        assert!(store.put("", vec![], "text/plain").await.is_err());
    }

    #[test]
    fn public_url_joins_base_and_key() {
        let (store, _dir) = store();
        assert_eq!(store.public_url("1-a b.png"), "/uploads/1-a b.png");
    }
}
