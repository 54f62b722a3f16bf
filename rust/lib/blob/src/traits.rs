use async_trait::async_trait;

use crate::error::BlobError;

/// BlobStore holds uploaded binary objects (content images) and knows the
/// public URL each stored object is served from.
///
/// Keys are flat or path-like strings: `1717171717171-thorax.png`.
/// `FileStore` maps keys to a local directory; `SpacesStore` talks to an
/// S3-compatible bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob with public-read visibility. Overwrites if the key exists.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), BlobError>;

    /// Retrieve a blob. Returns None if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// URL under which a stored key is publicly readable.
    fn public_url(&self, key: &str) -> String;
}
