use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::BlobError;
use crate::sigv4::{self, CanonicalRequest, SigningParams};
use crate::traits::BlobStore;

/// Access key pair for the bucket.
#[derive(Clone)]
pub struct SpacesCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for SpacesCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpacesCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// SpacesStore is a BlobStore backed by an S3-compatible bucket
/// (DigitalOcean Spaces, MinIO, AWS S3) addressed path-style:
///   key "1717171717171-thorax.png" → `{endpoint}/{bucket}/1717171717171-thorax.png`
///
/// Objects are written with the `public-read` canned ACL, so the
/// unauthenticated URL returned by `public_url` serves them directly.
pub struct SpacesStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    credentials: SpacesCredentials,
    region: String,
}

impl SpacesStore {
    pub fn new(
        endpoint: &str,
        bucket: &str,
        credentials: SpacesCredentials,
        region: &str,
    ) -> Result<Self, BlobError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BlobError::Remote(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            credentials,
            region: region.to_string(),
        })
    }

    /// Encoded request path for a key: `/{bucket}/{key}`.
    fn object_path(&self, key: &str) -> String {
        sigv4::uri_encode_path(&format!("/{}/{}", self.bucket, key))
    }

    fn host(&self) -> Result<String, BlobError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| BlobError::Remote(format!("invalid endpoint {}: {}", self.endpoint, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| BlobError::Remote(format!("endpoint {} has no host", self.endpoint)))?;
        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Sign a request and return the full header set to send.
    fn signed_headers(
        &self,
        method: &str,
        path: &str,
        payload_sha256: &str,
        mut extra: Vec<(String, String)>,
    ) -> Result<HeaderMap, BlobError> {
        let params = SigningParams {
            access_key: &self.credentials.access_key,
            secret_key: &self.credentials.secret_key,
            region: &self.region,
            service: "s3",
            time: chrono::Utc::now(),
        };

        extra.push(("host".to_string(), self.host()?));
        extra.push(("x-amz-content-sha256".to_string(), payload_sha256.to_string()));
        extra.push(("x-amz-date".to_string(), params.amz_date()));

        let request = CanonicalRequest {
            method,
            path,
            query: "",
            headers: &extra,
            payload_sha256,
        };
        let authorization = sigv4::authorization(&request, &params)?;

        let mut headers = HeaderMap::new();
        for (name, value) in extra.iter().filter(|(name, _)| name != "host") {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| BlobError::Signing(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| BlobError::Signing(e.to_string()))?;
            headers.insert(name, value);
        }
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(|e| BlobError::Signing(e.to_string()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl BlobStore for SpacesStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), BlobError> {
        let path = self.object_path(key);
        let payload_sha256 = sigv4::sha256_hex(&data);
        let headers = self.signed_headers(
            "PUT",
            &path,
            &payload_sha256,
            vec![
                ("content-type".to_string(), content_type.to_string()),
                ("x-amz-acl".to_string(), "public-read".to_string()),
            ],
        )?;

        let size = data.len();
        let resp = self
            .http
            .put(format!("{}{}", self.endpoint, path))
            .headers(headers)
            .body(data)
            .send()
            .await
            .map_err(|e| BlobError::Remote(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("object storage rejected {}: {} {}", key, status, body);
            return Err(BlobError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }
        debug!("uploaded {} ({} bytes) to bucket {}", key, size, self.bucket);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.object_path(key);
        let headers = self.signed_headers("GET", &path, sigv4::EMPTY_PAYLOAD_SHA256, Vec::new())?;

        let resp = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .headers(headers)
            .send()
            .await
            .map_err(|e| BlobError::Remote(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BlobError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BlobError::Remote(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::put;
    use axum::Router;

    use super::*;

    #[derive(Default)]
    struct Bucket {
        objects: Mutex<HashMap<String, (Vec<u8>, HashMap<String, String>)>>,
    }

    async fn put_object(
        State(bucket): State<Arc<Bucket>>,
        Path((name, key)): Path<(String, String)>,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        if name == "locked" {
            return StatusCode::FORBIDDEN;
        }
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        bucket
            .objects
            .lock()
            .unwrap()
            .insert(key, (body.to_vec(), headers));
        StatusCode::OK
    }

    async fn get_object(
        State(bucket): State<Arc<Bucket>>,
        Path((_name, key)): Path<(String, String)>,
    ) -> Result<Vec<u8>, StatusCode> {
        bucket
            .objects
            .lock()
            .unwrap()
            .get(&key)
            .map(|(data, _)| data.clone())
            .ok_or(StatusCode::NOT_FOUND)
    }

    async fn serve() -> (String, Arc<Bucket>) {
        let bucket = Arc::new(Bucket::default());
        let app = Router::new()
            .route("/{bucket}/{key}", put(put_object).get(get_object))
            .with_state(bucket.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), bucket)
    }

    fn credentials() -> SpacesCredentials {
        SpacesCredentials {
            access_key: "AKID".into(),
            secret_key: "secret".into(),
        }
    }

    #[tokio::test]
    async fn put_sends_signed_public_read_object() {
        let (endpoint, bucket) = serve().await;
        let store = SpacesStore::new(&endpoint, "fiches", credentials(), "lon1").unwrap();

        store
            .put("1700000000000-coupe axiale.png", b"png-bytes".to_vec(), "image/png")
            .await
            .unwrap();

        let objects = bucket.objects.lock().unwrap();
        let (data, headers) = objects.get("1700000000000-coupe axiale.png").unwrap();
        assert_eq!(data, b"png-bytes");
        assert_eq!(headers["x-amz-acl"], "public-read");
        assert_eq!(headers["content-type"], "image/png");
        assert_eq!(headers["x-amz-content-sha256"], sigv4::sha256_hex(b"png-bytes"));
        let auth = &headers["authorization"];
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKID/"));
        assert!(auth.contains("/lon1/s3/aws4_request"));
        assert!(auth.contains(
            "SignedHeaders=content-type;host;x-amz-acl;x-amz-content-sha256;x-amz-date"
        ));
    }

    #[tokio::test]
    async fn get_roundtrips_and_reports_missing() {
        let (endpoint, _bucket) = serve().await;
        let store = SpacesStore::new(&endpoint, "fiches", credentials(), "lon1").unwrap();

        store.put("k.png", vec![9, 9], "image/png").await.unwrap();
        assert_eq!(store.get("k.png").await.unwrap(), Some(vec![9, 9]));
        assert_eq!(store.get("missing.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejected_upload_is_an_error() {
        let (endpoint, _bucket) = serve().await;
        let store = SpacesStore::new(&endpoint, "locked", credentials(), "lon1").unwrap();

        let err = store.put("k.png", vec![1], "image/png").await.unwrap_err();
        assert!(matches!(err, BlobError::Rejected { status: 403, .. }));
    }

    #[test]
    fn public_url_is_unencoded() {
        let store = SpacesStore::new(
            "https://lon1.digitaloceanspaces.com/",
            "fiches",
            credentials(),
            "lon1",
        )
        .unwrap();
        assert_eq!(
            store.public_url("1-coupe axiale.png"),
            "https://lon1.digitaloceanspaces.com/fiches/1-coupe axiale.png"
        );
    }
}
