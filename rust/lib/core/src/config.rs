use std::path::PathBuf;

use thiserror::Error;

/// Default multipart body limit for content uploads (25 MiB).
pub const DEFAULT_UPLOAD_LIMIT: usize = 25 * 1024 * 1024;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5002;

/// Default region for the object storage signer.
pub const DEFAULT_SPACES_REGION: &str = "lon1";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("incomplete object storage settings, missing {0}")]
    IncompleteSpaces(String),
}

/// Credentials and location of the S3-compatible bucket holding images.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacesConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Process configuration, read once at startup and passed to the components
/// that need it. Never mutated after `main` hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub listen: String,

    /// Directory holding the SQLite file and, without object storage, the
    /// uploaded images.
    pub data_dir: PathBuf,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/radfiche.sqlite` if not specified.
    pub db_path: Option<PathBuf>,

    /// Built web client to serve, with `index.html` as the fallback page.
    pub static_dir: Option<PathBuf>,

    /// Object storage. `None` selects the local file store.
    pub spaces: Option<SpacesConfig>,

    /// Maximum accepted multipart body, in bytes.
    pub upload_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: format!("0.0.0.0:{}", DEFAULT_PORT),
            data_dir: PathBuf::from("data"),
            db_path: None,
            static_dir: None,
            spaces: None,
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Recognised variables: `PORT`, `LISTEN`, `DATA_DIR`, `DATABASE_PATH`,
    /// `STATIC_DIR`, `UPLOAD_LIMIT_BYTES`, `SPACES_ENDPOINT`, `SPACES_BUCKET`,
    /// `SPACES_KEY`, `SPACES_SECRET`, `SPACES_REGION`. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(port) = get("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
            })?;
            config.listen = format!("0.0.0.0:{}", port);
        }
        if let Some(listen) = get("LISTEN") {
            config.listen = listen;
        }
        if let Some(dir) = get("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.db_path = get("DATABASE_PATH").map(PathBuf::from);
        config.static_dir = get("STATIC_DIR").map(PathBuf::from);
        if let Some(limit) = get("UPLOAD_LIMIT_BYTES") {
            config.upload_limit = limit.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "UPLOAD_LIMIT_BYTES",
                value: limit.clone(),
            })?;
        }

        let endpoint = get("SPACES_ENDPOINT");
        let bucket = get("SPACES_BUCKET");
        let access_key = get("SPACES_KEY");
        let secret_key = get("SPACES_SECRET");
        config.spaces = match (endpoint, bucket, access_key, secret_key) {
            (None, None, None, None) => None,
            (Some(endpoint), Some(bucket), Some(access_key), Some(secret_key)) => {
                Some(SpacesConfig {
                    endpoint: endpoint.trim_end_matches('/').to_string(),
                    bucket,
                    access_key,
                    secret_key,
                    region: get("SPACES_REGION")
                        .unwrap_or_else(|| DEFAULT_SPACES_REGION.to_string()),
                })
            }
            (endpoint, bucket, access_key, secret_key) => {
                let missing: Vec<&str> = [
                    ("SPACES_ENDPOINT", endpoint.is_none()),
                    ("SPACES_BUCKET", bucket.is_none()),
                    ("SPACES_KEY", access_key.is_none()),
                    ("SPACES_SECRET", secret_key.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();
                return Err(ConfigError::IncompleteSpaces(missing.join(", ")));
            }
        };

        Ok(config)
    }

    /// Resolve the SQLite database path, falling back to `{data_dir}/radfiche.sqlite`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("radfiche.sqlite"))
    }

    /// Resolve the local blob directory used when no object storage is configured.
    pub fn resolve_blob_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
