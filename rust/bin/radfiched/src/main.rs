//! `radfiched`: the radiology fiche server.
//!
//! Usage:
//!   radfiched [--listen <addr>] [--data-dir <dir>] [--static-dir <dir>]
//!
//! Everything else comes from the environment (`PORT`, `DATABASE_PATH`,
//! `SPACES_*`, `UPLOAD_LIMIT_BYTES`, ...). Flags win over the environment.

mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use radfiche_blob::{BlobStore, FileStore, SpacesCredentials, SpacesStore};
use radfiche_core::{AppConfig, Module};
use radfiche_sql::{SQLStore, SqliteStore};
use tracing::info;

/// Radiology fiche server.
#[derive(Parser, Debug)]
#[command(name = "radfiched", about = "Radiology fiche server")]
struct Cli {
    /// Listen address (overrides LISTEN and PORT).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Data directory (overrides DATA_DIR).
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Built web client to serve (overrides STATIC_DIR).
    #[arg(long = "static-dir")]
    static_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = Some(dir);
        }
    }
}

/// Path prefix under which the local file store is served.
const UPLOADS_PREFIX: &str = "/uploads";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    cli.apply(&mut config);

    std::fs::create_dir_all(&config.data_dir)?;

    let db_path = config.resolve_db_path();
    info!("Opening database {}", db_path.display());
    let sql: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Object storage: the bucket when configured, a local directory otherwise.
    let (blob, uploads_dir): (Arc<dyn BlobStore>, Option<PathBuf>) = match &config.spaces {
        Some(spaces) => {
            info!("Storing images in bucket {} at {}", spaces.bucket, spaces.endpoint);
            let store = SpacesStore::new(
                &spaces.endpoint,
                &spaces.bucket,
                SpacesCredentials {
                    access_key: spaces.access_key.clone(),
                    secret_key: spaces.secret_key.clone(),
                },
                &spaces.region,
            )
            .map_err(|e| anyhow::anyhow!("failed to create object storage client: {}", e))?;
            (Arc::new(store), None)
        }
        None => {
            let dir = config.resolve_blob_dir();
            info!("Storing images in {}", dir.display());
            let store = FileStore::open(&dir, UPLOADS_PREFIX)
                .map_err(|e| anyhow::anyhow!("failed to open blob store: {}", e))?;
            (Arc::new(store), Some(dir))
        }
    };

    let service = fiche::service::FicheService::new(sql, blob)
        .map_err(|e| anyhow::anyhow!("failed to initialize fiche service: {}", e))?;
    let fiche_module = fiche::FicheModule::new(service, config.upload_limit);

    let module_routes = vec![(fiche_module.name(), fiche_module.routes())];
    let app = routes::build_router(
        module_routes,
        uploads_dir.map(|dir| (UPLOADS_PREFIX, dir)),
        config.static_dir.clone(),
    );

    // Start server.
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("radfiche server listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
