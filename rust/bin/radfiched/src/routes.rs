//! Route registration: module routes, system endpoints and static files.

use std::path::PathBuf;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Build the complete router.
///
/// `uploads` mounts a local image directory at the given prefix. With
/// `static_dir`, unmatched paths serve the built web client and fall back
/// to its `index.html` so client-side routes resolve.
pub fn build_router(
    module_routes: Vec<(&str, Router)>,
    uploads: Option<(&str, PathBuf)>,
    static_dir: Option<PathBuf>,
) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Mount each module's routes under /{module_name}.
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    if let Some((prefix, dir)) = uploads {
        app = app.nest_service(prefix, ServeDir::new(dir));
    }

    if let Some(dir) = static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "radfiched",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
