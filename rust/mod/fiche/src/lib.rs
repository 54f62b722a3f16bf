pub mod api;
pub mod model;
pub mod service;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use radfiche_core::Module;

use service::FicheService;

/// Fiche module: systems, locations, folders and content under `/api`.
pub struct FicheModule {
    service: Arc<FicheService>,
    upload_limit: usize,
}

impl FicheModule {
    pub fn new(service: FicheService, upload_limit: usize) -> Self {
        Self {
            service: Arc::new(service),
            upload_limit,
        }
    }
}

impl Module for FicheModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone(), self.upload_limit)
    }
}
