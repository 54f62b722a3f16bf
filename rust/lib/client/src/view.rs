use fiche::model::System;
use tracing::warn;

use crate::api::FicheClient;
use crate::error::ClientError;
use crate::filter::filter_by_name;

/// Load state of a list page.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

/// The systems list page: fetched once, filtered locally, retried only on
/// request.
#[derive(Debug)]
pub struct SystemsView {
    pub state: LoadState<System>,
    pub query: String,
}

impl Default for SystemsView {
    fn default() -> Self {
        Self {
            state: LoadState::Loading,
            query: String::new(),
        }
    }
}

impl SystemsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the systems. A failure is kept in the state, not returned.
    pub async fn load(&mut self, client: &FicheClient) {
        self.state = LoadState::Loading;
        self.state = match client.list_systems().await {
            Ok(systems) => LoadState::Loaded(systems),
            Err(err) => {
                warn!("failed to load systems: {}", err);
                LoadState::Failed(err.to_string())
            }
        };
    }

    /// User-triggered retry after a failed load.
    pub async fn retry(&mut self, client: &FicheClient) {
        self.load(client).await;
    }

    /// Systems matching the search field.
    pub fn visible(&self) -> Vec<&System> {
        match &self.state {
            LoadState::Loaded(systems) => filter_by_name(systems, &self.query),
            _ => Vec::new(),
        }
    }

    /// Delete a system (after the user confirmed) and drop it from the list.
    pub async fn delete(&mut self, client: &FicheClient, id: &str) -> Result<(), ClientError> {
        client.delete_system(id).await?;
        if let LoadState::Loaded(systems) = &mut self.state {
            systems.retain(|s| s.id != id);
        }
        Ok(())
    }
}
