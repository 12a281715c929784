pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod folders;
pub mod forwarder;
pub mod models;
pub mod routes;
pub mod tree_client;

use std::sync::Arc;

use config::AppConfig;
use error::AppError;
use folders::FolderService;
use forwarder::CreationForwarder;
use tree_client::TreeClient;

pub struct AppState {
    pub folders: FolderService,
    pub forwarder: CreationForwarder,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let fallback = match &config.fallback_catalog {
            Some(path) => catalog::load(path)?,
            None => catalog::static_tree(),
        };

        let tree_client = TreeClient::new(
            &config.tree_api_url,
            config.github_token.as_deref(),
            config.tree_timeout,
        )
        .map_err(|err| AppError::Config(err.to_string()))?;

        Ok(Self {
            folders: FolderService::new(Arc::new(tree_client), fallback),
            forwarder: CreationForwarder::new(&config.persistence_url, config.create_timeout)?,
        })
    }
}
