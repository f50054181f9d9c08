//! Business logic services

pub mod auth;
pub mod catalog;
pub mod directory;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub directory: directory::DirectoryService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository and configuration
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let auth = auth::AuthService::new(repository.clone(), config.auth.clone());
        let per_page = config.pagination.per_page();

        Self {
            catalog: catalog::CatalogService::new(repository.clone(), per_page),
            directory: directory::DirectoryService::new(repository.clone(), auth.clone(), per_page),
            auth,
            repository,
        }
    }
}
