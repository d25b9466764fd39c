use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::repository::Repositories;
use crate::services::{ItemService, LineItemService, ProjectService, UserService};

/// Shared, read-only request context built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        Self {
            config: Arc::new(config),
            repos,
        }
    }

    pub fn line_items(&self) -> LineItemService {
        LineItemService::new(self.repos.line_items.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.repos.projects.clone())
    }

    pub fn items(&self) -> ItemService {
        ItemService::new(self.repos.items.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.repos.users.clone())
    }
}
