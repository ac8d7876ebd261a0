use std::sync::Arc;

use bugtracker_db::Store;

use crate::config::ServerConfig;
use crate::services::{AccountService, CategoryService, IssueService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend: Postgres in production, in-memory in tests.
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(Arc::clone(&self.store))
    }

    pub fn issues(&self) -> IssueService {
        IssueService::from_config(Arc::clone(&self.store), &self.config)
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(Arc::clone(&self.store))
    }
}
