use std::sync::Arc;

use super::config::Config;
use super::data::page_catalog::PageCatalog;
use super::data::row_store::RowStore;
use crate::system::auth::service::AuthService;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageCatalog>,
    pub rows: Arc<RowStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(pages: PageCatalog, auth: AuthService) -> Self {
        let rows = RowStore::seeded(&pages);
        Self {
            pages: Arc::new(pages),
            rows: Arc::new(rows),
            auth: Arc::new(auth),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let dir = super::config::pages_dir(config);
        let pages = PageCatalog::load(dir.as_deref())?;
        let auth = AuthService::from_config(&config.auth, &config.users)?;
        tracing::info!(
            "Application state ready: {} page documents, {} users",
            pages.models().len(),
            auth.user_count()
        );
        Ok(Self::new(pages, auth))
    }
}
