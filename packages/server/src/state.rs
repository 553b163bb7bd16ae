use std::sync::Arc;

use sea_orm::DatabaseConnection;
use spotify::{CatalogApi, TokenCache};

use crate::catalog::{AdmissionGate, ArtistSearchService};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub catalog_api: Arc<dyn CatalogApi>,
    pub search: Arc<ArtistSearchService>,
    pub admission: AdmissionGate,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, catalog_api: Arc<dyn CatalogApi>) -> Self {
        let tokens = Arc::new(TokenCache::new(catalog_api.clone()));
        let search = ArtistSearchService::new(
            db.clone(),
            catalog_api.clone(),
            tokens,
            Some(config.spotify.market.clone()).filter(|m| !m.is_empty()),
            config.catalog.search_fallback_threshold,
        );
        let admission = AdmissionGate::new(config.catalog.max_users_per_round);

        Self {
            db,
            config,
            catalog_api,
            search: Arc::new(search),
            admission,
        }
    }
}
