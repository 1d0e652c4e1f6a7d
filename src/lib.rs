//! pet-catalog - Pet-adoption listing submission and catalog access
//!
//! This crate provides the listing core and a small HTTP service around it:
//! - Submission pipeline: validate, upload the photo, publish the listing
//! - Catalog queries by external id, category and owner
//! - Per-actor favorite marks
//! - Swappable photo storage backends (local filesystem, GCS)
//! - redb embedded database for listings, categories and favorites

pub mod api;
pub mod catalog;
pub mod config;
pub mod object_store;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use catalog::{CatalogQuery, FavoriteManager, SubmissionPipeline};
use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub object_store: Arc<dyn object_store::ObjectStore>,
    pub submissions: SubmissionPipeline,
    pub queries: CatalogQuery,
    pub favorites: FavoriteManager,
}

impl AppState {
    /// Wire the catalog services over a database and a photo store.
    pub fn new(
        config: Config,
        db: Database,
        object_store: Arc<dyn object_store::ObjectStore>,
    ) -> Self {
        let store = Arc::new(db.clone());
        let submissions = SubmissionPipeline::new(
            store.clone(),
            Arc::clone(&object_store),
            config.max_upload_size,
        );
        let queries = CatalogQuery::new(store.clone(), store.clone());
        let favorites = FavoriteManager::new(store.clone(), store);

        Self {
            config,
            db,
            object_store,
            submissions,
            queries,
            favorites,
        }
    }
}
