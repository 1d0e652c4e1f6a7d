//! Storage-agnostic boundaries consumed by the catalog services.

use async_trait::async_trait;
use thiserror::Error;

use super::db::{Database, DatabaseError};
use super::models::{Category, Listing};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Catalog backend error: {0}")]
    Backend(String),
}

/// Durable keyed-document store holding listings and categories.
///
/// Implementations never expose their internal document keys. Scans return
/// records in a stable order for a given store state. Categories are
/// reference data and are only read through this boundary.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_listing(&self, listing: &Listing) -> Result<(), CatalogError>;
    /// Equality lookup on the external id; every match, first inserted first.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Vec<Listing>, CatalogError>;
    async fn scan_by_category(&self, category: &str) -> Result<Vec<Listing>, CatalogError>;
    /// One window of a category scan plus the category's total size. Only
    /// the listings inside the window are read.
    async fn scan_by_category_page(
        &self,
        category: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize), CatalogError>;
    async fn scan_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, CatalogError>;
    async fn scan_categories(&self) -> Result<Vec<Category>, CatalogError>;
}

/// Durable per-actor favorite marks.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn is_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, CatalogError>;
    /// Atomically flip the mark and return the new state.
    async fn toggle_favorite(&self, actor_id: &str, listing_id: &str)
        -> Result<bool, CatalogError>;
    async fn favorites_of(&self, actor_id: &str) -> Result<Vec<String>, CatalogError>;
}

#[async_trait]
impl CatalogStore for Database {
    async fn insert_listing(&self, listing: &Listing) -> Result<(), CatalogError> {
        Database::insert_listing(self, listing)?;
        Ok(())
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Vec<Listing>, CatalogError> {
        Ok(self.get_listings_by_external_id(external_id)?)
    }

    async fn scan_by_category(&self, category: &str) -> Result<Vec<Listing>, CatalogError> {
        Ok(self.get_listings_by_category(category)?)
    }

    async fn scan_by_category_page(
        &self,
        category: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize), CatalogError> {
        Ok(self.get_listings_by_category_page(category, offset, limit)?)
    }

    async fn scan_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, CatalogError> {
        Ok(self.get_listings_by_owner(owner_id)?)
    }

    async fn scan_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.get_all_categories()?)
    }
}

#[async_trait]
impl FavoriteStore for Database {
    async fn is_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, CatalogError> {
        Ok(Database::is_favorite(self, actor_id, listing_id)?)
    }

    async fn toggle_favorite(
        &self,
        actor_id: &str,
        listing_id: &str,
    ) -> Result<bool, CatalogError> {
        Ok(Database::toggle_favorite(self, actor_id, listing_id)?)
    }

    async fn favorites_of(&self, actor_id: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self.get_favorites(actor_id)?)
    }
}
