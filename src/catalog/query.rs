use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::storage::models::{Category, Listing};
use crate::storage::{CatalogError, CatalogStore, FavoriteStore};

/// One page of a category scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

/// A listing together with the viewing actor's favorite mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub favorite: bool,
}

/// Read side of the catalog.
#[derive(Clone)]
pub struct CatalogQuery {
    catalog: Arc<dyn CatalogStore>,
    favorites: Arc<dyn FavoriteStore>,
}

impl CatalogQuery {
    pub fn new(catalog: Arc<dyn CatalogStore>, favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { catalog, favorites }
    }

    /// Resolve a listing by its external id. `None` means not found.
    ///
    /// Duplicate ids are not prevented at submission; if several listings
    /// share the id, the first one inserted wins.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Listing>, CatalogError> {
        let mut matches = self.catalog.find_by_external_id(external_id).await?;
        if matches.len() > 1 {
            tracing::warn!(
                listing_id = %external_id,
                count = matches.len(),
                "duplicate external id"
            );
        }
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.swap_remove(0)))
    }

    /// Lazy scan of one category. Nothing is read until the scan is consumed,
    /// and the scan can be consumed any number of times.
    pub fn list_by_category(&self, category: impl Into<String>) -> CategoryScan {
        CategoryScan {
            catalog: Arc::clone(&self.catalog),
            category: category.into(),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.catalog.scan_categories().await
    }

    /// Listings submitted by an owner, oldest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, CatalogError> {
        self.catalog.scan_by_owner(owner_id).await
    }

    /// Mark each listing with the actor's favorite state.
    pub async fn annotate(
        &self,
        actor_id: &str,
        listings: Vec<Listing>,
    ) -> Result<Vec<AnnotatedListing>, CatalogError> {
        let marked: HashSet<String> = self
            .favorites
            .favorites_of(actor_id)
            .await?
            .into_iter()
            .collect();

        Ok(listings
            .into_iter()
            .map(|listing| AnnotatedListing {
                favorite: marked.contains(listing.external_id()),
                listing,
            })
            .collect())
    }
}

/// Restartable scan over the listings of a single category, in insertion order.
#[derive(Clone)]
pub struct CategoryScan {
    catalog: Arc<dyn CatalogStore>,
    category: String,
}

impl CategoryScan {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub async fn collect(&self) -> Result<Vec<Listing>, CatalogError> {
        self.catalog.scan_by_category(&self.category).await
    }

    pub async fn page(&self, offset: usize, limit: usize) -> Result<Page<Listing>, CatalogError> {
        let (items, total) = self
            .catalog
            .scan_by_category_page(&self.category, offset, limit)
            .await?;
        Ok(Page {
            items,
            offset,
            limit,
            total,
        })
    }
}
