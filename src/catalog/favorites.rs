use std::sync::Arc;

use super::actor::Actor;
use crate::storage::models::Listing;
use crate::storage::{CatalogError, CatalogStore, FavoriteStore};

/// Per-actor favorite marks.
///
/// Marks are keyed by listing external id and never require the listing to
/// exist. Mutations always act as the calling actor.
#[derive(Clone)]
pub struct FavoriteManager {
    favorites: Arc<dyn FavoriteStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl FavoriteManager {
    pub fn new(favorites: Arc<dyn FavoriteStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { favorites, catalog }
    }

    pub async fn is_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, CatalogError> {
        self.favorites.is_favorite(actor_id, listing_id).await
    }

    /// Flip the caller's mark on a listing and return the new state.
    pub async fn toggle_favorite(
        &self,
        actor: &Actor,
        listing_id: &str,
    ) -> Result<bool, CatalogError> {
        let now_favorite = self.favorites.toggle_favorite(actor.id(), listing_id).await?;
        tracing::debug!(
            actor_id = %actor.id(),
            listing_id = %listing_id,
            favorite = now_favorite,
            "Toggled favorite"
        );
        Ok(now_favorite)
    }

    pub async fn favorite_ids(&self, actor_id: &str) -> Result<Vec<String>, CatalogError> {
        self.favorites.favorites_of(actor_id).await
    }

    /// The caller's marked listings, oldest mark first. Marks whose listing
    /// no longer resolves are skipped.
    pub async fn favorite_listings(&self, actor: &Actor) -> Result<Vec<Listing>, CatalogError> {
        let mut listings = Vec::new();
        for listing_id in self.favorites.favorites_of(actor.id()).await? {
            let mut matches = self.catalog.find_by_external_id(&listing_id).await?;
            if matches.is_empty() {
                tracing::debug!(listing_id = %listing_id, "Skipping favorite of missing listing");
                continue;
            }
            listings.push(matches.swap_remove(0));
        }
        Ok(listings)
    }
}
