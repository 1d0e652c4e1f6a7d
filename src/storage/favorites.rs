use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::tables::*;

impl Database {
    // ========================================================================
    // Favorite operations
    // ========================================================================

    /// Listing external ids the actor has marked, oldest mark first.
    pub fn get_favorites(&self, actor_id: &str) -> Result<Vec<String>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ACTOR_FAVORITES)?;

        let ids = match table.get(actor_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => Vec::new(),
        };
        Ok(ids)
    }

    pub fn is_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, DatabaseError> {
        Ok(self
            .get_favorites(actor_id)?
            .iter()
            .any(|id| id == listing_id))
    }

    /// Flip the actor's mark on a listing inside a single write transaction.
    /// Returns the new state. The listing itself is never consulted.
    pub fn toggle_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, DatabaseError> {
        debug_assert!(!actor_id.is_empty(), "actor id must not be empty");

        let write_txn = self.begin_write()?;
        let now_favorite = {
            let mut table = write_txn.open_table(ACTOR_FAVORITES)?;
            let mut ids: Vec<String> = match table.get(actor_id)? {
                Some(data) => rmp_serde::from_slice(data.value())?,
                None => Vec::new(),
            };

            let now_favorite = if ids.iter().any(|id| id == listing_id) {
                ids.retain(|id| id != listing_id);
                false
            } else {
                ids.push(listing_id.to_string());
                true
            };

            if ids.is_empty() {
                table.remove(actor_id)?;
            } else {
                let data = rmp_serde::to_vec_named(&ids)?;
                table.insert(actor_id, data.as_slice())?;
            }
            now_favorite
        };
        write_txn.commit()?;
        Ok(now_favorite)
    }
}
