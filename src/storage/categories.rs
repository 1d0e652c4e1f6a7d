use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::Category;
use super::tables::*;

impl Database {
    // ========================================================================
    // Category operations
    // ========================================================================

    /// Store a category, replacing any category with the same id.
    pub fn put_category(&self, category: &Category) -> Result<(), DatabaseError> {
        debug_assert!(!category.id.is_empty(), "category id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(CATEGORIES)?;
            let data = rmp_serde::to_vec_named(category)?;
            table.insert(category.id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Every category, ordered by id.
    pub fn get_all_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CATEGORIES)?;

        let mut categories = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let category: Category = rmp_serde::from_slice(value.value())?;
            categories.push(category);
        }

        Ok(categories)
    }

    pub fn category_exists(&self, id: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CATEGORIES)?;
        Ok(table.get(id)?.is_some())
    }
}
