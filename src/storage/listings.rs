use redb::{ReadOnlyTable, ReadableTable, TableDefinition};

use super::db::{Database, DatabaseError};
use super::models::Listing;
use super::tables::*;

impl Database {
    // ========================================================================
    // Listing operations
    // ========================================================================

    /// Store a listing under a fresh storage key and update the external id,
    /// category and owner indexes. Returns the storage key.
    ///
    /// No uniqueness check is made on the external id: a second listing with
    /// the same id is appended to that id's index entry.
    pub fn insert_listing(&self, listing: &Listing) -> Result<String, DatabaseError> {
        debug_assert!(
            !listing.external_id.is_empty(),
            "listing external id must not be empty"
        );
        debug_assert!(
            !listing.image_url.is_empty(),
            "listing image url must not be empty"
        );

        let key = uuid::Uuid::new_v4().to_string();

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(LISTINGS)?;
            let data = rmp_serde::to_vec_named(listing)?;
            table.insert(key.as_str(), data.as_slice())?;

            append_to_index(&write_txn, EXTERNAL_IDS, &listing.external_id, &key)?;
            append_to_index(&write_txn, CATEGORY_LISTINGS, &listing.category, &key)?;
            append_to_index(&write_txn, OWNER_LISTINGS, &listing.owner_id, &key)?;
        }
        write_txn.commit()?;
        Ok(key)
    }

    /// All listings sharing an external id, in insertion order.
    pub fn get_listings_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Vec<Listing>, DatabaseError> {
        self.listings_from_index(EXTERNAL_IDS, external_id)
    }

    /// All listings in a category, in insertion order.
    pub fn get_listings_by_category(&self, category: &str) -> Result<Vec<Listing>, DatabaseError> {
        self.listings_from_index(CATEGORY_LISTINGS, category)
    }

    /// A window of a category in insertion order, with the category's total
    /// size. Only the listings inside the window are decoded.
    pub fn get_listings_by_category_page(
        &self,
        category: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize), DatabaseError> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(CATEGORY_LISTINGS)?;
        let listings_table = read_txn.open_table(LISTINGS)?;

        let keys = read_index(&index, category)?;
        let total = keys.len();

        let mut listings = Vec::new();
        for key in keys.iter().skip(offset).take(limit) {
            if let Some(data) = listings_table.get(key.as_str())? {
                listings.push(rmp_serde::from_slice(data.value())?);
            }
        }

        Ok((listings, total))
    }

    /// All listings submitted by an owner, in insertion order.
    pub fn get_listings_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, DatabaseError> {
        self.listings_from_index(OWNER_LISTINGS, owner_id)
    }

    /// Every listing, ordered by storage key.
    pub fn get_all_listings(&self) -> Result<Vec<Listing>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(LISTINGS)?;

        let mut listings = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let listing: Listing = rmp_serde::from_slice(value.value())?;
            listings.push(listing);
        }

        Ok(listings)
    }

    fn listings_from_index(
        &self,
        definition: TableDefinition<'static, &'static str, &'static [u8]>,
        index_key: &str,
    ) -> Result<Vec<Listing>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let index = read_txn.open_table(definition)?;
        let listings_table = read_txn.open_table(LISTINGS)?;

        let mut listings = Vec::new();
        for key in read_index(&index, index_key)? {
            if let Some(data) = listings_table.get(key.as_str())? {
                let listing: Listing = rmp_serde::from_slice(data.value())?;
                listings.push(listing);
            }
        }

        Ok(listings)
    }
}

fn read_index(
    index: &ReadOnlyTable<&'static str, &'static [u8]>,
    index_key: &str,
) -> Result<Vec<String>, DatabaseError> {
    match index.get(index_key)? {
        Some(data) => Ok(rmp_serde::from_slice(data.value())?),
        None => Ok(Vec::new()),
    }
}

/// Append a storage key to a msgpack-encoded index entry.
fn append_to_index(
    write_txn: &redb::WriteTransaction,
    definition: TableDefinition<'static, &'static str, &'static [u8]>,
    index_key: &str,
    storage_key: &str,
) -> Result<(), DatabaseError> {
    let mut index = write_txn.open_table(definition)?;
    let mut keys: Vec<String> = match index.get(index_key)? {
        Some(data) => rmp_serde::from_slice(data.value())?,
        None => Vec::new(),
    };

    keys.push(storage_key.to_string());
    let data = rmp_serde::to_vec_named(&keys)?;
    index.insert(index_key, data.as_slice())?;
    Ok(())
}
