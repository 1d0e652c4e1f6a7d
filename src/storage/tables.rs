use redb::TableDefinition;

/// Listing documents: storage key (uuid) -> Listing (msgpack)
pub const LISTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("listings");

/// External id index: external id -> msgpack Vec of storage keys, insertion order
pub const EXTERNAL_IDS: TableDefinition<&str, &[u8]> = TableDefinition::new("listing_external_ids");

/// Category index: category -> msgpack Vec of storage keys, insertion order
pub const CATEGORY_LISTINGS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("category_listings");

/// Owner index: owner id -> msgpack Vec of storage keys, insertion order
pub const OWNER_LISTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("owner_listings");

/// Category reference entities: category id -> Category (msgpack)
pub const CATEGORIES: TableDefinition<&str, &[u8]> = TableDefinition::new("categories");

/// Favorite marks: actor id -> msgpack Vec of listing external ids
pub const ACTOR_FAVORITES: TableDefinition<&str, &[u8]> = TableDefinition::new("actor_favorites");
