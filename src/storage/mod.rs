mod categories;
pub mod db;
mod favorites;
mod listings;
pub mod models;
mod store;
mod tables;

pub use db::{Database, DatabaseError, PurgeStats};
pub use store::{CatalogError, CatalogStore, FavoriteStore};
pub use tables::*;
