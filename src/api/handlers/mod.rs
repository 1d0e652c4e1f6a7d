mod admin;
mod categories;
mod favorites;
mod listings;
mod photos;

pub use admin::{admin_purge, health};
pub use categories::list_categories;
pub use favorites::{favorite_status, my_favorites, toggle_favorite};
pub use listings::{get_listing, list_listings, my_listings, submit_listing};
pub use photos::serve_photo;
