//! Listing submission and catalog access.

pub mod actor;
mod favorites;
pub mod id;
mod query;
mod submission;
pub mod validation;

pub use actor::{Actor, ActorError};
pub use favorites::FavoriteManager;
pub use id::{is_valid_external_id, AlphanumericIdGenerator, IdGenerator, EXTERNAL_ID_LEN};
pub use query::{AnnotatedListing, CatalogQuery, CategoryScan, Page};
pub use submission::{SubmissionPipeline, SubmitError};
pub use validation::{ListingDraft, ListingFields, Photo, ValidationError};
