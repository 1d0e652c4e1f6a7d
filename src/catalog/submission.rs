use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use super::actor::Actor;
use super::id::{is_valid_external_id, AlphanumericIdGenerator, IdGenerator};
use super::validation::{validate_photo, CheckedPhoto, ListingDraft, Photo, ValidationError};
use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::Listing;
use crate::storage::{CatalogError, CatalogStore};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Photo upload failed: {0}")]
    Upload(#[source] ObjectStoreError),
    #[error("Generated listing id {0:?} is not a valid external id")]
    InvalidId(String),
    #[error("Listing could not be saved: {0}")]
    Persistence(#[source] CatalogError),
}

/// Publishes new listings: validate, upload the photo, then insert the
/// catalog document.
///
/// The two writes are not transactional. A failed insert after a successful
/// upload leaves the photo orphaned in the blob store; the key is logged for
/// an external sweep and nothing is rolled back.
#[derive(Clone)]
pub struct SubmissionPipeline {
    catalog: Arc<dyn CatalogStore>,
    object_store: Arc<dyn ObjectStore>,
    ids: Arc<dyn IdGenerator>,
    max_photo_bytes: u64,
}

impl SubmissionPipeline {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        object_store: Arc<dyn ObjectStore>,
        max_photo_bytes: u64,
    ) -> Self {
        Self {
            catalog,
            object_store,
            ids: Arc::new(AlphanumericIdGenerator),
            max_photo_bytes,
        }
    }

    /// Replace the external id source.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub async fn submit(
        &self,
        actor: &Actor,
        draft: ListingDraft,
        photo: Option<Photo>,
    ) -> Result<Listing, SubmitError> {
        // 1. Validate (no I/O)
        let fields = draft.validate_fields()?;
        let photo = validate_photo(photo, self.max_photo_bytes)?;

        // 2. Upload the photo
        let now = Utc::now();
        let key = photo_key(now.timestamp_millis(), &photo);
        let content_type = photo.content_type();
        let image_url = self
            .object_store
            .put(&key, photo.data, content_type)
            .await
            .map_err(SubmitError::Upload)?;
        if image_url.trim().is_empty() {
            tracing::warn!(orphaned_blob = %key, "Blob store returned an empty address");
            return Err(SubmitError::Upload(ObjectStoreError::Backend(format!(
                "blob store returned an empty address for {key}"
            ))));
        }

        // 3-4. Identify and assemble
        let external_id = self.ids.generate();
        if !is_valid_external_id(&external_id) {
            tracing::warn!(
                orphaned_blob = %key,
                listing_id = %external_id,
                "Rejecting generated listing id"
            );
            return Err(SubmitError::InvalidId(external_id));
        }
        let listing = Listing::publish(fields, external_id, image_url, actor, now);

        // 5. Persist
        if let Err(e) = self.catalog.insert_listing(&listing).await {
            tracing::warn!(
                orphaned_blob = %key,
                listing_id = %listing.external_id(),
                error = %e,
                "Listing insert failed after photo upload"
            );
            return Err(SubmitError::Persistence(e));
        }

        tracing::debug!(
            listing_id = %listing.external_id(),
            owner_id = %actor.id(),
            category = %listing.category(),
            "Published listing"
        );
        Ok(listing)
    }
}

/// Blob key from the upload time and the original file name.
/// Keys are unique on a best-effort basis only.
fn photo_key(timestamp_millis: i64, photo: &CheckedPhoto) -> String {
    let file_name = photo
        .file_name
        .as_deref()
        .map(sanitize_file_name)
        .filter(|name| name.chars().any(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| format!("photo.{}", photo.extension()));

    format!("listings/{timestamp_millis}_{file_name}")
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
