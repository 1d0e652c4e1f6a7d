use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::identity::{MaybeActor, RequireActor};
use crate::api::response::{ApiError, AppQuery, JSend, JSendPaginated, Pagination};
use crate::catalog::{ListingDraft, Photo};
use crate::storage::models::{Listing, Sex};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub email: Option<String>,
    pub id: String,
    pub image_url: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub about: String,
    pub address: String,
    pub age: u32,
    pub breed: String,
    pub category: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    pub id: String,
    pub image_url: String,
    pub name: String,
    pub owner: OwnerResponse,
    pub sex: Sex,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct ListListingsParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn submit_listing(
    State(state): State<Arc<AppState>>,
    RequireActor(actor): RequireActor,
    mut multipart: Multipart,
) -> Result<Json<JSend<ListingResponse>>, ApiError> {
    let mut draft = ListingDraft::default();
    let mut photo: Option<Photo> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "photo" {
            let file_name = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read photo: {e}")))?;
            photo = Some(Photo::new(file_name, data));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid {field_name}: {e}")))?;
        if !draft.set(&field_name, value) {
            tracing::debug!(field = %field_name, "Ignoring unknown listing field");
        }
    }

    let listing = state.submissions.submit(&actor, draft, photo).await?;

    Ok(JSend::success(listing_to_response(&listing, None)))
}

pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    Path(id): Path<String>,
) -> Result<Json<JSend<ListingResponse>>, ApiError> {
    let listing = state
        .queries
        .get_by_external_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    let favorite = match actor {
        Some(actor) => Some(
            state
                .favorites
                .is_favorite(actor.id(), listing.external_id())
                .await?,
        ),
        None => None,
    };

    Ok(JSend::success(listing_to_response(&listing, favorite)))
}

pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    AppQuery(params): AppQuery<ListListingsParams>,
) -> Result<Json<JSendPaginated<ListingResponse>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("category query parameter is required"))?;

    let page = state
        .queries
        .list_by_category(category)
        .page(params.offset as usize, params.limit as usize)
        .await?;

    let items: Vec<ListingResponse> = match actor {
        Some(actor) => state
            .queries
            .annotate(actor.id(), page.items)
            .await?
            .iter()
            .map(|a| listing_to_response(&a.listing, Some(a.favorite)))
            .collect(),
        None => page
            .items
            .iter()
            .map(|l| listing_to_response(l, None))
            .collect(),
    };

    Ok(JSendPaginated::success(
        items,
        Pagination::new(params.limit, params.offset, page.total),
    ))
}

pub async fn my_listings(
    State(state): State<Arc<AppState>>,
    RequireActor(actor): RequireActor,
) -> Result<Json<JSend<Vec<ListingResponse>>>, ApiError> {
    let listings = state.queries.list_by_owner(actor.id()).await?;
    let annotated = state.queries.annotate(actor.id(), listings).await?;

    Ok(JSend::success(
        annotated
            .iter()
            .map(|a| listing_to_response(&a.listing, Some(a.favorite)))
            .collect(),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn listing_to_response(listing: &Listing, favorite: Option<bool>) -> ListingResponse {
    ListingResponse {
        about: listing.about().to_string(),
        address: listing.address().to_string(),
        age: listing.age(),
        breed: listing.breed().to_string(),
        category: listing.category().to_string(),
        created_at: listing.created_at().to_rfc3339(),
        favorite,
        id: listing.external_id().to_string(),
        image_url: listing.image_url().to_string(),
        name: listing.name().to_string(),
        owner: OwnerResponse {
            email: listing.owner_email().map(str::to_string),
            id: listing.owner_id().to_string(),
            image_url: listing.owner_image_url().map(str::to_string),
            name: listing.owner_name().map(str::to_string),
        },
        sex: listing.sex(),
        weight: listing.weight(),
    }
}
