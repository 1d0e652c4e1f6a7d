use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::listings::{listing_to_response, ListingResponse};
use crate::api::identity::RequireActor;
use crate::api::response::{ApiError, JSend};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub favorite: bool,
    pub listing_id: String,
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    RequireActor(actor): RequireActor,
    Path(listing_id): Path<String>,
) -> Result<Json<JSend<FavoriteResponse>>, ApiError> {
    let favorite = state.favorites.toggle_favorite(&actor, &listing_id).await?;
    Ok(JSend::success(FavoriteResponse {
        favorite,
        listing_id,
    }))
}

pub async fn favorite_status(
    State(state): State<Arc<AppState>>,
    RequireActor(actor): RequireActor,
    Path(listing_id): Path<String>,
) -> Result<Json<JSend<FavoriteResponse>>, ApiError> {
    let favorite = state
        .favorites
        .is_favorite(actor.id(), &listing_id)
        .await?;
    Ok(JSend::success(FavoriteResponse {
        favorite,
        listing_id,
    }))
}

pub async fn my_favorites(
    State(state): State<Arc<AppState>>,
    RequireActor(actor): RequireActor,
) -> Result<Json<JSend<Vec<ListingResponse>>>, ApiError> {
    let listings = state.favorites.favorite_listings(&actor).await?;
    Ok(JSend::success(
        listings
            .iter()
            .map(|listing| listing_to_response(listing, Some(true)))
            .collect(),
    ))
}
