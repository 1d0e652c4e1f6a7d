use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::storage::models::Category;
use crate::AppState;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<Category>>>, ApiError> {
    let categories = state.queries.list_categories().await?;
    Ok(JSend::success(categories))
}
