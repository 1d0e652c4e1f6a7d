use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::StorageBackend;
use crate::AppState;

/// Room for the text fields sent alongside the photo.
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize + FORM_FIELDS_ALLOWANCE;

    let mut router = Router::new()
        // Listings
        .route("/listings", get(handlers::list_listings))
        .route(
            "/listings",
            post(handlers::submit_listing).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/listings/:id", get(handlers::get_listing))
        .route("/categories", get(handlers::list_categories))
        // Actor-scoped
        .route("/me/listings", get(handlers::my_listings))
        .route("/me/favorites", get(handlers::my_favorites))
        .route(
            "/me/favorites/:id",
            get(handlers::favorite_status).post(handlers::toggle_favorite),
        )
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Locally stored photos are served by this service
    if state.config.storage.backend == StorageBackend::Local {
        router = router.route("/photos/*key", get(handlers::serve_photo));
    }

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled: purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
