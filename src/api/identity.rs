//! Actor extraction from headers set by the upstream auth gateway.
//!
//! Requests reach this service already authenticated; the gateway forwards
//! the session identity in `x-actor-*` headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::api::response::ApiError;
use crate::catalog::Actor;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_EMAIL_HEADER: &str = "x-actor-email";
pub const ACTOR_IMAGE_HEADER: &str = "x-actor-image";

/// The calling actor; rejects with 401 when no identity was forwarded.
pub struct RequireActor(pub Actor);

/// The calling actor when an identity was forwarded.
pub struct MaybeActor(pub Option<Actor>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, ApiError> {
        actor_from_headers(&parts.headers)
            .map(RequireActor)
            .ok_or_else(|| ApiError::unauthorized("authenticated actor required"))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, ApiError> {
        Ok(MaybeActor(actor_from_headers(&parts.headers)))
    }
}

fn actor_from_headers(headers: &HeaderMap) -> Option<Actor> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut actor = Actor::new(header(ACTOR_ID_HEADER)?).ok()?;
    if let Some(name) = header(ACTOR_NAME_HEADER) {
        actor = actor.with_display_name(name);
    }
    if let Some(email) = header(ACTOR_EMAIL_HEADER) {
        actor = actor.with_email(email);
    }
    if let Some(image) = header(ACTOR_IMAGE_HEADER) {
        actor = actor.with_image_url(image);
    }
    Some(actor)
}
