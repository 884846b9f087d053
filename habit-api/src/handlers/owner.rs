//! Caller identity extractor
//!
//! Authentication happens upstream; the authenticated user id arrives in
//! the `X-User-Id` header. Every resource query is scoped to it.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated owner of the requested resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Owner(id.to_string()))
            .ok_or_else(|| ApiError::unauthorized("Missing or empty X-User-Id header"))
    }
}
