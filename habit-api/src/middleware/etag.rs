//! ETag-based conditional request middleware
//!
//! For every request except `POST` and `DELETE`:
//!
//! 1. `PUT`/`PATCH` carrying `If-Match` are rejected with an empty 412 when
//!    the stored version for the path differs from the supplied one. The
//!    handler does not run.
//! 2. The handler runs. A `200` JSON response is buffered, hashed, recorded
//!    as the path's current version and sent with an `ETag` header.
//! 3. A `GET` whose `If-None-Match` equals the fresh hash gets an empty 304
//!    instead of the body.
//!
//! Anything else passes through untouched.
//!
//! Buffering is bounded by `etag.max_buffer_bytes` (`0` disables the
//! bound). A response whose declared size is over the bound is sent as is,
//! without an `ETag`, and leaves the stored version alone. A body with no
//! declared size that overflows while buffering cannot be replayed, so it
//! becomes a 500 with nothing of the original body written.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, IF_MATCH, IF_NONE_MATCH},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::cache::EtagStore;
use crate::config::EtagConfig;
use crate::error::Error;

/// Shared state for [`conditional_etag`]
#[derive(Clone)]
pub struct ConditionalRequests {
    store: Arc<dyn EtagStore>,
    max_buffer_bytes: usize,
}

impl ConditionalRequests {
    pub fn new(store: Arc<dyn EtagStore>, config: &EtagConfig) -> Self {
        Self {
            store,
            max_buffer_bytes: config.max_buffer_bytes,
        }
    }

    pub fn store(&self) -> &Arc<dyn EtagStore> {
        &self.store
    }

    fn buffer_limit(&self) -> Option<usize> {
        (self.max_buffer_bytes > 0).then_some(self.max_buffer_bytes)
    }
}

impl std::fmt::Debug for ConditionalRequests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalRequests")
            .field("max_buffer_bytes", &self.max_buffer_bytes)
            .finish_non_exhaustive()
    }
}

/// 512-bit BLAKE3 digest of `body` as uppercase hex
pub fn compute_etag(body: &[u8]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(body);
    let mut digest = [0u8; 64];
    hasher.finalize_xof().fill(&mut digest);
    hex::encode_upper(digest)
}

/// Header value with surrounding whitespace, a weak prefix and quotes removed
fn header_token(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?.trim();
    let unquoted = raw.trim_start_matches("W/").trim_matches('"');
    (!unquoted.is_empty()).then(|| unquoted.to_string())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("json"))
}

fn empty_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Axum middleware implementing conditional GETs and optimistic concurrency
pub async fn conditional_etag(
    State(conditional): State<ConditionalRequests>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();

    if method == Method::POST || method == Method::DELETE {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();

    if method == Method::PUT || method == Method::PATCH {
        if let Some(supplied) = header_token(request.headers(), IF_MATCH) {
            let current = conditional.store.get(&path).filter(|etag| !etag.is_empty());
            if let Some(current) = current {
                if supplied != "*" && supplied != current {
                    tracing::debug!(
                        method = %method,
                        path = %path,
                        supplied = %supplied,
                        current = %current,
                        "Precondition failed"
                    );
                    return empty_response(StatusCode::PRECONDITION_FAILED);
                }
            }
        }
    }

    let if_none_match = header_token(request.headers(), IF_NONE_MATCH);

    let response = next.run(request).await;

    if response.status() != StatusCode::OK || !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let limit = conditional.buffer_limit();

    if let Some(limit) = limit {
        if body.size_hint().lower() > limit as u64 {
            tracing::debug!(path = %path, limit, "Response too large to version");
            return Response::from_parts(parts, body);
        }
    }

    let bytes = match to_bytes(body, limit.unwrap_or(usize::MAX)).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Error::Body(format!("failed to buffer response for {path}: {e}"))
                .into_response();
        }
    };

    let etag = compute_etag(&bytes);
    conditional.store.set(&path, etag.clone());

    let header = match HeaderValue::from_str(&format!("\"{etag}\"")) {
        Ok(header) => header,
        Err(e) => return Error::Internal(format!("invalid ETag header: {e}")).into_response(),
    };

    if method == Method::GET && if_none_match.as_deref() == Some(etag.as_str()) {
        tracing::debug!(path = %path, etag = %etag, "Not modified");
        let mut not_modified = empty_response(StatusCode::NOT_MODIFIED);
        not_modified.headers_mut().insert(ETAG, header);
        return not_modified;
    }

    parts.headers.insert(ETAG, header);
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

/// Wrap `router` with [`conditional_etag`] when enabled
pub fn apply_conditional_requests<S>(
    router: Router<S>,
    conditional: ConditionalRequests,
    config: &EtagConfig,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.enabled {
        tracing::info!("Conditional request middleware disabled");
        return router;
    }

    router.layer(from_fn_with_state(conditional, conditional_etag))
}
