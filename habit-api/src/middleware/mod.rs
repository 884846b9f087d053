//! HTTP middleware: conditional requests and request tracking

pub mod etag;
pub mod request_tracking;

pub use etag::{apply_conditional_requests, compute_etag, conditional_etag, ConditionalRequests};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, MakeRequestIdV7,
    SENSITIVE_HEADERS,
};
