//! # habit-api
//!
//! Habit tracking REST API built around a generic list-query pipeline.
//!
//! ## Features
//!
//! - **Field shaping**: `?fields=` selects which public fields are returned
//! - **Mapped sorting**: `?sort=` terms are validated against and translated
//!   through per-resource sort mappings
//! - **Pagination**: offset (`page`/`pageSize`) and keyset (`cursor`/`limit`)
//! - **Conditional requests**: content-hash `ETag`s, 304 on `If-None-Match`,
//!   412 on stale `If-Match`
//! - **Hypermedia**: optional links when the client accepts
//!   `application/vnd.dev-habit.hateoas+json`
//!
//! ## Example
//!
//! ```rust,no_run
//! use habit_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Build application state and routes
//!     let state = AppState::new(config.clone())?;
//!     let app = habit_api::server::app(state);
//!
//!     // Run server
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod entries;
pub mod error;
pub mod handlers;
pub mod health;
pub mod links;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod repository;
pub mod server;
pub mod shaping;
pub mod sorting;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::{EtagStore, InMemoryEtagStore};
    pub use crate::config::{Config, EtagConfig, PaginationConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, CursorQuery, ItemQuery, ListQuery, Owner};
    pub use crate::health::{health, readiness};
    pub use crate::links::{AcceptHeader, Link, LinkBuilder, HATEOAS_MEDIA_TYPE};
    pub use crate::middleware::{
        apply_conditional_requests, compute_etag, conditional_etag, request_id_layer,
        request_id_propagation_layer, sensitive_headers_layer, ConditionalRequests,
        SENSITIVE_HEADERS,
    };
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::pagination::{
        paginate_cursor, paginate_offset, CollectionResponse, Cursor, CursorPage, KeysetRecord,
        PageRequest, PaginationResult,
    };
    pub use crate::repository::{
        FilterChain, InMemorySource, OrderDirection, Pagination, RecordSource, RepositoryError,
        RepositoryResult,
    };
    pub use crate::server::Server;
    pub use crate::shaping::{shape_with_links, DataShaper, FieldSet, ShapedObject, Shapeable};
    pub use crate::sorting::{
        apply_sort, OrderBy, SortKey, SortMapping, SortMappingDefinition, SortMappingRegistry,
        SortValue,
    };
    pub use crate::state::{AppState, AppStateBuilder};

    pub use axum::{
        extract::{Path, Query, State},
        response::{IntoResponse, Json, Response},
        routing::{delete, get, post, put},
        Router,
    };
}
