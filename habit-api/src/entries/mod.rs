//! Habit entries resource
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /entries` | offset-paginated list |
//! | `GET /entries/cursor` | keyset-paginated list |
//! | `POST /entries` | create |
//! | `GET /entries/{id}` | single entry |
//! | `PUT /entries/{id}` | replace |
//! | `DELETE /entries/{id}` | delete |
//! | `PUT /entries/{id}/archive` | archive |
//! | `PUT /entries/{id}/un-archive` | un-archive |
//!
//! Every route is scoped to the caller identified by `X-User-Id`.

mod filters;
mod handlers;
pub mod links;
mod model;

use axum::{
    routing::{get, put},
    Router,
};

use crate::sorting::{SortKey, SortMapping, SortMappingDefinition, SortValue};
use crate::state::AppState;

pub use filters::EntryFilters;
pub use handlers::{
    archive_entry, create_entry, delete_entry, get_entry, list_entries, list_entries_cursor,
    unarchive_entry, update_entry,
};
pub use model::{CreateEntryRequest, Entry, EntryDto, EntrySource, UpdateEntryRequest};

/// Public sort fields of [`EntryDto`] over stored [`Entry`] records
///
/// `age` sorts by date in the opposite direction: `age asc` puts the
/// newest entries first. Without a `sort` parameter entries are ordered by
/// id, which follows creation order.
pub fn sort_mappings() -> SortMappingDefinition<EntryDto, Entry> {
    SortMappingDefinition::new(
        vec![
            SortMapping::new("date", "date", |e: &Entry| e.date.into()),
            SortMapping::new("createdAtUtc", "created_at_utc", |e: &Entry| {
                e.created_at_utc.into()
            }),
            SortMapping::new("value", "value", |e: &Entry| e.value.into()),
            SortMapping::reversed("age", "date", |e: &Entry| e.date.into()),
        ],
        SortKey::new("id", |e: &Entry| SortValue::from(e.id.as_str())),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/cursor", get(list_entries_cursor))
        .route(
            "/entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/entries/{id}/archive", put(archive_entry))
        .route("/entries/{id}/un-archive", put(unarchive_entry))
}
