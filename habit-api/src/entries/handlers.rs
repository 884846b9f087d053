//! Entry endpoints
//!
//! List endpoints run the full query pipeline: validate `sort`/`fields`,
//! filter to the caller's entries, order, paginate, then shape each item
//! and attach links when the client asked for them.

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::filters::EntryFilters;
use super::links;
use super::model::{CreateEntryRequest, Entry, EntryDto, UpdateEntryRequest};
use crate::handlers::{ApiError, ApiOperation, CursorQuery, ItemQuery, ListQuery, Owner};
use crate::links::{AcceptHeader, Link};
use crate::middleware::compute_etag;
use crate::pagination::{paginate_cursor, paginate_offset, CollectionResponse, PaginationResult};
use crate::shaping::{shape_with_links, DataShaper, FieldSet, ShapedObject};
use crate::state::AppState;

const ENTITY: &str = "Entry";

fn owned<'a>(owner: &'a Owner, id: &'a str) -> impl Fn(&Entry) -> bool + 'a {
    move |entry| entry.id == id && entry.is_owned_by(owner.id())
}

fn not_found(id: &str, operation: ApiOperation) -> ApiError {
    ApiError::not_found(ENTITY, id).with_operation(operation)
}

/// Shaped single-entry body, with item links when requested
fn represent(
    state: &AppState,
    dto: &EntryDto,
    fields: Option<&str>,
    include_links: bool,
) -> ShapedObject {
    let field_set = FieldSet::parse(fields);
    if include_links {
        let item_links = links::item_links(state.links(), &dto.id, fields, dto.is_archived);
        shape_with_links(dto, &field_set, &item_links)
    } else {
        DataShaper::shape(dto, &field_set)
    }
}

/// GET /entries
pub async fn list_entries(
    State(state): State<AppState>,
    owner: Owner,
    accept: AcceptHeader,
    Query(query): Query<ListQuery>,
    Query(filters): Query<EntryFilters>,
) -> Result<PaginationResult<ShapedObject>, ApiError> {
    query.validate::<EntryDto, Entry>(state.sort_mappings())?;

    let order = state
        .sort_mappings()
        .order_by::<EntryDto, Entry>(query.sort.as_deref())?;
    let request = query.page_request(&state.config().pagination);

    let page = paginate_offset(state.entries(), &filters.chain(&owner), &order, request)
        .await?
        .map(EntryDto::from);

    let fields = FieldSet::parse(query.fields.as_deref());
    let item_links = |dto: &EntryDto| {
        links::item_links(state.links(), &dto.id, query.fields.as_deref(), dto.is_archived)
    };
    let link_factory = accept
        .include_links
        .then_some(&item_links as &dyn Fn(&EntryDto) -> Vec<Link>);
    let items = DataShaper::shape_collection(&page.items, &fields, link_factory);

    let collection_links = accept.include_links.then(|| {
        links::offset_collection_links(
            state.links(),
            &request,
            &query,
            &filters,
            page.has_previous_page,
            page.has_next_page,
        )
    });

    let page = page.with_items(items);
    Ok(match collection_links {
        Some(collection_links) => page.with_links(collection_links),
        None => page,
    })
}

/// GET /entries/cursor
pub async fn list_entries_cursor(
    State(state): State<AppState>,
    owner: Owner,
    accept: AcceptHeader,
    Query(query): Query<CursorQuery>,
    Query(filters): Query<EntryFilters>,
) -> Result<CollectionResponse<ShapedObject>, ApiError> {
    query
        .validate::<EntryDto>()
        .map_err(|e| e.with_operation(ApiOperation::ListCursor))?;

    let limit = query.limit(&state.config().pagination);
    let page = paginate_cursor(
        state.entries(),
        &filters.chain(&owner),
        query.cursor.as_deref(),
        limit,
    )
    .await?;

    let dtos: Vec<EntryDto> = page.items.into_iter().map(EntryDto::from).collect();
    let fields = FieldSet::parse(query.fields.as_deref());
    let item_links = |dto: &EntryDto| {
        links::item_links(state.links(), &dto.id, query.fields.as_deref(), dto.is_archived)
    };
    let link_factory = accept
        .include_links
        .then_some(&item_links as &dyn Fn(&EntryDto) -> Vec<Link>);

    let items = DataShaper::shape_collection(&dtos, &fields, link_factory);
    let response = CollectionResponse::new(items);
    if !accept.include_links {
        return Ok(response);
    }

    Ok(response.with_links(links::cursor_collection_links(
        state.links(),
        limit.max(1),
        &query,
        &filters,
        page.next_cursor.as_deref(),
    )))
}

/// GET /entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    owner: Owner,
    accept: AcceptHeader,
    Path(id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<ShapedObject>, ApiError> {
    query
        .validate::<EntryDto>()
        .map_err(|e| e.with_operation(ApiOperation::Get))?;

    let entry = state
        .entries()
        .find_by(owned(&owner, &id))
        .await
        .ok_or_else(|| not_found(&id, ApiOperation::Get))?;

    let dto = EntryDto::from(entry);
    Ok(Json(represent(
        &state,
        &dto,
        query.fields.as_deref(),
        accept.include_links,
    )))
}

/// POST /entries
pub async fn create_entry(
    State(state): State<AppState>,
    owner: Owner,
    accept: AcceptHeader,
    Json(request): Json<CreateEntryRequest>,
) -> Result<Response, ApiError> {
    request
        .validate(Utc::now().date_naive())
        .map_err(|e| e.with_operation(ApiOperation::Create))?;

    let entry = Entry::create(owner.id(), request);
    state.entries().insert(entry.clone()).await;

    tracing::info!(entry_id = %entry.id, habit_id = %entry.habit_id, "Entry created");

    let location = state.links().href(&links::item_path(&entry.id), &[]);
    let dto = EntryDto::from(entry);
    let body = represent(&state, &dto, None, accept.include_links);

    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(location) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, location);
    }
    Ok(response)
}

/// PUT /entries/{id}
///
/// Answers with the same representation a plain GET produces, so the
/// conditional request layer records the new version for this path.
pub async fn update_entry(
    State(state): State<AppState>,
    owner: Owner,
    accept: AcceptHeader,
    Path(id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<ShapedObject>, ApiError> {
    request
        .validate(Utc::now().date_naive())
        .map_err(|e| e.with_operation(ApiOperation::Update))?;

    let updated = state
        .entries()
        .update_by(owned(&owner, &id), move |entry: &mut Entry| {
            entry.apply_update(request)
        })
        .await
        .ok_or_else(|| not_found(&id, ApiOperation::Update))?;

    let dto = EntryDto::from(updated);
    Ok(Json(represent(&state, &dto, None, accept.include_links)))
}

/// DELETE /entries/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .entries()
        .remove_by(owned(&owner, &id))
        .await
        .ok_or_else(|| not_found(&id, ApiOperation::Delete))?;

    state.etag_store().remove(&links::item_path(&id));
    tracing::info!(entry_id = %id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /entries/{id}/archive
pub async fn archive_entry(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_archived(&state, &owner, &id, true).await
}

/// PUT /entries/{id}/un-archive
pub async fn unarchive_entry(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    set_archived(&state, &owner, &id, false).await
}

/// Flip the archived flag and record the entry's new version
///
/// The 204 carries no body for the conditional request layer to hash, so
/// the item path's stored version is refreshed here from the plain
/// representation.
async fn set_archived(
    state: &AppState,
    owner: &Owner,
    id: &str,
    archived: bool,
) -> Result<StatusCode, ApiError> {
    let updated = state
        .entries()
        .update_by(owned(owner, id), |entry: &mut Entry| entry.set_archived(archived))
        .await
        .ok_or_else(|| not_found(id, ApiOperation::Archive))?;

    let body = represent(state, &EntryDto::from(updated), None, false);
    let bytes = serde_json::to_vec(&body)
        .map_err(|e| ApiError::internal(format!("failed to serialize entry: {e}")))?;
    state
        .etag_store()
        .set(&links::item_path(id), compute_etag(&bytes));

    tracing::info!(entry_id = %id, archived, "Entry archive state changed");

    Ok(StatusCode::NO_CONTENT)
}
