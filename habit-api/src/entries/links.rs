//! Hypermedia links for entry responses

use axum::http::Method;

use super::filters::EntryFilters;
use crate::handlers::{CursorQuery, ListQuery};
use crate::links::{Link, LinkBuilder};
use crate::pagination::PageRequest;

pub const COLLECTION_PATH: &str = "/entries";
pub const CURSOR_PATH: &str = "/entries/cursor";

pub fn item_path(id: &str) -> String {
    format!("{COLLECTION_PATH}/{id}")
}

fn offset_query(
    page: u32,
    request: &PageRequest,
    query: &ListQuery,
    filters: &EntryFilters,
) -> Vec<(&'static str, Option<String>)> {
    let mut pairs = vec![
        ("page", Some(page.to_string())),
        ("pageSize", Some(request.page_size.to_string())),
        ("sort", query.sort.clone()),
        ("fields", query.fields.clone()),
    ];
    pairs.extend(filters.query_pairs());
    pairs
}

/// `self`, `create`, then `previous-page`/`next-page` when they exist
pub fn offset_collection_links(
    builder: &LinkBuilder,
    request: &PageRequest,
    query: &ListQuery,
    filters: &EntryFilters,
    has_previous_page: bool,
    has_next_page: bool,
) -> Vec<Link> {
    let mut links = vec![
        builder.link(
            COLLECTION_PATH,
            &offset_query(request.page, request, query, filters),
            "self",
            Method::GET,
        ),
        builder.link(COLLECTION_PATH, &[], "create", Method::POST),
    ];

    if has_previous_page {
        links.push(builder.link(
            COLLECTION_PATH,
            &offset_query(request.page - 1, request, query, filters),
            "previous-page",
            Method::GET,
        ));
    }

    if has_next_page {
        links.push(builder.link(
            COLLECTION_PATH,
            &offset_query(request.page + 1, request, query, filters),
            "next-page",
            Method::GET,
        ));
    }

    links
}

fn cursor_query(
    cursor: Option<String>,
    limit: i64,
    query: &CursorQuery,
    filters: &EntryFilters,
) -> Vec<(&'static str, Option<String>)> {
    let mut pairs = vec![
        ("cursor", cursor),
        ("limit", Some(limit.to_string())),
        ("fields", query.fields.clone()),
    ];
    pairs.extend(filters.query_pairs());
    pairs
}

/// `self`, `create`, then `next-page` carrying the continuation cursor
pub fn cursor_collection_links(
    builder: &LinkBuilder,
    limit: i64,
    query: &CursorQuery,
    filters: &EntryFilters,
    next_cursor: Option<&str>,
) -> Vec<Link> {
    let mut links = vec![
        builder.link(
            CURSOR_PATH,
            &cursor_query(query.cursor.clone(), limit, query, filters),
            "self",
            Method::GET,
        ),
        builder.link(COLLECTION_PATH, &[], "create", Method::POST),
    ];

    if let Some(next) = next_cursor {
        links.push(builder.link(
            CURSOR_PATH,
            &cursor_query(Some(next.to_string()), limit, query, filters),
            "next-page",
            Method::GET,
        ));
    }

    links
}

/// Links for one entry; `archive` or `un-archive` depending on its state
pub fn item_links(
    builder: &LinkBuilder,
    id: &str,
    fields: Option<&str>,
    is_archived: bool,
) -> Vec<Link> {
    let path = item_path(id);
    let (toggle_rel, toggle_path) = if is_archived {
        ("un-archive", format!("{path}/un-archive"))
    } else {
        ("archive", format!("{path}/archive"))
    };

    vec![
        builder.link(
            &path,
            &[("fields", fields.map(String::from))],
            "self",
            Method::GET,
        ),
        builder.link(&path, &[], "update", Method::PUT),
        builder.link(&path, &[], "delete", Method::DELETE),
        builder.link(&toggle_path, &[], toggle_rel, Method::PUT),
    ]
}
