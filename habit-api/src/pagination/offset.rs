//! Page-number pagination with a total count

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::links::Link;
use crate::repository::{FilterChain, Pagination, RecordSource, RepositoryResult};
use crate::sorting::OrderBy;

/// A normalized 1-indexed page request
///
/// Values below 1 become 1. There is no upper bound.
///
/// # Example
///
/// ```rust
/// use habit_api::pagination::PageRequest;
///
/// let request = PageRequest::new(0, -5);
/// assert_eq!(request.page, 1);
/// assert_eq!(request.page_size, 1);
/// assert_eq!(PageRequest::new(3, 20).window().offset, 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: clamp_positive(page),
            page_size: clamp_positive(page_size),
        }
    }

    pub fn window(&self) -> Pagination {
        Pagination::page(u64::from(self.page), u64::from(self.page_size))
    }
}

pub(crate) fn clamp_positive(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Offset page envelope
///
/// Serializes as `{ items, page, pageSize, totalCount, totalPages,
/// hasPreviousPage, hasNextPage, links? }`.
///
/// # Example
///
/// ```rust
/// use habit_api::pagination::PaginationResult;
///
/// let result = PaginationResult::new(vec!["a"; 10], 1, 10, 25);
/// assert_eq!(result.total_pages, 3);
/// assert!(result.has_next_page);
/// assert!(!result.has_previous_page);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl<T> PaginationResult<T> {
    /// Build the envelope, deriving page counts and navigation flags
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = calculate_total_pages(total_count, page_size);

        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: u64::from(page) < total_pages,
            links: None,
        }
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }

    /// Map each item, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> PaginationResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginationResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            links: self.links,
        }
    }

    /// Replace all items at once (e.g. with their shaped projections)
    pub fn with_items<U>(self, items: Vec<U>) -> PaginationResult<U> {
        PaginationResult {
            items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            links: self.links,
        }
    }
}

impl<T: Serialize> IntoResponse for PaginationResult<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Ceiling division of the total by the page size
fn calculate_total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1)))
}

/// Count the filtered source, then fetch one ordered page of it
pub async fn paginate_offset<S, R>(
    source: &R,
    filter: &FilterChain<S>,
    order: &OrderBy<S>,
    request: PageRequest,
) -> RepositoryResult<PaginationResult<S>>
where
    R: RecordSource<S>,
{
    let total_count = source.count(filter).await?;
    let items = source.fetch(filter, order, Some(request.window())).await?;

    tracing::debug!(
        page = request.page,
        page_size = request.page_size,
        total_count,
        returned = items.len(),
        "Offset page fetched"
    );

    Ok(PaginationResult::new(
        items,
        request.page,
        request.page_size,
        total_count,
    ))
}
