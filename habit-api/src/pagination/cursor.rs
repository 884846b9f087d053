//! Keyset (cursor) pagination over a fixed `(date desc, id desc)` ordering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::offset::clamp_positive;
use crate::links::Link;
use crate::repository::{FilterChain, OrderDirection, Pagination, RecordSource, RepositoryResult};
use crate::sorting::{OrderBy, SortKey, SortValue};

/// A record that can be paged by its `(date, id)` key
pub trait KeysetRecord {
    fn keyset_date(&self) -> NaiveDate;
    fn keyset_id(&self) -> &str;
}

/// Last-seen `(date, id)` pair of a keyset page
///
/// Clients only ever see the opaque [`encode`](Self::encode)d form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: String,
    pub date: NaiveDate,
}

impl Cursor {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self { id: id.into(), date }
    }

    pub fn from_record<S: KeysetRecord>(record: &S) -> Self {
        Self::new(record.keyset_id(), record.keyset_date())
    }

    /// URL-safe, unpadded base64 of the compact JSON form
    pub fn encode(&self) -> String {
        // Serializing a string and a date cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Inverse of [`encode`](Self::encode); `None` for anything undecodable
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Whether `record` sorts strictly after this cursor in `(date desc, id desc)` order
    fn precedes<S: KeysetRecord>(&self, record: &S) -> bool {
        let date = record.keyset_date();
        date < self.date || (date == self.date && record.keyset_id() < self.id.as_str())
    }
}

/// One keyset page plus its continuation
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<S> {
    pub items: Vec<S>,
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
}

/// Keyset page envelope: `{ items, links? }`
///
/// The continuation is surfaced only through a `next-page` link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl<T> CollectionResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, links: None }
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = Some(links);
        self
    }
}

impl<T: Serialize> IntoResponse for CollectionResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// The fixed keyset ordering: date descending, then id descending (ordinal)
pub fn keyset_order<S: KeysetRecord>() -> OrderBy<S> {
    OrderBy::new()
        .then(
            SortKey::new("date", |r: &S| r.keyset_date().into()),
            OrderDirection::Descending,
        )
        .then(
            SortKey::new("id", |r: &S| SortValue::Text(r.keyset_id().to_string())),
            OrderDirection::Descending,
        )
}

/// Fetch the page after `cursor` (or the first page) of at most `limit` records
///
/// An absent or undecodable cursor starts from the beginning. One probe
/// record beyond `limit` is fetched to detect a following page; when it
/// exists the last record of the returned page becomes the next cursor.
/// Records equal to the cursor are excluded, so a boundary record is never
/// returned twice.
pub async fn paginate_cursor<S, R>(
    source: &R,
    filter: &FilterChain<S>,
    cursor: Option<&str>,
    limit: i64,
) -> RepositoryResult<CursorPage<S>>
where
    S: KeysetRecord + 'static,
    R: RecordSource<S>,
{
    let limit = clamp_positive(limit) as usize;

    let decoded = cursor
        .filter(|token| !token.trim().is_empty())
        .and_then(|token| {
            let decoded = Cursor::decode(token);
            if decoded.is_none() {
                tracing::debug!(cursor = token, "Ignoring undecodable cursor");
            }
            decoded
        });

    let filter = match decoded {
        Some(after) => filter.clone().and(move |record: &S| after.precedes(record)),
        None => filter.clone(),
    };

    let probe = Pagination::first(limit as u64 + 1);
    let mut items = source.fetch(&filter, &keyset_order(), Some(probe)).await?;

    let has_next_page = items.len() > limit;
    let next_cursor = if has_next_page {
        items.truncate(limit);
        items.last().map(|boundary| Cursor::from_record(boundary).encode())
    } else {
        None
    };

    Ok(CursorPage {
        items,
        has_next_page,
        next_cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::FailingSource;
    use crate::repository::{InMemorySource, RepositoryError, RepositoryOperation};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        date: NaiveDate,
        owner: &'static str,
    }

    impl KeysetRecord for Row {
        fn keyset_date(&self) -> NaiveDate {
            self.date
        }

        fn keyset_id(&self) -> &str {
            &self.id
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn row(id: &str, d: u32) -> Row {
        Row { id: id.into(), date: day(d), owner: "u1" }
    }

    fn ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_cursor_round_trip() {
        let cursor = Cursor::new("e_01J5ZK/+?&=", day(9));
        let token = cursor.encode();
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert_eq!(Cursor::decode(&token), Some(cursor));
    }

    #[test]
    fn test_undecodable_cursor_is_none() {
        assert_eq!(Cursor::decode("***"), None);
        assert_eq!(Cursor::decode(&URL_SAFE_NO_PAD.encode("not json")), None);
        assert_eq!(Cursor::decode(""), None);
    }

    #[tokio::test]
    async fn test_three_rows_limit_two() {
        let source = InMemorySource::from_records(vec![row("c", 1), row("a", 3), row("b", 2)]);
        let all = FilterChain::new();

        let first = paginate_cursor(&source, &all, None, 2).await.unwrap();
        assert_eq!(ids(&first.items), vec!["a", "b"]);
        assert!(first.has_next_page);

        let token = first.next_cursor.expect("next cursor");
        assert_eq!(Cursor::decode(&token), Some(Cursor::new("b", day(2))));

        let second = paginate_cursor(&source, &all, Some(&token), 2).await.unwrap();
        assert_eq!(ids(&second.items), vec!["c"]);
        assert!(!second.has_next_page);
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_equal_dates_tie_break_on_id_without_duplicates() {
        let source = InMemorySource::from_records(vec![
            row("a", 5),
            row("c", 5),
            row("b", 5),
            row("d", 4),
        ]);
        let all = FilterChain::new();

        let first = paginate_cursor(&source, &all, None, 2).await.unwrap();
        assert_eq!(ids(&first.items), vec!["c", "b"]);

        let second = paginate_cursor(&source, &all, first.next_cursor.as_deref(), 2)
            .await
            .unwrap();
        assert_eq!(ids(&second.items), vec!["a", "d"]);
        assert!(!second.has_next_page);
    }

    #[tokio::test]
    async fn test_garbage_cursor_starts_over() {
        let source = InMemorySource::from_records(vec![row("a", 1), row("b", 2)]);
        let page = paginate_cursor(&source, &FilterChain::new(), Some("%%%"), 5)
            .await
            .unwrap();
        assert_eq!(ids(&page.items), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_upstream_filter_still_applies() {
        let mut other = row("z", 9);
        other.owner = "u2";
        let source = InMemorySource::from_records(vec![row("a", 1), other, row("b", 2)]);
        let mine = FilterChain::new().and(|r: &Row| r.owner == "u1");

        let page = paginate_cursor(&source, &mine, None, 0).await.unwrap();
        assert_eq!(ids(&page.items), vec!["b"]);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_collection_envelope() {
        let json = serde_json::to_value(CollectionResponse::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "items": [1, 2] }));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_returned_without_retry() {
        let error = RepositoryError::timeout(RepositoryOperation::Fetch, "deadline elapsed");
        let source = FailingSource::on_fetch(error.clone());
        let token = Cursor::new("b", day(2)).encode();

        let result = paginate_cursor::<Row, _>(&source, &FilterChain::new(), Some(&token), 2).await;

        assert_eq!(result.unwrap_err(), error);
        assert_eq!(source.fetch_calls(), 1);
        assert_eq!(source.count_calls(), 0);
    }
}
