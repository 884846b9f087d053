//! Record source abstraction consumed by the pagination engine
//!
//! The list pipeline needs exactly four things from storage: apply filter
//! predicates, apply an ordering, take a skip/take slice, and count
//! matches. [`RecordSource`] expresses those as async methods returning
//! `impl Future`.
//!
//! # Example
//!
//! ```rust,ignore
//! use habit_api::repository::{FilterChain, Pagination, RecordSource, RepositoryResult};
//! use habit_api::sorting::OrderBy;
//!
//! struct EntryTable { pool: PgPool }
//!
//! impl RecordSource<Entry> for EntryTable {
//!     async fn count(&self, filter: &FilterChain<Entry>) -> RepositoryResult<u64> {
//!         // translate the filter into a WHERE clause ...
//!     }
//!
//!     async fn fetch(
//!         &self,
//!         filter: &FilterChain<Entry>,
//!         order: &OrderBy<Entry>,
//!         window: Option<Pagination>,
//!     ) -> RepositoryResult<Vec<Entry>> {
//!         // ... and the order terms' storage paths into ORDER BY
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::error::RepositoryError;
use super::pagination::Pagination;
use crate::sorting::OrderBy;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

type Predicate<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Ordered conjunction of caller-supplied predicates
///
/// Offset and cursor pagination are both composed on top of the same chain,
/// so owner scoping and domain filters apply identically to either.
pub struct FilterChain<S> {
    predicates: Vec<Predicate<S>>,
}

impl<S> FilterChain<S> {
    /// A chain that matches every record
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Require `predicate` in addition to everything already in the chain
    #[must_use]
    pub fn and<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Add a predicate built from an optional filter value
    ///
    /// Absent values leave the chain unchanged.
    #[must_use]
    pub fn and_if<T, F>(self, value: Option<T>, predicate: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&S, &T) -> bool + Send + Sync + 'static,
    {
        match value {
            Some(value) => self.and(move |record| predicate(record, &value)),
            None => self,
        }
    }

    pub fn matches(&self, record: &S) -> bool {
        self.predicates.iter().all(|predicate| predicate(record))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<S> Clone for FilterChain<S> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<S> Default for FilterChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for FilterChain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Filterable, orderable, sliceable, countable storage for records of type `S`
///
/// Failures are returned as [`RepositoryError`] and never retried by the
/// pipeline.
pub trait RecordSource<S>: Send + Sync {
    /// Count records matching `filter`, ignoring any slice
    fn count(&self, filter: &FilterChain<S>)
        -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Fetch records matching `filter`, ordered by `order`, then sliced by `window`
    ///
    /// `None` for `window` returns every match.
    fn fetch(
        &self,
        filter: &FilterChain<S>,
        order: &OrderBy<S>,
        window: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<S>>> + Send;
}
