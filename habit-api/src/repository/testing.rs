//! Record source that fails on demand, for error-path tests

use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::RepositoryError;
use super::pagination::Pagination;
use super::traits::{FilterChain, RecordSource, RepositoryResult};
use crate::sorting::OrderBy;

/// Empty [`RecordSource`] that returns the configured error from `count`
/// or `fetch` and counts how often each is called
#[derive(Debug, Default)]
pub(crate) struct FailingSource {
    count_error: Option<RepositoryError>,
    fetch_error: Option<RepositoryError>,
    count_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FailingSource {
    pub(crate) fn on_count(error: RepositoryError) -> Self {
        Self {
            count_error: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn on_fetch(error: RepositoryError) -> Self {
        Self {
            fetch_error: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl<S: Send> RecordSource<S> for FailingSource {
    async fn count(&self, _filter: &FilterChain<S>) -> RepositoryResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        match &self.count_error {
            Some(error) => Err(error.clone()),
            None => Ok(0),
        }
    }

    async fn fetch(
        &self,
        _filter: &FilterChain<S>,
        _order: &OrderBy<S>,
        _window: Option<Pagination>,
    ) -> RepositoryResult<Vec<S>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fetch_error {
            Some(error) => Err(error.clone()),
            None => Ok(Vec::new()),
        }
    }
}
