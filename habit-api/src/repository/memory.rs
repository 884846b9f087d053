//! In-process record source

use std::sync::Arc;

use tokio::sync::RwLock;

use super::pagination::Pagination;
use super::traits::{FilterChain, RecordSource, RepositoryResult};
use crate::sorting::OrderBy;

/// A [`RecordSource`] over a vector guarded by an async read/write lock
///
/// Cloning shares the underlying storage.
#[derive(Debug)]
pub struct InMemorySource<S> {
    records: Arc<RwLock<Vec<S>>>,
}

impl<S> Clone for InMemorySource<S> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S> Default for InMemorySource<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> InMemorySource<S> {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<S>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn insert(&self, record: S) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<S: Clone> InMemorySource<S> {
    /// First record matching `predicate`
    pub async fn find_by<F>(&self, predicate: F) -> Option<S>
    where
        F: Fn(&S) -> bool,
    {
        self.records.read().await.iter().find(|r| predicate(r)).cloned()
    }

    /// Apply `update` to the first record matching `predicate`, returning the result
    pub async fn update_by<P, U>(&self, predicate: P, update: U) -> Option<S>
    where
        P: Fn(&S) -> bool,
        U: FnOnce(&mut S),
    {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| predicate(r))?;
        update(record);
        Some(record.clone())
    }

    /// Remove the first record matching `predicate`
    pub async fn remove_by<F>(&self, predicate: F) -> Option<S>
    where
        F: Fn(&S) -> bool,
    {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| predicate(r))?;
        Some(records.remove(index))
    }
}

impl<S> RecordSource<S> for InMemorySource<S>
where
    S: Clone + Send + Sync,
{
    async fn count(&self, filter: &FilterChain<S>) -> RepositoryResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: &FilterChain<S>,
        order: &OrderBy<S>,
        window: Option<Pagination>,
    ) -> RepositoryResult<Vec<S>> {
        let mut matched: Vec<S> = {
            let records = self.records.read().await;
            records.iter().filter(|r| filter.matches(r)).cloned().collect()
        };

        order.sort_slice(&mut matched);

        let Some(window) = window else {
            return Ok(matched);
        };

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }
}
