//! Application state management

use std::sync::Arc;

use crate::{
    cache::{EtagStore, InMemoryEtagStore},
    config::Config,
    entries::{self, Entry},
    error::Result,
    links::LinkBuilder,
    repository::InMemorySource,
    sorting::SortMappingRegistry,
};

/// Application state shared across handlers
///
/// Cloning is cheap; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    sort_mappings: Arc<SortMappingRegistry>,
    etag_store: Arc<dyn EtagStore>,
    entries: InMemorySource<Entry>,
    links: Arc<LinkBuilder>,
}

impl AppState {
    /// State with an empty entry table and an in-memory version store
    pub fn new(config: Config) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sort_mappings(&self) -> &SortMappingRegistry {
        &self.sort_mappings
    }

    pub fn etag_store(&self) -> &Arc<dyn EtagStore> {
        &self.etag_store
    }

    pub fn entries(&self) -> &InMemorySource<Entry> {
        &self.entries
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .field("sort_mappings", &self.sort_mappings)
            .finish_non_exhaustive()
    }
}

/// Builder for AppState
///
/// Sort mappings for every resource are registered here, once, before the
/// state is shared.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    etag_store: Option<Arc<dyn EtagStore>>,
    entries: Option<InMemorySource<Entry>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Share a version store with the conditional request layer
    pub fn etag_store(mut self, store: Arc<dyn EtagStore>) -> Self {
        self.etag_store = Some(store);
        self
    }

    /// Start from an existing entry table
    pub fn entries(mut self, entries: InMemorySource<Entry>) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Fails when `service.public_base_url` is not an absolute URL
    pub fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();
        let links = LinkBuilder::new(&config.service.public_base_url)?;

        let mut sort_mappings = SortMappingRegistry::new();
        sort_mappings.register(entries::sort_mappings());

        tracing::debug!(
            registrations = sort_mappings.len(),
            base_url = %config.service.public_base_url,
            "Application state built"
        );

        Ok(AppState {
            config: Arc::new(config),
            sort_mappings: Arc::new(sort_mappings),
            etag_store: self
                .etag_store
                .unwrap_or_else(|| Arc::new(InMemoryEtagStore::new())),
            entries: self.entries.unwrap_or_default(),
            links: Arc::new(links),
        })
    }
}
