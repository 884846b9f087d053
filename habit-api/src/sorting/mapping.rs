//! Public sort field to storage ordering key mappings

use std::fmt;
use std::marker::PhantomData;

use super::value::SortValue;

/// Extracts an ordering key from a storage record
pub type KeyFn<S> = fn(&S) -> SortValue;

/// A storage-level ordering key
pub struct SortKey<S> {
    /// Storage path the key reads (used for logging and by query-building sources)
    pub storage_path: &'static str,
    /// Key extractor for in-process ordering
    pub key: KeyFn<S>,
}

impl<S> SortKey<S> {
    pub const fn new(storage_path: &'static str, key: KeyFn<S>) -> Self {
        Self { storage_path, key }
    }
}

impl<S> Clone for SortKey<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SortKey<S> {}

impl<S> fmt::Debug for SortKey<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("storage_path", &self.storage_path)
            .finish()
    }
}

/// Maps a public sortable field onto a storage ordering key
///
/// With `reverse` set, the public field's ascending order is the storage
/// key's descending order. For example a public `age` field backed by a
/// stored date: youngest first means most recent date first.
pub struct SortMapping<S> {
    pub public_field: &'static str,
    pub storage: SortKey<S>,
    pub reverse: bool,
}

impl<S> SortMapping<S> {
    pub const fn new(public_field: &'static str, storage_path: &'static str, key: KeyFn<S>) -> Self {
        Self {
            public_field,
            storage: SortKey::new(storage_path, key),
            reverse: false,
        }
    }

    /// Mapping whose direction is inverted relative to storage
    pub const fn reversed(
        public_field: &'static str,
        storage_path: &'static str,
        key: KeyFn<S>,
    ) -> Self {
        Self {
            public_field,
            storage: SortKey::new(storage_path, key),
            reverse: true,
        }
    }

    /// ASCII case-insensitive match against a requested field name
    pub fn matches(&self, field: &str) -> bool {
        self.public_field.eq_ignore_ascii_case(field)
    }
}

impl<S> Clone for SortMapping<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SortMapping<S> {}

impl<S> fmt::Debug for SortMapping<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortMapping")
            .field("public_field", &self.public_field)
            .field("storage_path", &self.storage.storage_path)
            .field("reverse", &self.reverse)
            .finish()
    }
}

/// All sort mappings from public shape `P` onto storage record `S`
///
/// The default key is the ascending order used when a request carries no
/// sort expression; it keeps offset pagination deterministic.
pub struct SortMappingDefinition<P, S> {
    mappings: Vec<SortMapping<S>>,
    default_key: SortKey<S>,
    _public: PhantomData<fn() -> P>,
}

impl<P, S> SortMappingDefinition<P, S> {
    pub fn new(mappings: Vec<SortMapping<S>>, default_key: SortKey<S>) -> Self {
        Self {
            mappings,
            default_key,
            _public: PhantomData,
        }
    }

    pub fn mappings(&self) -> &[SortMapping<S>] {
        &self.mappings
    }

    pub fn default_key(&self) -> SortKey<S> {
        self.default_key
    }

    /// See [`validate_mappings`]
    pub fn validate(&self, sort: Option<&str>) -> bool {
        validate_mappings(sort, &self.mappings)
    }
}

impl<P, S> fmt::Debug for SortMappingDefinition<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortMappingDefinition")
            .field("public", &std::any::type_name::<P>())
            .field("storage", &std::any::type_name::<S>())
            .field("mappings", &self.mappings)
            .field("default_key", &self.default_key)
            .finish()
    }
}

/// Split a sort expression into its non-empty, trimmed terms
pub(crate) fn sort_terms(sort: &str) -> impl Iterator<Item = &str> {
    sort.split(',').map(str::trim).filter(|term| !term.is_empty())
}

/// Check that every term of a sort expression names a mapped public field
///
/// An absent or blank expression is valid. Only the leading
/// whitespace-delimited token of each term is checked, so `"date desc"` and
/// `"date"` validate identically.
pub fn validate_mappings<S>(sort: Option<&str>, mappings: &[SortMapping<S>]) -> bool {
    let Some(sort) = sort else {
        return true;
    };

    sort_terms(sort)
        .filter_map(|term| term.split_whitespace().next())
        .all(|field| mappings.iter().any(|m| m.matches(field)))
}
