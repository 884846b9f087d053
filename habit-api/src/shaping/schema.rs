//! Resource field schemas and requested field sets

use std::any::{type_name, TypeId};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serde_json::Value;

/// A resource that can be projected onto a sparse set of its public fields
///
/// Field names are expected to be ASCII. Requested names are matched with
/// ASCII case folding only, so `ÉTAT` does not select a field named `état`.
pub trait Shapeable: 'static {
    /// Public field names, in the order they are emitted
    fn describe_fields() -> Vec<&'static str>;

    /// Current value of a public field, by its exact declared name
    fn field_value(&self, name: &str) -> Option<Value>;
}

static SCHEMAS: LazyLock<DashMap<TypeId, Arc<ResourceSchema>>> = LazyLock::new(DashMap::new);

/// Ordered public field names of one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    resource: &'static str,
    fields: Vec<&'static str>,
}

impl ResourceSchema {
    /// Schema for `T`, computed on first use and cached for the process lifetime
    pub fn of<T: Shapeable>() -> Arc<Self> {
        SCHEMAS
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                tracing::debug!(resource = type_name::<T>(), "Caching resource schema");
                Arc::new(Self {
                    resource: type_name::<T>(),
                    fields: T::describe_fields(),
                })
            })
            .clone()
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Declared name matching `name` case-insensitively
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .copied()
            .find(|field| field.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

/// ASCII case-insensitive set of requested field names
///
/// Empty means "every field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
}

impl FieldSet {
    /// Parse a comma-separated field list; blank tokens are dropped
    pub fn parse(fields: Option<&str>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for token in fields.unwrap_or_default().split(',') {
            let token = token.trim().to_ascii_lowercase();
            if !token.is_empty() && !names.contains(&token) {
                names.push(token);
            }
        }
        Self { names }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Requested names (lowercased), in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl Shapeable for Widget {
        fn describe_fields() -> Vec<&'static str> {
            vec!["id", "name", "type"]
        }

        fn field_value(&self, _name: &str) -> Option<Value> {
            None
        }
    }

    #[test]
    fn test_schema_is_cached_per_type() {
        let first = ResourceSchema::of::<Widget>();
        let second = ResourceSchema::of::<Widget>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.fields(), &["id", "name", "type"]);
        assert!(first.resource().ends_with("Widget"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let schema = ResourceSchema::of::<Widget>();
        assert_eq!(schema.resolve("NAME"), Some("name"));
        assert!(!schema.contains("color"));
    }

    #[test]
    fn test_field_set_parse() {
        let set = FieldSet::parse(Some(" Id, ,NAME,name,"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(set.contains("Name"));
        assert!(!set.contains("type"));
    }

    #[test]
    fn test_empty_field_set_means_all() {
        assert!(FieldSet::parse(None).is_empty());
        assert!(FieldSet::parse(Some("  , ")).is_empty());
        assert_eq!(FieldSet::all(), FieldSet::parse(Some("")));
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        let fields = FieldSet::parse(Some("HABITID,ÉTAT"));
        assert!(fields.contains("habitId"));
        assert!(!fields.contains("état"));
    }
}
