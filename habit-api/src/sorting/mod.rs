//! Dynamic multi-field sorting
//!
//! Public sortable field names are translated into storage ordering keys
//! through registered [`SortMappingDefinition`]s. A request's `sort`
//! expression is first checked with [`validate_mappings`] (a client error
//! when invalid) and then turned into an [`OrderBy`] with [`apply_sort`].
//!
//! # Example
//!
//! ```rust
//! use habit_api::sorting::{apply_sort, validate_mappings, SortKey, SortMapping};
//!
//! struct Row { id: String, created: i64 }
//!
//! let mappings = vec![
//!     SortMapping::new("created", "created", |r: &Row| r.created.into()),
//!     SortMapping::reversed("age", "created", |r: &Row| r.created.into()),
//! ];
//! let default_key = SortKey::new("id", |r: &Row| r.id.clone().into());
//!
//! assert!(validate_mappings(Some("age desc"), &mappings));
//!
//! let order = apply_sort(Some("age"), &mappings, default_key).unwrap();
//! let mut rows = vec![
//!     Row { id: "a".into(), created: 1 },
//!     Row { id: "b".into(), created: 2 },
//! ];
//! order.sort_slice(&mut rows);
//! assert_eq!(rows[0].id, "b");
//! ```

mod apply;
mod mapping;
mod registry;
mod value;

pub use apply::{apply_sort, OrderBy, OrderTerm, SortTerm};
pub use mapping::{validate_mappings, KeyFn, SortKey, SortMapping, SortMappingDefinition};
pub use registry::SortMappingRegistry;
pub use value::SortValue;
