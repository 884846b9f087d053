//! Sparse field projection

use serde_json::{Map, Value};

use super::schema::{FieldSet, ResourceSchema, Shapeable};
use crate::links::{links_to_json, Link};

/// Insertion-ordered JSON object holding a shaped resource
pub type ShapedObject = Map<String, Value>;

/// Reserved key under which links are attached
pub const LINKS_KEY: &str = "links";

/// Field validation and projection for any [`Shapeable`] resource
pub struct DataShaper;

impl DataShaper {
    /// True when `fields` is absent or blank, or every token names a field of `T`
    pub fn validate<T: Shapeable>(fields: Option<&str>) -> bool {
        Self::validate_set::<T>(&FieldSet::parse(fields))
    }

    pub fn validate_set<T: Shapeable>(fields: &FieldSet) -> bool {
        let schema = ResourceSchema::of::<T>();
        fields.iter().all(|name| schema.contains(name))
    }

    /// Project `item` onto the requested fields, in schema order
    ///
    /// Tokens that match nothing are ignored here; rejecting them is
    /// [`validate`](Self::validate)'s job.
    pub fn shape<T: Shapeable>(item: &T, fields: &FieldSet) -> ShapedObject {
        let schema = ResourceSchema::of::<T>();
        schema
            .fields()
            .iter()
            .filter(|field| fields.is_empty() || fields.contains(field))
            .map(|field| {
                let value = item.field_value(field).unwrap_or(Value::Null);
                ((*field).to_string(), value)
            })
            .collect()
    }

    /// Shape every item, attaching `link_factory`'s links under `links` when given
    pub fn shape_collection<T: Shapeable>(
        items: &[T],
        fields: &FieldSet,
        link_factory: Option<&dyn Fn(&T) -> Vec<Link>>,
    ) -> Vec<ShapedObject> {
        items
            .iter()
            .map(|item| match link_factory {
                Some(links_for) => shape_with_links(item, fields, &links_for(item)),
                None => Self::shape(item, fields),
            })
            .collect()
    }
}

/// Shape a single item and append `links` after its fields
pub fn shape_with_links<T: Shapeable>(item: &T, fields: &FieldSet, links: &[Link]) -> ShapedObject {
    let mut shaped = DataShaper::shape(item, fields);
    shaped.insert(LINKS_KEY.to_string(), links_to_json(links));
    shaped
}
