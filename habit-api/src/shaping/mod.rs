//! Sparse field selection ("data shaping")
//!
//! Every resource exposed through a list endpoint implements [`Shapeable`],
//! describing its public fields once. Requests carrying a `fields` parameter
//! are validated with [`DataShaper::validate`] before any query runs, and the
//! resulting items are projected with [`DataShaper::shape`].

mod schema;
mod shaper;

pub use schema::{FieldSet, ResourceSchema, Shapeable};
pub use shaper::{shape_with_links, DataShaper, ShapedObject, LINKS_KEY};
