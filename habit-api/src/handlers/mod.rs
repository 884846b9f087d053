//! Shared building blocks for REST handlers
//!
//! - [`ApiError`]: structured handler errors with status mapping
//! - [`ListQuery`], [`CursorQuery`], [`ItemQuery`]: paging, sorting and
//!   field selection parameters with validation
//! - [`Owner`]: the authenticated caller every query is scoped to

mod error;
mod owner;
mod query;

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use owner::{Owner, USER_ID_HEADER};
pub use query::{CursorQuery, ItemQuery, ListQuery};
