//! Pagination strategies
//!
//! Two mutually exclusive contracts over the same filtered source:
//!
//! - offset: `page`/`pageSize` with a total count ([`paginate_offset`])
//! - keyset: opaque `cursor`/`limit` over `(date desc, id desc)` ([`paginate_cursor`])

mod cursor;
mod offset;

pub use cursor::{keyset_order, paginate_cursor, CollectionResponse, Cursor, CursorPage, KeysetRecord};
pub use offset::{paginate_offset, PageRequest, PaginationResult};
