//! Slice and ordering primitives shared by every record source
//!
//! # Example
//!
//! ```rust
//! use habit_api::repository::{OrderDirection, Pagination};
//!
//! let window = Pagination::page(3, 20);
//! assert_eq!(window.offset, 40);
//! assert_eq!(window.limit, 20);
//! assert_eq!(OrderDirection::Descending.to_string(), "desc");
//! ```

use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0, newest first)
    Descending,
}

impl OrderDirection {
    /// Build a direction from a "descending?" flag
    #[must_use]
    pub const fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Whether this direction is descending
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        matches!(self, Self::Descending)
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Skip/take window applied after filtering and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create a new window
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window over the first `limit` results
    #[must_use]
    pub const fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }

    /// Window for a 1-indexed page number
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}
