//! Query types for list and item operations
//!
//! These carry the resource-agnostic part of a list request: paging,
//! sorting and field selection. Resource filters are deserialized into a
//! separate struct from the same query string.
//!
//! # Example
//!
//! ```rust
//! use habit_api::config::PaginationConfig;
//! use habit_api::handlers::ListQuery;
//!
//! let query: ListQuery = serde_json::from_str(r#"{"page": 0, "pageSize": 5}"#).unwrap();
//! let request = query.page_request(&PaginationConfig::default());
//!
//! assert_eq!(request.page, 1);
//! assert_eq!(request.page_size, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::handlers::ApiError;
use crate::pagination::PageRequest;
use crate::shaping::{DataShaper, Shapeable};
use crate::sorting::SortMappingRegistry;

/// Offset-paginated list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-based page number
    #[serde(default)]
    pub page: Option<i64>,

    #[serde(default)]
    pub page_size: Option<i64>,

    /// Comma-separated `field [asc|desc]` terms
    #[serde(default)]
    pub sort: Option<String>,

    /// Comma-separated public field names
    #[serde(default)]
    pub fields: Option<String>,
}

impl ListQuery {
    /// Page request with configured defaults filled in and values clamped to 1
    pub fn page_request(&self, defaults: &PaginationConfig) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(i64::from(defaults.default_page)),
            self.page_size.unwrap_or(i64::from(defaults.default_page_size)),
        )
    }

    /// Reject an unmapped sort field, then an unknown field name
    ///
    /// A missing sort registration for `(P, S)` is a server error, not a
    /// client one.
    pub fn validate<P, S>(&self, registry: &SortMappingRegistry) -> Result<(), ApiError>
    where
        P: Shapeable,
        S: 'static,
    {
        if !registry.validate::<P, S>(self.sort.as_deref())? {
            return Err(ApiError::invalid_parameter(
                "sort",
                self.sort.as_deref().unwrap_or_default(),
            ));
        }
        validate_fields::<P>(self.fields.as_deref())
    }
}

/// Keyset-paginated list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorQuery {
    /// Opaque token from a previous page's `nextCursor`
    #[serde(default)]
    pub cursor: Option<String>,

    #[serde(default)]
    pub limit: Option<i64>,

    #[serde(default)]
    pub fields: Option<String>,
}

impl CursorQuery {
    pub fn limit(&self, defaults: &PaginationConfig) -> i64 {
        self.limit.unwrap_or(i64::from(defaults.default_limit))
    }

    pub fn validate<P: Shapeable>(&self) -> Result<(), ApiError> {
        validate_fields::<P>(self.fields.as_deref())
    }
}

/// Single-resource parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub fields: Option<String>,
}

impl ItemQuery {
    pub fn validate<P: Shapeable>(&self) -> Result<(), ApiError> {
        validate_fields::<P>(self.fields.as_deref())
    }
}

fn validate_fields<P: Shapeable>(fields: Option<&str>) -> Result<(), ApiError> {
    if DataShaper::validate::<P>(fields) {
        Ok(())
    } else {
        Err(ApiError::invalid_parameter("fields", fields.unwrap_or_default()))
    }
}
