//! API error types for handler operations
//!
//! Structured errors for REST handlers, with HTTP status mapping via
//! `IntoResponse`. Invalid query parameters name the offending parameter.
//!
//! # Example
//!
//! ```rust
//! use habit_api::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::invalid_parameter("sort", "colour desc");
//! assert!(matches!(error.kind, ApiErrorKind::BadRequest));
//! assert_eq!(error.parameter.as_deref(), Some("sort"));
//! assert_eq!(error.message, "The provided sort parameter isn't valid: 'colour desc'");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::repository::RepositoryError;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Offset-paginated listing
    List,
    /// Keyset-paginated listing
    ListCursor,
    /// Getting a single resource by ID
    Get,
    /// Creating a resource
    Create,
    /// Replacing a resource
    Update,
    /// Deleting a resource
    Delete,
    /// Archiving or un-archiving a resource
    Archive,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::ListCursor => write!(f, "list_cursor"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Archive => write!(f, "archive"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Resource was not found
    NotFound,
    /// Caller could not be identified
    Unauthorized,
    /// Invalid request format or parameters
    BadRequest,
    /// Wiring or storage failure on our side
    InternalError,
    /// Storage temporarily unreachable
    ServiceUnavailable,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::InternalError => write!(f, "internal_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
        }
    }
}

impl ApiErrorKind {
    /// HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::InternalError | Self::ServiceUnavailable)
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Query parameter that was rejected, for 400s
    pub parameter: Option<String>,
    /// The type of resource involved (e.g. "Entry")
    pub entity_type: Option<String>,
    /// The ID of the resource involved
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            parameter: None,
            entity_type: None,
            entity_id: None,
        }
    }

    /// "Not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    /// 400 naming a query parameter and the value it carried
    pub fn invalid_parameter(parameter: &str, value: &str) -> Self {
        Self {
            parameter: Some(parameter.to_string()),
            ..Self::new(
                ApiOperation::List,
                ApiErrorKind::BadRequest,
                format!("The provided {parameter} parameter isn't valid: '{value}'"),
            )
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if self.kind.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                parameter = ?self.parameter,
                "Request rejected: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            parameter: self.parameter,
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let kind = if err.is_transient() {
            ApiErrorKind::ServiceUnavailable
        } else {
            ApiErrorKind::InternalError
        };

        // Internal details stay in the logs
        let message = match kind {
            ApiErrorKind::ServiceUnavailable => "Service temporarily unavailable",
            _ => "An internal error occurred",
        };

        tracing::error!(
            operation = %err.operation,
            kind = %err.kind,
            "Storage failure: {}", err.message
        );

        Self::new(ApiOperation::List, kind, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Repository(e) => e.into(),
            Error::Unauthorized(msg) => Self::unauthorized(msg),
            Error::NotFound(msg) => Self::new(ApiOperation::Get, ApiErrorKind::NotFound, msg),
            Error::BadRequest(msg) => Self::bad_request(msg),
            other => {
                tracing::error!("Server-side failure: {}", other);
                Self::internal("An internal error occurred")
            }
        }
    }
}
