//! Repository error types
//!
//! Failures reported by the storage collaborator. The list-query pipeline
//! never retries these; they propagate to the caller as fatal errors.
//!
//! # Example
//!
//! ```rust
//! use habit_api::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::timeout(RepositoryOperation::Count, "deadline elapsed");
//! assert!(matches!(error.kind, RepositoryErrorKind::Timeout));
//! assert!(error.is_transient());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Fetching an ordered slice of records
    Fetch,
    /// Counting matching records
    Count,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// The underlying query could not be executed
    QueryFailed,
    /// The source could not be reached
    Unavailable,
    /// The caller's deadline elapsed while waiting on the source
    Timeout,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a query failure
    pub fn query_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::QueryFailed, message)
    }

    /// Create an "unavailable" error
    pub fn unavailable(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Unavailable, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Whether the same call might succeed later
    ///
    /// Only used to choose between 503 and 500.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::Unavailable | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::Fetch), "fetch");
        assert_eq!(format!("{}", RepositoryOperation::Count), "count");
    }

    #[test]
    fn test_transient_kinds() {
        assert!(RepositoryError::unavailable(RepositoryOperation::Fetch, "down").is_transient());
        assert!(RepositoryError::timeout(RepositoryOperation::Count, "slow").is_transient());
        assert!(!RepositoryError::query_failed(RepositoryOperation::Fetch, "bad").is_transient());
    }

    #[test]
    fn test_display() {
        let error = RepositoryError::timeout(RepositoryOperation::Count, "deadline elapsed");
        assert_eq!(
            error.to_string(),
            "Repository timeout error during count: deadline elapsed"
        );
    }
}
