//! Library error types
//!
//! Two families of failure exist: validation of user input, and
//! persistence. Lookups of unknown ids get their own variants so callers can
//! report them without string matching.

use thiserror::Error;

use crate::storage::StorageError;

/// Rejected user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("URL is required")]
    EmptyUrl,

    #[error("Category name is required")]
    EmptyCategoryName,

    #[error("A category named '{0}' already exists")]
    DuplicateCategoryName(String),
}

/// Errors returned by [`crate::LinkCollection`]
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Link not found: {0}")]
    LinkNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

impl Error {
    /// True when the error came from rejected input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type for collection operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::from(ValidationError::DuplicateCategoryName("Work".into()));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "A category named 'Work' already exists");
    }

    #[test]
    fn test_not_found_is_not_validation() {
        let err = Error::LinkNotFound("abc".into());
        assert!(!err.is_validation());
        assert!(err.to_string().contains("abc"));
    }
}
