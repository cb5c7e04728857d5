//! Use cases behind the HTTP routes. Services are generic over the repository
//! traits so they can be exercised with `MockRepository`.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod leads;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request data failed validation.
    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("Lead not found")]
    NotFound,

    #[error("{0}")]
    Repository(RepositoryError),

    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_becomes_service_not_found() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
    }

    #[test]
    fn store_messages_are_kept_verbatim() {
        let err = ServiceError::from(RepositoryError::DatabaseError("disk I/O error".into()));
        assert_eq!(err.to_string(), "Database error: disk I/O error");
    }
}
