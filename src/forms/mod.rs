//! Request payloads accepted by the leads routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod leads;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("missing required fields: {}", missing_fields(.0))]
    Validation(#[from] ValidationErrors),

    #[error("invalid name: {0}")]
    InvalidName(TypeConstraintError),

    #[error("invalid email: {0}")]
    InvalidEmail(TypeConstraintError),

    #[error("invalid company: {0}")]
    InvalidCompany(TypeConstraintError),

    #[error("invalid initials: {0}")]
    InvalidInitials(TypeConstraintError),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(TypeConstraintError),

    #[error("invalid sort: {0}")]
    InvalidSort(TypeConstraintError),

    #[error("invalid lead id list `{0}`")]
    InvalidLeadIds(String),
}

fn missing_fields(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort_unstable();
    fields.join(", ")
}
