use serde::Serialize;

use crate::services::leads::DeleteOutcome;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `DELETE /leads/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub requested: usize,
    pub deleted: usize,
}

impl DeleteResponse {
    /// Builds the confirmation message. `batch` selects the plural wording used
    /// for comma separated requests.
    pub fn new(outcome: DeleteOutcome, batch: bool) -> Self {
        let message = if batch {
            format!("{} leads deleted successfully", outcome.deleted)
        } else {
            "Lead deleted successfully".to_string()
        };

        Self {
            message,
            requested: outcome.requested,
            deleted: outcome.deleted,
        }
    }
}
