use crate::types::DbId;
use crate::validation::Violations;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// One or more input fields violate an entity constraint.
    #[error("Validation failed: {0}")]
    Validation(Violations),

    /// An operation is blocked by dependent rows (e.g. a category that still
    /// owns issues).
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<Violations> for CoreError {
    fn from(violations: Violations) -> Self {
        CoreError::Validation(violations)
    }
}
