use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtracker_core::error::CoreError;
use bugtracker_core::types::DbId;
use bugtracker_core::validation::Violations;
use serde_json::json;

/// Error type returned by services and handlers.
///
/// Every variant renders as `{"error": <message>, "code": <CODE>}`;
/// validation failures add a `"fields"` array of per-field messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }.into()
    }
}

impl From<Violations> for AppError {
    fn from(violations: Violations) -> Self {
        CoreError::Validation(violations).into()
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Status, machine-readable code and client-facing message of an error.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_MESSAGE,
        )
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(_) => ErrorParts::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            "Validation failed",
        ),
        CoreError::Integrity(msg) => {
            ErrorParts::new(StatusCode::CONFLICT, "INTEGRITY_ERROR", msg.as_str())
        }
        CoreError::Conflict(msg) => ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(msg) => {
            ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.as_str())
        }
        CoreError::Forbidden(msg) => {
            ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str())
        }
    }
}

/// Map storage failures onto client errors where the schema explains them.
///
/// | Failure                               | Status | Code              |
/// |---------------------------------------|--------|-------------------|
/// | `RowNotFound`                         | 404    | `NOT_FOUND`       |
/// | 23505 on a `uq_` constraint           | 409    | `CONFLICT`        |
/// | 23503 (issue rows block a category)   | 409    | `INTEGRITY_ERROR` |
/// | 23514 (a `ck_` CHECK constraint)      | 422    | `VALIDATION_ERROR`|
/// | anything else                         | 500    | `INTERNAL_ERROR`  |
fn database_parts(err: &sqlx::Error) -> ErrorParts {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return ErrorParts::internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some("23505") if constraint == "uq_admin_users_email" => ErrorParts::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "An admin user with this email already exists",
        ),
        Some("23505") if constraint.starts_with("uq_") => ErrorParts::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some("23503") => ErrorParts::new(
            StatusCode::CONFLICT,
            "INTEGRITY_ERROR",
            "The record is still referenced by other records",
        ),
        Some("23514") => ErrorParts::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            format!("Value rejected by constraint: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            ErrorParts::internal()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let body = match self {
            AppError::Core(CoreError::Validation(violations)) => {
                tracing::debug!(%violations, "Validation failed");
                json!({ "error": parts.message, "code": parts.code, "fields": violations })
            }
            _ => json!({ "error": parts.message, "code": parts.code }),
        };

        (parts.status, Json(body)).into_response()
    }
}
