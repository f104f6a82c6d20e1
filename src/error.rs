use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde_json::json;

/// A field or cross-field constraint the client input violates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the declaration store and the HTTP handlers.
///
/// Domain errors (`Validation`, `NotFound`) carry client-facing messages.
/// `Storage` keeps the underlying database error for the server log only.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Health declaration with ID {0} not found")]
    NotFound(String),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: DbErr,
    },

    /// Request could not be decoded (malformed body, bad query string).
    #[error("{0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wraps a database failure, logging the underlying error.
    pub fn storage(context: &'static str) -> impl FnOnce(DbErr) -> AppError {
        move |source| {
            tracing::error!(error = %source, "{}", context);
            AppError::Storage { context, source }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Validation(err) => {
                metrics::counter!("health_declarations_validation_failures_total", "field" => err.field)
                    .increment(1);
                tracing::Span::current().record("error", tracing::field::display(err));
                json!({
                    "statusCode": status.as_u16(),
                    "error": "Bad Request",
                    "message": err.message,
                    "field": err.field,
                })
            }
            AppError::BadRequest(msg) => json!({
                "statusCode": status.as_u16(),
                "error": "Bad Request",
                "message": msg,
            }),
            AppError::NotFound(_) => json!({
                "statusCode": status.as_u16(),
                "error": "Not Found",
                "message": self.to_string(),
            }),
            // Already logged with full detail in `AppError::storage`.
            AppError::Storage { context, source } => {
                tracing::Span::current().record("error", tracing::field::display(source));
                json!({
                    "statusCode": status.as_u16(),
                    "error": "Internal Server Error",
                    "message": context,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
