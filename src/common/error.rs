// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// The application error type, with `thiserror` for ergonomics. Services
// raise these synchronously; handlers only translate them to HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    PayloadValidation(#[from] validator::ValidationErrors),

    // Manual validation outside the derive (e.g. movement-kind rules).
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    // Carries how much could still be debited, so callers can report it.
    #[error("insufficient stock ({available} available)")]
    InsufficientStock { available: i64 },

    #[error("SKU '{0}' is already in use by this tenant")]
    DuplicateSku(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    // Catch-all for anything unexpected; `anyhow` keeps the context.
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field-level detail the validator produced.
            AppError::PayloadValidation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Validation(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InsufficientStock { available } => {
                let body = Json(json!({
                    "error": format!("Insufficient stock: only {} available.", available),
                    "available": available,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::NotFound(what) => {
                let body = Json(json!({ "error": format!("{} not found.", what) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::DuplicateSku(ref sku) => (
                StatusCode::CONFLICT,
                format!("SKU '{}' is already in use by this tenant.", sku),
            ),

            // Everything else (Database, Internal) becomes a 500. `tracing`
            // logs the detailed message `thiserror` gave us.
            ref e => {
                tracing::error!("internal server error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let cases = [
            (AppError::NotFound("inventory item"), StatusCode::NOT_FOUND),
            (
                AppError::InsufficientStock { available: 3 },
                StatusCode::CONFLICT,
            ),
            (AppError::DuplicateSku("X-1".into()), StatusCode::CONFLICT),
            (
                AppError::Validation("quantity must be positive".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
