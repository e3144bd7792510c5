use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {source}")]
    Database {
        public: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("Resource not found: {0}")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    Validation(&'static str),
}

impl AppError {
    /// Wraps a store failure with the fixed message the caller is allowed
    /// to see. Meant for `map_err(AppError::db("..."))` at the call site.
    pub fn db(public: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Database { public, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database { public, source } => {
                tracing::error!("{}: {}", public, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": public })),
                )
                    .into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            // Validation failures use the `message` key, matching the
            // request-contract shape rather than the error shape.
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
        }
    }
}
