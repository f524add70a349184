//! Error types for the microblog service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use std::fmt;

/// Service error type.
///
/// Validation failures are not represented here; they re-render the
/// submitted form with field-level messages instead.
#[derive(Debug)]
pub enum Error {
    /// Requested entity does not exist.
    NotFound,
    /// Request requires a logged-in user. Carries the originally requested
    /// path so login can return there.
    Unauthenticated { next: String },
    /// Current user is not the post's author. Recovered silently by
    /// redirecting to the post's detail view.
    NotOwner { post_id: i64 },
    /// Underlying store failure.
    Database(sqlx::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "not found"),
            Error::Unauthenticated { next } => {
                write!(f, "authentication required for {next}")
            }
            Error::NotOwner { post_id } => {
                write!(f, "not the author of post {post_id}")
            }
            Error::Database(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Database(e)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => {
                let body = serde_json::json!({
                    "success": false,
                    "error": "not found"
                });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            Error::Unauthenticated { next } => {
                Redirect::to(&format!("/auth/login/?next={next}")).into_response()
            }
            Error::NotOwner { post_id } => {
                Redirect::to(&format!("/posts/{post_id}/")).into_response()
            }
            Error::Database(e) => {
                tracing::error!(error = %e, "Store failure");
                let body = serde_json::json!({
                    "success": false,
                    "error": "internal error"
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
