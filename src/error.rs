use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DashError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    DuplicateUsername,
}

impl IntoResponse for DashError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            DashError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password.")
            }
            DashError::DuplicateUsername => {
                (StatusCode::CONFLICT, "That username is already taken.")
            }
            DashError::Reqwest(_) | DashError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                "An upstream service is unavailable.",
            ),
            DashError::Json(_)
            | DashError::Database(_)
            | DashError::PasswordHash(_)
            | DashError::Chart(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.",
            ),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = format!(
            "<!DOCTYPE html><html><body><h1>{}</h1><p>{}</p></body></html>",
            status, message
        );
        (status, Html(body)).into_response()
    }
}
