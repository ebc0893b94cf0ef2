//! Domain error taxonomy and its HTTP status mapping.

use crate::signaro::translate::TranslateError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Authentication token required.")]
    MissingToken,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("{0}")]
    NotFound(String),

    #[error("Translation endpoint not configured.")]
    TranslationUnavailable,

    #[error("Translation service failed: {0}")]
    TranslationFailed(String),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TranslationUnavailable => StatusCode::NOT_IMPLEMENTED,
            Self::TranslationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) | Self::Hash(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TranslateError> for Error {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::NotConfigured => Self::TranslationUnavailable,
            other => Self::TranslationFailed(other.to_string()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal detail stays in the logs, the client gets a generic message
        let message = if status.is_server_error() {
            error!("{self}");
            "Server error.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
