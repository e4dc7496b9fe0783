// Authentication error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors produced by the credential and session lifecycle
///
/// Every variant maps to a status code and a small `{"message": ...}` body.
/// Internal details carried by the 500-class variants are logged, never sent.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client input incomplete or unparsable
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No `Authorization: Bearer <token>` header on a protected request
    #[error("Missing authentication token")]
    MissingToken,

    /// Token is malformed, tampered with or expired
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated user no longer exists
    #[error("User not found")]
    NotFound,

    /// Image host rejected or failed the upload
    #[error("Upload error: {0}")]
    UploadError(String),

    /// Storage fault, including unique email violations
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// Password hashing failed internally
    #[error("Password hashing error: {0}")]
    HashingError(String),

    /// Token could not be signed
    #[error("Token generation error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::UploadError(_)
            | AuthError::PersistenceError(_)
            | AuthError::HashingError(_)
            | AuthError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to send to clients
    ///
    /// Both token failures share one message so a caller cannot tell a
    /// missing header from a rejected token.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::MissingToken | AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::NotFound => "User not found".to_string(),
            AuthError::UploadError(_) => "Error uploading profile image".to_string(),
            AuthError::PersistenceError(_)
            | AuthError::HashingError(_)
            | AuthError::TokenError(_) => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            AuthError::ValidationError(msg) => debug!("Validation error: {}", msg),
            AuthError::InvalidCredentials => warn!("Failed login attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::NotFound => debug!("Authenticated user not found"),
            AuthError::UploadError(msg) => error!("Error uploading image: {}", msg),
            AuthError::PersistenceError(msg) => error!("Database error in auth: {}", msg),
            AuthError::HashingError(msg) => error!("Password hashing error: {}", msg),
            AuthError::TokenError(msg) => error!("Token generation error: {}", msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(json!({
            "message": self.client_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::PersistenceError(err.to_string())
    }
}
