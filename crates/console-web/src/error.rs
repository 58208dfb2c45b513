//! Error types for the console web API.
//!
//! Every failure is caught at the handler boundary and mapped to a status
//! plus an `{"error": ...}` body; nothing propagates to a panic. Dispatch
//! failures never appear here at all: the settings write has already landed,
//! so they are downgraded inside the handler (see `routes::toys`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use provisioning::ProvisionError;
use thiserror::Error;

/// Errors that can occur in the console web API.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// No authenticated principal on the request.
    #[error("Not authenticated")]
    Unauthorized,

    /// Authenticated but not on the admin allowlist.
    #[error("Admin access required")]
    Forbidden,

    /// Caller-supplied input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Provisioning failed.
    #[error("{0}")]
    Provision(#[from] ProvisionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ConsoleError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ConsoleError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ConsoleError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ConsoleError::Provision(err) => match err {
                ProvisionError::UnknownOrInactiveDevice
                | ProvisionError::InvalidActivationKey
                | ProvisionError::MalformedScanPayload => {
                    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
                }
                ProvisionError::Database(db_err) => {
                    tracing::error!("Database error during provisioning: {}", db_err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
            },
            ConsoleError::Database(err) => match err {
                DatabaseError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                other => {
                    tracing::error!("Database error: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
            },
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for console handlers.
pub type Result<T> = std::result::Result<T, ConsoleError>;
