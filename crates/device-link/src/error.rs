//! Error types for device-link.

use thiserror::Error;

/// Errors that can occur while delivering a command to a toy.
///
/// None of these are fatal to the caller: the configuration write has already
/// landed in the database by the time a dispatch runs, and the toy picks the
/// settings up on its next reconnect.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No connection established within the session budget.
    #[error("connection timeout - MQTT broker unreachable")]
    ConnectTimeout,

    /// The underlying connection reported an error (broker unreachable,
    /// auth rejected, socket closed mid-session).
    #[error("MQTT connection error: {0}")]
    Transport(String),

    /// The connection succeeded but the publish could not be enqueued.
    #[error("failed to publish message: {0}")]
    Publish(String),

    /// Envelope serialization failed.
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
