//! Error types for provisioning operations.

use thiserror::Error;

/// Errors that can occur while claiming or scanning a device.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Serial number absent from the allowlist, or present but deactivated.
    #[error("Invalid serial number or toy is not activated")]
    UnknownOrInactiveDevice,

    /// Activation key failed the intake length check.
    #[error("Invalid activation key")]
    InvalidActivationKey,

    /// QR payload did not decode to the expected shape.
    #[error("Invalid QR code format")]
    MalformedScanPayload,

    /// Underlying store operation failed.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),
}

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
