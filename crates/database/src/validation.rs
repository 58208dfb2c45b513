//! Input validation for console-supplied fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for serial numbers.
pub const MAX_SERIAL_LENGTH: usize = 64;

/// Maximum allowed length for toy display names.
pub const MAX_NAME_LENGTH: usize = 64;

/// Minimum accepted length for activation keys at intake.
pub const MIN_ACTIVATION_KEY_LENGTH: usize = 6;

/// Validate a serial number (non-empty after trimming, bounded length).
pub fn validate_serial_number(serial: &str) -> Result<(), ValidationError> {
    let serial = serial.trim();

    if serial.is_empty() {
        return Err(ValidationError::Empty("serial number".to_string()));
    }

    if serial.len() > MAX_SERIAL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "serial number".to_string(),
            max: MAX_SERIAL_LENGTH,
            actual: serial.len(),
        });
    }

    Ok(())
}

/// Validate a toy display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty("name".to_string()));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual: name.len(),
        });
    }

    Ok(())
}
